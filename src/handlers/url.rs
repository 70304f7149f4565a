use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

use super::require_session;
use crate::{
    models::{LinkKind, ShortenRequest, ShortenResponse},
    services::{AuthService, LinkService, LinkServiceTrait, RedirectService},
    types::Result,
};

/// Links of the logged-in user
pub async fn user_data_handler(
    req: HttpRequest,
    auth: web::Data<AuthService>,
    service: web::Data<LinkService>,
) -> Result<impl Responder> {
    let claims = require_session(&req, &auth)?;
    let links = service.list_for_owner(&claims.user_id).await?;
    Ok(HttpResponse::Ok().json(links))
}

/// Create short link route handler
pub async fn shorten_handler(
    req: HttpRequest,
    dto: web::Json<ShortenRequest>,
    auth: web::Data<AuthService>,
    service: web::Data<LinkService>,
) -> Result<impl Responder> {
    let claims = require_session(&req, &auth)?;
    let link = service
        .shorten(LinkKind::Owned, dto.into_inner(), Some(claims.user_id))
        .await?;

    Ok(HttpResponse::Ok().json(ShortenResponse {
        short_url: service.short_url(&link),
    }))
}

/// Get link by ID route handler
pub async fn details_handler(
    id: web::Path<Uuid>,
    service: web::Data<LinkService>,
) -> Result<impl Responder> {
    let link = service.get_details(&id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(link))
}

pub async fn qr_handler(
    code: web::Path<String>,
    service: web::Data<LinkService>,
) -> Result<impl Responder> {
    super::qr_code(LinkKind::Owned, code, service).await
}

/// Delete link route handler
pub async fn delete_handler(
    id: web::Path<Uuid>,
    service: web::Data<LinkService>,
) -> Result<impl Responder> {
    service.delete(&id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "URL deleted successfully" })))
}

/// Redirect route handler
pub async fn redirect_handler(
    code: web::Path<String>,
    service: web::Data<RedirectService>,
) -> Result<impl Responder> {
    super::redirect(LinkKind::Owned, code, service).await
}

#[cfg(test)]
mod tests {
    use actix_web::{
        http::{header::LOCATION, StatusCode},
        test,
    };
    use chrono::{DateTime, Duration, Utc};
    use serde_json::{json, Value};
    use uuid::Uuid;

    use crate::models::{Link, LinkKind};
    use crate::test_support::{fixture, login, test_app};

    fn code_of(short_url: &str) -> String {
        short_url.rsplit('/').next().unwrap_or_default().to_string()
    }

    macro_rules! shorten {
        ($app:expr, $cookie:expr, $url:expr) => {{
            let req = test::TestRequest::post()
                .uri("/api/url/shorten")
                .cookie($cookie.clone())
                .set_json(json!({ "originalUrl": $url }))
                .to_request();
            let body: Value = test::call_and_read_body_json(&$app, req).await;
            body["shortUrl"].as_str().unwrap().to_string()
        }};
    }

    macro_rules! owned_links {
        ($app:expr, $cookie:expr) => {{
            let req = test::TestRequest::get()
                .uri("/api/url/userData")
                .cookie($cookie.clone())
                .to_request();
            let links: Vec<Value> = test::call_and_read_body_json(&$app, req).await;
            links
        }};
    }

    #[actix_web::test]
    async fn shorten_then_redirect_counts_visits() {
        let (_, services) = fixture();
        let app = test_app!(services);
        let cookie = login!(app);

        let short_url = shorten!(app, cookie, "https://example.com/a/b/c");
        assert!(short_url.starts_with("http://localhost:8000/api/url/"));
        let code = code_of(&short_url);

        for _ in 0..3 {
            let req = test::TestRequest::get()
                .uri(&format!("/api/url/{}", code))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::FOUND);
            assert_eq!(
                resp.headers().get(LOCATION).unwrap(),
                "https://example.com/a/b/c"
            );
        }

        let links = owned_links!(app, cookie);
        assert_eq!(links.len(), 1);
        let id = links[0]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri(&format!("/api/url/details/{}", id))
            .to_request();
        let details: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(details["visitCount"], 3);

        let history: Vec<DateTime<Utc>> =
            serde_json::from_value(details["visitHistory"].clone()).unwrap();
        assert_eq!(history.len(), 3);
        assert!(history.windows(2).all(|w| w[0] <= w[1]));
    }

    #[actix_web::test]
    async fn shorten_requires_session() {
        let (_, services) = fixture();
        let app = test_app!(services);

        let req = test::TestRequest::post()
            .uri("/api/url/shorten")
            .set_json(json!({ "originalUrl": "https://example.com" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get().uri("/api/url/userData").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn malformed_url_is_bad_request() {
        let (_, services) = fixture();
        let app = test_app!(services);
        let cookie = login!(app);

        let req = test::TestRequest::post()
            .uri("/api/url/shorten")
            .cookie(cookie)
            .set_json(json!({ "originalUrl": "javascript:alert(1)" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn expired_link_is_gone_and_not_counted() {
        let (repositories, services) = fixture();
        let app = test_app!(services);

        let link = Link::new(
            LinkKind::Owned,
            "https://example.com".to_string(),
            "expired1".to_string(),
            Some(Uuid::new_v4()),
            Duration::hours(-1),
        );
        repositories.links.create(&link).await.unwrap();

        let req = test::TestRequest::get().uri("/api/url/expired1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::GONE);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "URL has expired" }));

        let stored = repositories.links.find_by_id(&link.id).await.unwrap().unwrap();
        assert_eq!(stored.visit_count, 0);
        assert!(stored.visit_history.is_empty());
    }

    #[actix_web::test]
    async fn deleted_link_no_longer_redirects() {
        let (_, services) = fixture();
        let app = test_app!(services);
        let cookie = login!(app);

        let code = code_of(&shorten!(app, cookie, "https://example.com/delete-me"));
        let id = owned_links!(app, cookie)[0]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let req = test::TestRequest::delete()
            .uri(&format!("/api/url/delete/{}", id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/api/url/{}", code))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/url/delete/{}", id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn user_data_lists_only_own_links() {
        let (_, services) = fixture();
        let app = test_app!(services);
        let alice = login!(app);
        let bob = login!(app);

        shorten!(app, alice, "https://example.com/alice");
        shorten!(app, bob, "https://example.com/bob");

        let links = owned_links!(app, alice);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0]["originalUrl"], "https://example.com/alice");
    }

    #[actix_web::test]
    async fn qr_code_for_owned_link() {
        let (_, services) = fixture();
        let app = test_app!(services);
        let cookie = login!(app);
        let code = code_of(&shorten!(app, cookie, "https://example.com"));

        let req = test::TestRequest::get()
            .uri(&format!("/api/url/qr/{}", code))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["qrCode"]
            .as_str()
            .unwrap()
            .starts_with("data:image/svg+xml;base64,"));

        let req = test::TestRequest::get().uri("/api/url/qr/unknown").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn malformed_id_is_bad_request() {
        let (_, services) = fixture();
        let app = test_app!(services);

        let req = test::TestRequest::get()
            .uri("/api/url/details/not-a-uuid")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
