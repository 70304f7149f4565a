mod link;
mod user;

pub use link::{Link, LinkKind, QrCodeResponse, ShortenRequest, ShortenResponse};
pub use user::{AuthStatus, Credentials, User};
