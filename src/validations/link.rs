use url::Url;
use validator::ValidationError;

use crate::utils::hash::is_base62;

/// Validates that a URL string is properly formatted and uses http/https
pub fn validate_url(url_str: &str) -> Result<(), ValidationError> {
    match Url::parse(url_str.trim()) {
        Ok(url) => {
            // Ensure URL has a scheme and host
            if url.scheme().is_empty() || url.host().is_none() {
                return Err(invalid("URL must have a scheme and host"));
            }

            // Only accept HTTP and HTTPS URLs
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(invalid("URL scheme must be http or https"));
            }

            Ok(())
        }
        Err(_) => Err(invalid("Invalid URL format")),
    }
}

/// Longest short code accepted anywhere, including the generator's configured length
pub const MAX_SHORT_CODE_LENGTH: usize = 32;

/// Validates a short code taken from a request path.
/// Codes are 1-32 base62 characters.
pub fn validate_short_code(code: &str) -> Result<(), ValidationError> {
    if code.is_empty() || code.len() > MAX_SHORT_CODE_LENGTH {
        return Err(invalid("Short code must be between 1 and 32 characters"));
    }

    if !is_base62(code) {
        return Err(invalid("Short code may only contain letters and digits"));
    }

    Ok(())
}

/// bcrypt only reads the first 72 bytes of a password
pub fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.len() > 72 {
        return Err(invalid("Password must be at most 72 bytes"));
    }
    Ok(())
}

fn invalid(message: &'static str) -> ValidationError {
    let mut err = ValidationError::new("invalid");
    err.message = Some(message.into());
    err
}
