mod link;

pub use link::{validate_password_bytes, validate_short_code, validate_url, MAX_SHORT_CODE_LENGTH};
