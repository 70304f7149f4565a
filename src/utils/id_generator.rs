use rand::{rng, Rng};
use sha2::{Digest, Sha256};

use super::hash::{encode_base62, random_base62_char};

/// Generates a random base62 identifier of exactly `length` characters
pub fn generate_short_id(length: usize) -> String {
    // Generate a random 64-bit number
    let random_id: u64 = rng().random();
    fit_to_length(encode_base62(random_id), length)
}

/// Derives a short code for `original_url`.
///
/// The URL is hashed together with a fresh random salt, so shortening the same
/// URL twice yields two different codes. Uniqueness is not guaranteed here;
/// the store rejects duplicates and the caller retries.
pub fn generate_short_code(original_url: &str, length: usize) -> String {
    let salt: u64 = rng().random();

    let mut hasher = Sha256::new();
    hasher.update(original_url.as_bytes());
    hasher.update(salt.to_be_bytes());
    let digest = hasher.finalize();

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);

    fit_to_length(encode_base62(u64::from_be_bytes(prefix)), length)
}

fn fit_to_length(mut encoded: String, length: usize) -> String {
    // If too short, pad with additional random characters
    while encoded.len() < length {
        encoded.push(random_base62_char());
    }

    // If too long, truncate
    if encoded.len() > length {
        encoded.truncate(length);
    }

    encoded
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::utils::hash::is_base62;

    #[test]
    fn short_code_has_requested_length() {
        for length in [1, 6, 7, 11, 16] {
            let code = generate_short_code("https://example.com/a/b/c", length);
            assert_eq!(code.len(), length);
            assert!(is_base62(&code));
        }
    }

    #[test]
    fn same_url_gives_distinct_codes() {
        let codes: HashSet<String> = (0..50)
            .map(|_| generate_short_code("https://example.com", 7))
            .collect();
        // 62^7 possibilities; a handful of collisions would mean the salt is ignored
        assert!(codes.len() >= 49);
    }

    #[test]
    fn short_id_has_requested_length() {
        assert_eq!(generate_short_id(6).len(), 6);
        assert_eq!(generate_short_id(48).len(), 48);
        assert!(is_base62(&generate_short_id(32)));
    }
}
