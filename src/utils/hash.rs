use rand::{rng, Rng};

const CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const BASE: u64 = 62;

/// Converts a number to base62 representation (0-9, A-Z, a-z)
pub fn encode_base62(mut num: u64) -> String {
    if num == 0 {
        return "0".to_string();
    }

    let mut result = Vec::new();

    while num > 0 {
        result.push(CHARSET[(num % BASE) as usize] as char);
        num /= BASE;
    }

    result.iter().rev().collect()
}

/// Generates a random base62 character
pub fn random_base62_char() -> char {
    let idx = rng().random_range(0..CHARSET.len());
    CHARSET[idx] as char
}

/// Whether every character of `s` belongs to the base62 alphabet
pub fn is_base62(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_known_values() {
        assert_eq!(encode_base62(0), "0");
        assert_eq!(encode_base62(61), "z");
        assert_eq!(encode_base62(62), "10");
        assert_eq!(encode_base62(3843), "zz");
    }

    #[test]
    fn random_chars_stay_in_alphabet() {
        for _ in 0..200 {
            assert!(random_base62_char().is_ascii_alphanumeric());
        }
    }
}
