//! API key generation.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Generates a random alphanumeric API key of the configured length.
pub fn generate_api_key(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respects_length() {
        assert_eq!(generate_api_key(32).len(), 32);
        assert_eq!(generate_api_key(64).len(), 64);
    }

    #[test]
    fn is_alphanumeric() {
        assert!(generate_api_key(128).chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn keys_differ() {
        assert_ne!(generate_api_key(32), generate_api_key(32));
    }
}
