use rand::Rng;

/// Random order-line tracking token: 15 random bytes as Crockford base32.
pub fn generate_tracking_number() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 15] = rng.gen();
    base32::encode(base32::Alphabet::Crockford, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_number_shape() {
        let code = generate_tracking_number();
        assert_eq!(code.len(), 24);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(!code.contains('I') && !code.contains('L') && !code.contains('O') && !code.contains('U'));
    }

    #[test]
    fn test_tracking_numbers_differ() {
        assert_ne!(generate_tracking_number(), generate_tracking_number());
    }
}
