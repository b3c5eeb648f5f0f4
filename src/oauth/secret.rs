use rand::{Rng, distributions::Alphanumeric, thread_rng};
use subtle::ConstantTimeEq;

/// Length of every opaque credential (codes, access and refresh tokens,
/// generated client secrets). 64 alphanumeric characters is ~380 bits of
/// entropy, far past guessability.
pub const TOKEN_LEN: usize = 64;

pub fn generate_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Constant-time comparison of a stored client secret against the supplied
/// one. Length mismatches compare unequal without early exit.
pub fn secrets_match(expected: &str, provided: &str) -> bool {
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::{TOKEN_LEN, generate_token, secrets_match};

    #[test]
    fn tokens_are_long_alphanumeric_and_distinct() {
        let a = generate_token();
        let b = generate_token();

        assert_eq!(a.len(), TOKEN_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn secrets_match_requires_exact_equality() {
        assert!(secrets_match("s3cret", "s3cret"));
        assert!(!secrets_match("s3cret", "s3creT"));
        assert!(!secrets_match("s3cret", "s3cret-but-longer"));
        assert!(!secrets_match("s3cret", ""));
    }
}
