/// Opaque API tokens
///
/// A token is 40 random base62 characters (`[A-Za-z0-9]`), roughly 238 bits
/// of entropy. There is no prefix and no expiry.
///
/// ```
/// use prodlist_shared::auth::token::{generate_token, is_well_formed, TOKEN_LENGTH};
///
/// let token = generate_token();
/// assert_eq!(token.len(), TOKEN_LENGTH);
/// assert!(is_well_formed(&token));
/// ```

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Number of characters in a token
pub const TOKEN_LENGTH: usize = 40;

/// Generates a fresh random token
pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Cheap shape check run before touching the database
pub fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_LENGTH && token.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), 40);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_token_unique() {
        let tokens: HashSet<String> = (0..100).map(|_| generate_token()).collect();
        assert_eq!(tokens.len(), 100);
    }

    #[test]
    fn test_is_well_formed() {
        assert!(is_well_formed(&"a".repeat(40)));
        assert!(!is_well_formed(""));
        assert!(!is_well_formed(&"a".repeat(39)));
        assert!(!is_well_formed(&"a".repeat(41)));
        assert!(!is_well_formed(&format!("{}-", "a".repeat(39))));
    }
}
