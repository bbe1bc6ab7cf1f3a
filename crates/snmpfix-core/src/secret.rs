//! Per-run archive password.

use rand::{distributions::Alphanumeric, Rng};
use std::fmt;

/// Password used to encrypt and decrypt one configuration export.
///
/// A fresh value is generated for each run. It has no `Display` impl, its
/// `Debug` output is redacted and its bytes are overwritten on drop.
pub struct ArchiveSecret(String);

impl ArchiveSecret {
    /// Number of random alphanumeric characters in a generated secret
    pub const RANDOM_LEN: usize = 16;

    /// Generate a new secret: random alphanumerics followed by `!`.
    ///
    /// The controller rejects export passwords without a special character.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let mut value: String = (0..Self::RANDOM_LEN)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect();
        value.push('!');
        Self(value)
    }

    /// Wrap a known secret, e.g. one supplied for an offline audit.
    #[must_use]
    pub fn from_string(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the secret for an export request or a decrypt call
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ArchiveSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ArchiveSecret(***)")
    }
}

impl Drop for ArchiveSecret {
    fn drop(&mut self) {
        let mut bytes = std::mem::take(&mut self.0).into_bytes();
        bytes.iter_mut().for_each(|b| *b = 0);
        std::hint::black_box(&bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_shape() {
        let secret = ArchiveSecret::generate();
        let value = secret.expose();
        assert_eq!(value.len(), ArchiveSecret::RANDOM_LEN + 1);
        assert!(value.ends_with('!'));
        assert!(value[..ArchiveSecret::RANDOM_LEN]
            .chars()
            .all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_fresh_per_call() {
        let a = ArchiveSecret::generate();
        let b = ArchiveSecret::generate();
        assert_ne!(a.expose(), b.expose());
    }

    #[test]
    fn test_debug_is_redacted() {
        let secret = ArchiveSecret::from_string("hunter2hunter2!");
        let shown = format!("{secret:?}");
        assert!(!shown.contains("hunter2"));
        assert_eq!(shown, "ArchiveSecret(***)");
    }
}
