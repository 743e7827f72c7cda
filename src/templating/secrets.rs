//! Credential generation for `gen_password()`.

use uuid::Uuid;

use super::FunctionError;

/// Source of fresh credential strings.
///
/// Called once per `gen_password()` invocation; results are never memoized, so two
/// calls within one render produce two credentials.
pub trait SecretGenerator: Send + Sync {
    /// Produce a new credential.
    ///
    /// # Errors
    ///
    /// [`FunctionError::Secret`] if no credential could be produced.
    fn generate(&self) -> Result<String, FunctionError>;
}

/// Random v4 UUIDs in hyphenated form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSecretGenerator;

impl SecretGenerator for UuidSecretGenerator {
    fn generate(&self) -> Result<String, FunctionError> {
        Ok(Uuid::new_v4().to_string())
    }
}

/// Always returns the same credential. Renders become reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedSecretGenerator(pub String);

impl SecretGenerator for FixedSecretGenerator {
    fn generate(&self) -> Result<String, FunctionError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_secrets_are_fresh() {
        let generator = UuidSecretGenerator;
        let first = generator.generate().unwrap();
        let second = generator.generate().unwrap();
        assert_ne!(first, second);
        assert_eq!(first.len(), 36);
        assert!(Uuid::parse_str(&first).is_ok());
    }
}
