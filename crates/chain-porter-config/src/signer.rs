// chain-porter-config/src/signer.rs
// ============================================================================
// Module: Signer Resolution
// Description: Signing mnemonic resolution from the environment.
// Purpose: Validate signing material once, during bootstrap step 1.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The signing mnemonic is read from a configurable environment variable
//! exactly once, during bootstrap. It must be a 12 or 24 word phrase; anything
//! else fails bootstrap before any collaborator is contacted.

use std::env;

use serde::Deserialize;
use thiserror::Error;

/// Default environment variable holding the signing mnemonic.
const DEFAULT_MNEMONIC_ENV: &str = "PORTER_MNEMONIC";

/// Signer resolution errors.
#[derive(Debug, Error)]
pub enum SignerError {
    /// The configured environment variable is unset or empty.
    #[error("environment variable {0} is not set")]
    Missing(String),
    /// The mnemonic is not a 12 or 24 word phrase.
    #[error("{env_var} must be a 12 or 24 word phrase, found {words} words")]
    WordCount {
        /// Environment variable the phrase was read from.
        env_var: String,
        /// Number of words found.
        words: usize,
    },
}

/// Signing material resolution settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignerConfig {
    /// Environment variable holding the signing mnemonic.
    #[serde(default = "default_mnemonic_env")]
    pub mnemonic_env: String,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            mnemonic_env: default_mnemonic_env(),
        }
    }
}

impl SignerConfig {
    /// Validates signer settings.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError`] when the variable name is empty.
    pub fn validate(&self) -> Result<(), SignerError> {
        if self.mnemonic_env.is_empty() {
            return Err(SignerError::Missing("signer.mnemonic_env".to_string()));
        }
        Ok(())
    }
}

/// Returns the default mnemonic environment variable name.
fn default_mnemonic_env() -> String {
    DEFAULT_MNEMONIC_ENV.to_string()
}

/// Resolves and validates the signing mnemonic from the environment.
///
/// # Errors
///
/// Returns [`SignerError`] when the variable is unset or the phrase has an
/// invalid word count.
pub fn resolve_mnemonic(config: &SignerConfig) -> Result<String, SignerError> {
    validate_phrase(&config.mnemonic_env, env::var(&config.mnemonic_env).ok())
}

/// Validates a candidate mnemonic phrase read from the named variable.
fn validate_phrase(env_var: &str, raw: Option<String>) -> Result<String, SignerError> {
    let raw = raw
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| SignerError::Missing(env_var.to_string()))?;
    let words = raw.split_whitespace().count();
    if words != 12 && words != 24 {
        return Err(SignerError::WordCount {
            env_var: env_var.to_string(),
            words,
        });
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

    use super::SignerError;
    use super::validate_phrase;

    #[test]
    fn missing_variable_is_reported() {
        assert!(matches!(validate_phrase("PORTER_MNEMONIC", None), Err(SignerError::Missing(_))));
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let result = validate_phrase("PORTER_MNEMONIC", Some("   ".to_string()));
        assert!(matches!(result, Err(SignerError::Missing(_))));
    }

    #[test]
    fn short_phrase_is_rejected() {
        let result = validate_phrase("PORTER_MNEMONIC", Some("one two three".to_string()));
        assert!(matches!(
            result,
            Err(SignerError::WordCount {
                words: 3,
                ..
            })
        ));
    }

    #[test]
    fn twelve_word_phrase_is_accepted() {
        let phrase = "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima";
        let resolved = validate_phrase("PORTER_MNEMONIC", Some(phrase.to_string())).unwrap();
        assert_eq!(resolved, phrase);
    }
}
