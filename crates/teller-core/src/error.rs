use thiserror::Error;

/// Top-level error type shared across the Teller crates.
///
/// Subsystems keep their own richer error enums where they need them and
/// fold into this one at crate boundaries, so `?` works end to end. The
/// string payloads carry the underlying cause for logs; callers match on
/// the variant, not the text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TellerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for TellerError {
    fn from(err: toml::de::Error) -> Self {
        TellerError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for TellerError {
    fn from(err: toml::ser::Error) -> Self {
        TellerError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for TellerError {
    fn from(err: serde_json::Error) -> Self {
        TellerError::Serialization(err.to_string())
    }
}

/// Shorthand for results carrying a [`TellerError`].
pub type Result<T> = std::result::Result<T, TellerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_display_prefixes() {
        let cases: Vec<(TellerError, &str)> = vec![
            (TellerError::Config("no port".into()), "Configuration error"),
            (TellerError::Storage("db locked".into()), "Storage error"),
            (TellerError::Auth("expired token".into()), "Authentication error"),
            (
                TellerError::Classifier("empty corpus".into()),
                "Classifier error",
            ),
            (TellerError::Chat("too long".into()), "Chat error"),
            (TellerError::Api("bind refused".into()), "API error"),
            (
                TellerError::Serialization("bad utf8".into()),
                "Serialization error",
            ),
        ];
        for (error, prefix) in cases {
            let rendered = error.to_string();
            assert!(
                rendered.starts_with(prefix),
                "{rendered:?} should start with {prefix:?}"
            );
        }
    }

    #[test]
    fn test_io_errors_convert_with_from() {
        fn touch() -> Result<()> {
            let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only fs");
            Err(denied)?
        }
        let err = touch().unwrap_err();
        assert!(matches!(err, TellerError::Io(_)));
        assert!(err.to_string().contains("read-only fs"));
    }

    #[test]
    fn test_toml_parse_failure_is_config_error() {
        let broken = toml::from_str::<toml::Value>("port = [");
        let err: TellerError = broken.unwrap_err().into();
        assert!(matches!(err, TellerError::Config(_)));
    }

    #[test]
    fn test_json_failure_is_serialization_error() {
        let broken = serde_json::from_str::<serde_json::Value>("{,}");
        let err: TellerError = broken.unwrap_err().into();
        assert!(matches!(err, TellerError::Serialization(_)));
    }

    #[test]
    fn test_result_alias_threads_through_question_mark() {
        fn parse_limit(raw: &str) -> Result<u32> {
            raw.parse::<u32>()
                .map_err(|e| TellerError::Config(format!("bad limit {raw:?}: {e}")))
        }

        fn doubled(raw: &str) -> Result<u32> {
            Ok(parse_limit(raw)? * 2)
        }

        assert_eq!(doubled("21").unwrap(), 42);
        assert!(matches!(
            doubled("many").unwrap_err(),
            TellerError::Config(_)
        ));
    }
}
