use thiserror::Error;

/// Errors raised while decoding host documents.
///
/// The shaping pipeline itself never fails; only malformed JSON at the host boundary does.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid query result")]
    Query(#[source] serde_json::Error),
    #[error("invalid table settings")]
    Settings(#[source] serde_json::Error),
    #[error("invalid conditional formatting")]
    ConditionalFormatting(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    #[test]
    fn source_is_reported_once() {
        let err = crate::QueryResult::from_json("{ not json").unwrap_err();
        let source = err.source().map(ToString::to_string).unwrap_or_default();
        assert_eq!(err.to_string(), "invalid query result");
        assert!(!source.is_empty());
        assert!(!err.to_string().contains(&source));
    }
}
