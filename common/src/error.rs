//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// オントロジーの読み込み・解析失敗（起動時の致命的エラー）
    #[error("Ontology error: {0}")]
    Ontology(String),

    /// プロパティリストの必須フィールド欠落など
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "om-2.0.rdf");
        let error = Error::Io(io_error);
        let display = format!("{}", error);
        assert!(display.contains("IO error"));
        assert!(display.contains("om-2.0.rdf"));
    }

    #[test]
    fn test_error_display_ontology() {
        let error = Error::Ontology("unknown namespace prefix: om".to_string());
        assert_eq!(
            format!("{}", error),
            "Ontology error: unknown namespace prefix: om"
        );
    }

    #[test]
    fn test_error_display_malformed_input() {
        let error = Error::MalformedInput("property without name".to_string());
        assert_eq!(format!("{}", error), "Malformed input: property without name");
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_error_debug() {
        let error = Error::Config("suggestionSize".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("Config"));
        assert!(debug.contains("suggestionSize"));
    }
}
