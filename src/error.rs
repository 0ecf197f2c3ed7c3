use thiserror::Error;

#[derive(Error, Debug)]
pub enum PropMatchError {
    /// 照合コアのエラー（オントロジー読み込み失敗・入力不正など）
    #[error(transparent)]
    Common(#[from] prop_match_common::Error),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("リクエストが不正: {0}")]
    InvalidRequest(String),

    #[error("リクエストファイルが見つかりません: {0}")]
    NoRequestsFound(String),

    #[error("出力先が他のリクエストと重複しています: {0}")]
    OutputConflict(String),

    #[error("照合ペア保存エラー: {0}")]
    Store(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl PropMatchError {
    /// 起動を続けられないエラーか（オントロジー・設定）
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PropMatchError::Config(_)
                | PropMatchError::Common(prop_match_common::Error::Ontology(_))
                | PropMatchError::Common(prop_match_common::Error::Config(_))
        )
    }
}

pub type Result<T> = std::result::Result<T, PropMatchError>;
