use thiserror::Error;

/// エラー分類（呼び出し側はメッセージ文字列ではなくこれで分岐する）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 401/403: トークン無効・期限切れ
    Unauthorized,
    /// 404: 該当データなし
    NotFound,
    /// 接続失敗・タイムアウト・想定外のステータス
    Transport,
    /// 入力不備（ローカル検証または400/422）
    Validation,
    /// リクエストスコープの取り消し
    Cancelled,
    /// 設定・ファイル入出力などローカルの失敗
    Local,
}

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Session expired. Please login again: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Not logged in. Run `titweng-admin login` first")]
    MissingToken,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to load image: {0}")]
    ImageLoad(String),

    #[error("No images found: {0}")]
    NoImagesFound(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Invalid JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] titweng_common::Error),
}

impl AdminError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdminError::Unauthorized(_) | AdminError::MissingToken => ErrorKind::Unauthorized,
            AdminError::NotFound(_) | AdminError::FileNotFound(_) | AdminError::NoImagesFound(_) => {
                ErrorKind::NotFound
            }
            AdminError::Transport(_) => ErrorKind::Transport,
            AdminError::Validation(_) | AdminError::ImageLoad(_) => ErrorKind::Validation,
            AdminError::Common(titweng_common::Error::Validation(_)) => ErrorKind::Validation,
            AdminError::Common(_) => ErrorKind::Transport,
            AdminError::Cancelled => ErrorKind::Cancelled,
            AdminError::Config(_) | AdminError::Prompt(_) | AdminError::Io(_) | AdminError::JsonParse(_) => {
                ErrorKind::Local
            }
        }
    }

    /// 再ログインが必要か
    pub fn requires_login(&self) -> bool {
        self.kind() == ErrorKind::Unauthorized
    }
}

pub type Result<T> = std::result::Result<T, AdminError>;
