/// 転送層のエラー定義
///
/// tus転送中に発生するエラーを構造化して定義。
/// 一時的な障害か終端エラーかの分類を `is_transient` が提供する。
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransferError {
    /// 転送元の読み取りエラー
    #[error("I/O error")]
    Io(#[from] io::Error),

    /// ネットワークエラー
    #[error("network error: {message}")]
    Network { message: String },

    /// エンドポイントが転送を拒否
    #[error("upload endpoint rejected the transfer (status {status}): {message}")]
    Rejected { status: u16, message: String },

    /// リトライスケジュールを使い切った
    #[error("transfer failed after {attempts} retries: {message}")]
    Exhausted { attempts: usize, message: String },

    /// Upload-Offsetヘッダーが不正または欠落
    #[error("invalid Upload-Offset header in response: {value}")]
    BadOffset { value: String },
}

impl TransferError {
    /// ネットワークエラーを作成
    pub(crate) fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// 転送拒否エラーを作成
    pub(crate) fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// リトライ枯渇エラーを作成(最後の障害を保持する)
    pub(crate) fn exhausted(attempts: usize, last_fault: &TransferError) -> Self {
        Self::Exhausted {
            attempts,
            message: last_fault.to_string(),
        }
    }

    /// Upload-Offsetヘッダー不正エラーを作成
    pub(crate) fn bad_offset(value: impl Into<String>) -> Self {
        Self::BadOffset {
            value: value.into(),
        }
    }

    /// 一時的な障害かどうか
    ///
    /// ネットワーク断、5xx、409(オフセット競合)はリトライ対象。
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Rejected { status, .. } => *status >= 500 || *status == 409,
            _ => false,
        }
    }
}
