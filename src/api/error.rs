/// API層のエラー定義
///
/// リクエスト構築、ネットワーク、API応答で発生するエラーを構造化して定義。
/// 転送層(reqwest)のエラーは種類に応じて分類してから保持する。
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// リクエストの構築が無効
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    /// ネットワークエラー
    #[error("network error: {message}")]
    Network { message: String },

    /// タイムアウトエラー
    #[error("operation timed out: {operation}")]
    Timeout { operation: String },

    /// API通信エラー
    #[error("API error: {endpoint} - {message}")]
    Api {
        endpoint: String,
        message: String,
        status_code: Option<u16>,
    },

    /// レスポンスボディのパースエラー
    #[error("failed to parse response: {message}")]
    Parse { message: String },
}

impl ApiError {
    /// 無効リクエストエラーを作成
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// ネットワークエラーを作成
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// タイムアウトエラーを作成
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// API通信エラーを作成
    pub fn api(
        endpoint: impl Into<String>,
        message: impl Into<String>,
        status_code: Option<u16>,
    ) -> Self {
        Self::Api {
            endpoint: endpoint.into(),
            message: message.into(),
            status_code,
        }
    }

    /// パースエラーを作成
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}
