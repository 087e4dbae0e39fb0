/// API通信用の型定義
///
/// Vimeo APIのレスポンスをデシリアライズするための構造体を定義します。
use serde::{Deserialize, Serialize};

/// 認証トークンレスポンス
///
/// POST /oauth/access_token および POST /oauth/authorize/client のレスポンス型
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// アクセストークン（API呼び出し用）
    pub access_token: String,

    /// トークンタイプ（常に "bearer"）
    pub token_type: String,

    /// 許可されたスコープ
    #[serde(default)]
    pub scope: Option<String>,

    /// アクセストークンの有効期限（秒）
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl TokenResponse {
    /// トークンレスポンスが有効かチェック
    pub fn is_valid(&self) -> bool {
        !self.access_token.is_empty() && self.token_type.eq_ignore_ascii_case("bearer")
    }
}

/// アップロード意図の宣言に対してサーバーが返す記述子
///
/// 動画リソースのURIと、バイト列の転送先となるアップロードリンクを保持する。
/// 単一の転送を開始するためだけに使われる短命な型。
#[derive(Debug, Clone, Deserialize)]
pub struct UploadAttempt {
    /// 動画リソースのURI
    #[serde(default)]
    pub uri: Option<String>,

    /// 動画リソース名
    #[serde(default)]
    pub name: Option<String>,

    /// アップロード方式の詳細
    pub upload: UploadInfo,
}

/// アップロード方式の詳細
#[derive(Debug, Clone, Deserialize)]
pub struct UploadInfo {
    /// アップロード方式（"tus"）
    #[serde(default)]
    pub approach: Option<String>,

    /// 宣言済みの総バイト数
    #[serde(default)]
    pub size: Option<u64>,

    /// tus転送先エンドポイント
    pub upload_link: String,
}

/// APIエラーレスポンスのボディ
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_deserialization() {
        let json = r#"{
            "access_token": "test_access_token",
            "token_type": "bearer",
            "scope": "public upload",
            "expires_in": 3600
        }"#;

        let response: TokenResponse = serde_json::from_str(json).expect("Failed to parse");

        assert_eq!(response.access_token, "test_access_token");
        assert_eq!(response.token_type, "bearer");
        assert_eq!(response.scope.as_deref(), Some("public upload"));
        assert_eq!(response.expires_in, Some(3600));
        assert!(response.is_valid());
    }

    #[test]
    fn test_token_response_invalid() {
        let response = TokenResponse {
            access_token: "".to_string(),
            token_type: "bearer".to_string(),
            scope: None,
            expires_in: None,
        };

        assert!(!response.is_valid());
    }

    #[test]
    fn test_upload_attempt_deserialization() {
        let json = r#"{
            "uri": "/videos/12345",
            "name": "Untitled",
            "upload": {
                "approach": "tus",
                "size": 1024,
                "upload_link": "https://files.example.com/tus/abc"
            }
        }"#;

        let attempt: UploadAttempt = serde_json::from_str(json).expect("Failed to parse");

        assert_eq!(attempt.uri.as_deref(), Some("/videos/12345"));
        assert_eq!(attempt.upload.approach.as_deref(), Some("tus"));
        assert_eq!(attempt.upload.size, Some(1024));
        assert_eq!(attempt.upload.upload_link, "https://files.example.com/tus/abc");
    }

    #[test]
    fn test_upload_attempt_without_uri() {
        // replace系のレスポンスはuriを含まない
        let json = r#"{"upload": {"upload_link": "https://files.example.com/tus/abc"}}"#;

        let attempt: UploadAttempt = serde_json::from_str(json).expect("Failed to parse");

        assert!(attempt.uri.is_none());
        assert_eq!(attempt.upload.upload_link, "https://files.example.com/tus/abc");
    }
}
