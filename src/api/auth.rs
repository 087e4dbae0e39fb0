/// 認証情報とOAuth2スコープ
///
/// Vimeo APIの認証ヘッダー生成を担当します。
/// アクセストークンがあればBearer、なければclient_id/client_secretによる
/// HTTP Basic認証ヘッダーを生成します。
use base64::{Engine as _, engine::general_purpose};

/// APIクライアントの認証情報
///
/// 構築後は不変。アクセストークンの差し替えは `with_access_token` で
/// 新しいインスタンスを作り直すことで表現し、進行中のリクエストと
/// 競合する共有状態の書き換えを持たない。
#[derive(Clone)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
    access_token: Option<String>,
}

impl Credentials {
    /// 新しい認証情報を作成
    ///
    /// # Arguments
    /// * `client_id` - アプリケーションのclient identifier
    /// * `client_secret` - アプリケーションのclient secret
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            access_token: None,
        }
    }

    /// アクセストークンを設定した新しい認証情報を返す
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    /// client identifierを取得
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// アクセストークンを保持しているか
    pub fn has_access_token(&self) -> bool {
        self.access_token.is_some()
    }

    /// HTTP認証ヘッダーの値を生成
    ///
    /// アクセストークンがあれば "Bearer <token>"、
    /// なければ "Basic <base64(client_id:client_secret)>" 形式の文字列。
    /// 必ずどちらか一方のみが生成される。
    pub fn authorization_header(&self) -> String {
        match &self.access_token {
            Some(token) => format!("Bearer {}", token),
            None => {
                let credentials = format!("{}:{}", self.client_id, self.client_secret);
                let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
                format!("Basic {}", encoded)
            }
        }
    }
}

/// OAuth2スコープ指定
///
/// 省略時は "public"。リストは空白区切りで結合され、
/// 既に結合済みの文字列はそのまま使用される。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Scope {
    /// デフォルトスコープ ("public")
    #[default]
    Default,

    /// 空白区切り済みのスコープ文字列
    Joined(String),

    /// スコープ名のリスト
    List(Vec<String>),
}

impl Scope {
    /// クエリパラメータやフォームに載せる正規化済みの値を返す
    pub fn normalized(&self) -> String {
        match self {
            Scope::Default => "public".to_string(),
            Scope::Joined(scope) => scope.clone(),
            Scope::List(scopes) => scopes.join(" "),
        }
    }
}

impl From<&str> for Scope {
    fn from(scope: &str) -> Self {
        Scope::Joined(scope.to_string())
    }
}

impl From<String> for Scope {
    fn from(scope: String) -> Self {
        Scope::Joined(scope)
    }
}

impl From<Vec<String>> for Scope {
    fn from(scopes: Vec<String>) -> Self {
        Scope::List(scopes)
    }
}

impl From<Vec<&str>> for Scope {
    fn from(scopes: Vec<&str>) -> Self {
        Scope::List(scopes.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Scope {
    fn from(scopes: &[&str]) -> Self {
        Scope::List(scopes.iter().map(|s| s.to_string()).collect())
    }
}
