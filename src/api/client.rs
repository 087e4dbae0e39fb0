/// HTTPクライアント
///
/// Vimeo APIとの通信を担当するHTTPクライアント。
/// タイムアウト、既定ヘッダーのマージ、認証ヘッダーの付与、
/// OAuth2のトークン取得フローを含みます。
use crate::api::auth::{Credentials, Scope};
use crate::api::error::ApiError;
use crate::api::request::{Body, RequestOptions, merge_headers};
use crate::api::types::{ApiErrorBody, TokenResponse};
use crate::config::APP_CONFIG;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::form_urlencoded;

/// APIクライアントの結果型
type ApiResult<T> = Result<T, ApiError>;

/// Vimeo APIクライアント
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl Client {
    /// 新しいAPIクライアントを作成
    ///
    /// ベースURLはビルド時設定(APP_CONFIG)のエンドポイントを使用する。
    pub fn new(credentials: Credentials) -> ApiResult<Self> {
        Self::with_endpoint(APP_CONFIG.api.endpoint.clone(), credentials)
    }

    /// ベースURLを指定してAPIクライアントを作成
    ///
    /// # Arguments
    /// * `base_url` - APIのベースURL（例: "https://api.vimeo.com"）
    /// * `credentials` - 認証情報
    pub fn with_endpoint(base_url: impl Into<String>, credentials: Credentials) -> ApiResult<Self> {
        let timeout = Duration::from_secs(APP_CONFIG.api.timeout_seconds);

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            credentials,
        })
    }

    /// アクセストークンを設定したクライアントを作り直す
    ///
    /// 認証状態は不変なので、トークンの更新は新しいクライアントの構築として
    /// 表現する。既存のクライアントで進行中のリクエストには影響しない。
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.credentials = self.credentials.with_access_token(access_token);
        self
    }

    /// 認証情報を取得
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// 内部のHTTPクライアント（tus転送セッションと共有する）
    pub(crate) fn http_client(&self) -> &reqwest::Client {
        &self.http
    }

    /// 認可リダイレクトURLを構築する
    ///
    /// ネットワークアクセスを行わない純粋な構築処理。
    /// scope省略時(`Scope::default()`)は "public" が使われ、
    /// stateは空でない値が指定された場合のみ付与される。
    pub fn build_authorization_endpoint(
        &self,
        redirect_uri: &str,
        scope: impl Into<Scope>,
        state: Option<&str>,
    ) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("response_type", "code");
        query.append_pair("client_id", self.credentials.client_id());
        query.append_pair("redirect_uri", redirect_uri);
        query.append_pair("scope", &scope.into().normalized());
        if let Some(state) = state {
            if !state.is_empty() {
                query.append_pair("state", state);
            }
        }

        format!("{}/oauth/authorize?{}", self.base_url, query.finish())
    }

    /// 認可コードをアクセストークンに交換する
    ///
    /// grant_type=authorization_code のフォームエンコードPOSTを発行する。
    /// 失敗時は下層のエラーを加工せずそのまま返す。
    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> ApiResult<TokenResponse> {
        let fields = vec![
            ("grant_type".to_string(), "authorization_code".to_string()),
            ("code".to_string(), code.to_string()),
            ("redirect_uri".to_string(), redirect_uri.to_string()),
        ];

        self.request(
            RequestOptions::new("/oauth/access_token")
                .method(Method::POST)
                .form(fields),
        )
        .await
    }

    /// client_credentialsグラントでアプリケーショントークンを取得する
    ///
    /// scopeの正規化規則は認可URLの構築時と同じ。
    pub async fn generate_client_credentials(
        &self,
        scope: impl Into<Scope>,
    ) -> ApiResult<TokenResponse> {
        let fields = vec![
            ("grant_type".to_string(), "client_credentials".to_string()),
            ("scope".to_string(), scope.into().normalized()),
        ];

        self.request(
            RequestOptions::new("/oauth/authorize/client")
                .method(Method::POST)
                .form(fields),
        )
        .await
    }

    /// 任意のAPIリクエストを発行する
    ///
    /// URL文字列（GETとして扱われる）または完全なRequestOptionsを受け付ける。
    /// 2xxレスポンスのボディをデシリアライズして返し、それ以外はApiErrorを返す。
    ///
    /// # Errors
    /// - URLが空の場合は `ApiError::InvalidRequest`
    /// - 転送層の失敗は `ApiError::Network` / `ApiError::Timeout`
    /// - 2xx以外の応答は `ApiError::Api`
    pub async fn request<T, O>(&self, options: O) -> ApiResult<T>
    where
        T: DeserializeOwned,
        O: Into<RequestOptions>,
    {
        let options = options.into();

        if options.url.is_empty() {
            return Err(ApiError::invalid_request("a url field is required"));
        }

        let url = self.resolve_url(&options.url);
        let headers = merge_headers(&options, &self.credentials, &APP_CONFIG.api.accept)?;

        tracing::debug!("{} {}", options.method, url);

        let mut request = self
            .http
            .request(options.method.clone(), url.as_str())
            .headers(headers);
        request = match &options.body {
            Some(Body::Json(value)) => request.json(value),
            Some(Body::Form(fields)) => request.form(fields),
            None => request,
        };

        let operation = format!("{} {}", options.method, options.url);
        let response = request
            .send()
            .await
            .map_err(|e| Self::classify_transport_error(e, &operation))?;

        Self::parse_response(response, &options.url).await
    }

    /// URLを解決する
    ///
    /// 絶対URLはそのまま、相対パスはベースURLに連結する。
    fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }

    /// 転送層のエラーを分類する
    fn classify_transport_error(e: reqwest::Error, operation: &str) -> ApiError {
        if e.is_timeout() {
            ApiError::timeout(operation)
        } else if e.is_connect() {
            ApiError::network(format!("Connection failed for {}: {}", operation, e))
        } else {
            ApiError::network(format!("Request failed for {}: {}", operation, e))
        }
    }

    /// レスポンスを検査してボディをデシリアライズする
    ///
    /// エラーボディがJSONの場合は `error` フィールドをメッセージとして使う。
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
        endpoint: &str,
    ) -> ApiResult<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or(body);
            return Err(ApiError::api(endpoint, message, Some(status.as_u16())));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ApiError::parse(format!("Failed to read response body: {}", e)))?;

        // ボディなしの2xx応答はnullとして扱う
        let parsed = if text.trim().is_empty() {
            serde_json::from_str::<T>("null")
        } else {
            serde_json::from_str::<T>(&text)
        };
        parsed.map_err(|e| ApiError::parse(format!("Failed to parse JSON response: {}", e)))
    }
}
