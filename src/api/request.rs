/// リクエストオプションの構築と既定値のマージ
///
/// 呼び出し側が指定したオプションに、ライブラリの既定ヘッダー
/// (Accept, User-Agent)、認証ヘッダー、Content-Typeの既定値を
/// 順にマージして最終的なリクエストを組み立てます。
use crate::api::auth::Credentials;
use crate::api::error::ApiError;
use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;

/// リクエストボディ
#[derive(Debug, Clone)]
pub enum Body {
    /// JSONボディ
    Json(Value),

    /// フォームエンコードボディ
    Form(Vec<(String, String)>),
}

/// APIリクエストのオプション
///
/// URL文字列から直接生成した場合は、ボディなしのGETリクエストになる。
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// リクエスト先(相対パスまたは絶対URL)
    pub url: String,

    /// HTTPメソッド(既定はGET)
    pub method: Method,

    /// 呼び出し側が指定するヘッダー(既定ヘッダーより優先される)
    pub headers: HeaderMap,

    /// リクエストボディ
    pub body: Option<Body>,
}

impl RequestOptions {
    /// 新しいリクエストオプションを作成(メソッドはGET)
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// HTTPメソッドを設定
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// ヘッダーを設定
    pub fn header(mut self, name: reqwest::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// JSONボディを設定
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(Body::Json(body));
        self
    }

    /// フォームエンコードボディを設定
    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = Some(Body::Form(fields));
        self
    }
}

impl From<&str> for RequestOptions {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for RequestOptions {
    fn from(url: String) -> Self {
        Self::new(url)
    }
}

/// 既定ヘッダーと認証ヘッダーをマージした最終ヘッダーを構築する
///
/// 適用順:
/// 1. ライブラリ既定ヘッダー (Accept, User-Agent)
/// 2. 呼び出し側のヘッダー(既定値を上書きできる)
/// 3. 認証ヘッダー(Credentialsから常に付与される)
/// 4. 変更系メソッドでContent-Type未指定かつフォームボディでなければ application/json
pub(crate) fn merge_headers(
    options: &RequestOptions,
    credentials: &Credentials,
    accept: &str,
) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();

    headers.insert(
        ACCEPT,
        HeaderValue::from_str(accept)
            .map_err(|e| ApiError::invalid_request(format!("invalid accept header: {}", e)))?,
    );
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("vimeo.rs/", env!("CARGO_PKG_VERSION"))),
    );

    for (name, value) in options.headers.iter() {
        headers.insert(name.clone(), value.clone());
    }

    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&credentials.authorization_header()).map_err(|e| {
            ApiError::invalid_request(format!("invalid authorization header: {}", e))
        })?,
    );

    let defaults_to_json = matches!(options.body, None | Some(Body::Json(_)));
    if is_mutating(&options.method) && !headers.contains_key(CONTENT_TYPE) && defaults_to_json {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    Ok(headers)
}

/// ボディを持ちうる変更系メソッドかどうか
fn is_mutating(method: &Method) -> bool {
    *method == Method::POST
        || *method == Method::PATCH
        || *method == Method::PUT
        || *method == Method::DELETE
}
