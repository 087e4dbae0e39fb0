/// アップロードオーケストレーター
///
/// 単一アップロードの段階を順に駆動します:
/// サイズ解決 → アップロード意図の宣言 → tus転送セッションの構築。
/// 実際のバイト転送はここでは開始せず、返された転送ハンドルを
/// 呼び出し側が明示的にstartすることで始まります。
pub mod error;
pub mod params;
pub mod source;

pub use error::UploadError;
pub use params::UploadParams;
pub use source::UploadSource;

use crate::api::client::Client;
use crate::api::error::ApiError;
use crate::api::request::RequestOptions;
use crate::api::types::UploadAttempt;
use crate::tus::{
    CompleteCallback, ErrorCallback, ProgressCallback, TransferCallbacks, TransferError,
    TusSession, TusUpload,
};
use reqwest::Method;

/// アップロード呼び出しのオプション
///
/// paramsは省略可能で、省略時は空のパラメータとして扱われる。
/// コールバックはすべて任意で、転送フェーズの通知にのみ使われる。
/// 転送開始前の失敗(サイズ解決・意図の宣言)はResultのErrとして返る。
#[derive(Default)]
pub struct UploadOptions {
    /// 動画メタデータとアップロード方式記述子
    pub params: Option<UploadParams>,

    /// 転送完了時に動画リソースURIと共に呼ばれる
    pub on_complete: Option<CompleteCallback>,

    /// 確認済みバイト数の進捗通知
    pub on_progress: Option<ProgressCallback>,

    /// 転送中の終端エラー通知
    pub on_error: Option<ErrorCallback>,
}

impl UploadOptions {
    /// 空のオプションを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// アップロードパラメータを設定
    pub fn params(mut self, params: UploadParams) -> Self {
        self.params = Some(params);
        self
    }

    /// 完了コールバックを設定
    pub fn on_complete(mut self, callback: impl FnOnce(&str) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// 進捗コールバックを設定
    pub fn on_progress(mut self, callback: impl FnMut(u64, u64) + Send + 'static) -> Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// エラーコールバックを設定
    pub fn on_error(mut self, callback: impl FnOnce(&TransferError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }
}

impl Client {
    /// 新しい動画リソースを作成してアップロードする
    ///
    /// アップロード意図を宣言し、返されたアップロードリンクに紐づく
    /// 転送ハンドルを返す。転送はこの呼び出しでは開始されない。
    ///
    /// # Errors
    /// - ファイルサイズの解決に失敗した場合(HTTPリクエストは発行されない)
    /// - 意図の宣言に失敗した場合
    pub async fn upload(
        &self,
        source: UploadSource,
        options: UploadOptions,
    ) -> Result<TusUpload, UploadError> {
        let mut options = options;
        let size = source.resolve_size()?;

        let mut params = options.params.take().unwrap_or_default();
        params.force_tus(size);

        let attempt = self
            .declare_intent("/me/videos?fields=uri,name,upload", &params)
            .await?;
        let resource_uri = attempt
            .uri
            .clone()
            .ok_or(UploadError::MalformedAttempt { field: "uri" })?;

        Ok(self.transfer_handle(source, size, attempt.upload.upload_link, resource_uri, options))
    }

    /// 既存の動画リソースのメディアを差し替える
    ///
    /// アップロード対象のファイル名をfile_nameとしてパラメータに付与する。
    /// 成功時の動画リソースURIには渡されたvideo_uriがそのまま使われる。
    pub async fn replace(
        &self,
        source: UploadSource,
        video_uri: &str,
        options: UploadOptions,
    ) -> Result<TusUpload, UploadError> {
        let mut options = options;
        let size = source.resolve_size()?;

        let mut params = options.params.take().unwrap_or_default();
        params.force_tus(size);
        if let Some(name) = source.file_name() {
            params.set_file_name(name);
        }

        let endpoint = format!("{}/versions?fields=upload", video_uri);
        let attempt = self.declare_intent(&endpoint, &params).await?;

        Ok(self.transfer_handle(
            source,
            size,
            attempt.upload.upload_link,
            video_uri.to_string(),
            options,
        ))
    }

    /// アップロード意図をAPIへ宣言する
    ///
    /// 失敗は下層のエラーを包んだ意図宣言エラーとして返す。
    async fn declare_intent(
        &self,
        endpoint: &str,
        params: &UploadParams,
    ) -> Result<UploadAttempt, UploadError> {
        let body = serde_json::to_value(params).map_err(|e| {
            UploadError::intent(ApiError::parse(format!(
                "Failed to serialize upload parameters: {}",
                e
            )))
        })?;

        self.request(
            RequestOptions::new(endpoint)
                .method(Method::POST)
                .json(body),
        )
        .await
        .map_err(UploadError::intent)
    }

    /// 宣言済みのアップロード意図から転送ハンドルを構築する
    fn transfer_handle(
        &self,
        source: UploadSource,
        size: u64,
        upload_link: String,
        resource_uri: String,
        options: UploadOptions,
    ) -> TusUpload {
        let session = TusSession::new(upload_link, size);
        let callbacks = TransferCallbacks {
            on_success: options.on_complete,
            on_progress: options.on_progress,
            on_error: options.on_error,
        };

        TusUpload::new(
            self.http_client().clone(),
            session,
            source,
            resource_uri,
            callbacks,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::Credentials;
    use httpmock::prelude::*;
    use httpmock::Method::PATCH;
    use serde_json::json;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tempfile::NamedTempFile;

    fn test_client(base_url: String) -> Client {
        Client::with_endpoint(base_url, Credentials::new("id", "secret"))
            .expect("Failed to create client")
            .with_access_token("token")
    }

    fn temp_video(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content).expect("Failed to write temp file");
        file
    }

    #[tokio::test]
    async fn test_missing_file_issues_no_http_call() {
        let server = MockServer::start_async().await;
        let any_request = server
            .mock_async(|when, then| {
                when.path_contains("");
                then.status(200);
            })
            .await;

        let client = test_client(server.base_url());
        let result = client
            .upload(
                UploadSource::path("/nonexistent/video.mp4"),
                UploadOptions::new(),
            )
            .await;

        let err = result.expect_err("upload should fail");
        assert!(err.to_string().contains("unable to locate file"));
        any_request.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_upload_returns_unstarted_handle() {
        let server = MockServer::start_async().await;
        let link = server.url("/tus/abc123");
        let link_for_mock = link.clone();
        let create = server
            .mock_async(move |when, then| {
                when.method(POST)
                    .path("/me/videos")
                    .query_param("fields", "uri,name,upload")
                    .header("Authorization", "Bearer token")
                    .json_body_partial(r#"{"upload": {"approach": "tus", "size": 11}}"#);
                then.status(201).json_body(json!({
                    "uri": "/videos/abc123",
                    "name": "Untitled",
                    "upload": {
                        "approach": "tus",
                        "size": 11,
                        "upload_link": link_for_mock
                    }
                }));
            })
            .await;
        let patch = server
            .mock_async(|when, then| {
                when.method(PATCH).path("/tus/abc123");
                then.status(204).header("Upload-Offset", "11");
            })
            .await;

        let file = temp_video(b"hello world");
        let client = test_client(server.base_url());

        let handle = client
            .upload(UploadSource::path(file.path()), UploadOptions::new())
            .await
            .expect("upload should succeed");

        assert_eq!(handle.endpoint(), link);
        assert_eq!(handle.size(), 11);
        assert_eq!(handle.resource_uri(), "/videos/abc123");
        create.assert_async().await;
        // 呼び出し側がstartするまでバイトは送られない
        patch.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_caller_upload_fields_survive_override() {
        let server = MockServer::start_async().await;
        let link = server.url("/tus/xyz");
        let create = server
            .mock_async(move |when, then| {
                when.method(POST).path("/me/videos").json_body_partial(
                    r#"{
                        "name": "My Video",
                        "upload": {"approach": "tus", "size": 5, "mime_type": "video/mp4"}
                    }"#,
                );
                then.status(201).json_body(json!({
                    "uri": "/videos/xyz",
                    "upload": {"upload_link": link}
                }));
            })
            .await;

        let file = temp_video(b"bytes");
        let client = test_client(server.base_url());

        let params = UploadParams::new()
            .name("My Video")
            .upload_field("approach", json!("post"))
            .upload_field("size", json!(1))
            .upload_field("mime_type", json!("video/mp4"));

        client
            .upload(
                UploadSource::path(file.path()),
                UploadOptions::new().params(params),
            )
            .await
            .expect("upload should succeed");

        create.assert_async().await;
    }

    #[tokio::test]
    async fn test_default_options_equal_empty_params() {
        let server = MockServer::start_async().await;
        let link = server.url("/tus/same");
        let create = server
            .mock_async(move |when, then| {
                when.method(POST)
                    .path("/me/videos")
                    .json_body(json!({"upload": {"approach": "tus", "size": 5}}));
                then.status(201).json_body(json!({
                    "uri": "/videos/same",
                    "upload": {"upload_link": link}
                }));
            })
            .await;

        let file = temp_video(b"bytes");
        let client = test_client(server.base_url());

        client
            .upload(UploadSource::path(file.path()), UploadOptions::new())
            .await
            .expect("default options should succeed");
        client
            .upload(
                UploadSource::path(file.path()),
                UploadOptions::new().params(UploadParams::new()),
            )
            .await
            .expect("empty params should succeed");

        // 両方の呼び出しが同一の意図ボディを生成する
        create.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn test_intent_failure_is_wrapped() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/me/videos");
                then.status(400)
                    .json_body(json!({"error": "Upload quota reached"}));
            })
            .await;

        let file = temp_video(b"bytes");
        let client = test_client(server.base_url());

        let result = client
            .upload(UploadSource::path(file.path()), UploadOptions::new())
            .await;

        let err = result.expect_err("upload should fail");
        assert!(matches!(err, UploadError::Intent { .. }));
        assert!(err.to_string().contains("unable to initiate an upload"));
    }

    #[tokio::test]
    async fn test_replace_attaches_file_name_and_propagates_uri() {
        let server = MockServer::start_async().await;
        let link = server.url("/tus/replace1");

        let file = temp_video(b"bytes");
        let basename = file
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();

        let link_for_mock = link.clone();
        let expected_body = format!(
            r#"{{"file_name": "{}", "upload": {{"approach": "tus", "size": 5}}}}"#,
            basename
        );
        let create = server
            .mock_async(move |when, then| {
                when.method(POST)
                    .path("/videos/123/versions")
                    .query_param("fields", "upload")
                    .json_body_partial(expected_body);
                then.status(201)
                    .json_body(json!({"upload": {"upload_link": link_for_mock}}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(PATCH).path("/tus/replace1");
                then.status(204).header("Upload-Offset", "5");
            })
            .await;

        let client = test_client(server.base_url());
        let completed = Arc::new(Mutex::new(None::<String>));
        let completed_clone = Arc::clone(&completed);

        let handle = client
            .replace(
                UploadSource::path(file.path()),
                "/videos/123",
                UploadOptions::new().on_complete(move |uri| {
                    *completed_clone.lock().unwrap() = Some(uri.to_string());
                }),
            )
            .await
            .expect("replace should succeed");

        assert_eq!(handle.resource_uri(), "/videos/123");

        let uri = handle.start().await.expect("transfer failed");

        assert_eq!(uri, "/videos/123");
        assert_eq!(completed.lock().unwrap().as_deref(), Some("/videos/123"));
        create.assert_async().await;
    }
}
