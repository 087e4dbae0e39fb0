/// tus方式の再開可能転送クライアント
///
/// 事前に交渉済みのエンドポイントに対してチャンク単位でバイト列を転送します。
/// オフセット交渉・チャンク分割・リトライはこのモジュールが所有し、
/// 上位のアップロードオーケストレーターは
/// {セッション構築 → ハンドル取得 → start} の契約だけに依存します。
pub mod error;

pub use error::TransferError;

use crate::config::APP_CONFIG;
use crate::upload::source::UploadSource;
use reqwest::header::CONTENT_TYPE;
use std::io::SeekFrom;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// tusプロトコルバージョン
const TUS_RESUMABLE: &str = "1.0.0";

/// 転送完了コールバック(動画リソースURIを受け取る)
pub type CompleteCallback = Box<dyn FnOnce(&str) + Send>;

/// 進捗コールバック(確認済みバイト数, 総バイト数)
pub type ProgressCallback = Box<dyn FnMut(u64, u64) + Send>;

/// 終端エラーコールバック
pub type ErrorCallback = Box<dyn FnOnce(&TransferError) + Send>;

/// 転送コールバック
///
/// コールバックの形はこの転送クライアントが発行するものに一致する:
/// 成功(リソースURI)、進捗(確認済みバイト数と総バイト数)、終端エラー。
/// すべて任意。
#[derive(Default)]
pub struct TransferCallbacks {
    pub on_success: Option<CompleteCallback>,
    pub on_progress: Option<ProgressCallback>,
    pub on_error: Option<ErrorCallback>,
}

/// 転送セッションの設定
///
/// リトライ遅延スケジュールとチャンクサイズの既定値はAPP_CONFIGから取られる。
#[derive(Debug, Clone)]
pub struct TusSession {
    /// 転送先エンドポイント(アップロード意図の宣言で取得したアップロードリンク)
    pub endpoint: String,

    /// 宣言済みの総バイト数
    pub size: u64,

    /// 一時的な障害に対するリトライ遅延スケジュール
    pub retry_delays: Vec<Duration>,

    /// チャンクサイズ(バイト)
    pub chunk_size: u64,
}

impl TusSession {
    /// 新しい転送セッション設定を作成
    pub fn new(endpoint: impl Into<String>, size: u64) -> Self {
        Self {
            endpoint: endpoint.into(),
            size,
            retry_delays: APP_CONFIG.upload.retry_delays(),
            chunk_size: APP_CONFIG.upload.chunk_size,
        }
    }

    /// リトライ遅延スケジュールを差し替える
    pub fn with_retry_delays(mut self, delays: Vec<Duration>) -> Self {
        self.retry_delays = delays;
        self
    }

    /// チャンクサイズを差し替える
    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }
}

/// 単一アップロードの転送ハンドル
///
/// 構築しただけでは転送は始まらない。呼び出し側が `start` で駆動する。
/// キャンセルは `start` のFutureを破棄することで行う。
pub struct TusUpload {
    http: reqwest::Client,
    session: TusSession,
    source: UploadSource,
    resource_uri: String,
    callbacks: TransferCallbacks,
}

impl std::fmt::Debug for TusUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TusUpload")
            .field("endpoint", &self.session.endpoint)
            .field("size", &self.session.size)
            .field("resource_uri", &self.resource_uri)
            .finish_non_exhaustive()
    }
}

impl TusUpload {
    /// 転送ハンドルを構築する
    pub fn new(
        http: reqwest::Client,
        session: TusSession,
        source: UploadSource,
        resource_uri: impl Into<String>,
        callbacks: TransferCallbacks,
    ) -> Self {
        Self {
            http,
            session,
            source,
            resource_uri: resource_uri.into(),
            callbacks,
        }
    }

    /// 転送先エンドポイント
    pub fn endpoint(&self) -> &str {
        &self.session.endpoint
    }

    /// 宣言済みの総バイト数
    pub fn size(&self) -> u64 {
        self.session.size
    }

    /// 成功時に報告される動画リソースURI
    pub fn resource_uri(&self) -> &str {
        &self.resource_uri
    }

    /// 転送を開始し、完了まで駆動する
    ///
    /// 成功時はon_successを呼び出してリソースURIを返す。
    /// 終端エラー時はon_errorを呼び出してErrを返す。
    /// 進捗はチャンクの確認ごとにon_progressへ通知される。
    pub async fn start(self) -> Result<String, TransferError> {
        let TusUpload {
            http,
            session,
            source,
            resource_uri,
            mut callbacks,
        } = self;

        match run(&http, &session, source, &mut callbacks.on_progress).await {
            Ok(()) => {
                if let Some(on_success) = callbacks.on_success {
                    on_success(&resource_uri);
                }
                Ok(resource_uri)
            }
            Err(e) => {
                if let Some(on_error) = callbacks.on_error {
                    on_error(&e);
                }
                Err(e)
            }
        }
    }
}

/// 転送ループ本体
///
/// チャンクのPATCH送信とオフセット前進を繰り返す。一時的な障害は
/// スケジュールに従ってリトライし、HEADでサーバー側オフセットを
/// 再同期してから続行する。PATCHの成功でリトライ回数はリセットされる。
async fn run(
    http: &reqwest::Client,
    session: &TusSession,
    source: UploadSource,
    on_progress: &mut Option<ProgressCallback>,
) -> Result<(), TransferError> {
    let mut reader = source.open().await?;
    let total = session.size;
    let chunk_size = session.chunk_size.max(1);
    let mut buf = vec![0u8; chunk_size.min(total.max(1)) as usize];

    let mut offset: u64 = 0;
    let mut attempt: usize = 0;

    while offset < total {
        let len = chunk_size.min(total - offset) as usize;
        reader.read_exact(&mut buf[..len]).await?;

        tracing::debug!(
            "PATCH {} offset={} chunk_len={}",
            session.endpoint,
            offset,
            len
        );

        match patch_chunk(http, session, offset, buf[..len].to_vec()).await {
            Ok(acked) => {
                // サーバーがチャンクの一部しか確認しなかった場合は読み直す
                if acked != offset + len as u64 {
                    reader.seek(SeekFrom::Start(acked)).await?;
                }
                offset = acked;
                attempt = 0;
                if let Some(cb) = on_progress.as_mut() {
                    cb(offset, total);
                }
            }
            Err(fault) if fault.is_transient() => {
                if attempt >= session.retry_delays.len() {
                    return Err(TransferError::exhausted(attempt, &fault));
                }
                let delay = session.retry_delays[attempt];
                attempt += 1;
                tracing::warn!(
                    "transient transfer fault at offset {} (attempt {}): {}; retrying in {:?}",
                    offset,
                    attempt,
                    fault,
                    delay
                );
                tokio::time::sleep(delay).await;
                offset = head_offset(http, session).await.unwrap_or(offset);
                reader.seek(SeekFrom::Start(offset)).await?;
            }
            Err(fault) => return Err(fault),
        }
    }

    Ok(())
}

/// 単一チャンクをPATCHで送信し、サーバーが確認した新しいオフセットを返す
async fn patch_chunk(
    http: &reqwest::Client,
    session: &TusSession,
    offset: u64,
    chunk: Vec<u8>,
) -> Result<u64, TransferError> {
    let response = http
        .patch(&session.endpoint)
        .header("Tus-Resumable", TUS_RESUMABLE)
        .header("Upload-Offset", offset.to_string())
        .header(CONTENT_TYPE, "application/offset+octet-stream")
        .body(chunk)
        .send()
        .await
        .map_err(|e| TransferError::network(format!("PATCH {} failed: {}", session.endpoint, e)))?;

    let status = response.status();
    let acked = response
        .headers()
        .get("Upload-Offset")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(TransferError::rejected(status.as_u16(), message));
    }

    match acked {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| TransferError::bad_offset(raw.clone())),
        None => Err(TransferError::bad_offset("missing")),
    }
}

/// HEADリクエストでサーバー側の確認済みオフセットを再同期する
///
/// 取得できない場合はNoneを返し、呼び出し側は現在のオフセットを維持する。
async fn head_offset(http: &reqwest::Client, session: &TusSession) -> Option<u64> {
    let response = http
        .head(&session.endpoint)
        .header("Tus-Resumable", TUS_RESUMABLE)
        .send()
        .await
        .ok()?;

    if !response.status().is_success() {
        return None;
    }

    response
        .headers()
        .get("Upload-Offset")?
        .to_str()
        .ok()?
        .parse()
        .ok()
}
