//! Vimeo APIクライアント
//!
//! OAuth2の認可フロー、認証付きの汎用APIリクエスト、
//! tus方式の再開可能アップロードを提供するSDKクレートです。
//!
//! アップロードは2段階で行います。`upload` / `replace` がアップロード意図を
//! APIへ宣言して転送ハンドルを返し、呼び出し側がハンドルを `start` することで
//! 実際のバイト転送が始まります。
//!
//! # 使用例
//!
//! ```no_run
//! use vimeo::{Client, Credentials, UploadOptions, UploadSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(Credentials::new("client_id", "client_secret"))?
//!     .with_access_token("access_token");
//!
//! let handle = client
//!     .upload(
//!         UploadSource::path("video.mp4"),
//!         UploadOptions::new()
//!             .on_progress(|sent, total| println!("{} / {} bytes", sent, total)),
//!     )
//!     .await?;
//!
//! // 転送は明示的に開始する
//! let video_uri = handle.start().await?;
//! println!("uploaded: {}", video_uri);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod tus;
pub mod upload;

pub use api::auth::{Credentials, Scope};
pub use api::client::Client;
pub use api::error::ApiError;
pub use api::request::{Body, RequestOptions};
pub use api::types::{TokenResponse, UploadAttempt, UploadInfo};
pub use tus::{TransferCallbacks, TransferError, TusSession, TusUpload};
pub use upload::{UploadError, UploadOptions, UploadParams, UploadSource};
