/// アップロード対象の指定
///
/// ファイルパス、または既にオープン済みのファイルを受け付ける。
/// パス指定の場合はアップロード開始時に同期的にstatしてサイズを解決し、
/// オープン済みファイルの場合は宣言済みのサイズをそのまま使う。
use crate::upload::error::UploadError;
use std::fs::File;
use std::path::PathBuf;

pub enum UploadSource {
    /// ディスク上のファイルパス
    Path(PathBuf),

    /// オープン済みのファイルと宣言済みサイズ
    File {
        file: File,
        size: u64,
        name: Option<String>,
    },
}

impl UploadSource {
    /// ファイルパスからアップロード対象を作成
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// オープン済みファイルからアップロード対象を作成
    pub fn file(file: File, size: u64) -> Self {
        Self::File {
            file,
            size,
            name: None,
        }
    }

    /// 名前付きのオープン済みファイルからアップロード対象を作成
    pub fn named_file(file: File, size: u64, name: impl Into<String>) -> Self {
        Self::File {
            file,
            size,
            name: Some(name.into()),
        }
    }

    /// アップロードするバイト数を解決する
    ///
    /// パス指定の場合は同期的にメタデータを取得する。
    /// 取得に失敗した場合(存在しない、ディレクトリ等)はエラー。
    pub(crate) fn resolve_size(&self) -> Result<u64, UploadError> {
        match self {
            Self::Path(path) => {
                let display = path.display().to_string();
                let metadata =
                    std::fs::metadata(path).map_err(|_| UploadError::file_unreadable(&display))?;
                if !metadata.is_file() {
                    return Err(UploadError::file_unreadable(&display));
                }
                Ok(metadata.len())
            }
            Self::File { size, .. } => Ok(*size),
        }
    }

    /// 転送先に通知するファイル名を解決する
    ///
    /// パスのベース名、またはオープン済みファイルの宣言名。
    pub(crate) fn file_name(&self) -> Option<String> {
        match self {
            Self::Path(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            Self::File { name, .. } => name.clone(),
        }
    }

    /// 転送用の非同期リーダーを開く
    pub(crate) async fn open(self) -> std::io::Result<tokio::fs::File> {
        match self {
            Self::Path(path) => tokio::fs::File::open(path).await,
            Self::File { file, .. } => Ok(tokio::fs::File::from_std(file)),
        }
    }
}

impl From<PathBuf> for UploadSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&str> for UploadSource {
    fn from(path: &str) -> Self {
        Self::path(path)
    }
}
