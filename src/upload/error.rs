/// アップロード層のエラー定義
///
/// アップロードの開始(サイズ解決と意図の宣言)に失敗した場合のエラー。
/// 転送中のエラーは転送層のTransferErrorとして扱われる。
use crate::api::error::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    /// アップロード対象のファイルが見つからない・読めない
    #[error("unable to locate file to upload: {path}")]
    FileUnreadable { path: String },

    /// アップロード意図の宣言に失敗
    #[error("unable to initiate an upload: {source}")]
    Intent {
        #[source]
        source: ApiError,
    },

    /// サーバーの応答に必要なフィールドが欠落
    #[error("upload attempt response is missing required field: {field}")]
    MalformedAttempt { field: &'static str },
}

impl UploadError {
    /// ファイル読み取り不能エラーを作成
    pub(crate) fn file_unreadable(path: impl Into<String>) -> Self {
        Self::FileUnreadable { path: path.into() }
    }

    /// 意図宣言エラーを作成
    pub(crate) fn intent(source: ApiError) -> Self {
        Self::Intent { source }
    }
}
