/// アップロードパラメータ
///
/// 呼び出し側が指定する動画メタデータと、アップロード方式の記述子。
/// 方式記述子の approach と size はオーケストレーターが常に上書きするが、
/// それ以外の呼び出し側指定のサブフィールドは保持される。
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadParams {
    /// 動画メタデータ(name, description等)
    #[serde(flatten)]
    pub metadata: Map<String, Value>,

    /// アップロード方式の記述子
    pub upload: Map<String, Value>,
}

impl UploadParams {
    /// 空のアップロードパラメータを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 動画名を設定する
    pub fn name(self, name: impl Into<String>) -> Self {
        self.field("name", Value::String(name.into()))
    }

    /// メタデータフィールドを設定する
    pub fn field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// アップロード方式のサブフィールドを設定する
    pub fn upload_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.upload.insert(key.into(), value);
        self
    }

    /// tus方式と解決済みサイズを強制する
    ///
    /// 呼び出し側が指定した approach / size は上書きされる。
    pub(crate) fn force_tus(&mut self, size: u64) {
        self.upload
            .insert("approach".to_string(), Value::String("tus".to_string()));
        self.upload.insert("size".to_string(), Value::from(size));
    }

    /// file_nameメタデータを設定する(メディア差し替え用)
    pub(crate) fn set_file_name(&mut self, name: String) {
        self.metadata
            .insert("file_name".to_string(), Value::String(name));
    }
}
