/// アプリケーション設定モジュール
///
/// ビルド時に config.toml から読み込まれる静的設定を管理します。
/// これらの設定は実行時には変更できません。
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::time::Duration;

/// ビルド時に埋め込まれた config.toml から生成されるグローバル定数
pub static APP_CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::load);

/// アプリケーション全体の設定
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub upload: UploadConfig,
}

/// API関連の設定
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Vimeo API のベースURL
    pub endpoint: String,

    /// APIリクエストのタイムアウト(秒)
    pub timeout_seconds: u64,

    /// APIバージョン指定付きのAcceptヘッダー値
    pub accept: String,
}

/// アップロード関連の設定
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// tus転送のチャンクサイズ (バイト)
    pub chunk_size: u64,

    /// 一時的な転送障害に対するリトライ遅延 (ミリ秒)
    pub retry_delays_ms: Vec<u64>,
}

impl AppConfig {
    /// ビルド時に埋め込まれたconfig.tomlから設定を読み込む
    ///
    /// # Panics
    /// 設定ファイルのパースに失敗した場合はパニックします。
    /// これはビルド時設定なので、実行時エラーではなくビルドの欠陥として扱います。
    fn load() -> Self {
        const CONFIG_STR: &str = include_str!("../../config.toml");
        toml::from_str(CONFIG_STR)
            .expect("Failed to parse embedded config.toml. This is a build-time configuration error.")
    }
}

impl UploadConfig {
    /// リトライ遅延をDurationのリストとして返す
    pub fn retry_delays(&self) -> Vec<Duration> {
        self.retry_delays_ms
            .iter()
            .map(|ms| Duration::from_millis(*ms))
            .collect()
    }
}
