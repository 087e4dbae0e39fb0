/// 設定管理モジュール
///
/// ビルド時に config.toml から埋め込まれる静的設定(APP_CONFIG)を提供します。
/// 認証情報やトークンは実行時に埋め込み側アプリケーションから渡されるため、
/// このクレートは実行時設定ファイルを持ちません。
pub mod app;

pub use app::{APP_CONFIG, AppConfig};
