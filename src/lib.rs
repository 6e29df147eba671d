//! Titweng 家畜登録システムの管理クライアント
//!
//! 照合結果の分類などの純粋なロジックは `titweng-common` にあり、
//! このクレートはAPI呼び出し・画像の前処理・CLIを受け持つ。

pub mod api;
pub mod capture;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod present;
pub mod scope;
pub mod session;
pub mod storage;

pub use api::ApiClient;
pub use context::AppContext;
pub use error::{AdminError, ErrorKind, Result};
pub use scope::RequestScope;
