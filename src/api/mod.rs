//! 管理APIの呼び出し
//!
//! 画面ごとの呼び出しは [`ApiClient`] のメソッドとして各ファイルに分ける。

mod auth;
mod cattle;
mod client;
mod dashboard;
mod owners;
mod receipt;
mod reports;
mod system;
mod verification;

pub use cattle::NewCattle;
pub use client::{jpeg_part, path_segment, text_form, ApiClient};
pub use dashboard::DashboardData;
pub use receipt::receipt_file_name;
pub use reports::ReportFilter;
pub use system::SystemStatus;
