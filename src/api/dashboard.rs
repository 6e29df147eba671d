use super::client::ApiClient;
use crate::error::Result;
use titweng_common::{build_feed, Activity, DashboardStats, ReportList, VerificationLogList};

/// ダッシュボード表示に必要なデータ一式
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub stats: DashboardStats,
    pub activity: Vec<Activity>,
}

impl ApiClient {
    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.get_json("/admin/dashboard/stats").await
    }

    /// 統計・照合履歴・通報を並行取得し、最近の活動にまとめる
    pub async fn dashboard(&self) -> Result<DashboardData> {
        let (stats, logs, reports) = tokio::try_join!(
            self.dashboard_stats(),
            self.get_json::<VerificationLogList>("/admin/verifications"),
            self.get_json::<ReportList>("/admin/reports"),
        )?;

        Ok(DashboardData {
            stats,
            activity: build_feed(&logs.verifications, &reports.reports),
        })
    }
}
