use super::client::{text_form, ApiClient};
use crate::error::{AdminError, Result};
use serde::Serialize;
use titweng_common::{ApiMessage, Report, ReportList};

/// 通報一覧の絞り込み条件
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_type: Option<String>,
}

impl ApiClient {
    pub async fn list_reports(&self, filter: &ReportFilter) -> Result<Vec<Report>> {
        let list: ReportList = self.get_query("/admin/reports", filter).await?;
        Ok(list.reports)
    }

    /// 一覧から1件を引く（個別取得APIは無い）
    pub async fn find_report(&self, id: i64) -> Result<Report> {
        self.list_reports(&ReportFilter::default())
            .await?
            .into_iter()
            .find(|report| report.id == id)
            .ok_or_else(|| AdminError::NotFound(format!("report RPT-{:03}", id)))
    }

    pub async fn reply_report(&self, id: i64, reply: &str, status: &str) -> Result<ApiMessage> {
        if reply.trim().is_empty() {
            return Err(AdminError::Validation("Reply message cannot be empty".into()));
        }
        let form = text_form(vec![
            ("admin_reply", reply.trim().to_string()),
            ("status", status.to_string()),
        ]);
        let response = self.post_form(&format!("/admin/reports/{}/reply", id), form).await?;
        tracing::info!(report_id = id, status, "replied to report");
        Ok(response)
    }
}
