use super::client::{path_segment, text_form, ApiClient};
use crate::error::Result;
use titweng_common::validation::normalize_tag;

impl ApiClient {
    /// 受領証の情報（形式はバックエンド依存のためJSONのまま返す）
    pub async fn receipt_info(&self, tag: &str) -> Result<serde_json::Value> {
        let tag = normalize_tag(tag)?;
        self.post_form("/admin/receipt/info", text_form(vec![("cow_tag", tag)])).await
    }

    /// 受領証PDF
    pub async fn download_receipt(&self, tag: &str) -> Result<Vec<u8>> {
        let tag = normalize_tag(tag)?;
        self.get_bytes(&format!("/admin/receipt/{}", path_segment(&tag))).await
    }
}

/// 保存ファイル名（cow-receipt-TW-2025-BWF-0042.pdf）
pub fn receipt_file_name(tag: &str) -> String {
    format!("cow-receipt-{}.pdf", tag.trim())
}
