use super::{with_spinner, Output};
use crate::api::ApiClient;
use crate::error::Result;
use crate::present;
use chrono::Utc;
use serde_json::json;

pub async fn dashboard(client: &ApiClient, out: &Output) -> Result<()> {
    let data = with_spinner("Loading dashboard...", client.dashboard()).await?;

    let value = json!({
        "stats": data.stats,
        "recent_activity": data.activity,
    });
    out.emit(&value, || {
        format!(
            "{}\nRecent activity\n{}",
            present::stats(&data.stats),
            present::activity_feed(&data.activity, Utc::now())
        )
    })
}
