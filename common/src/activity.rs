//! ダッシュボードの最近のアクティビティ
//!
//! 照合履歴の先頭3件と通報の先頭2件をまとめ、新しい順に5件まで並べる。

use crate::types::{Report, VerificationLog};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

const VERIFICATIONS_IN_FEED: usize = 3;
const REPORTS_IN_FEED: usize = 2;
const FEED_LENGTH: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Verification,
    Report,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub kind: ActivityKind,
    pub message: String,
    /// 成功した照合のみtrue
    pub success: bool,
    pub occurred_at: Option<DateTime<Utc>>,
}

/// バックエンドの日時文字列を解釈する（タイムゾーン無しはUTC扱い）
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

/// 経過時間の表示（"5 minutes ago" など）
pub fn time_ago(past: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - past).num_minutes();
    let hours = minutes / 60;
    let days = hours / 24;

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{} minutes ago", minutes)
    } else if hours < 24 {
        format!("{} hours ago", hours)
    } else {
        format!("{} days ago", days)
    }
}

/// 照合履歴と通報からフィードを組み立てる
pub fn build_feed(logs: &[VerificationLog], reports: &[Report]) -> Vec<Activity> {
    let verifications = logs.iter().take(VERIFICATIONS_IN_FEED).map(|log| {
        let tag = log.cow_tag.as_deref().unwrap_or("Unknown");
        let message = if log.success {
            format!("Cow {} verified successfully", tag)
        } else {
            format!("Verification failed for {}", tag)
        };
        Activity {
            kind: ActivityKind::Verification,
            message,
            success: log.success,
            occurred_at: log.created_at.as_deref().and_then(parse_timestamp),
        }
    });

    let reports = reports.iter().take(REPORTS_IN_FEED).map(|report| Activity {
        kind: ActivityKind::Report,
        message: format!(
            "New {} report: {}",
            report.report_type.as_deref().unwrap_or("general"),
            report.subject.as_deref().unwrap_or("(no subject)")
        ),
        success: false,
        occurred_at: report.created_at.as_deref().and_then(parse_timestamp),
    });

    let mut feed: Vec<Activity> = verifications.chain(reports).collect();
    // 新しい順、日時不明は末尾
    feed.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    feed.truncate(FEED_LENGTH);
    feed
}
