//! 端末への表示
//!
//! 文字列を組み立てて返す（出力はコマンド側）。色は端末の場合のみ付く。

use crate::api::SystemStatus;
use chrono::{DateTime, Utc};
use dialoguer::console::{style, Style};
use titweng_common::verification::format_percent;
use titweng_common::{
    parse_timestamp, similarity_tone, time_ago, Activity, Cow, CowSummary, DashboardStats, Owner, Report, Tone,
    VerificationLog, VerificationOutcome,
};

const MISSING: &str = "-";

pub fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Success => Style::new().green(),
        Tone::Warning => Style::new().yellow(),
        Tone::Destructive => Style::new().red(),
    }
}

fn or_missing(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(MISSING)
}

/// 日時を "2025-01-15 09:30" 形式に（解釈できなければそのまま）
fn short_date(value: Option<&str>) -> String {
    match value {
        Some(raw) => parse_timestamp(raw)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| raw.to_string()),
        None => MISSING.to_string(),
    }
}

/// 列幅をそろえた表
struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<(String, Option<Style>)>>,
}

impl Table {
    fn new(headers: Vec<&'static str>) -> Self {
        Self { headers, rows: Vec::new() }
    }

    fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells.into_iter().map(|c| (c, None)).collect());
    }

    fn styled_row(&mut self, cells: Vec<(String, Option<Style>)>) {
        self.rows.push(cells);
    }

    fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, (cell, _)) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(i) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }

        let mut out = String::new();
        let header: Vec<String> = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| style(pad(h, *w)).bold().to_string())
            .collect();
        out.push_str(header.join("  ").trim_end());
        out.push('\n');

        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|((cell, cell_style), w)| {
                    let padded = pad(cell, *w);
                    match cell_style {
                        Some(s) => s.apply_to(padded).to_string(),
                        None => padded,
                    }
                })
                .collect();
            out.push_str(cells.join("  ").trim_end());
            out.push('\n');
        }
        out
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// 照合結果
pub fn outcome(result: &VerificationOutcome, base_url: &str) -> String {
    let classification = result.classify();
    let tone = tone_style(classification.tone);
    let mut out = format!(
        "{}\n",
        tone.apply_to(format!("{} {}", classification.icon.symbol(), classification.title)).bold()
    );

    match result {
        VerificationOutcome::NoMatch { message } => {
            out.push_str(&format!("{}\n", message));
        }
        VerificationOutcome::Found { cow, verified, method, .. } => {
            out.push_str(&cow_summary(cow, base_url));
            if let Some(method) = method {
                out.push_str(&format!("  Method:   {}\n", method));
            }
            if *verified == Some(true) {
                out.push_str("  Status:   Verified\n");
            }
        }
    }
    out
}

fn cow_summary(cow: &CowSummary, base_url: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("  Tag:      {}\n", or_missing(cow.cow_tag.as_deref())));
    out.push_str(&format!("  Breed:    {}\n", or_missing(cow.breed.as_deref())));
    out.push_str(&format!("  Color:    {}\n", or_missing(cow.color.as_deref())));
    out.push_str(&format!("  Owner:    {}\n", or_missing(cow.owner_name.as_deref())));
    if let Some(url) = cow.facial_image_url.as_deref().filter(|u| !u.is_empty()) {
        out.push_str(&format!("  Face:     {}\n", image_url(base_url, url)));
    }
    out
}

/// 相対パスの画像URLをベースURLで補う
pub fn image_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else if path.starts_with('/') {
        format!("{}{}", base_url, path)
    } else {
        format!("{}/{}", base_url, path)
    }
}

pub fn cow_table(cows: &[&Cow]) -> String {
    let mut table = Table::new(vec!["TAG", "OWNER", "BREED", "COLOR", "AGE", "REGISTERED"]);
    for cow in cows {
        table.row(vec![
            cow.cow_tag.clone(),
            or_missing(cow.owner_full_name.as_deref()).to_string(),
            or_missing(cow.breed.as_deref()).to_string(),
            or_missing(cow.color.as_deref()).to_string(),
            cow.age.map(|a| a.to_string()).unwrap_or_else(|| MISSING.to_string()),
            short_date(cow.created_at.as_deref()),
        ]);
    }
    table.render()
}

pub fn cow_details(cow: &Cow, base_url: &str) -> String {
    let mut out = format!("{}\n", style(&cow.cow_tag).bold());
    if let Some(id) = &cow.cow_id {
        out.push_str(&format!("  ID:           {}\n", id));
    }
    out.push_str(&format!("  Breed:        {}\n", or_missing(cow.breed.as_deref())));
    out.push_str(&format!("  Color:        {}\n", or_missing(cow.color.as_deref())));
    out.push_str(&format!(
        "  Age:          {}\n",
        cow.age.map(|a| format!("{} years", a)).unwrap_or_else(|| MISSING.to_string())
    ));
    out.push_str(&format!("  Registered:   {}\n", short_date(cow.created_at.as_deref())));
    out.push_str("Owner\n");
    out.push_str(&format!("  Name:         {}\n", or_missing(cow.owner_full_name.as_deref())));
    out.push_str(&format!("  Phone:        {}\n", or_missing(cow.owner_phone.as_deref())));
    out.push_str(&format!("  Email:        {}\n", or_missing(cow.owner_email.as_deref())));
    out.push_str(&format!("  Address:      {}\n", or_missing(cow.owner_address.as_deref())));
    out.push_str(&format!("  National ID:  {}\n", or_missing(cow.owner_national_id.as_deref())));
    if let Some(url) = cow.facial_image_url.as_deref().filter(|u| !u.is_empty()) {
        out.push_str(&format!("  Face image:   {}\n", image_url(base_url, url)));
    }
    if !cow.nose_print_images.is_empty() {
        out.push_str(&format!("  Nose prints:  {}\n", cow.nose_print_images.len()));
    }
    out
}

pub fn owner_table(owners: &[&Owner]) -> String {
    let mut table = Table::new(vec!["NAME", "PHONE", "EMAIL", "ADDRESS", "NATIONAL ID", "REGISTERED"]);
    for owner in owners {
        table.row(vec![
            or_missing(owner.full_name.as_deref()).to_string(),
            or_missing(owner.phone.as_deref()).to_string(),
            or_missing(owner.email.as_deref()).to_string(),
            or_missing(owner.address.as_deref()).to_string(),
            or_missing(owner.national_id.as_deref()).to_string(),
            short_date(owner.created_at.as_deref()),
        ]);
    }
    table.render()
}

/// 照合履歴（類似度は照合結果と同じ閾値で色分け）
pub fn log_table(logs: &[VerificationLog]) -> String {
    let mut table = Table::new(vec!["DATE", "METHOD", "TAG", "SIMILARITY", "RESULT", "LOCATION"]);
    for log in logs {
        let similarity = match log.similarity_score {
            Some(score) => (format!("{}%", format_percent(score)), Some(tone_style(similarity_tone(score)))),
            None => (MISSING.to_string(), None),
        };
        let result = if log.success {
            ("Success".to_string(), Some(tone_style(Tone::Success)))
        } else {
            ("Failed".to_string(), Some(tone_style(Tone::Destructive)))
        };

        table.styled_row(vec![
            (short_date(log.created_at.as_deref()), None),
            (log.method_label().to_string(), None),
            (log.cow_tag.clone().unwrap_or_else(|| "Unknown".to_string()), None),
            similarity,
            result,
            (or_missing(log.location.as_deref()).to_string(), None),
        ]);
    }
    table.render()
}

fn report_status_style(report: &Report) -> Style {
    match report.status.as_str() {
        "resolved" => tone_style(Tone::Success),
        "pending" => tone_style(Tone::Destructive),
        _ => tone_style(Tone::Warning),
    }
}

pub fn report_table(reports: &[Report]) -> String {
    let mut table = Table::new(vec!["ID", "TYPE", "STATUS", "SUBJECT", "COW", "REPORTER", "DATE"]);
    for report in reports {
        table.styled_row(vec![
            (report.display_id(), None),
            (or_missing(report.report_type.as_deref()).to_string(), None),
            (report.status_label(), Some(report_status_style(report))),
            (or_missing(report.subject.as_deref()).to_string(), None),
            (or_missing(report.cow_tag.as_deref()).to_string(), None),
            (or_missing(report.reporter_name.as_deref()).to_string(), None),
            (short_date(report.created_at.as_deref()), None),
        ]);
    }
    table.render()
}

pub fn report_details(report: &Report) -> String {
    let mut out = format!(
        "{}  {}\n",
        style(report.display_id()).bold(),
        report_status_style(report).apply_to(report.status_label())
    );
    out.push_str(&format!("  Type:      {}\n", or_missing(report.report_type.as_deref())));
    out.push_str(&format!("  Subject:   {}\n", or_missing(report.subject.as_deref())));
    out.push_str(&format!("  Cow:       {}\n", or_missing(report.cow_tag.as_deref())));
    out.push_str(&format!("  Location:  {}\n", or_missing(report.location.as_deref())));
    out.push_str(&format!("  Date:      {}\n", short_date(report.created_at.as_deref())));
    out.push_str("Reporter\n");
    out.push_str(&format!("  Name:      {}\n", or_missing(report.reporter_name.as_deref())));
    out.push_str(&format!("  Phone:     {}\n", or_missing(report.reporter_phone.as_deref())));
    out.push_str(&format!("  Email:     {}\n", or_missing(report.reporter_email.as_deref())));
    out.push_str(&format!("Message\n  {}\n", or_missing(report.message.as_deref())));
    if let Some(reply) = report.admin_reply.as_deref().filter(|r| !r.is_empty()) {
        out.push_str(&format!("Admin reply\n  {}\n", reply));
    }
    out
}

fn count(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "0".to_string())
}

pub fn stats(stats: &DashboardStats) -> String {
    let rate = stats
        .verification_success_rate
        .map(|r| format!("{:.1}% success rate", r))
        .unwrap_or_else(|| "no data".to_string());

    let mut table = Table::new(vec!["", "TOTAL", ""]);
    table.row(vec![
        "Total cattle".to_string(),
        count(stats.total_cows),
        format!("+{} this month", count(stats.new_cows_this_month)),
    ]);
    table.row(vec![
        "Registered owners".to_string(),
        count(stats.total_owners),
        format!("+{} this month", count(stats.new_owners_this_month)),
    ]);
    table.row(vec![
        "Verifications today".to_string(),
        count(stats.daily_verifications),
        rate,
    ]);
    table.row(vec![
        "Pending reports".to_string(),
        count(stats.pending_reports),
        format!("{} urgent", count(stats.urgent_reports)),
    ]);
    table.render()
}

pub fn activity_feed(feed: &[Activity], now: DateTime<Utc>) -> String {
    if feed.is_empty() {
        return "No recent activity\n".to_string();
    }

    let mut out = String::new();
    for activity in feed {
        let marker = if activity.success {
            tone_style(Tone::Success).apply_to("●")
        } else {
            tone_style(Tone::Warning).apply_to("●")
        };
        let when = activity
            .occurred_at
            .map(|at| time_ago(at, now))
            .unwrap_or_else(|| MISSING.to_string());
        out.push_str(&format!("{} {}  ({})\n", marker, activity.message, when));
    }
    out
}

pub fn system_status(status: &SystemStatus) -> String {
    let ok = |healthy: bool| {
        if healthy {
            tone_style(Tone::Success).apply_to("healthy").to_string()
        } else {
            tone_style(Tone::Destructive).apply_to("unhealthy").to_string()
        }
    };

    let health = &status.health;
    let mut out = format!("API:       {}", ok(health.is_healthy()));
    if let Some(message) = health.message.as_deref() {
        out.push_str(&format!("  {}", message));
    }
    out.push('\n');

    out.push_str(&format!("Database:  {}", ok(health.database_connected())));
    if let Some(message) = health.database_message.as_deref() {
        out.push_str(&format!("  {}", message));
    }
    out.push('\n');

    let email = &status.email;
    let email_state = if email.is_success() {
        tone_style(Tone::Success).apply_to("configured").to_string()
    } else {
        tone_style(Tone::Destructive).apply_to(or_missing(email.status.as_deref())).to_string()
    };
    out.push_str(&format!("Email:     {}", email_state));
    if let Some(message) = email.message.as_deref() {
        out.push_str(&format!("  {}", message));
    }
    out.push('\n');
    out
}
