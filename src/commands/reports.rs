use super::{with_spinner, Output};
use crate::api::{receipt_file_name, ApiClient, ReportFilter};
use crate::cli::{ReceiptCommand, ReportCommand};
use crate::error::Result;
use crate::present;
use std::path::PathBuf;

pub async fn run(client: &ApiClient, command: ReportCommand, out: &Output) -> Result<()> {
    match command {
        ReportCommand::List { status, report_type } => {
            let filter = ReportFilter {
                status: status.map(|s| s.as_str().to_string()),
                report_type,
            };
            let reports = client.list_reports(&filter).await?;
            out.emit(&reports, || {
                if reports.is_empty() {
                    "No reports found\n".to_string()
                } else {
                    present::report_table(&reports)
                }
            })
        }

        ReportCommand::Show { id } => {
            let report = client.find_report(id).await?;
            out.emit(&report, || present::report_details(&report))
        }

        ReportCommand::Reply { id, message, status } => {
            let response = client.reply_report(id, &message, status.as_str()).await?;
            out.emit(&response, || {
                format!(
                    "✔ {}\n",
                    response
                        .message
                        .clone()
                        .unwrap_or_else(|| format!("Replied to RPT-{:03} ({})", id, status.as_str()))
                )
            })
        }
    }
}

pub async fn receipt(client: &ApiClient, command: ReceiptCommand, out: &Output) -> Result<()> {
    match command {
        ReceiptCommand::Info { tag } => {
            let info = client.receipt_info(&tag).await?;
            // 形式が決まっていないため常にJSONで表示
            println!("{}", serde_json::to_string_pretty(&info)?);
            Ok(())
        }

        ReceiptCommand::Download { tag, output } => {
            let bytes = with_spinner("Downloading receipt...", client.download_receipt(&tag)).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(receipt_file_name(&tag)));
            std::fs::write(&path, &bytes)?;
            out.note(format!("✔ Saved {} ({} bytes)", path.display(), bytes.len()));
            Ok(())
        }
    }
}
