use super::{with_spinner, Output};
use crate::api::ApiClient;
use crate::capture::{collect_images, prepare_uploads};
use crate::cli::VerifyCommand;
use crate::error::Result;
use crate::present;
use serde_json::json;
use titweng_common::validation::check_tag_format;
use titweng_common::VerificationOutcome;

pub async fn run(client: &ApiClient, command: VerifyCommand, out: &Output) -> Result<()> {
    let default_location = client.context().config().default_location.clone();

    match command {
        VerifyCommand::Tag {
            tag,
            location,
            strict_tag,
        } => {
            if strict_tag {
                check_tag_format(tag.trim())?;
            }
            let location = location.or(default_location);
            let outcome = with_spinner(
                "Looking up tag...",
                client.verify_tag(&tag, location.as_deref()),
            )
            .await?;
            show_outcome(client, &outcome, out)
        }

        VerifyCommand::Nose { paths, location } => {
            let config = client.context().config();
            let images = collect_images(&paths)?;
            let uploads = prepare_uploads(&images, config.max_image_size, config.jpeg_quality)?;

            let location = location.or(default_location);
            let outcome = with_spinner(
                "Verifying nose print...",
                client.verify_nose(uploads, location.as_deref()),
            )
            .await?;
            show_outcome(client, &outcome, out)
        }

        VerifyCommand::Logs { limit } => {
            let mut logs = client.verification_logs().await?;
            if let Some(limit) = limit {
                logs.truncate(limit);
            }
            out.emit(&logs, || {
                if logs.is_empty() {
                    "No verification logs found\n".to_string()
                } else {
                    present::log_table(&logs)
                }
            })
        }
    }
}

fn show_outcome(client: &ApiClient, outcome: &VerificationOutcome, out: &Output) -> Result<()> {
    let classification = outcome.classify();
    let base_url = client.context().config().base_url().to_string();
    let value = json!({
        "classification": classification,
        "result": outcome,
    });
    out.emit(&value, || present::outcome(outcome, &base_url))
}
