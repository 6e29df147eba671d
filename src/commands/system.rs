use super::{confirm, with_spinner, Output};
use crate::api::ApiClient;
use crate::cli::SystemCommand;
use crate::error::Result;
use crate::present;
use serde_json::json;

pub async fn run(client: &ApiClient, command: SystemCommand, out: &Output) -> Result<()> {
    match command {
        SystemCommand::Health => {
            let health = client.health().await?;
            out.emit(&health, || {
                format!(
                    "API:       {}\nDatabase:  {}\n",
                    health.status.as_deref().unwrap_or("unknown"),
                    health.database_status.as_deref().unwrap_or("unknown")
                )
            })
        }

        SystemCommand::EmailConfig => {
            let check = client.test_email_config().await?;
            out.emit(&check, || {
                format!(
                    "{}  {}\n",
                    check.status.as_deref().unwrap_or("unknown"),
                    check.message.as_deref().unwrap_or("")
                )
            })
        }

        SystemCommand::MlModels => {
            let models = with_spinner("Checking ML models...", client.test_ml_models()).await?;
            println!("{}", serde_json::to_string_pretty(&models)?);
            Ok(())
        }

        SystemCommand::TestEmail { email } => {
            let response = client.send_test_email(&email).await?;
            out.emit(&response, || format!("✔ Test email sent to {}\n", email.trim()))
        }

        SystemCommand::SetupDb { yes } => {
            if !confirm("Create or migrate the database tables?", yes)? {
                out.note("Cancelled");
                return Ok(());
            }
            let response = with_spinner("Setting up database...", client.setup_database()).await?;
            out.emit(&response, || "✔ Database setup completed\n".to_string())
        }

        SystemCommand::Status => {
            let status = with_spinner("Checking system...", client.system_status()).await?;
            let value = json!({
                "health": status.health,
                "email": status.email,
            });
            out.emit(&value, || present::system_status(&status))
        }
    }
}
