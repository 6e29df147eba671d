use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use titweng_admin::{cli, commands, config, context, error, logging, scope, storage};
use cli::Cli;
use config::Config;
use context::AppContext;
use error::Result;
use scope::RequestScope;
use storage::FilePreferenceStore;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✖ {}", e);
            if e.requires_login() {
                eprintln!("  Run `titweng-admin login` to sign in.");
            }
            tracing::debug!(kind = ?e.kind(), "command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let store = FilePreferenceStore::open(&Config::config_dir()?);
    let ctx = AppContext::new(config, Arc::new(store));

    // Ctrl-Cで実行中のリクエストを打ち切る
    let scope = RequestScope::new();
    let interrupt = scope.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    commands::run(cli.command, &ctx, scope, cli.json).await
}
