use tracing_subscriber::EnvFilter;

/// stderrへログを出す（stdoutはコマンド出力専用）
///
/// `RUST_LOG` があればそれを優先し、無ければ `--verbose` で debug、
/// 通常は warn 以上のみ。
pub fn init(verbose: bool) {
    let default_level = if verbose { "titweng_admin=debug,titweng_common=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // テストなどで二重初期化された場合は無視
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}
