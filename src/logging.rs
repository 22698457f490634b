use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::credentials::create_private_dir;

/// Where log lines go. The dashboard owns the terminal, so it logs to a file.
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Filter from LERT_LOG, then RUST_LOG, then the target's default level.
fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env("LERT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level))
}

pub fn init(target: LogTarget) -> anyhow::Result<()> {
    let result = match target {
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter("warn"))
            .with_writer(std::io::stderr)
            .try_init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                create_private_dir(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter("info"))
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    result.map_err(|e| anyhow::anyhow!("failed to initialise logging: {}", e))
}
