//! File-based diagnostic logging
//!
//! The terminal owns stdout, so diagnostics go to a log file next to the
//! config. `RUST_LOG` overrides the default level.

use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn log_file_path() -> PathBuf {
    crate::config::Config::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(concat!(env!("CARGO_PKG_NAME"), ".log"))
}

pub fn init() -> Result<()> {
    let log_path = log_file_path();
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let env_filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    let writer_path = log_path.clone();
    let file_layer = fmt::layer()
        .with_writer(move || {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&writer_path)
                .expect("failed to open log file")
        })
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(file_layer).try_init()?;

    Ok(())
}
