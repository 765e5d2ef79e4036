//! Runtime configuration, from command-line flags or environment variables.

use std::net::SocketAddr;

use clap::Parser;

const BYTES_PER_MB: usize = 1024 * 1024;

#[derive(Parser, Debug, Clone)]
#[command(name = "image-magic-pro")]
#[command(about = "Batch image conversion and screenshot editing over HTTP")]
#[command(version)]
pub struct Config {
    /// Address the HTTP server listens on
    #[arg(long, env = "IMP_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Largest accepted request body, in megabytes
    #[arg(long, env = "IMP_MAX_UPLOAD_MB", default_value_t = 50)]
    pub max_upload_mb: usize,

    /// Enable debug logging
    #[arg(short, long, env = "IMP_VERBOSE")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, env = "IMP_JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(BYTES_PER_MB)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_upload_mb: 50,
            verbose: false,
            json_logs: false,
        }
    }
}
