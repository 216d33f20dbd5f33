use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::error::DomainError;
use crate::domain::scale_config::ScaleConfig;

/// Scale photos of English exercises and send them to the process-image API
#[derive(Parser, Debug)]
#[command(name = "english_helper", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub settings: Settings,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP front (default)
    Serve,
    /// Scale an image file and write the JPEG result
    Scale {
        input: PathBuf,
        output: PathBuf,
    },
    /// Scale an image file, submit it and print the result
    Submit {
        input: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Base URL of the process-image API
    #[arg(long, env = "API_URL", default_value = "http://localhost:5000", global = true)]
    pub api_url: String,

    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0:3300", global = true)]
    pub bind_address: String,

    #[arg(long, env = "MAX_WIDTH", default_value_t = 1600, global = true)]
    pub max_width: u32,

    #[arg(long, env = "MAX_HEIGHT", default_value_t = 1600, global = true)]
    pub max_height: u32,

    /// JPEG quality between 0.0 and 1.0
    #[arg(long, env = "QUALITY", default_value_t = 0.8, global = true)]
    pub quality: f32,

    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 60, global = true)]
    pub request_timeout_secs: u64,

    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = 20 * 1024 * 1024, global = true)]
    pub max_upload_bytes: usize,

    /// Directory served for paths outside /api
    #[arg(long, env = "STATIC_DIR", global = true)]
    pub static_dir: Option<PathBuf>,

    #[arg(long, env = "RUST_LOG", default_value = "english_helper=info,tower_http=info", global = true)]
    pub rust_log: String,
}

impl Settings {
    pub fn scale_config(&self) -> Result<ScaleConfig, DomainError> {
        ScaleConfig::new(self.max_width, self.max_height, self.quality)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
