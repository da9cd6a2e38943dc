// CLI module for counsel-ai

use clap::Parser;
use std::path::PathBuf;

/// counsel-ai - AI gateway and feedback analysis for the counselor scheduler
#[derive(Parser, Debug)]
#[command(name = "counsel-ai", version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file (default: ~/.counsel-ai/config.toml if present)
    #[arg(long, env = "COUNSEL_AI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the bind address
    #[arg(long)]
    pub host: Option<String>,

    /// Override the listen port
    #[arg(long)]
    pub port: Option<u16>,
}

impl Args {
    /// Apply flag overrides on top of loaded configuration.
    pub fn apply(&self, config: &mut crate::config::AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
