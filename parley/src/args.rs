use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use parley_config::ServerConfig;

/// Parley voice assistant backend
#[derive(Debug, Parser)]
#[command(name = "parley", about = "HTTP backend for text generation, speech recognition and speech synthesis")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "parley.toml", env = "PARLEY_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "PARLEY_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Override the port of the listen address
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Log filter directives, e.g. `info,stt=debug`
    #[arg(long, default_value = "info", env = "PARLEY_LOG")]
    pub log_filter: String,
}

impl Args {
    /// Apply command line overrides to the server configuration
    pub fn apply(&self, server: &mut ServerConfig) {
        let mut address = self.listen.unwrap_or_else(|| server.listen_address());

        if let Some(port) = self.port {
            address.set_port(port);
        }

        server.listen_address = Some(address);
    }
}
