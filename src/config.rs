use std::fs::File;
use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;

use log::debug;
use serde::Deserialize;
use toml;

use crate::error::{Error, Result};

struct Defaults {}

impl Defaults {
    fn state_path() -> PathBuf {
        PathBuf::from("bgp_config_data.json")
    }

    fn api_addr() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 8080))
    }
}

/// Daemon settings (toml)
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    // JSON file holding the persisted configuration state
    #[serde(default = "Defaults::state_path")]
    pub state_path: PathBuf,

    // Listening socket for the JSON-RPC API
    #[serde(default = "Defaults::api_addr")]
    pub api_addr: SocketAddr,

    // Rewritten with the rendered document after every saved change
    #[serde(default)]
    pub document_path: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_file(path: &str) -> Result<ServerConfig> {
        let mut file = File::open(path).map_err(|err| Error::storage(path, err))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|err| Error::storage(path, err))?;
        let config = Self::parse(&contents)?;
        debug!("Using config: {:?}", config);
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<ServerConfig> {
        Ok(toml::from_str(contents)?)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            state_path: Defaults::state_path(),
            api_addr: Defaults::api_addr(),
            document_path: None,
        }
    }
}
