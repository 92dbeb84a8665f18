mod handler;
pub mod rpc;

pub use handler::Server;

use std::error::Error;

use log::info;

use crate::config::ServerConfig;
use crate::store::{ConfigStore, JsonFile};

/// Run the JSON-RPC daemon until interrupted
pub async fn serve(config: ServerConfig) -> Result<(), Box<dyn Error>> {
    let port = JsonFile::new(&config.state_path);
    let store = ConfigStore::open(Box::new(port))?;
    info!("Using state file {}", config.state_path.display());

    let server = Server::new(store, config.document_path.clone());
    server.publish_current().await;
    let _handle = server.serve_rpc_api(config.api_addr).await?;

    tokio::signal::ctrl_c().await?;
    info!("Stopping policygen...");
    Ok(())
}
