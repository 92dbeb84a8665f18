use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use jsonrpsee::core::{Error as RpcError, RpcResult};
use jsonrpsee::http_server::{HttpServerBuilder, HttpServerHandle};
use log::{info, warn};
use tokio::sync::Mutex;

use super::rpc::ApiServer;
use crate::error::Error;
use crate::form::{FormAction, Submission, SubmitOutcome};
use crate::models::ConfigurationState;
use crate::render::{render, sanitized_collisions};
use crate::store::ConfigStore;

/// JSON-RPC front for a [`ConfigStore`]
///
/// Requests are serialized through one lock, each running start-to-finish
/// against its own loaded snapshot.
#[derive(Clone)]
pub struct Server {
    inner: Arc<Inner>,
}

struct Inner {
    store: Mutex<ConfigStore>,
    document_path: Option<PathBuf>,
}

fn to_rpc_error(err: Error) -> RpcError {
    if err.is_rejection() {
        info!("{}", err);
    } else {
        warn!("{}", err);
    }
    RpcError::Custom(err.to_string())
}

impl Server {
    pub fn new(store: ConfigStore, document_path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                store: Mutex::new(store),
                document_path,
            }),
        }
    }

    /// Report name collisions and refresh the document file, if configured
    pub fn publish(&self, state: &ConfigurationState) {
        for (key, names) in sanitized_collisions(&state.peers) {
            warn!("Peers {:?} are all written as {:?}", names, key);
        }
        if let Some(path) = &self.inner.document_path {
            match fs::write(path, render(state)) {
                Ok(_) => info!("Wrote document to {}", path.display()),
                Err(err) => warn!("Unable to write document to {}: {}", path.display(), err),
            }
        }
    }

    pub async fn publish_current(&self) {
        let store = self.inner.store.lock().await;
        self.publish(store.get());
    }

    pub async fn serve_rpc_api(&self, socket: SocketAddr) -> Result<HttpServerHandle, RpcError> {
        info!("Starting JSON-RPC server on {}...", socket);
        let server = HttpServerBuilder::default().build(socket).await?;
        server.start(self.clone().into_rpc())
    }
}

#[async_trait::async_trait]
impl ApiServer for Server {
    async fn show_config(&self) -> RpcResult<ConfigurationState> {
        let mut store = self.inner.store.lock().await;
        let state = store.refresh().map_err(to_rpc_error)?;
        Ok(state.clone())
    }

    async fn render(&self) -> RpcResult<String> {
        let mut store = self.inner.store.lock().await;
        store.refresh().map_err(to_rpc_error)?;
        Ok(store.document())
    }

    async fn preview(&self, state: ConfigurationState) -> RpcResult<String> {
        Ok(render(&state))
    }

    async fn remove_static(&self, prefix: String) -> RpcResult<ConfigurationState> {
        let mut store = self.inner.store.lock().await;
        let state = store.remove_static(&prefix).map_err(to_rpc_error)?.clone();
        self.publish(&state);
        Ok(state)
    }

    async fn remove_prefix(&self, index: usize) -> RpcResult<ConfigurationState> {
        let mut store = self.inner.store.lock().await;
        let state = store.remove_prefix(index).map_err(to_rpc_error)?.clone();
        self.publish(&state);
        Ok(state)
    }

    async fn submit_form(&self, submission: Submission) -> RpcResult<SubmitOutcome> {
        let mut store = self.inner.store.lock().await;
        let outcome = store.submit_form(submission).map_err(to_rpc_error)?;
        self.publish(&outcome.config);
        Ok(outcome)
    }

    async fn load_example(&self) -> RpcResult<ConfigurationState> {
        let mut store = self.inner.store.lock().await;
        let settings = store.refresh().map_err(to_rpc_error)?.settings.clone();
        let submission = Submission::new(settings).with_action(FormAction::LoadExample);
        let outcome = store.submit_form(submission).map_err(to_rpc_error)?;
        self.publish(&outcome.config);
        Ok(outcome.config)
    }
}
