pub mod api;
#[cfg(feature = "cli")]
pub mod cli;
mod config;
mod error;
pub mod example;
pub mod form;
pub mod models;
pub mod mutate;
pub mod render;
pub mod store;

pub use config::ServerConfig;
pub use error::{Error, Rejection, Result};
pub use form::{FormAction, Submission, SubmitOutcome};
pub use models::{ConfigurationState, Peer, PeerDraft, Settings};
pub use mutate::Operation;
pub use render::render;
pub use store::{ConfigStore, JsonFile, MemoryPort, PersistencePort};
