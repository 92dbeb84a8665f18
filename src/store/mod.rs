mod json_file;
mod memory;

pub use json_file::JsonFile;
pub use memory::MemoryPort;

use log::{debug, info, warn};

use crate::error::Result;
use crate::form::{Submission, SubmitOutcome};
use crate::models::ConfigurationState;
use crate::mutate::Operation;
use crate::render::render;

/// Durable storage for the whole configuration
///
/// Saves replace the stored record wholesale; there are no partial writes.
pub trait PersistencePort: Send + Sync {
    /// Stored state, or defaults when nothing was stored yet
    fn load(&self) -> Result<ConfigurationState>;
    fn save(&self, state: &ConfigurationState) -> Result<()>;
}

/// Runs one operation per request against a freshly loaded snapshot
///
/// Every operation is load -> mutate -> save. The cached state only moves
/// forward after a successful save; a failed load, rejection or failed save
/// leaves both storage and cache untouched.
pub struct ConfigStore {
    port: Box<dyn PersistencePort>,
    current: ConfigurationState,
}

impl ConfigStore {
    pub fn open(port: Box<dyn PersistencePort>) -> Result<Self> {
        let current = port.load()?;
        debug!(
            "Loaded {} statics, {} prefixes, {} peers",
            current.statics.len(),
            current.prefixes.len(),
            current.peers.len()
        );
        Ok(Self { port, current })
    }

    /// Last successfully loaded or saved state
    pub fn get(&self) -> &ConfigurationState {
        &self.current
    }

    /// Re-read storage, picking up changes by other writers
    pub fn refresh(&mut self) -> Result<&ConfigurationState> {
        self.current = self.port.load()?;
        Ok(&self.current)
    }

    /// Persist `state` wholesale and make it current
    pub fn replace(&mut self, state: ConfigurationState) -> Result<&ConfigurationState> {
        self.port.save(&state)?;
        self.current = state;
        Ok(&self.current)
    }

    pub fn apply(&mut self, op: Operation) -> Result<&ConfigurationState> {
        let snapshot = self.port.load()?;
        let label = op.to_string();
        let next = match op.apply(snapshot.clone()) {
            Ok(next) => next,
            Err(rejection) => {
                warn!("Rejected {}: {}", label, rejection);
                self.current = snapshot;
                return Err(rejection.into());
            }
        };
        if next == snapshot {
            debug!("{} changed nothing", label);
            self.current = snapshot;
            return Ok(&self.current);
        }
        self.replace(next)?;
        info!("Applied {}", label);
        Ok(&self.current)
    }

    pub fn remove_static(&mut self, prefix: &str) -> Result<&ConfigurationState> {
        self.apply(Operation::RemoveStatic {
            prefix: prefix.to_string(),
        })
    }

    pub fn remove_prefix(&mut self, index: usize) -> Result<&ConfigurationState> {
        self.apply(Operation::RemovePrefix { index })
    }

    /// Apply a full edit submission; always persisted, even if parts were refused
    pub fn submit_form(&mut self, submission: Submission) -> Result<SubmitOutcome> {
        let snapshot = self.port.load()?;
        let outcome = submission.apply(snapshot);
        self.replace(outcome.config.clone())?;
        info!(
            "Saved submission ({} rejected, peers payload {})",
            outcome.rejected.len(),
            if outcome.peers_discarded {
                "discarded"
            } else {
                "applied"
            }
        );
        Ok(outcome)
    }

    /// Document for the current state
    pub fn document(&self) -> String {
        render(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Rejection};
    use crate::example::example_config;
    use crate::form::FormAction;
    use crate::models::Settings;
    use std::io;
    use std::sync::Arc;

    /// Shares one MemoryPort between the store under test and the assertions
    struct Shared(Arc<MemoryPort>);

    impl PersistencePort for Shared {
        fn load(&self) -> Result<ConfigurationState> {
            self.0.load()
        }
        fn save(&self, state: &ConfigurationState) -> Result<()> {
            self.0.save(state)
        }
    }

    struct ReadOnly(ConfigurationState);

    impl PersistencePort for ReadOnly {
        fn load(&self) -> Result<ConfigurationState> {
            Ok(self.0.clone())
        }
        fn save(&self, _state: &ConfigurationState) -> Result<()> {
            Err(Error::storage(
                "/read-only",
                io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            ))
        }
    }

    fn shared_store(state: ConfigurationState) -> (ConfigStore, Arc<MemoryPort>) {
        let port = Arc::new(MemoryPort::with_state(state));
        let store = ConfigStore::open(Box::new(Shared(port.clone()))).unwrap();
        (store, port)
    }

    #[test]
    fn test_open_defaults() {
        let store = ConfigStore::open(Box::new(MemoryPort::new())).unwrap();
        assert_eq!(store.get(), &ConfigurationState::default());
        assert!(store.document().starts_with("asn: null\n"));
    }

    #[test]
    fn test_apply_persists() {
        let (mut store, port) = shared_store(ConfigurationState::default());
        store
            .apply(Operation::AddPrefix {
                value: "2001:db8::/32".into(),
            })
            .unwrap();
        assert_eq!(port.load().unwrap().prefixes, vec!["2001:db8::/32"]);
        assert_eq!(store.get().prefixes, vec!["2001:db8::/32"]);
    }

    #[test]
    fn test_rejection_leaves_storage() {
        let (mut store, port) = shared_store(example_config());
        let err = store
            .apply(Operation::AddPrefix {
                value: "2a0a:6044:b540::/44".into(),
            })
            .unwrap_err();
        assert!(err.is_rejection());
        assert!(matches!(
            err,
            Error::ValidationRejected(Rejection::DuplicatePrefix(_))
        ));
        assert_eq!(port.load().unwrap(), example_config());
    }

    #[test]
    fn test_removals_idempotent() {
        let (mut store, port) = shared_store(example_config());
        store.remove_static("23.178.72.1/32").unwrap();
        let once = port.load().unwrap();
        store.remove_static("23.178.72.1/32").unwrap();
        assert_eq!(port.load().unwrap(), once);
        assert_eq!(once.statics.len(), 1);

        store.remove_prefix(5).unwrap();
        assert_eq!(port.load().unwrap(), once);
        store.remove_prefix(0).unwrap();
        assert_eq!(port.load().unwrap().prefixes, vec!["2a0f:6284:2000::/44"]);
    }

    #[test]
    fn test_operations_use_fresh_snapshot() {
        let (mut store, port) = shared_store(ConfigurationState::default());
        port.save(&example_config()).unwrap();
        store.remove_prefix(1).unwrap();
        assert_eq!(store.get().prefixes, vec!["2a0a:6044:b540::/44"]);
        assert_eq!(store.get().peers, example_config().peers);
    }

    #[test]
    fn test_failed_save_keeps_cache() {
        let mut store = ConfigStore::open(Box::new(ReadOnly(example_config()))).unwrap();
        let err = store.remove_prefix(0).unwrap_err();
        assert!(matches!(err, Error::StorageUnavailable { .. }));
        assert_eq!(store.get(), &example_config());
    }

    #[test]
    fn test_submit_form() {
        let (mut store, port) = shared_store(ConfigurationState::default());
        let outcome = store
            .submit_form(Submission::new(Settings::default()).with_action(FormAction::LoadExample))
            .unwrap();
        assert_eq!(outcome.config, example_config());
        assert_eq!(port.load().unwrap(), example_config());
        assert_eq!(store.document(), render(&example_config()));
    }
}
