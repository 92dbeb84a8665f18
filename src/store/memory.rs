use std::io;
use std::sync::Mutex;

use super::PersistencePort;
use crate::error::{Error, Result};
use crate::models::ConfigurationState;

/// Process-local port, used for previews and tests
#[derive(Debug, Default)]
pub struct MemoryPort {
    state: Mutex<Option<ConfigurationState>>,
}

impl MemoryPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: ConfigurationState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
        }
    }
}

fn poisoned() -> Error {
    Error::storage(
        "<memory>",
        io::Error::new(io::ErrorKind::Other, "state lock poisoned"),
    )
}

impl PersistencePort for MemoryPort {
    fn load(&self) -> Result<ConfigurationState> {
        let state = self.state.lock().map_err(|_| poisoned())?;
        Ok(state.clone().unwrap_or_default())
    }

    fn save(&self, state: &ConfigurationState) -> Result<()> {
        let mut stored = self.state.lock().map_err(|_| poisoned())?;
        *stored = Some(state.clone());
        Ok(())
    }
}
