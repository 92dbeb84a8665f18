use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, trace};

use super::PersistencePort;
use crate::error::{Error, Result};
use crate::models::ConfigurationState;

/// Pretty-printed JSON file holding the whole [`ConfigurationState`]
///
/// Saves go to a sibling temp file that is then renamed over the target,
/// so readers only ever see a complete record.
#[derive(Clone, Debug)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl PersistencePort for JsonFile {
    fn load(&self) -> Result<ConfigurationState> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                trace!("Read {} bytes from {}", contents.len(), self.path.display());
                Ok(serde_json::from_str(&contents)?)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("No state at {}, using defaults", self.path.display());
                Ok(ConfigurationState::default())
            }
            Err(err) => Err(Error::storage(&self.path, err)),
        }
    }

    fn save(&self, state: &ConfigurationState) -> Result<()> {
        let contents = serde_json::to_string_pretty(state)?;
        let temp = self.temp_path();
        fs::write(&temp, contents).map_err(|err| Error::storage(&temp, err))?;
        fs::rename(&temp, &self.path).map_err(|err| {
            let _ = fs::remove_file(&temp);
            Error::storage(&self.path, err)
        })?;
        debug!("Saved state to {}", self.path.display());
        Ok(())
    }
}
