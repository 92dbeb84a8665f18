//! Pure operations over a [`ConfigurationState`]
//!
//! Each mutator takes the current state by value and either returns the
//! updated state or a [`Rejection`]. Validation always happens before any
//! field is touched, so a rejection never carries a half-applied change.
//! Removals of absent entries succeed without changing anything.

use std::fmt;

use crate::error::Rejection;
use crate::example::example_config;
use crate::models::{ConfigurationState, PeerDraft, Peers, Settings};

type Outcome = Result<ConfigurationState, Rejection>;

/// A single externally triggered change
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    AddStatic { prefix: String, next_hop: String },
    RemoveStatic { prefix: String },
    AddPrefix { value: String },
    RemovePrefix { index: usize },
    AddPeer { name: String, draft: PeerDraft },
    RemovePeer { name: String },
    ReplacePeers { peers: Peers },
    ReplaceSettings { settings: Settings },
    LoadExample,
}

impl Operation {
    pub fn apply(self, state: ConfigurationState) -> Outcome {
        use Operation::*;
        match self {
            AddStatic { prefix, next_hop } => add_static(state, prefix, next_hop),
            RemoveStatic { prefix } => Ok(remove_static(state, &prefix)),
            AddPrefix { value } => add_prefix(state, value),
            RemovePrefix { index } => Ok(remove_prefix(state, index)),
            AddPeer { name, draft } => add_peer(state, name, draft),
            RemovePeer { name } => Ok(remove_peer(state, &name)),
            ReplacePeers { peers } => Ok(replace_peers(state, peers)),
            ReplaceSettings { settings } => Ok(replace_settings(state, settings)),
            LoadExample => Ok(load_example(state)),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Operation::*;
        match self {
            AddStatic { prefix, next_hop } => write!(f, "add-static {} -> {}", prefix, next_hop),
            RemoveStatic { prefix } => write!(f, "remove-static {}", prefix),
            AddPrefix { value } => write!(f, "add-prefix {}", value),
            RemovePrefix { index } => write!(f, "remove-prefix #{}", index),
            AddPeer { name, .. } => write!(f, "add-peer {}", name),
            RemovePeer { name } => write!(f, "remove-peer {}", name),
            ReplacePeers { peers } => write!(f, "replace-peers ({} peers)", peers.len()),
            ReplaceSettings { .. } => write!(f, "replace-settings"),
            LoadExample => write!(f, "load-example"),
        }
    }
}

/// Set the next-hop for `prefix`, overwriting any existing entry
pub fn add_static(mut state: ConfigurationState, prefix: String, next_hop: String) -> Outcome {
    if prefix.is_empty() {
        return Err(Rejection::EmptyField("prefix"));
    }
    if next_hop.is_empty() {
        return Err(Rejection::EmptyField("next-hop"));
    }
    state.statics.insert(prefix, next_hop);
    Ok(state)
}

pub fn remove_static(mut state: ConfigurationState, prefix: &str) -> ConfigurationState {
    state.statics.remove(prefix);
    state
}

/// Append `value` to the announced prefixes (exact-match uniqueness)
pub fn add_prefix(mut state: ConfigurationState, value: String) -> Outcome {
    if value.is_empty() {
        return Err(Rejection::EmptyField("prefix"));
    }
    if state.prefixes.contains(&value) {
        return Err(Rejection::DuplicatePrefix(value));
    }
    state.prefixes.push(value);
    Ok(state)
}

/// Remove the prefix at zero-based `index`, ignoring out-of-range positions
pub fn remove_prefix(mut state: ConfigurationState, index: usize) -> ConfigurationState {
    if index < state.prefixes.len() {
        state.prefixes.remove(index);
    }
    state
}

/// Add a new peer; existing names are never overwritten
pub fn add_peer(mut state: ConfigurationState, name: String, draft: PeerDraft) -> Outcome {
    let name = name.trim();
    if name.is_empty() {
        return Err(Rejection::EmptyField("name"));
    }
    if state.peers.contains_key(name) {
        return Err(Rejection::DuplicatePeer(name.to_string()));
    }
    let peer = draft.into_peer()?;
    state.peers.insert(name.to_string(), peer);
    Ok(state)
}

pub fn remove_peer(mut state: ConfigurationState, name: &str) -> ConfigurationState {
    state.peers.remove(name);
    state
}

pub fn replace_peers(mut state: ConfigurationState, peers: Peers) -> ConfigurationState {
    state.peers = peers;
    state
}

/// Whole-record replace, no field-level merge
pub fn replace_settings(mut state: ConfigurationState, settings: Settings) -> ConfigurationState {
    state.settings = settings;
    state
}

/// Discard everything and start over from the canned example
pub fn load_example(_state: ConfigurationState) -> ConfigurationState {
    example_config()
}
