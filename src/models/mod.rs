mod ordered;
mod peer;
mod settings;

pub use ordered::OrderedMap;
pub use peer::{parse_neighbors, Peer, PeerDraft};
pub use settings::{Settings, DEFAULT_IRR_SERVER, DEFAULT_RTR_SERVER};

use serde::{Deserialize, Serialize};

/// Static kernel routes: prefix -> next-hop
pub type StaticRoutes = OrderedMap<String>;
/// Configured peers by (unsanitized) name
pub type Peers = OrderedMap<Peer>;

/// Everything needed to render a policy document
///
/// Field names match the persisted record (`config_data`, `statics`,
/// `prefixes`, `peers`); sections missing from a stored record load as defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationState {
    #[serde(rename = "config_data", default)]
    pub settings: Settings,
    #[serde(default)]
    pub statics: StaticRoutes,
    #[serde(default)]
    pub prefixes: Vec<String>,
    #[serde(default)]
    pub peers: Peers,
}
