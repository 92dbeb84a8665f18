use itertools::Itertools;
use prettytable::{cell, row, Row};

use super::table::ToRow;
use crate::models::{ConfigurationState, Peer, Settings};
use crate::render::sanitize_peer_name;

pub const EMPTY_VALUE: &str = "---";

fn display_value(value: &str) -> String {
    if value.is_empty() {
        String::from(EMPTY_VALUE)
    } else {
        value.to_string()
    }
}

pub struct SettingRow(pub &'static str, pub String);

impl SettingRow {
    pub fn all(settings: &Settings) -> Vec<SettingRow> {
        vec![
            SettingRow("asn", settings.asn.clone()),
            SettingRow("router-id", settings.router_id.clone()),
            SettingRow("bgpq-args", settings.bgpq_args.clone()),
            SettingRow("irr-server", settings.irr_server.clone()),
            SettingRow("rtr-server", settings.rtr_server.clone()),
            SettingRow("peeringdb-url", settings.peeringdb_url.clone()),
            SettingRow("accept-default", settings.accept_default.to_string()),
            SettingRow("default-route", settings.default_route.to_string()),
            SettingRow("keep-filtered", settings.keep_filtered.to_string()),
        ]
    }
}

impl ToRow for SettingRow {
    fn columns() -> Row {
        row!["Setting", "Value"]
    }

    fn to_row(&self) -> Row {
        row![self.0, display_value(&self.1)]
    }
}

pub struct StaticRow {
    pub prefix: String,
    pub next_hop: String,
}

impl StaticRow {
    pub fn all(state: &ConfigurationState) -> Vec<StaticRow> {
        state
            .statics
            .iter()
            .map(|(prefix, next_hop)| StaticRow {
                prefix: prefix.to_string(),
                next_hop: next_hop.to_string(),
            })
            .collect()
    }
}

impl ToRow for StaticRow {
    fn columns() -> Row {
        row!["Prefix", "Next Hop"]
    }

    fn to_row(&self) -> Row {
        row![self.prefix, self.next_hop]
    }
}

pub struct PrefixRow(pub usize, pub String);

impl PrefixRow {
    pub fn all(state: &ConfigurationState) -> Vec<PrefixRow> {
        state
            .prefixes
            .iter()
            .enumerate()
            .map(|(index, prefix)| PrefixRow(index, prefix.to_string()))
            .collect()
    }
}

impl ToRow for PrefixRow {
    fn columns() -> Row {
        row!["Index", "Prefix"]
    }

    fn to_row(&self) -> Row {
        row![self.0.to_string(), self.1]
    }
}

pub struct PeerRow {
    pub name: String,
    pub peer: Peer,
}

impl PeerRow {
    pub fn all(state: &ConfigurationState) -> Vec<PeerRow> {
        state
            .peers
            .iter()
            .map(|(name, peer)| PeerRow {
                name: name.to_string(),
                peer: peer.clone(),
            })
            .collect()
    }
}

impl ToRow for PeerRow {
    fn columns() -> Row {
        row![
            "Name",
            "Key",
            "AS",
            "Listen6",
            "Template",
            "Multihop",
            "Neighbors"
        ]
    }

    fn to_row(&self) -> Row {
        let peer = &self.peer;
        row![
            self.name,
            display_value(&sanitize_peer_name(&self.name)),
            peer.asn.to_string(),
            peer.listen6,
            peer.template,
            if peer.multihop { "yes" } else { "no" },
            peer.neighbors.iter().join(" "),
        ]
    }
}
