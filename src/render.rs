//! Policy document serializer
//!
//! [`render`] is the only code path producing documents. The daemon uses it
//! for the persisted state and for previews of unsaved edits, so the two
//! outputs cannot drift apart. Layout (indentation, blank lines, literal
//! `{}` / `[]` for empty sections) is part of the output contract.
//! Values are written verbatim, without quoting or escaping.

use std::fmt;

use itertools::Itertools;

use crate::models::{ConfigurationState, Peer, Peers};

/// Community value tagged onto every announcement, `{asn}:0:15`
const ANNOUNCE_COMMUNITY: u32 = 15;

struct PolicyTemplate {
    name: &'static str,
    // Attributes written ahead of `announce`
    attributes: &'static [&'static str],
    // Attributes written between `announce` and `remove-all-communities`
    after_announce: &'static [&'static str],
    local_pref: u32,
    import_community: u32,
}

const TEMPLATES: [PolicyTemplate; 4] = [
    PolicyTemplate {
        name: "upstream",
        attributes: &["allow-local-as: true", "import-limit-violation: warn"],
        after_announce: &[],
        local_pref: 80,
        import_community: 12,
    },
    PolicyTemplate {
        name: "routeserver",
        attributes: &[
            "filter-transit-asns: true",
            "auto-import-limits: true",
            "enforce-peer-nexthop: false",
            "enforce-first-as: false",
        ],
        after_announce: &[],
        local_pref: 90,
        import_community: 13,
    },
    PolicyTemplate {
        name: "peer",
        attributes: &[
            "filter-irr: true",
            "filter-transit-asns: true",
            "auto-import-limits: true",
            "auto-as-set: true",
        ],
        after_announce: &[],
        local_pref: 100,
        import_community: 14,
    },
    PolicyTemplate {
        name: "downstream",
        attributes: &[
            "filter-irr: true",
            "allow-blackhole-community: true",
            "filter-transit-asns: true",
            "auto-import-limits: true",
            "auto-as-set: true",
        ],
        after_announce: &["announce-default: true"],
        local_pref: 200,
        import_community: 15,
    },
];

/// Rendered view over a [`ConfigurationState`]
pub struct Document<'a> {
    state: &'a ConfigurationState,
}

impl<'a> Document<'a> {
    pub fn new(state: &'a ConfigurationState) -> Self {
        Self { state }
    }

    fn write_settings(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let settings = &self.state.settings;
        writeln!(f, "asn: {}", settings.asn_or_null())?;
        writeln!(f, "router-id: {}", settings.router_id)?;
        writeln!(f, "bgpq-args: {}", settings.bgpq_args)?;
        writeln!(f, "irr-server: {}", settings.irr_server)?;
        writeln!(f, "rtr-server: {}", settings.rtr_server)?;
        writeln!(f, "peeringdb-url: {}", settings.peeringdb_url)?;
        writeln!(f, "accept-default: {}", settings.accept_default)?;
        writeln!(f, "default-route: {}", settings.default_route)?;
        writeln!(f, "keep-filtered: {}", settings.keep_filtered)?;
        writeln!(f)
    }

    fn write_statics(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "kernel:")?;
        writeln!(f, "  statics:")?;
        if self.state.statics.is_empty() {
            writeln!(f, "    {{}}")?;
        }
        for (prefix, next_hop) in self.state.statics.iter() {
            writeln!(f, "    \"{}\": \"{}\"", prefix, next_hop)?;
        }
        writeln!(f)
    }

    fn write_prefixes(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "prefixes:")?;
        if self.state.prefixes.is_empty() {
            writeln!(f, "    []")?;
        }
        for prefix in &self.state.prefixes {
            writeln!(f, "  - {}", prefix)?;
        }
        writeln!(f)
    }

    fn write_templates(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let asn = self.state.settings.asn_or_null();
        writeln!(f, "templates:")?;
        for template in TEMPLATES.iter() {
            writeln!(f, "  {}:", template.name)?;
            for attribute in template.attributes {
                writeln!(f, "    {}", attribute)?;
            }
            writeln!(f, "    announce: [ \"{}:0:{}\" ]", asn, ANNOUNCE_COMMUNITY)?;
            for attribute in template.after_announce {
                writeln!(f, "    {}", attribute)?;
            }
            writeln!(f, "    remove-all-communities: {}", asn)?;
            writeln!(f, "    local-pref: {}", template.local_pref)?;
            writeln!(
                f,
                "    add-on-import: [ \"{}:0:{}\" ]",
                asn, template.import_community
            )?;
            writeln!(f)?;
        }
        Ok(())
    }

    fn write_peer(f: &mut fmt::Formatter, name: &str, peer: &Peer) -> fmt::Result {
        writeln!(f, "  {}:", sanitize_peer_name(name))?;
        writeln!(f, "    asn: {}", peer.asn)?;
        writeln!(f, "    listen6: {}", peer.listen6)?;
        writeln!(f, "    multihop: {}", peer.multihop)?;
        writeln!(f, "    template: {}", peer.template)?;
        writeln!(f, "    enforce-peer-nexthop: {}", peer.enforce_peer_nexthop)?;
        writeln!(f, "    enforce-first-as: {}", peer.enforce_first_as)?;
        writeln!(f, "    neighbors:")?;
        for neighbor in &peer.neighbors {
            writeln!(f, "      - {}", neighbor)?;
        }
        Ok(())
    }

    fn write_peers(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "peers:")?;
        if self.state.peers.is_empty() {
            writeln!(f, "    {{}}")?;
        }
        // Colliding sanitized names are all written, in stored order
        for (name, peer) in self.state.peers.iter() {
            Self::write_peer(f, name, peer)?;
        }
        Ok(())
    }
}

impl fmt::Display for Document<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_settings(f)?;
        self.write_statics(f)?;
        self.write_prefixes(f)?;
        self.write_templates(f)?;
        self.write_peers(f)
    }
}

/// Render the full policy document for `state`
pub fn render(state: &ConfigurationState) -> String {
    Document::new(state).to_string()
}

/// Peer key as written into documents: only `[A-Za-z0-9_-]` survive
/// E.g. "A B/C" -> "ABC"
pub fn sanitize_peer_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Distinct peer names that render to the same key, grouped by that key
pub fn sanitized_collisions(peers: &Peers) -> Vec<(String, Vec<String>)> {
    peers
        .keys()
        .map(|name| (sanitize_peer_name(name), name.to_string()))
        .into_group_map()
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .sorted()
        .collect()
}
