use serde::{Deserialize, Serialize};

use crate::error::Rejection;

/// External BGP session, keyed by name in [`super::Peers`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    pub asn: u32,
    pub listen6: String,
    #[serde(default)]
    pub multihop: bool,
    // One of upstream, routeserver, peer, downstream; not enforced
    pub template: String,
    #[serde(default)]
    pub enforce_peer_nexthop: bool,
    #[serde(default)]
    pub enforce_first_as: bool,
    pub neighbors: Vec<String>,
}

impl Peer {
    /// Field rules every stored peer satisfies
    pub fn validate(&self) -> Result<(), Rejection> {
        if self.listen6.trim().is_empty() {
            return Err(Rejection::EmptyField("listen6"));
        }
        if self.template.trim().is_empty() {
            return Err(Rejection::EmptyField("template"));
        }
        if self.neighbors.iter().all(|n| n.trim().is_empty()) {
            return Err(Rejection::EmptyField("neighbors"));
        }
        Ok(())
    }
}

/// Peer fields as entered by an operator, before validation
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerDraft {
    pub asn: String,
    pub listen6: String,
    pub template: String,
    #[serde(default)]
    pub multihop: bool,
    #[serde(default)]
    pub enforce_peer_nexthop: bool,
    #[serde(default)]
    pub enforce_first_as: bool,
    #[serde(default)]
    pub neighbors: Vec<String>,
}

impl PeerDraft {
    /// Validate and convert into a stored [`Peer`]
    pub fn into_peer(self) -> Result<Peer, Rejection> {
        let asn = self.asn.trim();
        let listen6 = self.listen6.trim();
        let template = self.template.trim();
        if asn.is_empty() {
            return Err(Rejection::EmptyField("asn"));
        }
        if listen6.is_empty() {
            return Err(Rejection::EmptyField("listen6"));
        }
        if template.is_empty() {
            return Err(Rejection::EmptyField("template"));
        }
        let neighbors: Vec<String> = self
            .neighbors
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(String::from)
            .collect();
        if neighbors.is_empty() {
            return Err(Rejection::EmptyField("neighbors"));
        }
        let asn = asn
            .parse::<u32>()
            .map_err(|_| Rejection::InvalidAsn(asn.to_string()))?;

        Ok(Peer {
            asn,
            listen6: listen6.to_string(),
            multihop: self.multihop,
            template: template.to_string(),
            enforce_peer_nexthop: self.enforce_peer_nexthop,
            enforce_first_as: self.enforce_first_as,
            neighbors,
        })
    }
}

/// Split a comma-separated neighbor list, dropping blank entries
/// E.g. "2602:f96d:200::1, 2001:504:125:e0::2" -> ["2602:f96d:200::1", "2001:504:125:e0::2"]
pub fn parse_neighbors(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> PeerDraft {
        PeerDraft {
            asn: " 47272 ".to_string(),
            listen6: "2602:f96d:200:13::1".to_string(),
            template: "upstream".to_string(),
            multihop: true,
            neighbors: vec!["2602:f96d:200::1".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_neighbors() {
        assert_eq!(
            parse_neighbors("2602:f96d:200::1, 2001:504:125:e0::2,,  "),
            vec!["2602:f96d:200::1", "2001:504:125:e0::2"]
        );
        assert!(parse_neighbors(" , ").is_empty());
    }

    #[test]
    fn test_draft_into_peer() {
        let peer = draft().into_peer().unwrap();
        assert_eq!(peer.asn, 47272);
        assert!(peer.multihop);
        assert!(!peer.enforce_first_as);
        assert_eq!(peer.neighbors, vec!["2602:f96d:200::1"]);
    }

    #[test]
    fn test_draft_rejections() {
        let mut missing_asn = draft();
        missing_asn.asn = "  ".to_string();
        assert_eq!(missing_asn.into_peer(), Err(Rejection::EmptyField("asn")));

        let mut bad_asn = draft();
        bad_asn.asn = "AS47272".to_string();
        assert_eq!(
            bad_asn.into_peer(),
            Err(Rejection::InvalidAsn("AS47272".to_string()))
        );

        let mut no_template = draft();
        no_template.template = String::new();
        assert_eq!(no_template.into_peer(), Err(Rejection::EmptyField("template")));

        let mut no_neighbors = draft();
        no_neighbors.neighbors = vec![" ".to_string()];
        assert_eq!(
            no_neighbors.into_peer(),
            Err(Rejection::EmptyField("neighbors"))
        );
    }

    #[test]
    fn test_peer_validate() {
        let peer = draft().into_peer().unwrap();
        assert_eq!(peer.validate(), Ok(()));

        let mut blank_listen6 = peer.clone();
        blank_listen6.listen6 = " ".to_string();
        assert_eq!(blank_listen6.validate(), Err(Rejection::EmptyField("listen6")));

        let mut no_neighbors = peer.clone();
        no_neighbors.neighbors.clear();
        assert_eq!(no_neighbors.validate(), Err(Rejection::EmptyField("neighbors")));

        let mut blank_neighbor = peer;
        blank_neighbor.neighbors = vec!["".to_string()];
        assert_eq!(blank_neighbor.validate(), Err(Rejection::EmptyField("neighbors")));
    }

    #[test]
    fn test_optional_flags_default_false() {
        let peer: Peer = serde_json::from_str(
            r#"{"asn": 65001, "listen6": "::1", "template": "peer", "neighbors": ["::2"]}"#,
        )
        .unwrap();
        assert!(!peer.multihop);
        assert!(!peer.enforce_peer_nexthop);
    }
}
