//! Full edit submissions
//!
//! A submission always re-sets the settings record and may carry one
//! button action plus the whole peers mapping, edited on the client and
//! encoded as a single JSON payload.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Rejection, Result};
use crate::models::{ConfigurationState, Peers, Settings};
use crate::mutate::Operation;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FormAction {
    AddStatic { prefix: String, next_hop: String },
    AddPrefix { value: String },
    LoadExample,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default = "Settings::blank")]
    pub settings: Settings,
    #[serde(default)]
    pub action: Option<FormAction>,
    /// JSON object of peer records replacing all stored peers
    #[serde(default)]
    pub peers_json: Option<String>,
}

/// Result of applying a [`Submission`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub config: ConfigurationState,
    /// Display strings for the parts of the submission that were refused
    pub rejected: Vec<String>,
    /// The peers payload could not be decoded and stored peers were kept
    pub peers_discarded: bool,
}

impl Submission {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            action: None,
            peers_json: None,
        }
    }

    pub fn with_action(mut self, action: FormAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_peers(mut self, peers: &Peers) -> Result<Self> {
        self.peers_json = Some(encode_peers(peers)?);
        Ok(self)
    }

    /// Apply settings, then the action, then the peers payload.
    /// Loading the example overrides everything else in the submission.
    pub fn apply(self, state: ConfigurationState) -> SubmitOutcome {
        let mut rejected = vec![];
        let mut peers_discarded = false;
        let load_example = matches!(self.action, Some(FormAction::LoadExample));

        let mut ops = vec![Operation::ReplaceSettings {
            settings: self.settings,
        }];
        match self.action {
            Some(FormAction::AddStatic { prefix, next_hop }) => {
                ops.push(Operation::AddStatic { prefix, next_hop })
            }
            Some(FormAction::AddPrefix { value }) => ops.push(Operation::AddPrefix { value }),
            _ => (),
        }
        if let Some(payload) = &self.peers_json {
            match decode_peers(payload) {
                Ok(Some(peers)) => ops.push(Operation::ReplacePeers { peers }),
                Ok(None) => (),
                Err(err) => {
                    warn!("Discarding peers payload: {}", err);
                    peers_discarded = true;
                }
            }
        }
        if load_example {
            ops.push(Operation::LoadExample);
        }

        let config = ops.into_iter().fold(state, |state, op| {
            let label = op.to_string();
            match op.apply(state.clone()) {
                Ok(next) => next,
                Err(rejection) => {
                    warn!("Submission {} rejected: {}", label, rejection);
                    rejected.push(rejection.to_string());
                    state
                }
            }
        });

        SubmitOutcome {
            config,
            rejected,
            peers_discarded,
        }
    }
}

/// Decode a peers payload; blank payloads carry no peers at all.
/// A single invalid record refuses the whole payload.
pub fn decode_peers(payload: &str) -> Result<Option<Peers>> {
    if payload.trim().is_empty() {
        return Ok(None);
    }
    let peers: Peers = serde_json::from_str(payload)?;
    for (name, peer) in peers.iter() {
        if name.trim().is_empty() {
            return Err(Rejection::EmptyField("name").into());
        }
        peer.validate()?;
    }
    Ok(Some(peers))
}

pub fn encode_peers(peers: &Peers) -> Result<String> {
    Ok(serde_json::to_string(peers)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::example::example_config;
    use crate::models::PeerDraft;
    use crate::mutate;

    fn settings(asn: &str) -> Settings {
        let mut settings = Settings::default();
        settings.asn = asn.to_string();
        settings
    }

    fn one_peer() -> Peers {
        let state = mutate::add_peer(
            ConfigurationState::default(),
            "AS65001".into(),
            PeerDraft {
                asn: "65001".into(),
                listen6: "2001:db8::1".into(),
                template: "downstream".into(),
                neighbors: vec!["2001:db8::2".into()],
                ..Default::default()
            },
        )
        .unwrap();
        state.peers
    }

    #[test]
    fn test_settings_replaced() {
        let outcome = Submission::new(settings("65000")).apply(example_config());
        assert_eq!(outcome.config.settings, settings("65000"));
        assert_eq!(outcome.config.prefixes, example_config().prefixes);
        assert!(outcome.rejected.is_empty());
        assert!(!outcome.peers_discarded);
    }

    #[test]
    fn test_add_static_and_peers() {
        let submission = Submission::new(settings("65000"))
            .with_action(FormAction::AddStatic {
                prefix: "192.0.2.0/24".into(),
                next_hop: "198.51.100.1".into(),
            })
            .with_peers(&one_peer())
            .unwrap();
        let outcome = submission.apply(ConfigurationState::default());
        assert_eq!(
            outcome.config.statics.get("192.0.2.0/24").map(String::as_str),
            Some("198.51.100.1")
        );
        assert_eq!(outcome.config.peers, one_peer());
    }

    #[test]
    fn test_rejected_action_keeps_rest() {
        let submission = Submission::new(settings("65000"))
            .with_action(FormAction::AddPrefix {
                value: "2a0a:6044:b540::/44".into(),
            })
            .with_peers(&one_peer())
            .unwrap();
        let outcome = submission.apply(example_config());
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.config.prefixes, example_config().prefixes);
        assert_eq!(outcome.config.settings.asn, "65000");
        assert_eq!(outcome.config.peers, one_peer());
    }

    #[test]
    fn test_malformed_peers_payload() {
        let mut submission = Submission::new(settings("65000"));
        submission.peers_json = Some("{not json".into());
        let outcome = submission.apply(example_config());
        assert!(outcome.peers_discarded);
        assert_eq!(outcome.config.peers, example_config().peers);
        assert_eq!(outcome.config.settings.asn, "65000");

        let mut submission = Submission::new(settings("65000"));
        submission.peers_json = Some(r#"{"x": {"asn": "nope"}}"#.into());
        assert!(submission.apply(example_config()).peers_discarded);
    }

    #[test]
    fn test_invalid_peer_records_refused() {
        let blank = r#"{"": {"asn": 1, "listen6": "", "template": "", "neighbors": []}}"#;
        assert!(matches!(
            decode_peers(blank),
            Err(Error::ValidationRejected(Rejection::EmptyField("name")))
        ));

        let mut submission = Submission::new(settings("65000"));
        submission.peers_json = Some(blank.into());
        let outcome = submission.apply(ConfigurationState::default());
        assert!(outcome.peers_discarded);
        assert!(outcome.config.peers.is_empty());
        assert!(!crate::render::render(&outcome.config).contains("\n  :\n"));

        // One bad record refuses the whole mapping
        let mixed = r#"{
            "AS65001": {"asn": 65001, "listen6": "2001:db8::1", "template": "peer", "neighbors": ["2001:db8::2"]},
            "AS65002": {"asn": 65002, "listen6": "2001:db8::3", "template": "peer", "neighbors": []}
        }"#;
        assert!(matches!(
            decode_peers(mixed),
            Err(Error::ValidationRejected(Rejection::EmptyField("neighbors")))
        ));
        let mut submission = Submission::new(settings("65000"));
        submission.peers_json = Some(mixed.into());
        let outcome = submission.apply(example_config());
        assert!(outcome.peers_discarded);
        assert_eq!(outcome.config.peers, example_config().peers);
        assert_eq!(outcome.config.settings.asn, "65000");
    }

    #[test]
    fn test_blank_and_empty_payloads() {
        let mut submission = Submission::new(settings("65000"));
        submission.peers_json = Some("  ".into());
        let outcome = submission.clone().apply(example_config());
        assert_eq!(outcome.config.peers, example_config().peers);

        submission.peers_json = Some("{}".into());
        assert!(submission.apply(example_config()).config.peers.is_empty());
    }

    #[test]
    fn test_load_example_overrides() {
        let submission = Submission::new(settings("65000"))
            .with_peers(&one_peer())
            .unwrap()
            .with_action(FormAction::LoadExample);
        let outcome = submission.apply(ConfigurationState::default());
        assert_eq!(outcome.config, example_config());
    }

    #[test]
    fn test_missing_settings_fields_blank() {
        let submission: Submission =
            serde_json::from_str(r#"{"settings": {"asn": "65000"}, "action": {"kind": "load-example"}}"#)
                .unwrap();
        assert_eq!(submission.settings.irr_server, "");
        assert_eq!(submission.action, Some(FormAction::LoadExample));
        assert_eq!(submission.peers_json, None);
    }
}
