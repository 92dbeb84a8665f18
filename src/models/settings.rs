use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_IRR_SERVER: &str = "rr.ntt.net";
pub const DEFAULT_RTR_SERVER: &str = "rtr.koeppel.it:3323";

/// Global router settings
///
/// Fields missing from a decoded record are empty/false rather than
/// defaulted, so a submitted record always replaces the stored one wholesale.
/// The server defaults only apply when no settings were ever stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default = "Settings::blank")]
pub struct Settings {
    // Kept as text: the value is emitted as typed, `null` when empty
    #[serde(deserialize_with = "nullable")]
    pub asn: String,
    #[serde(deserialize_with = "nullable")]
    pub router_id: String,
    #[serde(deserialize_with = "nullable")]
    pub bgpq_args: String,
    #[serde(deserialize_with = "nullable")]
    pub peeringdb_url: String,
    #[serde(deserialize_with = "nullable")]
    pub irr_server: String,
    #[serde(deserialize_with = "nullable")]
    pub rtr_server: String,
    pub accept_default: bool,
    pub default_route: bool,
    pub keep_filtered: bool,
}

impl Settings {
    /// Every field empty or false
    pub fn blank() -> Self {
        Self {
            asn: String::new(),
            router_id: String::new(),
            bgpq_args: String::new(),
            peeringdb_url: String::new(),
            irr_server: String::new(),
            rtr_server: String::new(),
            accept_default: false,
            default_route: false,
            keep_filtered: false,
        }
    }

    /// ASN token as written into documents
    pub fn asn_or_null(&self) -> &str {
        if self.asn.is_empty() {
            "null"
        } else {
            &self.asn
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            irr_server: DEFAULT_IRR_SERVER.to_string(),
            rtr_server: DEFAULT_RTR_SERVER.to_string(),
            ..Self::blank()
        }
    }
}

// Older stores hold `null` for fields that were never submitted
fn nullable<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.irr_server, "rr.ntt.net");
        assert_eq!(settings.rtr_server, "rtr.koeppel.it:3323");
        assert_eq!(settings.asn, "");
        assert!(!settings.accept_default);
        assert_eq!(settings.asn_or_null(), "null");
    }

    #[test]
    fn test_missing_fields_are_blank() {
        let settings: Settings = serde_json::from_str(r#"{"asn": "65000"}"#).unwrap();
        assert_eq!(settings.asn_or_null(), "65000");
        assert_eq!(settings.irr_server, "");
        assert_eq!(settings.rtr_server, "");
        assert!(!settings.keep_filtered);
    }

    #[test]
    fn test_kebab_case_and_nulls() {
        let settings: Settings = serde_json::from_str(
            r#"{"asn": null, "router-id": "192.0.2.1", "keep-filtered": true, "irr-server": null}"#,
        )
        .unwrap();
        assert_eq!(settings.asn, "");
        assert_eq!(settings.router_id, "192.0.2.1");
        assert_eq!(settings.irr_server, "");
        assert!(settings.keep_filtered);

        let encoded = serde_json::to_value(&settings).unwrap();
        assert_eq!(encoded["router-id"], "192.0.2.1");
        assert_eq!(encoded["peeringdb-url"], "");
    }
}
