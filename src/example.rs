use crate::models::{ConfigurationState, Peer, Settings};

/// Canned configuration used for onboarding and demos
pub fn example_config() -> ConfigurationState {
    let settings = Settings {
        asn: "216401".to_string(),
        router_id: "23.178.72.85".to_string(),
        bgpq_args: "-S AFRINIC,APNIC,ARIN,LACNIC,RIPE".to_string(),
        peeringdb_url: "https://pdb-cache.47272.net/api".to_string(),
        accept_default: true,
        default_route: false,
        keep_filtered: true,
        ..Settings::default()
    };
    let statics = vec![
        ("23.178.72.1/32", "23.178.72.85"),
        ("2602:f96d:200::1/128", "2602:f96d:200:13::1"),
    ]
    .into_iter()
    .map(|(prefix, next_hop)| (prefix.to_string(), next_hop.to_string()))
    .collect();
    let peers = vec![(
        "HYEHOST-FMT-V6".to_string(),
        Peer {
            asn: 47272,
            listen6: "2602:f96d:200:13::1".to_string(),
            multihop: true,
            template: "upstream".to_string(),
            enforce_peer_nexthop: false,
            enforce_first_as: false,
            neighbors: vec!["2602:f96d:200::1".to_string()],
        },
    )]
    .into_iter()
    .collect();

    ConfigurationState {
        settings,
        statics,
        prefixes: vec![
            "2a0a:6044:b540::/44".to_string(),
            "2a0f:6284:2000::/44".to_string(),
        ],
        peers,
    }
}
