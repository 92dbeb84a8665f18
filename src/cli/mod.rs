//! # policygen CLI
//!
//! The same binary runs the daemon (`policygen run config.toml`) and talks to a
//! running instance over its JSON-RPC API (default `127.0.0.1:8080`, see
//! `--host` and `--port`).
//!
//! ## Show
//! ```sh
//! $ policygen show peers
//!  Name            Key             AS     Listen6              Template  Multihop  Neighbors
//! ----------------+---------------+------+--------------------+---------+---------+------------------
//!  HYEHOST-FMT-V6  HYEHOST-FMT-V6  47272  2602:f96d:200:13::1  upstream  yes       2602:f96d:200::1
//! ```
//!
//! `show document` prints the rendered policy document exactly as the daemon
//! persists it.
//!
//! ## Edit
//! ```sh
//! $ policygen static add 23.178.72.1/32 23.178.72.85
//! $ policygen prefix add 2a0a:6044:b540::/44
//! $ policygen prefix remove 0
//! $ policygen peer add HYEHOST-FMT-V6 --asn 47272 --listen6 2602:f96d:200:13::1 \
//!     --template upstream --multihop --neighbors 2602:f96d:200::1
//! $ policygen settings --asn 216401 --router-id 23.178.72.85
//! $ policygen load-example
//! ```
//! Peers are edited locally and the whole peers mapping is submitted at once.
//!
//! ## Offline
//! `render --state <file>` and `check --state <file>` read a state file
//! directly, no daemon needed.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use colored::*;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};

use crate::api::rpc::ApiClient;
use crate::api::serve;
use crate::config::ServerConfig;
use crate::form::{FormAction, Submission, SubmitOutcome};
use crate::models::{parse_neighbors, PeerDraft, Settings};
use crate::mutate::Operation;
use crate::render::{render, sanitized_collisions};
use crate::store::{JsonFile, PersistencePort};

mod display;
mod table;

use display::{PeerRow, PrefixRow, SettingRow, StaticRow};
use table::{OutputTable, ToRow};

#[derive(Parser, Debug)]
#[clap(name = "policygen", rename_all = "kebab-case")]
/// Build and render BGP routing policy documents
pub struct Args {
    #[clap(subcommand)]
    pub cmd: Command,
    #[clap(long, default_value = "127.0.0.1")]
    pub host: String,
    #[clap(short, long, default_value_t = 8080)]
    pub port: u16,
    /// Show debug logs (additive for trace logs)
    #[clap(short, parse(from_occurrences), global = true)]
    pub verbose: u8,
}

#[derive(Parser, Debug)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Run the policygen daemon
    Run(RunOptions),
    /// View the stored configuration or its document
    #[clap(alias = "s", subcommand)]
    Show(Show),
    /// Kernel static routes
    #[clap(subcommand)]
    Static(StaticCommand),
    /// Announced prefixes
    #[clap(subcommand)]
    Prefix(PrefixCommand),
    /// External peers
    #[clap(subcommand)]
    Peer(PeerCommand),
    /// Replace global settings (unspecified fields keep their stored value)
    Settings(SettingsOptions),
    /// Replace the whole configuration with the canned example
    LoadExample,
    /// Render a state file without a running daemon
    Render(StateOptions),
    /// Report peer names that collide once sanitized
    Check(StateOptions),
}

#[derive(Parser, Debug)]
#[clap(rename_all = "kebab-case")]
pub struct RunOptions {
    /// Path to the daemon config.toml
    pub config_path: String,
}

#[derive(Parser, Debug)]
#[clap(rename_all = "kebab-case")]
pub struct StateOptions {
    /// Path to a persisted JSON state file
    #[clap(long, default_value = "bgp_config_data.json")]
    pub state: PathBuf,
}

#[derive(Parser, Debug)]
#[clap(rename_all = "kebab-case")]
pub enum Show {
    Settings,
    #[clap(visible_alias = "kernel")]
    Statics,
    Prefixes,
    #[clap(visible_alias = "neighbors")]
    Peers,
    #[clap(alias = "doc")]
    Document,
}

#[derive(Parser, Debug)]
#[clap(rename_all = "kebab-case")]
pub enum StaticCommand {
    /// Add a static route (replaces the next-hop of an existing prefix)
    Add { prefix: String, next_hop: String },
    Remove { prefix: String },
}

#[derive(Parser, Debug)]
#[clap(rename_all = "kebab-case")]
pub enum PrefixCommand {
    Add { value: String },
    /// Remove by position, as listed by `show prefixes`
    Remove { index: usize },
}

#[derive(Parser, Debug)]
#[clap(rename_all = "kebab-case")]
pub enum PeerCommand {
    Add(PeerOptions),
    Remove { name: String },
}

#[derive(Parser, Debug)]
#[clap(rename_all = "kebab-case")]
pub struct PeerOptions {
    /// Peer name (only [A-Za-z0-9_-] is kept in documents)
    pub name: String,
    #[clap(long)]
    pub asn: String,
    #[clap(long)]
    pub listen6: String,
    /// upstream, routeserver, peer or downstream
    #[clap(long)]
    pub template: String,
    #[clap(long)]
    pub multihop: bool,
    #[clap(long)]
    pub enforce_peer_nexthop: bool,
    #[clap(long)]
    pub enforce_first_as: bool,
    /// Comma-separated neighbor addresses
    #[clap(long)]
    pub neighbors: String,
}

impl PeerOptions {
    pub fn draft(&self) -> PeerDraft {
        PeerDraft {
            asn: self.asn.clone(),
            listen6: self.listen6.clone(),
            template: self.template.clone(),
            multihop: self.multihop,
            enforce_peer_nexthop: self.enforce_peer_nexthop,
            enforce_first_as: self.enforce_first_as,
            neighbors: parse_neighbors(&self.neighbors),
        }
    }
}

#[derive(Parser, Debug)]
#[clap(rename_all = "kebab-case")]
pub struct SettingsOptions {
    #[clap(long)]
    pub asn: Option<String>,
    #[clap(long)]
    pub router_id: Option<String>,
    #[clap(long)]
    pub bgpq_args: Option<String>,
    #[clap(long)]
    pub peeringdb_url: Option<String>,
    #[clap(long)]
    pub irr_server: Option<String>,
    #[clap(long)]
    pub rtr_server: Option<String>,
    #[clap(long, parse(try_from_str))]
    pub accept_default: Option<bool>,
    #[clap(long, parse(try_from_str))]
    pub default_route: Option<bool>,
    #[clap(long, parse(try_from_str))]
    pub keep_filtered: Option<bool>,
}

impl SettingsOptions {
    /// Complete settings record: `current` overlaid with the given flags
    pub fn merge(&self, current: Settings) -> Settings {
        fn pick<T: Clone>(given: &Option<T>, current: T) -> T {
            given.clone().unwrap_or(current)
        }
        Settings {
            asn: pick(&self.asn, current.asn),
            router_id: pick(&self.router_id, current.router_id),
            bgpq_args: pick(&self.bgpq_args, current.bgpq_args),
            peeringdb_url: pick(&self.peeringdb_url, current.peeringdb_url),
            irr_server: pick(&self.irr_server, current.irr_server),
            rtr_server: pick(&self.rtr_server, current.rtr_server),
            accept_default: pick(&self.accept_default, current.accept_default),
            default_route: pick(&self.default_route, current.default_route),
            keep_filtered: pick(&self.keep_filtered, current.keep_filtered),
        }
    }
}

fn print_table<T: ToRow>(rows: Vec<T>, empty: &str) {
    if rows.is_empty() {
        println!("{}", empty.dimmed());
        return;
    }
    let mut table = OutputTable::new();
    for row in rows.iter() {
        table.add_row(row);
    }
    table.print();
}

fn report(outcome: &SubmitOutcome) {
    for rejection in &outcome.rejected {
        eprintln!("{}", format!("Rejected: {}", rejection).red());
    }
    if outcome.peers_discarded {
        eprintln!("{}", "Peers payload discarded, stored peers kept".yellow());
    }
    if outcome.rejected.is_empty() && !outcome.peers_discarded {
        println!("{}", "Configuration saved".green());
    }
}

async fn submit(client: &HttpClient, submission: Submission) -> Result<(), Box<dyn Error>> {
    let outcome = client.submit_form(submission).await?;
    report(&outcome);
    Ok(())
}

/// Apply a peer edit locally, then submit the whole peers mapping
async fn submit_peers(client: &HttpClient, op: Operation) -> Result<(), Box<dyn Error>> {
    let current = client.show_config().await?;
    let settings = current.settings.clone();
    match op.apply(current) {
        Ok(next) => submit(client, Submission::new(settings).with_peers(&next.peers)?).await,
        Err(rejection) => {
            eprintln!("{}", format!("Rejected: {}", rejection).red());
            Ok(())
        }
    }
}

fn run_offline(cmd: &Command) -> Result<(), Box<dyn Error>> {
    match cmd {
        Command::Render(options) => {
            let state = JsonFile::new(&options.state).load()?;
            print!("{}", render(&state));
        }
        Command::Check(options) => {
            let state = JsonFile::new(&options.state).load()?;
            let collisions = sanitized_collisions(&state.peers);
            if collisions.is_empty() {
                println!("{}", "No peer name collisions".green());
            }
            for (key, names) in collisions {
                println!(
                    "{} {}",
                    format!("{}:", key).yellow(),
                    names.iter().map(|n| format!("{:?}", n)).collect::<Vec<_>>().join(", ")
                );
            }
        }
        _ => (),
    }
    Ok(())
}

async fn query(args: &Args) -> Result<(), Box<dyn Error>> {
    let client = {
        let base = format!("http://{}:{}", args.host, args.port);
        HttpClientBuilder::default().build(base)?
    };
    match &args.cmd {
        Command::Show(show) => {
            let config = client.show_config().await?;
            match show {
                Show::Settings => print_table(SettingRow::all(&config.settings), ""),
                Show::Statics => print_table(StaticRow::all(&config), "No static routes"),
                Show::Prefixes => print_table(PrefixRow::all(&config), "No prefixes"),
                Show::Peers => print_table(PeerRow::all(&config), "No peers"),
                Show::Document => print!("{}", client.render().await?),
            }
        }
        Command::Static(StaticCommand::Add { prefix, next_hop }) => {
            let config = client.show_config().await?;
            let action = FormAction::AddStatic {
                prefix: prefix.clone(),
                next_hop: next_hop.clone(),
            };
            submit(&client, Submission::new(config.settings).with_action(action)).await?;
        }
        Command::Static(StaticCommand::Remove { prefix }) => {
            let config = client.remove_static(prefix.clone()).await?;
            print_table(StaticRow::all(&config), "No static routes");
        }
        Command::Prefix(PrefixCommand::Add { value }) => {
            let config = client.show_config().await?;
            let action = FormAction::AddPrefix {
                value: value.clone(),
            };
            submit(&client, Submission::new(config.settings).with_action(action)).await?;
        }
        Command::Prefix(PrefixCommand::Remove { index }) => {
            let config = client.remove_prefix(*index).await?;
            print_table(PrefixRow::all(&config), "No prefixes");
        }
        Command::Peer(PeerCommand::Add(options)) => {
            let op = Operation::AddPeer {
                name: options.name.clone(),
                draft: options.draft(),
            };
            submit_peers(&client, op).await?;
        }
        Command::Peer(PeerCommand::Remove { name }) => {
            let op = Operation::RemovePeer { name: name.clone() };
            submit_peers(&client, op).await?;
        }
        Command::Settings(options) => {
            let config = client.show_config().await?;
            let settings = options.merge(config.settings);
            submit(&client, Submission::new(settings)).await?;
        }
        Command::LoadExample => {
            client.load_example().await?;
            println!("{}", "Loaded example configuration".green());
        }
        Command::Run(_) | Command::Render(_) | Command::Check(_) => run_offline(&args.cmd)?,
    }
    Ok(())
}

async fn run_cmd(args: &Args) -> Result<(), Box<dyn Error>> {
    match &args.cmd {
        Command::Run(options) => serve(ServerConfig::from_file(&options.config_path)?).await,
        Command::Render(_) | Command::Check(_) => run_offline(&args.cmd),
        _ => query(args).await,
    }
}

/// Entry point for every subcommand
pub async fn run(args: &Args) -> bool {
    match run_cmd(args).await {
        Ok(_) => true,
        Err(err) => {
            eprintln!("{}", err.to_string().red());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_peer_add() {
        let args = Args::parse_from(&[
            "policygen",
            "peer",
            "add",
            "HYEHOST-FMT-V6",
            "--asn",
            "47272",
            "--listen6",
            "2602:f96d:200:13::1",
            "--template",
            "upstream",
            "--multihop",
            "--neighbors",
            "2602:f96d:200::1, 2001:504:125:e0::2",
        ]);
        match args.cmd {
            Command::Peer(PeerCommand::Add(options)) => {
                let peer = options.draft().into_peer().unwrap();
                assert_eq!(peer.asn, 47272);
                assert!(peer.multihop);
                assert!(!peer.enforce_first_as);
                assert_eq!(peer.neighbors, vec!["2602:f96d:200::1", "2001:504:125:e0::2"]);

                let op = Operation::AddPeer {
                    name: options.name.clone(),
                    draft: options.draft(),
                };
                let state = op.apply(crate::ConfigurationState::default()).unwrap();
                assert_eq!(state.peers.get("HYEHOST-FMT-V6"), Some(&peer));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_settings_merge() {
        let args = Args::parse_from(&[
            "policygen",
            "-vv",
            "settings",
            "--asn",
            "216401",
            "--keep-filtered",
            "true",
        ]);
        assert_eq!(args.verbose, 2);
        match args.cmd {
            Command::Settings(options) => {
                let settings = options.merge(Settings::default());
                assert_eq!(settings.asn, "216401");
                assert!(settings.keep_filtered);
                assert!(!settings.accept_default);
                assert_eq!(settings.irr_server, "rr.ntt.net");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_offline() {
        let args = Args::parse_from(&["policygen", "render", "--state", "/tmp/state.json"]);
        assert!(matches!(
            args.cmd,
            Command::Render(StateOptions { ref state }) if state == &PathBuf::from("/tmp/state.json")
        ));
    }
}
