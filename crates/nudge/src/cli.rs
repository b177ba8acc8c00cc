//! Clap derive structures for the `nudge` CLI.
//!
//! Only depends on clap so `build.rs` can include it for the man page.

use std::path::PathBuf;

use clap::Parser;

/// nudge -- push weak 2.4 GHz clients toward a better access point
#[derive(Debug, Parser)]
#[command(
    name = "nudge",
    version,
    about = "Reconnect UniFi wireless clients with a weak 2.4 GHz signal",
    long_about = "Logs in to a UniFi controller, lists connected clients, and kicks every \
        wireless client on the 2.4 GHz (ng) radio whose signal is below the threshold, \
        so it re-associates with a better access point.\n\n\
        Settings come from flags, then the JSON options file \
        (~/.config/nudge/config.json by default), then built-in defaults."
)]
pub struct Cli {
    /// Controller base URL (e.g. https://192.168.1.1)
    #[arg(long, short = 'b', env = "NUDGE_BASE_URI", value_name = "URI")]
    pub base_uri: Option<String>,

    /// Controller username
    #[arg(long, short = 'u', env = "NUDGE_USERNAME")]
    pub username: Option<String>,

    /// Controller password
    #[arg(long, short = 'p', env = "NUDGE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Reconnect clients whose signal (dBm) is below this value [default: -55]
    #[arg(
        long,
        short = 'm',
        value_name = "DBM",
        allow_negative_numbers = true
    )]
    pub minimum_signal_strength: Option<i32>,

    /// Accept invalid or self-signed TLS certificates
    #[arg(long, short = 'i')]
    pub insecure_tls: bool,

    /// Never reconnect this MAC address (repeatable)
    #[arg(long = "exclude-mac", short = 'e', value_name = "MAC", num_args = 1..)]
    pub excluded_macs: Vec<String>,

    /// Never reconnect clients on this SSID (repeatable)
    #[arg(long = "exclude-ssid", short = 's', value_name = "SSID", num_args = 1..)]
    pub excluded_ssids: Vec<String>,

    /// JSON options file [default: ~/.config/nudge/config.json]
    #[arg(long, short = 'o', env = "NUDGE_OPTIONS_FILE", value_name = "PATH")]
    pub options_file: Option<PathBuf>,

    /// Log progress (which clients are reconnected)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
