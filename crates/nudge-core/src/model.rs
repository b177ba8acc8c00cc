// ── Client domain type ──

/// A connected client as seen in one listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRecord {
    pub mac_address: String,
    pub hostname: Option<String>,
    pub is_wired: bool,
    /// Controller protocol tag (`ng` for 2.4 GHz, `na`, `ac`, `ax`, ...).
    /// Empty when the controller didn't report one.
    pub radio_protocol: String,
    /// Signal in dBm. `None` when the controller reports no signal.
    pub signal_strength: Option<i32>,
    /// SSID the client is associated with. Empty for wired clients.
    pub ess_id: String,
}

impl ClientRecord {
    /// Hostname when known, MAC otherwise.
    pub fn display_name(&self) -> &str {
        self.hostname.as_deref().unwrap_or(&self.mac_address)
    }
}
