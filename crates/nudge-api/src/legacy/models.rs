// Legacy API wire types
//
// Station fields are all optional: firmware versions disagree about which
// ones they send, and wired stations omit the radio fields entirely.

use serde::Deserialize;

// ── Envelope ────────────────────────────────────────────────────────

/// `{ "meta": { "rc": "ok", "msg": "..." }, "data": [...] }`
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub meta: Meta,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct Meta {
    pub rc: String,
    #[serde(default)]
    pub msg: Option<String>,
}

impl Meta {
    pub fn is_ok(&self) -> bool {
        self.rc == "ok"
    }
}

/// Error body UniFi OS returns with HTTP 200:
/// `{"error":{"code":403,"message":"..."}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct UnifiOsFault {
    pub error: Option<FaultDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FaultDetail {
    pub code: u16,
    pub message: Option<String>,
}

// ── Station ─────────────────────────────────────────────────────────

/// One connected client from `stat/sta`.
#[derive(Debug, Clone, Deserialize)]
pub struct StationEntry {
    pub mac: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub is_wired: Option<bool>,
    /// SSID, absent for wired stations.
    #[serde(default)]
    pub essid: Option<String>,
    /// `ng` (2.4 GHz), `na`, `ac`, `ax`, `be`.
    #[serde(default)]
    pub radio_proto: Option<String>,
    /// dBm.
    #[serde(default)]
    pub signal: Option<i32>,
}
