// ── API-to-domain type conversions ──
//
// Bridges raw `nudge_api` station entries into `ClientRecord`, filling
// defaults for fields the controller left out.

use nudge_api::StationEntry;

use crate::model::ClientRecord;

impl From<StationEntry> for ClientRecord {
    fn from(entry: StationEntry) -> Self {
        Self {
            mac_address: entry.mac,
            hostname: entry.hostname.filter(|h| !h.is_empty()),
            is_wired: entry.is_wired.unwrap_or(false),
            radio_protocol: entry.radio_proto.unwrap_or_default(),
            signal_strength: entry.signal,
            ess_id: entry.essid.unwrap_or_default(),
        }
    }
}
