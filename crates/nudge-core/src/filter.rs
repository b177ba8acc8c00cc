// ── Client eligibility ──
//
// Pure predicate deciding whether a client gets kicked. Only wireless
// clients on the 2.4 GHz `ng` protocol with a signal strictly below the
// threshold qualify, and never when their MAC or SSID is excluded.

use crate::config::ReconnectPolicy;
use crate::model::ClientRecord;

/// Protocol tag of clients that are candidates for a reconnect.
pub const TARGET_RADIO_PROTOCOL: &str = "ng";

/// Returns `true` if `client` should be forced to reconnect.
pub fn should_reconnect(client: &ClientRecord, policy: &ReconnectPolicy) -> bool {
    if client.is_wired {
        return false;
    }

    if client.radio_protocol != TARGET_RADIO_PROTOCOL {
        return false;
    }

    match client.signal_strength {
        Some(signal) if signal < policy.minimum_signal_strength => {}
        _ => return false,
    }

    if policy.excluded_macs.contains(&client.mac_address) {
        return false;
    }

    if policy.excluded_ssids.contains(&client.ess_id) {
        return false;
    }

    true
}
