// Legacy API station endpoints
//
// Listing via stat/sta and the kick command via cmd/stamgr.

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::legacy::client::LegacyClient;
use crate::legacy::models::StationEntry;

impl LegacyClient {
    /// List all currently connected clients (stations).
    ///
    /// `GET /api/s/{site}/stat/sta`
    pub async fn list_clients(&self) -> Result<Vec<StationEntry>, Error> {
        let url = self.site_url("stat/sta")?;
        debug!("listing connected clients");
        self.get(url).await
    }

    /// Disconnect (kick) a client so it re-associates.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with `{"cmd": "kick-sta", "mac": "..."}`
    pub async fn kick_client(&self, mac: &str) -> Result<(), Error> {
        let url = self.site_url("cmd/stamgr")?;
        debug!(mac, "kicking client");
        let _: Vec<serde_json::Value> = self
            .post(
                url,
                &json!({
                    "cmd": "kick-sta",
                    "mac": mac,
                }),
            )
            .await?;
        Ok(())
    }
}
