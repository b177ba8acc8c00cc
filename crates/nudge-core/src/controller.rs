// ── Controller capability ──
//
// The reconnect pass talks to the controller only through `ControllerApi`,
// so it can be driven by a stub in tests. `UnifiSession` is the real
// implementation on top of the legacy session API.

use std::future::Future;

use secrecy::SecretString;
use tracing::debug;
use url::Url;

use nudge_api::{ControllerPlatform, LegacyClient, TransportConfig};

use crate::error::CoreError;
use crate::model::ClientRecord;

/// Site every request is scoped to.
pub const DEFAULT_SITE: &str = "default";

/// What a reconnect pass needs from a controller.
pub trait ControllerApi {
    /// Stop validating the controller's TLS certificate for all later calls.
    fn disable_certificate_validation(&mut self) -> Result<(), CoreError>;

    /// Log in. `Ok(false)` means the controller refused the credentials.
    fn authenticate(
        &mut self,
        username: &str,
        password: &SecretString,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    /// Every client currently connected.
    fn list_active_clients(
        &self,
    ) -> impl Future<Output = Result<Vec<ClientRecord>, CoreError>> + Send;

    /// Force the client with this MAC to drop and re-associate.
    fn reconnect_client(
        &self,
        mac_address: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

// ── UnifiSession ────────────────────────────────────────────────────

/// Controller session over the UniFi legacy API.
///
/// Every `authenticate` call probes the platform and logs in afresh, so a
/// retried pass never reuses a half-broken session.
pub struct UnifiSession {
    base_url: Url,
    site: String,
    transport: TransportConfig,
    http: reqwest::Client,
    client: Option<LegacyClient>,
}

impl UnifiSession {
    /// Open a session against `base_url` with strict TLS.
    pub fn open(base_url: Url) -> Result<Self, CoreError> {
        Self::with_transport(base_url, TransportConfig::default())
    }

    /// Open a session with custom transport settings.
    ///
    /// A cookie jar is added if the config lacks one.
    pub fn with_transport(base_url: Url, transport: TransportConfig) -> Result<Self, CoreError> {
        let transport = if transport.cookie_jar.is_some() {
            transport
        } else {
            transport.with_cookie_jar()
        };
        let http = transport.build_client()?;
        Ok(Self {
            base_url,
            site: DEFAULT_SITE.into(),
            transport,
            http,
            client: None,
        })
    }

    /// Platform detected by the last successful login.
    pub fn platform(&self) -> Option<ControllerPlatform> {
        self.client.as_ref().map(LegacyClient::platform)
    }

    fn client(&self) -> Result<&LegacyClient, CoreError> {
        self.client
            .as_ref()
            .ok_or_else(|| CoreError::Internal("controller session used before login".into()))
    }
}

impl ControllerApi for UnifiSession {
    fn disable_certificate_validation(&mut self) -> Result<(), CoreError> {
        self.transport = self.transport.clone().insecure();
        self.http = self.transport.build_client()?;
        self.client = None;
        Ok(())
    }

    async fn authenticate(
        &mut self,
        username: &str,
        password: &SecretString,
    ) -> Result<bool, CoreError> {
        self.client = None;

        let platform = LegacyClient::detect_platform(&self.http, &self.base_url).await?;
        debug!(?platform, "detected controller platform");

        let client = LegacyClient::with_client(
            self.http.clone(),
            self.base_url.clone(),
            self.site.clone(),
            platform,
        );

        match client.login(username, password).await {
            Ok(()) => {
                self.client = Some(client);
                Ok(true)
            }
            Err(e) if e.is_auth_rejected() => {
                debug!(error = %e, "login rejected");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_active_clients(&self) -> Result<Vec<ClientRecord>, CoreError> {
        let entries = self.client()?.list_clients().await?;
        Ok(entries.into_iter().map(ClientRecord::from).collect())
    }

    async fn reconnect_client(&self, mac_address: &str) -> Result<(), CoreError> {
        self.client()?.kick_client(mac_address).await?;
        Ok(())
    }
}
