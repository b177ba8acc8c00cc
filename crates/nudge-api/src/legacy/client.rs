// Legacy API HTTP client
//
// One `reqwest::Client` bound to a controller, a site and a platform.
// Every call goes through `send()`, which tracks CSRF token rotation and
// strips the `{ meta, data }` envelope. Endpoint methods live in sibling
// modules as inherent impls.

use std::sync::{PoisonError, RwLock};

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::ControllerPlatform;
use crate::error::Error;
use crate::legacy::models::{Envelope, UnifiOsFault};

/// Header UniFi OS uses to hand out a fresh CSRF token mid-session.
const UPDATED_CSRF_HEADER: &str = "X-Updated-CSRF-Token";

/// Header carrying the CSRF token on login responses and on our POSTs.
pub(crate) const CSRF_HEADER: &str = "X-CSRF-Token";

/// Longest slice of a response body quoted in an error.
const BODY_PREVIEW_CHARS: usize = 200;

/// Session client for the controller's legacy API.
///
/// Cookie-based: the `reqwest::Client` it wraps must have a cookie store,
/// otherwise the login session is lost between requests.
pub struct LegacyClient {
    http: reqwest::Client,
    base_url: Url,
    site: String,
    platform: ControllerPlatform,
    csrf: CsrfToken,
}

impl LegacyClient {
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        site: String,
        platform: ControllerPlatform,
    ) -> Self {
        Self {
            http,
            base_url,
            site,
            platform,
            csrf: CsrfToken::default(),
        }
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn platform(&self) -> ControllerPlatform {
        self.platform
    }

    pub(crate) fn csrf(&self) -> &CsrfToken {
        &self.csrf
    }

    /// `{base}{prefix}/api/s/{site}/{path}`
    pub(crate) fn site_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let prefix = self.platform.legacy_prefix();
        Ok(Url::parse(&format!(
            "{base}{prefix}/api/s/{}/{path}",
            self.site
        ))?)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, Error> {
        debug!("GET {}", url);
        self.send(self.http.get(url)).await
    }

    /// POST a JSON body. Carries the CSRF token when one is known.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<Vec<T>, Error> {
        debug!("POST {}", url);
        let mut builder = self.http.post(url).json(body);
        if let Some(token) = self.csrf.get() {
            builder = builder.header(CSRF_HEADER, token);
        }
        self.send(builder).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<Vec<T>, Error> {
        let resp = builder.send().await.map_err(Error::Transport)?;
        let status = resp.status();
        self.csrf.refresh(resp.headers());

        let body = resp.text().await.map_err(Error::Transport)?;
        decode_envelope(status, &body)
    }
}

// ── CSRF token ──────────────────────────────────────────────────────

/// CSRF token for UniFi OS. Required on POSTs through `/proxy/network`;
/// captured at login and rotated by the controller on later responses.
#[derive(Debug, Default)]
pub(crate) struct CsrfToken(RwLock<Option<String>>);

impl CsrfToken {
    pub(crate) fn get(&self) -> Option<String> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub(crate) fn set(&self, token: String) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Adopt a rotated token if the response carries one.
    fn refresh(&self, headers: &HeaderMap) {
        if let Some(token) = headers
            .get(UPDATED_CSRF_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            trace!("CSRF token rotated");
            self.set(token.to_owned());
        }
    }
}

// ── Envelope decoding ───────────────────────────────────────────────

/// Turn a legacy API response into its `data` payload.
///
/// HTTP 401 and UniFi OS `{"error":{"code":401}}` bodies mean the session
/// is gone and map to [`Error::Authentication`]. Other failures, including
/// `meta.rc != "ok"`, become [`Error::LegacyApi`].
pub(crate) fn decode_envelope<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> Result<Vec<T>, Error> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::Authentication {
            message: "session expired or invalid credentials".into(),
        });
    }
    if !status.is_success() {
        return Err(Error::LegacyApi {
            message: format!("HTTP {status}: {}", preview(body)),
            status: Some(status.as_u16()),
        });
    }

    // UniFi OS reports some failures as HTTP 200 with its own error shape.
    if let Ok(UnifiOsFault { error: Some(fault) }) = serde_json::from_str(body) {
        let message = fault.message.unwrap_or_default();
        return Err(match fault.code {
            401 => Error::Authentication { message },
            code => Error::LegacyApi {
                message: format!("UniFi OS error {code}: {message}"),
                status: Some(code),
            },
        });
    }

    let envelope: Envelope<T> =
        serde_json::from_str(body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(body)),
            body: body.to_owned(),
        })?;

    if envelope.meta.is_ok() {
        Ok(envelope.data)
    } else {
        Err(Error::LegacyApi {
            message: envelope
                .meta
                .msg
                .unwrap_or_else(|| format!("rc={}", envelope.meta.rc)),
            status: None,
        })
    }
}

fn preview(body: &str) -> &str {
    body.char_indices()
        .nth(BODY_PREVIEW_CHARS)
        .map_or(body, |(idx, _)| &body[..idx])
}
