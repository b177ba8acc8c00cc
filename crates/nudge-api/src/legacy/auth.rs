// Legacy API login and platform probing
//
// Login stores the session cookie in the client's jar; later requests
// carry it automatically. UniFi OS also issues a CSRF token here.

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::auth::ControllerPlatform;
use crate::error::Error;
use crate::legacy::client::{CSRF_HEADER, LegacyClient};

impl LegacyClient {
    /// Log in with username and password.
    ///
    /// `POST /api/auth/login` on UniFi OS, `POST /api/login` otherwise.
    /// HTTP 400/401/403 means the credentials were refused and yields
    /// [`Error::Authentication`]; any other failure status is
    /// [`Error::LegacyApi`].
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.base_url().join(self.platform().login_path())?;
        debug!(%url, username, "logging in");

        let resp = self
            .http()
            .post(url)
            .json(&json!({
                "username": username,
                "password": password.expose_secret(),
            }))
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(login_failure(status, &body));
        }

        if let Some(token) = resp
            .headers()
            .get(CSRF_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            debug!("storing CSRF token");
            self.csrf().set(token.to_owned());
        }

        debug!("login successful");
        Ok(())
    }

    /// Work out which platform serves `base_url`.
    ///
    /// Anything other than 404 on `GET /api/auth/login` means UniFi OS.
    /// Otherwise the classic login endpoint has to answer at all, or the
    /// controller is unreachable. Takes the caller's HTTP client so its TLS
    /// settings apply to the probes.
    pub async fn detect_platform(
        http: &reqwest::Client,
        base_url: &Url,
    ) -> Result<ControllerPlatform, Error> {
        let probe = base_url.join(ControllerPlatform::UnifiOs.login_path())?;
        debug!(%probe, "probing for UniFi OS");

        if let Ok(resp) = http.get(probe).send().await {
            if resp.status() != StatusCode::NOT_FOUND {
                debug!("detected UniFi OS");
                return Ok(ControllerPlatform::UnifiOs);
            }
        }

        let probe = base_url.join(ControllerPlatform::ClassicController.login_path())?;
        debug!(%probe, "probing for a classic controller");

        http.get(probe).send().await.map_err(Error::Transport)?;
        debug!("detected classic controller");
        Ok(ControllerPlatform::ClassicController)
    }
}

fn login_failure(status: StatusCode, body: &str) -> Error {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::Authentication {
                message: format!("login rejected (HTTP {status}): {body}"),
            }
        }
        _ => Error::LegacyApi {
            message: format!("login failed (HTTP {status}): {body}"),
            status: Some(status.as_u16()),
        },
    }
}
