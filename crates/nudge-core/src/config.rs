// ── Reconnect settings ──
//
// `ReconnectOptions` is the mergeable form: every scalar is optional so a
// source that didn't mention a setting leaves it unset. Sources are merged
// highest-precedence first, then `validate()` turns the result into a
// `RunConfig` whose required fields can no longer be missing.
// Nothing here touches disk; `nudge-config` does the file loading.

use std::collections::{BTreeSet, btree_set};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::{CoreError, RequiredField};

/// Threshold (dBm) used when no source sets one.
pub const DEFAULT_MINIMUM_SIGNAL_STRENGTH: i32 = -55;

// ── ExclusionSet ────────────────────────────────────────────────────

/// Case-insensitive set of strings (MAC addresses or SSIDs).
///
/// Values are case-folded on insert and on lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet(BTreeSet<String>);

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value. Returns `false` if an equal value (ignoring case)
    /// was already present.
    pub fn insert(&mut self, value: &str) -> bool {
        self.0.insert(fold(value))
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.contains(&fold(value))
    }

    /// Add every entry of `other` to this set.
    pub fn extend_from(&mut self, other: ExclusionSet) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the case-folded entries in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.into_iter()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|s| fold(s.as_ref())).collect())
    }
}

impl<'a> IntoIterator for &'a ExclusionSet {
    type Item = &'a str;
    type IntoIter = std::iter::Map<btree_set::Iter<'a, String>, fn(&'a String) -> &'a str>;

    fn into_iter(self) -> Self::IntoIter {
        let as_str: fn(&'a String) -> &'a str = String::as_str;
        self.0.iter().map(as_str)
    }
}

fn fold(value: &str) -> String {
    value.to_lowercase()
}

// ── ReconnectOptions ────────────────────────────────────────────────

/// Settings from a single source (CLI, file, or built-in defaults), or
/// the merge of several.
#[derive(Debug, Clone, Default)]
pub struct ReconnectOptions {
    /// Controller base URL (e.g., `https://192.168.1.1`).
    pub base_uri: Option<Url>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    /// Clients at or above this signal (dBm) are left alone.
    pub minimum_signal_strength: Option<i32>,
    /// Skip TLS certificate validation.
    pub insecure_tls: Option<bool>,
    pub excluded_macs: ExclusionSet,
    pub excluded_ssids: ExclusionSet,
    pub verbose: bool,
    /// Where the JSON options file lives. Only meaningful on the CLI
    /// source; never merged.
    pub options_file: Option<PathBuf>,
}

impl ReconnectOptions {
    /// The built-in defaults, merged last.
    pub fn defaults() -> Self {
        Self {
            minimum_signal_strength: Some(DEFAULT_MINIMUM_SIGNAL_STRENGTH),
            insecure_tls: Some(false),
            ..Self::default()
        }
    }

    /// Merge a lower-precedence source into this one.
    ///
    /// Scalars already set here win; unset scalars adopt `other`'s value.
    /// Exclusion sets are unioned and `verbose` is OR'd.
    pub fn merge(&mut self, other: ReconnectOptions) {
        self.base_uri = self.base_uri.take().or(other.base_uri);
        self.username = self.username.take().or(other.username);
        self.password = self.password.take().or(other.password);
        self.minimum_signal_strength = self
            .minimum_signal_strength
            .or(other.minimum_signal_strength);
        self.insecure_tls = self.insecure_tls.or(other.insecure_tls);
        self.excluded_macs.extend_from(other.excluded_macs);
        self.excluded_ssids.extend_from(other.excluded_ssids);
        self.verbose = self.verbose || other.verbose;
    }

    /// Check the required fields and finalize into a [`RunConfig`].
    ///
    /// Fields are checked in order: base URI, username, password. An empty
    /// username or password counts as missing.
    pub fn validate(self) -> Result<RunConfig, CoreError> {
        let base_uri = self.base_uri.ok_or(CoreError::MissingRequiredField {
            field: RequiredField::BaseUri,
        })?;

        let username = self
            .username
            .filter(|u| !u.is_empty())
            .ok_or(CoreError::MissingRequiredField {
                field: RequiredField::Username,
            })?;

        let password = self
            .password
            .filter(|p| !p.expose_secret().is_empty())
            .ok_or(CoreError::MissingRequiredField {
                field: RequiredField::Password,
            })?;

        Ok(RunConfig {
            base_uri,
            username,
            password,
            insecure_tls: self.insecure_tls.unwrap_or(false),
            verbose: self.verbose,
            policy: ReconnectPolicy {
                minimum_signal_strength: self
                    .minimum_signal_strength
                    .unwrap_or(DEFAULT_MINIMUM_SIGNAL_STRENGTH),
                excluded_macs: self.excluded_macs,
                excluded_ssids: self.excluded_ssids,
            },
        })
    }
}

// ── RunConfig ───────────────────────────────────────────────────────

/// Which clients get reconnected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub minimum_signal_strength: i32,
    pub excluded_macs: ExclusionSet,
    pub excluded_ssids: ExclusionSet,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            minimum_signal_strength: DEFAULT_MINIMUM_SIGNAL_STRENGTH,
            excluded_macs: ExclusionSet::new(),
            excluded_ssids: ExclusionSet::new(),
        }
    }
}

/// Validated settings for one reconnect pass.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub base_uri: Url,
    pub username: String,
    pub password: SecretString,
    pub insecure_tls: bool,
    pub verbose: bool,
    pub policy: ReconnectPolicy,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    fn complete() -> ReconnectOptions {
        ReconnectOptions {
            base_uri: Some(url("https://unifi.local:8443")),
            username: Some("admin".into()),
            password: Some(secret("hunter2")),
            ..ReconnectOptions::default()
        }
    }

    #[test]
    fn exclusion_set_ignores_case() {
        let set: ExclusionSet = ["AA:BB:CC:DD:EE:FF", "aa:bb:cc:dd:ee:ff"].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert!(set.contains("Aa:Bb:Cc:Dd:Ee:Ff"));
        assert!(!set.contains("aa:bb:cc:dd:ee:00"));
    }

    #[test]
    fn merge_keeps_higher_precedence_scalars() {
        let mut cli = ReconnectOptions {
            base_uri: Some(url("https://cli.local")),
            minimum_signal_strength: Some(-70),
            insecure_tls: Some(true),
            ..ReconnectOptions::default()
        };
        let file = ReconnectOptions {
            base_uri: Some(url("https://file.local")),
            username: Some("from-file".into()),
            minimum_signal_strength: Some(-60),
            insecure_tls: Some(false),
            ..ReconnectOptions::default()
        };

        cli.merge(file);

        assert_eq!(cli.base_uri, Some(url("https://cli.local")));
        assert_eq!(cli.username.as_deref(), Some("from-file"));
        assert_eq!(cli.minimum_signal_strength, Some(-70));
        assert_eq!(cli.insecure_tls, Some(true));
        assert!(cli.password.is_none());
    }

    #[test]
    fn merge_order_decides_precedence() {
        let a = ReconnectOptions {
            minimum_signal_strength: Some(-60),
            ..ReconnectOptions::default()
        };
        let b = ReconnectOptions {
            minimum_signal_strength: Some(-80),
            ..ReconnectOptions::default()
        };

        let mut ab = a.clone();
        ab.merge(b.clone());
        let mut ba = b;
        ba.merge(a);

        assert_eq!(ab.minimum_signal_strength, Some(-60));
        assert_eq!(ba.minimum_signal_strength, Some(-80));
    }

    #[test]
    fn merge_unions_exclusions_and_ors_verbose() {
        let mut cli = ReconnectOptions {
            excluded_macs: ["AA:AA:AA:AA:AA:AA"].into_iter().collect(),
            excluded_ssids: ["Guest"].into_iter().collect(),
            ..ReconnectOptions::default()
        };
        let file = ReconnectOptions {
            excluded_macs: ["aa:aa:aa:aa:aa:aa", "bb:bb:bb:bb:bb:bb"].into_iter().collect(),
            excluded_ssids: ["IoT"].into_iter().collect(),
            verbose: true,
            ..ReconnectOptions::default()
        };

        cli.merge(file);

        assert_eq!(
            cli.excluded_macs.iter().collect::<Vec<_>>(),
            vec!["aa:aa:aa:aa:aa:aa", "bb:bb:bb:bb:bb:bb"]
        );
        assert_eq!(cli.excluded_ssids.iter().collect::<Vec<_>>(), vec!["guest", "iot"]);
        assert!(cli.verbose);
    }

    #[test]
    fn merge_never_touches_options_file() {
        let mut cli = ReconnectOptions::default();
        cli.merge(ReconnectOptions {
            options_file: Some(PathBuf::from("/etc/nudge.json")),
            ..ReconnectOptions::default()
        });
        assert!(cli.options_file.is_none());
    }

    #[test]
    fn defaults_fill_the_gaps() {
        let mut options = complete();
        options.merge(ReconnectOptions::defaults());

        let config = options.validate().unwrap();
        assert_eq!(config.policy.minimum_signal_strength, -55);
        assert!(!config.insecure_tls);
        assert!(!config.verbose);
    }

    #[test]
    fn validate_reports_missing_base_uri_first() {
        let options = ReconnectOptions {
            base_uri: None,
            username: None,
            ..complete()
        };
        let err = options.validate().unwrap_err();
        assert!(matches!(
            err,
            CoreError::MissingRequiredField {
                field: RequiredField::BaseUri
            }
        ));
    }

    #[test]
    fn validate_rejects_empty_username() {
        let options = ReconnectOptions {
            username: Some(String::new()),
            ..complete()
        };
        let err = options.validate().unwrap_err();
        assert!(matches!(
            err,
            CoreError::MissingRequiredField {
                field: RequiredField::Username
            }
        ));
    }

    #[test]
    fn validate_rejects_empty_password() {
        let options = ReconnectOptions {
            password: Some(secret("")),
            ..complete()
        };
        let err = options.validate().unwrap_err();
        assert!(matches!(
            err,
            CoreError::MissingRequiredField {
                field: RequiredField::Password
            }
        ));
    }

    #[test]
    fn validate_carries_everything_over() {
        let options = ReconnectOptions {
            minimum_signal_strength: Some(-67),
            insecure_tls: Some(true),
            excluded_macs: ["aa:bb:cc:dd:ee:ff"].into_iter().collect(),
            verbose: true,
            ..complete()
        };

        let config = options.validate().unwrap();

        assert_eq!(config.base_uri, url("https://unifi.local:8443"));
        assert_eq!(config.username, "admin");
        assert_eq!(config.password.expose_secret(), "hunter2");
        assert!(config.insecure_tls);
        assert!(config.verbose);
        assert_eq!(config.policy.minimum_signal_strength, -67);
        assert!(config.policy.excluded_macs.contains("AA:BB:CC:DD:EE:FF"));
    }
}
