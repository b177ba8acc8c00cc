//! Reconnect logic between `nudge-api` and the `nudge` binary.
//!
//! - **[`ReconnectOptions`]**: Mergeable settings from one source. Merge
//!   sources highest precedence first, then [`validate()`](ReconnectOptions::validate)
//!   into a [`RunConfig`].
//!
//! - **[`should_reconnect`]**: Pure eligibility rule: wireless `ng` clients
//!   below the signal threshold, minus excluded MACs and SSIDs.
//!
//! - **[`ControllerApi`]**: The three controller calls a pass needs.
//!   [`UnifiSession`] implements it over the UniFi legacy API.
//!
//! - **[`Reconnector`]**: Runs one authenticate / list / kick pass,
//!   restarting it on transient failures per its [`RetryPolicy`].

pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod filter;
pub mod model;
pub mod reconnect;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{
    DEFAULT_MINIMUM_SIGNAL_STRENGTH, ExclusionSet, ReconnectOptions, ReconnectPolicy, RunConfig,
};
pub use controller::{ControllerApi, DEFAULT_SITE, UnifiSession};
pub use error::{CoreError, RequiredField};
pub use filter::should_reconnect;
pub use model::ClientRecord;
pub use reconnect::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, PassState, PassSummary, Reconnector, RetryPolicy,
};
