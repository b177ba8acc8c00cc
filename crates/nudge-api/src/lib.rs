// nudge-api: the slice of the UniFi controller's legacy session API that
// nudge needs -- login, list connected stations, kick a station.

pub mod auth;
pub mod error;
pub mod legacy;
pub mod transport;

pub use auth::ControllerPlatform;
pub use error::Error;
pub use legacy::LegacyClient;
pub use legacy::models::StationEntry;
pub use transport::{TlsMode, TransportConfig};
