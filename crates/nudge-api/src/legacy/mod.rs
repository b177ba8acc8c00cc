// Legacy API client modules
//
// Hand-written client for the controller's legacy (non-OpenAPI) endpoints,
// wrapped in the standard `{ meta: { rc, msg }, data: [...] }` envelope.

pub mod auth;
pub mod client;
pub mod clients;
pub mod models;

pub use client::LegacyClient;
