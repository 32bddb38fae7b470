//! HTTP adapters - the Epic backend's REST API.

mod epic_api;

pub use epic_api::{EpicApiClient, EpicApiConfig};
