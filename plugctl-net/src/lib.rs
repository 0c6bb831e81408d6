// plugctl-net/src/lib.rs
pub mod api;
pub mod http;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
pub mod validation;

pub use api::CatalogClient;
pub use http::{build_http_client, download_to_path};
pub use plugctl_common::{
    error::{PlugError, Result},
    model::{CatalogPlugin, CatalogVersion, RemotePluginInfo},
    Config,
};
pub use validation::validate_url;
