// plugctl-common/src/model/mod.rs
pub mod plugin;

pub use plugin::{
    current_platform, CatalogPlugin, CatalogVersion, InstalledPluginInfo, PluginManifest,
    RemotePluginInfo,
};
