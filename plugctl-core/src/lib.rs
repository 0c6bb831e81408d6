// plugctl-core/src/lib.rs
pub mod install;
pub mod installed;
pub mod uninstall;
pub mod upgrade;
pub mod version;

// Re-export key types for easier use by the CLI crate
pub use upgrade::{
    FsPluginStore, LocalPluginReader, OutputSink, PluginInstaller, PluginRemover,
    RemoteCatalogClient, RepositoryInstaller, UpgradeOrchestrator,
};
pub use version::should_upgrade;
