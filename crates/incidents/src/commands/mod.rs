pub(crate) use build::Build;
pub(crate) use clean::Clean;
pub(crate) use config::Config;
pub(crate) use init::Init;
pub(crate) use summary::Summary;
pub(crate) use version::Version;

mod build;
mod clean;
mod config;
mod init;
mod summary;
mod version;
