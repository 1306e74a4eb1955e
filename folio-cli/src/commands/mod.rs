//! CLI command implementations.

pub mod build;
pub mod init;
pub mod plan;

pub use build::build_site;
pub use init::init_project;
pub use plan::show_plan;
