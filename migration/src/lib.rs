//! Migration bookkeeping: the version masterlist and the registry block in the
//! migrator script that is generated from it.

pub mod config;
pub mod error;
pub mod masterlist;
pub mod registry;

pub use config::MigratorConfig;
pub use error::{MigrationError, Result};
pub use masterlist::Masterlist;
pub use registry::RegistryGenerator;
