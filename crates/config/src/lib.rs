//! Configuration schema and loading for the shoal gateway.

pub mod loader;
pub mod schema;

pub use {
    loader::{discover_and_load, load_config},
    schema::ShoalConfig,
};
