//! Client side of the inventory: configuration, the generic table-query REST
//! client and the `InventoryStore` seam the front ends drive.

pub mod config;
pub mod error;
pub mod inventory;
pub mod rest;

pub use config::{ClientConfig, ConfigError, ConfigOverrides};
pub use error::ClientError;
pub use inventory::{InventoryStore, RemoteInventory};
pub use reqwest::StatusCode;
pub use rest::RestTableClient;
