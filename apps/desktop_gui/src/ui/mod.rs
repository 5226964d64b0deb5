//! UI layer for the inventory screen: app shell and theme.

pub mod app;
pub mod theme;

pub use app::InventoryApp;
