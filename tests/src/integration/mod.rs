//! Cross-crate tests driving `Subject` through the public API only.

pub mod lifetime;
pub mod scenarios;
pub mod stress;
