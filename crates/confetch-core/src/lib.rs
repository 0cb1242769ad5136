//! # confetch-core
//!
//! Core library for confetch configuration providers providing:
//! - Requested-key parsing (option suffixes such as `?ttl=`)
//! - Backend identifier resolution (percent-decoding, path/key joining)
//! - Not-found handling policy
//! - The resolved-data model shared by all providers

pub mod data;
pub mod error;
pub mod identifier;
pub mod params;
pub mod reference;
pub mod strategy;

pub use data::{min_ttl, ConfigData, Lookup};
pub use error::{Error, Result};
pub use identifier::{percent_decode, resolve_identifier, ObjectLocation};
pub use params::ProviderParams;
pub use reference::ParsedKey;
pub use strategy::NotFoundStrategy;
