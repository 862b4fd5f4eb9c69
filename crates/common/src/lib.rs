//! Shared utilities, configuration, and error handling for Wardrobe
//!
//! This crate provides common functionality used across the Wardrobe engine:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Actor context carried explicitly into every engine call
//! - Opaque pagination cursor codec

pub mod config;
pub mod context;
pub mod cursor;
pub mod error;
pub mod extractors;
pub mod state;

pub use config::Config;
pub use context::ActorContext;
pub use cursor::Cursor;
pub use error::{Error, Result};
pub use extractors::{PageParams, ValidatedJson};
pub use state::StateError;
