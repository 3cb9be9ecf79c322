//! Core types, validation, and analytics shaping for the collector.

pub mod analytics;
pub mod client;
pub mod error;
pub mod event;
pub mod json;
pub mod payload;
pub mod register;

pub use analytics::*;
pub use client::*;
pub use error::{AuthFailure, Error, ProcessingKind, Result};
pub use event::*;
pub use register::*;
