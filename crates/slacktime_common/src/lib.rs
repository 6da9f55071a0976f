//! Shared foundational types used across the slacktime static timing analyzer.
//!
//! This crate provides interned signal identifiers and the internal result
//! type used by the loader, the topological orderer, and the timing passes.

#![warn(missing_docs)]

pub mod ident;
pub mod result;

pub use ident::{Ident, Interner};
pub use result::{InternalError, StaResult};
