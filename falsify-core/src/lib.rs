//! Core engine for falsify property-based testing.
//!
//! This crate provides the generator contract, primitive generators and
//! combinators, the shrink search, and the property driver that samples
//! values, detects failures and shrinks them to a locally minimal
//! counterexample.

pub mod combinator;
pub mod data;
pub mod error;
pub mod gen;
pub mod observer;
pub mod property;
pub mod shrink;
pub mod value;

// Re-export the main types
pub use combinator::*;
pub use data::*;
pub use error::*;
pub use gen::*;
pub use observer::*;
pub use property::*;
pub use shrink::*;
pub use value::*;
