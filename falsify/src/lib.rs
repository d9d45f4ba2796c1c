//! Falsify: property-based testing by sampling and shrinking.
//!
//! This is the main entry point for the library, providing a convenient API
//! for declaring properties over generated values in Rust.
//!
//! ```rust
//! use falsify::*;
//!
//! let result = for_all(choose(1, 100).unwrap())
//!     .with_config(Config::default().with_tests(50))
//!     .run(|&n| (1..=100).contains(&n))
//!     .unwrap();
//! assert!(result.is_pass());
//! ```

pub use falsify_core::*;
