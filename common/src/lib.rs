//! Common definitions.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod date;
pub mod handler;
pub mod money;
pub mod operations;
mod percent;

#[cfg(test)]
use serde_json as _;

pub use self::{date::Date, handler::Handler, money::Money, percent::Percent};
