//! Domain definitions.

pub mod charge;
pub mod lease;
pub mod payment;

pub use self::{charge::Charge, lease::Lease, payment::Payment};
