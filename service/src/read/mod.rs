//! Read entities definitions.

pub mod aging;
pub mod lease;
pub mod rent_roll;
