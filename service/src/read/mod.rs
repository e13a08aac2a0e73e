//! Read models.

pub mod contract;
pub mod invoice;
