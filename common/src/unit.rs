//! Marker types.

/// Marker type describing an entity issuance.
#[derive(Clone, Copy, Debug)]
pub struct Issuance;

/// Marker type describing a payment upon an entity.
#[derive(Clone, Copy, Debug)]
pub struct Payment;

/// Marker type describing the start of a period.
#[derive(Clone, Copy, Debug)]
pub struct Start;

/// Marker type describing the finish of a period.
#[derive(Clone, Copy, Debug)]
pub struct Finish;
