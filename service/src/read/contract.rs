//! [`Contract`] read model definitions.

use crate::domain::{Contract, Customer};

/// [`Contract`] hydrated together with its [`Customer`] relation.
///
/// Hydration happens in a single statement, so the line items and the
/// customer always form a coherent snapshot.
#[derive(Clone, Debug)]
pub struct Aggregate {
    /// The [`Contract`] itself, line items included.
    pub contract: Contract,

    /// [`Customer`] the [`Contract`] is made to.
    ///
    /// [`None`] if the relation is missing; document rendering degrades to
    /// placeholders in that case instead of failing.
    pub customer: Option<Customer>,
}
