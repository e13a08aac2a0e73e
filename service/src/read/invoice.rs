//! [`Invoice`] read model definitions.

use crate::domain::{Customer, Invoice};

/// [`Invoice`] hydrated together with its [`Customer`] relation.
///
/// Hydration happens in a single statement, so the line items and the
/// customer always form a coherent snapshot.
#[derive(Clone, Debug)]
pub struct Aggregate {
    /// The [`Invoice`] itself, line items included.
    pub invoice: Invoice,

    /// [`Customer`] the [`Invoice`] is billed to.
    ///
    /// [`None`] if the relation is missing; document rendering degrades to
    /// placeholders in that case instead of failing.
    pub customer: Option<Customer>,
}
