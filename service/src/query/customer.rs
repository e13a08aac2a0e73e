//! [`Query`] collection related to [`Customer`]s.

use common::operations::By;

use crate::domain::{customer, Customer};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Customer`] by its [`customer::Id`].
pub type ById = DatabaseQuery<By<Option<Customer>, customer::Id>>;

/// Queries all the [`Customer`]s there are.
pub type All = DatabaseQuery<By<Vec<Customer>, ()>>;
