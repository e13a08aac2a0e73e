//! [`Query`] collection related to [`Position`]s.

use common::operations::By;

use crate::domain::{position, Position};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Position`] by its [`position::Id`].
pub type ById = DatabaseQuery<By<Option<Position>, position::Id>>;

/// Queries all the [`Position`]s there are.
pub type All = DatabaseQuery<By<Vec<Position>, ()>>;
