//! [`Query`] collection related to [`Invoice`]s.

use common::operations::By;

use crate::{domain::invoice, read};
#[cfg(doc)]
use crate::{domain::Invoice, Query};

use super::DatabaseQuery;

/// Queries an [`Invoice`] aggregate by its [`invoice::Id`].
pub type ById =
    DatabaseQuery<By<Option<read::invoice::Aggregate>, invoice::Id>>;

/// Queries all the [`Invoice`] aggregates there are.
pub type All = DatabaseQuery<By<Vec<read::invoice::Aggregate>, ()>>;
