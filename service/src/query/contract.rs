//! [`Query`] collection related to [`Contract`]s.

use common::operations::By;

use crate::{domain::contract, read};
#[cfg(doc)]
use crate::{domain::Contract, Query};

use super::DatabaseQuery;

/// Queries a [`Contract`] aggregate by its [`contract::Id`].
pub type ById =
    DatabaseQuery<By<Option<read::contract::Aggregate>, contract::Id>>;

/// Queries all the [`Contract`] aggregates there are.
pub type All = DatabaseQuery<By<Vec<read::contract::Aggregate>, ()>>;
