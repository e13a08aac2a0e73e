//! [`Contract`] definitions.

use common::{unit, DateOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};

use super::{LineItem, Totals};
use crate::domain::customer;
#[cfg(doc)]
use crate::domain::Customer;

/// An offer (Angebot) made to a [`Customer`]: an ordered list of
/// [`LineItem`]s with an issue date and an acceptance mark.
///
/// A [`Contract`] is created unaccepted and may later be marked accepted;
/// there is no further workflow.
#[derive(Clone, Debug)]
pub struct Contract {
    /// ID of this [`Contract`].
    pub id: Id,

    /// ID of the [`Customer`] this [`Contract`] is made to.
    pub customer_id: customer::Id,

    /// [`Date`] this [`Contract`] was issued on.
    ///
    /// [`Date`]: common::Date
    pub issued_on: IssueDate,

    /// Whether the [`Customer`] has accepted this [`Contract`].
    pub accepted: bool,

    /// Ordered [`LineItem`]s of this [`Contract`].
    pub items: Vec<LineItem>,
}

impl Contract {
    /// Computes the [`Totals`] of this [`Contract`].
    #[must_use]
    pub fn totals(&self) -> Totals {
        Totals::offer(&self.items)
    }
}

/// ID of a [`Contract`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(i32);

/// [`Date`] when a [`Contract`] was issued.
///
/// [`Date`]: common::Date
pub type IssueDate = DateOf<(Contract, unit::Issuance)>;

/// Not-yet-persisted [`Contract`].
///
/// The ID and the issue date are assigned by the storage.
#[derive(Clone, Debug)]
pub struct Draft {
    /// ID of the [`Customer`] the drafted [`Contract`] is made to.
    pub customer_id: customer::Id,

    /// Ordered [`LineItem`]s of the drafted [`Contract`].
    pub items: Vec<LineItem>,
}
