//! [`Invoice`] definitions.

use common::{define_kind, unit, Date, DateOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};

use super::{Contract, LineItem, Totals};
use crate::domain::customer;
#[cfg(doc)]
use crate::domain::Customer;

/// An invoice (Rechnung) billed to a [`Customer`].
#[derive(Clone, Debug)]
pub struct Invoice {
    /// ID of this [`Invoice`].
    pub id: Id,

    /// ID of the [`Customer`] this [`Invoice`] is billed to.
    pub customer_id: customer::Id,

    /// [`Date`] this [`Invoice`] was issued on.
    pub issued_on: IssueDate,

    /// [`Date`] the invoiced services started on.
    pub started_on: StartDate,

    /// [`Date`] the invoiced services finished on.
    pub finished_on: FinishDate,

    /// [`Kind`] of the invoiced services.
    pub kind: Kind,

    /// [`Deposit`] already paid by the [`Customer`], if any.
    ///
    /// Disallowed for [`Kind::Construction`] invoices, where the VAT
    /// liability shifts to the recipient.
    pub deposit: Option<Deposit>,

    /// Ordered [`LineItem`]s of this [`Invoice`].
    pub items: Vec<LineItem>,
}

impl Invoice {
    /// Computes the [`Totals`] of this [`Invoice`].
    #[must_use]
    pub fn totals(&self) -> Totals {
        Totals::invoice(
            &self.items,
            self.kind,
            self.deposit.as_ref().map(|d| d.gross),
        )
    }
}

/// ID of an [`Invoice`].
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

define_kind! {
    #[doc = "Kind of the services billed by an [`Invoice`]."]
    enum Kind {
        #[doc = "Dienstleistung: taxed at the standard VAT rate."]
        Service = 1,

        #[doc = "Bauleistung: reverse charge, the recipient owes the VAT."]
        Construction = 2,
    }
}

impl Kind {
    /// Returns the single-letter wire code of this [`Kind`]: `D` for
    /// [`Service`], `B` for [`Construction`].
    ///
    /// [`Service`]: Kind::Service
    /// [`Construction`]: Kind::Construction
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Service => 'D',
            Self::Construction => 'B',
        }
    }

    /// Parses a [`Kind`] from its single-letter wire code.
    #[must_use]
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'D' => Some(Self::Service),
            'B' => Some(Self::Construction),
            _ => None,
        }
    }
}

/// Deposit (Anzahlung) paid ahead of an [`Invoice`].
#[derive(Clone, Copy, Debug)]
pub struct Deposit {
    /// Gross amount of the deposit, VAT included.
    pub gross: Money,

    /// [`Date`] the deposit was paid on.
    pub paid_on: PaymentDate,
}

impl Deposit {
    /// The legacy "no deposit" marker date.
    ///
    /// The storage layer encodes an absent [`Deposit`] as a zero amount
    /// paired with this date, and that encoding must be preserved for
    /// compatibility with existing rows.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn sentinel_paid_on() -> Date {
        Date::from_calendar(1111, 11, 11).expect("valid calendar date")
    }
}

/// [`Date`] when an [`Invoice`] was issued.
pub type IssueDate = DateOf<(Invoice, unit::Issuance)>;

/// [`Date`] when the services billed by an [`Invoice`] started.
pub type StartDate = DateOf<(Invoice, unit::Start)>;

/// [`Date`] when the services billed by an [`Invoice`] finished.
pub type FinishDate = DateOf<(Invoice, unit::Finish)>;

/// [`Date`] when the [`Deposit`] of an [`Invoice`] was paid.
pub type PaymentDate = DateOf<(Invoice, unit::Payment)>;

/// Not-yet-persisted [`Invoice`] pre-fill.
///
/// Shapes data for a subsequent explicit create call and nothing more.
#[derive(Clone, Debug)]
pub struct Draft {
    /// ID of the [`Customer`] the drafted [`Invoice`] will be billed to.
    pub customer_id: customer::Id,

    /// [`Kind`] of the drafted [`Invoice`].
    pub kind: Kind,

    /// [`Date`] the invoiced services started on.
    pub started_on: StartDate,

    /// [`Date`] the invoiced services finished on.
    pub finished_on: FinishDate,

    /// [`Deposit`] of the drafted [`Invoice`], if any.
    pub deposit: Option<Deposit>,

    /// Ordered [`LineItem`]s of the drafted [`Invoice`].
    pub items: Vec<LineItem>,
}

impl Draft {
    /// Pre-fills a [`Draft`] from the provided [`Contract`]: the customer
    /// and the [`LineItem`]s are copied as-is (same positions and
    /// quantities, nothing is recomputed), the kind defaults to
    /// [`Kind::Service`], the service period defaults to today unless
    /// overridden, and no deposit is assumed.
    ///
    /// The source [`Contract`] is never mutated, and nothing is persisted.
    #[must_use]
    pub fn from_contract(
        contract: &Contract,
        period: Option<(StartDate, FinishDate)>,
    ) -> Self {
        let (started_on, finished_on) = period.unwrap_or_else(|| {
            let today = Date::today();
            (today.coerce(), today.coerce())
        });

        Self {
            customer_id: contract.customer_id,
            kind: Kind::Service,
            started_on,
            finished_on,
            deposit: None,
            items: contract.items.clone(),
        }
    }
}

#[cfg(test)]
mod spec {
    use super::Kind;

    #[test]
    fn kind_codes() {
        assert_eq!(Kind::Service.code(), 'D');
        assert_eq!(Kind::Construction.code(), 'B');

        assert_eq!(Kind::from_code('D'), Some(Kind::Service));
        assert_eq!(Kind::from_code('B'), Some(Kind::Construction));
        assert_eq!(Kind::from_code('X'), None);
    }
}
