//! [`LineItem`] definitions.

use std::str::FromStr;

use common::Money;
use derive_more::Display;
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

use super::Position;

/// Association of a [`Position`] with a [`Quantity`] inside one parent
/// document (contract or invoice).
#[derive(Clone, Debug)]
pub struct LineItem {
    /// [`Position`] this [`LineItem`] refers to.
    pub position: Position,

    /// Ordered [`Quantity`] of the [`Position`].
    pub quantity: Quantity,
}

impl LineItem {
    /// Returns the total of this [`LineItem`]:
    /// `quantity × position price`.
    ///
    /// The total is always computed, never stored.
    #[must_use]
    pub fn total(&self) -> Money {
        Money {
            amount: self.quantity.get() * self.position.price.amount,
            currency: self.position.price.currency,
        }
    }
}

/// Quantity of a [`Position`] ordered within one [`LineItem`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Quantity(Decimal);

impl Quantity {
    /// Creates a new [`Quantity`] by checking the provided value is
    /// greater than zero.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        (val > Decimal::ZERO).then_some(Self(val))
    }

    /// Creates a new [`Quantity`] without performing any validation.
    ///
    /// # Safety
    ///
    /// The provided value must be greater than zero.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(val: Decimal) -> Self {
        Self(val)
    }

    /// Returns the inner value of this [`Quantity`].
    #[must_use]
    pub fn get(self) -> Decimal {
        self.0
    }
}

impl FromStr for Quantity {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `Quantity`")
    }
}
