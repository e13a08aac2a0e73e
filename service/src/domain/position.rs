//! [`Position`] definitions.

use common::Money;
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};

/// A catalog line the company offers: a free-text description priced per
/// unit of measure.
///
/// Once referenced by a contract or an invoice the stored values are
/// considered immutable: edits affect future renders only.
#[derive(Clone, Debug)]
pub struct Position {
    /// ID of this [`Position`].
    pub id: Id,

    /// Description [`Text`] of this [`Position`].
    pub text: Text,

    /// Price of this [`Position`] per one [`Unit`].
    pub price: Money,

    /// [`Unit`] of measure this [`Position`] is priced by.
    pub unit: Unit,
}

/// ID of a [`Position`].
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

/// Not-yet-persisted [`Position`].
///
/// The ID is assigned by the storage.
#[derive(Clone, Debug)]
pub struct Draft {
    /// Description [`Text`] of the drafted [`Position`].
    pub text: Text,

    /// Price of the drafted [`Position`] per one [`Unit`].
    pub price: Money,

    /// [`Unit`] of measure the drafted [`Position`] is priced by.
    pub unit: Unit,
}

/// Description of a [`Position`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Text(String);

impl Text {
    /// Creates a new [`Text`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `text` is not empty.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Creates a new [`Text`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`Text`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        text.trim() == text && !text.is_empty() && text.len() <= 512
    }
}

impl FromStr for Text {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Text`")
    }
}

/// Unit of measure a [`Position`] is priced by (e.g. `m³`, `h`, `t`).
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Unit(String);

impl Unit {
    /// Creates a new [`Unit`] if the given `unit` is valid.
    #[must_use]
    pub fn new(unit: impl Into<String>) -> Option<Self> {
        let unit = unit.into();
        (unit.trim() == unit && !unit.is_empty() && unit.len() <= 16)
            .then_some(Self(unit))
    }
}

impl FromStr for Unit {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Unit`")
    }
}
