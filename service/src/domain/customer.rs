//! [`Customer`] definitions.

use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};

/// A customer of the company.
#[derive(Clone, Debug)]
pub struct Customer {
    /// ID of this [`Customer`].
    pub id: Id,

    /// First name of this [`Customer`].
    pub first_name: Name,

    /// Surname of this [`Customer`].
    pub last_name: Name,

    /// Postal [`Address`] of this [`Customer`].
    pub address: Address,

    /// VAT identification number (UID) of this [`Customer`], if any.
    ///
    /// Rendered on documents only when present.
    pub uid: Option<Uid>,

    /// Phone number of this [`Customer`], if any.
    pub phone: Option<String>,

    /// Email address of this [`Customer`], if any.
    pub email: Option<String>,
}

/// ID of a [`Customer`].
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

/// Postal address of a [`Customer`].
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Address {
    /// Street line, including the house number.
    pub street: String,

    /// Postal code.
    pub postal_code: String,

    /// City name.
    pub city: String,
}

/// First name or surname of a [`Customer`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` is not empty.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 128
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Not-yet-persisted [`Customer`].
///
/// The ID is assigned by the storage.
#[derive(Clone, Debug)]
pub struct Draft {
    /// First name of the drafted [`Customer`].
    pub first_name: Name,

    /// Surname of the drafted [`Customer`].
    pub last_name: Name,

    /// Postal [`Address`] of the drafted [`Customer`].
    pub address: Address,

    /// VAT identification number (UID) of the drafted [`Customer`], if any.
    pub uid: Option<Uid>,

    /// Phone number of the drafted [`Customer`], if any.
    pub phone: Option<String>,

    /// Email address of the drafted [`Customer`], if any.
    pub email: Option<String>,
}

/// VAT identification number (UID) of a [`Customer`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Uid(String);

impl Uid {
    /// Creates a new [`Uid`] if the given `uid` is valid.
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Option<Self> {
        let uid = uid.into();
        (uid.trim() == uid && !uid.is_empty() && uid.len() <= 32)
            .then_some(Self(uid))
    }
}

impl FromStr for Uid {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Uid`")
    }
}
