//! Document composition and rendering.
//!
//! Turns a hydrated [`Contract`] or [`Invoice`] aggregate into a paginated
//! PDF: a pure composition step ([`Document`]) followed by a single
//! `printpdf`-backed renderer ([`pdf`]). Whether the result is viewed
//! inline, downloaded or printed is a delivery concern of the caller; the
//! produced bytes are identical.

pub mod format;
mod model;
pub mod pdf;

use std::path::PathBuf;

use common::Date;
use serde::Deserialize;

use crate::domain::Customer;
#[cfg(doc)]
use crate::domain::{Contract, Invoice};

pub use self::model::{Document, Row, SummaryLine};

/// Kind of a rendered [`Document`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    /// An offer (Angebot) made out of a [`Contract`].
    Offer,

    /// An invoice (Rechnung).
    Invoice,
}

impl Kind {
    /// Returns the German document title of this [`Kind`].
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Offer => "Angebot",
            Self::Invoice => "Rechnung",
        }
    }

    /// Returns the German label of document numbers of this [`Kind`].
    #[must_use]
    pub const fn number_label(self) -> &'static str {
        match self {
            Self::Offer => "Angebotsnummer",
            Self::Invoice => "Rechnungsnummer",
        }
    }

    /// Returns the zero-padding width of document numbers of this [`Kind`].
    ///
    /// Invoice numbers pad to five digits, offer numbers to three.
    const fn number_width(self) -> usize {
        match self {
            Self::Offer => 3,
            Self::Invoice => 5,
        }
    }

    /// Formats a document number of this [`Kind`] out of the provided raw
    /// ID.
    #[must_use]
    pub fn number(self, id: i32) -> String {
        format!("{id:0width$}", width = self.number_width())
    }
}

/// Company letterhead data: header, footer and banking details.
///
/// Passed into the composer at render time rather than baked in as
/// literals, so documents stay renderable against fixture data in tests.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Company {
    /// Display name of the company.
    pub name: String,

    /// Full name of the owner.
    pub owner: String,

    /// Street line, including the house number.
    pub street: String,

    /// Postal code.
    pub postal_code: String,

    /// City name.
    pub city: String,

    /// Phone number.
    pub phone: String,

    /// Email address.
    pub email: String,

    /// Website address.
    pub web: String,

    /// VAT identification number (UID).
    pub uid: String,

    /// Tax office registration number.
    pub tax_number: String,

    /// Name of the bank the company holds its account at.
    pub bank_name: String,

    /// IBAN of the company bank account.
    pub iban: String,

    /// BIC of the company bank.
    pub bic: String,

    /// Path to the logo image, if any.
    ///
    /// A missing or unreadable logo never fails a render; it is logged
    /// and skipped.
    pub logo: Option<PathBuf>,
}

impl Default for Company {
    fn default() -> Self {
        Self {
            name: "Huber Erdbau e.U.".to_owned(),
            owner: "Josef Huber".to_owned(),
            street: "Gewerbestraße 14".to_owned(),
            postal_code: "4820".to_owned(),
            city: "Bad Ischl".to_owned(),
            phone: "+43 6132 123456".to_owned(),
            email: "office@huber-erdbau.at".to_owned(),
            web: "www.huber-erdbau.at".to_owned(),
            uid: "ATU12345678".to_owned(),
            tax_number: "41 123/4567".to_owned(),
            bank_name: "Raiffeisenbank Salzkammergut".to_owned(),
            iban: "AT61 3412 3000 0123 4567".to_owned(),
            bic: "RZOOAT2L123".to_owned(),
            logo: None,
        }
    }
}

/// Rendered document bytes together with the file name to deliver them
/// under.
#[derive(Clone, Debug)]
pub struct Rendered {
    /// File name of this [`Rendered`] document.
    pub file_name: String,

    /// PDF bytes of this [`Rendered`] document.
    pub bytes: Vec<u8>,
}

/// Builds the delivery file name of a document:
/// `<number>_<title>_<surname>_<firstname>_<dd-MM-yyyy>.pdf`.
///
/// A missing customer yields `-` placeholders instead of the names.
#[must_use]
pub fn file_name(
    kind: Kind,
    id: i32,
    customer: Option<&Customer>,
    date: Date,
) -> String {
    let last = customer.map_or("-", |c| c.last_name.as_ref());
    let first = customer.map_or("-", |c| c.first_name.as_ref());
    format!(
        "{}_{}_{last}_{first}_{}.pdf",
        kind.number(id),
        kind.title(),
        date.to_file_string(),
    )
}

#[cfg(test)]
mod spec {
    use common::Date;

    use crate::domain::{customer, Customer};

    use super::{file_name, Kind};

    fn customer(first: &str, last: &str) -> Customer {
        Customer {
            id: customer::Id::from(42),
            first_name: customer::Name::new(first).unwrap(),
            last_name: customer::Name::new(last).unwrap(),
            address: customer::Address {
                street: "Hauptstraße 1".to_owned(),
                postal_code: "5020".to_owned(),
                city: "Salzburg".to_owned(),
            },
            uid: None,
            phone: None,
            email: None,
        }
    }

    #[test]
    fn invoice_file_name_pads_to_five_digits() {
        let date = Date::from_calendar(2024, 3, 5).unwrap();
        assert_eq!(
            file_name(Kind::Invoice, 7, Some(&customer("Anna", "Müller")), date),
            "00007_Rechnung_Müller_Anna_05-03-2024.pdf",
        );
    }

    #[test]
    fn offer_file_name_pads_to_three_digits() {
        let date = Date::from_calendar(2023, 11, 28).unwrap();
        assert_eq!(
            file_name(Kind::Offer, 12, Some(&customer("Max", "Aigner")), date),
            "012_Angebot_Aigner_Max_28-11-2023.pdf",
        );
    }

    #[test]
    fn long_ids_are_not_truncated() {
        let date = Date::from_calendar(2024, 1, 2).unwrap();
        assert_eq!(
            file_name(Kind::Offer, 1234, None, date),
            "1234_Angebot_-_-_02-01-2024.pdf",
        );
    }

    #[test]
    fn number_labels_match_the_document_kind() {
        assert_eq!(Kind::Offer.number_label(), "Angebotsnummer");
        assert_eq!(Kind::Invoice.number_label(), "Rechnungsnummer");
    }

    #[test]
    fn missing_customer_yields_placeholders() {
        let date = Date::from_calendar(2024, 3, 5).unwrap();
        assert_eq!(
            file_name(Kind::Invoice, 7, None, date),
            "00007_Rechnung_-_-_05-03-2024.pdf",
        );
    }
}
