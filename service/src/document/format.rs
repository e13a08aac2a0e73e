//! Presentation formatting of amounts, quantities and dates.
//!
//! All totals math operates on exact [`Decimal`]s; the two-fraction-digit
//! rounding and the German number style (`1.234,56 €`) are applied here, at
//! render time only.

use rust_decimal::{Decimal, RoundingStrategy};

/// Formats a monetary amount the way documents display it:
/// comma as the decimal separator, dot-grouped thousands, trailing `€`.
#[must_use]
pub fn eur(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let s = rounded.abs().to_string();
    let (integer, fraction) = s.split_once('.').unwrap_or((s.as_str(), ""));

    let grouped = integer
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).expect("ASCII digits"))
        .collect::<Vec<_>>()
        .join(".");

    format!("{sign}{grouped},{fraction:0<2} €")
}

/// Formats a quantity together with its unit label, e.g. `2,5 m³`.
///
/// Trailing fractional zeros are dropped.
#[must_use]
pub fn quantity(amount: Decimal, unit: &str) -> String {
    let normalized = amount.normalize().to_string().replace('.', ",");
    format!("{normalized} {unit}")
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::{eur, quantity};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn eur_rounds_to_two_digits_and_groups_thousands() {
        assert_eq!(eur(decimal("0")), "0,00 €");
        assert_eq!(eur(decimal("7.5")), "7,50 €");
        assert_eq!(eur(decimal("1234.5")), "1.234,50 €");
        assert_eq!(eur(decimal("1234567.891")), "1.234.567,89 €");
        assert_eq!(eur(decimal("0.005")), "0,01 €");
        assert_eq!(eur(decimal("-1234.5")), "-1.234,50 €");
    }

    #[test]
    fn quantity_drops_trailing_zeros() {
        assert_eq!(quantity(decimal("2.50"), "m³"), "2,5 m³");
        assert_eq!(quantity(decimal("12"), "h"), "12 h");
        assert_eq!(quantity(decimal("0.125"), "t"), "0,125 t");
    }
}
