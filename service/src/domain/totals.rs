//! [`Totals`] computation.

use common::{Money, Percent};
use rust_decimal::Decimal;

use super::{invoice, LineItem};
#[cfg(doc)]
use super::{Contract, Invoice};

/// Standard VAT rate applied to offers and [`invoice::Kind::Service`]
/// invoices.
fn standard_vat() -> Percent {
    #[expect(unsafe_code, reason = "20 is a valid percentage")]
    unsafe {
        Percent::new_unchecked(Decimal::from(20))
    }
}

/// Financial breakdown of a [`Contract`] or an [`Invoice`].
///
/// Always derived from the line items and the document-level fields, never
/// persisted. All amounts are exact [`Decimal`]s: rounding to two fraction
/// digits is a presentation concern applied at render time only.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Totals {
    /// Net sum of all line items.
    pub net: Money,

    /// VAT charged by the issuer on top of [`net`].
    ///
    /// Zero for reverse-charge invoices.
    ///
    /// [`net`]: Totals::net
    pub tax: Money,

    /// Net part of the already-paid deposit.
    pub deposit_net: Money,

    /// VAT part of the already-paid deposit.
    pub deposit_tax: Money,

    /// Amount due after tax and deposit.
    pub due: Money,
}

impl Totals {
    /// Computes the [`Totals`] of a [`Contract`] (Angebot): always taxed at
    /// the standard rate, no deposit concept.
    #[must_use]
    pub fn offer(items: &[LineItem]) -> Self {
        let net = Self::net(items);
        let tax = standard_vat().of(net);
        Self {
            net: Money::eur(net),
            tax: Money::eur(tax),
            deposit_net: Money::ZERO,
            deposit_tax: Money::ZERO,
            due: Money::eur(net + tax),
        }
    }

    /// Computes the [`Totals`] of an [`Invoice`].
    ///
    /// [`invoice::Kind::Service`] invoices are taxed at the standard rate;
    /// a deposit, when present, is given gross, so its net/VAT split is
    /// backed out at the same rate and the gross deposit reduces the due
    /// amount.
    ///
    /// [`invoice::Kind::Construction`] invoices fall under the
    /// reverse-charge regime: the recipient owes the VAT, so no tax is
    /// charged here and any deposit is ignored (the input layer rejects
    /// one upfront).
    #[must_use]
    pub fn invoice(
        items: &[LineItem],
        kind: invoice::Kind,
        deposit_gross: Option<Money>,
    ) -> Self {
        let net = Self::net(items);

        match kind {
            invoice::Kind::Service => {
                let vat = standard_vat();
                let tax = vat.of(net);

                match deposit_gross.filter(Money::is_positive) {
                    Some(gross) => {
                        let deposit_net = vat.net_of_gross(gross.amount);
                        Self {
                            net: Money::eur(net),
                            tax: Money::eur(tax),
                            deposit_net: Money::eur(deposit_net),
                            deposit_tax: Money::eur(
                                gross.amount - deposit_net,
                            ),
                            due: Money::eur(net + tax - gross.amount),
                        }
                    }
                    None => Self {
                        net: Money::eur(net),
                        tax: Money::eur(tax),
                        deposit_net: Money::ZERO,
                        deposit_tax: Money::ZERO,
                        due: Money::eur(net + tax),
                    },
                }
            }
            invoice::Kind::Construction => Self {
                net: Money::eur(net),
                tax: Money::ZERO,
                deposit_net: Money::ZERO,
                deposit_tax: Money::ZERO,
                due: Money::eur(net),
            },
        }
    }

    /// Sums the line items in list order.
    ///
    /// No per-line rounding is performed, and values are deliberately not
    /// clamped: upstream validation is responsible for rejecting negative
    /// quantities and prices.
    fn net(items: &[LineItem]) -> Decimal {
        items.iter().map(|i| i.total().amount).sum()
    }
}

#[cfg(test)]
mod spec {
    use common::Money;
    use rust_decimal::Decimal;

    use crate::domain::{
        invoice, line_item::Quantity, position, Invoice, LineItem, Position,
        Totals,
    };

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn item(quantity: &str, price: &str) -> LineItem {
        LineItem {
            position: Position {
                id: position::Id::from(1),
                text: position::Text::new("Erdaushub").unwrap(),
                price: Money::eur(decimal(price)),
                unit: position::Unit::new("m³").unwrap(),
            },
            quantity: Quantity::new(decimal(quantity)).unwrap(),
        }
    }

    fn eur(s: &str) -> Money {
        Money::eur(decimal(s))
    }

    #[test]
    fn empty_items_yield_all_zero() {
        let totals = Totals::invoice(&[], invoice::Kind::Service, None);
        assert_eq!(totals.net, Money::eur(Decimal::ZERO));
        assert_eq!(totals.tax, Money::eur(Decimal::ZERO));
        assert_eq!(totals.deposit_net, Money::ZERO);
        assert_eq!(totals.deposit_tax, Money::ZERO);
        assert_eq!(totals.due, Money::eur(Decimal::ZERO));
    }

    #[test]
    fn service_invoice_without_deposit() {
        let items = [item("2", "100.00")];
        let totals = Totals::invoice(&items, invoice::Kind::Service, None);

        assert_eq!(totals.net, eur("200.00"));
        assert_eq!(totals.tax, eur("40.0000"));
        assert_eq!(totals.deposit_net, Money::ZERO);
        assert_eq!(totals.deposit_tax, Money::ZERO);
        assert_eq!(totals.due, eur("240.0000"));
    }

    #[test]
    fn service_invoice_with_gross_deposit() {
        let items = [item("2", "100.00")];
        let totals = Totals::invoice(
            &items,
            invoice::Kind::Service,
            Some(eur("120.00")),
        );

        assert_eq!(totals.net, eur("200.00"));
        assert_eq!(totals.tax, eur("40.0000"));
        assert_eq!(totals.deposit_net, eur("100"));
        assert_eq!(totals.deposit_tax, eur("20.00"));
        assert_eq!(totals.due, eur("120.0000"));
    }

    #[test]
    fn zero_deposit_counts_as_no_deposit() {
        let items = [item("2", "100.00")];
        let totals = Totals::invoice(
            &items,
            invoice::Kind::Service,
            Some(Money::ZERO),
        );

        assert_eq!(totals.deposit_net, Money::ZERO);
        assert_eq!(totals.deposit_tax, Money::ZERO);
        assert_eq!(totals.due, eur("240.0000"));
    }

    #[test]
    fn construction_invoice_reverse_charges_and_ignores_deposit() {
        let items = [item("1", "500.00")];
        let totals = Totals::invoice(
            &items,
            invoice::Kind::Construction,
            Some(eur("120.00")),
        );

        assert_eq!(totals.net, eur("500.00"));
        assert_eq!(totals.tax, Money::ZERO);
        assert_eq!(totals.deposit_net, Money::ZERO);
        assert_eq!(totals.deposit_tax, Money::ZERO);
        assert_eq!(totals.due, eur("500.00"));
    }

    #[test]
    fn offer_totals() {
        let items = [item("3", "50.00")];
        let totals = Totals::offer(&items);

        assert_eq!(totals.net, eur("150.00"));
        assert_eq!(totals.tax, eur("30.0000"));
        assert_eq!(totals.due, eur("180.0000"));
    }

    #[test]
    fn totals_are_deterministic() {
        let items = [item("2.5", "33.33"), item("7", "19.99")];
        let deposit = Some(eur("55.55"));

        let first = Totals::invoice(&items, invoice::Kind::Service, deposit);
        let second = Totals::invoice(&items, invoice::Kind::Service, deposit);

        assert_eq!(first, second);
    }

    #[test]
    fn sums_in_list_order_without_per_line_rounding() {
        let items = [item("0.333", "3.00"), item("0.667", "3.00")];
        let totals = Totals::offer(&items);

        // 0.999 + 2.001 summed exactly.
        assert_eq!(totals.net, eur("3.00000"));
    }

    #[test]
    fn draft_from_contract_preserves_totals() {
        use common::Date;

        use crate::domain::{contract, customer, Contract};

        let contract = Contract {
            id: contract::Id::from(3),
            customer_id: customer::Id::from(9),
            issued_on: Date::from_calendar(2024, 2, 1).unwrap().coerce(),
            accepted: false,
            items: vec![item("3", "50.00"), item("1.5", "80.00")],
        };

        let draft = invoice::Draft::from_contract(&contract, None);
        assert_eq!(draft.customer_id, contract.customer_id);
        assert_eq!(draft.kind, invoice::Kind::Service);
        assert!(draft.deposit.is_none());

        let direct = Totals::invoice(
            &contract.items,
            invoice::Kind::Service,
            None,
        );
        let via_draft =
            Totals::invoice(&draft.items, draft.kind, None);
        assert_eq!(direct, via_draft);
    }

    #[test]
    fn invoice_totals_accessor_matches_free_function() {
        use common::Date;

        use crate::domain::customer;

        let invoice = Invoice {
            id: invoice::Id::from(7),
            customer_id: customer::Id::from(1),
            issued_on: Date::from_calendar(2024, 3, 5).unwrap().coerce(),
            started_on: Date::from_calendar(2024, 2, 1).unwrap().coerce(),
            finished_on: Date::from_calendar(2024, 2, 29).unwrap().coerce(),
            kind: invoice::Kind::Service,
            deposit: Some(invoice::Deposit {
                gross: eur("120.00"),
                paid_on: Date::from_calendar(2024, 2, 10).unwrap().coerce(),
            }),
            items: vec![item("2", "100.00")],
        };

        assert_eq!(
            invoice.totals(),
            Totals::invoice(
                &invoice.items,
                invoice::Kind::Service,
                Some(eur("120.00")),
            ),
        );
    }
}
