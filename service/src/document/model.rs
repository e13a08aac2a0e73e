//! Pure composition of a [`Document`] out of a hydrated aggregate.

use crate::domain::{Contract, Customer, Invoice, Totals};

use super::{format, Kind};

/// Validity notice printed on offers.
const OFFER_NOTICE: &str = "Dieses Angebot ist 10 Tage lang gültig.";

/// Payment notice printed on service invoices.
const SERVICE_NOTICE: &str = "Zahlbar nach Erhalt der Rechnung.";

/// Reverse-charge notice printed on construction-service invoices.
const REVERSE_CHARGE_NOTICE: &str = "Die Umsatzsteuerschuld geht gemäß \
                                     § 19 Abs. 1a UStG auf den \
                                     Leistungsempfänger über.";

/// Composed document: the ordered block structure every rendering target
/// consumes.
///
/// Composition is a pure function of its inputs: no I/O happens here, and
/// a missing customer degrades to `-` placeholders instead of failing.
#[derive(Clone, Debug)]
pub struct Document {
    /// [`Kind`] of this [`Document`].
    pub kind: Kind,

    /// Zero-padded document number.
    pub number: String,

    /// Customer number, or `-` if the customer is missing.
    pub customer_number: String,

    /// Issue date, `dd.MM.yyyy`.
    pub issued_on: String,

    /// Service period (`from`, `to`), `dd.MM.yyyy` each.
    ///
    /// Present on invoices only.
    pub period: Option<(String, String)>,

    /// Address block lines of the counterparty.
    pub customer_lines: Vec<String>,

    /// Positions table rows, in document order.
    pub rows: Vec<Row>,

    /// Totals block lines, in display order.
    pub summary: Vec<SummaryLine>,

    /// Legal/informational notice below the totals block.
    pub notice: &'static str,
}

/// One row of the positions table.
#[derive(Clone, Debug)]
pub struct Row {
    /// 1-based position index.
    pub index: usize,

    /// Description text.
    pub text: String,

    /// Formatted unit price.
    pub unit_price: String,

    /// Formatted `quantity unit` pair.
    pub quantity: String,

    /// Formatted line total.
    pub total: String,
}

/// One line of the totals block.
#[derive(Clone, Debug)]
pub struct SummaryLine {
    /// Label of this [`SummaryLine`].
    pub label: &'static str,

    /// Formatted amount, right-aligned with the table amounts.
    pub amount: String,

    /// Whether this [`SummaryLine`] is the emphasized final one.
    pub emphasized: bool,
}

impl Document {
    /// Composes an offer document out of the provided [`Contract`]
    /// aggregate.
    #[must_use]
    pub fn offer(contract: &Contract, customer: Option<&Customer>) -> Self {
        let totals = contract.totals();
        Self {
            kind: Kind::Offer,
            number: Kind::Offer.number(contract.id.into()),
            customer_number: customer_number(customer),
            issued_on: contract.issued_on.to_document_string(),
            period: None,
            customer_lines: customer_lines(customer),
            rows: rows(&contract.items),
            summary: vec![
                SummaryLine {
                    label: "Nettobetrag",
                    amount: format::eur(totals.net.amount),
                    emphasized: false,
                },
                SummaryLine {
                    label: "zzgl. 20 % USt.",
                    amount: format::eur(totals.tax.amount),
                    emphasized: false,
                },
                SummaryLine {
                    label: "Gesamtbetrag",
                    amount: format::eur(totals.due.amount),
                    emphasized: true,
                },
            ],
            notice: OFFER_NOTICE,
        }
    }

    /// Composes an invoice document out of the provided [`Invoice`]
    /// aggregate.
    #[must_use]
    pub fn invoice(invoice: &Invoice, customer: Option<&Customer>) -> Self {
        use crate::domain::invoice::Kind as K;

        let totals = invoice.totals();
        let summary = match invoice.kind {
            K::Service => service_summary(&totals),
            K::Construction => vec![
                SummaryLine {
                    label: "Nettobetrag",
                    amount: format::eur(totals.net.amount),
                    emphasized: false,
                },
                SummaryLine {
                    label: "Rechnungsbetrag",
                    amount: format::eur(totals.due.amount),
                    emphasized: true,
                },
            ],
        };

        Self {
            kind: Kind::Invoice,
            number: Kind::Invoice.number(invoice.id.into()),
            customer_number: customer_number(customer),
            issued_on: invoice.issued_on.to_document_string(),
            period: Some((
                invoice.started_on.to_document_string(),
                invoice.finished_on.to_document_string(),
            )),
            customer_lines: customer_lines(customer),
            rows: rows(&invoice.items),
            summary,
            notice: match invoice.kind {
                K::Service => SERVICE_NOTICE,
                K::Construction => REVERSE_CHARGE_NOTICE,
            },
        }
    }

    /// Returns the German title of this [`Document`].
    #[must_use]
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }
}

/// Builds the totals block of a service invoice.
///
/// With a deposit present, its net/VAT split sits between the tax line and
/// the emphasized final line.
fn service_summary(totals: &Totals) -> Vec<SummaryLine> {
    let mut lines = vec![
        SummaryLine {
            label: "Nettobetrag",
            amount: format::eur(totals.net.amount),
            emphasized: false,
        },
        SummaryLine {
            label: "zzgl. 20 % USt.",
            amount: format::eur(totals.tax.amount),
            emphasized: false,
        },
    ];

    let has_deposit = totals.deposit_net.is_positive();
    if has_deposit {
        lines.push(SummaryLine {
            label: "abzgl. Anzahlung netto",
            amount: format::eur(-totals.deposit_net.amount),
            emphasized: false,
        });
        lines.push(SummaryLine {
            label: "abzgl. Anzahlung USt.",
            amount: format::eur(-totals.deposit_tax.amount),
            emphasized: false,
        });
    }

    lines.push(SummaryLine {
        label: if has_deposit {
            "Restbetrag"
        } else {
            "Rechnungsbetrag"
        },
        amount: format::eur(totals.due.amount),
        emphasized: true,
    });

    lines
}

/// Formats the positions table rows.
fn rows(items: &[crate::domain::LineItem]) -> Vec<Row> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| Row {
            index: i + 1,
            text: item.position.text.to_string(),
            unit_price: format::eur(item.position.price.amount),
            quantity: format::quantity(
                item.quantity.get(),
                item.position.unit.as_ref(),
            ),
            total: format::eur(item.total().amount),
        })
        .collect()
}

/// Formats the counterparty address block, degrading to `-` placeholders
/// when the customer relation is missing.
fn customer_lines(customer: Option<&Customer>) -> Vec<String> {
    customer.map_or_else(
        || vec!["-".to_owned(), "-".to_owned(), "-".to_owned()],
        |c| {
            let mut lines = vec![
                format!("{} {}", c.first_name, c.last_name),
                c.address.street.clone(),
                format!("{} {}", c.address.postal_code, c.address.city),
            ];
            if let Some(uid) = &c.uid {
                lines.push(format!("UID: {uid}"));
            }
            lines
        },
    )
}

/// Formats the customer number, or `-` when the customer is missing.
fn customer_number(customer: Option<&Customer>) -> String {
    customer.map_or_else(|| "-".to_owned(), |c| c.id.to_string())
}

#[cfg(test)]
mod spec {
    use common::{Date, Money};
    use rust_decimal::Decimal;

    use crate::domain::{
        contract, customer, invoice, line_item::Quantity, position, Contract,
        Customer, Invoice, LineItem, Position,
    };

    use super::Document;

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn item(quantity: &str, price: &str) -> LineItem {
        LineItem {
            position: Position {
                id: position::Id::from(4),
                text: position::Text::new("Humus abtragen").unwrap(),
                price: Money::eur(decimal(price)),
                unit: position::Unit::new("m²").unwrap(),
            },
            quantity: Quantity::new(decimal(quantity)).unwrap(),
        }
    }

    fn customer() -> Customer {
        Customer {
            id: customer::Id::from(17),
            first_name: customer::Name::new("Anna").unwrap(),
            last_name: customer::Name::new("Müller").unwrap(),
            address: customer::Address {
                street: "Lindenweg 3".to_owned(),
                postal_code: "4820".to_owned(),
                city: "Bad Ischl".to_owned(),
            },
            uid: customer::Uid::new("ATU87654321"),
            phone: None,
            email: None,
        }
    }

    fn invoice(kind: invoice::Kind, deposit: Option<&str>) -> Invoice {
        Invoice {
            id: invoice::Id::from(7),
            customer_id: customer::Id::from(17),
            issued_on: Date::from_calendar(2024, 3, 5).unwrap().coerce(),
            started_on: Date::from_calendar(2024, 2, 1).unwrap().coerce(),
            finished_on: Date::from_calendar(2024, 2, 29).unwrap().coerce(),
            kind,
            deposit: deposit.map(|gross| invoice::Deposit {
                gross: Money::eur(decimal(gross)),
                paid_on: Date::from_calendar(2024, 2, 10).unwrap().coerce(),
            }),
            items: vec![item("2", "100.00")],
        }
    }

    #[test]
    fn offer_blocks() {
        let contract = Contract {
            id: contract::Id::from(12),
            customer_id: customer::Id::from(17),
            issued_on: Date::from_calendar(2023, 11, 28).unwrap().coerce(),
            accepted: false,
            items: vec![item("3", "50.00")],
        };

        let doc = Document::offer(&contract, Some(&customer()));
        assert_eq!(doc.title(), "Angebot");
        assert_eq!(doc.number, "012");
        assert_eq!(doc.customer_number, "17");
        assert_eq!(doc.issued_on, "28.11.2023");
        assert!(doc.period.is_none());

        assert_eq!(doc.rows.len(), 1);
        assert_eq!(doc.rows[0].index, 1);
        assert_eq!(doc.rows[0].quantity, "3 m²");
        assert_eq!(doc.rows[0].total, "150,00 €");

        let labels: Vec<_> =
            doc.summary.iter().map(|l| l.label).collect();
        assert_eq!(
            labels,
            ["Nettobetrag", "zzgl. 20 % USt.", "Gesamtbetrag"],
        );
        assert_eq!(doc.summary[2].amount, "180,00 €");
        assert!(doc.summary[2].emphasized);
        assert_eq!(doc.notice, "Dieses Angebot ist 10 Tage lang gültig.");
    }

    #[test]
    fn customer_block_includes_uid_only_when_present() {
        let doc = Document::invoice(
            &invoice(invoice::Kind::Service, None),
            Some(&customer()),
        );
        assert_eq!(
            doc.customer_lines,
            [
                "Anna Müller",
                "Lindenweg 3",
                "4820 Bad Ischl",
                "UID: ATU87654321",
            ],
        );

        let mut without_uid = customer();
        without_uid.uid = None;
        let doc = Document::invoice(
            &invoice(invoice::Kind::Service, None),
            Some(&without_uid),
        );
        assert_eq!(doc.customer_lines.len(), 3);
    }

    #[test]
    fn missing_customer_renders_placeholders() {
        let doc =
            Document::invoice(&invoice(invoice::Kind::Service, None), None);
        assert_eq!(doc.customer_number, "-");
        assert_eq!(doc.customer_lines, ["-", "-", "-"]);
    }

    #[test]
    fn invoice_metadata_carries_the_service_period() {
        let doc = Document::invoice(
            &invoice(invoice::Kind::Service, None),
            Some(&customer()),
        );
        assert_eq!(doc.number, "00007");
        assert_eq!(
            doc.period,
            Some(("01.02.2024".to_owned(), "29.02.2024".to_owned())),
        );
    }

    #[test]
    fn deposit_lines_sit_between_tax_and_due() {
        let doc = Document::invoice(
            &invoice(invoice::Kind::Service, Some("120.00")),
            Some(&customer()),
        );

        let labels: Vec<_> =
            doc.summary.iter().map(|l| l.label).collect();
        assert_eq!(
            labels,
            [
                "Nettobetrag",
                "zzgl. 20 % USt.",
                "abzgl. Anzahlung netto",
                "abzgl. Anzahlung USt.",
                "Restbetrag",
            ],
        );
        assert_eq!(doc.summary[2].amount, "-100,00 €");
        assert_eq!(doc.summary[3].amount, "-20,00 €");
        assert_eq!(doc.summary[4].amount, "120,00 €");
        assert_eq!(doc.notice, "Zahlbar nach Erhalt der Rechnung.");
    }

    #[test]
    fn construction_invoice_shows_no_tax_line() {
        let doc = Document::invoice(
            &invoice(invoice::Kind::Construction, None),
            Some(&customer()),
        );

        let labels: Vec<_> =
            doc.summary.iter().map(|l| l.label).collect();
        assert_eq!(labels, ["Nettobetrag", "Rechnungsbetrag"]);
        assert_eq!(doc.summary[1].amount, "200,00 €");
        assert!(doc.notice.contains("§ 19 Abs. 1a UStG"));
    }
}
