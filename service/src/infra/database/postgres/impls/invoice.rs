//! [`Invoice`]-related [`Database`] implementations.

use common::{
    operations::{By, Delete, Insert, Select},
    Date, Money,
};
use rust_decimal::Decimal;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{invoice, Invoice},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

use super::contract::insert_items;

/// Columns hydrating a [`read::invoice::Aggregate`].
///
/// One statement joins the header, the customer and the items, so the
/// aggregate is always read as a coherent snapshot.
const SQL_SELECT: &str = "\
    SELECT v.id, v.customer_id, v.issued_on, \
           v.started_on, v.finished_on, v.kind, \
           v.deposit_amount, v.deposit_paid_on, \
           u.id AS customer_row_id, u.first_name, u.last_name, \
           u.street, u.postal_code, u.city, u.uid, u.phone, u.email, \
           i.idx, i.quantity, \
           p.id AS position_id, p.text, p.price, p.unit \
    FROM invoices v \
    LEFT JOIN customers u ON u.id = v.customer_id \
    LEFT JOIN invoice_items i ON i.invoice_id = v.id \
    LEFT JOIN positions p ON p.id = i.position_id";

/// Maps the joined [`Row`]s of one statement onto
/// [`read::invoice::Aggregate`]s, grouping the item rows under their
/// headers.
///
/// The rows must be ordered by invoice ID first.
fn fold(rows: &[Row]) -> Vec<read::invoice::Aggregate> {
    let mut out = Vec::<read::invoice::Aggregate>::new();
    for row in rows {
        let id: invoice::Id = row.get("id");
        if out.last().map(|a| a.invoice.id) != Some(id) {
            out.push(read::invoice::Aggregate {
                invoice: Invoice {
                    id,
                    customer_id: row.get("customer_id"),
                    issued_on: row.get("issued_on"),
                    started_on: row.get("started_on"),
                    finished_on: row.get("finished_on"),
                    kind: row.get("kind"),
                    deposit: deposit_from_row(row),
                    items: Vec::new(),
                },
                customer: super::contract::customer_from_row(row),
            });
        }
        if let Some(item) = super::contract::item_from_row(row) {
            out.last_mut()
                .expect("pushed above")
                .invoice
                .items
                .push(item);
        }
    }
    out
}

/// Encodes an optional [`invoice::Deposit`] into its stored column pair.
///
/// Legacy encoding: an absent deposit is stored as a zero amount paired
/// with the `1111-11-11` marker date, and that encoding must be kept on
/// the wire for compatibility with existing rows.
fn deposit_to_columns(deposit: Option<invoice::Deposit>) -> (Decimal, Date) {
    deposit.map_or_else(
        || (Decimal::ZERO, invoice::Deposit::sentinel_paid_on()),
        |d| (d.gross.amount, d.paid_on.coerce()),
    )
}

/// Decodes the stored deposit column pair.
///
/// A zero amount means "no deposit", whatever the paired date says.
fn deposit_from_columns(
    amount: Decimal,
    paid_on: Date,
) -> Option<invoice::Deposit> {
    (!amount.is_zero()).then(|| invoice::Deposit {
        gross: Money::eur(amount),
        paid_on: paid_on.coerce(),
    })
}

/// Decodes the stored deposit columns of a [`Row`].
fn deposit_from_row(row: &Row) -> Option<invoice::Deposit> {
    deposit_from_columns(
        row.get("deposit_amount"),
        row.get("deposit_paid_on"),
    )
}

impl<C> Database<Select<By<Option<read::invoice::Aggregate>, invoice::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<read::invoice::Aggregate>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<read::invoice::Aggregate>, invoice::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!("{SQL_SELECT} WHERE v.id = $1::INT4 ORDER BY i.idx");
        Ok(fold(
            &self.query(&sql, &[&id]).await.map_err(tracerr::wrap!())?,
        )
        .pop())
    }
}

impl<C> Database<Select<By<Vec<read::invoice::Aggregate>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::invoice::Aggregate>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<read::invoice::Aggregate>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sql = format!("{SQL_SELECT} ORDER BY v.id, i.idx");
        Ok(fold(&self.query(&sql, &[]).await.map_err(tracerr::wrap!())?))
    }
}

impl<C> Database<Insert<invoice::Draft>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Invoice;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<invoice::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        let invoice::Draft {
            customer_id,
            kind,
            started_on,
            finished_on,
            deposit,
            items,
        } = draft;

        let (deposit_amount, deposit_paid_on) = deposit_to_columns(deposit);

        const SQL: &str = "\
            INSERT INTO invoices (\
                customer_id, started_on, finished_on, \
                kind, deposit_amount, deposit_paid_on\
            ) \
            VALUES (\
                $1::INT4, $2::DATE, $3::DATE, \
                $4::INT2, $5::NUMERIC, $6::DATE\
            ) \
            RETURNING id, issued_on";
        let rows = self
            .query(
                SQL,
                &[
                    &customer_id,
                    &started_on,
                    &finished_on,
                    &kind,
                    &deposit_amount,
                    &deposit_paid_on,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?;
        let row = rows.first().expect("`RETURNING` yields a row");
        let invoice = Invoice {
            id: row.get("id"),
            customer_id,
            issued_on: row.get("issued_on"),
            started_on,
            finished_on,
            kind,
            deposit,
            items,
        };

        insert_items(self, "invoice_items", "invoice_id", invoice.id, &invoice.items)
            .await
            .map_err(tracerr::wrap!())?;

        Ok(invoice)
    }
}

impl<C> Database<Delete<By<Invoice, invoice::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Invoice, invoice::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        // Items go away via `ON DELETE CASCADE`.
        const SQL: &str = "DELETE FROM invoices WHERE id = $1::INT4";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|affected| affected > 0)
    }
}

#[cfg(test)]
mod spec {
    use common::{Date, Money};
    use rust_decimal::Decimal;

    use crate::domain::invoice;

    use super::{deposit_from_columns, deposit_to_columns};

    #[test]
    fn absent_deposit_encodes_to_zero_and_marker_date() {
        let (amount, paid_on) = deposit_to_columns(None);

        assert_eq!(amount, Decimal::ZERO);
        assert_eq!(paid_on, invoice::Deposit::sentinel_paid_on());
    }

    #[test]
    fn present_deposit_round_trips_through_columns() {
        let deposit = invoice::Deposit {
            gross: Money::eur(Decimal::from(120)),
            paid_on: Date::from_calendar(2024, 2, 10).unwrap().coerce(),
        };

        let (amount, paid_on) = deposit_to_columns(Some(deposit));
        assert_eq!(amount, deposit.gross.amount);

        let decoded =
            deposit_from_columns(amount, paid_on).expect("deposit decoded");
        assert_eq!(decoded.gross, deposit.gross);
        assert_eq!(decoded.paid_on, deposit.paid_on);
    }

    #[test]
    fn zero_amount_decodes_to_no_deposit() {
        let paid_on = Date::from_calendar(2024, 2, 10).unwrap();

        assert!(deposit_from_columns(Decimal::ZERO, paid_on).is_none());
    }
}
