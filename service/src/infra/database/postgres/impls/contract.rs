//! [`Contract`]-related [`Database`] implementations.

use common::{
    operations::{By, Delete, Insert, Select, Update},
    Money,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{contract, customer, Contract, Customer, LineItem, Position},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Columns hydrating a [`read::contract::Aggregate`].
///
/// One statement joins the header, the customer and the items, so the
/// aggregate is always read as a coherent snapshot.
const SQL_SELECT: &str = "\
    SELECT c.id, c.customer_id, c.issued_on, c.accepted, \
           u.id AS customer_row_id, u.first_name, u.last_name, \
           u.street, u.postal_code, u.city, u.uid, u.phone, u.email, \
           i.idx, i.quantity, \
           p.id AS position_id, p.text, p.price, p.unit \
    FROM contracts c \
    LEFT JOIN customers u ON u.id = c.customer_id \
    LEFT JOIN contract_items i ON i.contract_id = c.id \
    LEFT JOIN positions p ON p.id = i.position_id";

/// Maps the joined [`Row`]s of one statement onto
/// [`read::contract::Aggregate`]s, grouping the item rows under their
/// headers.
///
/// The rows must be ordered by contract ID first.
fn fold(rows: &[Row]) -> Vec<read::contract::Aggregate> {
    let mut out = Vec::<read::contract::Aggregate>::new();
    for row in rows {
        let id: contract::Id = row.get("id");
        if out.last().map(|a| a.contract.id) != Some(id) {
            out.push(read::contract::Aggregate {
                contract: Contract {
                    id,
                    customer_id: row.get("customer_id"),
                    issued_on: row.get("issued_on"),
                    accepted: row.get("accepted"),
                    items: Vec::new(),
                },
                customer: customer_from_row(row),
            });
        }
        if let Some(item) = item_from_row(row) {
            out.last_mut()
                .expect("pushed above")
                .contract
                .items
                .push(item);
        }
    }
    out
}

/// Extracts the joined [`Customer`] out of a [`Row`], if its relation is
/// present.
pub(super) fn customer_from_row(row: &Row) -> Option<Customer> {
    row.get::<_, Option<customer::Id>>("customer_row_id")
        .map(|id| Customer {
            id,
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            address: customer::Address {
                street: row.get("street"),
                postal_code: row.get("postal_code"),
                city: row.get("city"),
            },
            uid: row.get("uid"),
            phone: row.get("phone"),
            email: row.get("email"),
        })
}

/// Extracts the joined [`LineItem`] out of a [`Row`], if one is present.
pub(super) fn item_from_row(row: &Row) -> Option<LineItem> {
    row.get::<_, Option<i32>>("idx").map(|_| LineItem {
        position: Position {
            id: row.get("position_id"),
            text: row.get("text"),
            price: Money::eur(row.get("price")),
            unit: row.get("unit"),
        },
        quantity: row.get("quantity"),
    })
}

impl<C> Database<Select<By<Option<read::contract::Aggregate>, contract::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<read::contract::Aggregate>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Option<read::contract::Aggregate>, contract::Id>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!("{SQL_SELECT} WHERE c.id = $1::INT4 ORDER BY i.idx");
        Ok(fold(
            &self.query(&sql, &[&id]).await.map_err(tracerr::wrap!())?,
        )
        .pop())
    }
}

impl<C> Database<Select<By<Vec<read::contract::Aggregate>, ()>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::contract::Aggregate>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<read::contract::Aggregate>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sql = format!("{SQL_SELECT} ORDER BY c.id, i.idx");
        Ok(fold(&self.query(&sql, &[]).await.map_err(tracerr::wrap!())?))
    }
}

impl<C> Database<Insert<contract::Draft>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Contract;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<contract::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        let contract::Draft { customer_id, items } = draft;

        const SQL: &str = "\
            INSERT INTO contracts (customer_id) \
            VALUES ($1::INT4) \
            RETURNING id, issued_on, accepted";
        let rows = self
            .query(SQL, &[&customer_id])
            .await
            .map_err(tracerr::wrap!())?;
        let row = rows.first().expect("`RETURNING` yields a row");
        let contract = Contract {
            id: row.get("id"),
            customer_id,
            issued_on: row.get("issued_on"),
            accepted: row.get("accepted"),
            items,
        };

        insert_items(self, "contract_items", "contract_id", contract.id, &contract.items)
            .await
            .map_err(tracerr::wrap!())?;

        Ok(contract)
    }
}

impl<C> Database<Update<Contract>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(contract): Update<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            UPDATE contracts \
            SET customer_id = $2::INT4, accepted = $3::BOOL \
            WHERE id = $1::INT4";
        self.exec(SQL, &[&contract.id, &contract.customer_id, &contract.accepted])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        const SQL_CLEAR: &str = "\
            DELETE FROM contract_items \
            WHERE contract_id = $1::INT4";
        self.exec(SQL_CLEAR, &[&contract.id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        insert_items(self, "contract_items", "contract_id", contract.id, &contract.items)
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Delete<By<Contract, contract::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Contract, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        // Items go away via `ON DELETE CASCADE`.
        const SQL: &str = "DELETE FROM contracts WHERE id = $1::INT4";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|affected| affected > 0)
    }
}

/// Inserts the [`LineItem`]s of one parent document, preserving their
/// order through the `idx` column.
pub(super) async fn insert_items<C, Id>(
    db: &Postgres<C>,
    table: &str,
    parent_column: &str,
    parent_id: Id,
    items: &[LineItem],
) -> Result<(), Traced<database::Error>>
where
    C: Connection,
    Id: postgres_types::ToSql + Sync,
{
    for (idx, item) in items.iter().enumerate() {
        let idx = i32::try_from(idx).expect("item count fits `INT4`");
        let sql = format!(
            "INSERT INTO {table} ({parent_column}, idx, position_id, quantity) \
             VALUES ($1::INT4, $2::INT4, $3::INT4, $4::NUMERIC)",
        );
        db.exec(&sql, &[&parent_id, &idx, &item.position.id, &item.quantity])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;
    }
    Ok(())
}
