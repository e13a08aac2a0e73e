//! [`Customer`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{customer, Customer},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns selected for a [`Customer`].
const COLUMNS: &str = "\
    id, first_name, last_name, \
    street, postal_code, city, \
    uid, phone, email";

/// Maps a [`Row`] onto a [`Customer`].
fn from_row(row: &Row) -> Customer {
    Customer {
        id: row.get("id"),
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
    }
}

impl<C> Database<Select<By<Option<Customer>, customer::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Customer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Customer>, customer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM customers \
             WHERE id = $1::INT4",
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Customer>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Customer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Customer>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sql = format!(
            "SELECT {COLUMNS} \
             FROM customers \
             ORDER BY last_name, first_name, id",
        );
        Ok(self
            .query(&sql, &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<customer::Draft>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Customer;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<customer::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        let customer::Draft {
            first_name,
            last_name,
            address,
            uid,
            phone,
            email,
        } = draft;

        const SQL: &str = "\
            INSERT INTO customers (\
                first_name, last_name, \
                street, postal_code, city, \
                uid, phone, email\
            ) \
            VALUES (\
                $1::VARCHAR, $2::VARCHAR, \
                $3::VARCHAR, $4::VARCHAR, $5::VARCHAR, \
                $6::VARCHAR, $7::VARCHAR, $8::VARCHAR\
            ) \
            RETURNING id";
        let id = self
            .query(
                SQL,
                &[
                    &first_name,
                    &last_name,
                    &address.street,
                    &address.postal_code,
                    &address.city,
                    &uid,
                    &phone,
                    &email,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .first()
            .map(|row| row.get("id"))
            .expect("`RETURNING id` yields a row");

        Ok(Customer {
            id,
            first_name,
            last_name,
            address,
            uid,
            phone,
            email,
        })
    }
}
