//! [`Position`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Select},
    Money,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{position, Position},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Maps a [`Row`] onto a [`Position`].
fn from_row(row: &Row) -> Position {
    Position {
        id: row.get("id"),
        text: row.get("text"),
        price: Money::eur(row.get("price")),
        unit: row.get("unit"),
    }
}

impl<C> Database<Select<By<Option<Position>, position::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Position>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Position>, position::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, text, price, unit \
            FROM positions \
            WHERE id = $1::INT4";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Position>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Position>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Position>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT id, text, price, unit \
            FROM positions \
            ORDER BY id";
        Ok(self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<position::Draft>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Position;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<position::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        let position::Draft { text, price, unit } = draft;

        const SQL: &str = "\
            INSERT INTO positions (text, price, unit) \
            VALUES ($1::VARCHAR, $2::NUMERIC, $3::VARCHAR) \
            RETURNING id";
        let id = self
            .query(SQL, &[&text, &price.amount, &unit])
            .await
            .map_err(tracerr::wrap!())?
            .first()
            .map(|row| row.get("id"))
            .expect("`RETURNING id` yields a row");

        Ok(Position {
            id,
            text,
            price,
            unit,
        })
    }
}
