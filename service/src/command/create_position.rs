//! [`Command`] for creating a new catalog [`Position`].

use common::{operations::Insert, Money};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{position, Position},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new catalog [`Position`].
#[derive(Clone, Debug)]
pub struct CreatePosition {
    /// Description [`position::Text`] of a new [`Position`].
    pub text: position::Text,

    /// Price of a new [`Position`] per one [`position::Unit`].
    pub price: Money,

    /// [`position::Unit`] of measure a new [`Position`] is priced by.
    pub unit: position::Unit,
}

impl<Db> Command<CreatePosition> for Service<Db>
where
    Db: Database<
        Insert<position::Draft>,
        Ok = Position,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Position;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreatePosition,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreatePosition { text, price, unit } = cmd;

        if price.is_negative() {
            return Err(tracerr::new!(E::NegativePrice));
        }

        self.database()
            .execute(Insert(position::Draft { text, price, unit }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`CreatePosition`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// New [`Position`] carries a negative price.
    #[display("`Position` price must not be negative")]
    NegativePrice,
}
