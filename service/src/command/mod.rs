//! [`Command`] definition.

pub mod accept_contract;
pub mod create_contract;
pub mod create_customer;
pub mod create_invoice;
pub mod create_position;
pub mod delete_contract;
pub mod delete_invoice;

use common::operations::{By, Insert, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{line_item::Quantity, position, LineItem, Position},
    infra::{database, Database},
};

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    accept_contract::AcceptContract, create_contract::CreateContract,
    create_customer::CreateCustomer, create_invoice::CreateInvoice,
    create_position::CreatePosition, delete_contract::DeleteContract,
    delete_invoice::DeleteInvoice,
};

/// One ordered line of a [`CreateContract`] or [`CreateInvoice`]
/// [`Command`].
#[derive(Clone, Debug)]
pub struct Item {
    /// [`Position`] the line refers to.
    pub source: PositionSource,

    /// Ordered [`Quantity`] of the [`Position`].
    pub quantity: Quantity,
}

/// Source of a [`Position`] referred to by an [`Item`].
#[derive(Clone, Debug)]
pub enum PositionSource {
    /// Existing catalog [`Position`].
    Existing(position::Id),

    /// New [`Position`] to be added to the catalog alongside.
    New(position::Draft),
}

/// Resolves the provided [`Item`]s into [`LineItem`]s against the given
/// [`Database`], inserting the new [`Position`]s it meets.
///
/// [`PositionSource::New`] prices must not be negative; catalog
/// [`Position`]s pass through as stored.
async fn resolve_items<Db>(
    db: &Db,
    items: Vec<Item>,
) -> Result<Vec<LineItem>, Traced<ItemsError>>
where
    Db: Database<
            Select<By<Option<Position>, position::Id>>,
            Ok = Option<Position>,
            Err = Traced<database::Error>,
        > + Database<
            Insert<position::Draft>,
            Ok = Position,
            Err = Traced<database::Error>,
        >,
{
    use ItemsError as E;

    let mut resolved = Vec::with_capacity(items.len());
    for Item { source, quantity } in items {
        let position = match source {
            PositionSource::Existing(id) => db
                .execute(Select(By::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::PositionNotExists(id))
                .map_err(tracerr::wrap!())?,
            PositionSource::New(draft) => {
                if draft.price.is_negative() {
                    return Err(tracerr::new!(E::NegativePrice));
                }
                db.execute(Insert(draft))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
            }
        };
        resolved.push(LineItem { position, quantity });
    }
    Ok(resolved)
}

/// Error of resolving [`Item`]s into [`LineItem`]s.
#[derive(Debug, Display, Error, From)]
pub enum ItemsError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// New [`Position`] carries a negative price.
    #[display("new `Position` price must not be negative")]
    NegativePrice,

    /// [`Position`] with the provided ID does not exist.
    #[display("`Position(id: {_0})` does not exist")]
    PositionNotExists(#[error(not(source))] position::Id),
}
