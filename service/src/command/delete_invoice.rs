//! [`Command`] deleting an [`Invoice`].

use common::operations::{By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{invoice, Invoice},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] deleting an [`Invoice`] along with its line items.
#[derive(Clone, Copy, Debug)]
pub struct DeleteInvoice {
    /// ID of the [`Invoice`] to delete.
    pub id: invoice::Id,
}

impl<Db> Command<DeleteInvoice> for Service<Db>
where
    Db: Database<
        Delete<By<Invoice, invoice::Id>>,
        Ok = bool,
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        DeleteInvoice { id }: DeleteInvoice,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        self.database()
            .execute(Delete(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .then_some(())
            .ok_or(E::InvoiceNotExists(id))
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`DeleteInvoice`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Invoice`] with the provided ID does not exist.
    #[display("`Invoice(id: {_0})` does not exist")]
    InvoiceNotExists(#[error(not(source))] invoice::Id),
}
