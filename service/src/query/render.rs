//! [`Query`] collection rendering documents into PDF bytes.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    document::{self, pdf, Document, Rendered},
    domain::{contract, invoice},
    infra::{database, Database},
    read, Service,
};

use super::Query;

/// [`Query`] rendering the offer document of a [`Contract`].
///
/// [`Contract`]: crate::domain::Contract
#[derive(Clone, Copy, Debug)]
pub struct Offer {
    /// ID of the [`Contract`] to render.
    ///
    /// [`Contract`]: crate::domain::Contract
    pub id: contract::Id,
}

impl<Db> Query<Offer> for Service<Db>
where
    Db: Database<
        Select<By<Option<read::contract::Aggregate>, contract::Id>>,
        Ok = Option<read::contract::Aggregate>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Rendered;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, Offer { id }: Offer) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let read::contract::Aggregate { contract, customer } = self
            .database()
            .execute(Select(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(id))
            .map_err(tracerr::wrap!())?;

        let document = Document::offer(&contract, customer.as_ref());
        let file_name = document::file_name(
            document::Kind::Offer,
            contract.id.into(),
            customer.as_ref(),
            contract.issued_on.coerce(),
        );

        render_off_thread(document, self.config().company.clone(), file_name)
            .await
    }
}

/// [`Query`] rendering the document of an [`Invoice`].
///
/// [`Invoice`]: crate::domain::Invoice
#[derive(Clone, Copy, Debug)]
pub struct Invoice {
    /// ID of the [`Invoice`] to render.
    ///
    /// [`Invoice`]: crate::domain::Invoice
    pub id: invoice::Id,
}

impl<Db> Query<Invoice> for Service<Db>
where
    Db: Database<
        Select<By<Option<read::invoice::Aggregate>, invoice::Id>>,
        Ok = Option<read::invoice::Aggregate>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Rendered;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        Invoice { id }: Invoice,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let read::invoice::Aggregate { invoice, customer } = self
            .database()
            .execute(Select(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::InvoiceNotExists(id))
            .map_err(tracerr::wrap!())?;

        let document = Document::invoice(&invoice, customer.as_ref());
        let file_name = document::file_name(
            document::Kind::Invoice,
            invoice.id.into(),
            customer.as_ref(),
            invoice.issued_on.coerce(),
        );

        render_off_thread(document, self.config().company.clone(), file_name)
            .await
    }
}

/// Runs the CPU-bound PDF encoding on a blocking thread, keeping the
/// async executor responsive.
async fn render_off_thread(
    document: Document,
    company: document::Company,
    file_name: String,
) -> Result<Rendered, Traced<ExecutionError>> {
    use ExecutionError as E;

    let bytes =
        tokio::task::spawn_blocking(move || pdf::render(&document, &company))
            .await
            .map_err(tracerr::from_and_wrap!(=> E))?
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

    Ok(Rendered { file_name, bytes })
}

/// Error of [`Offer`] or [`Invoice`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contract`] with the provided ID does not exist.
    ///
    /// [`Contract`]: crate::domain::Contract
    #[display("`Contract(id: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Invoice`] with the provided ID does not exist.
    ///
    /// [`Invoice`]: crate::domain::Invoice
    #[display("`Invoice(id: {_0})` does not exist")]
    InvoiceNotExists(#[error(not(source))] invoice::Id),

    /// Rendering thread failed to join.
    #[display("rendering thread failed: {_0}")]
    #[from]
    Join(tokio::task::JoinError),

    /// PDF encoding failed.
    #[display("PDF encoding failed: {_0}")]
    #[from]
    Render(pdf::Error),
}
