//! [`Command`] for creating a new [`Invoice`].

use common::operations::{By, Commit, Insert, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{customer, invoice, position, Customer, Invoice, Position},
    infra::{database, Database},
    Service,
};

use super::{resolve_items, Command, Item, ItemsError};

/// [`Command`] for creating a new [`Invoice`].
#[derive(Clone, Debug)]
pub struct CreateInvoice {
    /// ID of the [`Customer`] a new [`Invoice`] is billed to.
    pub customer_id: customer::Id,

    /// [`invoice::Kind`] of the billed services.
    pub kind: invoice::Kind,

    /// [`Date`] the billed services started on.
    ///
    /// [`Date`]: common::Date
    pub started_on: invoice::StartDate,

    /// [`Date`] the billed services finished on.
    ///
    /// [`Date`]: common::Date
    pub finished_on: invoice::FinishDate,

    /// [`invoice::Deposit`] already paid, if any.
    ///
    /// Disallowed for [`invoice::Kind::Construction`], where the VAT
    /// liability shifts to the recipient and no VAT may be backed out of
    /// a deposit.
    pub deposit: Option<invoice::Deposit>,

    /// Ordered [`Item`]s of a new [`Invoice`].
    pub items: Vec<Item>,
}

impl<Db> Command<CreateInvoice> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Customer>, customer::Id>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Select<By<Option<Position>, position::Id>>,
            Ok = Option<Position>,
            Err = Traced<database::Error>,
        > + Database<
            Insert<position::Draft>,
            Ok = Position,
            Err = Traced<database::Error>,
        > + Database<
            Insert<invoice::Draft>,
            Ok = Invoice,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Invoice;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateInvoice,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateInvoice {
            customer_id,
            kind,
            started_on,
            finished_on,
            deposit,
            items,
        } = cmd;

        if deposit.is_some() && kind == invoice::Kind::Construction {
            return Err(tracerr::new!(E::DepositOnReverseCharge));
        }

        self.database()
            .execute(Select(By::<Option<Customer>, _>::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CustomerNotExists(customer_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let items = resolve_items(&tx, items)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let invoice = tx
            .execute(Insert(invoice::Draft {
                customer_id,
                kind,
                started_on,
                finished_on,
                deposit,
                items,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(invoice)
    }
}

/// Error of [`CreateInvoice`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// A deposit is not allowed on a reverse-charge [`Invoice`].
    #[display(
        "`Invoice` of `Kind::Construction` cannot carry a deposit"
    )]
    DepositOnReverseCharge,

    /// [`Item`]s of a new [`Invoice`] failed to resolve.
    #[display("{_0}")]
    #[from]
    Items(ItemsError),
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Commit, Insert, Select, Transact},
        Date, Money,
    };
    use rust_decimal::Decimal;
    use tracerr::Traced;

    use crate::{
        domain::{customer, invoice, position, Customer, Invoice, Position},
        infra::{database, Database},
        Service,
    };

    use super::{CreateInvoice, ExecutionError};

    /// [`Database`] refusing every operation.
    ///
    /// Lets the tests prove that validation fires before any I/O.
    #[derive(Clone, Copy, Debug)]
    struct Untouchable;

    macro_rules! untouchable {
        ($args:ty, $ok:ty) => {
            impl Database<$args> for Untouchable {
                type Ok = $ok;
                type Err = Traced<database::Error>;

                async fn execute(
                    &self,
                    _: $args,
                ) -> Result<Self::Ok, Self::Err> {
                    panic!("`Database` must not be touched")
                }
            }
        };
    }

    untouchable!(Transact, Self);
    untouchable!(Commit, ());
    untouchable!(Select<By<Option<Customer>, customer::Id>>, Option<Customer>);
    untouchable!(Select<By<Option<Position>, position::Id>>, Option<Position>);
    untouchable!(Insert<position::Draft>, Position);
    untouchable!(Insert<invoice::Draft>, Invoice);

    #[tokio::test]
    async fn rejects_deposit_on_reverse_charge_before_any_io() {
        let service =
            Service::new(crate::Config::default(), Untouchable);

        let cmd = CreateInvoice {
            customer_id: 1.into(),
            kind: invoice::Kind::Construction,
            started_on: Date::from_calendar(2024, 2, 1).unwrap().coerce(),
            finished_on: Date::from_calendar(2024, 2, 29).unwrap().coerce(),
            deposit: Some(invoice::Deposit {
                gross: Money::eur(Decimal::from(120)),
                paid_on: Date::from_calendar(2024, 2, 10).unwrap().coerce(),
            }),
            items: Vec::new(),
        };

        let err = service.execute(cmd).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::DepositOnReverseCharge,
        ));
    }
}
