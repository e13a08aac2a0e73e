//! [`Command`] for creating a new [`Customer`].

use common::operations::Insert;
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{customer, Customer},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Customer`].
#[derive(Clone, Debug)]
pub struct CreateCustomer {
    /// First name of a new [`Customer`].
    pub first_name: customer::Name,

    /// Surname of a new [`Customer`].
    pub last_name: customer::Name,

    /// Postal [`customer::Address`] of a new [`Customer`].
    pub address: customer::Address,

    /// VAT identification number (UID) of a new [`Customer`], if any.
    pub uid: Option<customer::Uid>,

    /// Phone number of a new [`Customer`], if any.
    pub phone: Option<String>,

    /// Email address of a new [`Customer`], if any.
    pub email: Option<String>,
}

impl<Db> Command<CreateCustomer> for Service<Db>
where
    Db: Database<
        Insert<customer::Draft>,
        Ok = Customer,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Customer;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateCustomer,
    ) -> Result<Self::Ok, Self::Err> {
        let CreateCustomer {
            first_name,
            last_name,
            address,
            uid,
            phone,
            email,
        } = cmd;

        self.database()
            .execute(Insert(customer::Draft {
                first_name,
                last_name,
                address,
                uid,
                phone,
                email,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))
    }
}

/// Error of [`CreateCustomer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
