//! GraphQL [`Mutation`]s definitions.

use common::{Date, Money};
use juniper::graphql_object;
use service::{command, domain, query, Command as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `Customer` with the provided data.
    #[tracing::instrument(
        skip_all,
        fields(
            first_name = %first_name,
            gql.name = "createCustomer",
            last_name = %last_name,
            otel.name = Self::SPAN_NAME,
            uid = ?uid,
        ),
    )]
    pub async fn create_customer(
        first_name: api::customer::Name,
        last_name: api::customer::Name,
        address: api::customer::AddressInput,
        uid: Option<api::customer::Uid>,
        phone: Option<String>,
        email: Option<String>,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        ctx.authorize().await?;

        ctx.service()
            .execute(command::CreateCustomer {
                first_name: first_name.into(),
                last_name: last_name.into(),
                address: address.into(),
                uid: uid.map(Into::into),
                phone,
                email,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Adds a new `Position` to the catalog.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NEGATIVE_PRICE` - the provided price is negative.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createPosition",
            otel.name = Self::SPAN_NAME,
            price = %price,
            text = %text,
            unit = %unit,
        ),
    )]
    pub async fn create_position(
        text: api::position::Text,
        price: Money,
        unit: api::position::Unit,
        ctx: &Context,
    ) -> Result<api::Position, Error> {
        ctx.authorize().await?;

        ctx.service()
            .execute(command::CreatePosition {
                text: text.into(),
                price,
                unit: unit.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Contract` for the `Customer` with the specified ID.
    ///
    /// The ID and the issue date are assigned by the storage.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` with the specified ID does
    ///                           not exist;
    /// - `POSITION_NOT_EXISTS` - a referred catalog `Position` does not
    ///                           exist;
    /// - `NEGATIVE_PRICE` - a new `Position` carries a negative price;
    /// - `AMBIGUOUS_ITEM_POSITION` - an item provides both or neither of
    ///                               `positionId` and `newPosition`.
    #[tracing::instrument(
        skip_all,
        fields(
            customer_id = %customer_id,
            gql.name = "createContract",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_contract(
        customer_id: api::customer::Id,
        items: Vec<api::ItemInput>,
        ctx: &Context,
    ) -> Result<api::Contract, Error> {
        ctx.authorize().await?;

        let items =
            api::ItemInput::into_items(items).map_err(ctx.error())?;

        let contract = ctx
            .service()
            .execute(command::CreateContract {
                customer_id: customer_id.into(),
                items,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        #[expect(unsafe_code, reason = "just persisted")]
        Ok(unsafe { api::Contract::new_unchecked(contract.id) })
    }

    /// Marks the `Contract` with the specified ID as accepted by the
    /// customer.
    ///
    /// Accepting an already accepted `Contract` changes nothing.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONTRACT_NOT_EXISTS` - the `Contract` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "acceptContract",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn accept_contract(
        id: api::contract::Id,
        ctx: &Context,
    ) -> Result<api::Contract, Error> {
        ctx.authorize().await?;

        let contract = ctx
            .service()
            .execute(command::AcceptContract { id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        #[expect(unsafe_code, reason = "just persisted")]
        Ok(unsafe { api::Contract::new_unchecked(contract.id) })
    }

    /// Deletes the `Contract` with the specified ID along with its line
    /// items.
    ///
    /// Referred catalog `Position`s stay untouched.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONTRACT_NOT_EXISTS` - the `Contract` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "deleteContract",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_contract(
        id: api::contract::Id,
        ctx: &Context,
    ) -> Result<bool, Error> {
        ctx.authorize().await?;

        ctx.service()
            .execute(command::DeleteContract { id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|()| true)
    }

    /// Creates a new `Invoice` for the `Customer` with the specified ID.
    ///
    /// The ID and the issue date are assigned by the storage.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` with the specified ID does
    ///                           not exist;
    /// - `DEPOSIT_ON_REVERSE_CHARGE` - a deposit is provided for a
    ///                                 `CONSTRUCTION` invoice;
    /// - `POSITION_NOT_EXISTS` - a referred catalog `Position` does not
    ///                           exist;
    /// - `NEGATIVE_PRICE` - a new `Position` carries a negative price;
    /// - `AMBIGUOUS_ITEM_POSITION` - an item provides both or neither of
    ///                               `positionId` and `newPosition`.
    #[tracing::instrument(
        skip_all,
        fields(
            customer_id = %customer_id,
            finished_on = %finished_on,
            gql.name = "createInvoice",
            kind = ?kind,
            otel.name = Self::SPAN_NAME,
            started_on = %started_on,
        ),
    )]
    pub async fn create_invoice(
        customer_id: api::customer::Id,
        kind: api::invoice::Kind,
        started_on: Date,
        finished_on: Date,
        deposit: Option<api::invoice::DepositInput>,
        items: Vec<api::ItemInput>,
        ctx: &Context,
    ) -> Result<api::Invoice, Error> {
        ctx.authorize().await?;

        let items =
            api::ItemInput::into_items(items).map_err(ctx.error())?;

        let invoice = ctx
            .service()
            .execute(command::CreateInvoice {
                customer_id: customer_id.into(),
                kind: kind.into(),
                started_on: started_on.coerce(),
                finished_on: finished_on.coerce(),
                deposit: deposit.map(Into::into),
                items,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        #[expect(unsafe_code, reason = "just persisted")]
        Ok(unsafe { api::Invoice::new_unchecked(invoice.id) })
    }

    /// Creates a new `Invoice` out of the `Contract` with the specified ID.
    ///
    /// The line items of the `Contract` are copied as-is, the kind defaults
    /// to `SERVICE`, the service period defaults to today unless both
    /// bounds are provided, and no deposit is assumed. The source
    /// `Contract` stays untouched.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONTRACT_NOT_EXISTS` - the `Contract` with the specified ID does
    ///                           not exist;
    /// - `CUSTOMER_NOT_EXISTS` - the customer of the `Contract` does not
    ///                           exist anymore;
    /// - `INCOMPLETE_PERIOD` - only one bound of the service period is
    ///                         provided.
    #[tracing::instrument(
        skip_all,
        fields(
            contract_id = %contract_id,
            finished_on = ?finished_on,
            gql.name = "createInvoiceFromContract",
            otel.name = Self::SPAN_NAME,
            started_on = ?started_on,
        ),
    )]
    pub async fn create_invoice_from_contract(
        contract_id: api::contract::Id,
        started_on: Option<Date>,
        finished_on: Option<Date>,
        ctx: &Context,
    ) -> Result<api::Invoice, Error> {
        ctx.authorize().await?;

        let period = match (started_on, finished_on) {
            (Some(s), Some(f)) => Some((s.coerce(), f.coerce())),
            (None, None) => None,
            (Some(_), None) | (None, Some(_)) => {
                return Err(ctx.error()(
                    api::query::PeriodError::Incomplete.into(),
                ));
            }
        };

        let aggregate = ctx
            .service()
            .execute(query::contract::ById::by(contract_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::query::ContractError::NotExists.into())
            .map_err(ctx.error())?;

        let draft = domain::invoice::Draft::from_contract(
            &aggregate.contract,
            period,
        );

        let invoice = ctx
            .service()
            .execute(command::CreateInvoice {
                customer_id: draft.customer_id,
                kind: draft.kind,
                started_on: draft.started_on,
                finished_on: draft.finished_on,
                deposit: draft.deposit,
                items: draft
                    .items
                    .into_iter()
                    .map(|item| command::Item {
                        source: command::PositionSource::Existing(
                            item.position.id,
                        ),
                        quantity: item.quantity,
                    })
                    .collect(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        #[expect(unsafe_code, reason = "just persisted")]
        Ok(unsafe { api::Invoice::new_unchecked(invoice.id) })
    }

    /// Deletes the `Invoice` with the specified ID along with its line
    /// items.
    ///
    /// Referred catalog `Position`s stay untouched.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVOICE_NOT_EXISTS` - the `Invoice` with the specified ID does
    ///                          not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "deleteInvoice",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_invoice(
        id: api::invoice::Id,
        ctx: &Context,
    ) -> Result<bool, Error> {
        ctx.authorize().await?;

        ctx.service()
            .execute(command::DeleteInvoice { id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|()| true)
    }
}

impl AsError for command::ItemsError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NEGATIVE_PRICE"]
                #[status = BAD_REQUEST]
                #[message = "A new `Position` must not carry a negative \
                             price"]
                NegativePrice,

                #[code = "POSITION_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Position` with the provided ID is not exists"]
                PositionNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NegativePrice => Error::NegativePrice.into(),
            Self::PositionNotExists(_) => Error::PositionNotExists.into(),
        })
    }
}

impl AsError for command::create_customer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::create_position::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NEGATIVE_PRICE"]
                #[status = BAD_REQUEST]
                #[message = "A `Position` must not carry a negative price"]
                NegativePrice,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NegativePrice => Error::NegativePrice.into(),
        })
    }
}

impl AsError for command::create_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CUSTOMER_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Customer` with the provided ID is not exists"]
                CustomerNotExists,
            }
        }

        Some(match self {
            Self::CustomerNotExists(_) => Error::CustomerNotExists.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::Items(e) => return e.try_as_error(),
        })
    }
}

impl AsError for command::accept_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::ContractNotExists(_) => {
                Some(api::query::ContractError::NotExists.into())
            }
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::delete_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::ContractNotExists(_) => {
                Some(api::query::ContractError::NotExists.into())
            }
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::create_invoice::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CUSTOMER_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Customer` with the provided ID is not exists"]
                CustomerNotExists,

                #[code = "DEPOSIT_ON_REVERSE_CHARGE"]
                #[status = BAD_REQUEST]
                #[message = "A reverse charge `Invoice` cannot carry a \
                             deposit"]
                DepositOnReverseCharge,
            }
        }

        Some(match self {
            Self::CustomerNotExists(_) => Error::CustomerNotExists.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::DepositOnReverseCharge => {
                Error::DepositOnReverseCharge.into()
            }
            Self::Items(e) => return e.try_as_error(),
        })
    }
}

impl AsError for command::delete_invoice::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvoiceNotExists(_) => {
                Some(api::query::InvoiceError::NotExists.into())
            }
        }
    }
}
