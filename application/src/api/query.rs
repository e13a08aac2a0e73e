//! GraphQL [`Query`]s definitions.

use common::Date;
use juniper::graphql_object;
use service::{domain, query, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Customer` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "customer",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn customer(
        id: api::customer::Id,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        ctx.authorize().await?;

        ctx.service()
            .execute(query::customer::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| CustomerError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches all the `Customer`s there are, ordered by name.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "customers",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn customers(
        ctx: &Context,
    ) -> Result<Vec<api::Customer>, Error> {
        ctx.authorize().await?;

        ctx.service()
            .execute(query::customer::All::all())
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|customers| {
                customers.into_iter().map(Into::into).collect()
            })
    }

    /// Returns the catalog `Position` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `POSITION_NOT_EXISTS` - the `Position` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "position",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn position(
        id: api::position::Id,
        ctx: &Context,
    ) -> Result<api::Position, Error> {
        ctx.authorize().await?;

        ctx.service()
            .execute(query::position::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| PositionError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the whole `Position` catalog.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "positions",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn positions(
        ctx: &Context,
    ) -> Result<Vec<api::Position>, Error> {
        ctx.authorize().await?;

        ctx.service()
            .execute(query::position::All::all())
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|positions| {
                positions.into_iter().map(Into::into).collect()
            })
    }

    /// Returns the `Contract` with the specified ID.
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
            gql.name = "contract",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn contract(
        id: api::contract::Id,
        ctx: &Context,
    ) -> Result<api::Contract, Error> {
        ctx.authorize().await?;

        ctx.service()
            .execute(query::contract::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| ContractError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches all the `Contract`s there are.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "contracts",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn contracts(
        ctx: &Context,
    ) -> Result<Vec<api::Contract>, Error> {
        ctx.authorize().await?;

        ctx.service()
            .execute(query::contract::All::all())
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|contracts| {
                contracts.into_iter().map(Into::into).collect()
            })
    }

    /// Returns the `Invoice` with the specified ID.
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
            gql.name = "invoice",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn invoice(
        id: api::invoice::Id,
        ctx: &Context,
    ) -> Result<api::Invoice, Error> {
        ctx.authorize().await?;

        ctx.service()
            .execute(query::invoice::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| InvoiceError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches all the `Invoice`s there are.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "invoices",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn invoices(ctx: &Context) -> Result<Vec<api::Invoice>, Error> {
        ctx.authorize().await?;

        ctx.service()
            .execute(query::invoice::All::all())
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|invoices| invoices.into_iter().map(Into::into).collect())
    }

    /// Pre-fills an `InvoiceDraft` from the `Contract` with the specified
    /// ID.
    ///
    /// The line items are copied as-is, the kind defaults to `SERVICE` and
    /// the service period defaults to today unless both bounds are
    /// provided. Nothing is persisted.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONTRACT_NOT_EXISTS` - the `Contract` with the specified ID does
    ///                           not exist;
    /// - `INCOMPLETE_PERIOD` - only one bound of the service period is
    ///                         provided.
    #[tracing::instrument(
        skip_all,
        fields(
            contract_id = %contract_id,
            finished_on = ?finished_on,
            gql.name = "invoiceDraft",
            otel.name = Self::SPAN_NAME,
            started_on = ?started_on,
        ),
    )]
    pub async fn invoice_draft(
        contract_id: api::contract::Id,
        started_on: Option<Date>,
        finished_on: Option<Date>,
        ctx: &Context,
    ) -> Result<api::invoice::Draft, Error> {
        ctx.authorize().await?;

        let period = match (started_on, finished_on) {
            (Some(s), Some(f)) => Some((s.coerce(), f.coerce())),
            (None, None) => None,
            (Some(_), None) | (None, Some(_)) => {
                return Err(ctx.error()(PeriodError::Incomplete.into()));
            }
        };

        let aggregate = ctx
            .service()
            .execute(query::contract::ById::by(contract_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| ContractError::NotExists.into())
            .map_err(ctx.error())?;

        Ok(domain::invoice::Draft::from_contract(
            &aggregate.contract,
            period,
        )
        .into())
    }
}

define_error! {
    enum CustomerError {
        #[code = "CUSTOMER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Customer` with the provided ID is not exists"]
        NotExists,
    }
}

define_error! {
    enum PositionError {
        #[code = "POSITION_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Position` with the provided ID is not exists"]
        NotExists,
    }
}

define_error! {
    enum ContractError {
        #[code = "CONTRACT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Contract` with the provided ID is not exists"]
        NotExists,
    }
}

define_error! {
    enum InvoiceError {
        #[code = "INVOICE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Invoice` with the provided ID is not exists"]
        NotExists,
    }
}

define_error! {
    enum PeriodError {
        #[code = "INCOMPLETE_PERIOD"]
        #[status = BAD_REQUEST]
        #[message = "Both `startedOn` and `finishedOn` must be provided \
                     together"]
        Incomplete,
    }
}
