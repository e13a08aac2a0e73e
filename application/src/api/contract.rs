//! [`Contract`]-related definitions.

use std::future;

use common::Date;
use derive_more::{Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{document, domain, query, read, Query as _};
use tokio::sync::OnceCell;

use crate::{api, AsError, Context, Error};

/// A contract (Angebot) offered to a customer.
#[derive(Clone, Debug, From)]
pub struct Contract {
    /// ID of this [`Contract`].
    id: Id,

    /// Underlying [`read::contract::Aggregate`].
    aggregate: OnceCell<read::contract::Aggregate>,
}

impl From<read::contract::Aggregate> for Contract {
    fn from(aggregate: read::contract::Aggregate) -> Self {
        Self {
            id: aggregate.contract.id.into(),
            aggregate: OnceCell::new_with(Some(aggregate)),
        }
    }
}

impl Contract {
    /// Creates a new [`Contract`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Contract`] with the provided ID exists,
    /// otherwise accessing this [`Contract`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            aggregate: OnceCell::new(),
        }
    }

    /// Returns the underlying [`read::contract::Aggregate`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Contract`] doesn't exist.
    async fn aggregate(
        &self,
        ctx: &Context,
    ) -> Result<&read::contract::Aggregate, Error> {
        let id = self.id.into();
        self.aggregate
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::contract::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|c| {
                        future::ready(c.ok_or_else(|| {
                            api::query::ContractError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A contract (Angebot) offered to a customer.
#[graphql_object(context = Context)]
impl Contract {
    /// Unique identifier of this `Contract`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Zero-padded offer number of this `Contract`, as printed on the
    /// rendered document.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.number",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn number(&self) -> String {
        document::Kind::Offer.number(self.id.into())
    }

    /// `Customer` this `Contract` is offered to, if still existing.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.customer",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn customer(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Customer>, Error> {
        Ok(self
            .aggregate(ctx)
            .await?
            .customer
            .clone()
            .map(Into::into))
    }

    /// `Date` this `Contract` was issued on.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.issuedOn",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn issued_on(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.aggregate(ctx).await?.contract.issued_on.coerce())
    }

    /// Indicator whether this `Contract` has been accepted by the customer.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.accepted",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn accepted(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.aggregate(ctx).await?.contract.accepted)
    }

    /// Ordered line items of this `Contract`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.items",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn items(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::LineItem>, Error> {
        Ok(self
            .aggregate(ctx)
            .await?
            .contract
            .items
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// Monetary totals of this `Contract`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.totals",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn totals(&self, ctx: &Context) -> Result<api::Totals, Error> {
        Ok(self.aggregate(ctx).await?.contract.totals().into())
    }
}

/// Unique identifier of a `Contract`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(i32, domain::contract::Id)]
#[into(i32, domain::contract::Id)]
#[graphql(name = "ContractId", transparent)]
pub struct Id(i32);
