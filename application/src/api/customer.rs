//! [`Customer`]-related definitions.

use std::future;

use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{
    graphql_object, GraphQLInputObject, GraphQLObject, GraphQLScalar,
};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A customer the company works for.
#[derive(Clone, Debug, From)]
pub struct Customer {
    /// ID of this [`Customer`].
    id: Id,

    /// Underlying [`domain::Customer`].
    customer: OnceCell<domain::Customer>,
}

impl From<domain::Customer> for Customer {
    fn from(customer: domain::Customer) -> Self {
        Self {
            id: customer.id.into(),
            customer: OnceCell::new_with(Some(customer)),
        }
    }
}

impl Customer {
    /// Creates a new [`Customer`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Customer`] with the provided ID exists,
    /// otherwise accessing this [`Customer`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            customer: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Customer`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Customer`] doesn't exist.
    async fn customer(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Customer, Error> {
        let id = self.id.into();
        self.customer
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::customer::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|c| {
                        future::ready(c.ok_or_else(|| {
                            api::query::CustomerError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A customer the company works for.
#[graphql_object(context = Context)]
impl Customer {
    /// Unique identifier of this `Customer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// First name of this `Customer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.firstName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn first_name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.customer(ctx).await?.first_name.clone().into())
    }

    /// Last name of this `Customer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.lastName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn last_name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.customer(ctx).await?.last_name.clone().into())
    }

    /// Postal address of this `Customer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.address",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn address(&self, ctx: &Context) -> Result<Address, Error> {
        Ok(self.customer(ctx).await?.address.clone().into())
    }

    /// VAT identification number (UID) of this `Customer`, if any.
    ///
    /// Absent for private customers.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.uid",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn uid(&self, ctx: &Context) -> Result<Option<Uid>, Error> {
        Ok(self.customer(ctx).await?.uid.clone().map(Into::into))
    }

    /// Phone number of this `Customer`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.phone",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn phone(&self, ctx: &Context) -> Result<Option<String>, Error> {
        Ok(self.customer(ctx).await?.phone.clone())
    }

    /// Email address of this `Customer`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.email",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn email(&self, ctx: &Context) -> Result<Option<String>, Error> {
        Ok(self.customer(ctx).await?.email.clone())
    }
}

/// Unique identifier of a `Customer`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(i32, domain::customer::Id)]
#[into(i32, domain::customer::Id)]
#[graphql(name = "CustomerId", transparent)]
pub struct Id(i32);

/// Name of a `Customer`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CustomerName",
    with = scalar::Via::<domain::customer::Name>,
)]
pub struct Name(domain::customer::Name);

/// VAT identification number (UID) of a `Customer`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CustomerUid",
    with = scalar::Via::<domain::customer::Uid>,
)]
pub struct Uid(domain::customer::Uid);

/// Postal address of a `Customer`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "CustomerAddress")]
pub struct Address {
    /// Street line, including the house number.
    pub street: String,

    /// Postal code.
    pub postal_code: String,

    /// City name.
    pub city: String,
}

impl From<domain::customer::Address> for Address {
    fn from(address: domain::customer::Address) -> Self {
        let domain::customer::Address {
            street,
            postal_code,
            city,
        } = address;
        Self {
            street,
            postal_code,
            city,
        }
    }
}

/// Postal address of a `Customer`.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "CustomerAddressInput")]
pub struct AddressInput {
    /// Street line, including the house number.
    pub street: String,

    /// Postal code.
    pub postal_code: String,

    /// City name.
    pub city: String,
}

impl From<AddressInput> for domain::customer::Address {
    fn from(input: AddressInput) -> Self {
        let AddressInput {
            street,
            postal_code,
            city,
        } = input;
        Self {
            street,
            postal_code,
            city,
        }
    }
}
