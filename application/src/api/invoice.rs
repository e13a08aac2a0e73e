//! [`Invoice`]-related definitions.

use std::future;

use common::{Date, Money};
use derive_more::{Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{
    graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLObject,
    GraphQLScalar,
};
use service::{document, domain, query, read, Query as _};
use tokio::sync::OnceCell;

use crate::{api, AsError, Context, Error};

/// An invoice (Rechnung) issued to a customer.
#[derive(Clone, Debug, From)]
pub struct Invoice {
    /// ID of this [`Invoice`].
    id: Id,

    /// Underlying [`read::invoice::Aggregate`].
    aggregate: OnceCell<read::invoice::Aggregate>,
}

impl From<read::invoice::Aggregate> for Invoice {
    fn from(aggregate: read::invoice::Aggregate) -> Self {
        Self {
            id: aggregate.invoice.id.into(),
            aggregate: OnceCell::new_with(Some(aggregate)),
        }
    }
}

impl Invoice {
    /// Creates a new [`Invoice`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Invoice`] with the provided ID exists,
    /// otherwise accessing this [`Invoice`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            aggregate: OnceCell::new(),
        }
    }

    /// Returns the underlying [`read::invoice::Aggregate`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Invoice`] doesn't exist.
    async fn aggregate(
        &self,
        ctx: &Context,
    ) -> Result<&read::invoice::Aggregate, Error> {
        let id = self.id.into();
        self.aggregate
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::invoice::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|i| {
                        future::ready(i.ok_or_else(|| {
                            api::query::InvoiceError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// An invoice (Rechnung) issued to a customer.
#[graphql_object(context = Context)]
impl Invoice {
    /// Unique identifier of this `Invoice`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Zero-padded invoice number of this `Invoice`, as printed on the
    /// rendered document.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.number",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn number(&self) -> String {
        document::Kind::Invoice.number(self.id.into())
    }

    /// `Customer` this `Invoice` is issued to, if still existing.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.customer",
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

    /// Kind of this `Invoice`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.kind",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn kind(&self, ctx: &Context) -> Result<Kind, Error> {
        Ok(self.aggregate(ctx).await?.invoice.kind.into())
    }

    /// `Date` this `Invoice` was issued on.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.issuedOn",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn issued_on(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.aggregate(ctx).await?.invoice.issued_on.coerce())
    }

    /// `Date` the invoiced service period started on.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.startedOn",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn started_on(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.aggregate(ctx).await?.invoice.started_on.coerce())
    }

    /// `Date` the invoiced service period finished on.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.finishedOn",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn finished_on(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.aggregate(ctx).await?.invoice.finished_on.coerce())
    }

    /// Deposit already paid on this `Invoice`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.deposit",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn deposit(
        &self,
        ctx: &Context,
    ) -> Result<Option<Deposit>, Error> {
        Ok(self.aggregate(ctx).await?.invoice.deposit.map(Into::into))
    }

    /// Ordered line items of this `Invoice`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.items",
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
            .invoice
            .items
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// Monetary totals of this `Invoice`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.totals",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn totals(&self, ctx: &Context) -> Result<api::Totals, Error> {
        Ok(self.aggregate(ctx).await?.invoice.totals().into())
    }
}

/// Unique identifier of an `Invoice`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(i32, domain::invoice::Id)]
#[into(i32, domain::invoice::Id)]
#[graphql(name = "InvoiceId", transparent)]
pub struct Id(i32);

/// Kind of an `Invoice`, deciding its tax treatment.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "InvoiceKind")]
pub enum Kind {
    /// Regular service invoice, taxed at the standard VAT rate.
    Service,

    /// Construction work invoice falling under the reverse charge regime:
    /// the recipient owes the VAT.
    Construction,
}

impl From<domain::invoice::Kind> for Kind {
    fn from(kind: domain::invoice::Kind) -> Self {
        match kind {
            domain::invoice::Kind::Service => Self::Service,
            domain::invoice::Kind::Construction => Self::Construction,
        }
    }
}

impl From<Kind> for domain::invoice::Kind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Service => Self::Service,
            Kind::Construction => Self::Construction,
        }
    }
}

/// Deposit already paid on an `Invoice`.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "InvoiceDeposit")]
pub struct Deposit {
    /// Gross amount of the `Deposit`.
    pub gross: Money,

    /// `Date` the `Deposit` was paid on.
    pub paid_on: Date,
}

impl From<domain::invoice::Deposit> for Deposit {
    fn from(deposit: domain::invoice::Deposit) -> Self {
        let domain::invoice::Deposit { gross, paid_on } = deposit;
        Self {
            gross,
            paid_on: paid_on.coerce(),
        }
    }
}

/// Deposit already paid on an `Invoice` to create.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
#[graphql(name = "InvoiceDepositInput")]
pub struct DepositInput {
    /// Gross amount of the deposit.
    pub gross: Money,

    /// `Date` the deposit was paid on.
    pub paid_on: Date,
}

impl From<DepositInput> for domain::invoice::Deposit {
    fn from(input: DepositInput) -> Self {
        let DepositInput { gross, paid_on } = input;
        Self {
            gross,
            paid_on: paid_on.coerce(),
        }
    }
}

/// Unpersisted `Invoice` pre-filled from a `Contract`.
#[derive(Clone, Debug, From)]
pub struct Draft(domain::invoice::Draft);

/// Unpersisted `Invoice` pre-filled from a `Contract`.
///
/// Nothing is stored until `createInvoice` is executed with these values.
#[graphql_object(context = Context, name = "InvoiceDraft")]
impl Draft {
    /// `Customer` the `Invoice` will be issued to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "InvoiceDraft.customer",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn customer(&self) -> api::Customer {
        #[expect(
            unsafe_code,
            reason = "`Draft` built from a stored `Contract` guarantees \
                      `Customer` existence"
        )]
        unsafe {
            api::Customer::new_unchecked(self.0.customer_id)
        }
    }

    /// Kind the `Invoice` will be created with.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "InvoiceDraft.kind",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn kind(&self) -> Kind {
        self.0.kind.into()
    }

    /// `Date` the service period starts on.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "InvoiceDraft.startedOn",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn started_on(&self) -> Date {
        self.0.started_on.coerce()
    }

    /// `Date` the service period finishes on.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "InvoiceDraft.finishedOn",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn finished_on(&self) -> Date {
        self.0.finished_on.coerce()
    }

    /// Line items copied from the source `Contract`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "InvoiceDraft.items",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn items(&self) -> Vec<api::LineItem> {
        self.0.items.iter().cloned().map(Into::into).collect()
    }

    /// Monetary totals the `Invoice` will carry.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "InvoiceDraft.totals",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn totals(&self) -> api::Totals {
        domain::Totals::invoice(
            &self.0.items,
            self.0.kind,
            self.0.deposit.map(|d| d.gross),
        )
        .into()
    }
}
