//! [`Position`]-related definitions.

use common::Money;
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLInputObject, GraphQLScalar};
use service::domain;

use crate::{api, api::scalar, Context};

/// A reusable catalog position: a line of work with its unit price.
#[derive(Clone, Debug, From, Into)]
pub struct Position(domain::Position);

/// A reusable catalog position: a line of work with its unit price.
#[graphql_object(context = Context)]
impl Position {
    /// Unique identifier of this `Position`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Position.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Description text of this `Position`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Position.text",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn text(&self) -> Text {
        self.0.text.clone().into()
    }

    /// Net unit price of this `Position`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Position.price",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn price(&self) -> Money {
        self.0.price
    }

    /// Unit of measure of this `Position`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Position.unit",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn unit(&self) -> Unit {
        self.0.unit.clone().into()
    }
}

/// Unique identifier of a `Position`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(i32, domain::position::Id)]
#[into(i32, domain::position::Id)]
#[graphql(name = "PositionId", transparent)]
pub struct Id(i32);

/// Description text of a `Position`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PositionText",
    with = scalar::Via::<domain::position::Text>,
)]
pub struct Text(domain::position::Text);

/// Unit of measure of a `Position`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PositionUnit",
    with = scalar::Via::<domain::position::Unit>,
)]
pub struct Unit(domain::position::Unit);

/// A new `Position` to be added to the catalog.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "PositionDraftInput")]
pub struct DraftInput {
    /// Description text of the `Position`.
    pub text: Text,

    /// Net unit price of the `Position`.
    pub price: Money,

    /// Unit of measure of the `Position`.
    pub unit: Unit,
}

impl From<DraftInput> for domain::position::Draft {
    fn from(input: DraftInput) -> Self {
        let DraftInput { text, price, unit } = input;
        Self {
            text: text.into(),
            price,
            unit: unit.into(),
        }
    }
}
