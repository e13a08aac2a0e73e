//! Line item related definitions.

use common::Money;
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLInputObject, GraphQLObject, GraphQLScalar};
use service::{command, domain};

use crate::{
    api::{self, position, scalar},
    define_error, Context, Error,
};

/// A priced line of a `Contract` or an `Invoice`.
#[derive(Clone, Debug, From, Into)]
pub struct LineItem(domain::LineItem);

/// A priced line of a `Contract` or an `Invoice`.
#[graphql_object(context = Context)]
impl LineItem {
    /// `Position` this `LineItem` refers to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LineItem.position",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn position(&self) -> api::Position {
        self.0.position.clone().into()
    }

    /// Ordered quantity of the `Position`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LineItem.quantity",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn quantity(&self) -> Quantity {
        self.0.quantity.into()
    }

    /// Net total of this `LineItem` (unit price times quantity).
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LineItem.total",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn total(&self) -> Money {
        self.0.total()
    }
}

/// Ordered quantity of a `Position`.
#[derive(
    AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into,
)]
#[graphql(
    name = "Quantity",
    with = scalar::Via::<domain::line_item::Quantity>,
)]
pub struct Quantity(domain::line_item::Quantity);

/// Monetary totals of a `Contract` or an `Invoice`.
#[derive(Clone, Copy, Debug, GraphQLObject)]
pub struct Totals {
    /// Net sum of all the line items.
    pub net: Money,

    /// VAT on the net sum.
    ///
    /// Zero for reverse charge invoices.
    pub tax: Money,

    /// Net part of the already paid deposit.
    pub deposit_net: Money,

    /// VAT part of the already paid deposit.
    pub deposit_tax: Money,

    /// Amount remaining to be paid.
    pub due: Money,
}

impl From<domain::Totals> for Totals {
    fn from(totals: domain::Totals) -> Self {
        let domain::Totals {
            net,
            tax,
            deposit_net,
            deposit_tax,
            due,
        } = totals;
        Self {
            net,
            tax,
            deposit_net,
            deposit_tax,
            due,
        }
    }
}

/// One ordered line of a `Contract` or an `Invoice` to create.
///
/// Exactly one of `positionId` and `newPosition` must be provided.
#[derive(Clone, Debug, GraphQLInputObject)]
pub struct ItemInput {
    /// ID of an existing catalog `Position`.
    pub position_id: Option<position::Id>,

    /// New `Position` to be added to the catalog alongside.
    pub new_position: Option<position::DraftInput>,

    /// Ordered quantity of the `Position`.
    pub quantity: Quantity,
}

impl ItemInput {
    /// Converts this [`ItemInput`] into a [`command::Item`].
    ///
    /// # Errors
    ///
    /// Errors if not exactly one of `positionId` and `newPosition` is
    /// provided.
    pub fn into_item(self) -> Result<command::Item, Error> {
        let Self {
            position_id,
            new_position,
            quantity,
        } = self;

        let source = match (position_id, new_position) {
            (Some(id), None) => {
                command::PositionSource::Existing(id.into())
            }
            (None, Some(draft)) => {
                command::PositionSource::New(draft.into())
            }
            (Some(_), Some(_)) | (None, None) => {
                return Err(ItemError::AmbiguousPosition.into());
            }
        };

        Ok(command::Item {
            source,
            quantity: quantity.into(),
        })
    }

    /// Converts the provided [`ItemInput`]s into [`command::Item`]s.
    ///
    /// # Errors
    ///
    /// Errors if any of the provided [`ItemInput`]s is invalid.
    pub fn into_items(
        items: Vec<Self>,
    ) -> Result<Vec<command::Item>, Error> {
        items.into_iter().map(Self::into_item).collect()
    }
}

define_error! {
    enum ItemError {
        #[code = "AMBIGUOUS_ITEM_POSITION"]
        #[status = BAD_REQUEST]
        #[message = "Exactly one of `positionId` and `newPosition` must be \
                     provided"]
        AmbiguousPosition,
    }
}
