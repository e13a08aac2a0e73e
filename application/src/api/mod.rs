//! GraphQL API definitions.

pub mod contract;
pub mod customer;
pub mod invoice;
pub mod item;
mod mutation;
pub mod position;
mod query;
pub mod scalar;

use crate::Context;

pub use self::{
    contract::Contract,
    customer::Customer,
    invoice::Invoice,
    item::{ItemInput, LineItem, Totals},
    mutation::Mutation,
    position::Position,
    query::Query,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<
    'static,
    Query,
    Mutation,
    juniper::EmptySubscription<Context>,
>;
