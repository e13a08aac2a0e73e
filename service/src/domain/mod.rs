//! Domain definitions.

pub mod contract;
pub mod customer;
pub mod invoice;
pub mod line_item;
pub mod position;
pub mod totals;

pub use self::{
    contract::Contract, customer::Customer, invoice::Invoice,
    line_item::LineItem, position::Position, totals::Totals,
};
