//! SeaORM entity definitions, kept separate from the domain types.

pub mod employee;
pub mod user;
