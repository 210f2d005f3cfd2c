//! Todo list: persistent store and interactive list component.
//!
//! The store side ([`store::Store`]) keeps items and their completion
//! flags in two separately keyed documents behind a [`crate::storage::Storage`]
//! backend. The component side ([`model::Model`]) wires the store to a
//! cursor-driven list view with a text field for adding items.

pub mod model;
pub mod store;

pub use model::{new, Model};
pub use store::{Store, Todo};
