//! Terminal UI components for building small interactive apps with
//! [bubbletea-rs](https://crates.io/crates/bubbletea-rs).
//!
//! Two app-level components ship here, built from smaller reusable
//! parts:
//!
//! - [`clock`]: a circular countdown clock drawn as a segmented dial,
//!   with pause/resume continuity and an editable duration. Built from
//!   [`ticker`] (frame timing), [`dial`] (arc rendering) and
//!   [`textfield`] (input).
//! - [`todo`]: a persistent todo list over a pluggable [`storage`]
//!   backend, with completion flags kept in a separate document so
//!   they survive item removal.
//!
//! Every component follows the Elm architecture used by bubbletea-rs:
//! a model struct, an `update` method fed with `Msg` values, and a
//! `view` method producing a string. Components that emit their own
//! messages carry a unique id so several instances can coexist in one
//! program.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use handy_widgets::{clock, todo};
//! use handy_widgets::storage::MemoryStorage;
//!
//! let countdown = clock::new();
//! let list = todo::new(MemoryStorage::new());
//! println!("{}\n{}", countdown.view(), list.view());
//! ```

pub mod clock;
pub mod dial;
pub mod key;
pub mod storage;
pub mod textfield;
pub mod ticker;
pub mod todo;

use bubbletea_rs::Cmd;

/// Focus handling shared by input-capable components.
pub trait Component {
    /// Gives the component keyboard focus. Returns a command when
    /// gaining focus needs to schedule work.
    fn focus(&mut self) -> Option<Cmd>;

    /// Removes keyboard focus.
    fn blur(&mut self);

    /// Returns whether the component has focus.
    fn focused(&self) -> bool;
}

/// Commonly used types, for glob import in application code.
pub mod prelude {
    pub use crate::clock;
    pub use crate::dial;
    pub use crate::key::Binding;
    pub use crate::storage::{FileStorage, MemoryStorage, Storage, StorageError};
    pub use crate::textfield;
    pub use crate::ticker;
    pub use crate::todo;
    pub use crate::Component;
}
