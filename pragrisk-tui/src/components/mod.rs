//! Screen components shared by every catalogue entity.
//!
//! Components never await network calls themselves. Operations that talk
//! to the backend return a [`Pending`] future; the event loop spawns it and
//! feeds the result back through the matching `on_*` method.

pub mod catalog;
pub mod delete;
pub mod detail;
pub mod list;
pub mod update;

pub use catalog::CatalogEntity;
pub use delete::{DeleteDialog, DialogOutcome};
pub use detail::DetailComponent;
pub use list::ListComponent;
pub use update::UpdateComponent;

use futures_util::future::BoxFuture;

/// A detached, single-shot backend call.
pub type Pending<T> = BoxFuture<'static, T>;

/// Browser-style history, as used by "back" buttons.
pub trait History {
    fn back(&mut self);
}
