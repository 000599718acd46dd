//! Reusable widget components.

pub mod detail;
pub mod modal;
pub mod status;

pub use detail::DetailPanel;
pub use modal::{centered, ModalBox};
pub use status::ListStatus;
