//! Client-side state containers for the design workspace.
//!
//! Every slice of cross-component state lives in its own [`store::Store`].
//! The stores are owned by an [`AppStores`] composition root and handed to
//! consumers by clone; mutation only happens through each store's methods.

pub mod album;
pub mod alert;
pub mod app;
pub mod dialog;
pub mod generation;
pub mod model_options;
pub mod models;
pub mod store;

pub use app::AppStores;
