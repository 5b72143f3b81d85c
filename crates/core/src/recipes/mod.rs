//! Keeping a viewer's recipe list consistent with the REST API.
//!
//! - [`shape`] turns raw API records into viewer-relative [`ExtendedRecipe`]s.
//! - [`reconcile`] folds a single mutation result into a held list so the
//!   view can update without refetching.
//!
//! [`ExtendedRecipe`]: crate::types::ExtendedRecipe

mod reconcile;
mod shape;

pub use reconcile::reconcile;
pub use shape::{shape, shape_one};
