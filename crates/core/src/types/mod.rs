//! Core types for Recipe Finder.
//!
//! This module provides type-safe wrappers for the domain concepts that
//! cross the boundary between the internal REST API and the views.

pub mod date;
pub mod id;
pub mod image;
pub mod pagination;
pub mod recipe;

pub use date::format_date;
pub use id::*;
pub use image::normalize_s3_image_url;
pub use pagination::{PaginationQuery, RawPaginationQuery, RawParam};
pub use recipe::{ExtendedRecipe, PublicUser, Recipe, RecipeList, RecipeUser};
