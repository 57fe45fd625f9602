//! Project catalog: data model, markup tree and card renderer.
//!
//! The catalog is read once from a JSON document, kept immutable, and
//! projected into markup wholesale. Filtering and search run over the
//! parsed records so the page only toggles visibility.

mod filter;
mod markup;
mod model;
mod render;

pub use filter::{matches_search, select, CategoryFilter};
pub use markup::{Element, Node};
pub use model::{Catalog, CatalogError, Category, Hero, LogEntry, Project, ProjectKind};
pub use render::{
    filter_buttons, format_date, project_grid, render, unable_to_load, RenderedCatalog,
};
