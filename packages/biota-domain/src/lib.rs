pub mod filters;
pub mod identifier;
pub mod ordering;
pub mod pagination;
pub mod term;

pub use filters::CatalogFilters;
pub use pagination::{Page, PageWindow};
