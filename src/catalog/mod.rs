pub mod items;
pub mod validation;

pub use items::{Catalog, RubricItem};
pub use validation::validate_items;
