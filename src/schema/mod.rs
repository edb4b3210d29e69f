//! Editor-facing view of a parsed FGD document.
//!
//! This module turns parser output into what a level editor needs: an owned
//! [`Schema`] to look classes up in, one [`FieldDef`] per editable attribute
//! with its kind resolved once, [`EntityInstance`]s holding edited values,
//! and a [`SchemaStore`] that swaps loaded schemas atomically.

mod field;
mod instance;
mod registry;
mod store;
mod types;
mod validate;

pub use field::FieldDef;
pub use instance::EntityInstance;
pub use registry::{ClassOption, Schema};
pub use store::SchemaStore;
pub use types::*;
pub use validate::validate_schema;
