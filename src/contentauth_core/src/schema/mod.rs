//! Schema remapping: lets a consuming application keep its own table and
//! column names for the seven logical models the host framework persists.
//!
//! A [`SchemaMapping`] is read once at start-up. [`SchemaRemapper`] turns it
//! into a [`ResolvedSchema`]: physical table definitions with foreign keys
//! re-pointed at the renamed targets, the model-name bindings the host uses to
//! address each model, and the user-table binding the email hooks query.

pub mod definition;
pub mod mapping;
pub mod model;
pub mod remapper;
pub mod sql;

pub use definition::{ColumnDef, ColumnType, ForeignKey, OnDelete, TableDef};
pub use mapping::{FieldAttribute, FieldTypeDecl, SchemaMapping, TableMapping};
pub use model::Model;
pub use remapper::{ModelBinding, ResolvedSchema, SchemaError, SchemaRemapper, UserTableBinding};
