//! Content field kinds for a typed query schema
//!
//! `contentql-fields` bridges user-definable content fields to a statically
//! typed query schema. Content types are composed at runtime of named parts,
//! each holding named fields whose kind comes from configuration. This crate
//! answers two questions for one declared field:
//!
//! - what schema type and description does it get, and
//! - what is its value on a given content instance.
//!
//! # Architecture
//!
//! - **Registry**: [`FieldKindRegistry`] maps kind identifiers to immutable
//!   [`FieldKindDescriptor`]s; built once, read-only afterwards
//! - **Provider**: [`ContentFieldsProvider`] builds a [`SchemaField`] per
//!   declared field, with a resolver bound to the field's descriptor
//! - **Collapsed parts**: resolvers find a field whether its part is stored
//!   as a container or folded onto the content root
//! - **Absence is not an error**: unknown kinds build no field, missing
//!   values resolve to `None`

pub mod config;
pub mod content;
pub mod error;
pub mod kind;
pub mod migrations;
pub mod provider;
pub mod registry;
pub mod timespan;
pub mod types;

pub use config::FieldsConfig;
pub use content::{ContentElement, ContentItem};
pub use error::{FieldsError, Result};
pub use kind::FieldKind;
pub use migrations::{MigrationContext, RecipeMigration, RecipeMigrator, RecipeStep};
pub use provider::{
    ContentFieldProvider, ContentFieldsProvider, ContentPartFieldDefinition, FieldResolver,
    SchemaField,
};
pub use registry::{
    canonical_value, FieldAccessor, FieldKindDescriptor, FieldKindRegistry,
    FieldKindRegistryBuilder, BUILTIN_KINDS,
};
pub use timespan::TimeSpan;
pub use types::{FieldInstance, FieldValue, SchemaType};
