//! Schema field builder for content part fields.
//!
//! [`ContentFieldsProvider::build_field`] turns one declared content field into
//! a [`SchemaField`] whose resolver finds the field's value on a content
//! instance, whether the owning part is stored as its own container or has
//! been collapsed onto the root.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::ContentElement;
use crate::registry::{FieldKindDescriptor, FieldKindRegistry};
use crate::types::{FieldInstance, FieldValue, SchemaType};

/// One declared field slot on a content part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPartFieldDefinition {
    /// Field name, unique within its part
    pub name: String,
    /// Field kind identifier, e.g. `"TextField"`
    pub field_kind: String,
    /// Name of the part that owns the field
    pub part_name: String,
}

impl ContentPartFieldDefinition {
    pub fn new(
        name: impl Into<String>,
        field_kind: impl Into<String>,
        part_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            field_kind: field_kind.into(),
            part_name: part_name.into(),
        }
    }
}

/// Produces a field's value for one content instance.
pub type FieldResolver = Arc<dyn Fn(&dyn ContentElement) -> Option<FieldValue> + Send + Sync>;

/// A schema field: its type and description plus the resolver bound to it.
#[derive(Clone)]
pub struct SchemaField {
    pub name: String,
    pub description: String,
    pub schema_type: SchemaType,
    resolver: FieldResolver,
}

impl SchemaField {
    /// Resolve this field's value on `source`. `None` means the content
    /// instance carries no such field.
    pub fn resolve(&self, source: &dyn ContentElement) -> Option<FieldValue> {
        (self.resolver)(source)
    }

    /// The bound resolver, for registration with a query engine.
    pub fn resolver(&self) -> FieldResolver {
        Arc::clone(&self.resolver)
    }
}

impl fmt::Debug for SchemaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaField")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("schema_type", &self.schema_type)
            .finish_non_exhaustive()
    }
}

/// Supplies schema fields for declared content fields.
pub trait ContentFieldProvider {
    /// Schema field for `definition`, or `None` when its kind has no schema
    /// representation and the field should be left out.
    fn get_field(&self, definition: &ContentPartFieldDefinition) -> Option<SchemaField>;
}

/// [`ContentFieldProvider`] backed by a [`FieldKindRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct ContentFieldsProvider<'a> {
    registry: &'a FieldKindRegistry,
}

impl ContentFieldsProvider<'static> {
    /// Provider over the process-wide registry.
    pub fn global() -> Self {
        Self::new(FieldKindRegistry::global())
    }
}

impl Default for ContentFieldsProvider<'static> {
    fn default() -> Self {
        Self::global()
    }
}

impl<'a> ContentFieldsProvider<'a> {
    pub fn new(registry: &'a FieldKindRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a FieldKindRegistry {
        self.registry
    }

    /// Build the schema field for `definition`, if its kind is registered.
    pub fn build_field(&self, definition: &ContentPartFieldDefinition) -> Option<SchemaField> {
        let Some(descriptor) = self.registry.lookup(&definition.field_kind) else {
            debug!(
                field = %definition.name,
                part = %definition.part_name,
                kind = %definition.field_kind,
                "no schema representation for field kind"
            );
            return None;
        };

        let descriptor = descriptor.clone();
        let field_name = definition.name.clone();
        let part_name = definition.part_name.clone();
        let schema_field = SchemaField {
            name: definition.name.clone(),
            description: descriptor.description.to_string(),
            schema_type: descriptor.schema_type,
            resolver: Arc::new(move |source: &dyn ContentElement| {
                let instance = locate_field(source, &descriptor, &part_name, &field_name)?;
                Some(descriptor.extract(&instance))
            }),
        };
        Some(schema_field)
    }

    /// Build every representable field, in order, skipping unknown kinds.
    pub fn build_fields<'d>(
        &self,
        definitions: impl IntoIterator<Item = &'d ContentPartFieldDefinition>,
    ) -> Vec<SchemaField> {
        definitions
            .into_iter()
            .filter_map(|definition| self.build_field(definition))
            .collect()
    }
}

impl ContentFieldProvider for ContentFieldsProvider<'_> {
    fn get_field(&self, definition: &ContentPartFieldDefinition) -> Option<SchemaField> {
        self.build_field(definition)
    }
}

/// Find the field instance on `source`, tolerating a collapsed part.
///
/// 1. Look up the owning part on `source`.
/// 2. If the part is missing it was collapsed, so search `source` itself.
/// 3. Look the field up on that container.
/// 4. If a distinct part container lacked the field, retry on `source`.
fn locate_field(
    source: &dyn ContentElement,
    descriptor: &FieldKindDescriptor,
    part_name: &str,
    field_name: &str,
) -> Option<FieldInstance> {
    let (container, collapsed) = match source.part(part_name) {
        Some(part) => (part, false),
        None => (source, true),
    };

    let mut instance = container.field(descriptor.kind, field_name);

    // TODO: confirm whether a field may legitimately live on the root while a
    // same-named part exists; if not, drop this second pass.
    if instance.is_none() && !collapsed {
        instance = source.field(descriptor.kind, field_name);
    }

    instance
}
