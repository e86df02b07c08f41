//! Field-kind registry
//!
//! Maps a field-kind identifier (the name a content definition uses, e.g.
//! `"TextField"`) to a [`FieldKindDescriptor`]: the schema type and
//! description of the field, the stored kind to look instances up by, and the
//! accessor that extracts the canonical value from an instance.
//!
//! A registry is assembled once through [`FieldKindRegistryBuilder`] and is
//! read-only afterwards. The process-wide instance lives behind a
//! single-initialization cell, so readers need no locking.

use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::OnceCell;
use tracing::{debug, trace};

use crate::config::FieldsConfig;
use crate::error::{FieldsError, Result};
use crate::kind::FieldKind;
use crate::types::{FieldInstance, FieldValue, SchemaType};

/// Extracts the canonical value from a located field instance.
pub type FieldAccessor = fn(&FieldInstance) -> FieldValue;

/// Schema shape and value extraction for one field kind identifier.
#[derive(Debug, Clone)]
pub struct FieldKindDescriptor {
    /// Identifier content definitions use to name this kind
    pub identifier: Cow<'static, str>,
    /// Human-readable description placed on generated schema fields
    pub description: Cow<'static, str>,
    pub schema_type: SchemaType,
    /// Stored kind used to locate instances on content nodes
    pub kind: FieldKind,
    pub accessor: FieldAccessor,
}

impl FieldKindDescriptor {
    /// Descriptor that extracts the kind's canonical value.
    pub fn new(
        identifier: impl Into<Cow<'static, str>>,
        description: impl Into<Cow<'static, str>>,
        schema_type: SchemaType,
        kind: FieldKind,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            description: description.into(),
            schema_type,
            kind,
            accessor: canonical_value,
        }
    }

    /// Replace the accessor.
    pub fn with_accessor(mut self, accessor: FieldAccessor) -> Self {
        self.accessor = accessor;
        self
    }

    /// Apply the accessor to a located instance.
    pub fn extract(&self, instance: &FieldInstance) -> FieldValue {
        (self.accessor)(instance)
    }
}

/// `.value` for scalar kinds, `.text` for text, `.values` for multi-text.
pub fn canonical_value(instance: &FieldInstance) -> FieldValue {
    match instance {
        FieldInstance::Boolean(field) => field.value.into(),
        FieldInstance::Date(field) => field.value.into(),
        FieldInstance::DateTime(field) => field.value.into(),
        FieldInstance::Numeric(field) => field.value.into(),
        FieldInstance::Text(field) => field.text.clone().into(),
        FieldInstance::Time(field) => field.value.into(),
        FieldInstance::MultiText(field) => field.values.clone().into(),
    }
}

/// Descriptors registered by [`FieldKindRegistry::builtin`].
pub const BUILTIN_KINDS: &[FieldKindDescriptor] = &[
    FieldKindDescriptor {
        identifier: Cow::Borrowed("BooleanField"),
        description: Cow::Borrowed("Boolean field"),
        schema_type: SchemaType::Boolean,
        kind: FieldKind::Boolean,
        accessor: canonical_value,
    },
    FieldKindDescriptor {
        identifier: Cow::Borrowed("DateField"),
        description: Cow::Borrowed("Date field"),
        schema_type: SchemaType::Date,
        kind: FieldKind::Date,
        accessor: canonical_value,
    },
    FieldKindDescriptor {
        identifier: Cow::Borrowed("DateTimeField"),
        description: Cow::Borrowed("Date & time field"),
        schema_type: SchemaType::DateTime,
        kind: FieldKind::DateTime,
        accessor: canonical_value,
    },
    FieldKindDescriptor {
        identifier: Cow::Borrowed("NumericField"),
        description: Cow::Borrowed("Numeric field"),
        schema_type: SchemaType::Decimal,
        kind: FieldKind::Numeric,
        accessor: canonical_value,
    },
    FieldKindDescriptor {
        identifier: Cow::Borrowed("TextField"),
        description: Cow::Borrowed("Text field"),
        schema_type: SchemaType::String,
        kind: FieldKind::Text,
        accessor: canonical_value,
    },
    FieldKindDescriptor {
        identifier: Cow::Borrowed("TimeField"),
        description: Cow::Borrowed("Time field"),
        schema_type: SchemaType::TimeSpan,
        kind: FieldKind::Time,
        accessor: canonical_value,
    },
    FieldKindDescriptor {
        identifier: Cow::Borrowed("MultiTextField"),
        description: Cow::Borrowed("Multi text field"),
        schema_type: SchemaType::List(&SchemaType::String),
        kind: FieldKind::MultiText,
        accessor: canonical_value,
    },
];

static GLOBAL: OnceCell<FieldKindRegistry> = OnceCell::new();

/// Immutable mapping from kind identifier to descriptor.
#[derive(Debug, Clone, Default)]
pub struct FieldKindRegistry {
    by_identifier: HashMap<String, FieldKindDescriptor>,
}

impl FieldKindRegistry {
    /// Start assembling a registry.
    pub fn builder() -> FieldKindRegistryBuilder {
        FieldKindRegistryBuilder::default()
    }

    /// Registry holding exactly [`BUILTIN_KINDS`].
    pub fn builtin() -> Self {
        let by_identifier = BUILTIN_KINDS
            .iter()
            .map(|descriptor| (descriptor.identifier.to_string(), descriptor.clone()))
            .collect();
        Self { by_identifier }
    }

    /// The process-wide registry. Initialized to [`FieldKindRegistry::builtin`]
    /// on first access unless [`FieldKindRegistry::install`] ran earlier.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(|| {
            let registry = Self::builtin();
            debug!(kinds = registry.len(), "builtin field kind registry initialized");
            registry
        })
    }

    /// Make `registry` the process-wide registry. Fails once the global
    /// registry has been installed or read.
    pub fn install(registry: Self) -> Result<&'static Self> {
        let kinds = registry.len();
        let installed = GLOBAL
            .try_insert(registry)
            .map_err(|_| FieldsError::AlreadyInstalled)?;
        debug!(kinds, "field kind registry installed");
        Ok(installed)
    }

    /// Exact, case-sensitive lookup by kind identifier.
    pub fn lookup(&self, identifier: &str) -> Option<&FieldKindDescriptor> {
        self.by_identifier.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.by_identifier.contains_key(identifier)
    }

    /// Registered identifiers, sorted.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut identifiers: Vec<&str> = self.by_identifier.keys().map(String::as_str).collect();
        identifiers.sort_unstable();
        identifiers
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &FieldKindDescriptor> + '_ {
        self.by_identifier.values()
    }

    pub fn len(&self) -> usize {
        self.by_identifier.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_identifier.is_empty()
    }
}

/// Builder for [`FieldKindRegistry`]. Created by [`FieldKindRegistry::builder`].
#[derive(Debug, Default)]
pub struct FieldKindRegistryBuilder {
    by_identifier: HashMap<String, FieldKindDescriptor>,
}

impl FieldKindRegistryBuilder {
    /// Register one descriptor. An identifier can only be registered once.
    pub fn register(mut self, descriptor: FieldKindDescriptor) -> Result<Self> {
        let identifier = descriptor.identifier.to_string();
        if self.by_identifier.contains_key(&identifier) {
            return Err(FieldsError::DuplicateRegistration { identifier });
        }
        trace!(%identifier, kind = %descriptor.kind, "registered field kind");
        self.by_identifier.insert(identifier, descriptor);
        Ok(self)
    }

    /// Register every descriptor in [`BUILTIN_KINDS`].
    pub fn with_builtins(self) -> Result<Self> {
        BUILTIN_KINDS
            .iter()
            .cloned()
            .try_fold(self, |builder, descriptor| builder.register(descriptor))
    }

    /// Apply disabled kinds and description overrides from configuration.
    pub fn configure(mut self, config: &FieldsConfig) -> Result<Self> {
        for identifier in &config.disabled_kinds {
            if self.by_identifier.remove(identifier).is_none() {
                return Err(FieldsError::UnknownKindInConfig {
                    identifier: identifier.clone(),
                });
            }
            debug!(%identifier, "field kind disabled by configuration");
        }

        for (identifier, description) in &config.descriptions {
            let descriptor = self.by_identifier.get_mut(identifier).ok_or_else(|| {
                FieldsError::UnknownKindInConfig {
                    identifier: identifier.clone(),
                }
            })?;
            descriptor.description = Cow::Owned(description.clone());
        }

        Ok(self)
    }

    /// Finish; the result is never modified again.
    pub fn build(self) -> FieldKindRegistry {
        debug!(kinds = self.by_identifier.len(), "field kind registry built");
        FieldKindRegistry {
            by_identifier: self.by_identifier,
        }
    }
}
