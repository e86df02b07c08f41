//! Content instance graph as seen by field resolvers.
//!
//! [`ContentElement`] is the lookup interface the resolver consumes; the
//! content store owns the actual nodes. A JSON object implements it directly:
//! parts are nested objects keyed by part name, fields are objects keyed by
//! field name. A collapsed part simply has its fields on the root object.
//!
//! ```text
//! { "BlogPost": { "Subtitle": { "Text": "Hello" } } }   // expanded
//! { "Subtitle": { "Text": "Hello" } }                   // collapsed
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::kind::FieldKind;
use crate::types::FieldInstance;

/// A node in a content instance graph. Roots and parts share this interface.
pub trait ContentElement {
    /// Child part container named `name`, if this node has one.
    fn part(&self, name: &str) -> Option<&dyn ContentElement>;

    /// Field instance named `name`, interpreted as `kind`, local to this node.
    fn field(&self, kind: FieldKind, name: &str) -> Option<FieldInstance>;
}

impl ContentElement for Map<String, Value> {
    fn part(&self, name: &str) -> Option<&dyn ContentElement> {
        self.get(name)?
            .as_object()
            .map(|part| part as &dyn ContentElement)
    }

    fn field(&self, kind: FieldKind, name: &str) -> Option<FieldInstance> {
        let stored = self.get(name)?;
        if !stored.is_object() {
            return None;
        }
        match FieldInstance::from_json(kind, stored) {
            Ok(instance) => Some(instance),
            Err(e) => {
                warn!(field = %name, %kind, %e, "stored field does not match its kind");
                None
            }
        }
    }
}

/// A content item: the root node of one content instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContentItem {
    pub content_item_id: String,
    pub content_type: String,
    #[serde(default)]
    pub content: Map<String, Value>,
}

impl ContentItem {
    pub fn new(
        content_item_id: impl Into<String>,
        content_type: impl Into<String>,
        content: Map<String, Value>,
    ) -> Self {
        Self {
            content_item_id: content_item_id.into(),
            content_type: content_type.into(),
            content,
        }
    }
}

impl ContentElement for ContentItem {
    fn part(&self, name: &str) -> Option<&dyn ContentElement> {
        self.content.part(name)
    }

    fn field(&self, kind: FieldKind, name: &str) -> Option<FieldInstance> {
        self.content.field(kind, name)
    }
}
