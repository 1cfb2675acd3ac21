//! Typed per-entity annotations.

use std::collections::BTreeMap;

/// Payload kinds allowed in the open part of an [`Attributes`] set.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Linear RGBA
    Color([f32; 4]),
}

/// Caller metadata attached to a vertex, point or contour.
///
/// The common keys are plain fields; anything else goes into `custom`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    /// Group-local material slot, resolved to an engine id at export time.
    pub material_slot: Option<usize>,
    pub label: Option<String>,
    pub custom: BTreeMap<String, AttributeValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_material_slot(mut self, slot: usize) -> Self {
        self.material_slot = Some(slot);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: AttributeValue) -> Option<AttributeValue> {
        self.custom.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.custom.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<AttributeValue> {
        self.custom.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.material_slot.is_none() && self.label.is_none() && self.custom.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_fields() {
        let attrs = Attributes::new().with_material_slot(2).with_label("outer");
        assert_eq!(attrs.material_slot, Some(2));
        assert_eq!(attrs.label.as_deref(), Some("outer"));
        assert!(!attrs.is_empty());
    }

    #[test]
    fn test_custom_values() {
        let mut attrs = Attributes::new();
        assert!(attrs.is_empty());

        attrs.set("weight", AttributeValue::Float(0.5));
        let previous = attrs.set("weight", AttributeValue::Int(3));
        assert_eq!(previous, Some(AttributeValue::Float(0.5)));
        assert_eq!(attrs.get("weight"), Some(&AttributeValue::Int(3)));

        attrs.remove("weight");
        assert!(attrs.get("weight").is_none());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut a = Attributes::new();
        a.set("tag", AttributeValue::Text("a".into()));
        let mut b = a.clone();
        b.set("tag", AttributeValue::Text("b".into()));
        assert_eq!(a.get("tag"), Some(&AttributeValue::Text("a".into())));
    }
}
