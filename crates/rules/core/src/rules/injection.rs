//! Resolution of `{actor|...}` and `{item|...}` placeholders.
use crate::actor::{ActorSource, ItemSource};

use super::ValidationError;

/// Document properties a rule element may reference.
#[derive(Clone, Copy, Debug)]
pub struct InjectionScope<'a> {
    pub actor: &'a ActorSource,
    pub item: &'a ItemSource,
}

impl<'a> InjectionScope<'a> {
    pub fn new(actor: &'a ActorSource, item: &'a ItemSource) -> Self {
        Self { actor, item }
    }

    fn property(&self, document: &str, property: &str) -> Option<String> {
        match (document, property) {
            ("actor", "id") => Some(self.actor.id.to_string()),
            ("actor", "name") => Some(self.actor.name.clone()),
            ("actor", "level") => Some(self.actor.level.to_string()),
            ("item", "id") => Some(self.item.id.to_string()),
            ("item", "name") => Some(self.item.name.clone()),
            ("item", "slug") => Some(self.item.slug()),
            ("item", "level") => Some(self.item.level.to_string()),
            _ => None,
        }
    }

    /// Replaces every `{document|property}` placeholder in `text`.
    pub fn resolve(&self, text: &str) -> Result<String, ValidationError> {
        let mut resolved = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find('{') {
            resolved.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let Some(end) = after.find('}') else {
                return Err(ValidationError::UnresolvedProperty(rest[start..].to_owned()));
            };
            let reference = &after[..end];
            let value = reference
                .split_once('|')
                .and_then(|(document, property)| self.property(document, property))
                .ok_or_else(|| ValidationError::UnresolvedProperty(reference.to_owned()))?;
            resolved.push_str(&value);
            rest = &after[end + 1..];
        }
        resolved.push_str(rest);
        Ok(resolved)
    }
}
