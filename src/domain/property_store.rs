// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immutable snapshot of every property declared by one document.

use crate::domain::document::{PropertyDeclaration, PropertyDocument};
use crate::domain::errors::{PropertyError, Result};
use crate::domain::property_set::PropertySet;
use crate::domain::qualified_name::{NamespaceMap, QualifiedName};
use crate::domain::typed_value::{DeclaredType, TypedValue};
use std::collections::HashMap;
use std::sync::Arc;

/// One global property set plus one property set per owner.
///
/// A store is built in a single pass from a parsed document and never changes
/// afterwards. A new configuration always means a new store. Property sets are
/// handed out as `Arc`s, so a caller holding a set from an older store keeps a
/// consistent view after the registry has moved on.
///
/// When a document repeats a (scope, name) pair, the last declaration wins.
///
/// # Examples
///
/// ```
/// use propstore::domain::{PropertyDeclaration, PropertyDocument, PropertyStore, QualifiedName};
///
/// let mut document = PropertyDocument::default();
/// document.namespaces.insert("oxf".into(), "http://www.orbeon.com/oxf/processors".into());
/// document.properties.push(PropertyDeclaration::global("cache.size", "xs:integer", "200"));
/// document.properties.push(PropertyDeclaration::owned(
///     "oxf:page-flow",
///     "instance-passing",
///     "xs:string",
///     "redirect",
/// ));
///
/// let store = PropertyStore::from_document(&document).unwrap();
/// assert_eq!(store.global_property_set().get_integer("cache.size").unwrap(), Some(200));
///
/// let owner = QualifiedName::namespaced("http://www.orbeon.com/oxf/processors", "page-flow");
/// let set = store.property_set(&owner).unwrap();
/// assert_eq!(set.get_string("instance-passing").unwrap(), Some("redirect"));
/// ```
#[derive(Debug, Default)]
pub struct PropertyStore {
    global: Arc<PropertySet>,
    owners: HashMap<QualifiedName, Arc<PropertySet>>,
}

impl PropertyStore {
    /// Builds a store from a parsed document.
    ///
    /// Any declaration without a name, value or declared type, with an unrecognized
    /// type, or with a value that does not convert fails the whole build.
    pub fn from_document(document: &PropertyDocument) -> Result<Self> {
        let mut global = HashMap::new();
        let mut owners: HashMap<QualifiedName, HashMap<String, TypedValue>> = HashMap::new();

        for (index, declaration) in document.properties.iter().enumerate() {
            let (owner, name, value) =
                Self::resolve_declaration(index, declaration, &document.namespaces)?;

            let scope = match &owner {
                Some(owner) => owners.entry(owner.clone()).or_default(),
                None => &mut global,
            };

            if scope.insert(name.clone(), value).is_some() {
                let scope_name = owner
                    .as_ref()
                    .map_or_else(|| "<global>".to_string(), ToString::to_string);
                tracing::warn!(
                    property = %name,
                    scope = %scope_name,
                    "Duplicate property declaration, last one wins"
                );
            }
        }

        Ok(PropertyStore {
            global: Arc::new(PropertySet::from_map(global)),
            owners: owners
                .into_iter()
                .map(|(owner, set)| (owner, Arc::new(PropertySet::from_map(set))))
                .collect(),
        })
    }

    fn resolve_declaration(
        index: usize,
        declaration: &PropertyDeclaration,
        namespaces: &NamespaceMap,
    ) -> Result<(Option<QualifiedName>, String, TypedValue)> {
        let name = declaration
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                PropertyError::malformed(format!(
                    "Property declaration #{} is missing a name",
                    index + 1
                ))
            })?;

        let raw = declaration.value.as_deref().ok_or_else(|| {
            PropertyError::malformed(format!("Property '{}' is missing a value", name))
        })?;

        let declared_type: DeclaredType = declaration
            .declared_type
            .as_deref()
            .ok_or_else(|| {
                PropertyError::malformed(format!("Property '{}' is missing a declared type", name))
            })?
            .parse()?;

        let owner = declaration
            .owner
            .as_deref()
            .map(|owner| QualifiedName::resolve(owner, namespaces))
            .transpose()?;

        let value = TypedValue::parse(name, raw, declared_type, namespaces)?;
        Ok((owner, name.to_string(), value))
    }

    /// Returns the global property set.
    pub fn global_property_set(&self) -> &Arc<PropertySet> {
        &self.global
    }

    /// Returns the property set of `owner`, or `None` if it declares no properties.
    pub fn property_set(&self, owner: &QualifiedName) -> Option<&Arc<PropertySet>> {
        self.owners.get(owner)
    }

    /// Iterates over the owners that declare at least one property.
    pub fn owners(&self) -> impl Iterator<Item = &QualifiedName> {
        self.owners.keys()
    }
}
