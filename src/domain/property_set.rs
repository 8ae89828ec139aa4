// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immutable mapping from property name to typed value.

use crate::domain::errors::{PropertyError, Result};
use crate::domain::qualified_name::QualifiedName;
use crate::domain::typed_value::{DeclaredType, TypedValue};
use std::collections::{BTreeSet, HashMap};

/// The resolved properties of one scope, either global or a single owner.
///
/// A `PropertySet` is built once while a store is constructed and never mutated
/// afterwards. The typed getters return `Ok(None)` for a missing property and a
/// `TypeConversionError` when the property exists under a different declared type.
///
/// # Examples
///
/// ```
/// use propstore::domain::{DeclaredType, NamespaceMap, PropertySet, TypedValue};
///
/// let size = TypedValue::parse("cache.size", "200", DeclaredType::Integer, &NamespaceMap::new())
///     .unwrap();
/// let set: PropertySet = vec![("cache.size".to_string(), size)].into_iter().collect();
///
/// assert_eq!(set.get_integer("cache.size").unwrap(), Some(200));
/// assert_eq!(set.get_integer("cache.missing").unwrap(), None);
/// assert!(set.get_string("cache.size").is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertySet {
    properties: HashMap<String, TypedValue>,
}

impl PropertySet {
    pub(crate) fn from_map(properties: HashMap<String, TypedValue>) -> Self {
        PropertySet { properties }
    }

    /// Returns the typed value for `name`, if declared.
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.properties.get(name)
    }

    /// Returns `true` if `name` is declared in this set.
    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Returns the set of declared property names.
    pub fn keys(&self) -> BTreeSet<String> {
        self.properties.keys().cloned().collect()
    }

    /// Returns the declared names starting with `prefix`, in sorted order.
    pub fn names_with_prefix(&self, prefix: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .properties
            .keys()
            .map(String::as_str)
            .filter(|name| name.starts_with(prefix))
            .collect();
        names.sort_unstable();
        names
    }

    /// Iterates over all (name, value) pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if the set holds no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Returns a `string`, `NCName` or `anyURI` property.
    pub fn get_string(&self, name: &str) -> Result<Option<&str>> {
        self.typed(name, "xs:string", TypedValue::as_str)
    }

    /// Returns an integer property of any integer type.
    pub fn get_integer(&self, name: &str) -> Result<Option<i64>> {
        self.typed(name, "xs:integer", TypedValue::as_i64)
    }

    /// Returns a boolean property.
    pub fn get_boolean(&self, name: &str) -> Result<Option<bool>> {
        self.typed(name, "xs:boolean", TypedValue::as_bool)
    }

    /// Returns a `double` or `decimal` property.
    pub fn get_double(&self, name: &str) -> Result<Option<f64>> {
        self.typed(name, "xs:double", TypedValue::as_f64)
    }

    /// Returns a `QName` property.
    pub fn get_qname(&self, name: &str) -> Result<Option<&QualifiedName>> {
        self.typed(name, "xs:QName", TypedValue::as_qname)
    }

    /// Returns the tokens of an `NMTOKENS` property.
    pub fn get_tokens(&self, name: &str) -> Result<Option<&[String]>> {
        self.typed(name, "xs:NMTOKENS", TypedValue::as_tokens)
    }

    /// Returns a string property, or `default` if it is missing or mistyped.
    pub fn get_string_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get_string(name).ok().flatten().unwrap_or(default)
    }

    /// Returns an integer property, or `default` if it is missing or mistyped.
    pub fn get_integer_or(&self, name: &str, default: i64) -> i64 {
        self.get_integer(name).ok().flatten().unwrap_or(default)
    }

    /// Returns a boolean property, or `default` if it is missing or mistyped.
    pub fn get_boolean_or(&self, name: &str, default: bool) -> bool {
        self.get_boolean(name).ok().flatten().unwrap_or(default)
    }

    /// Returns a double property, or `default` if it is missing or mistyped.
    pub fn get_double_or(&self, name: &str, default: f64) -> f64 {
        self.get_double(name).ok().flatten().unwrap_or(default)
    }

    fn typed<'a, T>(
        &'a self,
        name: &str,
        requested: &str,
        extract: impl FnOnce(&'a TypedValue) -> Option<T>,
    ) -> Result<Option<T>> {
        match self.properties.get(name) {
            None => Ok(None),
            Some(value) => {
                let declared = value.declared_type();
                extract(value).map(Some).ok_or_else(|| mismatch(name, requested, declared))
            }
        }
    }
}

fn mismatch(name: &str, requested: &str, declared: DeclaredType) -> PropertyError {
    PropertyError::conversion(
        name,
        requested,
        format!("property is declared as {}", declared),
    )
}

impl FromIterator<(String, TypedValue)> for PropertySet {
    fn from_iter<I: IntoIterator<Item = (String, TypedValue)>>(iter: I) -> Self {
        PropertySet {
            properties: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::qualified_name::NamespaceMap;

    fn value(name: &str, raw: &str, declared_type: DeclaredType) -> (String, TypedValue) {
        (
            name.to_string(),
            TypedValue::parse(name, raw, declared_type, &NamespaceMap::new()).unwrap(),
        )
    }

    fn sample() -> PropertySet {
        vec![
            value("oxf.cache.size", "200", DeclaredType::Integer),
            value("oxf.cache.enabled", "true", DeclaredType::Boolean),
            value("oxf.http.proxy", "http://proxy:3128", DeclaredType::AnyUri),
            value("ratio", "0.75", DeclaredType::Double),
            value("methods", "get post", DeclaredType::NmTokens),
            value("mode", "redirect", DeclaredType::String),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_typed_getters() {
        let set = sample();
        assert_eq!(set.get_integer("oxf.cache.size").unwrap(), Some(200));
        assert_eq!(set.get_boolean("oxf.cache.enabled").unwrap(), Some(true));
        assert_eq!(set.get_string("oxf.http.proxy").unwrap(), Some("http://proxy:3128"));
        assert_eq!(set.get_double("ratio").unwrap(), Some(0.75));
        assert_eq!(
            set.get_tokens("methods").unwrap(),
            Some(&["get".to_string(), "post".to_string()][..])
        );
        assert_eq!(set.get_string("mode").unwrap(), Some("redirect"));
    }

    #[test]
    fn test_missing_property_is_none() {
        let set = sample();
        assert_eq!(set.get_integer("nope").unwrap(), None);
        assert!(set.get("nope").is_none());
        assert!(!set.contains("nope"));
    }

    #[test]
    fn test_type_mismatch_is_error() {
        let set = sample();
        let err = set.get_boolean("oxf.cache.size").unwrap_err();
        assert!(matches!(err, PropertyError::TypeConversionError { .. }));
        assert!(err.to_string().contains("xs:integer"));
    }

    #[test]
    fn test_defaults() {
        let set = sample();
        assert_eq!(set.get_integer_or("oxf.cache.size", 10), 200);
        assert_eq!(set.get_integer_or("missing", 10), 10);
        assert_eq!(set.get_integer_or("mode", 10), 10);
        assert_eq!(set.get_string_or("missing", "fallback"), "fallback");
        assert!(!set.get_boolean_or("missing", false));
        assert_eq!(set.get_double_or("missing", 1.5), 1.5);
    }

    #[test]
    fn test_keys_and_prefix() {
        let set = sample();
        assert_eq!(set.len(), 6);
        assert!(!set.is_empty());
        assert!(set.keys().contains("ratio"));
        assert_eq!(
            set.names_with_prefix("oxf.cache."),
            vec!["oxf.cache.enabled", "oxf.cache.size"]
        );
        assert_eq!(set.iter().count(), 6);
    }

    #[test]
    fn test_empty_set() {
        let set = PropertySet::default();
        assert!(set.is_empty());
        assert!(set.keys().is_empty());
    }
}
