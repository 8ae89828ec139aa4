// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property-based tests using proptest.
//!
//! These tests use property-based testing to verify that value conversion and
//! store building handle arbitrary inputs correctly.

use propstore::domain::{
    DeclaredType, NamespaceMap, PropertyDeclaration, PropertyDocument, PropertyStore,
    QualifiedName, TypedValue,
};
use proptest::prelude::*;

fn parse(raw: &str, declared_type: DeclaredType) -> propstore::domain::Result<TypedValue> {
    TypedValue::parse("test", raw, declared_type, &NamespaceMap::new())
}

// Clark notation written by Display parses back to the same name
proptest! {
    #[test]
    fn test_qualified_name_clark_roundtrip(
        namespace in "[a-z]{1,8}://[a-z.]{1,12}(/[a-z0-9]{1,6}){0,3}",
        local in "[A-Za-z_][A-Za-z0-9._-]{0,15}"
    ) {
        let name = QualifiedName::namespaced(namespace.clone(), local.clone());
        let parsed: QualifiedName = name.to_string().parse().unwrap();
        prop_assert_eq!(parsed.namespace(), Some(namespace.as_str()));
        prop_assert_eq!(parsed.local_name(), local.as_str());
        prop_assert_eq!(parsed, name);
    }
}

// Prefixed names resolve to the declared namespace
proptest! {
    #[test]
    fn test_prefixed_name_resolves(
        prefix in "[a-z]{1,6}",
        namespace in "urn:[a-z]{1,10}",
        local in "[a-z][a-z0-9-]{0,10}"
    ) {
        let mut namespaces = NamespaceMap::new();
        namespaces.insert(prefix.clone(), namespace.clone());
        let name = QualifiedName::resolve(&format!("{}:{}", prefix, local), &namespaces).unwrap();
        prop_assert_eq!(name, QualifiedName::namespaced(namespace, local));
    }
}

// Any i64 survives integer conversion, with or without surrounding whitespace
proptest! {
    #[test]
    fn test_any_integer_parses(n in any::<i64>(), pad in "[ \t]{0,3}") {
        let raw = format!("{}{}{}", pad, n, pad);
        let value = parse(&raw, DeclaredType::Integer).unwrap();
        prop_assert_eq!(value.as_i64(), Some(n));
        prop_assert_eq!(value.raw(), raw.as_str());
    }
}

// Negative numbers are never positive integers
proptest! {
    #[test]
    fn test_negative_integers_rejected(n in i64::MIN..0) {
        prop_assert!(parse(&n.to_string(), DeclaredType::PositiveInteger).is_err());
        prop_assert!(parse(&n.to_string(), DeclaredType::NonNegativeInteger).is_err());
    }
}

// Both lexical forms of each boolean are accepted
proptest! {
    #[test]
    fn test_boolean_lexical_forms(b in prop::bool::ANY, numeric in prop::bool::ANY) {
        let raw = match (b, numeric) {
            (true, true) => "1",
            (true, false) => "true",
            (false, true) => "0",
            (false, false) => "false",
        };
        prop_assert_eq!(parse(raw, DeclaredType::Boolean).unwrap().as_bool(), Some(b));
    }
}

// Anything else is a conversion error rather than a silent false
proptest! {
    #[test]
    fn test_other_booleans_rejected(s in "[a-zA-Z]{2,8}") {
        prop_assume!(s != "true" && s != "false");
        prop_assert!(parse(&s, DeclaredType::Boolean).is_err());
    }
}

// String values are kept exactly as written
proptest! {
    #[test]
    fn test_string_values_preserved(s in "\\PC*") {
        let value = parse(&s, DeclaredType::String).unwrap();
        prop_assert_eq!(value.as_str(), Some(s.as_str()));
    }
}

// NMTOKENS splits on any run of whitespace
proptest! {
    #[test]
    fn test_nmtokens_split(
        tokens in prop::collection::vec("[a-z0-9.-]{1,6}", 1..6),
        separator in "[ \t\n]{1,3}"
    ) {
        let raw = tokens.join(&separator);
        let value = parse(&raw, DeclaredType::NmTokens).unwrap();
        prop_assert_eq!(value.as_tokens(), Some(tokens.as_slice()));
    }
}

// A store holds exactly the declared globals, last declaration winning
proptest! {
    #[test]
    fn test_store_contains_declared_globals(
        entries in prop::collection::vec(("[a-z]{1,4}", any::<i64>()), 0..12)
    ) {
        let document = PropertyDocument {
            namespaces: NamespaceMap::new(),
            properties: entries
                .iter()
                .map(|(name, n)| PropertyDeclaration::global(name, "xs:integer", &n.to_string()))
                .collect(),
        };
        let store = PropertyStore::from_document(&document).unwrap();

        let mut expected = std::collections::BTreeMap::new();
        for (name, n) in &entries {
            expected.insert(name.clone(), *n);
        }

        let global = store.global_property_set();
        prop_assert_eq!(global.len(), expected.len());
        for (name, n) in expected {
            prop_assert_eq!(global.get_integer(&name).unwrap(), Some(n));
        }
        prop_assert_eq!(store.owners().count(), 0);
    }
}
