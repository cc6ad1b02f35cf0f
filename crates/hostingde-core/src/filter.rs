//! Filter expressions for the provider's find endpoints
//!
//! Every `*Find` call takes a filter tree built from field/value leaves joined
//! by AND/OR connectives. On the wire a leaf is
//! `{"field": .., "value": .., "relation"?: ..}` and a connective is
//! `{"subFilterConnective": "AND"|"OR", "subFilter": [..]}`.

use crate::domain::relative_name;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Field names understood by the DNS find endpoints
pub mod fields {
    pub const RECORD_NAME: &str = "RecordName";
    pub const RECORD_TYPE: &str = "RecordType";
    pub const RECORD_CONTENT: &str = "RecordContent";
    pub const ZONE_NAME: &str = "ZoneName";
    pub const ZONE_NAME_UNICODE: &str = "ZoneNameUnicode";
    pub const ZONE_CONFIG_ID: &str = "ZoneConfigId";
}

/// Comparison applied by a leaf; the provider defaults to `equal`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Equal,
    Unequal,
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Equal => "equal",
            Relation::Unequal => "unequal",
            Relation::Greater => "greater",
            Relation::Less => "less",
            Relation::GreaterEqual => "greaterEqual",
            Relation::LessEqual => "lessEqual",
        }
    }
}

/// Boolean connective joining sub filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

/// A filter expression tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// A single field comparison
    Leaf {
        field: String,
        value: String,
        relation: Option<Relation>,
    },
    /// Sub filters joined by AND or OR
    Connective {
        kind: Connective,
        children: Vec<Filter>,
    },
}

impl Filter {
    /// A leaf with an explicit relation
    pub fn leaf(field: impl Into<String>, value: impl Into<String>, relation: Option<Relation>) -> Self {
        Filter::Leaf {
            field: field.into(),
            value: value.into(),
            relation,
        }
    }

    /// A leaf using the provider's default relation
    pub fn field(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::leaf(field, value, None)
    }

    /// AND of all children
    pub fn and(children: Vec<Filter>) -> Self {
        Filter::Connective {
            kind: Connective::And,
            children,
        }
    }

    /// OR of all children
    pub fn or(children: Vec<Filter>) -> Self {
        Filter::Connective {
            kind: Connective::Or,
            children,
        }
    }

    /// Combine with another filter using AND
    ///
    /// An existing AND connective is extended in place rather than nested.
    pub fn and_with(self, other: Filter) -> Self {
        self.join(Connective::And, other)
    }

    /// Combine with another filter using OR
    ///
    /// An existing OR connective is extended in place rather than nested.
    pub fn or_with(self, other: Filter) -> Self {
        self.join(Connective::Or, other)
    }

    fn join(self, kind: Connective, other: Filter) -> Self {
        match self {
            Filter::Connective {
                kind: existing,
                mut children,
            } if existing == kind => {
                children.push(other);
                Filter::Connective { kind, children }
            }
            filter => Filter::Connective {
                kind,
                children: vec![filter, other],
            },
        }
    }

    /// Filter for records by name, optionally narrowed by type and content
    pub fn record(name: &str, record_type: Option<&str>, content: Option<&str>) -> Self {
        let mut children = vec![Filter::field(fields::RECORD_NAME, relative_name(name))];
        if let Some(record_type) = record_type {
            children.push(Filter::field(fields::RECORD_TYPE, record_type));
        }
        if let Some(content) = content {
            children.push(Filter::field(fields::RECORD_CONTENT, content));
        }
        Filter::and(children)
    }

    /// OR filter matching zones whose unicode name is any of `domains`
    pub fn zone_domain_list<S: AsRef<str>>(domains: &[S]) -> Self {
        Filter::or(
            domains
                .iter()
                .map(|domain| Filter::field(fields::ZONE_NAME_UNICODE, domain.as_ref()))
                .collect(),
        )
    }

    /// Filter for a single zone by unicode name
    pub fn zone_name(name: &str) -> Self {
        Filter::field(fields::ZONE_NAME_UNICODE, name)
    }

    /// Wire representation as a JSON value
    pub fn to_value(&self) -> serde_json::Value {
        // Serializing plain strings into a Value cannot fail
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Filter::Leaf {
                field,
                value,
                relation,
            } => {
                let len = if relation.is_some() { 3 } else { 2 };
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("field", field)?;
                map.serialize_entry("value", value)?;
                if let Some(relation) = relation {
                    map.serialize_entry("relation", relation.as_str())?;
                }
                map.end()
            }
            // A connective with a single child is the child itself
            Filter::Connective { children, .. } if children.len() == 1 => {
                children[0].serialize(serializer)
            }
            Filter::Connective { children, .. } if children.is_empty() => {
                serializer.serialize_map(Some(0))?.end()
            }
            Filter::Connective { kind, children } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("subFilterConnective", kind.as_str())?;
                map.serialize_entry("subFilter", children)?;
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn leaf_without_relation() {
        let filter = Filter::field("RecordName", "x.example.org");
        assert_eq!(
            filter.to_value(),
            json!({"field": "RecordName", "value": "x.example.org"})
        );
    }

    #[test]
    fn leaf_with_relation() {
        let filter = Filter::leaf("RecordTtl", "300", Some(Relation::GreaterEqual));
        assert_eq!(
            filter.to_value(),
            json!({"field": "RecordTtl", "value": "300", "relation": "greaterEqual"})
        );
    }

    #[test]
    fn record_filter_with_all_parts() {
        let filter = Filter::record("x.example.org", Some("TXT"), Some("\"token\""));
        assert_eq!(
            filter.to_value(),
            json!({
                "subFilterConnective": "AND",
                "subFilter": [
                    {"field": "RecordName", "value": "x.example.org"},
                    {"field": "RecordType", "value": "TXT"},
                    {"field": "RecordContent", "value": "\"token\""},
                ]
            })
        );
    }

    #[test]
    fn record_filter_name_only_collapses() {
        let filter = Filter::record("x.example.org", None, None);
        assert_eq!(
            filter.to_value(),
            json!({"field": "RecordName", "value": "x.example.org"})
        );
    }

    #[test]
    fn zone_domain_list_is_or_of_unicode_names() {
        let filter = Filter::zone_domain_list(&["demo.example.org", "example.org"]);
        assert_eq!(
            filter.to_value(),
            json!({
                "subFilterConnective": "OR",
                "subFilter": [
                    {"field": "ZoneNameUnicode", "value": "demo.example.org"},
                    {"field": "ZoneNameUnicode", "value": "example.org"},
                ]
            })
        );
    }

    #[test]
    fn empty_connective_serializes_to_empty_object() {
        let domains: [&str; 0] = [];
        assert_eq!(Filter::zone_domain_list(&domains).to_value(), json!({}));
    }

    #[test]
    fn chaining_extends_same_connective() {
        let filter = Filter::field("ZoneName", "a.org")
            .or_with(Filter::field("ZoneName", "b.org"))
            .or_with(Filter::field("ZoneName", "c.org"));

        match &filter {
            Filter::Connective { kind, children } => {
                assert_eq!(*kind, Connective::Or);
                assert_eq!(children.len(), 3);
            }
            other => panic!("expected connective, got {:?}", other),
        }
    }

    #[test]
    fn chaining_different_connective_nests() {
        let filter = Filter::or(vec![
            Filter::field("ZoneName", "a.org"),
            Filter::field("ZoneName", "b.org"),
        ])
        .and_with(Filter::field("ZoneType", "NATIVE"));

        assert_eq!(
            filter.to_value(),
            json!({
                "subFilterConnective": "AND",
                "subFilter": [
                    {
                        "subFilterConnective": "OR",
                        "subFilter": [
                            {"field": "ZoneName", "value": "a.org"},
                            {"field": "ZoneName", "value": "b.org"},
                        ]
                    },
                    {"field": "ZoneType", "value": "NATIVE"},
                ]
            })
        );
    }
}
