//! # Field access strategies
//!
//! Resolves a value's "field" by name in one of two explicit ways:
//! index-style (`value[field]`, for nested collections) or property-style
//! (`value.field`, for records). Grouping, indexing, plucking and
//! field-keyed sorting all take the strategy from the caller and apply it
//! uniformly to every element — the shape of an element is never used to
//! guess.

use crate::core::error::{Error, Result};
use crate::core::key::Key;
use crate::core::value::Value;

/// How a field is looked up on an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessStrategy {
    /// `value[field]` — the element must be a collection
    #[default]
    Index,
    /// `value.field` — the element must be a record
    Property,
}

/// Resolves `field` on `value` using the given strategy.
///
/// Fails with [`Error::FieldNotFound`] when the field is absent, when the
/// element does not have the shape the strategy addresses, or when a
/// property lookup is attempted with an integer key.
pub fn field<'a>(value: &'a Value, field: &Key, strategy: AccessStrategy) -> Result<&'a Value> {
    let resolved = match strategy {
        AccessStrategy::Index => value.as_coll().and_then(|coll| coll.as_raw().get(field)),
        AccessStrategy::Property => match (value.as_record(), field) {
            (Some(record), Key::Str(name)) => record.field(name),
            _ => None,
        },
    };

    resolved.ok_or_else(|| Error::FieldNotFound(field.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coll;
    use crate::core::value::Record;

    #[test]
    fn test_index_access() {
        let element = Value::Coll(coll! {"name" => "Bob", "age" => 23});

        let got = field(&element, &Key::from("age"), AccessStrategy::Index).unwrap();
        assert_eq!(got, &Value::Int(23));
    }

    #[test]
    fn test_property_access() {
        let element = Value::Record(Record::new().with("name", "Alice"));

        let got = field(&element, &Key::from("name"), AccessStrategy::Property).unwrap();
        assert_eq!(got, &Value::from("Alice"));
    }

    #[test]
    fn test_missing_field() {
        let element = Value::Coll(coll! {"name" => "Bob"});

        let err = field(&element, &Key::from("age"), AccessStrategy::Index).unwrap_err();
        assert_eq!(err, Error::FieldNotFound(Key::from("age")));
    }

    #[test]
    fn test_strategies_do_not_cross_over() {
        let coll_element = Value::Coll(coll! {"name" => "Bob"});
        let record_element = Value::Record(Record::new().with("name", "Alice"));

        // A record is not index-addressable and a collection has no properties.
        assert!(field(&coll_element, &Key::from("name"), AccessStrategy::Property).is_err());
        assert!(field(&record_element, &Key::from("name"), AccessStrategy::Index).is_err());
    }

    #[test]
    fn test_property_access_needs_string_key() {
        let element = Value::Record(Record::new().with("0", 1));

        assert!(field(&element, &Key::Int(0), AccessStrategy::Property).is_err());
    }

    #[test]
    fn test_scalar_element_has_no_fields() {
        let err = field(&Value::Int(1), &Key::from("x"), AccessStrategy::Index).unwrap_err();
        assert!(matches!(err, Error::FieldNotFound(_)));
    }
}
