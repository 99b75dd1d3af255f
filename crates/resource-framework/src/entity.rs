//! # Resource Trait
//!
//! The `Resource` trait is the contract every resource kind (Bike, Car, Movie, …) implements
//! to be served by the generic [`StoreActor`](crate::StoreActor) and
//! [`ResourceHandler`](crate::ResourceHandler).
//!
//! A resource type describes only the **mutable fields** of a record. The identifier is owned
//! by the store and lives on the [`Record`] wrapper, so a handler can never fabricate one and
//! an update can never overwrite one.
//!
//! # Architecture Note
//! By describing every kind through the same trait we write the store loop, the access checks
//! and the error shaping *once*. A new kind is a field list plus two constants; the
//! [`declare_resource!`](crate::declare_resource) macro generates even that.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Store-assigned identifier. Unique among live records and never reused.
pub type RecordId = u64;

/// Trait that any resource kind must implement to be managed by a `StoreActor`.
///
/// The implementing struct holds the scalar fields of the kind. It is used directly as the
/// create parameters (query string) and as the update payload (JSON body).
pub trait Resource:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Human-readable kind name used in messages, e.g. `"Bike"`.
    const KIND: &'static str;

    /// Lower-case plural path segment, e.g. `"bikes"`.
    const COLLECTION: &'static str;
}

/// A persisted resource: the store-assigned id plus the kind's fields.
///
/// Serializes flat, id first: `{"id":0,"manufacturer":"Innersloth",...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "R: Resource")]
pub struct Record<R: Resource> {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: R,
}

impl<R: Resource> Record<R> {
    pub fn new(id: RecordId, fields: R) -> Self {
        Self { id, fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Widget {
        label: String,
        part_count: i32,
    }

    impl Resource for Widget {
        const KIND: &'static str = "Widget";
        const COLLECTION: &'static str = "widgets";
    }

    #[test]
    fn record_serializes_flat_with_id_first() {
        let record = Record::new(
            3,
            Widget {
                label: "gear".into(),
                part_count: 12,
            },
        );
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"id":3,"label":"gear","partCount":12}"#);
    }

    #[test]
    fn record_deserializes_from_flat_json() {
        let record: Record<Widget> =
            serde_json::from_str(r#"{"id":9,"label":"cog","partCount":4}"#).unwrap();
        assert_eq!(record.id, 9);
        assert_eq!(record.fields.label, "cog");
        assert_eq!(record.fields.part_count, 4);
    }

    #[test]
    fn fields_ignore_an_incoming_id() {
        let widget: Widget =
            serde_json::from_str(r#"{"id":42,"label":"cog","partCount":4}"#).unwrap();
        assert_eq!(widget.label, "cog");
    }
}
