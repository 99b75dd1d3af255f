//! # Declarative Resource Table
//!
//! [`declare_resource!`](crate::declare_resource) turns a table of kinds into field-schema
//! structs, their [`Resource`](crate::Resource) impls and per-kind type aliases. The calling
//! crate needs `serde` (with `derive`) as a dependency.

/// Declares one or more resource kinds.
///
/// Each entry generates:
/// - `pub struct Name { pub field: Type, ... }` with serde camelCase field names
/// - `impl Resource for Name` with the given `kind` and `collection`
/// - `NameRecord = Record<Name>` and `NameHandler = ResourceHandler<Name>`
///
/// ```rust
/// use resource_framework::{declare_resource, Resource};
///
/// declare_resource! {
///     /// A two-wheeler.
///     Bike {
///         kind: "Bike",
///         collection: "bikes",
///         fields {
///             manufacturer: String,
///             num_gears: i32,
///         }
///     }
/// }
///
/// assert_eq!(Bike::KIND, "Bike");
/// let record: BikeRecord = resource_framework::Record::new(0, Bike {
///     manufacturer: "Innersloth".into(),
///     num_gears: 69,
/// });
/// assert_eq!(record.fields.num_gears, 69);
/// ```
#[macro_export]
macro_rules! declare_resource {
    ($(
        $(#[$meta:meta])*
        $name:ident {
            kind: $kind:literal,
            collection: $collection:literal,
            fields {
                $( $(#[$field_meta:meta])* $field:ident : $ty:ty ),* $(,)?
            }
        }
    )*) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            $( $(#[$field_meta])* pub $field: $ty, )*
        }

        impl $crate::Resource for $name {
            const KIND: &'static str = $kind;
            const COLLECTION: &'static str = $collection;
        }

        $crate::paste::paste! {
            pub type [<$name Record>] = $crate::Record<$name>;
            pub type [<$name Handler>] = $crate::ResourceHandler<$name>;
        }
    )*};
}
