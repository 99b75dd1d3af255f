//! # Resource Kinds
//!
//! The five kinds served by this service. Each entry is only a field schema; storage,
//! authorization and the HTTP surface are generic over [`Resource`](resource_framework::Resource).
//!
//! Field names are camelCase on the wire (`numGears`, `castMembers`).

use resource_framework::declare_resource;

declare_resource! {
    Bike {
        kind: "Bike",
        collection: "bikes",
        fields {
            manufacturer: String,
            model: String,
            num_gears: i32,
        }
    }

    Car {
        kind: "Car",
        collection: "cars",
        fields {
            description: String,
            /// Free-form, e.g. `"300hp"`.
            horsepower: String,
            model: String,
        }
    }

    Movie {
        kind: "Movie",
        collection: "movies",
        fields {
            name: String,
            synopsis: String,
            cast_members: i32,
        }
    }

    Book {
        kind: "Book",
        collection: "books",
        fields {
            name: String,
            genre: String,
            author: String,
        }
    }

    Restaurant {
        kind: "Restaurant",
        collection: "restaurants",
        fields {
            name: String,
            address: String,
            description: String,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_framework::Record;

    #[test]
    fn bike_wire_shape() {
        let bike = Record::new(
            0,
            Bike {
                manufacturer: "Innersloth".into(),
                model: "Among Us".into(),
                num_gears: 69,
            },
        );
        assert_eq!(
            serde_json::to_string(&bike).unwrap(),
            r#"{"id":0,"manufacturer":"Innersloth","model":"Among Us","numGears":69}"#
        );
    }

    #[test]
    fn movie_uses_camel_case_cast_members() {
        let movie: Movie =
            serde_json::from_str(r#"{"name":"Heat","synopsis":"LA","castMembers":12}"#).unwrap();
        assert_eq!(movie.cast_members, 12);
    }

    #[test]
    fn null_field_fails_validation() {
        let parsed =
            serde_json::from_str::<Car>(r#"{"description":null,"horsepower":"300","model":"GT"}"#);
        assert!(parsed.is_err());
    }
}
