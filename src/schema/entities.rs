//! Declared shapes for every inventory entity, plus the registry that maps a
//! URL segment to its collection, schema and server-stamped field.

use once_cell::sync::Lazy;

use super::{FieldKind, FieldSpec, Schema};

/// One exposed resource: URL segment, backing collection, payload schema and
/// an optional timestamp field the server stamps on insert (client values for
/// that field are never trusted).
pub struct Resource {
    pub segment: &'static str,
    pub collection: &'static str,
    pub stamp_field: Option<&'static str>,
}

impl Resource {
    pub fn schema(&self) -> &'static Schema {
        match self.collection {
            "device" => &DEVICE,
            "model" => &MODEL,
            "floor" => &FLOOR,
            "connection" => &CONNECTION,
            "attribute" => &ATTRIBUTE,
            "attributesDictionary" => &ATTRIBUTES_DICTIONARY,
            "log" => &LOG,
            _ => &USER,
        }
    }
}

pub static RESOURCES: &[Resource] = &[
    Resource { segment: "devices", collection: "device", stamp_field: None },
    Resource { segment: "models", collection: "model", stamp_field: None },
    Resource { segment: "floors", collection: "floor", stamp_field: None },
    Resource { segment: "connections", collection: "connection", stamp_field: Some("createdDate") },
    Resource { segment: "attributes", collection: "attribute", stamp_field: None },
    Resource { segment: "attributesDictionary", collection: "attributesDictionary", stamp_field: None },
    Resource { segment: "logs", collection: "log", stamp_field: Some("date") },
    Resource { segment: "users", collection: "user", stamp_field: None },
];

/// Resolve a URL path segment to its resource. Unknown segments are a 404 at
/// the routing layer, not a validation failure.
pub fn lookup(segment: &str) -> Option<&'static Resource> {
    RESOURCES.iter().find(|r| r.segment == segment)
}

// Numeric-as-string convention for coordinates is inherited from the data
// the companion front end produces.
fn position() -> Schema {
    Schema::new(vec![
        FieldSpec::optional("x", FieldKind::String),
        FieldSpec::optional("y", FieldKind::String),
        FieldSpec::optional("h", FieldKind::String),
    ])
}

pub static DEVICE: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        FieldSpec::optional("_id", FieldKind::Id),
        FieldSpec::optional("name", FieldKind::String),
        FieldSpec::optional("modelId", FieldKind::Id),
        FieldSpec::optional("position", FieldKind::Object(position())),
    ])
});

pub static MODEL: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        FieldSpec::optional("_id", FieldKind::Id),
        FieldSpec::optional("name", FieldKind::String),
        FieldSpec::optional(
            "dimension",
            FieldKind::Object(Schema::new(vec![
                FieldSpec::optional("width", FieldKind::String),
                FieldSpec::optional("height", FieldKind::String),
                FieldSpec::optional("depth", FieldKind::String),
            ])),
        ),
        FieldSpec::optional(
            "texture",
            FieldKind::Object(Schema::new(vec![
                FieldSpec::optional("front", FieldKind::String),
                FieldSpec::optional("back", FieldKind::String),
                FieldSpec::optional("side", FieldKind::String),
                FieldSpec::optional("top", FieldKind::String),
                FieldSpec::optional("bottom", FieldKind::String),
            ])),
        ),
    ])
});

pub static FLOOR: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        FieldSpec::optional("_id", FieldKind::Id),
        FieldSpec::required("name", FieldKind::String),
        FieldSpec::optional(
            "address",
            FieldKind::Object(Schema::new(vec![
                FieldSpec::optional("street", FieldKind::String),
                FieldSpec::optional("city", FieldKind::String),
                FieldSpec::optional("country", FieldKind::String),
                FieldSpec::optional("postcode", FieldKind::String),
            ])),
        ),
        FieldSpec::optional(
            "dimension",
            FieldKind::Array(Box::new(FieldKind::Object(Schema::new(vec![
                FieldSpec::optional("description", FieldKind::String),
                FieldSpec::optional("x", FieldKind::String),
                FieldSpec::optional("y", FieldKind::String),
                FieldSpec::optional("h", FieldKind::String),
                FieldSpec::optional("xPos", FieldKind::String),
                FieldSpec::optional("yPos", FieldKind::String),
                FieldSpec::optional("hPos", FieldKind::String),
            ])))),
        ),
    ])
});

pub static CONNECTION: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        FieldSpec::optional("_id", FieldKind::Id),
        FieldSpec::optional("name", FieldKind::String),
        FieldSpec::required("deviceIdFrom", FieldKind::Id),
        FieldSpec::required("deviceIdTo", FieldKind::Id),
    ])
});

pub static ATTRIBUTE: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        FieldSpec::optional("_id", FieldKind::Id),
        FieldSpec::optional("attributeDictionaryId", FieldKind::Id),
        FieldSpec::optional("connectionId", FieldKind::Id),
        FieldSpec::optional("deviceId", FieldKind::Id),
        FieldSpec::optional("modelId", FieldKind::Id),
        FieldSpec::optional("value", FieldKind::String),
    ])
});

pub static ATTRIBUTES_DICTIONARY: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        FieldSpec::optional("_id", FieldKind::Id),
        FieldSpec::required("category", FieldKind::String),
        FieldSpec::required("component", FieldKind::String),
        FieldSpec::optional("name", FieldKind::String),
        FieldSpec::optional("type", FieldKind::String),
    ])
});

pub static LOG: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        FieldSpec::optional("_id", FieldKind::Id),
        FieldSpec::optional("component", FieldKind::String),
        FieldSpec::optional("message", FieldKind::String),
        FieldSpec::optional("object", FieldKind::String),
        FieldSpec::optional("operation", FieldKind::String),
    ])
});

pub static USER: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        FieldSpec::optional("_id", FieldKind::Id),
        FieldSpec::optional("name", FieldKind::String),
        FieldSpec::optional("email", FieldKind::String),
        FieldSpec::optional("password", FieldKind::String),
        FieldSpec::optional("token", FieldKind::String),
        FieldSpec::optional("rights", FieldKind::Array(Box::new(FieldKind::String))),
    ])
});
