//! Wire format for stored documents. Clients only ever see plain JSON:
//! ObjectIds are rendered as their 24-hex string form and timestamps as
//! RFC 3339 strings, matching what the companion front end parses.

use mongodb::bson::{Bson, Document};
use serde_json::{json, Map, Number, Value};

/// Standard success envelope.
pub fn ok(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

pub fn document_to_json(document: &Document) -> Value {
    let mut map = Map::with_capacity(document.len());
    for (key, value) in document {
        map.insert(key.clone(), bson_to_json(value));
    }
    Value::Object(map)
}

pub fn documents_to_json(documents: &[Document]) -> Value {
    Value::Array(documents.iter().map(document_to_json).collect())
}

fn bson_to_json(value: &Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::String(s) => Value::String(s.clone()),
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::Int32(i) => Value::Number((*i).into()),
        Bson::Int64(i) => Value::Number((*i).into()),
        Bson::Double(d) => Number::from_f64(*d).map(Value::Number).unwrap_or(Value::Null),
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .map(Value::String)
            .unwrap_or(Value::Null),
        Bson::Document(doc) => document_to_json(doc),
        Bson::Array(items) => Value::Array(items.iter().map(bson_to_json).collect()),
        Bson::Null => Value::Null,
        other => other.clone().into_relaxed_extjson(),
    }
}
