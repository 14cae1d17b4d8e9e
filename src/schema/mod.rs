pub mod entities;

use mongodb::bson::{oid::ObjectId, Bson, Document};
use serde_json::Value;
use std::fmt;

/// Declared type of a schema field. Compound fields carry a nested schema;
/// `Id` fields must hold the canonical 24-character hex identifier.
#[derive(Debug, Clone)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Id,
    Object(Schema),
    Array(Box<FieldKind>),
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn required(name: &'static str, kind: FieldKind) -> Self {
        Self { name, required: true, kind }
    }

    pub fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self { name, required: false, kind }
    }
}

/// Declared shape of one entity's payload. Validation is structural only:
/// required fields, primitive types, identifier format. No business rules.
#[derive(Debug, Clone)]
pub struct Schema {
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationReason {
    Missing,
    WrongType(&'static str),
    InvalidId,
}

/// One field-level validation failure, reported in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub reason: ViolationReason,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            ViolationReason::Missing => write!(f, "{}: required field is missing", self.path),
            ViolationReason::WrongType(expected) => {
                write!(f, "{}: expected {}", self.path, expected)
            }
            ViolationReason::InvalidId => {
                write!(f, "{}: invalid identifier (expected 24 hex characters)", self.path)
            }
        }
    }
}

/// Parse a path or payload identifier. Anything that is not exactly the
/// 24-character hex form is rejected here, before a filter is ever built,
/// so a malformed id can never degrade into a broad query.
pub fn object_id(raw: &str) -> Result<ObjectId, Violation> {
    ObjectId::parse_str(raw).map_err(|_| Violation {
        path: "id".to_string(),
        reason: ViolationReason::InvalidId,
    })
}

impl Schema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Validate `payload` against the declared shape and lower the accepted
    /// fields into a BSON document (`Id` fields become ObjectIds). Undeclared
    /// fields are ignored and never persisted. On failure, returns every
    /// violation in field-declaration order.
    pub fn validate(&self, payload: &Value) -> Result<Document, Vec<Violation>> {
        let map = match payload.as_object() {
            Some(map) => map,
            None => {
                return Err(vec![Violation {
                    path: "$".to_string(),
                    reason: ViolationReason::WrongType("object"),
                }])
            }
        };

        let mut document = Document::new();
        let mut violations = Vec::new();

        for field in &self.fields {
            match map.get(field.name) {
                None | Some(Value::Null) => {
                    if field.required {
                        violations.push(Violation {
                            path: field.name.to_string(),
                            reason: ViolationReason::Missing,
                        });
                    }
                }
                Some(value) => {
                    if let Some(bson) = lower(&field.kind, value, field.name, &mut violations) {
                        document.insert(field.name, bson);
                    }
                }
            }
        }

        if violations.is_empty() {
            Ok(document)
        } else {
            Err(violations)
        }
    }
}

/// Check one value against its declared kind, recursing into compounds.
/// Returns the lowered BSON on success; records a violation otherwise.
fn lower(kind: &FieldKind, value: &Value, path: &str, violations: &mut Vec<Violation>) -> Option<Bson> {
    match kind {
        FieldKind::String => match value.as_str() {
            Some(s) => Some(Bson::String(s.to_string())),
            None => {
                violations.push(Violation {
                    path: path.to_string(),
                    reason: ViolationReason::WrongType("string"),
                });
                None
            }
        },
        FieldKind::Number => match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Bson::Int64(i))
                } else {
                    n.as_f64().map(Bson::Double)
                }
            }
            _ => {
                violations.push(Violation {
                    path: path.to_string(),
                    reason: ViolationReason::WrongType("number"),
                });
                None
            }
        },
        FieldKind::Boolean => match value.as_bool() {
            Some(b) => Some(Bson::Boolean(b)),
            None => {
                violations.push(Violation {
                    path: path.to_string(),
                    reason: ViolationReason::WrongType("boolean"),
                });
                None
            }
        },
        FieldKind::Id => match value.as_str().and_then(|s| ObjectId::parse_str(s).ok()) {
            Some(oid) => Some(Bson::ObjectId(oid)),
            None => {
                violations.push(Violation {
                    path: path.to_string(),
                    reason: ViolationReason::InvalidId,
                });
                None
            }
        },
        FieldKind::Object(schema) => match value.as_object() {
            Some(_) => {
                let before = violations.len();
                let mut nested = Document::new();
                for field in &schema.fields {
                    let nested_path = format!("{}.{}", path, field.name);
                    match value.get(field.name) {
                        None | Some(Value::Null) => {
                            if field.required {
                                violations.push(Violation {
                                    path: nested_path,
                                    reason: ViolationReason::Missing,
                                });
                            }
                        }
                        Some(inner) => {
                            if let Some(bson) = lower(&field.kind, inner, &nested_path, violations) {
                                nested.insert(field.name, bson);
                            }
                        }
                    }
                }
                if violations.len() == before {
                    Some(Bson::Document(nested))
                } else {
                    None
                }
            }
            None => {
                violations.push(Violation {
                    path: path.to_string(),
                    reason: ViolationReason::WrongType("object"),
                });
                None
            }
        },
        FieldKind::Array(element) => match value.as_array() {
            Some(items) => {
                let before = violations.len();
                let mut lowered = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let item_path = format!("{}[{}]", path, index);
                    if let Some(bson) = lower(element, item, &item_path, violations) {
                        lowered.push(bson);
                    }
                }
                if violations.len() == before {
                    Some(Bson::Array(lowered))
                } else {
                    None
                }
            }
            None => {
                violations.push(Violation {
                    path: path.to_string(),
                    reason: ViolationReason::WrongType("array"),
                });
                None
            }
        },
    }
}
