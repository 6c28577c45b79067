//! Structural (untagged) event-variant classification.
//!
//! `spec.md` §4.1 mandates an explicit wire tag for normal operation (see
//! [`crate::event`]), but requires this structural fallback for decoding
//! logs recorded before the tag existed: the variant is inferred purely from
//! which fields are present, tried **richest to poorest** -- Ship, then
//! Pellet, then Planet, then Destroy. This ordering is contract, not a
//! convenience: a Ship value is also a superset of a bare Body, so trying
//! the poorer shapes first would misclassify it.
//!
//! Every [`ObjCreate`]/[`ObjState`] variant pair shares the same
//! distinguishing markers (`weapon`, `time_to_live`, `name`) because the
//! create-only fields (`controller`, `max_thrust`, `max_rotate`) live
//! alongside, not instead of, the state-shape markers.

use serde_json::Value;
use tracing::warn;

use crate::error::SchemaError;
use crate::event::{ObjCreate, ObjState};

/// The three concrete object variants, plus the empty `Destroy` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Ship,
    Pellet,
    Planet,
    Destroy,
}

/// Does `value` structurally match the required-field shape of `kind`?
///
/// This is the `validate(value, schema)` predicate named in `spec.md`
/// §4.1: a boolean test that [`classify`] calls in richest-to-poorest order.
pub fn validate(value: &Value, kind: SchemaKind) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };
    match kind {
        SchemaKind::Ship => object.contains_key("weapon"),
        SchemaKind::Pellet => object.contains_key("time_to_live"),
        SchemaKind::Planet => object.contains_key("name"),
        SchemaKind::Destroy => object.is_empty(),
    }
}

/// Classify `value` by trying each [`SchemaKind`] richest to poorest.
///
/// Returns `None` if `value` matches none of the known shapes.
pub fn classify(value: &Value) -> Option<SchemaKind> {
    for kind in [
        SchemaKind::Ship,
        SchemaKind::Pellet,
        SchemaKind::Planet,
        SchemaKind::Destroy,
    ] {
        if validate(value, kind) {
            return Some(kind);
        }
    }
    None
}

/// Decode an untagged JSON value as an [`ObjCreate`] using structural
/// classification instead of the `kind` tag.
pub fn decode_structural_create(value: Value) -> Result<ObjCreate, SchemaError> {
    match classify(&value) {
        Some(SchemaKind::Ship) => Ok(ObjCreate::Ship(serde_json::from_value(value)?)),
        Some(SchemaKind::Pellet) => Ok(ObjCreate::Pellet(serde_json::from_value(value)?)),
        Some(SchemaKind::Planet) => Ok(ObjCreate::Planet(serde_json::from_value(value)?)),
        Some(SchemaKind::Destroy) | None => {
            warn!(%value, "rejected: no Create shape matched");
            Err(SchemaError::UnrecognizedVariant(format!(
                "no Create shape matched: {value}"
            )))
        }
    }
}

/// Decode an untagged JSON value as an [`ObjState`] using structural
/// classification instead of the `kind` tag.
pub fn decode_structural_state(value: Value) -> Result<ObjState, SchemaError> {
    match classify(&value) {
        Some(SchemaKind::Ship) => Ok(ObjState::Ship(serde_json::from_value(value)?)),
        Some(SchemaKind::Pellet) => Ok(ObjState::Pellet(serde_json::from_value(value)?)),
        Some(SchemaKind::Planet) => Ok(ObjState::Planet(serde_json::from_value(value)?)),
        Some(SchemaKind::Destroy) | None => {
            warn!(%value, "rejected: no State shape matched");
            Err(SchemaError::UnrecognizedVariant(format!(
                "no State shape matched: {value}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_ship_before_pellet_or_planet() {
        let value = json!({
            "radius": 1.0, "mass": 1.0,
            "position": {"x": 0.0, "y": 0.0},
            "velocity": {"x": 0.0, "y": 0.0},
            "orientation": 0.0,
            "weapon": {"fired": false, "reload": 0.0, "temperature": 0.0},
            "controller": {"fire": false, "rotate": 0.0, "thrust": 0.0},
        });
        assert_eq!(classify(&value), Some(SchemaKind::Ship));
    }

    #[test]
    fn classifies_pellet_by_time_to_live() {
        let value = json!({
            "radius": 0.0, "mass": 0.0,
            "position": {"x": 0.0, "y": 0.0},
            "velocity": {"x": 0.0, "y": 0.0},
            "orientation": 0.0,
            "time_to_live": 4.5,
        });
        assert_eq!(classify(&value), Some(SchemaKind::Pellet));
    }

    #[test]
    fn classifies_planet_by_name() {
        let value = json!({
            "radius": 20.0, "mass": 1000.0,
            "position": {"x": 100.0, "y": 100.0},
            "velocity": {"x": 0.0, "y": 0.0},
            "orientation": 0.0,
            "name": "Sol",
        });
        assert_eq!(classify(&value), Some(SchemaKind::Planet));
    }

    #[test]
    fn classifies_empty_object_as_destroy() {
        assert_eq!(classify(&json!({})), Some(SchemaKind::Destroy));
    }

    #[test]
    fn unrecognized_shape_returns_none() {
        assert_eq!(classify(&json!({"unexpected": true})), None);
    }

    #[test]
    fn decode_structural_create_roundtrips_planet() {
        use crate::event::{Body, PlanetCreate};
        use crate::vector::Vec2;

        let create = PlanetCreate {
            body: Body {
                radius: 20.0,
                mass: 1000.0,
                position: Vec2::new(100.0, 100.0),
                velocity: Vec2::ZERO,
                orientation: 0.0,
            },
            name: "Sol".to_owned(),
        };
        let value = serde_json::to_value(&create).unwrap();
        let decoded = decode_structural_create(value).unwrap();
        assert_eq!(decoded, ObjCreate::Planet(create));
    }
}
