//! Field validation for untyped item attribute bags.
//!
//! Each operation declares the fields it accepts as a static rule
//! table; [`validate`] walks the table in order, coerces the fields
//! that are present, and returns a typed [`ItemDraft`]. A bag that
//! carries any field outside the table is rejected outright, so a
//! field can never be smuggled past an operation that does not accept
//! it (over-posting guard).

use serde_json::Value;

use crate::error::{TaskbinError, TaskbinResult};
use crate::models::item::ItemDraft;

/// One accepted field: its wire name and the coercion that writes it
/// into the draft.
pub struct FieldRule {
    pub name: &'static str,
    apply: fn(&mut ItemDraft, &Value) -> TaskbinResult<()>,
}

/// Fields accepted when creating an item. `done` is deliberately
/// absent: new items always start not-done.
pub static CREATE_FIELDS: &[FieldRule] = &[
    FieldRule {
        name: "description",
        apply: apply_description,
    },
    FieldRule {
        name: "due_before",
        apply: apply_due_before,
    },
];

/// Fields accepted when updating an item.
pub static UPDATE_FIELDS: &[FieldRule] = &[
    FieldRule {
        name: "description",
        apply: apply_description,
    },
    FieldRule {
        name: "done",
        apply: apply_done,
    },
    FieldRule {
        name: "due_before",
        apply: apply_due_before,
    },
];

/// Coerce a raw attribute bag into a typed draft.
///
/// Fails `Validation` when `raw` is not a JSON object, when it carries
/// a field the operation does not accept, or when any accepted field
/// fails its coercion. Absent fields stay `None`, so partial bags
/// validate cleanly.
pub fn validate(raw: &Value, fields: &[FieldRule]) -> TaskbinResult<ItemDraft> {
    let map = raw
        .as_object()
        .ok_or_else(|| TaskbinError::validation("values must be a map"))?;

    if let Some(extra) = map
        .keys()
        .find(|key| !fields.iter().any(|f| f.name == key.as_str()))
    {
        return Err(TaskbinError::validation(format!(
            "field {extra} is not accepted for this operation"
        )));
    }

    let mut draft = ItemDraft::default();
    for field in fields {
        if let Some(value) = map.get(field.name) {
            (field.apply)(&mut draft, value)?;
        }
    }
    Ok(draft)
}

fn apply_description(draft: &mut ItemDraft, value: &Value) -> TaskbinResult<()> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return Err(TaskbinError::validation("description must be a string")),
    };
    draft.description = Some(text);
    Ok(())
}

fn apply_done(draft: &mut ItemDraft, value: &Value) -> TaskbinResult<()> {
    let flag = match value {
        Value::Bool(b) => *b,
        Value::String(s) if s == "true" => true,
        Value::String(s) if s == "false" => false,
        _ => return Err(TaskbinError::validation("done must be a boolean")),
    };
    draft.done = Some(flag);
    Ok(())
}

fn apply_due_before(draft: &mut ItemDraft, value: &Value) -> TaskbinResult<()> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    // Zero is a valid deadline; only parse failures and negatives reject.
    match parsed {
        Some(n) if n >= 0 => {
            draft.due_before = Some(n);
            Ok(())
        }
        _ => Err(TaskbinError::validation(
            "due_before must be a non-negative integer",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_bag_coerces_string_due_before() {
        let draft = validate(&json!({"description": "x", "due_before": "5"}), CREATE_FIELDS)
            .unwrap();
        assert_eq!(draft.description.as_deref(), Some("x"));
        assert_eq!(draft.due_before, Some(5));
        assert_eq!(draft.done, None);
    }

    #[test]
    fn done_is_rejected_on_create() {
        // Coercible value, but the create table does not list the field.
        let result = validate(&json!({"done": "true"}), CREATE_FIELDS);
        assert!(matches!(result, Err(TaskbinError::Validation { .. })));
    }

    #[test]
    fn done_string_literals_coerce_on_update() {
        let draft = validate(&json!({"done": "true"}), UPDATE_FIELDS).unwrap();
        assert_eq!(draft.done, Some(true));
        let draft = validate(&json!({"done": "false"}), UPDATE_FIELDS).unwrap();
        assert_eq!(draft.done, Some(false));
    }

    #[test]
    fn done_rejects_other_values() {
        assert!(validate(&json!({"done": "yes"}), UPDATE_FIELDS).is_err());
        assert!(validate(&json!({"done": 1}), UPDATE_FIELDS).is_err());
    }

    #[test]
    fn due_before_zero_is_valid() {
        let draft = validate(&json!({"due_before": 0}), UPDATE_FIELDS).unwrap();
        assert_eq!(draft.due_before, Some(0));
    }

    #[test]
    fn due_before_rejects_negative_and_garbage() {
        assert!(validate(&json!({"due_before": -1}), UPDATE_FIELDS).is_err());
        assert!(validate(&json!({"due_before": "soon"}), UPDATE_FIELDS).is_err());
        assert!(validate(&json!({"due_before": true}), UPDATE_FIELDS).is_err());
    }

    #[test]
    fn description_stringifies_scalars() {
        let draft = validate(&json!({"description": 42}), UPDATE_FIELDS).unwrap();
        assert_eq!(draft.description.as_deref(), Some("42"));
        let draft = validate(&json!({"description": false}), UPDATE_FIELDS).unwrap();
        assert_eq!(draft.description.as_deref(), Some("false"));
    }

    #[test]
    fn description_rejects_composites_and_null() {
        assert!(validate(&json!({"description": ["a"]}), UPDATE_FIELDS).is_err());
        assert!(validate(&json!({"description": null}), UPDATE_FIELDS).is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = validate(
            &json!({"description": "x", "api_key": "sneaky"}),
            UPDATE_FIELDS,
        );
        assert!(matches!(result, Err(TaskbinError::Validation { .. })));
    }

    #[test]
    fn non_object_bags_are_rejected() {
        assert!(validate(&json!("text"), CREATE_FIELDS).is_err());
        assert!(validate(&json!(null), CREATE_FIELDS).is_err());
        assert!(validate(&json!([1, 2]), CREATE_FIELDS).is_err());
    }

    #[test]
    fn empty_bag_validates_to_empty_draft() {
        let draft = validate(&json!({}), UPDATE_FIELDS).unwrap();
        assert!(draft.is_empty());
    }
}
