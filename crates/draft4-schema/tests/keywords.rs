//! Keyword semantics, checked through the public `Schema` API.

use draft4_schema::{Schema, ValidationError};
use serde_json::{json, Value};

fn errors(schema: Value, instance: Value) -> Vec<ValidationError> {
    Schema::compile(&schema).unwrap().validate(&instance)
}

fn valid(schema: Value, instance: Value) -> bool {
    errors(schema, instance).is_empty()
}

// -- Numeric ------------------------------------------------------------------

#[test]
fn test_minimum_is_inclusive_by_default() {
    assert!(valid(json!({"minimum": 0}), json!(0)));
    assert!(!valid(json!({"minimum": 0}), json!(-1)));
}

#[test]
fn test_exclusive_minimum_rejects_the_bound() {
    let schema = json!({"minimum": 0, "exclusiveMinimum": true});
    assert!(!valid(schema.clone(), json!(0)));
    assert!(valid(schema, json!(0.0001)));
}

#[test]
fn test_exclusive_maximum_rejects_the_bound() {
    let schema = json!({"maximum": 3.0, "exclusiveMaximum": true});
    assert!(!valid(schema.clone(), json!(3)));
    assert!(valid(schema, json!(2.9999)));
}

#[test]
fn test_non_boolean_exclusivity_is_ignored() {
    assert!(valid(json!({"maximum": 3, "exclusiveMaximum": "true"}), json!(3)));
}

#[test]
fn test_bounds_ignore_non_numbers() {
    assert!(valid(json!({"minimum": 10, "maximum": 20}), json!("5")));
}

#[test]
fn test_multiple_of_checks_integers_only() {
    assert!(valid(json!({"multipleOf": 3}), json!(9)));
    assert!(!valid(json!({"multipleOf": 3}), json!(10)));
    assert!(valid(json!({"multipleOf": 3}), json!(10.5)));
    assert!(valid(json!({"multipleOf": 0.5}), json!(7)));
}

// -- String -------------------------------------------------------------------

#[test]
fn test_lengths_count_code_points() {
    assert!(valid(json!({"maxLength": 2}), json!("\u{1F4A9}\u{1F4A9}")));
    assert!(!valid(json!({"minLength": 3}), json!("\u{1F4A9}\u{1F4A9}")));
}

#[test]
fn test_pattern_is_a_search() {
    assert!(valid(json!({"pattern": "c+"}), json!("abccd")));
    assert!(!valid(json!({"pattern": "^c+$"}), json!("abccd")));
    assert!(valid(json!({"pattern": "^a"}), json!(12)));
}

// -- Array --------------------------------------------------------------------

#[test]
fn test_item_counts() {
    assert!(!valid(json!({"maxItems": 1}), json!([1, 2])));
    assert!(!valid(json!({"minItems": 1}), json!([])));
    assert!(valid(json!({"minItems": 1}), json!({})));
}

#[test]
fn test_single_items_schema_applies_to_every_element() {
    let errs = errors(json!({"items": {"type": "integer"}}), json!([1, "x", 3, "y"]));
    let paths: Vec<&str> = errs.iter().map(|e| e.instance_path.as_str()).collect();
    assert_eq!(paths, vec!["/1", "/3"]);
}

#[test]
fn test_positional_items_allow_extras_by_default() {
    let schema = json!({"items": [{"type": "integer"}, {"type": "string"}]});
    assert!(valid(schema.clone(), json!([1, "a", null, {}])));
    assert!(valid(schema.clone(), json!([1])));
    assert!(!valid(schema, json!(["a", 1])));
}

#[test]
fn test_forbidden_additional_items_is_one_violation() {
    let schema = json!({"items": [{}], "additionalItems": false});
    let errs = errors(schema.clone(), json!([1, 2, 3, 4]));
    assert_eq!(errs.len(), 1);
    assert_eq!(errs[0].keyword, "additionalItems");
    assert!(valid(schema, json!([1])));
}

#[test]
fn test_additional_items_schema_validates_extras() {
    let schema = json!({"items": [{}], "additionalItems": {"type": "integer"}});
    assert!(valid(schema.clone(), json!([null, 2, 3])));
    let errs = errors(schema, json!([null, 2, "three"]));
    assert_eq!(errs.len(), 1);
    assert_eq!(errs[0].instance_path, "/2");
}

#[test]
fn test_additional_items_without_items_is_inert() {
    assert!(valid(json!({"additionalItems": false}), json!([1, 2, 3])));
}

// -- Object -------------------------------------------------------------------

#[test]
fn test_required_reports_each_missing_key() {
    let errs = errors(json!({"required": ["a", "b"]}), json!({"a": 1}));
    assert_eq!(errs.len(), 1);
    assert!(errs[0].description.contains("'b'"));

    let errs = errors(json!({"required": ["a", "b", "c"]}), json!({}));
    assert_eq!(errs.len(), 3);
}

#[test]
fn test_additional_properties_false_with_properties() {
    let schema = json!({"properties": {"age": {"minimum": 0}}, "additionalProperties": false});
    let errs = errors(schema.clone(), json!({"age": 5, "extra": 1}));
    assert_eq!(errs.len(), 1);
    assert_eq!(errs[0].keyword, "additionalProperties");
    assert!(errs[0].description.contains("extra"));
    assert!(valid(schema, json!({"age": 5})));
}

#[test]
fn test_each_disallowed_key_is_its_own_violation() {
    let schema = json!({"properties": {"a": {}}, "additionalProperties": false});
    assert_eq!(errors(schema, json!({"a": 1, "b": 2, "c": 3})).len(), 2);
}

#[test]
fn test_property_matching_both_explicit_and_pattern_gets_both() {
    let schema = json!({
        "properties": {"foo": {"type": "array", "maxItems": 3}},
        "patternProperties": {"f.o": {"minItems": 2}},
        "additionalProperties": {"type": "integer"}
    });
    assert!(valid(schema.clone(), json!({"foo": [1, 2]})));
    assert!(!valid(schema.clone(), json!({"foo": [1, 2, 3, 4]})));
    assert!(!valid(schema.clone(), json!({"foo": []})));
    assert!(valid(schema.clone(), json!({"fxo": [1, 2]})));
    assert!(!valid(schema.clone(), json!({"fxo": []})));
    assert!(valid(schema.clone(), json!({"bar": 3})));
    assert!(!valid(schema, json!({"quux": "foo"})));
}

#[test]
fn test_pattern_properties_reported_once_alongside_properties() {
    let schema = json!({
        "properties": {"a": {}},
        "patternProperties": {"^x-": {"type": "string"}}
    });
    assert_eq!(errors(schema, json!({"x-1": 1})).len(), 1);
}

#[test]
fn test_standalone_pattern_and_additional_properties() {
    let schema = json!({"patternProperties": {"^v": {}}, "additionalProperties": false});
    assert!(valid(schema.clone(), json!({"vroom": 1, "very": 2})));
    assert!(!valid(schema, json!({"vroom": 1, "foo": 2})));

    assert!(!valid(json!({"patternProperties": {"f.*o": {"type": "integer"}}}), json!({"foooooo": "bar"})));
    assert!(!valid(json!({"additionalProperties": {"type": "boolean"}}), json!({"foo": 1})));
}

#[test]
fn test_property_counts() {
    assert!(!valid(json!({"maxProperties": 1}), json!({"a": 1, "b": 2})));
    assert!(!valid(json!({"minProperties": 1}), json!({})));
    assert!(valid(json!({"minProperties": 1}), json!([])));
}

#[test]
fn test_negative_max_properties_is_dropped() {
    assert!(valid(json!({"maxProperties": -1}), json!({"a": 1})));
}

#[test]
fn test_property_dependencies() {
    let schema = json!({"dependencies": {"bar": ["foo", "baz"]}});
    assert!(valid(schema.clone(), json!({"foo": 1})));
    assert_eq!(errors(schema.clone(), json!({"bar": 2})).len(), 2);
    assert_eq!(errors(schema, json!({"bar": 2, "foo": 1})).len(), 1);
}

#[test]
fn test_schema_dependencies_validate_the_whole_instance() {
    let schema = json!({
        "dependencies": {
            "bar": {"properties": {"foo": {"type": "integer"}, "bar": {"type": "integer"}}}
        }
    });
    assert!(valid(schema.clone(), json!({"foo": 1, "bar": 2})));
    assert!(valid(schema.clone(), json!({"foo": "quux"})));
    assert!(!valid(schema.clone(), json!({"foo": "quux", "bar": 2})));
    assert!(!valid(schema, json!({"foo": 2, "bar": "quux"})));
}

// -- Combinators --------------------------------------------------------------

#[test]
fn test_all_of_is_the_union_of_branch_errors() {
    let s1 = json!({"type": "integer"});
    let s2 = json!({"minimum": 10});
    let combined = json!({"allOf": [s1.clone(), s2.clone()]});
    for instance in [json!(5), json!(5.5), json!(12), json!("x")] {
        let mut expected = errors(s1.clone(), instance.clone());
        expected.extend(errors(s2.clone(), instance.clone()));
        assert_eq!(errors(combined.clone(), instance), expected);
    }
}

#[test]
fn test_any_of_needs_one_clean_branch() {
    let schema = json!({"anyOf": [{"type": "integer"}, {"minimum": 2}]});
    assert!(valid(schema.clone(), json!(1)));
    assert!(valid(schema.clone(), json!(2.5)));
    let errs = errors(schema, json!(1.5));
    assert_eq!(errs.len(), 1);
    assert_eq!(errs[0].keyword, "anyOf");
}

#[test]
fn test_one_of_reports_the_clean_count() {
    let schema = json!({"oneOf": [{"type": "integer"}, {"minimum": 2}]});
    assert!(valid(schema.clone(), json!(1)));
    assert!(valid(schema.clone(), json!(2.5)));
    let errs = errors(schema.clone(), json!(3));
    assert_eq!(errs.len(), 1);
    assert!(errs[0].description.contains("matches 2 of the 2"));
    let errs = errors(schema, json!(1.5));
    assert!(errs[0].description.contains("matches 0 of the 2"));
}

#[test]
fn test_not_inverts() {
    let schema = json!({"not": {"type": "integer"}});
    assert!(valid(schema.clone(), json!("foo")));
    assert!(!valid(schema, json!(1)));
}

#[test]
fn test_enum_uses_json_equality() {
    let schema = json!({"enum": [1, "a", [1, 2], {"k": null}]});
    assert!(valid(schema.clone(), json!(1.0)));
    assert!(valid(schema.clone(), json!({"k": null})));
    assert!(!valid(schema.clone(), json!([2, 1])));
    assert!(!valid(schema.clone(), json!(true)));
    assert!(!valid(schema, json!(null)));
}

#[test]
fn test_empty_lists_reject_or_accept_everything() {
    for keyword in ["anyOf", "oneOf", "enum"] {
        let mut schema = serde_json::Map::new();
        schema.insert(keyword.to_string(), json!([]));
        let errs = errors(Value::Object(schema), json!(1));
        assert_eq!(errs.len(), 1, "{keyword}");
        assert_eq!(errs[0].keyword, keyword);
    }
    assert!(valid(json!({"allOf": []}), json!(1)));
    assert!(!valid(json!({"enum": []}), json!(null)));
}

#[test]
fn test_type_integer_and_number() {
    assert!(valid(json!({"type": "integer"}), json!(4)));
    assert!(!valid(json!({"type": "integer"}), json!(4.5)));
    assert!(valid(json!({"type": "number"}), json!(4)));
    assert!(valid(json!({"type": ["string", "null"]}), json!(null)));
    assert!(!valid(json!({"type": ["string", "null"]}), json!(0)));
}

#[test]
fn test_siblings_are_all_evaluated() {
    let errs = errors(json!({"type": "string", "minimum": 3, "enum": ["a"]}), json!(1));
    let keywords: Vec<&str> = errs.iter().map(|e| e.keyword.as_str()).collect();
    assert_eq!(keywords, vec!["enum", "minimum", "type"]);
}

#[test]
fn test_nested_paths_are_escaped() {
    let schema = json!({"properties": {"a/b": {"items": {"type": "string"}}}});
    let errs = errors(schema, json!({"a/b": ["x", 1]}));
    assert_eq!(errs.len(), 1);
    assert_eq!(errs[0].instance_path, "/a~1b/1");
    assert_eq!(errs[0].to_string(), format!("/a~1b/1: {}", errs[0].description));
}

#[test]
fn test_null_instance_is_handled() {
    let schema = json!({
        "properties": {"a": {}}, "items": {}, "minLength": 1, "minimum": 1,
        "required": ["a"], "type": "null"
    });
    assert!(valid(schema, Value::Null));
}
