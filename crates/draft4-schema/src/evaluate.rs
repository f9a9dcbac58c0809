//! # Validation Evaluator
//!
//! Walks the resolved graph against an instance and collects every
//! violation. Sibling keywords are evaluated independently and their
//! violations concatenated in keyword order; a keyword whose instance type
//! does not apply contributes nothing.
//!
//! The graph may be cyclic. Recursion that consumes the instance always
//! terminates, however deep the instance is; recursion that re-enters a
//! node for the same instance value (e.g. `{"allOf": [{"$ref": "#"}]}`) is
//! cut off with a single violation.

use std::ptr;

use draft4_core::{json_equal, JsonType, Numeric};
use serde_json::{Map, Number, Value};

use crate::constraint::{
    AdditionalPolicy, Branches, Constraint, Dependencies, Items, ItemsShape, Limit, PatternSchema,
    Properties,
};
use crate::graph::{Graph, NodeId, Slot, SlotId};
use crate::pointer;
use crate::violation::ValidationError;

pub(crate) struct Evaluator<'g, 'v> {
    graph: &'g Graph,
    /// Nodes currently being evaluated, with the instance value each one
    /// was entered for.
    active: Vec<(NodeId, &'v Value)>,
}

impl<'g, 'v> Evaluator<'g, 'v> {
    pub(crate) fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            active: Vec::new(),
        }
    }

    pub(crate) fn evaluate(
        &mut self,
        slot: SlotId,
        instance: &'v Value,
        path: &str,
    ) -> Vec<ValidationError> {
        let node = match self.graph.slot(slot) {
            Slot::Bound(node) => node,
            Slot::Broken(index) => {
                let reason = &self.graph.reference_errors[index];
                return vec![ValidationError::new(
                    "$ref",
                    path,
                    format!("schema is unusable: {reason}"),
                )];
            }
        };
        let looping = self
            .active
            .iter()
            .any(|(active, value)| *active == node && ptr::eq(*value, instance));
        if looping {
            return vec![ValidationError::new(
                "$ref",
                path,
                "schema recursion does not terminate for this value",
            )];
        }

        let graph = self.graph;
        self.active.push((node, instance));
        let mut errors = Vec::new();
        for (name, constraint) in &graph.node(node).keywords {
            self.check(name, constraint, instance, path, &mut errors);
        }
        self.active.pop();
        errors
    }

    fn is_clean(&mut self, slot: SlotId, instance: &'v Value, path: &str) -> bool {
        self.evaluate(slot, instance, path).is_empty()
    }

    fn check(
        &mut self,
        name: &str,
        constraint: &Constraint,
        instance: &'v Value,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        let violation = |description: String| ValidationError::new(name, path, description);
        match (constraint, instance) {
            (Constraint::Maximum(max), Value::Number(n)) => {
                if let Some(description) = check_maximum(&max.0, n) {
                    errors.push(violation(description));
                }
            }
            (Constraint::Minimum(min), Value::Number(n)) => {
                if let Some(description) = check_minimum(&min.0, n) {
                    errors.push(violation(description));
                }
            }
            (Constraint::MultipleOf(divisor), Value::Number(n)) => {
                let multiple = Numeric::from_number_lossy(n).and_then(|v| v.is_multiple_of(*divisor));
                if multiple == Some(false) {
                    errors.push(violation(format!("{n} is not a multiple of {divisor}")));
                }
            }
            (Constraint::MaxLength(max), Value::String(s)) => {
                let len = s.chars().count() as u64;
                if len > *max {
                    errors.push(violation(format!("string of length {len} is longer than {max}")));
                }
            }
            (Constraint::MinLength(min), Value::String(s)) => {
                let len = s.chars().count() as u64;
                if len < *min {
                    errors.push(violation(format!("string of length {len} is shorter than {min}")));
                }
            }
            (Constraint::Pattern(pattern), Value::String(s)) => {
                if !pattern.is_match(s) {
                    errors.push(violation(format!("{instance} does not match '{}'", pattern.as_str())));
                }
            }
            (Constraint::MaxItems(max), Value::Array(items)) => {
                if items.len() as u64 > *max {
                    errors.push(violation(format!("array has {} items, more than {max}", items.len())));
                }
            }
            (Constraint::MinItems(min), Value::Array(items)) => {
                if (items.len() as u64) < *min {
                    errors.push(violation(format!("array has {} items, fewer than {min}", items.len())));
                }
            }
            (Constraint::Items(spec), Value::Array(elements)) => {
                self.check_items(spec, elements, path, errors);
            }
            (Constraint::Properties(spec), Value::Object(members)) => {
                self.check_properties(spec, members, path, errors);
            }
            (Constraint::PatternProperties(spec), Value::Object(members)) if !spec.subsumed => {
                for (key, value) in members {
                    let child = child_path(path, key);
                    for matching in spec.patterns.iter().filter(|p| p.pattern.is_match(key)) {
                        errors.extend(self.evaluate(matching.schema, value, &child));
                    }
                }
            }
            (Constraint::AdditionalProperties(spec), Value::Object(members)) if !spec.subsumed => {
                for (key, value) in members {
                    if !matches_any(&spec.patterns, key) {
                        self.check_additional(spec.policy, key, value, path, errors);
                    }
                }
            }
            (Constraint::Required(keys), Value::Object(members)) => {
                for key in keys.iter().filter(|k| !members.contains_key(*k)) {
                    errors.push(violation(format!("missing required property '{key}'")));
                }
            }
            (Constraint::MaxProperties(max), Value::Object(members)) => {
                if members.len() as u64 > *max {
                    errors.push(violation(format!("object has {} properties, more than {max}", members.len())));
                }
            }
            (Constraint::MinProperties(min), Value::Object(members)) => {
                if (members.len() as u64) < *min {
                    errors.push(violation(format!("object has {} properties, fewer than {min}", members.len())));
                }
            }
            (Constraint::Dependencies(spec), Value::Object(members)) => {
                self.check_dependencies(spec, instance, members, path, errors);
            }
            (Constraint::AllOf(Branches(branches)), _) => {
                for branch in branches {
                    errors.extend(self.evaluate(*branch, instance, path));
                }
            }
            (Constraint::AnyOf(Branches(branches)), _) => {
                if !branches.iter().any(|b| self.is_clean(*b, instance, path)) {
                    errors.push(ValidationError::new(
                        name,
                        path,
                        format!("value does not match any of the {} anyOf schemas", branches.len()),
                    ));
                }
            }
            (Constraint::OneOf(Branches(branches)), _) => {
                let clean = branches
                    .iter()
                    .filter(|b| self.is_clean(**b, instance, path))
                    .count();
                if clean != 1 {
                    errors.push(ValidationError::new(
                        name,
                        path,
                        format!(
                            "value matches {clean} of the {} oneOf schemas, expected exactly one",
                            branches.len()
                        ),
                    ));
                }
            }
            (Constraint::Not(negation), _) => {
                if self.is_clean(negation.0, instance, path) {
                    errors.push(ValidationError::new(
                        name,
                        path,
                        "value must not match the schema in 'not'",
                    ));
                }
            }
            (Constraint::Enum(values), _) => {
                if !values.iter().any(|v| json_equal(v, instance)) {
                    errors.push(violation(format!("{instance} is not one of the enumerated values")));
                }
            }
            (Constraint::Type(types), _) => {
                let actual = JsonType::of(instance);
                if !types.iter().any(|t| actual.satisfies(*t)) {
                    let expected: Vec<&str> = types.iter().map(|t| t.as_str()).collect();
                    errors.push(violation(format!("{actual} is not of type {}", expected.join(" or "))));
                }
            }
            (Constraint::Ref(target), _) => {
                tracing::error!(%target, "unresolved $ref reached evaluation");
                errors.push(violation(format!("reference {target} was never resolved")));
            }
            _ => {}
        }
    }

    fn check_items(
        &mut self,
        spec: &Items,
        elements: &'v [Value],
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        match &spec.shape {
            ItemsShape::Single(schema) => {
                for (index, element) in elements.iter().enumerate() {
                    errors.extend(self.evaluate(*schema, element, &index_path(path, index)));
                }
            }
            ItemsShape::Positional(schemas) => {
                for (index, (schema, element)) in schemas.iter().zip(elements).enumerate() {
                    errors.extend(self.evaluate(*schema, element, &index_path(path, index)));
                }
                let extra = elements.get(schemas.len()..).unwrap_or_default();
                match spec.additional {
                    AdditionalPolicy::Allowed => {}
                    AdditionalPolicy::Forbidden if extra.is_empty() => {}
                    AdditionalPolicy::Forbidden => errors.push(ValidationError::new(
                        "additionalItems",
                        path,
                        format!(
                            "array has {} items but only {} are allowed",
                            elements.len(),
                            schemas.len()
                        ),
                    )),
                    AdditionalPolicy::Schema(schema) => {
                        for (offset, element) in extra.iter().enumerate() {
                            let child = index_path(path, schemas.len() + offset);
                            errors.extend(self.evaluate(schema, element, &child));
                        }
                    }
                }
            }
        }
    }

    /// One pass over the members, applying `properties`, `patternProperties`
    /// and `additionalProperties` together.
    fn check_properties(
        &mut self,
        spec: &Properties,
        members: &'v Map<String, Value>,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        for (key, value) in members {
            let child = child_path(path, key);
            let mut claimed = false;
            if let Some(schema) = spec.members.get(key) {
                claimed = true;
                errors.extend(self.evaluate(*schema, value, &child));
            }
            for matching in spec.patterns.iter().filter(|p| p.pattern.is_match(key)) {
                claimed = true;
                errors.extend(self.evaluate(matching.schema, value, &child));
            }
            if !claimed {
                self.check_additional(spec.additional, key, value, path, errors);
            }
        }
    }

    fn check_additional(
        &mut self,
        policy: AdditionalPolicy,
        key: &str,
        value: &'v Value,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        match policy {
            AdditionalPolicy::Allowed => {}
            AdditionalPolicy::Forbidden => errors.push(ValidationError::new(
                "additionalProperties",
                path,
                format!("additional property '{key}' is not allowed"),
            )),
            AdditionalPolicy::Schema(schema) => {
                errors.extend(self.evaluate(schema, value, &child_path(path, key)));
            }
        }
    }

    fn check_dependencies(
        &mut self,
        spec: &Dependencies,
        instance: &'v Value,
        members: &Map<String, Value>,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        for (trigger, schema) in &spec.schemas {
            if members.contains_key(trigger) {
                errors.extend(self.evaluate(*schema, instance, path));
            }
        }
        for (trigger, required) in &spec.properties {
            if !members.contains_key(trigger) {
                continue;
            }
            for missing in required.iter().filter(|k| !members.contains_key(*k)) {
                errors.push(ValidationError::new(
                    "dependencies",
                    path,
                    format!("property '{missing}' is required when '{trigger}' is present"),
                ));
            }
        }
    }
}

fn check_maximum(bound: &Limit, n: &Number) -> Option<String> {
    use std::cmp::Ordering::{Equal, Greater};
    let value = Numeric::from_number_lossy(n)?;
    match value.compare(bound.limit)? {
        Greater => Some(format!("{n} is greater than the maximum of {}", bound.limit)),
        Equal if bound.exclusive => Some(format!(
            "{n} is not less than the exclusive maximum of {}",
            bound.limit
        )),
        _ => None,
    }
}

fn check_minimum(bound: &Limit, n: &Number) -> Option<String> {
    use std::cmp::Ordering::{Equal, Less};
    let value = Numeric::from_number_lossy(n)?;
    match value.compare(bound.limit)? {
        Less => Some(format!("{n} is less than the minimum of {}", bound.limit)),
        Equal if bound.exclusive => Some(format!(
            "{n} is not greater than the exclusive minimum of {}",
            bound.limit
        )),
        _ => None,
    }
}

fn matches_any(patterns: &[PatternSchema], key: &str) -> bool {
    patterns.iter().any(|p| p.pattern.is_match(key))
}

fn child_path(path: &str, key: &str) -> String {
    format!("{path}/{}", pointer::escape(key))
}

fn index_path(path: &str, index: usize) -> String {
    format!("{path}/{index}")
}
