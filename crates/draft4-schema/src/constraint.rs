//! # Constraint Variant Set
//!
//! One variant per recognized keyword, plus [`Constraint::Other`] for
//! everything else. Each variant is decoded from the keyword's raw value
//! and may later adjust itself from its siblings during neighbor binding.
//!
//! Two capabilities are modelled as traits and implemented only by the
//! variants that have them:
//!
//! - [`EmbedsSchemas`]: the variant owns child schemas, addressable by a
//!   string key (property name, pattern, index, or `""` for a single
//!   unnamed child). The resolver walks and dereferences through this.
//! - [`BindsNeighbors`]: the variant reads sibling keywords after the whole
//!   table is decoded (`exclusiveMinimum`, `additionalItems`, ...).

use std::collections::{BTreeMap, BTreeSet};

use draft4_core::{JsonType, Numeric};
use regex::Regex;
use serde_json::Value;

use crate::compile::Compiler;
use crate::graph::{Keywords, SlotId};
use crate::keyword::Keyword;

/// A compiled keyword.
#[derive(Debug, Clone)]
pub(crate) enum Constraint {
    Maximum(Maximum),
    Minimum(Minimum),
    ExclusiveMaximum(bool),
    ExclusiveMinimum(bool),
    MultipleOf(Numeric),
    MaxLength(u64),
    MinLength(u64),
    Pattern(Pattern),
    MaxItems(u64),
    MinItems(u64),
    Items(Items),
    AdditionalItems(AdditionalPolicy),
    Properties(Properties),
    PatternProperties(PatternProperties),
    AdditionalProperties(AdditionalProperties),
    Required(BTreeSet<String>),
    MaxProperties(u64),
    MinProperties(u64),
    Dependencies(Dependencies),
    AllOf(Branches),
    AnyOf(Branches),
    OneOf(Branches),
    Not(Negation),
    Enum(Vec<Value>),
    Type(Vec<JsonType>),
    Ref(String),
    Other(Opaque),
}

/// Capability: owns embedded schemas.
pub(crate) trait EmbedsSchemas {
    /// Every embedded schema with its pointer key.
    fn embedded(&self) -> Vec<(String, SlotId)>;

    /// The embedded schema under `key`, if any.
    fn embedded_at(&self, key: &str) -> Option<SlotId> {
        self.embedded()
            .into_iter()
            .find_map(|(k, slot)| (k == key).then_some(slot))
    }
}

/// Capability: finishes configuring itself from sibling keywords.
pub(crate) trait BindsNeighbors {
    fn bind_neighbors(&mut self, siblings: &Keywords);
}

impl Constraint {
    /// Decode the value of a recognized keyword.
    pub(crate) fn decode<'d>(
        keyword: Keyword,
        value: &'d Value,
        compiler: &mut Compiler<'_, 'd>,
    ) -> Result<Self, String> {
        let constraint = match keyword {
            Keyword::Maximum => Self::Maximum(Maximum(Limit::decode(value)?)),
            Keyword::Minimum => Self::Minimum(Minimum(Limit::decode(value)?)),
            Keyword::ExclusiveMaximum => Self::ExclusiveMaximum(decode_bool(value)?),
            Keyword::ExclusiveMinimum => Self::ExclusiveMinimum(decode_bool(value)?),
            Keyword::MultipleOf => {
                let divisor = decode_number(value)?;
                if divisor.as_f64() <= 0.0 {
                    return Err(format!("must be strictly greater than 0, got {divisor}"));
                }
                Self::MultipleOf(divisor)
            }
            Keyword::MaxLength => Self::MaxLength(decode_count(value)?),
            Keyword::MinLength => Self::MinLength(decode_count(value)?),
            Keyword::Pattern => Self::Pattern(Pattern::compile(decode_str(value)?)?),
            Keyword::MaxItems => Self::MaxItems(decode_count(value)?),
            Keyword::MinItems => Self::MinItems(decode_count(value)?),
            Keyword::Items => Self::Items(Items::decode(value, compiler)?),
            Keyword::AdditionalItems => {
                Self::AdditionalItems(AdditionalPolicy::decode(value, compiler)?)
            }
            Keyword::Properties => Self::Properties(Properties::decode(value, compiler)?),
            Keyword::PatternProperties => {
                Self::PatternProperties(PatternProperties::decode(value, compiler)?)
            }
            Keyword::AdditionalProperties => Self::AdditionalProperties(AdditionalProperties {
                policy: AdditionalPolicy::decode(value, compiler)?,
                patterns: Vec::new(),
                subsumed: false,
            }),
            Keyword::Required => Self::Required(decode_string_set(value)?),
            Keyword::MaxProperties => Self::MaxProperties(decode_count(value)?),
            Keyword::MinProperties => Self::MinProperties(decode_count(value)?),
            Keyword::Dependencies => Self::Dependencies(Dependencies::decode(value, compiler)?),
            Keyword::AllOf => Self::AllOf(Branches::decode(value, compiler)?),
            Keyword::AnyOf => Self::AnyOf(Branches::decode(value, compiler)?),
            Keyword::OneOf => Self::OneOf(Branches::decode(value, compiler)?),
            Keyword::Not => Self::Not(Negation(compiler.compile_child(value)?)),
            Keyword::Enum => match value {
                Value::Array(values) => Self::Enum(values.clone()),
                _ => return Err("expected an array".into()),
            },
            Keyword::Type => Self::Type(decode_types(value)?),
            Keyword::Ref => Self::Ref(decode_str(value)?.to_string()),
        };
        Ok(constraint)
    }

    pub(crate) fn as_embedder(&self) -> Option<&dyn EmbedsSchemas> {
        match self {
            Self::Items(c) => Some(c),
            Self::AdditionalItems(c) => Some(c),
            Self::Properties(c) => Some(c),
            Self::PatternProperties(c) => Some(c),
            Self::AdditionalProperties(c) => Some(c),
            Self::Dependencies(c) => Some(c),
            Self::AllOf(c) | Self::AnyOf(c) | Self::OneOf(c) => Some(c),
            Self::Not(c) => Some(c),
            Self::Other(c) => Some(c),
            _ => None,
        }
    }

    pub(crate) fn as_binder(&mut self) -> Option<&mut dyn BindsNeighbors> {
        match self {
            Self::Maximum(c) => Some(c),
            Self::Minimum(c) => Some(c),
            Self::Items(c) => Some(c),
            Self::Properties(c) => Some(c),
            Self::PatternProperties(c) => Some(c),
            Self::AdditionalProperties(c) => Some(c),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Numeric
// ---------------------------------------------------------------------------

/// A numeric bound with its exclusivity flag.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Limit {
    pub(crate) limit: Numeric,
    pub(crate) exclusive: bool,
}

impl Limit {
    fn decode(value: &Value) -> Result<Self, String> {
        Ok(Self {
            limit: decode_number(value)?,
            exclusive: false,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Maximum(pub(crate) Limit);

#[derive(Debug, Clone, Copy)]
pub(crate) struct Minimum(pub(crate) Limit);

impl BindsNeighbors for Maximum {
    fn bind_neighbors(&mut self, siblings: &Keywords) {
        self.0.exclusive = matches!(
            siblings.get("exclusiveMaximum"),
            Some(Constraint::ExclusiveMaximum(true))
        );
    }
}

impl BindsNeighbors for Minimum {
    fn bind_neighbors(&mut self, siblings: &Keywords) {
        self.0.exclusive = matches!(
            siblings.get("exclusiveMinimum"),
            Some(Constraint::ExclusiveMinimum(true))
        );
    }
}

// ---------------------------------------------------------------------------
// String
// ---------------------------------------------------------------------------

/// A compiled regular expression together with its source text.
#[derive(Debug, Clone)]
pub(crate) struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub(crate) fn compile(source: &str) -> Result<Self, String> {
        let regex = Regex::new(source).map_err(|e| format!("invalid pattern '{source}': {e}"))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Unanchored search.
    pub(crate) fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.source
    }
}

// ---------------------------------------------------------------------------
// Array
// ---------------------------------------------------------------------------

/// What happens to elements or members no other schema claims.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum AdditionalPolicy {
    #[default]
    Allowed,
    Forbidden,
    Schema(SlotId),
}

impl AdditionalPolicy {
    fn decode<'d>(value: &'d Value, compiler: &mut Compiler<'_, 'd>) -> Result<Self, String> {
        match value {
            Value::Bool(true) => Ok(Self::Allowed),
            Value::Bool(false) => Ok(Self::Forbidden),
            Value::Object(_) => Ok(Self::Schema(compiler.compile_child(value)?)),
            _ => Err("expected a boolean or a schema".into()),
        }
    }
}

impl EmbedsSchemas for AdditionalPolicy {
    fn embedded(&self) -> Vec<(String, SlotId)> {
        match self {
            Self::Schema(slot) => vec![(String::new(), *slot)],
            Self::Allowed | Self::Forbidden => Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum ItemsShape {
    Single(SlotId),
    Positional(Vec<SlotId>),
}

#[derive(Debug, Clone)]
pub(crate) struct Items {
    pub(crate) shape: ItemsShape,
    /// Bound from `additionalItems`; governs elements past a positional list.
    pub(crate) additional: AdditionalPolicy,
}

impl Items {
    fn decode<'d>(value: &'d Value, compiler: &mut Compiler<'_, 'd>) -> Result<Self, String> {
        let shape = match value {
            Value::Object(_) => ItemsShape::Single(compiler.compile_child(value)?),
            Value::Array(elements) => ItemsShape::Positional(compiler.compile_children(elements)?),
            _ => return Err("expected a schema or an array of schemas".into()),
        };
        Ok(Self {
            shape,
            additional: AdditionalPolicy::Allowed,
        })
    }
}

impl EmbedsSchemas for Items {
    fn embedded(&self) -> Vec<(String, SlotId)> {
        match &self.shape {
            ItemsShape::Single(slot) => vec![(String::new(), *slot)],
            ItemsShape::Positional(slots) => indexed(slots),
        }
    }
}

impl BindsNeighbors for Items {
    fn bind_neighbors(&mut self, siblings: &Keywords) {
        if let Some(Constraint::AdditionalItems(policy)) = siblings.get("additionalItems") {
            self.additional = *policy;
        }
    }
}

// ---------------------------------------------------------------------------
// Object
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub(crate) struct PatternSchema {
    pub(crate) pattern: Pattern,
    pub(crate) schema: SlotId,
}

fn decode_pattern_schemas<'d>(
    value: &'d Value,
    compiler: &mut Compiler<'_, 'd>,
) -> Result<Vec<PatternSchema>, String> {
    let Value::Object(map) = value else {
        return Err("expected an object of schemas".into());
    };
    map.iter()
        .map(|(source, schema)| {
            Ok(PatternSchema {
                pattern: Pattern::compile(source)?,
                schema: compiler.compile_child(schema)?,
            })
        })
        .collect()
}

/// `properties`, evaluated jointly with the bound `patternProperties` and
/// `additionalProperties` siblings.
#[derive(Debug, Clone)]
pub(crate) struct Properties {
    pub(crate) members: BTreeMap<String, SlotId>,
    pub(crate) patterns: Vec<PatternSchema>,
    pub(crate) additional: AdditionalPolicy,
}

impl Properties {
    fn decode<'d>(value: &'d Value, compiler: &mut Compiler<'_, 'd>) -> Result<Self, String> {
        let Value::Object(map) = value else {
            return Err("expected an object of schemas".into());
        };
        let mut members = BTreeMap::new();
        for (name, schema) in map {
            members.insert(name.clone(), compiler.compile_child(schema)?);
        }
        Ok(Self {
            members,
            patterns: Vec::new(),
            additional: AdditionalPolicy::Allowed,
        })
    }
}

impl EmbedsSchemas for Properties {
    fn embedded(&self) -> Vec<(String, SlotId)> {
        self.members
            .iter()
            .map(|(name, slot)| (name.clone(), *slot))
            .collect()
    }
}

impl BindsNeighbors for Properties {
    fn bind_neighbors(&mut self, siblings: &Keywords) {
        if let Some(Constraint::PatternProperties(p)) = siblings.get("patternProperties") {
            self.patterns = p.patterns.clone();
        }
        if let Some(Constraint::AdditionalProperties(a)) = siblings.get("additionalProperties") {
            self.additional = a.policy;
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct PatternProperties {
    pub(crate) patterns: Vec<PatternSchema>,
    /// A `properties` sibling evaluates these patterns itself.
    pub(crate) subsumed: bool,
}

impl PatternProperties {
    fn decode<'d>(value: &'d Value, compiler: &mut Compiler<'_, 'd>) -> Result<Self, String> {
        Ok(Self {
            patterns: decode_pattern_schemas(value, compiler)?,
            subsumed: false,
        })
    }
}

impl EmbedsSchemas for PatternProperties {
    fn embedded(&self) -> Vec<(String, SlotId)> {
        self.patterns
            .iter()
            .map(|p| (p.pattern.as_str().to_string(), p.schema))
            .collect()
    }
}

impl BindsNeighbors for PatternProperties {
    fn bind_neighbors(&mut self, siblings: &Keywords) {
        self.subsumed = matches!(siblings.get("properties"), Some(Constraint::Properties(_)));
    }
}

#[derive(Debug, Clone)]
pub(crate) struct AdditionalProperties {
    pub(crate) policy: AdditionalPolicy,
    /// Bound from `patternProperties`: members matching these are not additional.
    pub(crate) patterns: Vec<PatternSchema>,
    /// A `properties` sibling applies this policy itself.
    pub(crate) subsumed: bool,
}

impl EmbedsSchemas for AdditionalProperties {
    fn embedded(&self) -> Vec<(String, SlotId)> {
        self.policy.embedded()
    }
}

impl BindsNeighbors for AdditionalProperties {
    fn bind_neighbors(&mut self, siblings: &Keywords) {
        self.subsumed = matches!(siblings.get("properties"), Some(Constraint::Properties(_)));
        if let Some(Constraint::PatternProperties(p)) = siblings.get("patternProperties") {
            self.patterns = p.patterns.clone();
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Dependencies {
    pub(crate) schemas: BTreeMap<String, SlotId>,
    pub(crate) properties: BTreeMap<String, Vec<String>>,
}

impl Dependencies {
    fn decode<'d>(value: &'d Value, compiler: &mut Compiler<'_, 'd>) -> Result<Self, String> {
        let Value::Object(map) = value else {
            return Err("expected an object".into());
        };
        let mut deps = Self::default();
        for (name, dependency) in map {
            match dependency {
                Value::Object(_) => {
                    deps.schemas
                        .insert(name.clone(), compiler.compile_child(dependency)?);
                }
                Value::Array(_) => match decode_string_set(dependency) {
                    Ok(set) => {
                        deps.properties.insert(name.clone(), set.into_iter().collect());
                    }
                    Err(reason) => {
                        tracing::debug!(dependency = %name, "skipping dependency: {reason}");
                    }
                },
                _ => {
                    tracing::debug!(
                        dependency = %name,
                        "skipping dependency: expected a schema or a list of property names"
                    );
                }
            }
        }
        if !map.is_empty() && deps.schemas.is_empty() && deps.properties.is_empty() {
            return Err("no valid schema or property dependencies".into());
        }
        Ok(deps)
    }
}

impl EmbedsSchemas for Dependencies {
    fn embedded(&self) -> Vec<(String, SlotId)> {
        self.schemas
            .iter()
            .map(|(name, slot)| (name.clone(), *slot))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Combinators
// ---------------------------------------------------------------------------

/// The branch list of `allOf` / `anyOf` / `oneOf`.
#[derive(Debug, Clone)]
pub(crate) struct Branches(pub(crate) Vec<SlotId>);

impl Branches {
    fn decode<'d>(value: &'d Value, compiler: &mut Compiler<'_, 'd>) -> Result<Self, String> {
        // An empty list is kept: `anyOf` / `oneOf` then reject everything
        // and `allOf` accepts everything.
        match value {
            Value::Array(elements) => Ok(Self(compiler.compile_children(elements)?)),
            _ => Err("expected an array of schemas".into()),
        }
    }
}

impl EmbedsSchemas for Branches {
    fn embedded(&self) -> Vec<(String, SlotId)> {
        indexed(&self.0)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Negation(pub(crate) SlotId);

impl EmbedsSchemas for Negation {
    fn embedded(&self) -> Vec<(String, SlotId)> {
        vec![(String::new(), self.0)]
    }
}

// ---------------------------------------------------------------------------
// Opaque
// ---------------------------------------------------------------------------

/// An unrecognized keyword. Never constrains anything, but exposes any
/// schemas it contains so `$ref` can reach them (`definitions`, vendor
/// extensions).
#[derive(Debug, Clone, Default)]
pub(crate) struct Opaque {
    pub(crate) children: BTreeMap<String, SlotId>,
}

impl Opaque {
    /// Never fails: a value with no schema shape simply exposes nothing.
    pub(crate) fn decode<'d>(value: &'d Value, compiler: &mut Compiler<'_, 'd>) -> Self {
        let mut children = BTreeMap::new();
        match value {
            Value::Object(map) => {
                // Members already compiled as part of `whole` come back
                // from the compiler's cache.
                let whole = compiler.compile_object(map);
                if map.values().all(Value::is_object) {
                    for (name, member) in map {
                        if let Value::Object(object) = member {
                            children.insert(name.clone(), compiler.compile_object(object));
                        }
                    }
                }
                children.insert(String::new(), whole);
            }
            Value::Array(elements) if elements.iter().all(Value::is_object) => {
                for (index, object) in elements.iter().filter_map(Value::as_object).enumerate() {
                    children.insert(index.to_string(), compiler.compile_object(object));
                }
            }
            _ => {}
        }
        Self { children }
    }
}

impl EmbedsSchemas for Opaque {
    fn embedded(&self) -> Vec<(String, SlotId)> {
        self.children
            .iter()
            .map(|(key, slot)| (key.clone(), *slot))
            .collect()
    }

    fn embedded_at(&self, key: &str) -> Option<SlotId> {
        self.children.get(key).copied()
    }
}

// ---------------------------------------------------------------------------
// Decoding helpers
// ---------------------------------------------------------------------------

fn indexed(slots: &[SlotId]) -> Vec<(String, SlotId)> {
    slots
        .iter()
        .enumerate()
        .map(|(index, slot)| (index.to_string(), *slot))
        .collect()
}

fn decode_bool(value: &Value) -> Result<bool, String> {
    value.as_bool().ok_or_else(|| "expected a boolean".to_string())
}

fn decode_str(value: &Value) -> Result<&str, String> {
    value.as_str().ok_or_else(|| "expected a string".to_string())
}

fn decode_number(value: &Value) -> Result<Numeric, String> {
    match value {
        Value::Number(n) => Numeric::from_number(n).map_err(|e| e.to_string()),
        _ => Err("expected a number".into()),
    }
}

fn decode_count(value: &Value) -> Result<u64, String> {
    match value {
        Value::Number(n) => match (n.as_u64(), n.as_i64()) {
            (Some(count), _) => Ok(count),
            (None, Some(negative)) => Err(format!("cannot be smaller than zero, got {negative}")),
            (None, None) => Err(format!("expected a non-negative integer, got {n}")),
        },
        _ => Err("expected a non-negative integer".into()),
    }
}

fn decode_string_set(value: &Value) -> Result<BTreeSet<String>, String> {
    let Value::Array(items) = value else {
        return Err("expected an array of strings".into());
    };
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| format!("expected a string, got {item}"))
        })
        .collect()
}

fn decode_types(value: &Value) -> Result<Vec<JsonType>, String> {
    match value {
        Value::String(name) => Ok(vec![name.parse()?]),
        Value::Array(names) if !names.is_empty() => names
            .iter()
            .map(|name| {
                name.as_str()
                    .ok_or_else(|| format!("expected a type name, got {name}"))?
                    .parse::<JsonType>()
            })
            .collect(),
        Value::Array(_) => Err("must list at least one type".into()),
        _ => Err("expected a type name or an array of type names".into()),
    }
}
