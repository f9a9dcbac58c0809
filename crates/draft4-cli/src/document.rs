//! Loading schema and instance files.
//!
//! `.yaml` / `.yml` files are parsed as YAML and converted to the
//! equivalent JSON tree; everything else is parsed as JSON.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::{Map, Number, Value};

/// Read and decode one JSON or YAML document.
pub fn load_document(path: &Path) -> Result<Value> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    if !is_yaml {
        return serde_json::from_slice(&bytes)
            .with_context(|| format!("failed to parse JSON {}", path.display()));
    }
    let yaml: serde_yaml::Value = serde_yaml::from_slice(&bytes)
        .with_context(|| format!("failed to parse YAML {}", path.display()))?;
    yaml_to_json(yaml).with_context(|| format!("cannot convert {} to JSON", path.display()))
}

/// Convert a YAML tree to JSON.
///
/// Integer scalars stay integers so `type: integer` means the same for
/// both input formats. Scalar mapping keys are written out as strings.
/// Tagged values and non-finite floats have no JSON form and are rejected.
pub fn yaml_to_json(yaml: serde_yaml::Value) -> Result<Value> {
    use serde_yaml::Value as Yaml;

    Ok(match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::String(s) => Value::String(s),
        Yaml::Number(n) => Value::Number(json_number(&n)?),
        Yaml::Sequence(items) => {
            Value::Array(items.into_iter().map(yaml_to_json).collect::<Result<_>>()?)
        }
        Yaml::Mapping(entries) => {
            let mut object = Map::with_capacity(entries.len());
            for (key, value) in entries {
                let key = match key {
                    Yaml::String(s) => s,
                    Yaml::Bool(b) => b.to_string(),
                    Yaml::Number(n) => n.to_string(),
                    other => bail!("mapping key {other:?} is not a scalar"),
                };
                object.insert(key, yaml_to_json(value)?);
            }
            Value::Object(object)
        }
        Yaml::Tagged(tagged) => bail!("tagged value {} is not supported", tagged.tag),
    })
}

fn json_number(n: &serde_yaml::Number) -> Result<Number> {
    if let Some(i) = n.as_i64() {
        return Ok(i.into());
    }
    if let Some(u) = n.as_u64() {
        return Ok(u.into());
    }
    n.as_f64()
        .and_then(Number::from_f64)
        .ok_or_else(|| anyhow!("{n} has no JSON representation"))
}
