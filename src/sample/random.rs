//! Random synthesizer
//!
//! Walks a JSON Schema and draws a conforming value from a seedable RNG.
//! Covers the keywords state schemas actually use; `allOf` branches are
//! merged before generation so contradictions surface as `Unsatisfiable`.

use chrono::{DateTime, Utc};
use jsonschema::JSONSchema;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::{json, Map, Number, Value};

use super::Synthesizer;
use crate::config::SampleConfig;
use crate::error::{Result, SpecError};
use crate::registry::DEFAULT_NAMESPACE;

/// Hard limit on schema recursion, catching required self-references
const RECURSION_LIMIT: usize = 64;

/// Width of the range used for numbers bounded on one side only
const OPEN_RANGE: f64 = 100.0;

/// Draws per value before a rejection loop gives up
const ATTEMPTS: usize = 32;

/// 2^63, the first float past the `i64` range
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Largest integer an `f64` holds exactly
const F64_EXACT: f64 = 9_007_199_254_740_992.0;

const TYPES: [&str; 7] = ["null", "boolean", "object", "array", "number", "integer", "string"];

/// Seedable random synthesizer
#[derive(Debug)]
pub struct RandomSynthesizer {
    rng: StdRng,
    config: SampleConfig,
}

impl RandomSynthesizer {
    pub fn new(config: SampleConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, config }
    }

    pub fn config(&self) -> &SampleConfig {
        &self.config
    }
}

impl Synthesizer for RandomSynthesizer {
    fn synthesize(&mut self, schema: &Value) -> Result<Value> {
        let mut walk = Walk {
            root: schema,
            rng: &mut self.rng,
            config: &self.config,
        };
        walk.value(schema, "", 0, 0)
    }
}

struct Walk<'a> {
    root: &'a Value,
    rng: &'a mut StdRng,
    config: &'a SampleConfig,
}

impl<'a> Walk<'a> {
    /// `depth` counts data nesting, `hops` counts every schema step
    fn value(&mut self, schema: &Value, path: &str, depth: usize, hops: usize) -> Result<Value> {
        if hops > RECURSION_LIMIT {
            return Err(SpecError::unsatisfiable(path, "schema recursion does not terminate"));
        }

        let map = match schema {
            Value::Bool(true) => return Ok(Value::Null),
            Value::Bool(false) => return Err(SpecError::unsatisfiable(path, "schema is `false`")),
            Value::Object(map) => map,
            other => {
                return Err(SpecError::InvalidSchema(format!(
                    "schema at {} is not an object: {}",
                    display_path(path),
                    other
                )))
            }
        };

        if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
            let target = self.resolve(reference)?;
            return self.value(target, path, depth, hops + 1);
        }

        if let Some(branches) = map.get("allOf").and_then(Value::as_array) {
            let merged = self.merge_all(map, branches, path, hops)?;
            return self.value(&merged, path, depth, hops + 1);
        }

        if let Some(excluded) = map.get("not") {
            return self.excluding(map, excluded, path, depth, hops);
        }

        if let Some(constant) = map.get("const") {
            return Ok(constant.clone());
        }

        if let Some(options) = map.get("enum").and_then(Value::as_array) {
            return options
                .choose(&mut *self.rng)
                .cloned()
                .ok_or_else(|| SpecError::unsatisfiable(path, "enum has no values"));
        }

        if let Some(branches) = map
            .get("anyOf")
            .or_else(|| map.get("oneOf"))
            .and_then(Value::as_array)
        {
            let first = branches
                .first()
                .ok_or_else(|| SpecError::unsatisfiable(path, "no branch to choose from"))?;
            return self.value(first, path, depth, hops + 1);
        }

        match self.pick_type(map, path)? {
            "object" => self.object(map, path, depth, hops),
            "array" => self.array(map, path, depth, hops),
            "string" => self.string(map, path),
            "integer" => self.integer(map, path),
            "number" => self.number(map, path),
            "boolean" => Ok(Value::Bool(self.rng.gen())),
            _ => Ok(Value::Null),
        }
    }

    fn resolve(&self, reference: &str) -> Result<&'a Value> {
        if reference == "#" {
            return Ok(self.root);
        }
        if let Some(pointer) = reference.strip_prefix('#') {
            return self
                .root
                .pointer(pointer)
                .ok_or_else(|| unresolved(reference));
        }

        let root: &'a Value = self.root;
        let id = reference
            .strip_prefix(DEFAULT_NAMESPACE)
            .unwrap_or(reference)
            .trim_start_matches('/');
        if root.get("id").and_then(Value::as_str) == Some(id) {
            return Ok(root);
        }
        ["definitions", "properties"]
            .iter()
            .find_map(|section| root.get(*section).and_then(|s| s.get(id)))
            .ok_or_else(|| unresolved(reference))
    }

    /// Redraw from the rest of the schema until a value escapes `not`
    fn excluding(
        &mut self,
        map: &Map<String, Value>,
        excluded: &Value,
        path: &str,
        depth: usize,
        hops: usize,
    ) -> Result<Value> {
        let excluded = self.compile_excluded(excluded, path)?;
        let mut rest = map.clone();
        rest.remove("not");
        // Nothing pins the type down, so cycle through all of them
        let open = !rest.contains_key("type") && infer_type(&rest) == "null";

        for attempt in 0..ATTEMPTS {
            if open {
                rest.insert("type".to_string(), json!(TYPES[attempt % TYPES.len()]));
            }
            let candidate = self.value(&Value::Object(rest.clone()), path, depth, hops + 1)?;
            if !excluded.is_valid(&candidate) {
                return Ok(candidate);
            }
        }
        Err(SpecError::unsatisfiable(path, "every candidate matches `not`"))
    }

    fn compile_excluded(&self, excluded: &Value, path: &str) -> Result<JSONSchema> {
        let mut schema = json!({ "allOf": [excluded] });
        if let Some(definitions) = self.root.get("definitions") {
            schema["definitions"] = definitions.clone();
        }
        let compiled = JSONSchema::compile(&schema).map_err(|e| {
            SpecError::InvalidSchema(format!("`not` at {}: {}", display_path(path), e))
        })?;
        Ok(compiled)
    }

    fn pick_type(&mut self, map: &Map<String, Value>, path: &str) -> Result<&'static str> {
        let declared: Vec<&'static str> = match map.get("type") {
            Some(Value::String(t)) => vec![known_type(t, path)?],
            Some(Value::Array(ts)) => ts
                .iter()
                .map(|t| known_type(t.as_str().unwrap_or_default(), path))
                .collect::<Result<_>>()?,
            Some(other) => {
                return Err(SpecError::InvalidSchema(format!("invalid type {}", other)));
            }
            None => return Ok(infer_type(map)),
        };

        declared
            .choose(&mut *self.rng)
            .copied()
            .ok_or_else(|| SpecError::unsatisfiable(path, "type list is empty"))
    }

    fn object(
        &mut self,
        map: &Map<String, Value>,
        path: &str,
        depth: usize,
        hops: usize,
    ) -> Result<Value> {
        let required: Vec<&str> = map
            .get("required")
            .and_then(Value::as_array)
            .map(|r| r.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        let empty = Map::new();
        let properties = map
            .get("properties")
            .and_then(Value::as_object)
            .unwrap_or(&empty);

        let probability = self.config.optional_probability.clamp(0.0, 1.0);
        let mut out = Map::new();
        for (name, schema) in properties {
            let include = required.contains(&name.as_str())
                || (depth < self.config.max_depth && self.rng.gen_bool(probability));
            if include {
                let child = format!("{}/{}", path, name);
                out.insert(name.clone(), self.value(schema, &child, depth + 1, hops + 1)?);
            }
        }

        // Required names without a property schema fall back to additionalProperties
        let fallback = match map.get("additionalProperties") {
            Some(Value::Bool(false)) => None,
            Some(schema @ Value::Object(_)) => Some(schema.clone()),
            _ => Some(json!({})),
        };
        for name in &required {
            if out.contains_key(*name) {
                continue;
            }
            let child = format!("{}/{}", path, name);
            let schema = fallback.as_ref().ok_or_else(|| {
                SpecError::unsatisfiable(&child, "required but forbidden by additionalProperties")
            })?;
            out.insert(name.to_string(), self.value(schema, &child, depth + 1, hops + 1)?);
        }

        let min = map.get("minProperties").and_then(Value::as_u64).unwrap_or(0) as usize;
        let max = map.get("maxProperties").and_then(Value::as_u64).map(|m| m as usize);
        if let Some(max) = max {
            if min > max {
                return Err(SpecError::unsatisfiable(
                    path,
                    format!("minProperties {} > maxProperties {}", min, max),
                ));
            }
            let optional: Vec<String> = out
                .keys()
                .filter(|k| !required.contains(&k.as_str()))
                .cloned()
                .collect();
            let excess = out.len().saturating_sub(max);
            if excess > optional.len() {
                return Err(SpecError::unsatisfiable(
                    path,
                    format!("more required properties than maxProperties {}", max),
                ));
            }
            for name in optional.iter().rev().take(excess) {
                out.remove(name);
            }
        }

        // Declared properties first, then names left to additionalProperties
        for (name, schema) in properties {
            if out.len() >= min {
                break;
            }
            if !out.contains_key(name) {
                let child = format!("{}/{}", path, name);
                out.insert(name.clone(), self.value(schema, &child, depth + 1, hops + 1)?);
            }
        }
        let mut n = 0;
        while out.len() < min {
            let schema = fallback.as_ref().ok_or_else(|| {
                SpecError::unsatisfiable(path, format!("minProperties {} needs undeclared properties", min))
            })?;
            n += 1;
            let name = format!("property{}", n);
            if out.contains_key(&name) {
                continue;
            }
            let child = format!("{}/{}", path, name);
            let value = self.value(schema, &child, depth + 1, hops + 1)?;
            out.insert(name, value);
        }

        Ok(Value::Object(out))
    }

    fn array(
        &mut self,
        map: &Map<String, Value>,
        path: &str,
        depth: usize,
        hops: usize,
    ) -> Result<Value> {
        let unique = map.get("uniqueItems").and_then(Value::as_bool).unwrap_or(false);

        if let Some(tuple) = map.get("items").and_then(Value::as_array) {
            for _ in 0..ATTEMPTS {
                let items = tuple
                    .iter()
                    .enumerate()
                    .map(|(i, schema)| self.value(schema, &format!("{}/{}", path, i), depth + 1, hops + 1))
                    .collect::<Result<Vec<_>>>()?;
                if !unique || !has_duplicates(&items) {
                    return Ok(Value::Array(items));
                }
            }
            return Err(SpecError::unsatisfiable(path, "tuple items are never distinct"));
        }

        let min = map.get("minItems").and_then(Value::as_u64).unwrap_or(0) as usize;
        let max = map.get("maxItems").and_then(Value::as_u64).map(|m| m as usize);
        if let Some(max) = max {
            if min > max {
                return Err(SpecError::unsatisfiable(path, format!("minItems {} > maxItems {}", min, max)));
            }
        }

        let extra = if depth < self.config.max_depth {
            self.rng.gen_range(0..=self.config.max_extra_items)
        } else {
            0
        };
        let len = max.map_or(min + extra, |max| (min + extra).min(max));

        let item_schema = map.get("items").cloned().unwrap_or_else(|| json!({}));
        let mut items: Vec<Value> = Vec::with_capacity(len);
        let mut rejected = 0;
        while items.len() < len {
            let item = self.value(&item_schema, &format!("{}/{}", path, items.len()), depth + 1, hops + 1)?;
            if unique && items.contains(&item) {
                rejected += 1;
                if rejected > ATTEMPTS * len {
                    if items.len() >= min {
                        break;
                    }
                    return Err(SpecError::unsatisfiable(
                        path,
                        format!("fewer than {} distinct items for uniqueItems", min),
                    ));
                }
                continue;
            }
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn string(&mut self, map: &Map<String, Value>, path: &str) -> Result<Value> {
        match map.get("format").and_then(Value::as_str) {
            Some("date-time") => return Ok(Value::String(self.timestamp().to_rfc3339())),
            Some("date") => return Ok(Value::String(self.timestamp().date_naive().to_string())),
            Some("email") => {
                let local = self.alphanumeric(8).to_lowercase();
                return Ok(Value::String(format!("{}@example.com", local)));
            }
            _ => {}
        }

        let min = map.get("minLength").and_then(Value::as_u64).unwrap_or(0) as usize;
        let max = map.get("maxLength").and_then(Value::as_u64).map(|m| m as usize);
        if let Some(max) = max {
            if min > max {
                return Err(SpecError::unsatisfiable(path, format!("minLength {} > maxLength {}", min, max)));
            }
        }

        if let Some(pattern) = map.get("pattern").and_then(Value::as_str) {
            return self.matching(pattern, min, max, path);
        }

        let typical = self.config.string_length.max(min);
        let upper = max.map_or(typical * 2, |max| max.min(typical * 2)).max(min);
        let len = self.rng.gen_range(min..=upper);
        Ok(Value::String(self.alphanumeric(len)))
    }

    /// Draw strings from the regular expression until one fits the length bounds
    fn matching(&mut self, pattern: &str, min: usize, max: Option<usize>, path: &str) -> Result<Value> {
        let check = regex::Regex::new(pattern).map_err(|e| {
            SpecError::InvalidSchema(format!("pattern `{}` at {}: {}", pattern, display_path(path), e))
        })?;
        let max_repeat = self.config.string_length.max(min).max(1) as u32;
        let source = rand_regex::Regex::compile(&generative_pattern(pattern), max_repeat).map_err(|e| {
            SpecError::InvalidSchema(format!("unsupported pattern `{}` at {}: {}", pattern, display_path(path), e))
        })?;

        for _ in 0..ATTEMPTS {
            let candidate: String = self.rng.sample(&source);
            let len = candidate.chars().count();
            if len >= min && max.map_or(true, |max| len <= max) && check.is_match(&candidate) {
                return Ok(Value::String(candidate));
            }
        }
        Err(SpecError::unsatisfiable(
            path,
            format!("no string matching `{}` within the length bounds", pattern),
        ))
    }

    fn integer(&mut self, map: &Map<String, Value>, path: &str) -> Result<Value> {
        let (lo, hi) = bounds(map);
        let mut lo = lo.map(|(v, exclusive)| {
            let c = v.ceil();
            if exclusive && c == v { c + 1.0 } else { c }
        });
        let mut hi = hi.map(|(v, exclusive)| {
            let f = v.floor();
            if exclusive && f == v { f - 1.0 } else { f }
        });
        fill_open_range(&mut lo, &mut hi);
        let (lo, hi) = (lo.unwrap_or(0.0), hi.unwrap_or(OPEN_RANGE));
        if lo >= I64_LIMIT || hi < -I64_LIMIT {
            return Err(SpecError::unsatisfiable(
                path,
                format!("no 64-bit integer in [{}, {}]", lo, hi),
            ));
        }
        // `as` saturates, so an overreaching side clamps to the i64 range
        let (lo, hi) = (lo as i64, hi as i64);

        let step = match map.get("multipleOf").and_then(Value::as_f64).filter(|m| *m > 0.0) {
            None => 1,
            Some(m) => integer_step(m).ok_or_else(|| {
                SpecError::InvalidSchema(format!("multipleOf {} at {} has no integer multiple", m, display_path(path)))
            })?,
        };
        let first = div_ceil(lo, step);
        let last = hi.div_euclid(step);
        if first > last {
            return Err(SpecError::unsatisfiable(path, format!("no integer in [{}, {}]", lo, hi)));
        }
        Ok(json!(self.rng.gen_range(first..=last) * step))
    }

    fn number(&mut self, map: &Map<String, Value>, path: &str) -> Result<Value> {
        let (lo, hi) = bounds(map);
        let exclusive = lo.map_or(false, |(_, e)| e) || hi.map_or(false, |(_, e)| e);
        let mut lo_v = lo.map(|(v, _)| v);
        let mut hi_v = hi.map(|(v, _)| v);
        fill_open_range(&mut lo_v, &mut hi_v);
        let (lo_v, hi_v) = (lo_v.unwrap_or(0.0), hi_v.unwrap_or(OPEN_RANGE));

        if lo_v > hi_v || (exclusive && lo_v == hi_v) {
            return Err(SpecError::unsatisfiable(path, format!("no number in [{}, {}]", lo_v, hi_v)));
        }

        if let Some(step) = map.get("multipleOf").and_then(Value::as_f64).filter(|m| *m > 0.0) {
            let mut first = (lo_v / step).ceil();
            let mut last = (hi_v / step).floor();
            if lo.map_or(false, |(v, e)| e && first * step <= v) {
                first += 1.0;
            }
            if hi.map_or(false, |(v, e)| e && last * step >= v) {
                last -= 1.0;
            }
            if first > last {
                return Err(SpecError::unsatisfiable(
                    path,
                    format!("no multiple of {} in [{}, {}]", step, lo_v, hi_v),
                ));
            }
            if first.abs() > F64_EXACT || last.abs() > F64_EXACT {
                return Err(SpecError::unsatisfiable(path, format!("too many multiples of {} to count", step)));
            }
            let k = self.rng.gen_range(first as i64..=last as i64);
            return Number::from_f64(k as f64 * step)
                .map(Value::Number)
                .ok_or_else(|| SpecError::unsatisfiable(path, "number is not finite"));
        }

        let mut value = if lo_v == hi_v { lo_v } else { self.draw(lo_v, hi_v) };
        let touches_lo = lo.map_or(false, |(v, e)| e && value <= v);
        let touches_hi = hi.map_or(false, |(v, e)| e && value >= v);
        if touches_lo || touches_hi {
            value = lo_v / 2.0 + hi_v / 2.0;
        }

        Number::from_f64(value)
            .map(Value::Number)
            .ok_or_else(|| SpecError::unsatisfiable(path, "number is not finite"))
    }

    /// Uniform draw from `[lo, hi]`, halving ranges wider than `f64::MAX`
    fn draw(&mut self, lo: f64, hi: f64) -> f64 {
        if (hi - lo).is_finite() {
            return self.rng.gen_range(lo..=hi);
        }
        let t: f64 = self.rng.gen();
        (lo / 2.0 + t * (hi / 2.0 - lo / 2.0)) * 2.0
    }

    fn merge_all(
        &self,
        base: &Map<String, Value>,
        branches: &[Value],
        path: &str,
        hops: usize,
    ) -> Result<Value> {
        if hops > RECURSION_LIMIT {
            return Err(SpecError::unsatisfiable(path, "allOf references do not terminate"));
        }
        let mut merged = base.clone();
        merged.remove("allOf");

        for branch in branches {
            let mut branch = match branch {
                Value::Object(map) => map.clone(),
                Value::Bool(true) => continue,
                _ => return Err(SpecError::unsatisfiable(path, "allOf branch is `false` or invalid")),
            };
            let mut followed = 0;
            while let Some(reference) = branch.get("$ref").and_then(Value::as_str).map(str::to_string) {
                followed += 1;
                if followed > RECURSION_LIMIT {
                    return Err(SpecError::unsatisfiable(path, "allOf references do not terminate"));
                }
                branch.remove("$ref");
                if let Value::Object(target) = self.resolve(&reference)? {
                    for (key, value) in target {
                        branch.entry(key.clone()).or_insert_with(|| value.clone());
                    }
                }
            }
            if let Some(nested) = branch.get("allOf").and_then(Value::as_array).cloned() {
                branch = match self.merge_all(&branch, &nested, path, hops + 1)? {
                    Value::Object(map) => map,
                    _ => Map::new(),
                };
            }
            merge_into(&mut merged, branch, path)?;
        }

        Ok(Value::Object(merged))
    }

    fn alphanumeric(&mut self, len: usize) -> String {
        (0..len).map(|_| char::from(self.rng.sample(Alphanumeric))).collect()
    }

    fn timestamp(&mut self) -> DateTime<Utc> {
        let secs = self.rng.gen_range(0..4_102_444_800_i64);
        DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default()
    }
}

/// Merge one `allOf` branch into the accumulated schema
fn merge_into(merged: &mut Map<String, Value>, branch: Map<String, Value>, path: &str) -> Result<()> {
    for (key, value) in branch {
        let existing = match merged.get_mut(&key) {
            Some(existing) => existing,
            None => {
                merged.insert(key, value);
                continue;
            }
        };

        match key.as_str() {
            "type" => {
                let types = intersect_types(existing, &value);
                if types.is_empty() {
                    return Err(SpecError::unsatisfiable(
                        path,
                        format!("type {} conflicts with {}", existing, value),
                    ));
                }
                *existing = json!(types);
            }
            "properties" => {
                if let (Value::Object(ours), Value::Object(theirs)) = (existing, value) {
                    for (name, schema) in theirs {
                        match ours.get_mut(&name) {
                            Some(current) => *current = json!({"allOf": [current.take(), schema]}),
                            None => {
                                ours.insert(name, schema);
                            }
                        }
                    }
                }
            }
            "required" => {
                if let (Value::Array(ours), Value::Array(theirs)) = (existing, value) {
                    for name in theirs {
                        if !ours.contains(&name) {
                            ours.push(name);
                        }
                    }
                }
            }
            "minimum" | "minLength" | "minItems" | "minProperties" | "exclusiveMinimum" => {
                if value.as_f64() > existing.as_f64() {
                    *existing = value;
                }
            }
            "maximum" | "maxLength" | "maxItems" | "maxProperties" | "exclusiveMaximum" => {
                if value.as_f64() < existing.as_f64() {
                    *existing = value;
                }
            }
            "enum" => {
                let theirs = value.as_array().cloned().unwrap_or_default();
                let kept: Vec<Value> = existing
                    .as_array()
                    .map(|ours| ours.iter().filter(|v| theirs.contains(v)).cloned().collect())
                    .unwrap_or_default();
                if kept.is_empty() {
                    return Err(SpecError::unsatisfiable(path, "enum branches share no value"));
                }
                *existing = Value::Array(kept);
            }
            "not" => {
                *existing = json!({"anyOf": [existing.take(), value]});
            }
            "uniqueItems" => {
                if value == Value::Bool(true) {
                    *existing = value;
                }
            }
            "pattern" | "multipleOf" => {
                if *existing != value {
                    return Err(SpecError::InvalidSchema(format!(
                        "allOf at {} combines {} {} with {}",
                        display_path(path),
                        key,
                        existing,
                        value
                    )));
                }
            }
            "const" => {
                if *existing != value {
                    return Err(SpecError::unsatisfiable(
                        path,
                        format!("const {} conflicts with {}", existing, value),
                    ));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn type_set(value: &Value) -> Vec<&str> {
    match value {
        Value::String(t) => vec![t.as_str()],
        Value::Array(ts) => ts.iter().filter_map(Value::as_str).collect(),
        _ => TYPES.to_vec(),
    }
}

/// Types allowed by both sides; `integer` is the overlap of `integer` and `number`
fn intersect_types(a: &Value, b: &Value) -> Vec<String> {
    let (a, b) = (type_set(a), type_set(b));
    let mut out: Vec<String> = Vec::new();
    for t in &a {
        let overlap = if b.contains(t) {
            Some(*t)
        } else if *t == "integer" && b.contains(&"number") || *t == "number" && b.contains(&"integer") {
            Some("integer")
        } else {
            None
        };
        if let Some(t) = overlap {
            if !out.iter().any(|o| o.as_str() == t) {
                out.push(t.to_string());
            }
        }
    }
    out
}

fn known_type(t: &str, path: &str) -> Result<&'static str> {
    TYPES
        .iter()
        .copied()
        .find(|known| *known == t)
        .ok_or_else(|| SpecError::InvalidSchema(format!("unknown type `{}` at {}", t, display_path(path))))
}

fn infer_type(map: &Map<String, Value>) -> &'static str {
    let has = |keys: &[&str]| keys.iter().any(|k| map.contains_key(*k));
    if has(&["properties", "required", "additionalProperties"]) {
        "object"
    } else if has(&["items", "minItems", "maxItems"]) {
        "array"
    } else if has(&["minLength", "maxLength", "format", "pattern"]) {
        "string"
    } else if has(&["minimum", "maximum", "exclusiveMinimum", "exclusiveMaximum"]) {
        "number"
    } else {
        "null"
    }
}

/// Lower and upper bounds with their exclusivity
///
/// Accepts both the numeric `exclusiveMinimum` form and the boolean form
/// that modifies `minimum`.
fn bounds(map: &Map<String, Value>) -> (Option<(f64, bool)>, Option<(f64, bool)>) {
    let side = |inclusive: &str, exclusive: &str| {
        let flag = map.get(exclusive).and_then(Value::as_bool).unwrap_or(false);
        let inc = map.get(inclusive).and_then(Value::as_f64).map(|v| (v, flag));
        let exc = map.get(exclusive).and_then(Value::as_f64).map(|v| (v, true));
        (inc, exc)
    };

    let lo = match side("minimum", "exclusiveMinimum") {
        (Some(a), Some(b)) => Some(if b.0 >= a.0 { b } else { a }),
        (a, b) => a.or(b),
    };
    let hi = match side("maximum", "exclusiveMaximum") {
        (Some(a), Some(b)) => Some(if b.0 <= a.0 { b } else { a }),
        (a, b) => a.or(b),
    };
    (lo, hi)
}

fn fill_open_range(lo: &mut Option<f64>, hi: &mut Option<f64>) {
    match (*lo, *hi) {
        (Some(l), None) => *hi = Some(l + OPEN_RANGE),
        (None, Some(h)) => *lo = Some(h - OPEN_RANGE),
        _ => {}
    }
}

/// Smallest positive integer that is a multiple of `m`
fn integer_step(m: f64) -> Option<i64> {
    (1..=1000)
        .map(|n| n as f64 * m)
        .find(|v| v.fract() == 0.0)
        .filter(|v| *v < I64_LIMIT)
        .map(|v| v as i64)
}

fn has_duplicates(items: &[Value]) -> bool {
    items.iter().enumerate().any(|(i, item)| items[..i].contains(item))
}

/// Pattern to draw from: anchors dropped, ECMA shorthand classes kept ASCII
fn generative_pattern(pattern: &str) -> String {
    let body = pattern.strip_prefix('^').unwrap_or(pattern);
    let body = match body.strip_suffix('$') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => body,
    };
    body.replace(r"\d", "[0-9]").replace(r"\w", "[A-Za-z0-9_]")
}

fn div_ceil(a: i64, b: i64) -> i64 {
    let q = a.div_euclid(b);
    if a.rem_euclid(b) == 0 { q } else { q + 1 }
}

fn unresolved(reference: &str) -> SpecError {
    SpecError::InvalidSchema(format!("unresolved reference: {}", reference))
}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "/" } else { path }
}
