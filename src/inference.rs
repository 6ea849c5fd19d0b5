//! Value summary accumulator.
//!
//! One `ValueSummary` per position in the document shape (root, array
//! element slot, object property). Documents are merged in place; each
//! merge bumps `observations` and at most one kind counter. Everything the
//! synthesizer needs is a count, so no sample values are retained.
pub mod num;
pub mod text;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::value::Value;
use num::NumberToken;

// ------------------------------ State ------------------------------------ //

fn is_zero(n: &usize) -> bool {
    *n == 0
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ValueSummary {
    pub observations: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub empties: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub arrays: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub bools: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub float64s: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub ints: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub nulls: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub objects: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub strings: usize,
    /// Strings that parsed as RFC 3339, counted only while every string did.
    #[serde(skip_serializing_if = "is_zero")]
    pub times: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub bool_strings: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub int_strings: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub float64_strings: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_elements: Option<Box<ValueSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_object_properties: Option<Box<ValueSummary>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub object_properties: BTreeMap<String, ValueSummary>,
}

/// The seven kinds that drive type selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Array,
    Bool,
    Float64,
    Int,
    Null,
    Object,
    String,
}

impl ValueSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: Kind) -> usize {
        match kind {
            Kind::Array => self.arrays,
            Kind::Bool => self.bools,
            Kind::Float64 => self.float64s,
            Kind::Int => self.ints,
            Kind::Null => self.nulls,
            Kind::Object => self.objects,
            Kind::String => self.strings,
        }
    }

    /// Number of kinds observed at least once.
    pub fn distinct_kinds(&self) -> usize {
        [
            Kind::Array,
            Kind::Bool,
            Kind::Float64,
            Kind::Int,
            Kind::Null,
            Kind::Object,
            Kind::String,
        ]
        .into_iter()
        .filter(|&k| self.count(k) > 0)
        .count()
    }

    /// Sum of the kind counters; less than `observations` only when
    /// unsupported values were merged.
    pub fn kind_total(&self) -> usize {
        self.arrays
            + self.bools
            + self.float64s
            + self.ints
            + self.nulls
            + self.objects
            + self.strings
    }

    // ------------------------------ Observe ------------------------------ //

    /// Merges `value` into this position.
    pub fn observe(&mut self, value: &Value) -> &mut Self {
        self.observations += 1;
        match value {
            Value::Array(xs) => {
                self.arrays += 1;
                if xs.is_empty() {
                    self.empties += 1;
                }
                let elements = self.array_elements.get_or_insert_with(Box::default);
                for x in xs {
                    elements.observe(x);
                }
            }
            Value::Bool(b) => {
                self.bools += 1;
                if !b {
                    self.empties += 1;
                }
            }
            Value::Float(f) => self.observe_number(NumberToken::Float(*f)),
            Value::Int(i) => self.observe_number(NumberToken::Int(*i)),
            Value::Number(text) => self.observe_number(num::classify_token(text)),
            Value::Null => self.nulls += 1,
            Value::Object(map) => {
                self.objects += 1;
                if map.is_empty() {
                    self.empties += 1;
                }
                for (key, v) in map {
                    self.all_object_properties
                        .get_or_insert_with(Box::default)
                        .observe(v);
                    self.object_properties.entry(key.clone()).or_default().observe(v);
                }
            }
            Value::String(s) => self.observe_string(s),
            Value::Unsupported => {}
        }
        self
    }

    fn observe_number(&mut self, token: NumberToken) {
        match token {
            NumberToken::Int(_) => self.ints += 1,
            NumberToken::Float(_) => self.float64s += 1,
        }
        if token.is_zero() {
            self.empties += 1;
        }
    }

    fn observe_string(&mut self, s: &str) {
        if s.is_empty() {
            self.empties += 1;
        }
        // Once a non-timestamp string is seen, `times` stays frozen.
        if self.times == self.strings && text::looks_like_time(s) {
            self.times += 1;
        }
        let encoded = text::encoded_kinds(s);
        if encoded.bool_ {
            self.bool_strings += 1;
        }
        if encoded.int {
            self.int_strings += 1;
        }
        if encoded.float {
            self.float64_strings += 1;
        }
        self.strings += 1;
    }

    /// True while every string seen here was a timestamp.
    pub fn all_times(&self) -> bool {
        self.times == self.strings
    }
}

// ------------------------------- Front API -------------------------------- //

pub fn infer_from_values<'a, I>(values: I) -> ValueSummary
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut summary = ValueSummary::new();
    for v in values {
        summary.observe(v);
    }
    summary
}

// ------------------------------- Tests ------------------------------------ //
