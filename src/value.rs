//! Decoded document tree.
//!
//! Both decoders (JSON and YAML) lower into this one closed enum so the
//! accumulator only has to know a single shape. Object keys live in a
//! `BTreeMap`: the summary never sees document key order.
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Number kept as its source text; classified when observed.
    Number(String),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
    /// Decoded, but not representable here (e.g. YAML mapping with non-string keys).
    Unsupported,
}

impl Value {
    /// RFC 6901 lookup, same contract as `serde_json::Value::pointer`.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        if pointer.is_empty() {
            return Some(self);
        }
        if !pointer.starts_with('/') {
            return None;
        }
        pointer
            .split('/')
            .skip(1)
            .map(|token| token.replace("~1", "/").replace("~0", "~"))
            .try_fold(self, |target, token| match target {
                Value::Object(map) => map.get(&token),
                Value::Array(list) => parse_index(&token).and_then(|i| list.get(i)),
                _ => None,
            })
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Unsupported => "unsupported",
        }
    }
}

impl From<&Value> for serde_json::Value {
    /// Unsupported nodes and non-finite floats become `null`.
    fn from(value: &Value) -> Self {
        match value {
            Value::Null | Value::Unsupported => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::Number(text) => text
                .parse::<serde_json::Number>()
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(xs) => xs.iter().map(serde_json::Value::from).collect(),
            Value::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), serde_json::Value::from(v))).collect(),
            ),
        }
    }
}

fn parse_index(token: &str) -> Option<usize> {
    if token.starts_with('+') || (token.starts_with('0') && token.len() != 1) {
        return None;
    }
    token.parse().ok()
}

// ------------------------------ From JSON -------------------------------- //

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => from_json_number(&n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(xs) => Value::Array(xs.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(m) => {
                Value::Object(m.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

/// JSON numbers keep their source text (`-0`, `1e400` and 30-digit
/// integers included); observation classifies the token.
fn from_json_number(n: &serde_json::Number) -> Value {
    Value::Number(n.to_string())
}

// ------------------------------ From YAML -------------------------------- //

impl From<serde_yaml::Value> for Value {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => Value::Bool(b),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Number(u.to_string())
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_yaml::Value::String(s) => Value::String(s),
            serde_yaml::Value::Sequence(xs) => {
                Value::Array(xs.into_iter().map(Value::from).collect())
            }
            serde_yaml::Value::Mapping(m) => {
                let mut out = BTreeMap::new();
                for (k, v) in m {
                    match k {
                        serde_yaml::Value::String(k) => {
                            out.insert(k, Value::from(v));
                        }
                        _ => return Value::Unsupported,
                    }
                }
                Value::Object(out)
            }
            serde_yaml::Value::Tagged(tagged) => Value::from(tagged.value),
        }
    }
}

// ------------------------------- Tests ----------------------------------- //
