//! Transformation model
//!
//! A [`Transformation`] is an ordered set of named parameters (the currently
//! open segment) plus the chained segments that precede it. Setters are
//! fluent and consume `self`; image and video setters live in the
//! [`image`] and [`video`] submodules, serialization in [`generate`].
//!
//! # Example
//!
//! ```rust
//! use vista_transform::Transformation;
//!
//! let path = Transformation::new()
//!     .width(100)
//!     .chain()
//!     .crop("fill")
//!     .generate()
//!     .unwrap();
//! assert_eq!(path, "w_100/c_fill");
//! ```

pub mod generate;
pub mod image;
pub mod video;

use serde_json::Value;

use crate::condition::Condition;
use crate::error::{Result, TransformError};
use crate::expression::{check_variable_name, Expression};
use crate::param::{format_float, IntoScalar, ParamValue};
use crate::transformation::video::{check_keyframe_interval, check_offset_values, CodecSpec};

pub(crate) const IF: &str = "if";
const IF_ELSE: &str = "else";
const IF_END: &str = "end";

#[derive(Debug, Clone, Default)]
pub struct Transformation {
    params: Vec<(String, ParamValue)>,
    nested: Vec<Transformation>,
    html_width: Option<String>,
    html_height: Option<String>,
}

impl Transformation {
    /// Create an empty transformation
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a single segment from `(name, value)` pairs.
    pub fn from_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParamValue>,
    {
        params
            .into_iter()
            .fold(Self::new(), |t, (key, value)| t.add(key, value))
    }

    /// Build a chain where every given transformation becomes one segment.
    pub fn from_chain(segments: Vec<Transformation>) -> Self {
        Self {
            nested: segments,
            ..Self::default()
        }
    }

    /// Build from a JSON parameter object, or an array of objects (one per
    /// chained segment).
    ///
    /// # Errors
    /// `UnsupportedValue` for values the parameter model cannot hold
    /// (nested objects other than a video codec, arrays of objects...).
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Object(map) => {
                let mut transformation = Self::new();
                for (key, value) in map {
                    if let Some(param) = json_param(key, value)? {
                        check_json_param(key, &param)?;
                        transformation.set(key.clone(), param);
                    }
                }
                Ok(transformation)
            }
            Value::Array(segments) => {
                let segments = segments
                    .iter()
                    .map(Self::from_json)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::from_chain(segments))
            }
            other => Err(TransformError::UnsupportedValue {
                key: "<root>".to_string(),
                kind: json_kind(other).to_string(),
            }),
        }
    }

    // =========================================================================
    // PARAMETERS
    // =========================================================================

    /// Set a parameter. Setting an existing key replaces its value.
    pub fn add(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(key.into(), value.into());
        self
    }

    pub(crate) fn set(&mut self, key: String, value: ParamValue) {
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.params.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub(crate) fn get_scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ParamValue::as_scalar)
    }

    /// Parameters of the open segment, in insertion order.
    pub fn params(&self) -> &[(String, ParamValue)] {
        &self.params
    }

    /// Chained segments preceding the open one.
    pub fn nested(&self) -> &[Transformation] {
        &self.nested
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty() && self.nested.is_empty()
    }

    /// Freeze the open parameters into a new chained segment and start an
    /// empty one.
    pub fn chain(mut self) -> Self {
        let segment = Transformation {
            params: std::mem::take(&mut self.params),
            nested: Vec::new(),
            html_width: self.html_width.take(),
            html_height: self.html_height.take(),
        };
        self.nested.push(segment);
        self
    }

    // =========================================================================
    // CONDITIONALS
    // =========================================================================

    /// Start a conditional block. The predicate is normalized at generation
    /// time, so both `"w_gt_1000"` and `"width > 1000"` are accepted.
    pub fn if_condition(self, condition: impl Into<String>) -> Self {
        self.add(IF, condition.into())
    }

    /// Start a conditional block with the [`Condition`] builder; finish it
    /// with [`Condition::then`].
    pub fn if_condition_builder(self) -> Condition {
        Condition::with_parent(self)
    }

    /// Close the current branch and open the `else` branch.
    pub fn if_else(self) -> Self {
        self.chain().add(IF, IF_ELSE)
    }

    /// Close the conditional block with an `if_end` segment.
    ///
    /// When the block spans several segments, `if`/`else` markers sharing a
    /// segment with other parameters are moved into a segment of their own,
    /// so that the condition brackets the whole block.
    pub fn end_if(self) -> Self {
        let mut chained = self.chain();
        chained.relocate_if_markers();
        chained.add(IF, IF_END).chain()
    }

    fn relocate_if_markers(&mut self) {
        let Some(last) = self.nested.len().checked_sub(1) else {
            return;
        };

        let mut markers = Vec::new();
        let mut start = None;
        for index in (0..=last).rev() {
            let Some(value) = self.nested[index].get_scalar(IF) else {
                continue;
            };
            if value == IF_END {
                break;
            }
            markers.push(index);
            if value != IF_ELSE {
                start = Some(index);
                break;
            }
        }

        let Some(start) = start else {
            return;
        };
        if last == start {
            return;
        }

        // markers are in descending order, so inserting keeps earlier indices valid
        for index in markers {
            let segment = &mut self.nested[index];
            if segment.params.len() < 2 {
                continue;
            }
            let Some(position) = segment.params.iter().position(|(k, _)| k == IF) else {
                continue;
            };
            let (key, value) = segment.params.remove(position);
            tracing::debug!(
                segment = index,
                condition = ?value.as_scalar(),
                "Moved conditional marker into its own segment"
            );
            self.nested.insert(
                index,
                Transformation {
                    params: vec![(key, value)],
                    ..Transformation::default()
                },
            );
        }
    }

    // =========================================================================
    // VARIABLES
    // =========================================================================

    /// Define a user variable (`$name_value`). The value may be an
    /// expression using nice names (`"initial_width * 0.5"`).
    ///
    /// # Errors
    /// `InvalidVariableName` for names not matching `^\$[a-zA-Z][a-zA-Z0-9]*$`.
    pub fn variable(self, name: &str, value: impl IntoScalar) -> Result<Self> {
        check_variable_name(name)?;
        Ok(self.add(name, value.into_scalar()))
    }

    /// Define a string-list variable, rendered as `!a:b:c!`.
    pub fn variable_list<I, S>(self, name: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        check_variable_name(name)?;
        let joined = values
            .into_iter()
            .map(|v| v.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(":");
        Ok(self.add(name, format!("!{}!", joined)))
    }

    /// Explicit variable assignments, emitted after the `$name` parameters
    /// in the given order.
    pub fn variables(self, variables: Vec<Expression>) -> Self {
        self.add("variables", variables)
    }

    // =========================================================================
    // MISC
    // =========================================================================

    /// Append a pre-built transformation string verbatim at the end of the
    /// segment.
    pub fn raw_transformation(self, raw: impl Into<String>) -> Self {
        self.add("raw_transformation", raw.into())
    }

    /// Apply named transformations (`t_a.b`).
    pub fn named<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        self.add("transformation", names)
    }

    /// Append the responsive width segment (`w_auto,c_limit` by default)
    /// after this segment.
    pub fn responsive_width(self, responsive: bool) -> Self {
        self.add("responsive_width", responsive)
    }

    /// Width reported for the companion `<img>` attribute.
    pub fn html_width(mut self, width: impl IntoScalar) -> Self {
        self.html_width = Some(width.into_scalar());
        self
    }

    /// Height reported for the companion `<img>` attribute.
    pub fn html_height(mut self, height: impl IntoScalar) -> Self {
        self.html_height = Some(height.into_scalar());
        self
    }

    pub(crate) fn html_width_value(&self) -> Option<&str> {
        self.html_width.as_deref()
    }

    pub(crate) fn html_height_value(&self) -> Option<&str> {
        self.html_height.as_deref()
    }
}

fn json_param(key: &str, value: &Value) -> Result<Option<ParamValue>> {
    let param = match value {
        Value::Null => return Ok(None),
        Value::String(s) => ParamValue::Scalar(s.clone()),
        Value::Bool(b) => ParamValue::from(*b),
        Value::Number(n) => ParamValue::Scalar(json_number(n)),
        Value::Array(items) => ParamValue::List(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    Value::Number(n) => Ok(json_number(n)),
                    Value::Bool(b) => Ok(b.to_string()),
                    other => Err(TransformError::UnsupportedValue {
                        key: key.to_string(),
                        kind: format!("array of {}", json_kind(other)),
                    }),
                })
                .collect::<Result<Vec<_>>>()?,
        ),
        Value::Object(_) if key == "video_codec" => {
            let spec: CodecSpec =
                serde_json::from_value(value.clone()).map_err(|_| TransformError::UnsupportedValue {
                    key: key.to_string(),
                    kind: "object".to_string(),
                })?;
            ParamValue::Codec(spec)
        }
        Value::Object(_) => {
            return Err(TransformError::UnsupportedValue {
                key: key.to_string(),
                kind: "object".to_string(),
            })
        }
    };
    Ok(Some(param))
}

/// Argument checks the fluent setters apply, for parameters read from JSON.
fn check_json_param(key: &str, param: &ParamValue) -> Result<()> {
    if key.starts_with('$') {
        check_variable_name(key)?;
    }
    match (key, param) {
        ("offset", ParamValue::List(values)) => check_offset_values(values.len()),
        ("keyframe_interval", ParamValue::Scalar(interval)) => check_keyframe_interval(interval),
        _ => Ok(()),
    }
}

fn json_number(n: &serde_json::Number) -> String {
    if n.is_f64() {
        n.as_f64().map(format_float).unwrap_or_else(|| n.to_string())
    } else {
        n.to_string()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
