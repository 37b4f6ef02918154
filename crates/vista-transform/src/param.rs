//! Parameter values
//!
//! Every value stored in a [`Transformation`](crate::Transformation) is one of
//! the closed [`ParamValue`] variants, so serialization and cloning are total.

use crate::condition::Condition;
use crate::error::Result;
use crate::expression::{Expression, ExpressionBuilder};
use crate::layer::{BaseLayer, FetchLayer, Layer, SubtitlesLayer, TextLayer, VideoLayer};
use crate::radius::Radius;
use crate::transformation::video::CodecSpec;

/// Format a float the way delivery URLs expect it: fixed point, at least one
/// and at most two decimal digits, `.` as separator regardless of locale.
///
/// `1.0` -> `"1.0"`, `0.5` -> `"0.5"`, `0.123` -> `"0.12"`.
pub fn format_float(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    match fixed.strip_suffix('0') {
        Some(trimmed) if !trimmed.ends_with('.') => trimmed.to_string(),
        _ => fixed,
    }
}

/// Conversion into a single scalar token.
pub trait IntoScalar {
    fn into_scalar(self) -> String;
}

macro_rules! scalar_via_to_string {
    ($($t:ty),*) => {
        $(
            impl IntoScalar for $t {
                fn into_scalar(self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

scalar_via_to_string!(i32, i64, u32, u64, usize, bool, String, &str, &String);

impl IntoScalar for f64 {
    fn into_scalar(self) -> String {
        format_float(self)
    }
}

impl IntoScalar for f32 {
    fn into_scalar(self) -> String {
        format_float(self as f64)
    }
}

impl IntoScalar for Expression {
    fn into_scalar(self) -> String {
        self.serialize()
    }
}

impl IntoScalar for Condition {
    fn into_scalar(self) -> String {
        self.serialize()
    }
}

impl IntoScalar for Radius {
    fn into_scalar(self) -> String {
        self.to_string()
    }
}

/// A transformation parameter value.
#[derive(Debug, Clone)]
pub enum ParamValue {
    /// A single formatted token (numbers, booleans, strings, expressions).
    Scalar(String),
    /// Multi-valued parameters such as flags, angles or named transformations.
    List(Vec<String>),
    /// Structured video codec (`codec[:profile[:level]]`).
    Codec(CodecSpec),
    /// Overlay/underlay layer, rendered at generation time.
    Layer(Layer),
    /// Explicit variable assignments.
    Variables(Vec<Expression>),
}

impl ParamValue {
    /// The scalar string, if this value is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            ParamValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// The list items; a scalar is treated as a single-item list.
    pub fn as_list(&self) -> Option<Vec<String>> {
        match self {
            ParamValue::Scalar(s) => Some(vec![s.clone()]),
            ParamValue::List(items) => Some(items.clone()),
            _ => None,
        }
    }

    /// Render the value as it appears in a URL. Lists are dot-joined,
    /// variable assignments comma-joined.
    pub fn render(&self) -> Result<String> {
        Ok(match self {
            ParamValue::Scalar(s) => s.clone(),
            ParamValue::List(items) => items.join("."),
            ParamValue::Codec(spec) => spec.render().unwrap_or_default(),
            ParamValue::Layer(layer) => layer.render()?,
            ParamValue::Variables(vars) => vars
                .iter()
                .map(|v| v.serialize())
                .collect::<Vec<_>>()
                .join(","),
        })
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ParamValue::Scalar(s) => s.is_empty(),
            ParamValue::List(items) => items.is_empty(),
            ParamValue::Codec(spec) => spec.codec.is_none(),
            ParamValue::Layer(_) => false,
            ParamValue::Variables(vars) => vars.is_empty(),
        }
    }
}

macro_rules! scalar_param {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ParamValue {
                fn from(value: $t) -> Self {
                    ParamValue::Scalar(value.into_scalar())
                }
            }
        )*
    };
}

scalar_param!(
    i32, i64, u32, u64, usize, bool, f32, f64, String, &str, &String, Expression, Condition, Radius
);

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::List(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        ParamValue::List(values.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for ParamValue {
    fn from(values: &[&str]) -> Self {
        ParamValue::List(values.iter().map(|v| v.to_string()).collect())
    }
}

impl From<CodecSpec> for ParamValue {
    fn from(spec: CodecSpec) -> Self {
        ParamValue::Codec(spec)
    }
}

impl From<Vec<Expression>> for ParamValue {
    fn from(vars: Vec<Expression>) -> Self {
        ParamValue::Variables(vars)
    }
}

impl From<Layer> for ParamValue {
    fn from(layer: Layer) -> Self {
        ParamValue::Layer(layer)
    }
}

macro_rules! layer_param {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ParamValue {
                fn from(layer: $t) -> Self {
                    ParamValue::Layer(Layer::from(layer))
                }
            }
        )*
    };
}

layer_param!(BaseLayer, TextLayer, SubtitlesLayer, VideoLayer, FetchLayer);
