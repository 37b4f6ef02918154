//! Rounded-corner radius value

use std::fmt;

use crate::error::{Result, TransformError};
use crate::param::IntoScalar;

/// Corner radius: one value for all corners, or 2-4 positional values
/// (`top_left:top_right:bottom_right:bottom_left` with CSS-like shorthands).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Radius {
    value: String,
}

impl Radius {
    /// Same radius on every corner
    pub fn new(all: impl IntoScalar) -> Result<Self> {
        Self::from_corners(vec![all.into_scalar()])
    }

    pub fn pair(
        top_left_bottom_right: impl IntoScalar,
        top_right_bottom_left: impl IntoScalar,
    ) -> Result<Self> {
        Self::from_corners(vec![
            top_left_bottom_right.into_scalar(),
            top_right_bottom_left.into_scalar(),
        ])
    }

    pub fn triple(
        top_left: impl IntoScalar,
        top_right_bottom_left: impl IntoScalar,
        bottom_right: impl IntoScalar,
    ) -> Result<Self> {
        Self::from_corners(vec![
            top_left.into_scalar(),
            top_right_bottom_left.into_scalar(),
            bottom_right.into_scalar(),
        ])
    }

    pub fn quad(
        top_left: impl IntoScalar,
        top_right: impl IntoScalar,
        bottom_right: impl IntoScalar,
        bottom_left: impl IntoScalar,
    ) -> Result<Self> {
        Self::from_corners(vec![
            top_left.into_scalar(),
            top_right.into_scalar(),
            bottom_right.into_scalar(),
            bottom_left.into_scalar(),
        ])
    }

    /// Build from a collection of 1 to 4 corner values.
    pub fn from_values<I, V>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: IntoScalar,
    {
        Self::from_corners(values.into_iter().map(IntoScalar::into_scalar).collect())
    }

    /// Fully rounded (circle/ellipse)
    pub fn max() -> Self {
        Self {
            value: "max".to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    fn from_corners(corners: Vec<String>) -> Result<Self> {
        if corners.is_empty() || corners.len() > 4 {
            return Err(TransformError::InvalidRadius(format!(
                "Radius requires 1 to 4 values, got {}",
                corners.len()
            )));
        }

        if let Some(index) = corners.iter().position(|c| c.trim().is_empty()) {
            return Err(TransformError::InvalidRadius(format!(
                "Radius value at position {} must not be empty",
                index
            )));
        }

        Ok(Self {
            value: corners.join(":"),
        })
    }
}

impl fmt::Display for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
