//! Video transformation setters and range/offset/codec normalization

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Transformation;
use crate::error::{Result, TransformError};
use crate::param::{IntoScalar, ParamValue};

static RANGE_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^((?:\d+\.)?\d+)([%pP])?$").unwrap());

static RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.)?\d+[%pP]?\.\.(\d+\.)?\d+[%pP]?$").unwrap());

/// Structured video codec (`codec[:profile[:level]]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecSpec {
    pub codec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl CodecSpec {
    pub fn new(codec: impl Into<String>) -> Self {
        Self {
            codec: Some(codec.into()),
            ..Self::default()
        }
    }

    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn level(mut self, level: impl IntoScalar) -> Self {
        self.level = Some(level.into_scalar());
        self
    }

    /// Colon-joined present fields; the level is only emitted together with
    /// a profile. `None` without a codec.
    pub fn render(&self) -> Option<String> {
        let codec = self.codec.as_deref().filter(|c| !c.is_empty())?;
        let mut rendered = codec.to_string();
        if let Some(profile) = self.profile.as_deref().filter(|p| !p.is_empty()) {
            rendered.push(':');
            rendered.push_str(profile);
            if let Some(level) = self.level.as_deref().filter(|l| !l.is_empty()) {
                rendered.push(':');
                rendered.push_str(level);
            }
        }
        Some(rendered)
    }
}

/// Normalize an offset or duration: `"50%"` -> `"50p"`, `"2.5"` -> `"2.5"`.
/// `None` when the value is not a number with an optional percent suffix.
pub fn norm_range_value(value: Option<&str>) -> Option<String> {
    let value = value.filter(|v| !v.is_empty())?;
    let caps = RANGE_VALUE.captures(value)?;
    let number = caps.get(1)?.as_str();
    match caps.get(2) {
        Some(_) => Some(format!("{}p", number)),
        None => Some(number.to_string()),
    }
}

/// Like [`norm_range_value`] but keeps `"auto"` as is.
pub fn norm_auto_range_value(value: Option<&str>) -> Option<String> {
    match value {
        Some("auto") => Some("auto".to_string()),
        other => norm_range_value(other),
    }
}

/// Split a combined offset (`"2.5..10"`, `"10%..90%"`) into start and end.
pub fn split_range(range: &str) -> Option<(String, String)> {
    if !RANGE.is_match(range) {
        return None;
    }
    let (start, end) = range.split_once("..")?;
    Some((start.to_string(), end.to_string()))
}

/// A combined offset needs both a start and an end.
pub(crate) fn check_offset_values(count: usize) -> Result<()> {
    if count < 2 {
        return Err(TransformError::InvalidRange(format!(
            "offset requires a start and an end value, got {count}"
        )));
    }
    Ok(())
}

/// Numeric keyframe intervals must be strictly positive; other forms pass.
pub(crate) fn check_keyframe_interval(interval: &str) -> Result<()> {
    match interval.trim().parse::<f64>() {
        Ok(value) if value.is_nan() || value <= 0.0 => {
            Err(TransformError::InvalidKeyframeInterval(value))
        }
        _ => Ok(()),
    }
}

/// Render a `video_codec` parameter value.
pub fn process_video_codec(value: &ParamValue) -> Option<String> {
    match value {
        ParamValue::Scalar(codec) => Some(codec.clone()).filter(|c| !c.is_empty()),
        ParamValue::Codec(spec) => spec.render(),
        _ => None,
    }
}

impl Transformation {
    /// Start of the clip, in seconds or percent (`"10%"`).
    pub fn start_offset(self, offset: impl IntoScalar) -> Self {
        self.add("start_offset", offset.into_scalar())
    }

    /// End of the clip, in seconds or percent.
    pub fn end_offset(self, offset: impl IntoScalar) -> Self {
        self.add("end_offset", offset.into_scalar())
    }

    pub fn duration(self, duration: impl IntoScalar) -> Self {
        self.add("duration", duration.into_scalar())
    }

    /// Combined offset range (`"2.5..10"`). Explicit start/end offsets take
    /// precedence over it.
    pub fn offset(self, range: impl Into<String>) -> Self {
        self.add("offset", range.into())
    }

    /// Combined offset from a `[start, end]` pair.
    ///
    /// # Errors
    /// `InvalidRange` when fewer than two values are supplied.
    pub fn offset_range<I, V>(self, range: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: IntoScalar,
    {
        let values: Vec<String> = range.into_iter().map(IntoScalar::into_scalar).collect();
        check_offset_values(values.len())?;
        Ok(self.add("offset", values))
    }

    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.add("video_codec", codec.into())
    }

    /// Video codec with profile and level (`vc_h264:baseline:3.1`).
    pub fn video_codec_spec(self, spec: CodecSpec) -> Self {
        self.add("video_codec", spec)
    }

    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.add("audio_codec", codec.into())
    }

    pub fn audio_frequency(self, frequency: impl IntoScalar) -> Self {
        self.add("audio_frequency", frequency.into_scalar())
    }

    /// Bit rate, e.g. `"250k"` or `"2m"`
    pub fn bit_rate(self, bit_rate: impl IntoScalar) -> Self {
        self.add("bit_rate", bit_rate.into_scalar())
    }

    /// Frame sampling for animated output (`"10"` frames or `"2.3s"`).
    pub fn video_sampling(self, sampling: impl IntoScalar) -> Self {
        self.add("video_sampling", sampling.into_scalar())
    }

    pub fn fps(self, fps: impl IntoScalar) -> Self {
        self.add("fps", fps.into_scalar())
    }

    /// Frame rate range (`fps_20-30`).
    pub fn fps_range(self, min: impl IntoScalar, max: impl IntoScalar) -> Self {
        self.add("fps", format!("{}-{}", min.into_scalar(), max.into_scalar()))
    }

    /// Keyframe interval in seconds.
    ///
    /// # Errors
    /// `InvalidKeyframeInterval` when `interval` is not strictly positive.
    pub fn keyframe_interval(self, interval: f64) -> Result<Self> {
        if interval.is_nan() || interval <= 0.0 {
            return Err(TransformError::InvalidKeyframeInterval(interval));
        }
        Ok(self.add("keyframe_interval", interval))
    }

    /// Keyframe interval given verbatim (`"auto"`, `"2s"`).
    ///
    /// # Errors
    /// `InvalidKeyframeInterval` when `interval` is a number that is not
    /// strictly positive.
    pub fn keyframe_interval_str(self, interval: impl Into<String>) -> Result<Self> {
        let interval = interval.into();
        check_keyframe_interval(&interval)?;
        Ok(self.add("keyframe_interval", interval))
    }

    pub fn streaming_profile(self, profile: impl Into<String>) -> Self {
        self.add("streaming_profile", profile.into())
    }
}
