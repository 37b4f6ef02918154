//! Text and subtitles layers

use std::sync::LazyLock;

use regex::Regex;

use super::{LayerBase, LayerBuilder, LayerField};
use crate::error::{Result, TransformError};
use crate::param::IntoScalar;

/// `$(name)` references inside overlay text are left unencoded.
static TEXT_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\([a-zA-Z]\w*\)").unwrap());

static PERCENT_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%[0-9A-Fa-f]{2}").unwrap());

/// Font styling shared by text and subtitles layers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextStyle {
    font_family: Option<String>,
    font_size: Option<String>,
    font_weight: Option<String>,
    font_style: Option<String>,
    text_decoration: Option<String>,
    text_align: Option<String>,
    stroke: Option<String>,
    letter_spacing: Option<String>,
    line_spacing: Option<String>,
    font_antialiasing: Option<String>,
    font_hinting: Option<String>,
}

impl TextStyle {
    /// `family_size[_modifiers...]`, or `None` when no styling was given.
    fn identifier(&self) -> Result<Option<String>> {
        let mut components = Vec::new();

        if let Some(weight) = non_default(&self.font_weight, "normal") {
            components.push(weight.to_string());
        }
        if let Some(style) = non_default(&self.font_style, "normal") {
            components.push(style.to_string());
        }
        if let Some(decoration) = non_default(&self.text_decoration, "none") {
            components.push(decoration.to_string());
        }
        if let Some(align) = present(&self.text_align) {
            components.push(align.to_string());
        }
        if let Some(stroke) = non_default(&self.stroke, "none") {
            components.push(stroke.to_string());
        }
        if let Some(spacing) = present(&self.letter_spacing) {
            components.push(format!("letter_spacing_{}", spacing));
        }
        if let Some(spacing) = present(&self.line_spacing) {
            components.push(format!("line_spacing_{}", spacing));
        }
        if let Some(antialias) = present(&self.font_antialiasing) {
            components.push(format!("antialias_{}", antialias));
        }
        if let Some(hinting) = present(&self.font_hinting) {
            components.push(format!("hinting_{}", hinting));
        }

        let family = present(&self.font_family);
        let size = present(&self.font_size);
        if family.is_none() && size.is_none() && components.is_empty() {
            return Ok(None);
        }

        let family = family.ok_or_else(|| {
            TransformError::MissingLayerField("Must supply font_family for text style".to_string())
        })?;
        let size = size.ok_or_else(|| {
            TransformError::MissingLayerField("Must supply font_size for text style".to_string())
        })?;

        components.insert(0, size.to_string());
        components.insert(0, family.to_string());
        Ok(Some(components.join("_")))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn non_default<'a>(value: &'a Option<String>, default: &str) -> Option<&'a str> {
    present(value).filter(|v| *v != default)
}

/// URL-encode overlay text. Commas and slashes are escaped twice so they
/// survive as literal characters inside a `/`- and `,`-delimited path.
fn encode_text(text: &str) -> String {
    if PERCENT_ESCAPE.is_match(text) {
        tracing::warn!(
            text = %text,
            "Overlay text is already percent-encoded and will be escaped again"
        );
    }

    let escape = |part: &str| {
        urlencoding::encode(part)
            .replace("%2C", "%252C")
            .replace("%2F", "%252F")
    };

    let mut encoded = String::with_capacity(text.len());
    let mut last = 0;
    for var in TEXT_VARIABLE.find_iter(text) {
        encoded.push_str(&escape(&text[last..var.start()]));
        encoded.push_str(var.as_str());
        last = var.end();
    }
    encoded.push_str(&escape(&text[last..]));
    encoded
}

macro_rules! text_style_setters {
    () => {
        pub fn font_family(mut self, family: impl Into<String>) -> Self {
            self.style.font_family = Some(family.into());
            self
        }

        pub fn font_size(mut self, size: impl IntoScalar) -> Self {
            self.style.font_size = Some(size.into_scalar());
            self
        }

        /// `bold`, `normal` (omitted), ...
        pub fn font_weight(mut self, weight: impl Into<String>) -> Self {
            self.style.font_weight = Some(weight.into());
            self
        }

        /// `italic`, `normal` (omitted), ...
        pub fn font_style(mut self, style: impl Into<String>) -> Self {
            self.style.font_style = Some(style.into());
            self
        }

        /// `underline`, `strikethrough`, `none` (omitted)
        pub fn text_decoration(mut self, decoration: impl Into<String>) -> Self {
            self.style.text_decoration = Some(decoration.into());
            self
        }

        pub fn text_align(mut self, align: impl Into<String>) -> Self {
            self.style.text_align = Some(align.into());
            self
        }

        /// `stroke`, `none` (omitted)
        pub fn stroke(mut self, stroke: impl Into<String>) -> Self {
            self.style.stroke = Some(stroke.into());
            self
        }

        pub fn letter_spacing(mut self, spacing: impl IntoScalar) -> Self {
            self.style.letter_spacing = Some(spacing.into_scalar());
            self
        }

        pub fn line_spacing(mut self, spacing: impl IntoScalar) -> Self {
            self.style.line_spacing = Some(spacing.into_scalar());
            self
        }

        pub fn font_antialiasing(mut self, antialiasing: impl Into<String>) -> Self {
            self.style.font_antialiasing = Some(antialiasing.into());
            self
        }

        pub fn font_hinting(mut self, hinting: impl Into<String>) -> Self {
            self.style.font_hinting = Some(hinting.into());
            self
        }
    };
}

/// Text overlay (`text:<style>:<text>`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextLayer {
    base: LayerBase,
    style: TextStyle,
    text: Option<String>,
}

impl TextLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text to render; may reference variables as `$(name)`.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    text_style_setters!();
}

impl LayerBuilder for TextLayer {
    const LAYER_NAME: &'static str = "text";
    const LOCKED: &'static [LayerField] = &[
        LayerField::ResourceType,
        LayerField::DeliveryType,
        LayerField::Format,
    ];

    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn render(&self) -> Result<String> {
        let public_id = self.base.formatted_public_id();
        let text = self.text.as_deref().filter(|t| !t.is_empty());
        if public_id.is_none() && text.is_none() {
            return Err(TransformError::MissingLayerField(
                "Must supply either text or public_id".to_string(),
            ));
        }

        let mut components = vec!["text".to_string()];
        if let Some(style) = self.style.identifier()? {
            components.push(style);
        }
        if let Some(public_id) = public_id {
            components.push(public_id);
        }
        if let Some(text) = text {
            components.push(encode_text(text));
        }
        Ok(components.join(":"))
    }
}

/// Subtitles overlay for videos (`subtitles[:<style>]:<public_id>`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitlesLayer {
    base: LayerBase,
    style: TextStyle,
}

impl SubtitlesLayer {
    pub fn new() -> Self {
        Self::default()
    }

    text_style_setters!();
}

impl LayerBuilder for SubtitlesLayer {
    const LAYER_NAME: &'static str = "subtitles";
    const LOCKED: &'static [LayerField] = &[
        LayerField::ResourceType,
        LayerField::DeliveryType,
        LayerField::Format,
    ];

    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn render(&self) -> Result<String> {
        let public_id = self
            .base
            .formatted_public_id()
            .ok_or_else(|| TransformError::MissingLayerField("Must supply public_id".to_string()))?;

        let mut components = vec!["subtitles".to_string()];
        if let Some(style) = self.style.identifier()? {
            components.push(style);
        }
        components.push(public_id);
        Ok(components.join(":"))
    }
}
