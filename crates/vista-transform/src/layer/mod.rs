//! Overlay and underlay layers
//!
//! Layers render to the `:`-joined value of the `l_` (overlay) and `u_`
//! (underlay) parameters. Default components (`image` resource type,
//! `upload` delivery type) are omitted.
//!
//! Specialized layers fix some of the base fields; trying to change one of
//! them fails with [`TransformError::RestrictedLayerField`].

mod fetch;
mod text;

pub use fetch::FetchLayer;
pub use text::{SubtitlesLayer, TextLayer};

use crate::error::{Result, TransformError};

const DEFAULT_RESOURCE_TYPE: &str = "image";
const DEFAULT_DELIVERY_TYPE: &str = "upload";

/// Fields shared by every layer kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerBase {
    pub(crate) resource_type: Option<String>,
    pub(crate) delivery_type: Option<String>,
    pub(crate) public_id: Option<String>,
    pub(crate) format: Option<String>,
}

impl LayerBase {
    /// Public id with folders flattened (`a/b` -> `a:b`) and the format
    /// appended as an extension.
    pub(crate) fn formatted_public_id(&self) -> Option<String> {
        let public_id = self.public_id.as_deref().filter(|id| !id.is_empty())?;
        let mut formatted = public_id.replace('/', ":");
        if let Some(format) = self.format.as_deref().filter(|f| !f.is_empty()) {
            formatted.push('.');
            formatted.push_str(format);
        }
        Some(formatted)
    }

    fn non_default_resource_type(&self) -> Option<&str> {
        self.resource_type
            .as_deref()
            .filter(|rt| !rt.is_empty() && *rt != DEFAULT_RESOURCE_TYPE)
    }

    fn non_default_delivery_type(&self) -> Option<&str> {
        self.delivery_type
            .as_deref()
            .filter(|t| !t.is_empty() && *t != DEFAULT_DELIVERY_TYPE)
    }
}

/// Base layer field names, used to describe locked setters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerField {
    ResourceType,
    DeliveryType,
    PublicId,
    Format,
}

impl LayerField {
    pub fn name(self) -> &'static str {
        match self {
            LayerField::ResourceType => "resourceType",
            LayerField::DeliveryType => "type",
            LayerField::PublicId => "publicId",
            LayerField::Format => "format",
        }
    }
}

/// Common setters of all layers. Setters for fields listed in
/// [`LayerBuilder::LOCKED`] fail instead of silently doing nothing.
pub trait LayerBuilder: Sized {
    /// Name used in error messages (`"text"`, `"video"` ...).
    const LAYER_NAME: &'static str;

    /// Base fields this layer kind does not allow callers to change.
    const LOCKED: &'static [LayerField] = &[];

    fn base_mut(&mut self) -> &mut LayerBase;

    /// Render the layer to its parameter value.
    fn render(&self) -> Result<String>;

    fn resource_type(self, resource_type: impl Into<String>) -> Result<Self> {
        self.set_field(LayerField::ResourceType, resource_type.into())
    }

    /// Delivery type (`upload`, `private`, `authenticated`, ...).
    fn delivery_type(self, delivery_type: impl Into<String>) -> Result<Self> {
        self.set_field(LayerField::DeliveryType, delivery_type.into())
    }

    fn public_id(self, public_id: impl Into<String>) -> Result<Self> {
        self.set_field(LayerField::PublicId, public_id.into())
    }

    fn format(self, format: impl Into<String>) -> Result<Self> {
        self.set_field(LayerField::Format, format.into())
    }

    fn set_field(mut self, field: LayerField, value: String) -> Result<Self> {
        if Self::LOCKED.contains(&field) {
            return Err(TransformError::RestrictedLayerField {
                layer: Self::LAYER_NAME,
                field: field.name(),
            });
        }

        let base = self.base_mut();
        match field {
            LayerField::ResourceType => base.resource_type = Some(value),
            LayerField::DeliveryType => base.delivery_type = Some(value),
            LayerField::PublicId => base.public_id = Some(value),
            LayerField::Format => base.format = Some(value),
        }
        Ok(self)
    }
}

/// Layer referencing an uploaded asset
/// (`[resource_type:][type:]public_id[.format]`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseLayer {
    base: LayerBase,
}

impl BaseLayer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LayerBuilder for BaseLayer {
    const LAYER_NAME: &'static str = "image";

    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn render(&self) -> Result<String> {
        let mut components = Vec::new();
        if let Some(resource_type) = self.base.non_default_resource_type() {
            components.push(resource_type.to_string());
        }
        if let Some(delivery_type) = self.base.non_default_delivery_type() {
            components.push(delivery_type.to_string());
        }
        let public_id = self
            .base
            .formatted_public_id()
            .ok_or_else(|| TransformError::MissingLayerField("Must supply public_id".to_string()))?;
        components.push(public_id);
        Ok(components.join(":"))
    }
}

/// Video overlay; the resource type is always `video`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoLayer {
    base: LayerBase,
}

impl VideoLayer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LayerBuilder for VideoLayer {
    const LAYER_NAME: &'static str = "video";
    const LOCKED: &'static [LayerField] = &[LayerField::ResourceType];

    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn render(&self) -> Result<String> {
        let mut components = vec!["video".to_string()];
        if let Some(delivery_type) = self.base.non_default_delivery_type() {
            components.push(delivery_type.to_string());
        }
        let public_id = self
            .base
            .formatted_public_id()
            .ok_or_else(|| TransformError::MissingLayerField("Must supply public_id".to_string()))?;
        components.push(public_id);
        Ok(components.join(":"))
    }
}

/// Any layer kind, as stored in a transformation parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Base(BaseLayer),
    Text(TextLayer),
    Subtitles(SubtitlesLayer),
    Video(VideoLayer),
    Fetch(FetchLayer),
}

impl Layer {
    pub fn render(&self) -> Result<String> {
        match self {
            Layer::Base(layer) => layer.render(),
            Layer::Text(layer) => layer.render(),
            Layer::Subtitles(layer) => layer.render(),
            Layer::Video(layer) => layer.render(),
            Layer::Fetch(layer) => layer.render(),
        }
    }
}

impl From<BaseLayer> for Layer {
    fn from(layer: BaseLayer) -> Self {
        Layer::Base(layer)
    }
}

impl From<TextLayer> for Layer {
    fn from(layer: TextLayer) -> Self {
        Layer::Text(layer)
    }
}

impl From<SubtitlesLayer> for Layer {
    fn from(layer: SubtitlesLayer) -> Self {
        Layer::Subtitles(layer)
    }
}

impl From<VideoLayer> for Layer {
    fn from(layer: VideoLayer) -> Self {
        Layer::Video(layer)
    }
}

impl From<FetchLayer> for Layer {
    fn from(layer: FetchLayer) -> Self {
        Layer::Fetch(layer)
    }
}
