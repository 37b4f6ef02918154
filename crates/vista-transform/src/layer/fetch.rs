//! Remote (fetched) layer

use base64::{engine::general_purpose, Engine as _};

use super::{LayerBase, LayerBuilder, LayerField};
use crate::error::{Result, TransformError};

/// Layer fetched from a remote URL (`[video:]fetch:<base64url>`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchLayer {
    base: LayerBase,
    url: Option<String>,
}

impl FetchLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl LayerBuilder for FetchLayer {
    const LAYER_NAME: &'static str = "fetch";
    const LOCKED: &'static [LayerField] = &[
        LayerField::DeliveryType,
        LayerField::PublicId,
        LayerField::Format,
    ];

    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn render(&self) -> Result<String> {
        let url = self
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| TransformError::MissingLayerField("Must supply url".to_string()))?;

        let mut components = Vec::new();
        if let Some(resource_type) = self.base.non_default_resource_type() {
            components.push(resource_type.to_string());
        }
        components.push("fetch".to_string());
        components.push(general_purpose::URL_SAFE.encode(url.as_bytes()));
        Ok(components.join(":"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_layer_encodes_url() {
        let layer = FetchLayer::new().url("https://example.com/logo.png");
        assert_eq!(
            layer.render().unwrap(),
            "fetch:aHR0cHM6Ly9leGFtcGxlLmNvbS9sb2dvLnBuZw=="
        );
    }

    #[test]
    fn test_fetch_layer_video_resource_type() {
        let layer = FetchLayer::new()
            .url("https://example.com/logo.png")
            .resource_type("video")
            .unwrap();
        assert!(layer.render().unwrap().starts_with("video:fetch:"));
    }

    #[test]
    fn test_fetch_layer_is_url_safe() {
        // "Pz8/Pj4+" in the standard alphabet
        let layer = FetchLayer::new().url("???>>>");
        assert_eq!(layer.render().unwrap(), "fetch:Pz8_Pj4-");
    }

    #[test]
    fn test_fetch_layer_locks_fields() {
        let err = FetchLayer::new().delivery_type("upload").unwrap_err();
        assert_eq!(err.to_string(), "Cannot modify type for fetch layers");
        assert!(FetchLayer::new().public_id("x").is_err());
        assert!(FetchLayer::new().format("png").is_err());
    }

    #[test]
    fn test_fetch_layer_requires_url() {
        let err = FetchLayer::new().render().unwrap_err();
        assert!(matches!(err, TransformError::MissingLayerField(_)));
    }
}
