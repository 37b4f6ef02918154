//! Image transformation setters

use base64::{engine::general_purpose, Engine as _};

use super::Transformation;
use crate::layer::Layer;
use crate::param::IntoScalar;
use crate::radius::Radius;

/// A user supplied function applied to the asset (`fn_...`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomFunction {
    /// WebAssembly module uploaded under the given public id.
    Wasm(String),
    /// Remote function called at the given URL.
    Remote(String),
}

impl CustomFunction {
    pub fn wasm(public_id: impl Into<String>) -> Self {
        CustomFunction::Wasm(public_id.into())
    }

    pub fn remote(url: impl Into<String>) -> Self {
        CustomFunction::Remote(url.into())
    }

    /// `wasm:<public_id>` or `remote:<base64url(url)>`
    pub fn render(&self) -> String {
        match self {
            CustomFunction::Wasm(public_id) => format!("wasm:{}", public_id),
            CustomFunction::Remote(url) => {
                format!("remote:{}", general_purpose::URL_SAFE.encode(url.as_bytes()))
            }
        }
    }
}

impl Transformation {
    /// Width in pixels, a fraction of the original (`0.5`), `"auto"` or an
    /// expression.
    pub fn width(self, width: impl IntoScalar) -> Self {
        self.add("width", width.into_scalar())
    }

    pub fn height(self, height: impl IntoScalar) -> Self {
        self.add("height", height.into_scalar())
    }

    /// Width and height at once, as `"<width>x<height>"`.
    pub fn size(self, size: impl Into<String>) -> Self {
        self.add("size", size.into())
    }

    /// Crop mode (`fill`, `fit`, `limit`, `thumb`, `scale`, ...)
    pub fn crop(self, crop: impl Into<String>) -> Self {
        self.add("crop", crop.into())
    }

    /// Aspect ratio as a ratio string (`"16:9"`) or a decimal.
    pub fn aspect_ratio(self, ratio: impl IntoScalar) -> Self {
        self.add("aspect_ratio", ratio.into_scalar())
    }

    /// Aspect ratio from numerator and denominator (`ar_16:9`).
    pub fn aspect_ratio_nd(self, numerator: u32, denominator: u32) -> Self {
        self.add("aspect_ratio", format!("{}:{}", numerator, denominator))
    }

    /// Background color, a name or `#rrggbb`.
    pub fn background(self, color: impl Into<String>) -> Self {
        self.add("background", color.into())
    }

    pub fn color(self, color: impl Into<String>) -> Self {
        self.add("color", color.into())
    }

    /// Solid border of `width` pixels (`bo_4px_solid_rgb:ff0000`).
    pub fn border(self, width: u32, color: &str) -> Self {
        let color = match color.strip_prefix('#') {
            Some(hex) => format!("rgb:{}", hex),
            None => color.to_string(),
        };
        self.add("border", format!("{}px_solid_{}", width, color))
    }

    /// Border given verbatim
    pub fn border_str(self, border: impl Into<String>) -> Self {
        self.add("border", border.into())
    }

    pub fn effect(self, effect: impl Into<String>) -> Self {
        self.add("effect", effect.into())
    }

    /// Effect with a parameter (`e_sepia:50`).
    pub fn effect_with(self, effect: &str, param: impl IntoScalar) -> Self {
        self.add("effect", format!("{}:{}", effect, param.into_scalar()))
    }

    /// Rotation in degrees, or a mode such as `auto_right` or `exif`.
    pub fn angle(self, angle: impl IntoScalar) -> Self {
        self.add("angle", angle.into_scalar())
    }

    /// Several rotation modes applied together (`a_auto_right.hflip`).
    pub fn angles<I, S>(self, angles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let angles: Vec<String> = angles.into_iter().map(Into::into).collect();
        self.add("angle", angles)
    }

    /// Single flag
    pub fn flags(self, flag: impl Into<String>) -> Self {
        self.add("flags", flag.into())
    }

    /// Several flags (`fl_attachment.lossy`).
    pub fn flag_list<I, S>(self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let flags: Vec<String> = flags.into_iter().map(Into::into).collect();
        self.add("flags", flags)
    }

    pub fn opacity(self, opacity: impl IntoScalar) -> Self {
        self.add("opacity", opacity.into_scalar())
    }

    /// Quality 1-100, or `auto[:mode]`
    pub fn quality(self, quality: impl IntoScalar) -> Self {
        self.add("quality", quality.into_scalar())
    }

    pub fn radius(self, radius: impl IntoScalar) -> Self {
        self.add("radius", radius.into_scalar())
    }

    /// Per-corner radius, see [`Radius`].
    pub fn corner_radius(self, radius: Radius) -> Self {
        self.add("radius", radius)
    }

    pub fn x(self, x: impl IntoScalar) -> Self {
        self.add("x", x.into_scalar())
    }

    pub fn y(self, y: impl IntoScalar) -> Self {
        self.add("y", y.into_scalar())
    }

    pub fn zoom(self, zoom: impl IntoScalar) -> Self {
        self.add("zoom", zoom.into_scalar())
    }

    pub fn gravity(self, gravity: impl Into<String>) -> Self {
        self.add("gravity", gravity.into())
    }

    /// Device pixel ratio; `"auto"` marks the result as hi-DPI.
    pub fn dpr(self, dpr: impl IntoScalar) -> Self {
        self.add("dpr", dpr.into_scalar())
    }

    /// Placeholder public id used when the requested asset does not exist.
    pub fn default_image(self, public_id: impl Into<String>) -> Self {
        self.add("default_image", public_id.into())
    }

    pub fn density(self, density: impl IntoScalar) -> Self {
        self.add("density", density.into_scalar())
    }

    pub fn page(self, page: impl IntoScalar) -> Self {
        self.add("page", page.into_scalar())
    }

    pub fn prefix(self, prefix: impl Into<String>) -> Self {
        self.add("prefix", prefix.into())
    }

    pub fn color_space(self, color_space: impl Into<String>) -> Self {
        self.add("color_space", color_space.into())
    }

    /// Delay between animation frames, in milliseconds
    pub fn delay(self, delay: impl IntoScalar) -> Self {
        self.add("delay", delay.into_scalar())
    }

    pub fn fetch_format(self, format: impl Into<String>) -> Self {
        self.add("fetch_format", format.into())
    }

    /// Overlay a layer (`l_...`).
    pub fn overlay(self, layer: impl Into<Layer>) -> Self {
        let layer: Layer = layer.into();
        self.add("overlay", layer)
    }

    /// Overlay given as an already rendered layer string.
    pub fn overlay_str(self, layer: impl Into<String>) -> Self {
        self.add("overlay", layer.into())
    }

    /// Underlay a layer (`u_...`).
    pub fn underlay(self, layer: impl Into<Layer>) -> Self {
        let layer: Layer = layer.into();
        self.add("underlay", layer)
    }

    pub fn underlay_str(self, layer: impl Into<String>) -> Self {
        self.add("underlay", layer.into())
    }

    /// Apply a custom function after the built-in transformations.
    pub fn custom_function(self, function: CustomFunction) -> Self {
        self.add("custom_function", function.render())
    }

    /// Apply a custom function before any other transformation
    /// (`fn_pre:...`).
    pub fn custom_pre_function(self, function: CustomFunction) -> Self {
        self.add("custom_function", format!("pre:{}", function.render()))
    }
}
