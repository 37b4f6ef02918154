//! Transformation serializer
//!
//! Every segment renders to a comma-joined list of `key_value` components in
//! a fixed order:
//!
//! 1. `if_<condition>`
//! 2. user variables (`$name_value`), sorted by name
//! 3. explicit `variables` assignments, in the given order
//! 4. parameters under their short key, sorted by key
//! 5. the raw transformation, verbatim
//!
//! Chained segments are rendered first and joined with `/`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::video::{norm_auto_range_value, norm_range_value, process_video_codec, split_range};
use super::{Transformation, IF};
use crate::alias::SIMPLE_PARAMS;
use crate::config::GenerateConfig;
use crate::error::Result;
use crate::expression::{is_variable_name, value_contains_variable};
use crate::normalize::normalize_str;
use crate::param::ParamValue;

/// Output of [`Transformation::render`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rendered {
    /// The transformation path (`c_fill,w_500/e_sepia`)
    pub path: String,
    /// Width for the companion `<img>` tag, when it is a static pixel size
    pub html_width: Option<String>,
    /// Height for the companion `<img>` tag, when it is a static pixel size
    pub html_height: Option<String>,
    /// Device pixel ratio resolved to `auto`
    pub hi_dpi: bool,
    /// Width is `auto` or the responsive segment was appended
    pub is_responsive: bool,
}

impl Rendered {
    /// `width`/`height` HTML attributes that can be emitted.
    pub fn html_attributes(&self) -> Vec<(&'static str, &str)> {
        let mut attributes = Vec::new();
        if let Some(width) = self.html_width.as_deref() {
            attributes.push(("width", width));
        }
        if let Some(height) = self.html_height.as_deref() {
            attributes.push(("height", height));
        }
        attributes
    }
}

impl Transformation {
    /// Generate the transformation path with default settings.
    ///
    /// # Errors
    /// Fails when a layer value cannot be rendered (missing public id, text
    /// style without font family...).
    pub fn generate(&self) -> Result<String> {
        self.generate_with(&GenerateConfig::default())
    }

    /// Generate the transformation path with the given defaults.
    pub fn generate_with(&self, config: &GenerateConfig) -> Result<String> {
        Ok(self.render(config)?.path)
    }

    /// Generate the path along with the HTML attributes derived from the
    /// open segment.
    pub fn render(&self, config: &GenerateConfig) -> Result<Rendered> {
        let mut parts = Vec::with_capacity(self.nested.len() + 1);
        for segment in &self.nested {
            let path = segment.generate_with(config)?;
            if !path.is_empty() {
                parts.push(path);
            }
        }

        let mut rendered = self.generate_this(config)?;
        if !rendered.path.is_empty() {
            parts.push(std::mem::take(&mut rendered.path));
        }
        rendered.path = parts.join("/");
        Ok(rendered)
    }

    /// Render a parameter value; `None` when absent or empty.
    fn param(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            Some(value) if !value.is_empty() => {
                let rendered = value.render()?;
                Ok(Some(rendered).filter(|v| !v.is_empty()))
            }
            _ => Ok(None),
        }
    }

    fn has_param(&self, key: &str) -> bool {
        self.get(key).is_some_and(|value| !value.is_empty())
    }

    /// Render the open segment only.
    fn generate_this(&self, config: &GenerateConfig) -> Result<Rendered> {
        let mut width = self.param("width")?;
        let mut height = self.param("height")?;
        if let Some(size) = self.param("size")? {
            match size.split_once('x') {
                Some((w, h)) => {
                    width = Some(w.to_string()).filter(|w| !w.is_empty());
                    height = Some(h.to_string()).filter(|h| !h.is_empty());
                }
                None => tracing::warn!(size = %size, "Ignoring size without 'x' separator"),
            }
        }

        let mut html_width = self.html_width_value().map(str::to_string).or_else(|| width.clone());
        let mut html_height = self
            .html_height_value()
            .map(str::to_string)
            .or_else(|| height.clone());

        let has_layer = self.has_param("overlay") || self.has_param("underlay");
        let angle = self.param("angle")?;
        let crop = self.param("crop")?;
        let is_responsive = self
            .get_scalar("responsive_width")
            .and_then(|value| value.parse::<bool>().ok())
            .unwrap_or(config.default_is_responsive);

        let no_html_sizes = has_layer
            || angle.is_some()
            || matches!(crop.as_deref(), Some("fit") | Some("limit"))
            || is_responsive;
        if let Some(w) = width.as_deref() {
            if no_html_sizes || !is_static_size(w, true) {
                html_width = None;
            }
        }
        if let Some(h) = height.as_deref() {
            if no_html_sizes || !is_static_size(h, false) {
                html_height = None;
            }
        }

        let background = self.param("background")?.map(|b| rgb_color(&b));
        let color = self.param("color")?.map(|c| rgb_color(&c));

        let dpr = self.param("dpr")?.or_else(|| config.default_dpr.clone());
        let hi_dpi = dpr
            .as_deref()
            .is_some_and(|dpr| dpr.eq_ignore_ascii_case("auto"));

        let (range_start, range_end) = match self.get("offset") {
            Some(ParamValue::Scalar(range)) => split_range(range),
            Some(ParamValue::List(items)) if items.len() >= 2 => {
                Some((items[0].clone(), items[1].clone()))
            }
            _ => None,
        }
        .unzip();
        let start_offset =
            norm_auto_range_value(self.param("start_offset")?.or(range_start).as_deref());
        let end_offset = norm_range_value(self.param("end_offset")?.or(range_end).as_deref());
        let duration = norm_range_value(self.param("duration")?.as_deref());
        let video_codec = self.get("video_codec").and_then(process_video_codec);

        let is_responsive_model =
            is_responsive || width.as_deref().is_some_and(|w| w.starts_with("auto"));

        let normalized = [
            ("a", angle),
            ("ar", self.param("aspect_ratio")?),
            ("b", background),
            ("c", crop),
            ("co", color),
            ("dpr", dpr),
            ("du", duration),
            ("e", self.param("effect")?),
            ("eo", end_offset),
            ("fl", self.param("flags")?),
            ("h", height),
            ("o", self.param("opacity")?),
            ("q", self.param("quality")?),
            ("r", self.param("radius")?),
            ("so", start_offset),
            ("t", self.param("transformation")?),
            ("vc", video_codec),
            ("w", width),
            ("x", self.param("x")?),
            ("y", self.param("y")?),
            ("z", self.param("zoom")?),
        ];

        let mut table: BTreeMap<&str, String> = BTreeMap::new();
        for (key, value) in normalized {
            if let Some(value) = value {
                table.insert(key, normalize_str(&value));
            }
        }
        // function sources are base64 and must not be rewritten
        if let Some(function) = self.param("custom_function")? {
            table.insert("fn", function);
        }
        for &(key, name) in SIMPLE_PARAMS {
            if let Some(value) = self.param(name)? {
                table.insert(key, value);
            }
        }

        let mut components = Vec::new();
        if let Some(condition) = self.param(IF)? {
            components.push(format!("if_{}", normalize_str(&condition)));
        }

        let mut variables = Vec::new();
        for (name, value) in &self.params {
            if is_variable_name(name) {
                variables.push((name.as_str(), normalize_str(&value.render()?)));
            }
        }
        variables.sort_by(|a, b| a.0.cmp(b.0));
        components.extend(
            variables
                .into_iter()
                .map(|(name, value)| format!("{}_{}", name, value)),
        );

        if let Some(assignments) = self.param("variables")? {
            components.push(assignments);
        }
        components.extend(table.iter().map(|(key, value)| format!("{}_{}", key, value)));
        if let Some(raw) = self.param("raw_transformation")? {
            components.push(raw);
        }

        let mut segments = Vec::with_capacity(2);
        let joined = components.join(",");
        if !joined.is_empty() {
            segments.push(joined);
        }
        if is_responsive {
            let responsive = config.responsive_width_transformation.generate()?;
            if !responsive.is_empty() {
                segments.push(responsive);
            }
        }

        let path = segments.join("/");
        tracing::debug!(
            path = %path,
            html_width = ?html_width,
            html_height = ?html_height,
            hi_dpi,
            is_responsive = is_responsive_model,
            "Generated transformation segment"
        );

        Ok(Rendered {
            path,
            html_width,
            html_height,
            hi_dpi,
            is_responsive: is_responsive_model,
        })
    }
}

/// Whether a width/height value can be used as an HTML attribute.
///
/// Variable-valued, percentage and sub-1 sizes are relative. Widths must be
/// plain numbers; heights keep non-numeric values such as `auto`.
fn is_static_size(value: &str, is_width: bool) -> bool {
    if value_contains_variable(value) || value.trim_end().ends_with('%') {
        return false;
    }
    if is_width && value.to_lowercase().contains("auto") {
        return false;
    }
    match value.trim().parse::<f64>() {
        Ok(size) => size >= 1.0,
        Err(_) => !is_width,
    }
}

fn rgb_color(value: &str) -> String {
    match value.strip_prefix('#') {
        Some(hex) => format!("rgb:{}", hex),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Expression;

    fn render(t: &Transformation) -> Rendered {
        t.render(&GenerateConfig::default()).unwrap()
    }

    #[test]
    fn test_end_to_end_image_scenario() {
        let t = Transformation::new()
            .width(500)
            .crop("fill")
            .gravity("face")
            .radius(20)
            .quality(80);
        assert_eq!(t.generate().unwrap(), "c_fill,g_face,q_80,r_20,w_500");
    }

    #[test]
    fn test_chaining_round_trip() {
        let t = Transformation::new().width(100).chain().crop("fill");
        assert_eq!(t.generate().unwrap(), "w_100/c_fill");
    }

    #[test]
    fn test_empty_segments_are_skipped() {
        let t = Transformation::new().chain().width(100).chain().chain();
        assert_eq!(t.generate().unwrap(), "w_100");
    }

    #[test]
    fn test_values_are_normalized() {
        let t = Transformation::new()
            .width("initial_width * 0.5")
            .height("ih / 2");
        assert_eq!(t.generate().unwrap(), "h_ih_div_2,w_iw_mul_0.5");
    }

    #[test]
    fn test_boolean_formatting() {
        let t = Transformation::new().add("quality", true);
        assert_eq!(t.generate().unwrap(), "q_true");
    }

    // =========================================================================
    // HTML SIZES
    // =========================================================================

    #[test]
    fn test_html_size_from_static_width() {
        let rendered = render(&Transformation::new().width(500).height(300).crop("fill"));
        assert_eq!(rendered.html_width.as_deref(), Some("500"));
        assert_eq!(rendered.html_height.as_deref(), Some("300"));
        assert_eq!(rendered.html_attributes(), vec![("width", "500"), ("height", "300")]);
    }

    #[test]
    fn test_html_size_suppressed_for_relative_width() {
        assert!(render(&Transformation::new().width(0.5)).html_width.is_none());
        assert!(render(&Transformation::new().width("50%")).html_width.is_none());
        assert!(render(&Transformation::new().width("$w")).html_width.is_none());
        assert!(render(&Transformation::new().width("iw_div_2")).html_width.is_none());
    }

    #[test]
    fn test_html_height_keeps_non_numeric_values() {
        let rendered = render(&Transformation::new().height("auto"));
        assert_eq!(rendered.html_height.as_deref(), Some("auto"));
        assert_eq!(rendered.html_attributes(), vec![("height", "auto")]);

        assert!(render(&Transformation::new().height("50%")).html_height.is_none());
        assert!(render(&Transformation::new().height(0.5)).html_height.is_none());
        assert!(render(&Transformation::new().height("$h")).html_height.is_none());
        assert!(render(&Transformation::new().height("ih_div_2")).html_height.is_none());
        assert!(render(&Transformation::new().width("auto")).html_width.is_none());
    }

    #[test]
    fn test_html_size_suppressed_for_fit_limit_layers_and_angles() {
        for crop in ["fit", "limit"] {
            let rendered = render(&Transformation::new().width(500).height(200).crop(crop));
            assert!(rendered.html_width.is_none(), "crop {}", crop);
            assert!(rendered.html_height.is_none(), "crop {}", crop);
        }

        let rendered = render(&Transformation::new().width(500).overlay_str("logo"));
        assert!(rendered.html_width.is_none());

        let rendered = render(&Transformation::new().width(500).angle(90));
        assert!(rendered.html_width.is_none());
    }

    #[test]
    fn test_explicit_html_width() {
        let rendered = render(&Transformation::new().width(500).html_width(250));
        assert_eq!(rendered.html_width.as_deref(), Some("250"));
        assert_eq!(rendered.path, "w_500");

        let rendered = render(&Transformation::new().html_height(80));
        assert_eq!(rendered.html_height.as_deref(), Some("80"));
        assert_eq!(rendered.path, "");
    }

    #[test]
    fn test_size_sets_html_dimensions() {
        let rendered = render(&Transformation::new().size("300x200"));
        assert_eq!(rendered.path, "h_200,w_300");
        assert_eq!(rendered.html_width.as_deref(), Some("300"));
        assert_eq!(rendered.html_height.as_deref(), Some("200"));
    }

    #[test]
    fn test_malformed_size_is_ignored() {
        let t = Transformation::new().size("300").width(100);
        assert_eq!(t.generate().unwrap(), "w_100");
    }

    // =========================================================================
    // RESPONSIVE / DPR
    // =========================================================================

    #[test]
    fn test_responsive_width_appends_segment() {
        let t = Transformation::new().width(300).crop("fill").responsive_width(true);
        let rendered = render(&t);
        assert_eq!(rendered.path, "c_fill,w_300/w_auto,c_limit");
        assert!(rendered.is_responsive);
        assert!(rendered.html_width.is_none());
    }

    #[test]
    fn test_responsive_from_config() {
        let config = GenerateConfig::default().with_responsive(true);
        let t = Transformation::new().width(100);
        assert_eq!(t.generate_with(&config).unwrap(), "w_100/w_auto,c_limit");

        let t = Transformation::new().width(100).responsive_width(false);
        assert_eq!(t.generate_with(&config).unwrap(), "w_100");
    }

    #[test]
    fn test_custom_responsive_segment() {
        let config = GenerateConfig::default()
            .with_responsive(true)
            .with_responsive_width_transformation(Transformation::new().width("auto").crop("scale"));
        let t = Transformation::new().effect("sepia");
        assert_eq!(t.generate_with(&config).unwrap(), "e_sepia/c_scale,w_auto");
    }

    #[test]
    fn test_auto_width_marks_responsive() {
        let rendered = render(&Transformation::new().width("auto").crop("limit"));
        assert_eq!(rendered.path, "c_limit,w_auto");
        assert!(rendered.is_responsive);
        assert!(rendered.html_width.is_none());
    }

    #[test]
    fn test_dpr() {
        let rendered = render(&Transformation::new().dpr("auto"));
        assert_eq!(rendered.path, "dpr_auto");
        assert!(rendered.hi_dpi);

        let config = GenerateConfig::default().with_default_dpr("2.0");
        let rendered = Transformation::new().width(100).render(&config).unwrap();
        assert_eq!(rendered.path, "dpr_2.0,w_100");
        assert!(!rendered.hi_dpi);
    }

    // =========================================================================
    // COMPONENT ORDER
    // =========================================================================

    #[test]
    fn test_component_order() {
        let t = Transformation::new()
            .raw_transformation("e_grayscale")
            .width("$small")
            .crop("scale")
            .variable("$small", "initial_width * 0.5")
            .unwrap()
            .variable("$big", 2)
            .unwrap()
            .if_condition("w_gt_100");
        assert_eq!(
            t.generate().unwrap(),
            "if_w_gt_100,$big_2,$small_iw_mul_0.5,c_scale,w_$small,e_grayscale"
        );
    }

    #[test]
    fn test_explicit_variables_keep_order() {
        let t = Transformation::new()
            .variables(vec![
                Expression::variable("$z", 1).unwrap(),
                Expression::variable("$a", "width / 2").unwrap(),
            ])
            .variable("$m", 5)
            .unwrap()
            .width("$z");
        assert_eq!(t.generate().unwrap(), "$m_5,$z_1,$a_w_div_2,w_$z");
    }

    #[test]
    fn test_named_transformations() {
        let t = Transformation::new().named(["thumb", "grey"]).width(100);
        assert_eq!(t.generate().unwrap(), "t_thumb.grey,w_100");
    }

    #[test]
    fn test_layer_errors_propagate() {
        let t = Transformation::new().overlay(crate::layer::TextLayer::new());
        assert!(t.generate().is_err());
    }

    #[test]
    fn test_rendered_serializes() {
        let rendered = render(&Transformation::new().width(300).height(200));
        let value = serde_json::to_value(&rendered).unwrap();
        assert_eq!(value["path"], "h_200,w_300");
        assert_eq!(value["html_width"], "300");
        assert_eq!(value["hi_dpi"], false);
    }
}
