//! Generation defaults
//!
//! Defaults that apply to every generated transformation (default DPR,
//! responsive mode and the responsive width segment) are carried by an
//! immutable [`GenerateConfig`] passed to
//! [`Transformation::render`](crate::Transformation::render).

use std::env;

use crate::transformation::Transformation;

const DEFAULT_RESPONSIVE_WIDTH_TRANSFORMATION: &str = "w_auto,c_limit";

#[derive(Clone, Debug)]
pub struct GenerateConfig {
    /// DPR used when a segment does not set `dpr` itself
    pub default_dpr: Option<String>,
    /// Whether segments without `responsive_width` are responsive
    pub default_is_responsive: bool,
    /// Segment appended after every responsive segment
    pub responsive_width_transformation: Transformation,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            default_dpr: None,
            default_is_responsive: false,
            responsive_width_transformation: Transformation::new()
                .raw_transformation(DEFAULT_RESPONSIVE_WIDTH_TRANSFORMATION),
        }
    }
}

impl GenerateConfig {
    /// Load defaults from the environment (and a `.env` file if present).
    ///
    /// * `VISTA_DEFAULT_DPR` - default device pixel ratio (`"auto"`, `"2.0"`)
    /// * `VISTA_RESPONSIVE` - `true`/`false`, default `false`
    /// * `VISTA_RESPONSIVE_WIDTH_TRANSFORMATION` - responsive segment,
    ///   default `w_auto,c_limit`
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let default_dpr = lookup("VISTA_DEFAULT_DPR").filter(|dpr| !dpr.trim().is_empty());

        let default_is_responsive = lookup("VISTA_RESPONSIVE")
            .unwrap_or_else(|| "false".to_string())
            .to_lowercase()
            .parse()
            .map_err(|_| anyhow::anyhow!("VISTA_RESPONSIVE must be 'true' or 'false'"))?;

        let responsive = lookup("VISTA_RESPONSIVE_WIDTH_TRANSFORMATION")
            .filter(|raw| !raw.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_RESPONSIVE_WIDTH_TRANSFORMATION.to_string());

        tracing::debug!(
            default_dpr = ?default_dpr,
            default_is_responsive,
            responsive_width_transformation = %responsive,
            "Loaded generation defaults"
        );

        Ok(Self {
            default_dpr,
            default_is_responsive,
            responsive_width_transformation: Transformation::new().raw_transformation(responsive),
        })
    }

    pub fn with_default_dpr(mut self, dpr: impl Into<String>) -> Self {
        self.default_dpr = Some(dpr.into());
        self
    }

    pub fn with_responsive(mut self, responsive: bool) -> Self {
        self.default_is_responsive = responsive;
        self
    }

    pub fn with_responsive_width_transformation(mut self, transformation: Transformation) -> Self {
        self.responsive_width_transformation = transformation;
        self
    }
}
