//! Transformation expression and serialization engine
//!
//! Builds image/video transformation descriptions (resizing, cropping,
//! overlays, effects, conditional branches, user variables, video offsets)
//! and compiles them into the canonical path string used in delivery URLs.
//!
//! # Example
//!
//! ```rust
//! use vista_transform::Transformation;
//!
//! let path = Transformation::new()
//!     .width(500)
//!     .crop("fill")
//!     .gravity("face")
//!     .radius(20)
//!     .quality(80)
//!     .generate()
//!     .unwrap();
//! assert_eq!(path, "c_fill,g_face,q_80,r_20,w_500");
//! ```

pub mod alias;
pub mod condition;
pub mod config;
pub mod error;
pub mod expression;
pub mod layer;
pub mod normalize;
pub mod param;
pub mod radius;
pub mod transformation;

pub use condition::Condition;
pub use config::GenerateConfig;
pub use error::{LogLevel, Result, TransformError};
pub use expression::{
    check_variable_name, is_variable_name, value_contains_variable, Expression, ExpressionBuilder,
};
pub use layer::{
    BaseLayer, FetchLayer, Layer, LayerBuilder, LayerField, SubtitlesLayer, TextLayer, VideoLayer,
};
pub use normalize::{normalize, normalize_str};
pub use param::{format_float, IntoScalar, ParamValue};
pub use radius::Radius;
pub use transformation::generate::Rendered;
pub use transformation::image::CustomFunction;
pub use transformation::video::{
    norm_auto_range_value, norm_range_value, process_video_codec, split_range, CodecSpec,
};
pub use transformation::Transformation;
