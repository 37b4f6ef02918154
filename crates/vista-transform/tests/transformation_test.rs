mod helpers;

use helpers::{path, render_with};
use serde_json::json;
use vista_transform::{
    normalize, norm_auto_range_value, norm_range_value, BaseLayer, CodecSpec, Condition,
    Expression, ExpressionBuilder, FetchLayer, GenerateConfig, LayerBuilder, Radius,
    SubtitlesLayer, TextLayer, Transformation, TransformError, VideoLayer,
};

// =========================================================================
// NORMALIZER
// =========================================================================

#[test]
fn test_normalize_properties() {
    assert_eq!(normalize(Some("w_gt_1000")).as_deref(), Some("w_gt_1000"));
    assert_eq!(normalize(Some("width >= 100")).as_deref(), Some("w_gte_100"));
    assert_eq!(
        normalize(Some("$width > width")).as_deref(),
        Some("$width_gt_w")
    );
    assert_eq!(normalize(None), None);
}

// =========================================================================
// IMAGE SCENARIOS
// =========================================================================

#[test]
fn test_profile_picture() {
    let t = Transformation::new()
        .width(500)
        .crop("fill")
        .gravity("face")
        .radius(20)
        .quality(80);
    assert_eq!(path(&t), "c_fill,g_face,q_80,r_20,w_500");
}

#[test]
fn test_call_order_does_not_matter() {
    let a = Transformation::new().width(100).crop("fill");
    let b = Transformation::new().crop("fill").width(100);
    assert_eq!(path(&a), "c_fill,w_100");
    assert_eq!(path(&a), path(&b));
}

#[test]
fn test_watermarked_thumbnail_chain() {
    let logo = BaseLayer::new()
        .public_id("brand/logo")
        .and_then(|l| l.format("png"))
        .unwrap();
    let t = Transformation::new()
        .width(400)
        .height(400)
        .crop("thumb")
        .gravity("face")
        .chain()
        .overlay(logo)
        .gravity("south_east")
        .x(10)
        .y(10)
        .opacity(60)
        .chain()
        .corner_radius(Radius::pair(20, 40).unwrap())
        .fetch_format("auto")
        .quality("auto");
    assert_eq!(
        path(&t),
        "c_thumb,g_face,h_400,w_400/g_south_east,l_brand:logo.png,o_60,x_10,y_10/f_auto,q_auto,r_20:40"
    );
}

#[test]
fn test_text_caption_overlay() {
    let caption = TextLayer::new()
        .font_family("Roboto")
        .font_size(32)
        .font_weight("bold")
        .text("Summer, 2024");
    let t = Transformation::new()
        .overlay(caption)
        .color("#ffffff")
        .gravity("north")
        .y(20);
    assert_eq!(
        path(&t),
        "co_rgb:ffffff,g_north,l_text:Roboto_32_bold:Summer%252C%202024,y_20"
    );
}

#[test]
fn test_fetch_and_video_layers() {
    let t = Transformation::new()
        .overlay(FetchLayer::new().url("https://example.com/logo.png"))
        .chain()
        .underlay(VideoLayer::new().public_id("intro").unwrap());
    assert_eq!(
        path(&t),
        "l_fetch:aHR0cHM6Ly9leGFtcGxlLmNvbS9sb2dvLnBuZw==/u_video:intro"
    );
}

#[test]
fn test_restricted_layer_setter_fails() {
    let err = TextLayer::new().format("png").unwrap_err();
    assert!(matches!(
        err,
        TransformError::RestrictedLayerField { layer: "text", field: "format" }
    ));
    assert!(err.is_invalid_argument());
}

// =========================================================================
// CONDITIONALS AND VARIABLES
// =========================================================================

#[test]
fn test_conditional_bracket() {
    let t = Transformation::new()
        .if_condition("w_gt_1000")
        .crop("fill")
        .width(500)
        .end_if();
    assert_eq!(path(&t), "if_w_gt_1000,c_fill,w_500/if_end");
}

#[test]
fn test_conditional_with_else_branch() {
    let t = Transformation::new()
        .if_condition_builder()
        .aspect_ratio(">", "3:4")
        .then()
        .width(100)
        .crop("fill")
        .if_else()
        .width(50)
        .crop("scale")
        .end_if()
        .effect("sharpen");
    assert_eq!(
        path(&t),
        "if_ar_gt_3:4/c_fill,w_100/if_else/c_scale,w_50/if_end/e_sharpen"
    );
}

#[test]
fn test_condition_from_expression_builder() {
    let condition = Condition::new()
        .value("face_count")
        .gte_value(1)
        .and()
        .value("width")
        .lt_value(800);
    let t = Transformation::new()
        .if_condition(condition.to_string())
        .effect("pixelate_faces")
        .end_if();
    assert_eq!(path(&t), "if_fc_gte_1_and_w_lt_800,e_pixelate_faces/if_end");
}

#[test]
fn test_user_variables() {
    let t = Transformation::new()
        .variable("$ratio", Expression::initial_width().div_value(Expression::initial_height()))
        .unwrap()
        .variable("$size", 300)
        .unwrap()
        .chain()
        .width("$size")
        .height("$size / $ratio")
        .crop("fill");
    assert_eq!(
        path(&t),
        "$ratio_iw_div_ih,$size_300/c_fill,h_$size_div_$ratio,w_$size"
    );
}

#[test]
fn test_invalid_variable_name() {
    let err = Expression::variable("$1st", 10).unwrap_err();
    assert!(matches!(err, TransformError::InvalidVariableName(ref name) if name == "$1st"));
    assert_eq!(err.error_code(), "INVALID_VARIABLE_NAME");
}

// =========================================================================
// VIDEO
// =========================================================================

#[test]
fn test_video_trim_and_encode() {
    let t = Transformation::new()
        .offset("10%..90%")
        .video_codec_spec(CodecSpec::new("h264").profile("baseline").level("3.1"))
        .audio_codec("aac")
        .bit_rate("1m")
        .chain()
        .overlay(SubtitlesLayer::new().public_id("subs/en.srt").unwrap());
    assert_eq!(
        path(&t),
        "ac_aac,br_1m,eo_90p,so_10p,vc_h264:baseline:3.1/l_subtitles:subs:en.srt"
    );
}

#[test]
fn test_range_helpers() {
    assert_eq!(norm_range_value(Some("50%")).as_deref(), Some("50p"));
    assert_eq!(norm_range_value(Some("abc")), None);
    assert_eq!(norm_auto_range_value(Some("auto")).as_deref(), Some("auto"));
}

#[test]
fn test_invalid_video_arguments() {
    assert!(matches!(
        Transformation::new().offset_range([1]).unwrap_err(),
        TransformError::InvalidRange(_)
    ));
    assert!(matches!(
        Transformation::new().keyframe_interval(-2.0).unwrap_err(),
        TransformError::InvalidKeyframeInterval(_)
    ));
}

#[test]
fn test_radius_validation() {
    assert!(Radius::from_values([1, 2, 3, 4, 5]).is_err());
    assert_eq!(Radius::from_values([10, 20]).unwrap().to_string(), "10:20");
}

// =========================================================================
// CONFIG AND RENDER
// =========================================================================

#[test]
fn test_render_with_config() {
    let config = GenerateConfig::default()
        .with_default_dpr("auto")
        .with_responsive(true);
    let rendered = render_with(&Transformation::new().width(640).crop("fill"), &config);
    assert_eq!(rendered.path, "c_fill,dpr_auto,w_640/w_auto,c_limit");
    assert!(rendered.hi_dpi);
    assert!(rendered.is_responsive);
    assert!(rendered.html_attributes().is_empty());
}

#[test]
fn test_html_attributes_for_static_size() {
    let rendered = render_with(
        &Transformation::new().width(640).height(480).crop("fill"),
        &GenerateConfig::default(),
    );
    assert_eq!(
        rendered.html_attributes(),
        vec![("width", "640"), ("height", "480")]
    );
}

#[test]
fn test_json_round_trip_through_model() {
    let t = Transformation::from_json(&json!([
        {"width": 200, "height": 200, "crop": "thumb", "gravity": "face"},
        {"angle": ["auto_right", "hflip"], "effect": "grayscale"}
    ]))
    .unwrap();
    assert_eq!(
        path(&t),
        "c_thumb,g_face,h_200,w_200/a_auto_right.hflip,e_grayscale"
    );
}

#[test]
fn test_clone_keeps_original_intact() {
    let base = Transformation::new().width(100).crop("scale");
    let variant = base.clone().width(200).effect("blur");
    assert_eq!(path(&base), "c_scale,w_100");
    assert_eq!(path(&variant), "c_scale,e_blur,w_200");
}
