//! Alias and operator tables
//!
//! Static mappings from human readable operators and parameter names to the
//! short codes used in delivery URLs. Pure data.

/// Symbolic operators and their codes.
pub const OPERATORS: &[(&str, &str)] = &[
    ("=", "eq"),
    ("!=", "ne"),
    ("<", "lt"),
    (">", "gt"),
    ("<=", "lte"),
    (">=", "gte"),
    ("&&", "and"),
    ("||", "or"),
    ("*", "mul"),
    ("/", "div"),
    ("+", "add"),
    ("-", "sub"),
    ("^", "pow"),
];

/// Nice parameter names usable inside expressions and their codes.
pub const PARAMETERS: &[(&str, &str)] = &[
    ("width", "w"),
    ("height", "h"),
    ("initial_width", "iw"),
    ("initial_height", "ih"),
    ("aspect_ratio", "ar"),
    ("initial_aspect_ratio", "iar"),
    ("page_count", "pc"),
    ("face_count", "fc"),
    ("current_page", "cp"),
    ("tags", "tags"),
    ("page_x", "px"),
    ("page_y", "py"),
    ("duration", "du"),
    ("initial_duration", "idu"),
    ("illustration_score", "ils"),
    ("context", "ctx"),
];

/// Word operators that have no symbolic form.
pub const WORD_OPERATORS: &[&str] = &["in", "nin"];

/// Transformation parameters copied verbatim into the output under their
/// short key. Sorted by short key.
pub const SIMPLE_PARAMS: &[(&str, &str)] = &[
    ("ac", "audio_codec"),
    ("af", "audio_frequency"),
    ("bo", "border"),
    ("br", "bit_rate"),
    ("cs", "color_space"),
    ("d", "default_image"),
    ("dl", "delay"),
    ("dn", "density"),
    ("f", "fetch_format"),
    ("fps", "fps"),
    ("g", "gravity"),
    ("ki", "keyframe_interval"),
    ("l", "overlay"),
    ("p", "prefix"),
    ("pg", "page"),
    ("sp", "streaming_profile"),
    ("u", "underlay"),
    ("vs", "video_sampling"),
];

/// Look up the code of a symbolic operator (`">="` -> `"gte"`).
pub fn operator_code(op: &str) -> Option<&'static str> {
    OPERATORS
        .iter()
        .find(|(symbol, _)| *symbol == op)
        .map(|(_, code)| *code)
}

/// Look up the code of a nice parameter name (`"width"` -> `"w"`).
pub fn parameter_code(name: &str) -> Option<&'static str> {
    PARAMETERS
        .iter()
        .find(|(nice, _)| *nice == name)
        .map(|(_, code)| *code)
}

/// Look up either table, operators first.
pub fn alias_code(name: &str) -> Option<&'static str> {
    operator_code(name).or_else(|| parameter_code(name))
}

/// Whether `token` is one of the short codes produced by either table.
pub fn is_short_code(token: &str) -> bool {
    OPERATORS.iter().any(|(_, code)| *code == token)
        || PARAMETERS.iter().any(|(_, code)| *code == token)
        || WORD_OPERATORS.contains(&token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_lookup() {
        assert_eq!(operator_code(">="), Some("gte"));
        assert_eq!(operator_code(">"), Some("gt"));
        assert_eq!(operator_code("||"), Some("or"));
        assert_eq!(operator_code("gt"), None);
    }

    #[test]
    fn test_parameter_lookup() {
        assert_eq!(parameter_code("width"), Some("w"));
        assert_eq!(parameter_code("initial_aspect_ratio"), Some("iar"));
        assert_eq!(parameter_code("w"), None);
    }

    #[test]
    fn test_alias_code_prefers_operators() {
        assert_eq!(alias_code("*"), Some("mul"));
        assert_eq!(alias_code("face_count"), Some("fc"));
        assert_eq!(alias_code("unknown"), None);
    }

    #[test]
    fn test_short_codes() {
        for code in ["w", "ih", "gte", "mul", "in", "nin", "tags"] {
            assert!(is_short_code(code), "{} should be a short code", code);
        }
        assert!(!is_short_code("width"));
        assert!(!is_short_code("100"));
    }

    #[test]
    fn test_simple_params_sorted_by_short_key() {
        let keys: Vec<&str> = SIMPLE_PARAMS.iter().map(|(k, _)| *k).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
