//! Condition DSL
//!
//! Builds the predicate of an `if_...` clause. A condition started from a
//! transformation with [`Transformation::if_condition_builder`] writes itself
//! back into that transformation on [`Condition::then`].

use std::fmt;

use crate::alias::operator_code;
use crate::expression::ExpressionBuilder;
use crate::param::IntoScalar;
use crate::transformation::Transformation;

#[derive(Debug, Clone, Default)]
pub struct Condition {
    tokens: Vec<String>,
    parent: Option<Box<Transformation>>,
}

impl Condition {
    /// Create a standalone condition
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a free-form predicate (`"w_gt_1000"` or `"width > 1000"`).
    pub fn raw(predicate: impl Into<String>) -> Self {
        Self {
            tokens: vec![predicate.into()],
            parent: None,
        }
    }

    pub(crate) fn with_parent(parent: Transformation) -> Self {
        Self {
            tokens: Vec::new(),
            parent: Some(Box::new(parent)),
        }
    }

    /// `w_<op>_<value>`
    pub fn width(self, operator: &str, value: impl IntoScalar) -> Self {
        self.predicate("w", operator, value)
    }

    /// `h_<op>_<value>`
    pub fn height(self, operator: &str, value: impl IntoScalar) -> Self {
        self.predicate("h", operator, value)
    }

    /// `iw_<op>_<value>`
    pub fn initial_width(self, operator: &str, value: impl IntoScalar) -> Self {
        self.predicate("iw", operator, value)
    }

    /// `ih_<op>_<value>`
    pub fn initial_height(self, operator: &str, value: impl IntoScalar) -> Self {
        self.predicate("ih", operator, value)
    }

    /// `ar_<op>_<value>`; the value may be a ratio such as `"3:4"`.
    pub fn aspect_ratio(self, operator: &str, value: impl IntoScalar) -> Self {
        self.predicate("ar", operator, value)
    }

    /// `fc_<op>_<value>`
    pub fn face_count(self, operator: &str, value: impl IntoScalar) -> Self {
        self.predicate("fc", operator, value)
    }

    /// `pc_<op>_<value>`
    pub fn page_count(self, operator: &str, value: impl IntoScalar) -> Self {
        self.predicate("pc", operator, value)
    }

    fn predicate(mut self, name: &str, operator: &str, value: impl IntoScalar) -> Self {
        let code = operator_code(operator).unwrap_or(operator);
        self.tokens
            .push(format!("{}_{}_{}", name, code, value.into_scalar()));
        self
    }

    /// Write this predicate into the parent transformation's `if` parameter
    /// and hand the parent back for further chaining.
    pub fn then(self) -> Transformation {
        let predicate = self.serialize();
        let parent = self.parent.map(|parent| *parent).unwrap_or_default();
        parent.if_condition(predicate)
    }
}

impl ExpressionBuilder for Condition {
    fn tokens(&self) -> &[String] {
        &self.tokens
    }

    fn push_token(&mut self, token: String) {
        self.tokens.push(token);
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_named_predicates() {
        let cond = Condition::new().width(">", 100);
        assert_eq!(cond.serialize(), "w_gt_100");

        let cond = Condition::new().aspect_ratio(">=", "3:4");
        assert_eq!(cond.serialize(), "ar_gte_3:4");

        let cond = Condition::new().face_count("=", 2);
        assert_eq!(cond.serialize(), "fc_eq_2");
    }

    #[test]
    fn test_condition_unknown_operator_used_literally() {
        let cond = Condition::new().page_count("lte", 5);
        assert_eq!(cond.serialize(), "pc_lte_5");
    }

    #[test]
    fn test_condition_combines_predicates() {
        let cond = Condition::new()
            .initial_width("<", 400)
            .and()
            .initial_height("<=", 300.0)
            .or()
            .height("!=", 10);
        assert_eq!(cond.to_string(), "iw_lt_400_and_ih_lte_300.0_or_h_ne_10");
    }

    #[test]
    fn test_condition_raw_is_normalized() {
        assert_eq!(Condition::raw("width > 1000").to_string(), "w_gt_1000");
        assert_eq!(Condition::raw("w_gt_1000").to_string(), "w_gt_1000");
    }

    #[test]
    fn test_condition_then_on_standalone_condition() {
        let t = Condition::new().width(">", 500).then().crop("scale");
        assert_eq!(t.generate().unwrap(), "if_w_gt_500,c_scale");
    }

    #[test]
    fn test_condition_then_returns_parent() {
        let t = Transformation::new()
            .width(300)
            .chain()
            .if_condition_builder()
            .face_count(">", 1)
            .then()
            .crop("thumb");
        assert_eq!(t.generate().unwrap(), "w_300/if_fc_gt_1,c_thumb");
    }
}
