//! Expression DSL
//!
//! A fluent token builder producing the compact predicate/arithmetic strings
//! used by conditional transformations and user-defined variables.
//!
//! # Example
//!
//! ```rust
//! use vista_transform::{Expression, ExpressionBuilder};
//!
//! let expr = Expression::initial_width().mul_value(0.5);
//! assert_eq!(expr.serialize(), "iw_mul_0.5");
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::alias::is_short_code;
use crate::error::{Result, TransformError};
use crate::normalize::normalize_str;
use crate::param::IntoScalar;

static VARIABLE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$[a-zA-Z][a-zA-Z0-9]*$").unwrap());

/// Shared token-list behavior of [`Expression`] and
/// [`Condition`](crate::Condition).
pub trait ExpressionBuilder: Sized {
    /// Tokens accumulated so far.
    fn tokens(&self) -> &[String];

    /// Append a raw token.
    fn push_token(&mut self, token: String);

    /// Append a literal value.
    fn value(mut self, value: impl IntoScalar) -> Self {
        self.push_token(value.into_scalar());
        self
    }

    /// Append an operator keyword.
    fn operator(mut self, code: &str) -> Self {
        self.push_token(code.to_string());
        self
    }

    fn mul(self) -> Self {
        self.operator("mul")
    }

    fn div(self) -> Self {
        self.operator("div")
    }

    fn add(self) -> Self {
        self.operator("add")
    }

    fn sub(self) -> Self {
        self.operator("sub")
    }

    fn pow(self) -> Self {
        self.operator("pow")
    }

    fn gt(self) -> Self {
        self.operator("gt")
    }

    fn gte(self) -> Self {
        self.operator("gte")
    }

    fn lt(self) -> Self {
        self.operator("lt")
    }

    fn lte(self) -> Self {
        self.operator("lte")
    }

    fn eq(self) -> Self {
        self.operator("eq")
    }

    fn ne(self) -> Self {
        self.operator("ne")
    }

    fn and(self) -> Self {
        self.operator("and")
    }

    fn or(self) -> Self {
        self.operator("or")
    }

    fn in_(self) -> Self {
        self.operator("in")
    }

    fn nin(self) -> Self {
        self.operator("nin")
    }

    fn mul_value(self, value: impl IntoScalar) -> Self {
        self.mul().value(value)
    }

    fn div_value(self, value: impl IntoScalar) -> Self {
        self.div().value(value)
    }

    fn add_value(self, value: impl IntoScalar) -> Self {
        self.add().value(value)
    }

    fn sub_value(self, value: impl IntoScalar) -> Self {
        self.sub().value(value)
    }

    fn pow_value(self, value: impl IntoScalar) -> Self {
        self.pow().value(value)
    }

    fn gt_value(self, value: impl IntoScalar) -> Self {
        self.gt().value(value)
    }

    fn gte_value(self, value: impl IntoScalar) -> Self {
        self.gte().value(value)
    }

    fn lt_value(self, value: impl IntoScalar) -> Self {
        self.lt().value(value)
    }

    fn lte_value(self, value: impl IntoScalar) -> Self {
        self.lte().value(value)
    }

    fn eq_value(self, value: impl IntoScalar) -> Self {
        self.eq().value(value)
    }

    fn ne_value(self, value: impl IntoScalar) -> Self {
        self.ne().value(value)
    }

    fn and_value(self, value: impl IntoScalar) -> Self {
        self.and().value(value)
    }

    fn or_value(self, value: impl IntoScalar) -> Self {
        self.or().value(value)
    }

    fn in_value(self, value: impl IntoScalar) -> Self {
        self.in_().value(value)
    }

    fn nin_value(self, value: impl IntoScalar) -> Self {
        self.nin().value(value)
    }

    /// Join the tokens with `_` and normalize the result.
    fn serialize(&self) -> String {
        normalize_str(&self.tokens().join("_"))
    }
}

/// Arithmetic or variable expression.
#[derive(Debug, Clone, Default)]
pub struct Expression {
    tokens: Vec<String>,
}

impl Expression {
    /// Create an empty expression
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a free-form expression (`"width * 2"`).
    pub fn raw(expression: impl Into<String>) -> Self {
        Self {
            tokens: vec![expression.into()],
        }
    }

    pub fn width() -> Self {
        Self::raw("width")
    }

    pub fn height() -> Self {
        Self::raw("height")
    }

    pub fn initial_width() -> Self {
        Self::raw("initial_width")
    }

    pub fn initial_height() -> Self {
        Self::raw("initial_height")
    }

    pub fn aspect_ratio() -> Self {
        Self::raw("aspect_ratio")
    }

    pub fn initial_aspect_ratio() -> Self {
        Self::raw("initial_aspect_ratio")
    }

    pub fn page_count() -> Self {
        Self::raw("page_count")
    }

    pub fn face_count() -> Self {
        Self::raw("face_count")
    }

    pub fn current_page() -> Self {
        Self::raw("current_page")
    }

    pub fn tags() -> Self {
        Self::raw("tags")
    }

    pub fn page_x() -> Self {
        Self::raw("page_x")
    }

    pub fn page_y() -> Self {
        Self::raw("page_y")
    }

    pub fn duration() -> Self {
        Self::raw("duration")
    }

    pub fn initial_duration() -> Self {
        Self::raw("initial_duration")
    }

    /// Variable assignment `$name_value`.
    ///
    /// # Errors
    /// `InvalidVariableName` when `name` does not match `^\$[a-zA-Z][a-zA-Z0-9]*$`.
    pub fn variable(name: &str, value: impl IntoScalar) -> Result<Self> {
        check_variable_name(name)?;
        Ok(Self {
            tokens: vec![name.to_string(), value.into_scalar()],
        })
    }
}

impl ExpressionBuilder for Expression {
    fn tokens(&self) -> &[String] {
        &self.tokens
    }

    fn push_token(&mut self, token: String) {
        self.tokens.push(token);
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

/// Whether `name` is a legal user variable name (`$foo`, `$a1`).
pub fn is_variable_name(name: &str) -> bool {
    VARIABLE_NAME.is_match(name)
}

/// Validate a user variable name.
pub fn check_variable_name(name: &str) -> Result<()> {
    if is_variable_name(name) {
        Ok(())
    } else {
        Err(TransformError::InvalidVariableName(name.to_string()))
    }
}

/// Whether a parameter value refers to a user variable or a predefined
/// expression (`$foo`, `iw_div_2`) and therefore has no static pixel size.
pub fn value_contains_variable(value: &str) -> bool {
    if value.contains('$') {
        return true;
    }

    let normalized = normalize_str(value);
    let tokens: Vec<&str> = normalized.split('_').collect();
    tokens.len() > 1 && tokens.iter().any(|token| is_short_code(token))
}
