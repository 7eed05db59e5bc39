//! Filter expression model
//!
//! Conditions are leaves, groups are internal nodes. Values never appear in
//! rendered text; they travel alongside it and are bound positionally.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::data::value::Scalar;

/// Malformed filter expression
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),
}

impl FilterError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidExpression(message.into())
    }
}

/// Comparison operator of a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    Like,
}

impl ComparisonOp {
    /// SQL token rendered between field and placeholder
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Lte => "<=",
            Self::Gte => ">=",
            Self::Like => "LIKE",
        }
    }

    /// Clause rendered after the placeholder. Patterns escape with `\`.
    pub fn trailing_sql(&self) -> &'static str {
        match self {
            Self::Like => " ESCAPE '\\'",
            _ => "",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for ComparisonOp {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "=" => Ok(Self::Eq),
            "<>" | "!=" => Ok(Self::Ne),
            "<" => Ok(Self::Lt),
            ">" => Ok(Self::Gt),
            "<=" => Ok(Self::Lte),
            ">=" => Ok(Self::Gte),
            token if token.eq_ignore_ascii_case("like") => Ok(Self::Like),
            other => Err(FilterError::invalid(format!(
                "unknown comparison operator '{}'",
                other
            ))),
        }
    }
}

/// Connective joining sibling nodes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    #[default]
    And,
    Or,
}

impl LogicalOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for LogicalOp {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.eq_ignore_ascii_case("and") {
            Ok(Self::And)
        } else if token.eq_ignore_ascii_case("or") {
            Ok(Self::Or)
        } else {
            Err(FilterError::invalid(format!(
                "unknown logical connective '{}'",
                token
            )))
        }
    }
}

/// Leaf node: `field op value`
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    field: String,
    operator: ComparisonOp,
    value: Scalar,
}

impl Condition {
    /// Create a condition. The field name must not be empty.
    pub fn new(
        field: impl Into<String>,
        operator: ComparisonOp,
        value: impl Into<Scalar>,
    ) -> Result<Self, FilterError> {
        let field = field.into();
        if field.trim().is_empty() {
            return Err(FilterError::invalid("condition field name is empty"));
        }
        Ok(Self {
            field,
            operator,
            value: value.into(),
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operator(&self) -> ComparisonOp {
        self.operator
    }

    pub fn value(&self) -> &Scalar {
        &self.value
    }
}

/// Internal node: children joined by one connective
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    connective: LogicalOp,
    children: Vec<FilterNode>,
}

impl Group {
    pub fn new(connective: LogicalOp, children: Vec<FilterNode>) -> Self {
        Self {
            connective,
            children,
        }
    }

    pub fn connective(&self) -> LogicalOp {
        self.connective
    }

    pub fn children(&self) -> &[FilterNode] {
        &self.children
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    Condition(Condition),
    Group(Group),
}

impl From<Condition> for FilterNode {
    fn from(condition: Condition) -> Self {
        Self::Condition(condition)
    }
}

impl From<Group> for FilterNode {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

/// Parameterized condition text with its values in placeholder order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledFragment {
    pub text: String,
    pub values: Vec<Scalar>,
}

impl CompiledFragment {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
