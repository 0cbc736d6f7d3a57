use crate::{Error, Result, common};

use serde::{Deserialize, Serialize};
use serde_dynamo::to_attribute_value;
use std::ops;

/// Logical operator for combining conditions.
#[derive(Clone, Debug, PartialEq)]
pub enum LogicalOperator {
    /// Logical AND - all conditions must be true.
    And,
    /// Logical OR - at least one condition must be true.
    Or,
}

impl ops::Deref for LogicalOperator {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::And => " AND ",
            Self::Or => " OR ",
        }
    }
}

/// Condition types for DynamoDB expressions.
///
/// Deserializes from snake_case JSON, e.g. `{"equals": 1}`,
/// `{"between": [1, 9]}` or `"exists"`.
///
/// ```rust
/// use dynamodb_gateway::common::condition;
///
/// let eq = condition::Condition::Equals("value".to_string());
/// let gt = condition::Condition::GreaterThan(100);
/// let missing: condition::Condition<String> = condition::Condition::NotExists;
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Condition<T> {
    /// Checks if an attribute begins with a specified prefix (string types only).
    BeginsWith(String),
    /// Checks if an attribute value is between two values (inclusive).
    Between(T, T),
    /// Checks if an attribute contains a specified value.
    Contains(T),
    /// Checks if an attribute value equals a specified value.
    Equals(T),
    /// Checks if an attribute value is greater than a specified value.
    GreaterThan(T),
    /// Checks if an attribute value is greater than or equal to a specified value.
    GreaterThanOrEqual(T),
    /// Checks if an attribute value is in a list of specified values.
    In(Vec<T>),
    /// Checks if an attribute value is less than a specified value.
    LessThan(T),
    /// Checks if an attribute value is less than or equal to a specified value.
    LessThanOrEqual(T),
    /// Checks if an attribute does not contain a specified value.
    NotContains(T),
    /// Checks if an attribute value does not equal a specified value.
    NotEqual(T),
    /// Checks if an attribute exists.
    Exists,
    /// Checks if an attribute does not exist.
    NotExists,
}

fn placeholder<T: Serialize>(
    attributes: &mut common::ExpressionAttributes,
    value: T,
) -> Result<String> {
    Ok(attributes.value(to_attribute_value(value)?))
}

impl<T: Serialize> Condition<T> {
    /// Whether the store accepts this operator in a key condition.
    pub fn is_key_condition(&self) -> bool {
        matches!(
            self,
            Self::BeginsWith(_)
                | Self::Between(..)
                | Self::Equals(_)
                | Self::GreaterThan(_)
                | Self::GreaterThanOrEqual(_)
                | Self::LessThan(_)
                | Self::LessThanOrEqual(_)
        )
    }

    pub(crate) fn render(
        self,
        path: &str,
        attributes: &mut common::ExpressionAttributes,
    ) -> Result<String> {
        let name = attributes.path(path);
        let expression = match self {
            Self::BeginsWith(prefix) => {
                let value = placeholder(attributes, prefix)?;
                format!("begins_with({name}, {value})")
            }
            Self::Between(low, high) => {
                let low = placeholder(attributes, low)?;
                let high = placeholder(attributes, high)?;
                format!("{name} BETWEEN {low} AND {high}")
            }
            Self::Contains(value) => {
                let value = placeholder(attributes, value)?;
                format!("contains({name}, {value})")
            }
            Self::Equals(value) => format!("{name} = {}", placeholder(attributes, value)?),
            Self::GreaterThan(value) => format!("{name} > {}", placeholder(attributes, value)?),
            Self::GreaterThanOrEqual(value) => {
                format!("{name} >= {}", placeholder(attributes, value)?)
            }
            Self::In(values) => {
                if values.is_empty() {
                    return Err(Error::Validation(format!(
                        "`in` condition on `{path}` has no values"
                    )));
                }
                let placeholders = values
                    .into_iter()
                    .map(|value| placeholder(attributes, value))
                    .collect::<Result<Vec<_>>>()?;
                format!("{name} IN ({})", placeholders.join(", "))
            }
            Self::LessThan(value) => format!("{name} < {}", placeholder(attributes, value)?),
            Self::LessThanOrEqual(value) => {
                format!("{name} <= {}", placeholder(attributes, value)?)
            }
            Self::NotContains(value) => {
                let value = placeholder(attributes, value)?;
                format!("NOT contains({name}, {value})")
            }
            Self::NotEqual(value) => format!("{name} <> {}", placeholder(attributes, value)?),
            Self::Exists => format!("attribute_exists({name})"),
            Self::NotExists => format!("attribute_not_exists({name})"),
        };
        Ok(expression)
    }
}

/// Condition applied to a named attribute; dotted names address nested maps.
///
/// ```rust
/// use dynamodb_gateway::common::condition;
///
/// let rating = condition::FieldCondition {
///     name: "info.rating".to_string(),
///     condition: condition::Condition::GreaterThanOrEqual(7),
/// };
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct FieldCondition<T> {
    /// The attribute path the condition applies to.
    pub name: String,
    /// The condition to apply.
    pub condition: Condition<T>,
}

impl<T: Serialize> FieldCondition<T> {
    pub(crate) fn render(self, attributes: &mut common::ExpressionAttributes) -> Result<String> {
        if self.name.split('.').any(|segment| segment.trim().is_empty()) {
            return Err(Error::Validation(format!(
                "invalid attribute path `{}`",
                self.name
            )));
        }
        self.condition.render(&self.name, attributes)
    }
}

/// Boolean tree of field conditions, used for filter and condition expressions.
///
/// ```rust
/// use dynamodb_gateway::common::condition;
///
/// let filter = condition::Filter::All(vec![
///     condition::Filter::Field(condition::FieldCondition {
///         name: "status".to_string(),
///         condition: condition::Condition::Equals("active".to_string()),
///     }),
///     condition::Filter::Field(condition::FieldCondition {
///         name: "deleted".to_string(),
///         condition: condition::Condition::NotExists,
///     }),
/// ]);
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Filter<T> {
    /// A single field condition.
    Field(FieldCondition<T>),
    /// Every child must hold.
    All(Vec<Filter<T>>),
    /// At least one child must hold.
    Any(Vec<Filter<T>>),
    /// The child must not hold.
    Not(Box<Filter<T>>),
}

impl<T: Serialize> Filter<T> {
    pub(crate) fn render(self, attributes: &mut common::ExpressionAttributes) -> Result<String> {
        self.render_nested(attributes, false)
    }

    fn render_nested(
        self,
        attributes: &mut common::ExpressionAttributes,
        is_nested: bool,
    ) -> Result<String> {
        let (operator, children) = match self {
            Self::Field(field) => return field.render(attributes),
            Self::Not(child) => {
                return Ok(format!("NOT ({})", child.render_nested(attributes, false)?));
            }
            Self::All(children) => (LogicalOperator::And, children),
            Self::Any(children) => (LogicalOperator::Or, children),
        };
        if children.is_empty() {
            return Err(Error::Validation("empty condition group".to_string()));
        }
        let is_composite = is_nested && children.len() > 1;
        let expressions = children
            .into_iter()
            .map(|child| child.render_nested(attributes, true))
            .collect::<Result<Vec<_>>>()?;
        let expression = expressions.join(&*operator);
        if is_composite {
            Ok(format!("({expression})"))
        } else {
            Ok(expression)
        }
    }
}
