use crate::{Error, Result, common};

use serde::Deserialize;

/// Attributes to return from a read; dotted paths select nested attributes.
///
/// Deserializes from a plain JSON array of paths.
///
/// ```rust
/// use dynamodb_gateway::common::projection;
///
/// let projection = projection::Projection {
///     attributes: vec!["title".to_string(), "info.rating".to_string()],
/// };
/// ```
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(transparent)]
pub struct Projection {
    /// Attribute paths to return.
    pub attributes: Vec<String>,
}

impl Projection {
    pub(crate) fn render(self, attributes: &mut common::ExpressionAttributes) -> Result<String> {
        if self.attributes.is_empty() {
            return Err(Error::Validation("empty projection".to_string()));
        }
        let mut paths = Vec::with_capacity(self.attributes.len());
        for path in &self.attributes {
            if path.split('.').any(|segment| segment.trim().is_empty()) {
                return Err(Error::Validation(format!("invalid attribute path `{path}`")));
            }
            paths.push(attributes.path(path));
        }
        Ok(paths.join(", "))
    }
}
