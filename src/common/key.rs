use crate::{Error, Result, common};

use aws_sdk_dynamodb::types;
use serde::{Deserialize, Serialize};
use serde_dynamo::to_attribute_value;

/// Key component.
///
/// ```rust
/// use dynamodb_gateway::common::key;
///
/// let key = key::Key {
///     name: "title".to_string(),
///     value: "The Big New Movie".to_string(),
/// };
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Key<T> {
    /// The attribute name of the key.
    pub name: String,
    /// The value of the key.
    pub value: T,
}

impl<T: Serialize> Key<T> {
    /// Serialize the value, rejecting blank names and empty values.
    pub(crate) fn into_attribute(self, role: &str) -> Result<(String, types::AttributeValue)> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(format!("{role} key name is empty")));
        }
        let value = to_attribute_value(self.value)?;
        let is_empty = match &value {
            types::AttributeValue::S(value) => value.is_empty(),
            types::AttributeValue::B(value) => value.as_ref().is_empty(),
            types::AttributeValue::Null(_) => true,
            _ => false,
        };
        if is_empty {
            return Err(Error::Validation(format!(
                "{role} key `{}` has an empty value",
                self.name
            )));
        }
        Ok((self.name, value))
    }
}

/// Primary key descriptor (partition key and optional sort key).
///
/// ```rust
/// use dynamodb_gateway::common::key;
///
/// let keys = key::Keys {
///     partition_key: key::Key {
///         name: "title".to_string(),
///         value: "The Big New Movie".to_string(),
///     },
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Keys<T> {
    /// The partition key (required).
    pub partition_key: Key<T>,
    /// The sort key, for tables with a composite primary key.
    pub sort_key: Option<Key<T>>,
}

impl<T: Serialize> Keys<T> {
    /// Render the point-lookup conjunction, `#pk = :v AND #sk = :v`.
    pub(crate) fn key_condition(
        self,
        attributes: &mut common::ExpressionAttributes,
    ) -> Result<String> {
        let mut keys = vec![self.partition_key.into_attribute("partition")?];
        if let Some(sort_key) = self.sort_key {
            keys.push(sort_key.into_attribute("sort")?);
        }
        let conditions: Vec<_> = keys
            .into_iter()
            .map(|(name, value)| {
                let name = attributes.attribute(&name);
                let value = attributes.value(value);
                format!("{name} = {value}")
            })
            .collect();
        Ok(conditions.join(" AND "))
    }
}

impl<T: Serialize> TryFrom<Keys<T>> for common::Item {
    type Error = Error;

    fn try_from(keys: Keys<T>) -> Result<Self> {
        let (name, value) = keys.partition_key.into_attribute("partition")?;
        let mut item = Self::from([(name, value)]);
        if let Some(sort_key) = keys.sort_key {
            let (name, value) = sort_key.into_attribute("sort")?;
            item.insert(name, value);
        }
        Ok(item)
    }
}
