//! Parent/child rules between buildings and their units.

use crate::error::CoreError;
use crate::taxonomy::PropertyType;

/// Only buildings hold units.
pub fn can_have_units(property_type: PropertyType) -> bool {
    property_type == PropertyType::Building
}

/// Whether `property_type` must be created under a parent.
pub fn requires_parent(property_type: PropertyType) -> bool {
    property_type == PropertyType::Unit
}

/// Check a proposed parent for a new or moved property.
///
/// A `Unit` needs a `Building` parent; every other type stands alone.
pub fn validate_parent(
    child: PropertyType,
    parent: Option<PropertyType>,
) -> Result<(), CoreError> {
    match (child, parent) {
        (PropertyType::Unit, Some(PropertyType::Building)) => Ok(()),
        (PropertyType::Unit, Some(other)) => Err(CoreError::Validation(format!(
            "A unit must belong to a building, not a {}",
            other.as_str()
        ))),
        (PropertyType::Unit, None) => Err(CoreError::Validation(
            "A unit must belong to a building".to_string(),
        )),
        (PropertyType::Building, Some(_)) => Err(CoreError::Validation(
            "A building cannot have a parent property".to_string(),
        )),
        (other, Some(_)) => Err(CoreError::Validation(format!(
            "A {} cannot have a parent property",
            other.as_str()
        ))),
        (_, None) => Ok(()),
    }
}
