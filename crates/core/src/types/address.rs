//! Delivery address value object.

use serde::{Deserialize, Serialize};

/// Errors that can occur when validating an [`Address`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// One or more required fields were empty.
    #[error("missing required address fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

impl AddressError {
    /// The names of the offending fields.
    #[must_use]
    pub fn fields(&self) -> &[&'static str] {
        match self {
            Self::MissingFields(fields) => fields,
        }
    }
}

/// A delivery address.
///
/// All five fields are required. Addresses are copied verbatim onto orders at
/// placement time, so later edits to a profile address never mutate
/// historical orders.
///
/// ## Examples
///
/// ```
/// use greenbasket_core::Address;
///
/// let address = Address::new("123 Main St", "New York", "NY", "10001", "USA").unwrap();
/// assert_eq!(address.city, "New York");
///
/// // Empty fields are rejected, all at once:
/// let err = Address::new("", "New York", "", "10001", "USA").unwrap_err();
/// assert_eq!(err.fields(), ["street", "state"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    #[serde(rename = "zipCode")]
    pub zip_code: String,
    pub country: String,
}

impl Address {
    /// Build a validated address.
    ///
    /// Inputs are trimmed; a field that is empty after trimming counts as
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::MissingFields`] listing every empty field.
    pub fn new(
        street: &str,
        city: &str,
        state: &str,
        zip_code: &str,
        country: &str,
    ) -> Result<Self, AddressError> {
        // Field names match the wire (serde) representation so errors can be
        // attached to the offending form field.
        let mut missing = Vec::new();
        for (name, value) in [
            ("street", street),
            ("city", city),
            ("state", state),
            ("zipCode", zip_code),
            ("country", country),
        ] {
            if value.trim().is_empty() {
                missing.push(name);
            }
        }

        if !missing.is_empty() {
            return Err(AddressError::MissingFields(missing));
        }

        Ok(Self {
            street: street.trim().to_owned(),
            city: city.trim().to_owned(),
            state: state.trim().to_owned(),
            zip_code: zip_code.trim().to_owned(),
            country: country.trim().to_owned(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_address() {
        let address = Address::new("123 Main St", "New York", "NY", "10001", "USA").unwrap();
        assert_eq!(address.street, "123 Main St");
        assert_eq!(address.zip_code, "10001");
    }

    #[test]
    fn test_inputs_are_trimmed() {
        let address = Address::new("  123 Main St ", "New York", "NY", " 10001", "USA").unwrap();
        assert_eq!(address.street, "123 Main St");
        assert_eq!(address.zip_code, "10001");
    }

    #[test]
    fn test_all_missing_fields_reported() {
        let err = Address::new("", "  ", "NY", "", "USA").unwrap_err();
        assert_eq!(err.fields(), ["street", "city", "zipCode"]);
    }

    #[test]
    fn test_serde_uses_zip_code_alias() {
        let address = Address::new("123 Main St", "New York", "NY", "10001", "USA").unwrap();
        let json = serde_json::to_value(&address).unwrap();
        assert_eq!(json["zipCode"], "10001");
    }
}
