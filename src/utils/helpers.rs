use mongodb::bson::oid::ObjectId;

use crate::utils::error::CustomError;

/// Parse a path or body id, naming the entity in the error.
pub fn parse_object_id(raw: &str, entity: &str) -> Result<ObjectId, CustomError> {
    ObjectId::parse_str(raw.trim())
        .map_err(|_| CustomError::ValidationError(format!("Invalid {} ID", entity)))
}

/// Returns the trimmed value when it is present and not blank.
pub fn required(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_ids() {
        let err = parse_object_id("not-an-id", "post").unwrap_err();
        assert_eq!(err.to_string(), "Invalid post ID");
    }

    #[test]
    fn blank_values_are_missing() {
        assert_eq!(required(&Some("  ".into())), None);
        assert_eq!(required(&None), None);
        assert_eq!(required(&Some(" hi ".into())), Some("hi".to_string()));
    }
}
