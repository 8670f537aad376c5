/// Name of the metadata/header entry carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Validates the provided API key against the configured key.
///
/// When no key is configured every request is accepted. Returns `Ok(())` if the key is valid,
/// or an `unauthenticated` status if it is invalid or missing.
#[allow(clippy::result_large_err)]
pub fn validate_api_key(
    expected: Option<&str>,
    provided: Option<&str>,
) -> Result<(), tonic::Status> {
    let Some(expected) = expected else {
        return Ok(());
    };

    let provided =
        provided.ok_or_else(|| tonic::Status::unauthenticated("Missing x-api-key header"))?;

    if provided == expected {
        Ok(())
    } else {
        Err(tonic::Status::unauthenticated("Invalid API key"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_everything_without_configured_key() {
        assert!(validate_api_key(None, None).is_ok());
        assert!(validate_api_key(None, Some("anything")).is_ok());
    }

    #[test]
    fn requires_matching_key() {
        assert!(validate_api_key(Some("secret"), Some("secret")).is_ok());

        let missing = validate_api_key(Some("secret"), None).expect_err("missing key");
        assert_eq!(missing.code(), tonic::Code::Unauthenticated);
        assert!(missing.message().contains("Missing"));

        let wrong = validate_api_key(Some("secret"), Some("guess")).expect_err("wrong key");
        assert_eq!(wrong.code(), tonic::Code::Unauthenticated);
        assert_eq!(wrong.message(), "Invalid API key");
    }
}
