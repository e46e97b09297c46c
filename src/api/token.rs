//! Access-token introspection.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;

use super::ApiError;

/// Extracts the account id (the `sub` claim) from a JWT access token.
///
/// The account endpoints key requests on this id, so a token that cannot
/// be decoded is unusable and reported as an error rather than degraded.
pub fn account_id_from_token(token: &str) -> Result<String, ApiError> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ApiError::Token(
            "access token is not a three-part JWT".to_string(),
        ));
    };

    let decoded = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|error| ApiError::Token(format!("token payload is not base64: {error}")))?;
    let claims: Value = serde_json::from_slice(&decoded)
        .map_err(|error| ApiError::Token(format!("token payload is not JSON: {error}")))?;

    claims
        .get("sub")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| ApiError::Token("token payload has no sub claim".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_with_payload(payload: &str) -> String {
        let encoded = URL_SAFE_NO_PAD.encode(payload);
        format!("header.{encoded}.signature")
    }

    #[test]
    fn extracts_sub_claim() {
        let token = jwt_with_payload(r#"{"sub": "G6060667", "exp": 1735689600}"#);
        assert_eq!(account_id_from_token(&token).unwrap(), "G6060667");
    }

    #[test]
    fn accepts_padded_payloads() {
        let encoded = URL_SAFE_NO_PAD.encode(r#"{"sub": "G1"}"#);
        let token = format!("h.{encoded}==.s");
        assert_eq!(account_id_from_token(&token).unwrap(), "G1");
    }

    #[test]
    fn rejects_non_jwt_tokens() {
        assert!(matches!(
            account_id_from_token("not-a-jwt"),
            Err(ApiError::Token(_))
        ));
        assert!(matches!(
            account_id_from_token("a.b.c.d"),
            Err(ApiError::Token(_))
        ));
    }

    #[test]
    fn rejects_payloads_without_sub() {
        let token = jwt_with_payload(r#"{"exp": 1735689600}"#);
        assert!(matches!(
            account_id_from_token(&token),
            Err(ApiError::Token(_))
        ));
    }

    #[test]
    fn rejects_undecodable_payloads() {
        assert!(matches!(
            account_id_from_token("h.!!!.s"),
            Err(ApiError::Token(_))
        ));
    }
}
