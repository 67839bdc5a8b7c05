// Header-based identity source: a stand-in for the real auth middleware that
// terminates the external provider's session and forwards verified claims.

use axum::http::HeaderMap;

use crate::modules::users::core::user::IdentityClaims;
use crate::modules::users::ports::IdentitySource;

pub const PROVIDER_HEADER: &str = "x-identity-provider";
pub const EXTERNAL_ID_HEADER: &str = "x-external-id";
pub const NAME_HEADER: &str = "x-user-name";
pub const EMAIL_HEADER: &str = "x-user-email";

pub struct HeaderIdentitySource {
    claims: Option<IdentityClaims>,
}

impl HeaderIdentitySource {
    /// A request without the provider header is anonymous; with it, the other
    /// headers become claims (blank ones surface as malformed downstream).
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };
        let claims = headers.get(PROVIDER_HEADER).map(|_| IdentityClaims {
            provider: header(PROVIDER_HEADER),
            external_id: header(EXTERNAL_ID_HEADER),
            name: header(NAME_HEADER),
            email: header(EMAIL_HEADER),
        });
        Self { claims }
    }
}

impl IdentitySource for HeaderIdentitySource {
    fn claims(&self) -> Option<IdentityClaims> {
        self.claims.clone()
    }
}

#[cfg(test)]
mod header_identity_source_tests {
    use super::*;
    use axum::http::HeaderValue;
    use rstest::rstest;

    #[rstest]
    fn it_should_treat_a_request_without_provider_as_anonymous() {
        let source = HeaderIdentitySource::from_headers(&HeaderMap::new());
        assert!(source.claims().is_none());
    }

    #[rstest]
    fn it_should_build_claims_from_the_four_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(PROVIDER_HEADER, HeaderValue::from_static("github"));
        headers.insert(EXTERNAL_ID_HEADER, HeaderValue::from_static("ext-1"));
        headers.insert(NAME_HEADER, HeaderValue::from_static("Alex"));
        headers.insert(EMAIL_HEADER, HeaderValue::from_static("alex@example.com"));
        let claims = HeaderIdentitySource::from_headers(&headers).claims().unwrap();
        assert_eq!(claims.provider, "github");
        assert_eq!(claims.external_id, "ext-1");
        assert_eq!(claims.name, "Alex");
        assert_eq!(claims.email, "alex@example.com");
    }

    #[rstest]
    fn it_should_leave_missing_claim_fields_blank() {
        let mut headers = HeaderMap::new();
        headers.insert(PROVIDER_HEADER, HeaderValue::from_static("github"));
        let claims = HeaderIdentitySource::from_headers(&headers).claims().unwrap();
        assert!(claims.external_id.is_empty());
    }
}
