//! Explicit request context for API calls.
//!
//! Credentials and tenant identity are constructor arguments, threaded into
//! every client call. Tests construct a context pointing at a mock server;
//! nothing is read from shared storage behind the caller's back.

use url::Url;

use super::error::Result;

/// Everything a request needs to reach the right tenant on the right server.
#[derive(Debug, Clone)]
pub struct RequestContext {
    base_url: Url,
    token: String,
    tenant: String,
}

impl RequestContext {
    /// Build a context from an already-parsed base URL.
    pub fn new(base_url: Url, token: impl Into<String>, tenant: impl Into<String>) -> Self {
        Self {
            base_url,
            token: token.into(),
            tenant: tenant.into(),
        }
    }

    /// Parse `base_url` and build a context. Fails only on a malformed URL.
    pub fn parse(
        base_url: &str,
        token: impl Into<String>,
        tenant: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self::new(Url::parse(base_url)?, token, tenant))
    }

    /// Absolute URL string for an API path, e.g. `endpoint("assets/a1")`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let ctx = RequestContext::parse("https://cafm.example.com/api/", "t", "acme").unwrap();
        assert_eq!(
            ctx.endpoint("/locations/tree"),
            "https://cafm.example.com/api/locations/tree"
        );
        assert_eq!(
            ctx.endpoint("locations/tree"),
            "https://cafm.example.com/api/locations/tree"
        );
    }

    #[test]
    fn test_endpoint_without_trailing_slash() {
        let ctx = RequestContext::parse("http://localhost:8080", "t", "acme").unwrap();
        assert_eq!(ctx.endpoint("assets"), "http://localhost:8080/assets");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(RequestContext::parse("not a url", "t", "acme").is_err());
    }

    #[test]
    fn test_token_and_tenant_accessors() {
        let ctx = RequestContext::parse("http://localhost", "secret", "acme").unwrap();
        assert_eq!(ctx.token(), "secret");
        assert_eq!(ctx.tenant(), "acme");
    }
}
