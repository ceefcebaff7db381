//! Credential cookie attributes.
//!
//! The cookie itself is issued by the backend on login and passes through
//! the gateway untouched. The gateway only ever writes one cookie: the
//! clearing cookie sent when the gate finds an unusable credential. It must
//! carry the same security attributes as the original so the browser
//! replaces it.

use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::config::{GatewayConfig, SameSitePolicy};

/// Attributes of the credential cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookiePolicy {
    pub name: String,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSitePolicy,
}

impl CookiePolicy {
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            name: config.session.cookie_name.clone(),
            http_only: config.session.http_only,
            secure: config.secure_cookies(),
            same_site: config.session.same_site,
        }
    }

    /// Cookie that deletes the credential: empty value, `Max-Age=0`.
    pub fn clearing_cookie(&self) -> Cookie<'static> {
        Cookie::build((self.name.clone(), ""))
            .path("/")
            .http_only(self.http_only)
            .secure(self.secure)
            .same_site(same_site(self.same_site))
            .max_age(time::Duration::ZERO)
            .build()
    }
}

fn same_site(policy: SameSitePolicy) -> SameSite {
    match policy {
        SameSitePolicy::Strict => SameSite::Strict,
        SameSitePolicy::Lax => SameSite::Lax,
        SameSitePolicy::None => SameSite::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clearing_cookie_attributes() {
        let policy = CookiePolicy {
            name: "jwt".into(),
            http_only: true,
            secure: true,
            same_site: SameSitePolicy::Strict,
        };
        let rendered = policy.clearing_cookie().to_string();

        assert!(rendered.starts_with("jwt=;"), "{}", rendered);
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("Secure"));
        assert!(rendered.contains("SameSite=Strict"));
        assert!(rendered.contains("Max-Age=0"));
    }

    #[test]
    fn test_plain_http_omits_secure() {
        let config = GatewayConfig::with_upstream("http://backend");
        let rendered = CookiePolicy::from_config(&config).clearing_cookie().to_string();
        assert!(!rendered.contains("Secure"));
        assert!(rendered.contains("HttpOnly"));
    }
}
