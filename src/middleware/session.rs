use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use uuid::Uuid;

use crate::auth::SessionClaims;
use crate::config::AuthConfig;
use crate::error::ConsoleError;
use crate::state::AppState;
use crate::types::Principal;

/// Source of the current principal. Authentication itself happens at the auth provider.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn current_principal(&self, headers: &HeaderMap) -> Option<Principal>;
}

/// Verifies the provider's HS256 session tokens locally
pub struct JwtSessionProvider {
    decoding_key: DecodingKey,
    validation: Validation,
    cookie_name: String,
}

impl JwtSessionProvider {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match &config.jwt_audience {
            Some(aud) => validation.set_audience(&[aud.as_str()]),
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            cookie_name: config.session_cookie.clone(),
        }
    }

    fn principal_from_token(&self, token: &str) -> Result<Principal, String> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| format!("Invalid session token: {}", e))?;

        let id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| format!("Session subject is not a UUID: {}", data.claims.sub))?;

        Ok(Principal {
            id,
            email: data.claims.email,
        })
    }
}

#[async_trait]
impl SessionProvider for JwtSessionProvider {
    async fn current_principal(&self, headers: &HeaderMap) -> Option<Principal> {
        let token = extract_token(headers, &self.cookie_name)?;
        match self.principal_from_token(&token) {
            Ok(principal) => Some(principal),
            Err(msg) => {
                tracing::debug!("Rejected session: {}", msg);
                None
            }
        }
    }
}

/// Bearer token first, then the session cookie (browser navigation)
fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(axum::http::header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Principal (if any) for the current request, injected by `session_middleware`
#[derive(Clone, Debug, Default)]
pub struct Session(pub Option<Principal>);

impl Session {
    pub fn principal(&self) -> Option<&Principal> {
        self.0.as_ref()
    }

    pub fn require(&self) -> Result<&Principal, ConsoleError> {
        self.principal().ok_or(ConsoleError::AuthenticationAbsent)
    }
}

/// Resolves the session once per request. A missing session is not rejected here;
/// each page decides what "not authenticated" looks like.
pub async fn session_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let principal = state.sessions.current_principal(request.headers()).await;

    if let Some(principal) = &principal {
        tracing::debug!(principal = %principal.id, "Session resolved");
    }

    request.extensions_mut().insert(Session(principal));
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::issue_session_token;
    use axum::http::HeaderValue;

    fn auth_config(audience: Option<&str>) -> AuthConfig {
        AuthConfig {
            jwt_secret: "unit-secret".to_string(),
            jwt_audience: audience.map(str::to_string),
            session_cookie: "rift-session".to_string(),
            login_url: "/login".to_string(),
        }
    }

    fn token(sub: &str, aud: Option<&str>) -> String {
        let mut claims = SessionClaims::new(sub, Some("ops@rift.test".into()), chrono::Duration::hours(1));
        if let Some(aud) = aud {
            claims = claims.with_audience(aud);
        }
        issue_session_token(&claims, "unit-secret").unwrap()
    }

    #[tokio::test]
    async fn bearer_token_yields_principal() {
        let provider = JwtSessionProvider::new(&auth_config(None));
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {}", token(&id.to_string(), None))).unwrap(),
        );

        let principal = provider.current_principal(&headers).await.unwrap();
        assert_eq!(principal.id, id);
        assert_eq!(principal.email.as_deref(), Some("ops@rift.test"));
    }

    #[tokio::test]
    async fn cookie_is_used_when_no_bearer() {
        let provider = JwtSessionProvider::new(&auth_config(None));
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            HeaderValue::from_str(&format!("theme=dark; rift-session={}", token(&id.to_string(), None))).unwrap(),
        );

        assert_eq!(provider.current_principal(&headers).await.unwrap().id, id);
    }

    #[tokio::test]
    async fn audience_mismatch_and_bad_subject_are_rejected() {
        let provider = JwtSessionProvider::new(&auth_config(Some("authenticated")));
        let id = Uuid::new_v4().to_string();

        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {}", token(&id, Some("anon")))).unwrap(),
        );
        assert!(provider.current_principal(&headers).await.is_none());

        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {}", token("not-a-uuid", Some("authenticated")))).unwrap(),
        );
        assert!(provider.current_principal(&headers).await.is_none());

        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {}", token(&id, Some("authenticated")))).unwrap(),
        );
        assert!(provider.current_principal(&headers).await.is_some());
    }

    #[test]
    fn extract_token_ignores_other_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert!(extract_token(&headers, "rift-session").is_none());

        headers.insert("cookie", HeaderValue::from_static("rift-session="));
        assert!(extract_token(&headers, "rift-session").is_none());
    }
}
