//! HTTP Basic-auth gate in front of the API.
//!
//! There is a single configured account. The gate keeps casual visitors out
//! of the register; it is not an authorisation model.

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::{Request, State},
  http::HeaderMap,
  middleware::Next,
  response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;

use crate::error::Error;

/// Credentials accepted as valid for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Inserted into request extensions once the credentials check out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
  pub username: String,
}

/// Verify credentials directly from headers.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<AuthSession, Error> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  if username != config.username {
    return Err(Error::Unauthorized);
  }

  let parsed_hash = PasswordHash::new(&config.password_hash)
    .map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| Error::Unauthorized)?;

  Ok(AuthSession { username: username.to_owned() })
}

/// Middleware rejecting requests without valid credentials.
pub async fn require_auth(
  State(config): State<Arc<AuthConfig>>,
  mut req: Request,
  next: Next,
) -> Result<Response, Error> {
  let session = verify_auth(req.headers(), &config).inspect_err(|_| {
    tracing::debug!(uri = %req.uri(), "rejected unauthenticated request");
  })?;
  req.extensions_mut().insert(session);
  Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::{
    Extension, Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware,
    routing::get,
  };
  use tower::ServiceExt as _;

  fn make_config(password: &str) -> AuthConfig {
    use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
    use rand_core::OsRng;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();

    AuthConfig { username: "admin".to_string(), password_hash: hash }
  }

  fn basic(user: &str, pass: &str) -> String {
    let encoded = B64.encode(format!("{user}:{pass}"));
    format!("Basic {encoded}")
  }

  fn headers(value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, value.parse().unwrap());
    h
  }

  #[test]
  fn correct_credentials() {
    let config = make_config("secret");
    let session = verify_auth(&headers(&basic("admin", "secret")), &config).unwrap();
    assert_eq!(session.username, "admin");
  }

  #[test]
  fn wrong_password() {
    let config = make_config("secret");
    assert!(matches!(
      verify_auth(&headers(&basic("admin", "wrong")), &config),
      Err(Error::Unauthorized)
    ));
  }

  #[test]
  fn wrong_username() {
    let config = make_config("secret");
    assert!(matches!(
      verify_auth(&headers(&basic("root", "secret")), &config),
      Err(Error::Unauthorized)
    ));
  }

  #[test]
  fn missing_header() {
    let config = make_config("secret");
    assert!(matches!(verify_auth(&HeaderMap::new(), &config), Err(Error::Unauthorized)));
  }

  #[test]
  fn invalid_base64() {
    let config = make_config("secret");
    assert!(matches!(
      verify_auth(&headers("Basic !!!not-base64!!!"), &config),
      Err(Error::Unauthorized)
    ));
  }

  #[tokio::test]
  async fn middleware_exposes_session() {
    let config = Arc::new(make_config("secret"));
    let app = Router::new()
      .route(
        "/whoami",
        get(|Extension(session): Extension<AuthSession>| async move { session.username }),
      )
      .layer(middleware::from_fn_with_state(config, require_auth));

    let denied = app
      .clone()
      .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
    assert!(denied.headers().contains_key(header::WWW_AUTHENTICATE));

    let allowed = app
      .oneshot(
        Request::builder()
          .uri("/whoami")
          .header(header::AUTHORIZATION, basic("admin", "secret"))
          .body(Body::empty())
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(allowed.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"admin");
  }
}
