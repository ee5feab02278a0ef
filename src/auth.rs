//! Request identity, as forwarded by the auth gateway.
//!
//! Credentials never reach this service: the gateway validates the session
//! token and forwards the caller's identity as plain headers. Handlers take
//! the resulting [`AuthSession`] as an explicit, immutable argument instead
//! of reading ambient global state.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::HeaderMap;
use actix_web::{FromRequest, HttpRequest};
use uuid::Uuid;

use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone, Copy)]
pub struct AuthSession {
    pub user_id: Uuid,
    pub is_admin: bool,
}

impl AuthSession {
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

fn session_from_headers(headers: &HeaderMap) -> Result<AuthSession, AppError> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or(AppError::Unauthorized)?;

    let is_admin = headers
        .get(USER_ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|role| role.eq_ignore_ascii_case("admin"))
        .unwrap_or(false);

    Ok(AuthSession { user_id, is_admin })
}

impl FromRequest for AuthSession {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(session_from_headers(req.headers()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn missing_user_id_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        let result = session_from_headers(req.headers());
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn malformed_user_id_is_unauthorized() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "not-a-uuid"))
            .to_http_request();
        let result = session_from_headers(req.headers());
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn valid_user_id_without_role_is_not_admin() {
        let id = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, id.to_string()))
            .to_http_request();
        let session = session_from_headers(req.headers()).expect("session");
        assert_eq!(session.user_id, id);
        assert!(!session.is_admin);
    }

    #[test]
    fn admin_role_is_case_insensitive() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, Uuid::new_v4().to_string()))
            .insert_header((USER_ROLE_HEADER, "Admin"))
            .to_http_request();
        let session = session_from_headers(req.headers()).expect("session");
        assert!(session.is_admin);
        assert!(session.require_admin().is_ok());
    }

    #[test]
    fn non_admin_role_is_rejected_by_require_admin() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, Uuid::new_v4().to_string()))
            .insert_header((USER_ROLE_HEADER, "customer"))
            .to_http_request();
        let session = session_from_headers(req.headers()).expect("session");
        assert!(matches!(session.require_admin(), Err(AppError::Forbidden)));
    }
}
