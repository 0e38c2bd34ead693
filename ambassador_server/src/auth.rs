//! Caller identity.
//!
//! Authentication happens upstream, in the gateway that fronts this server. The gateway forwards the id of the
//! signed-in user in the `amb_user_id` header, and [`AuthenticatedUser`] extracts it for the handlers that act on
//! behalf of a user.
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use log::*;

use crate::errors::ServerError;

pub const USER_ID_HEADER: &str = "amb_user_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
}

impl AuthenticatedUser {
    pub fn from_request_headers(req: &HttpRequest) -> Result<Self, ServerError> {
        let value = req.headers().get(USER_ID_HEADER).ok_or_else(|| {
            debug!("💻️ Request to {} has no {USER_ID_HEADER} header", req.path());
            ServerError::AuthenticationError("Not signed in.".to_string())
        })?;
        let user_id = value
            .to_str()
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .ok_or_else(|| ServerError::AuthenticationError(format!("Invalid {USER_ID_HEADER} header.")))?;
        Ok(Self { user_id })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_request_headers(req))
    }
}
