//! [`Context`]-related definitions.

use std::sync::atomic::{self, AtomicU16};

use axum::{async_trait, extract::FromRequestParts, RequestPartsExt as _};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use juniper::{
    http::{GraphQLBatchResponse, GraphQLResponse},
    IntoFieldError as _,
};
use secrecy::ExposeSecret as _;
use tokio::sync::OnceCell;

use crate::{config, define_error, AsError, Error, JuniperResponse, Service};

/// Application context.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] instance.
    service: Service,

    /// Authentication configuration.
    auth: config::Auth,

    /// Error status code.
    error_status_code: AtomicU16,

    /// Parts of the HTTP request.
    parts: http::request::Parts,

    /// Result of the lazily performed authorization.
    authorized: OnceCell<Result<(), Error>>,
}

impl Context {
    /// Returns [`Service`] instance of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the error status code of this [`Context`].
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn error_status_code(&self) -> http::StatusCode {
        http::StatusCode::from_u16(
            self.error_status_code.load(atomic::Ordering::Relaxed),
        )
        .expect("invalid status code")
    }

    /// Sets the error status code for this [`Context`].
    ///
    /// Provided [`http::StatusCode`] will be applied to the response.
    pub fn set_error_status_code(&self, status_code: http::StatusCode) {
        self.error_status_code
            .store(status_code.as_u16(), atomic::Ordering::Relaxed);
    }

    /// Helper method calling [`Context::set_error_status_code()`] inside
    /// [`Result::map_err()`] closure.
    pub fn error(&self) -> impl FnOnce(Error) -> Error + '_ {
        move |err| {
            self.set_error_status_code(err.status_code);
            err
        }
    }

    /// Authorizes the current HTTP request.
    ///
    /// The provided bearer token is treated as an opaque value and compared
    /// verbatim against the configured one.
    ///
    /// # Errors
    ///
    /// Errors if:
    /// - the current HTTP request carries no `Authorization` header;
    /// - the provided bearer token does not match the configured one.
    pub async fn authorize(&self) -> Result<(), Error> {
        self.authorized
            .get_or_init(|| async {
                self.do_authorization().await.map_err(self.error())
            })
            .await
            .clone()
    }

    /// Performs the bearer token check.
    ///
    /// # Errors
    ///
    /// Errors if the provided bearer token is missing or invalid.
    async fn do_authorization(&self) -> Result<(), Error> {
        let res = self
            .parts
            .clone()
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await;
        match res {
            Ok(TypedHeader(Authorization(bearer))) => {
                if bearer.token() == self.auth.token.expose_secret() {
                    Ok(())
                } else {
                    Err(AuthError::InvalidToken.into())
                }
            }
            Err(e) => {
                if e.is_missing() {
                    Err(AuthError::AuthorizationRequired.into())
                } else {
                    Err(e.into_error())
                }
            }
        }
    }
}

impl juniper::Context for Context {}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = JuniperResponse;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let missing = |what: &'static str| {
            move || JuniperResponse {
                status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
                response: GraphQLBatchResponse::Single(GraphQLResponse::error(
                    Error::internal(&format!("missing `{what}` extension"))
                        .into_field_error(),
                )),
            }
        };

        let service = parts
            .extensions
            .get::<Service>()
            .cloned()
            .ok_or_else(missing("Service"))?;
        let auth = parts
            .extensions
            .get::<config::Auth>()
            .cloned()
            .ok_or_else(missing("Auth"))?;

        Ok(Self {
            service,
            auth,
            error_status_code: AtomicU16::new(
                http::StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            ),
            parts: parts.clone(),
            authorized: OnceCell::new(),
        })
    }
}

define_error! {
    enum AuthError {
        #[code = "AUTHORIZATION_REQUIRED"]
        #[status = UNAUTHORIZED]
        #[message = "Authorization required"]
        AuthorizationRequired,

        #[code = "INVALID_TOKEN"]
        #[status = FORBIDDEN]
        #[message = "Provided bearer token is invalid"]
        InvalidToken,
    }
}
