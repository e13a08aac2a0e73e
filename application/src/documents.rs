//! HTTP delivery of rendered PDF documents.
//!
//! The endpoints stream the same bytes regardless of the requested
//! disposition; only the `Content-Disposition` header differs, letting the
//! browser either view the PDF inline or download it under its delivery
//! file name.

use axum::{
    extract::{Path, Query},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use serde::Deserialize;
use service::{document::Rendered, query, Query as _};
use tracing as log;

use crate::{AsError as _, Error, Service};

/// Way a rendered document is delivered to the client.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    /// View the document in the browser.
    #[default]
    Inline,

    /// Download the document as a file.
    Attachment,
}

impl Disposition {
    /// Returns the `Content-Disposition` header keyword of this
    /// [`Disposition`].
    const fn keyword(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Attachment => "attachment",
        }
    }
}

/// Query parameters of the document endpoints.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct Params {
    /// Requested [`Disposition`].
    #[serde(default)]
    pub disposition: Disposition,
}

/// `GET /documents/offers/:id` handler rendering the offer document of a
/// `Contract`.
pub async fn offer(
    Path(id): Path<i32>,
    Query(params): Query<Params>,
    Extension(service): Extension<Service>,
) -> Response {
    let rendered = service
        .execute(query::render::Offer { id: id.into() })
        .await;
    respond(rendered.map_err(|e| e.into_error()), params.disposition)
}

/// `GET /documents/invoices/:id` handler rendering the document of an
/// `Invoice`.
pub async fn invoice(
    Path(id): Path<i32>,
    Query(params): Query<Params>,
    Extension(service): Extension<Service>,
) -> Response {
    let rendered = service
        .execute(query::render::Invoice { id: id.into() })
        .await;
    respond(rendered.map_err(|e| e.into_error()), params.disposition)
}

/// Builds the HTTP [`Response`] out of the rendering result.
fn respond(
    rendered: Result<Rendered, Error>,
    disposition: Disposition,
) -> Response {
    match rendered {
        Ok(Rendered { file_name, bytes }) => {
            let mut headers = HeaderMap::new();
            drop(headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/pdf"),
            ));
            let value = format!(
                "{}; filename=\"{file_name}\"",
                disposition.keyword(),
            );
            match HeaderValue::from_str(&value) {
                Ok(v) => drop(headers.insert(header::CONTENT_DISPOSITION, v)),
                Err(e) => {
                    log::warn!(
                        "cannot deliver `{file_name}` under its file name: \
                         {e}",
                    );
                }
            }
            (headers, bytes).into_response()
        }
        Err(e) => {
            log::error!("failed to render document: {e}");
            (e.status_code, e.message).into_response()
        }
    }
}

impl crate::AsError for query::render::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::ContractNotExists(_) => Error {
                code: "CONTRACT_NOT_EXISTS",
                status_code: StatusCode::NOT_FOUND,
                message: "`Contract` with the provided ID is not exists"
                    .to_owned(),
                backtrace: None,
            },
            Self::InvoiceNotExists(_) => Error {
                code: "INVOICE_NOT_EXISTS",
                status_code: StatusCode::NOT_FOUND,
                message: "`Invoice` with the provided ID is not exists"
                    .to_owned(),
                backtrace: None,
            },
            Self::Db(e) => return e.try_as_error(),
            Self::Join(_) | Self::Render(_) => return None,
        })
    }
}
