use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use csvedit_sheet::SheetError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by API handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error("Invalid upload: {0}")]
    Multipart(#[from] MultipartError),
}

/// JSON body of every error response.
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Multipart(_) | ApiError::Sheet(SheetError::NoFileSupplied) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Sheet(e) if e.is_decode_error() => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Sheet(
                SheetError::IndexOutOfBounds { .. }
                | SheetError::RowIndexOutOfBounds { .. }
                | SheetError::UnknownRow { .. },
            ) => StatusCode::NOT_FOUND,
            ApiError::Sheet(SheetError::NoTableLoaded | SheetError::StaleRow { .. }) => {
                StatusCode::CONFLICT
            }
            ApiError::Sheet(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csvedit_sheet::RowId;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (SheetError::NoFileSupplied, StatusCode::BAD_REQUEST),
            (SheetError::EmptyInput, StatusCode::UNPROCESSABLE_ENTITY),
            (
                SheetError::RaggedRow {
                    record: 2,
                    expected: 1,
                    actual: 3,
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                SheetError::RowIndexOutOfBounds { index: 4, count: 1 },
                StatusCode::NOT_FOUND,
            ),
            (
                SheetError::UnknownRow { id: RowId(9) },
                StatusCode::NOT_FOUND,
            ),
            (SheetError::NoTableLoaded, StatusCode::CONFLICT),
            (
                SheetError::StaleRow {
                    index: 0,
                    expected: RowId(1),
                    actual: RowId(2),
                },
                StatusCode::CONFLICT,
            ),
            (
                SheetError::Io(std::io::Error::other("disk")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status(), status);
        }
    }
}
