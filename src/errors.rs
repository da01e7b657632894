use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum RdError {
	#[error("Invalid configuration: {0}")]
	Config(#[from] config::ConfigError),
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Resource unavailable, try again.")]
	Io(#[from] std::io::Error),
	#[error("Could not render page.")]
	Template(#[from] askama::Error),
}

impl IntoResponse for RdError {
	fn into_response(self) -> Response {
		error!(error = ?self, "request failed");
		match self {
			Self::InvalidArgument(_) => {
				(StatusCode::BAD_REQUEST, format!("400: {self}")).into_response()
			}
			Self::Config(_) | Self::Io(_) | Self::Template(_) => (
				StatusCode::INTERNAL_SERVER_ERROR,
				format!("500: {self}"),
			)
				.into_response(),
		}
	}
}

/// Unwraps a `Result<T>` or returns an HTTP error response.
#[macro_export]
macro_rules! ok {
	($e:expr) => {
		match $e {
			Ok(v) => v,
			Err(e) => return $crate::errors::RdError::from(e).into_response(),
		}
	};
}
