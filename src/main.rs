use std::sync::Arc;

use revdiff::{errors::RdError, settings::Settings, Context};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), RdError> {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| EnvFilter::new("revdiff=info,tower_http=info")),
		)
		.init();

	let settings = Settings::load()?;
	let addr = settings.addr()?;
	info!(?settings, "loaded settings");

	let app = revdiff::app(Arc::new(Context::new(&settings)));
	let server = tokio::net::TcpListener::bind(addr).await?;
	info!(%addr, "listening");

	axum::serve(server, app).await?;
	Ok(())
}
