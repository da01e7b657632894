use std::sync::Arc;

use axum::{
	http::StatusCode,
	response::{Html, IntoResponse},
	routing, Router,
};
use tower_http::trace::TraceLayer;

use crate::{
	diff::{DiffRenderer, Engine},
	settings::Settings,
};

pub mod compare;
pub mod diff;
pub mod errors;
pub mod render;
pub mod settings;

include!(concat!(env!("OUT_DIR"), "/config.rs"));

pub type BoxedEngine = Box<dyn Engine + Send + Sync>;

/// Shared by every request. The renderer is stateless.
pub struct Context {
	pub renderer: DiffRenderer<BoxedEngine>,
}

impl Context {
	pub fn new(settings: &Settings) -> Self {
		Self {
			renderer: DiffRenderer::new(settings.engine()),
		}
	}
}

pub fn app(ctx: Arc<Context>) -> Router {
	Router::new()
		.route("/", routing::get(index))
		.route("/compare", routing::get(index).post(compare::post))
		.fallback(not_found)
		.layer(TraceLayer::new_for_http())
		.with_state(ctx)
}

async fn index() -> Html<&'static str> {
	Html(INDEX_HTML)
}

pub async fn not_found() -> impl IntoResponse {
	(StatusCode::NOT_FOUND, "404: Not found")
}
