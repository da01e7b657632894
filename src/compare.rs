use std::sync::Arc;

use askama::Template;
use axum::{
	extract::State,
	response::{Html, IntoResponse},
	Form,
};
use serde::Deserialize;
use tracing::info;

use crate::{diff::TextSource, ok, Context};

#[derive(Template)]
#[template(path = "compare.html")]
struct CompareTemplate {
	left: String,
	right: String,
	fragment: String,
	timing: String,
}

#[derive(Debug, Deserialize)]
pub struct ComparePayload {
	#[serde(default)]
	left: String,
	#[serde(default)]
	right: String,
}

#[axum_macros::debug_handler]
pub async fn post(
	State(ctx): State<Arc<Context>>,
	Form(params): Form<ComparePayload>,
) -> impl IntoResponse {
	let Context { renderer } = ctx.as_ref();

	let left = TextSource::from(params.left);
	let right = TextSource::from(params.right);

	let result = renderer.compare(&left, &right);
	info!(
		ops = result.ops().len(),
		elapsed_ms = result.elapsed().as_millis() as u64,
		"compared revisions"
	);

	let page = CompareTemplate {
		fragment: renderer.render(&result).into_string(),
		timing: result.timing(),
		left: left.as_str().to_string(),
		right: right.as_str().to_string(),
	};

	Html(ok!(page.render())).into_response()
}
