use std::sync::Arc;

use axum::{
	body::{self, Body},
	http::{header, Request, StatusCode},
	Router,
};
use revdiff::{
	diff::{DiffRenderer, LcsEngine, MyersEngine},
	BoxedEngine, Context,
};
use tower::ServiceExt;

fn app() -> Router {
	revdiff::app(Arc::new(Context {
		renderer: DiffRenderer::new(Box::new(MyersEngine::default()) as BoxedEngine),
	}))
}

async fn body_text(response: axum::response::Response) -> String {
	let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
	String::from_utf8(bytes.to_vec()).unwrap()
}

fn compare_request(form: &str) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri("/compare")
		.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
		.body(Body::from(form.to_string()))
		.unwrap()
}

#[tokio::test]
async fn index_serves_form() {
	let response = app()
		.oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let body = body_text(response).await;
	assert!(body.contains(r#"<form action="/compare" method="post">"#));
	assert!(body.contains(r#"name="left""#));
	assert!(body.contains(r#"name="right""#));
}

#[tokio::test]
async fn compare_renders_fragment() {
	let response = app()
		.oneshot(compare_request(
			"left=The+quick+fox&right=The+quick+brown+fox",
		))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let body = body_text(response).await;
	assert!(body.contains(r#"The quick <ins class="diff-added">brown </ins>fox"#));
	assert!(body.contains("Diff Time: "));
	assert!(body.contains("ms</p>"));
}

#[tokio::test]
async fn compare_escapes_input() {
	let response = app()
		.oneshot(compare_request("left=%3Cb%3Eold&right=%3Cb%3Enew"))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let body = body_text(response).await;
	assert!(!body.contains("<b>"));
	assert!(body.contains("&lt;b&gt;"));
	assert!(body.contains(r#"<del class="diff-removed">old</del>"#));
	assert!(body.contains(r#"<ins class="diff-added">new</ins>"#));
}

#[tokio::test]
async fn compare_missing_fields_are_empty() {
	let response = app().oneshot(compare_request("")).await.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let body = body_text(response).await;
	assert!(body.contains(r#"<div class="diff-output"></div>"#));
}

#[tokio::test]
async fn compare_with_lcs_engine() {
	let app = revdiff::app(Arc::new(Context {
		renderer: DiffRenderer::new(Box::new(LcsEngine::new(1)) as BoxedEngine),
	}));
	let response = app
		.oneshot(compare_request("left=abcdef&right=azcdxf"))
		.await
		.unwrap();

	let body = body_text(response).await;
	assert!(body.contains(
		r#"a<del class="diff-removed">bcde</del><ins class="diff-added">zcdx</ins>f"#
	));
}

#[tokio::test]
async fn unknown_path() {
	let response = app()
		.oneshot(Request::builder().uri("/write/page").body(Body::empty()).unwrap())
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	assert_eq!(body_text(response).await, "404: Not found");
}
