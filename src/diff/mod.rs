use std::time::{Duration, Instant};

use tracing::debug;

pub use engine::{Engine, Granularity, LcsEngine, MyersEngine};

use crate::render::{self, Markup};

pub mod cleanup;
pub mod engine;

/// Read-only snapshot of one side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSource(Box<str>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
	Equal,
	Insert,
	Delete,
}

/// One span of an edit script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
	Equal(String),
	Insert(String),
	Delete(String),
}

/// An edit script in left-to-right order, plus how long it took to compute.
#[derive(Debug, Clone, Default)]
pub struct DiffResult {
	ops: Vec<EditOp>,
	elapsed: Duration,
}

/// Compares text sources and renders the result. Holds no state besides the
/// engine, so one value can serve any number of callers.
#[derive(Debug, Clone, Default)]
pub struct DiffRenderer<E = MyersEngine> {
	engine: E,
}

impl TextSource {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<&str> for TextSource {
	fn from(value: &str) -> Self {
		Self(value.into())
	}
}

impl From<String> for TextSource {
	fn from(value: String) -> Self {
		Self(value.into_boxed_str())
	}
}

impl AsRef<str> for TextSource {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl EditOp {
	pub fn new<S>(tag: Tag, text: S) -> Self
	where
		S: Into<String>,
	{
		match tag {
			Tag::Equal => Self::Equal(text.into()),
			Tag::Insert => Self::Insert(text.into()),
			Tag::Delete => Self::Delete(text.into()),
		}
	}

	pub fn tag(&self) -> Tag {
		match self {
			Self::Equal(_) => Tag::Equal,
			Self::Insert(_) => Tag::Insert,
			Self::Delete(_) => Tag::Delete,
		}
	}

	pub fn text(&self) -> &str {
		match self {
			Self::Equal(t) | Self::Insert(t) | Self::Delete(t) => t,
		}
	}

	pub(crate) fn text_mut(&mut self) -> &mut String {
		match self {
			Self::Equal(t) | Self::Insert(t) | Self::Delete(t) => t,
		}
	}

	pub fn into_text(self) -> String {
		match self {
			Self::Equal(t) | Self::Insert(t) | Self::Delete(t) => t,
		}
	}
}

/// Appends `text` to the script, extending the last op if it has the same
/// tag. Empty text is dropped.
pub(crate) fn push_op(ops: &mut Vec<EditOp>, tag: Tag, text: &str) {
	if text.is_empty() {
		return;
	}
	match ops.last_mut() {
		Some(last) if last.tag() == tag => last.text_mut().push_str(text),
		_ => ops.push(EditOp::new(tag, text)),
	}
}

impl DiffResult {
	pub fn new(ops: Vec<EditOp>, elapsed: Duration) -> Self {
		Self { ops, elapsed }
	}

	pub fn ops(&self) -> &[EditOp] {
		&self.ops
	}

	pub fn into_ops(self) -> Vec<EditOp> {
		self.ops
	}

	pub fn elapsed(&self) -> Duration {
		self.elapsed
	}

	pub fn is_empty(&self) -> bool {
		self.ops.is_empty()
	}

	/// Rebuilds the left text from the equal and deleted spans.
	pub fn left(&self) -> String {
		self.collect(Tag::Delete)
	}

	/// Rebuilds the right text from the equal and inserted spans.
	pub fn right(&self) -> String {
		self.collect(Tag::Insert)
	}

	pub fn timing(&self) -> String {
		render::timing(self.elapsed)
	}

	fn collect(&self, side: Tag) -> String {
		self.ops
			.iter()
			.filter(|op| op.tag() == Tag::Equal || op.tag() == side)
			.map(EditOp::text)
			.collect()
	}
}

impl<E> DiffRenderer<E>
where
	E: Engine,
{
	pub fn new(engine: E) -> Self {
		Self { engine }
	}

	pub fn engine(&self) -> &E {
		&self.engine
	}

	pub fn compare<L, R>(&self, left: L, right: R) -> DiffResult
	where
		L: AsRef<str>,
		R: AsRef<str>,
	{
		let (left, right) = (left.as_ref(), right.as_ref());

		let start = Instant::now();
		let mut ops = self.engine.edits(left, right);
		cleanup::semantic(&mut ops);
		let elapsed = start.elapsed();

		debug!(
			left = left.len(),
			right = right.len(),
			ops = ops.len(),
			elapsed_us = elapsed.as_micros() as u64,
			"compared texts"
		);

		DiffResult { ops, elapsed }
	}

	pub fn render(&self, result: &DiffResult) -> Markup {
		render::markup(&result.ops)
	}
}
