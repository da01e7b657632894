use std::{
	fmt::{Display, Formatter},
	time::Duration,
};

use crate::diff::EditOp;

pub const ADDED_CLASS: &str = "diff-added";
pub const REMOVED_CLASS: &str = "diff-removed";

/// An escaped HTML fragment, safe to embed as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn into_string(self) -> String {
		self.0
	}
}

impl Display for Markup {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Renders an edit script. Inserted text goes in `<ins>`, deleted text in
/// `<del>`, equal text is left bare.
pub fn markup(ops: &[EditOp]) -> Markup {
	let mut out = String::new();

	for op in ops {
		match op {
			EditOp::Equal(text) => {
				out.push_str(&escape(text, "<br>"));
			}
			EditOp::Insert(text) => {
				out.push_str(r#"<ins class=""#);
				out.push_str(ADDED_CLASS);
				out.push_str(r#"">"#);
				out.push_str(&escape(text, "&para;<br>"));
				out.push_str("</ins>");
			}
			EditOp::Delete(text) => {
				out.push_str(r#"<del class=""#);
				out.push_str(REMOVED_CLASS);
				out.push_str(r#"">"#);
				out.push_str(&escape(text, "&para;<br>"));
				out.push_str("</del>");
			}
		}
	}

	Markup(out)
}

pub fn timing(elapsed: Duration) -> String {
	format!("Diff Time: {}ms", elapsed.as_millis())
}

fn escape(text: &str, line_break: &str) -> String {
	html_escape::encode_safe(text).replace('\n', line_break)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn wraps_edits() {
		let ops = vec![
			EditOp::Equal("The quick ".into()),
			EditOp::Insert("brown ".into()),
			EditOp::Equal("fox".into()),
			EditOp::Delete(" jumps".into()),
		];

		assert_eq!(
			markup(&ops).as_str(),
			"The quick <ins class=\"diff-added\">brown </ins>fox\
			 <del class=\"diff-removed\"> jumps</del>"
		);
	}

	#[test]
	fn escapes_span_text() {
		let ops = vec![
			EditOp::Equal("a < b & ".into()),
			EditOp::Insert("<script>alert('x')</script>".into()),
			EditOp::Delete("\"quoted\"".into()),
		];
		let out = markup(&ops).into_string();

		assert!(!out.contains("<script>"));
		assert!(!out.contains("a < b"));
		assert!(out.contains("a &lt; b &amp; "));
		assert!(out.contains("&lt;script&gt;"));
		assert!(out.contains("&quot;quoted&quot;"));
		// Only the markers themselves open tags.
		assert_eq!(out.matches('<').count(), 4);
	}

	#[test]
	fn line_breaks() {
		let ops = vec![
			EditOp::Equal("one\n".into()),
			EditOp::Insert("two\n".into()),
		];

		assert_eq!(
			markup(&ops).as_str(),
			"one<br><ins class=\"diff-added\">two&para;<br></ins>"
		);
	}

	#[test]
	fn empty_script() {
		assert_eq!(markup(&[]).as_str(), "");
	}

	#[test]
	fn rendering_is_repeatable() {
		let ops = vec![EditOp::Delete("x".into()), EditOp::Insert("y".into())];
		assert_eq!(markup(&ops), markup(&ops));
	}

	#[test]
	fn timing_in_whole_millis() {
		assert_eq!(timing(Duration::from_micros(12_900)), "Diff Time: 12ms");
		assert_eq!(timing(Duration::ZERO), "Diff Time: 0ms");
	}
}
