use std::time::{Duration, Instant};

use ::diff as libdiff;
use similar::{Algorithm, ChangeTag, TextDiff};
use tracing::warn;

use crate::diff::{
	cleanup::{common_prefix, common_suffix},
	push_op, EditOp, Tag,
};

/// Computes a raw edit script between two strings. Implementations must
/// return ops whose equal+delete spans rebuild `left` and whose
/// equal+insert spans rebuild `right`.
pub trait Engine {
	fn edits(&self, left: &str, right: &str) -> Vec<EditOp>;
}

impl<E> Engine for Box<E>
where
	E: Engine + ?Sized,
{
	fn edits(&self, left: &str, right: &str) -> Vec<EditOp> {
		(**self).edits(left, right)
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Granularity {
	#[default]
	Chars,
	Words,
}

/// Myers diff from `similar`. Past the deadline the diff gets coarser
/// rather than failing.
#[derive(Debug, Clone)]
pub struct MyersEngine {
	granularity: Granularity,
	timeout: Option<Duration>,
}

/// LCS table diff from the `diff` crate. Quadratic in the differing middle,
/// so the table is capped at `max_cells`.
#[derive(Debug, Clone)]
pub struct LcsEngine {
	max_cells: usize,
}

impl MyersEngine {
	pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

	pub fn new(granularity: Granularity, timeout: Option<Duration>) -> Self {
		Self {
			granularity,
			timeout,
		}
	}
}

impl Default for MyersEngine {
	fn default() -> Self {
		Self::new(Granularity::Chars, Some(Self::DEFAULT_TIMEOUT))
	}
}

impl Engine for MyersEngine {
	fn edits(&self, left: &str, right: &str) -> Vec<EditOp> {
		let mut config = TextDiff::configure();
		config.algorithm(Algorithm::Myers);
		if let Some(timeout) = self.timeout {
			config.deadline(Instant::now() + timeout);
		}

		let diff = match self.granularity {
			Granularity::Chars => config.diff_chars(left, right),
			Granularity::Words => config.diff_words(left, right),
		};

		let mut ops = Vec::new();
		for change in diff.iter_all_changes() {
			let tag = match change.tag() {
				ChangeTag::Equal => Tag::Equal,
				ChangeTag::Delete => Tag::Delete,
				ChangeTag::Insert => Tag::Insert,
			};
			push_op(&mut ops, tag, change.value());
		}
		ops
	}
}

impl LcsEngine {
	pub const DEFAULT_MAX_CELLS: usize = 4_000_000;

	pub fn new(max_cells: usize) -> Self {
		Self { max_cells }
	}
}

impl Default for LcsEngine {
	fn default() -> Self {
		Self::new(Self::DEFAULT_MAX_CELLS)
	}
}

impl Engine for LcsEngine {
	fn edits(&self, left: &str, right: &str) -> Vec<EditOp> {
		let prefix = common_prefix(left, right);
		let (left_tail, right_tail) = (&left[prefix..], &right[prefix..]);
		let suffix = common_suffix(left_tail, right_tail);
		let left_mid = &left_tail[..left_tail.len() - suffix];
		let right_mid = &right_tail[..right_tail.len() - suffix];

		let mut ops = Vec::new();
		push_op(&mut ops, Tag::Equal, &left[..prefix]);

		let cells = left_mid
			.chars()
			.count()
			.saturating_mul(right_mid.chars().count());
		if cells > self.max_cells {
			warn!(
				cells,
				max_cells = self.max_cells,
				"comparison over budget, reporting a full replace"
			);
			push_op(&mut ops, Tag::Delete, left_mid);
			push_op(&mut ops, Tag::Insert, right_mid);
		} else {
			let mut buf = [0; 4];
			for change in libdiff::chars(left_mid, right_mid) {
				let (tag, c) = match change {
					libdiff::Result::Left(l) => (Tag::Delete, l),
					libdiff::Result::Right(r) => (Tag::Insert, r),
					libdiff::Result::Both(b, _) => (Tag::Equal, b),
				};
				push_op(&mut ops, tag, c.encode_utf8(&mut buf));
			}
		}

		push_op(&mut ops, Tag::Equal, &left_tail[left_tail.len() - suffix..]);
		ops
	}
}
