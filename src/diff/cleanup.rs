//! Post-processing for raw edit scripts.
//!
//! Engines produce scripts that are minimal but noisy: a replaced word often
//! comes back as a handful of one-letter edits around letters the two words
//! happen to share. The passes here trade a little minimality for edits that
//! start and end on word and line boundaries. Every pass keeps the script a
//! valid reconstruction of both inputs.

use crate::diff::{push_op, EditOp, Tag};

/// Runs every pass over `ops`. See the module docs.
pub fn semantic(ops: &mut Vec<EditOp>) {
	merge(ops);
	if eliminate_equalities(ops) {
		merge(ops);
	}
	align_boundaries(ops);
	coalesce(ops);
	extract_overlaps(ops);
	coalesce(ops);
}

/// Joins runs of edits, factors shared text out of delete/insert pairs and
/// slides lone edits over neighbouring equalities they fully contain.
pub fn merge(ops: &mut Vec<EditOp>) {
	loop {
		merge_runs(ops);
		if !shift_edits(ops) {
			break;
		}
	}
}

/// Drops empty ops and joins neighbours with the same tag.
pub fn coalesce(ops: &mut Vec<EditOp>) {
	let mut joined = Vec::with_capacity(ops.len());
	for op in ops.drain(..) {
		push_op(&mut joined, op.tag(), op.text());
	}
	*ops = joined;
}

/// Byte length of the shared prefix, always on a char boundary.
pub(crate) fn common_prefix(a: &str, b: &str) -> usize {
	a.chars()
		.zip(b.chars())
		.take_while(|(x, y)| x == y)
		.map(|(x, _)| x.len_utf8())
		.sum()
}

/// Byte length of the shared suffix, always on a char boundary.
pub(crate) fn common_suffix(a: &str, b: &str) -> usize {
	a.chars()
		.rev()
		.zip(b.chars().rev())
		.take_while(|(x, y)| x == y)
		.map(|(x, _)| x.len_utf8())
		.sum()
}

/// Byte length of the longest suffix of `a` that is also a prefix of `b`.
pub(crate) fn common_overlap(a: &str, b: &str) -> usize {
	a.char_indices()
		.map(|(i, _)| &a[i..])
		.find(|tail| b.starts_with(tail))
		.map_or(0, str::len)
}

fn merge_runs(ops: &mut Vec<EditOp>) {
	let mut merged = Vec::with_capacity(ops.len());
	let mut deleted = String::new();
	let mut inserted = String::new();

	for op in ops.drain(..) {
		match op {
			EditOp::Delete(text) => deleted.push_str(&text),
			EditOp::Insert(text) => inserted.push_str(&text),
			EditOp::Equal(text) => {
				flush(&mut merged, &mut deleted, &mut inserted);
				push_op(&mut merged, Tag::Equal, &text);
			}
		}
	}
	flush(&mut merged, &mut deleted, &mut inserted);

	*ops = merged;
}

fn flush(
	merged: &mut Vec<EditOp>,
	deleted: &mut String,
	inserted: &mut String,
) {
	let mut suffix = String::new();

	if !deleted.is_empty() && !inserted.is_empty() {
		let prefix = common_prefix(deleted, inserted);
		if prefix > 0 {
			push_op(merged, Tag::Equal, &inserted[..prefix]);
			deleted.drain(..prefix);
			inserted.drain(..prefix);
		}

		let shared = common_suffix(deleted, inserted);
		if shared > 0 {
			suffix = inserted.split_off(inserted.len() - shared);
			deleted.truncate(deleted.len() - shared);
		}
	}

	push_op(merged, Tag::Delete, deleted);
	push_op(merged, Tag::Insert, inserted);
	push_op(merged, Tag::Equal, &suffix);

	deleted.clear();
	inserted.clear();
}

/// `A<ins>BA</ins>C` -> `<ins>AB</ins>AC` and `A<ins>CB</ins>C` ->
/// `AC<ins>BC</ins>`. Returns whether anything moved.
fn shift_edits(ops: &mut Vec<EditOp>) -> bool {
	let mut changed = false;

	let mut i = 1;
	while i + 1 < ops.len() {
		if is_single_edit(ops, i) {
			let before = ops[i - 1].text().to_string();
			let after = ops[i + 1].text().to_string();
			let edit = ops[i].text();

			if edit.ends_with(&before) {
				let shifted =
					format!("{before}{}", &edit[..edit.len() - before.len()]);
				*ops[i].text_mut() = shifted;
				*ops[i + 1].text_mut() = format!("{before}{after}");
				ops.remove(i - 1);
				changed = true;
			} else if edit.starts_with(&after) {
				let shifted = format!("{}{after}", &edit[after.len()..]);
				*ops[i].text_mut() = shifted;
				ops[i - 1].text_mut().push_str(&after);
				ops.remove(i + 1);
				changed = true;
			}
		}
		i += 1;
	}

	changed
}

/// Turns equalities that are no longer than the edits on both sides into a
/// delete/insert pair. Returns whether any were eliminated.
fn eliminate_equalities(ops: &mut Vec<EditOp>) -> bool {
	let mut changed = false;
	let mut equalities: Vec<usize> = Vec::new();
	let mut last_equality: Option<usize> = None;
	// Inserted and deleted char counts before and after the last equality.
	let (mut ins_before, mut del_before) = (0, 0);
	let (mut ins_after, mut del_after) = (0, 0);

	let mut i = 0;
	while i < ops.len() {
		let len = ops[i].text().chars().count();
		match ops[i].tag() {
			Tag::Equal => {
				equalities.push(i);
				(ins_before, del_before) = (ins_after, del_after);
				(ins_after, del_after) = (0, 0);
				last_equality = Some(len);
			}
			tag => {
				if tag == Tag::Insert {
					ins_after += len;
				} else {
					del_after += len;
				}

				let small = last_equality.is_some_and(|n| {
					n <= ins_before.max(del_before)
						&& n <= ins_after.max(del_after)
				});
				if let Some(&at) = equalities.last().filter(|_| small) {
					equalities.pop();
					let text = std::mem::take(ops[at].text_mut());
					ops[at] = EditOp::Insert(text.clone());
					ops.insert(at, EditOp::Delete(text));

					// The previous equality needs to be looked at again.
					equalities.pop();
					(ins_before, del_before) = (0, 0);
					(ins_after, del_after) = (0, 0);
					last_equality = None;
					changed = true;

					i = equalities.last().map_or(0, |&e| e + 1);
					continue;
				}
			}
		}
		i += 1;
	}

	changed
}

/// Slides each lone edit between two equalities to the position with the
/// best [`boundary_score`]. Ties go to the rightmost position.
fn align_boundaries(ops: &mut Vec<EditOp>) {
	let mut i = 1;
	while i + 1 < ops.len() {
		if is_single_edit(ops, i) {
			let mut left = ops[i - 1].text().to_string();
			let mut edit = ops[i].text().to_string();
			let mut right = ops[i + 1].text().to_string();

			// Start from the leftmost position the edit can take.
			let shared = common_suffix(&left, &edit);
			if shared > 0 {
				let common = edit[edit.len() - shared..].to_string();
				left.truncate(left.len() - shared);
				edit = format!("{common}{}", &edit[..edit.len() - shared]);
				right = format!("{common}{right}");
			}

			let mut best_score =
				boundary_score(&left, &edit) + boundary_score(&edit, &right);
			let mut best = (left.clone(), edit.clone(), right.clone());

			while let (Some(c), Some(r)) =
				(edit.chars().next(), right.chars().next())
			{
				if c != r {
					break;
				}
				left.push(c);
				edit.remove(0);
				edit.push(c);
				right.remove(0);

				let score =
					boundary_score(&left, &edit) + boundary_score(&edit, &right);
				if score >= best_score {
					best_score = score;
					best = (left.clone(), edit.clone(), right.clone());
				}
			}

			let (left, edit, right) = best;
			if ops[i - 1].text() != left {
				*ops[i].text_mut() = edit;
				if right.is_empty() {
					ops.remove(i + 1);
				} else {
					*ops[i + 1].text_mut() = right;
				}
				if left.is_empty() {
					ops.remove(i - 1);
					i -= 1;
				} else {
					*ops[i - 1].text_mut() = left;
				}
			}
		}
		i += 1;
	}
}

/// Splits text shared by the tail of a deletion and the head of the
/// following insertion (or the reverse) out into an equality, when the
/// overlap covers at least half of either edit.
fn extract_overlaps(ops: &mut Vec<EditOp>) {
	let mut i = 1;
	while i < ops.len() {
		if ops[i - 1].tag() == Tag::Delete && ops[i].tag() == Tag::Insert {
			let deletion = ops[i - 1].text().to_string();
			let insertion = ops[i].text().to_string();
			let forward = common_overlap(&deletion, &insertion);
			let backward = common_overlap(&insertion, &deletion);

			if forward >= backward {
				if covers_half(&insertion[..forward], &deletion, &insertion) {
					ops[i - 1] =
						EditOp::Delete(deletion[..deletion.len() - forward].into());
					ops[i] = EditOp::Insert(insertion[forward..].into());
					ops.insert(i, EditOp::Equal(insertion[..forward].into()));
					i += 1;
				}
			} else if covers_half(&deletion[..backward], &deletion, &insertion)
			{
				ops[i - 1] = EditOp::Insert(
					insertion[..insertion.len() - backward].into(),
				);
				ops[i] = EditOp::Delete(deletion[backward..].into());
				ops.insert(i, EditOp::Equal(deletion[..backward].into()));
				i += 1;
			}
			i += 1;
		}
		i += 1;
	}
}

fn covers_half(overlap: &str, deletion: &str, insertion: &str) -> bool {
	let n = overlap.chars().count();
	n > 0
		&& (2 * n >= deletion.chars().count()
			|| 2 * n >= insertion.chars().count())
}

fn is_single_edit(ops: &[EditOp], i: usize) -> bool {
	ops[i].tag() != Tag::Equal
		&& ops[i - 1].tag() == Tag::Equal
		&& ops[i + 1].tag() == Tag::Equal
}

/// How good a place the seam between `one` and `two` is to start or end an
/// edit:
///
/// - 6: edge of the text
/// - 5: blank line
/// - 4: line break
/// - 3: end of sentence
/// - 2: whitespace
/// - 1: other non-alphanumeric
/// - 0: inside a word
fn boundary_score(one: &str, two: &str) -> u8 {
	let (Some(c1), Some(c2)) = (one.chars().next_back(), two.chars().next())
	else {
		return 6;
	};

	let punct1 = !c1.is_alphanumeric();
	let punct2 = !c2.is_alphanumeric();
	let space1 = punct1 && c1.is_whitespace();
	let space2 = punct2 && c2.is_whitespace();
	let break1 = space1 && (c1 == '\r' || c1 == '\n');
	let break2 = space2 && (c2 == '\r' || c2 == '\n');
	let blank1 = break1 && (one.ends_with("\n\n") || one.ends_with("\n\r\n"));
	let blank2 = break2
		&& ["\n\n", "\n\r\n", "\r\n\n", "\r\n\r\n"]
			.iter()
			.any(|p| two.starts_with(p));

	if blank1 || blank2 {
		5
	} else if break1 || break2 {
		4
	} else if punct1 && !space1 && space2 {
		3
	} else if space1 || space2 {
		2
	} else if punct1 || punct2 {
		1
	} else {
		0
	}
}
