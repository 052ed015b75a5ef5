//! Recursive-descent parser for single-line binary Newick trees.
//!
//! # Grammar
//! ```text
//! tree          := subtree [':' branch_length] [';']
//! subtree       := '(' child ',' child ')'
//! child         := (subtree | name?) [':' branch_length]
//! name          := [0-9A-Za-z]+            (discarded)
//! branch_length := [0-9.eE]+ with an optional sign right after 'e'/'E'
//! ```
//!
//! A branch length always belongs to the child it follows. The scan position is
//! passed into every routine and handed back next to the node it built, so the
//! parser holds no state between calls.
//!
//! # Example
//! ```
//! # use ms_etitj::newick::parse_newick;
//! let tree = parse_newick("((1:0.5,2:0.5):1.0,3:1.5);").unwrap();
//! assert_eq!(tree.num_leaves(), 3);
//! assert_eq!(tree.num_internal(), 2);
//! ```

use crate::error::NewickError;
use crate::tree::TreeNode;

/// Parse one whitespace-free Newick line into a binary tree.
///
/// The root may carry its own `:length`; the trailing `;` is optional, but nothing
/// may follow it.
///
/// # Errors
/// Returns [`NewickError`] on the first missing delimiter, malformed branch length,
/// or leftover input. No partial tree is returned.
pub fn parse_newick(line: &str) -> Result<TreeNode, NewickError> {
    let (mut root, mut pos) = parse_subtree(line, 0)?;
    let bytes = line.as_bytes();

    if bytes.get(pos) == Some(&b':') {
        let (length, next) = parse_branch_length(line, pos + 1)?;
        root.branch_length = length;
        pos = next;
    }
    if bytes.get(pos) == Some(&b';') {
        pos += 1;
    }
    if pos < bytes.len() {
        return Err(NewickError::TrailingInput { position: pos });
    }
    Ok(root)
}

/// Parse `'(' child ',' child ')'` starting at `pos`.
///
/// Returns the internal node and the position just past its `)`.
fn parse_subtree(line: &str, pos: usize) -> Result<(TreeNode, usize), NewickError> {
    let pos = expect(line, pos, b'(', "'('")?;
    let (left, pos) = parse_child(line, pos)?;
    let pos = expect(line, pos, b',', "','")?;
    let (right, pos) = parse_child(line, pos)?;
    let pos = expect(line, pos, b')', "')'")?;
    Ok((TreeNode::internal(left, right), pos))
}

/// Parse a nested subtree or a (possibly anonymous) leaf, plus its branch length.
fn parse_child(line: &str, pos: usize) -> Result<(TreeNode, usize), NewickError> {
    let bytes = line.as_bytes();
    let (mut child, mut pos) = match bytes.get(pos) {
        Some(b'(') => parse_subtree(line, pos)?,
        Some(b) if b.is_ascii_alphanumeric() => (TreeNode::leaf(), skip_name(bytes, pos)),
        Some(_) => (TreeNode::leaf(), pos),
        None => {
            return Err(NewickError::UnexpectedEnd {
                position: pos,
                expected: "a subtree, leaf or branch length",
            });
        }
    };

    if bytes.get(pos) == Some(&b':') {
        let (length, next) = parse_branch_length(line, pos + 1)?;
        child.branch_length = length;
        pos = next;
    }
    Ok((child, pos))
}

fn skip_name(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(u8::is_ascii_alphanumeric) {
        pos += 1;
    }
    pos
}

/// Greedily consume a floating point literal starting right after the ':'.
fn parse_branch_length(line: &str, start: usize) -> Result<(f64, usize), NewickError> {
    let bytes = line.as_bytes();
    let mut pos = start;
    while let Some(&b) = bytes.get(pos) {
        let exponent_sign = (b == b'-' || b == b'+')
            && pos > start
            && matches!(bytes[pos - 1], b'e' | b'E');
        if !(b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E') || exponent_sign) {
            break;
        }
        pos += 1;
    }

    // Only ASCII bytes were consumed, so both ends are char boundaries.
    let text = &line[start..pos];
    match text.parse::<f64>() {
        Ok(length) => Ok((length, pos)),
        Err(_) => Err(NewickError::InvalidBranchLength {
            text: text.to_string(),
            position: start,
        }),
    }
}

fn expect(line: &str, pos: usize, delimiter: u8, expected: &'static str) -> Result<usize, NewickError> {
    match line.as_bytes().get(pos) {
        Some(&b) if b == delimiter => Ok(pos + 1),
        Some(_) => Err(NewickError::UnexpectedChar {
            found: line[pos..].chars().next().unwrap_or('?'),
            position: pos,
            expected,
        }),
        None => Err(NewickError::UnexpectedEnd { position: pos, expected }),
    }
}
