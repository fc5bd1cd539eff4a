//! Mindmap schema parser.
//!
//! Engram schemas are written in a small outline notation compatible with
//! Mermaid's `mindmap` diagrams:
//!
//! ```text
//! mindmap
//!   root((Rust))
//!     ownership
//!       borrowing
//!     traits → generics
//! ```
//!
//! - An optional `mindmap` header line is skipped, as are `::icon(...)` and
//!   `:::class` decoration lines and blank lines.
//! - The root line is `root` plus a shape around the label: `root((X))`,
//!   `root(X)`, `root[X]`, `root{{X}}`, `root))X((` or `root)X(`.
//! - Every other line is one node. Shape wrappers (and a bare `id` prefix such
//!   as `n1[Label]`) are stripped from the label.
//! - `→` or `->` chains nest each segment under the previous one; deeper lines
//!   after a chain nest under its last segment.
//! - Nesting comes from indentation width alone. A tab advances to the next
//!   multiple of four columns.
//!
//! [`parse`] either returns the whole tree or a [`ParseError`]; it never
//! returns a partial tree.

use serde::Serialize;

use super::error::{ParseError, ParseErrorKind};

const TAB_WIDTH: usize = 4;

/// Shape wrappers, longest delimiters first so `((X))` is not read as `(X)`.
const SHAPES: [(&str, &str); 6] = [
    ("((", "))"),
    ("{{", "}}"),
    ("))", "(("),
    ("(", ")"),
    ("[", "]"),
    (")", "("),
];

const ARROWS: [&str; 2] = ["→", "->"];

/// A node of a parsed mindmap. Children keep source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MindmapNode {
    pub label: String,
    pub depth: usize,
    pub children: Vec<MindmapNode>,
}

impl MindmapNode {
    /// Pre-order traversal (a node before its children, children in source order).
    pub fn iter(&self) -> Vec<&MindmapNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Labels in pre-order.
    pub fn labels(&self) -> Vec<&str> {
        self.iter().into_iter().map(|n| n.label.as_str()).collect()
    }

    pub fn node_count(&self) -> usize {
        self.iter().len()
    }

    /// Re-serialize as an indented outline, two spaces per level.
    pub fn to_outline(&self) -> String {
        let mut out = String::new();
        for node in self.iter() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&"  ".repeat(node.depth));
            if node.depth == 0 {
                out.push_str(&format!("root(({}))", node.label));
            } else {
                out.push_str(&node.label);
            }
        }
        out
    }
}

/// Arena entry used while the tree is still open.
struct Draft {
    label: String,
    depth: usize,
    children: Vec<usize>,
}

/// A node that can still receive children, keyed by the indentation of the
/// line that opened it.
#[derive(Clone, Copy)]
struct Open {
    indent: usize,
    node: usize,
}

/// Parse a mindmap schema into its single root node.
pub fn parse(text: &str) -> Result<MindmapNode, ParseError> {
    let mut arena: Vec<Draft> = Vec::new();
    let mut stack: Vec<Open> = Vec::new();
    let mut root_indent: Option<usize> = None;
    let mut seen_content = false;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !seen_content && trimmed.eq_ignore_ascii_case("mindmap") {
            seen_content = true;
            continue;
        }
        seen_content = true;
        if is_decoration(trimmed) {
            continue;
        }

        let err = |kind| ParseError::new(kind, line_no, raw);
        let indent = indent_width(raw);
        let segments = split_chain(trimmed);

        // Once the root exists, `root` only marks another root when followed by
        // a complete shape; `Root(cause) analysis` is an ordinary label.
        let opens_root = is_root_marker(segments[0])
            && (root_indent.is_none() || root_label(segments[0]).is_some());
        let (head, depth_base) = if opens_root {
            if root_indent.is_some() {
                return Err(err(ParseErrorKind::MultipleRoots));
            }
            let label = root_label(segments[0]).ok_or_else(|| err(ParseErrorKind::MalformedRoot))?;
            root_indent = Some(indent);
            arena.push(Draft {
                label,
                depth: 0,
                children: Vec::new(),
            });
            (arena.len() - 1, 0)
        } else {
            let Some(root_indent) = root_indent else {
                return Err(err(ParseErrorKind::NoRoot));
            };
            if indent < root_indent {
                return Err(err(ParseErrorKind::DedentPastRoot));
            }
            if indent == root_indent {
                return Err(err(ParseErrorKind::MultipleRoots));
            }

            let mut matched_sibling = false;
            let mut popped = false;
            while let Some(top) = stack.last() {
                if top.indent < indent {
                    break;
                }
                matched_sibling |= top.indent == indent;
                popped = true;
                stack.pop();
            }
            if popped && !matched_sibling {
                return Err(err(ParseErrorKind::InconsistentIndent));
            }
            let Some(parent) = stack.last().copied() else {
                return Err(err(ParseErrorKind::DedentPastRoot));
            };

            let label = node_label(segments[0]).ok_or_else(|| err(ParseErrorKind::EmptyLabel))?;
            let depth = arena[parent.node].depth + 1;
            arena.push(Draft {
                label,
                depth,
                children: Vec::new(),
            });
            let id = arena.len() - 1;
            arena[parent.node].children.push(id);
            (id, depth)
        };

        // Remaining chain segments nest one level each under the previous one.
        let mut tail = head;
        for (offset, segment) in segments.iter().enumerate().skip(1) {
            if is_root_marker(segment) && root_label(segment).is_some() {
                return Err(err(ParseErrorKind::MultipleRoots));
            }
            let label = node_label(segment).ok_or_else(|| err(ParseErrorKind::EmptyLabel))?;
            arena.push(Draft {
                label,
                depth: depth_base + offset,
                children: Vec::new(),
            });
            let id = arena.len() - 1;
            arena[tail].children.push(id);
            tail = id;
        }

        stack.push(Open { indent, node: tail });
    }

    if arena.is_empty() {
        let last = text.lines().count().max(1);
        return Err(ParseError::new(ParseErrorKind::NoRoot, last, ""));
    }

    Ok(build(&arena, 0))
}

fn build(arena: &[Draft], idx: usize) -> MindmapNode {
    let draft = &arena[idx];
    MindmapNode {
        label: draft.label.clone(),
        depth: draft.depth,
        children: draft.children.iter().map(|&c| build(arena, c)).collect(),
    }
}

fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for c in line.chars() {
        match c {
            '\t' => width = (width / TAB_WIDTH + 1) * TAB_WIDTH,
            c if c.is_whitespace() => width += 1,
            _ => break,
        }
    }
    width
}

fn is_decoration(line: &str) -> bool {
    line.starts_with("::icon(") || line.starts_with(":::")
}

/// Split `A → B -> C` into trimmed segments. Always returns at least one.
///
/// Arrows inside a shape wrapper (`[a -> b]`, `))a → b((`) are part of the
/// label. Bracket balance is signed so bang shapes, which open with `)`, count
/// as enclosing too.
fn split_chain(line: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut balance = [0i32; 3];
    let mut chars = line.char_indices();

    while let Some((pos, c)) = chars.next() {
        match c {
            '(' => balance[0] += 1,
            ')' => balance[0] -= 1,
            '[' => balance[1] += 1,
            ']' => balance[1] -= 1,
            '{' => balance[2] += 1,
            '}' => balance[2] -= 1,
            _ => {}
        }
        if balance != [0; 3] {
            continue;
        }
        if let Some(arrow) = ARROWS.iter().find(|a| line[pos..].starts_with(**a)) {
            segments.push(line[start..pos].trim());
            start = pos + arrow.len();
            // Skip the rest of the arrow.
            for _ in 1..arrow.chars().count() {
                chars.next();
            }
        }
    }
    segments.push(line[start..].trim());
    segments
}

fn is_root_marker(segment: &str) -> bool {
    match (segment.get(..4), segment.get(4..)) {
        (Some(keyword), Some(rest)) => {
            keyword.eq_ignore_ascii_case("root") && rest.starts_with(['(', '[', '{', ')'])
        }
        _ => false,
    }
}

fn root_label(segment: &str) -> Option<String> {
    let shape = segment.get(4..)?;
    unwrap_shape(shape)
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
}

/// Label of a non-root node: shape wrappers and a bare id prefix removed.
fn node_label(segment: &str) -> Option<String> {
    let label = match unwrap_shape(segment) {
        Some(inner) => inner,
        None => strip_id_prefix(segment).unwrap_or(segment),
    };
    let label = label.trim();
    (!label.is_empty()).then(|| label.to_string())
}

/// Inner text of a fully wrapped shape. A leftover bracket of the same kind
/// at either end (`((A)`) means the shape is unbalanced.
fn unwrap_shape(s: &str) -> Option<&str> {
    SHAPES.iter().find_map(|(open, close)| {
        if s.len() < open.len() + close.len() {
            return None;
        }
        let inner = s.strip_prefix(open)?.strip_suffix(close)?;
        let stray_open = open.chars().last().is_some_and(|c| inner.starts_with(c));
        let stray_close = close.chars().next().is_some_and(|c| inner.ends_with(c));
        (!stray_open && !stray_close).then_some(inner)
    })
}

/// `n1[Label]` → `Label`. The id must be a single whitespace-free word.
fn strip_id_prefix(s: &str) -> Option<&str> {
    let pos = s.find(['(', '[', '{', ')'])?;
    let (id, rest) = s.split_at(pos);
    if id.is_empty() || id.chars().any(char::is_whitespace) {
        return None;
    }
    unwrap_shape(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(text: &str) -> ParseErrorKind {
        parse(text).unwrap_err().kind
    }

    #[test]
    fn parses_nested_outline() {
        let tree = parse("root((X))\n  Y\n    Z\n  W").unwrap();
        assert_eq!(tree.label, "X");
        assert_eq!(tree.labels(), vec!["X", "Y", "Z", "W"]);
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[0].children[0].label, "Z");
        assert_eq!(tree.children[0].children[0].depth, 2);
        assert_eq!(tree.children[1].depth, 1);
    }

    #[test]
    fn node_count_equals_non_blank_lines() {
        let text = "root((Top))\n\n  a\n    b\n\n    c\n  d\n      e\n";
        let tree = parse(text).unwrap();
        let non_blank = text.lines().filter(|l| !l.trim().is_empty()).count();
        assert_eq!(tree.node_count(), non_blank);
        assert_eq!(tree.labels(), vec!["Top", "a", "b", "c", "d", "e"]);
    }

    #[test]
    fn skips_mermaid_header_and_decorations() {
        let text = "mindmap\n  root((Rust))\n    ::icon(fa fa-book)\n    ownership\n    :::urgent\n    traits";
        let tree = parse(text).unwrap();
        assert_eq!(tree.labels(), vec!["Rust", "ownership", "traits"]);
    }

    #[test]
    fn accepts_every_root_shape() {
        for root in ["root((X))", "root(X)", "root[X]", "root{{X}}", "root))X((", "root)X("] {
            assert_eq!(parse(root).unwrap().label, "X", "shape {root}");
        }
    }

    #[test]
    fn strips_child_shapes_and_ids() {
        let tree = parse("root((R))\n  [square]\n  (round)\n  n1((circle))\n  plain text here").unwrap();
        assert_eq!(
            tree.labels(),
            vec!["R", "square", "round", "circle", "plain text here"]
        );
    }

    #[test]
    fn trims_labels_but_keeps_internal_whitespace() {
        let tree = parse("root((  big   idea  ))\n    two  words   ").unwrap();
        assert_eq!(tree.label, "big   idea");
        assert_eq!(tree.children[0].label, "two  words");
    }

    #[test]
    fn arrow_chain_nests_segments() {
        let tree = parse("root((X)) → Y → Z").unwrap();
        assert_eq!(tree.labels(), vec!["X", "Y", "Z"]);
        assert_eq!(tree.children[0].children[0].depth, 2);

        let tree = parse("root((X)) -> W").unwrap();
        assert_eq!(tree.labels(), vec!["X", "W"]);
    }

    #[test]
    fn lines_after_chain_nest_under_its_tail() {
        let tree = parse("root((A))\n  B -> C\n    D\n  E").unwrap();
        let b = &tree.children[0];
        assert_eq!(b.label, "B");
        assert_eq!(b.children[0].label, "C");
        assert_eq!(b.children[0].children[0].label, "D");
        assert_eq!(b.children[0].children[0].depth, 3);
        assert_eq!(tree.children[1].label, "E");
    }

    #[test]
    fn tabs_and_spaces_both_count_as_indentation() {
        let tree = parse("root((A))\n\tB\n\t\tC\n\tD").unwrap();
        assert_eq!(tree.labels(), vec!["A", "B", "C", "D"]);
        assert_eq!(tree.children[0].children[0].label, "C");
    }

    #[test]
    fn cjk_labels_are_opaque() {
        let tree = parse("root((人际关系))\n  工作关系\n    同事").unwrap();
        assert_eq!(tree.labels(), vec!["人际关系", "工作关系", "同事"]);
    }

    #[test]
    fn indented_root_is_allowed() {
        let tree = parse("    root((A))\n      B").unwrap();
        assert_eq!(tree.labels(), vec!["A", "B"]);
    }

    #[test]
    fn rejects_empty_document() {
        assert_eq!(kind_of(""), ParseErrorKind::NoRoot);
        assert_eq!(kind_of("\n   \n"), ParseErrorKind::NoRoot);
        assert_eq!(kind_of("mindmap\n"), ParseErrorKind::NoRoot);
    }

    #[test]
    fn rejects_missing_root_marker() {
        let err = parse("X\n  Y").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NoRoot);
        assert_eq!(err.line, 1);
        assert_eq!(err.text, "X");
    }

    #[test]
    fn rejects_two_roots() {
        let err = parse("root((A))\n  B\nroot((C))").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MultipleRoots);
        assert_eq!(err.line, 3);

        // A non-root line at root indentation is a second top-level node.
        assert_eq!(kind_of("root((A))\n  B\nC"), ParseErrorKind::MultipleRoots);
        // A nested root marker is still a second root.
        assert_eq!(kind_of("root((A))\n  root((B))"), ParseErrorKind::MultipleRoots);
    }

    #[test]
    fn rejects_dedent_past_root() {
        let err = parse("  root((A))\n    B\n C").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::DedentPastRoot);
        assert_eq!(err.line, 3);
        assert_eq!(err.text, " C");
    }

    #[test]
    fn rejects_dedent_between_levels() {
        let err = parse("root((A))\n    B\n        C\n      D").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InconsistentIndent);
        assert_eq!(err.line, 4);
    }

    #[test]
    fn rejects_malformed_root() {
        assert_eq!(kind_of("root((A)"), ParseErrorKind::MalformedRoot);
        assert_eq!(kind_of("root(())"), ParseErrorKind::MalformedRoot);
        assert_eq!(kind_of("root[A"), ParseErrorKind::MalformedRoot);
    }

    #[test]
    fn rejects_empty_chain_segment() {
        assert_eq!(kind_of("root((A)) → → B"), ParseErrorKind::EmptyLabel);
        assert_eq!(kind_of("root((A))\n  []"), ParseErrorKind::EmptyLabel);
    }

    #[test]
    fn outline_round_trip_preserves_order_and_depth() {
        let tree = parse("root((X))\n  Y\n    Z\n  W").unwrap();
        let outline = tree.to_outline();
        assert_eq!(outline, "root((X))\n  Y\n    Z\n  W");
        assert_eq!(parse(&outline).unwrap(), tree);
    }

    #[test]
    fn arrows_inside_shapes_belong_to_the_label() {
        let tree = parse("root((A))\n  [a -> b]\n  ((x → y)) -> z\n  ))p -> q((").unwrap();
        assert_eq!(tree.labels(), vec!["A", "a -> b", "x → y", "z", "p -> q"]);
    }

    #[test]
    fn root_word_in_child_label_is_not_a_root() {
        let tree = parse("root((Incident))\n  Root(cause) analysis\n  rooted -> root[cause").unwrap();
        assert_eq!(
            tree.labels(),
            vec!["Incident", "Root(cause) analysis", "rooted", "root[cause"]
        );
    }
}
