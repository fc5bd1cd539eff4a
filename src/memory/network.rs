//! In-memory concept graph built from engram schemas.
//!
//! Every distinct normalized label maps to exactly one [`ConceptNode`]. Merging
//! a mindmap finds or creates a node per label and records parent/child edges;
//! repeated labels, even from different engrams or depths, collapse into the
//! same node. Nodes live in an arena and are addressed by [`ConceptId`], so the
//! graph may hold cycles and multi-parent nodes without shared ownership.

use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};

use super::mindmap::MindmapNode;

/// Index of a concept in the network's arena. Stable for the network's lifetime.
pub type ConceptId = usize;

/// Normalized lookup key for a label: trimmed and lowercased.
///
/// The same rule applies to labels and queries, for Latin and CJK text alike.
pub fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}

/// A deduplicated concept accumulating edges and engram references.
#[derive(Debug, Clone)]
pub struct ConceptNode {
    key: String,
    label: String,
    engram_ids: Vec<String>,
    parents: Vec<ConceptId>,
    children: Vec<ConceptId>,
}

impl ConceptNode {
    fn new(key: String, label: &str) -> Self {
        Self {
            key,
            label: label.trim().to_string(),
            engram_ids: Vec::new(),
            parents: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Display form: the first spelling seen for this key.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Engrams referencing this concept, in attachment order.
    pub fn engram_ids(&self) -> &[String] {
        &self.engram_ids
    }

    pub fn parents(&self) -> &[ConceptId] {
        &self.parents
    }

    pub fn children(&self) -> &[ConceptId] {
        &self.children
    }
}

/// How a concept matched a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Key equals the query.
    Exact,
    /// Key contains the query.
    Contains,
    /// Query contains the key.
    Contained,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptMatch {
    #[serde(skip)]
    pub id: ConceptId,
    pub label: String,
    pub kind: MatchKind,
}

/// Serializable view of one concept and its immediate neighborhood.
#[derive(Debug, Clone, Serialize)]
pub struct ConceptView {
    pub label: String,
    pub parents: Vec<String>,
    pub children: Vec<String>,
    pub engram_ids: Vec<String>,
}

#[derive(Debug, Default)]
pub struct SemanticNetwork {
    nodes: Vec<ConceptNode>,
    index: HashMap<String, ConceptId>,
}

impl SemanticNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of concept nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of distinct parent→child edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.children.len()).sum()
    }

    pub fn node(&self, id: ConceptId) -> Option<&ConceptNode> {
        self.nodes.get(id)
    }

    pub fn get(&self, label: &str) -> Option<&ConceptNode> {
        self.index.get(&normalize(label)).map(|&id| &self.nodes[id])
    }

    /// Merge a parsed mindmap into the graph.
    pub fn merge(&mut self, root: &MindmapNode) {
        self.merge_tree(root);
    }

    /// Record that `engram_id` references the concept `label`, creating the
    /// concept if needed. Blank labels are ignored.
    pub fn attach(&mut self, label: &str, engram_id: &str) {
        if let Some(id) = self.find_or_create(label) {
            self.attach_id(id, engram_id);
        }
    }

    /// Merge an engram's schema tree and attach the engram to every distinct
    /// concept it mentions. Returns the touched labels in first-seen order.
    pub fn index(&mut self, root: &MindmapNode, engram_id: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut labels = Vec::new();
        for id in self.merge_tree(root) {
            if seen.insert(id) {
                self.attach_id(id, engram_id);
                labels.push(self.nodes[id].label.clone());
            }
        }
        labels
    }

    /// Concepts matching `query`: exact matches first, then partial matches
    /// with longer keys ahead of shorter ones, then creation order.
    ///
    /// A blank query matches nothing.
    pub fn matches(&self, query: &str) -> Vec<ConceptMatch> {
        let query = normalize(query);
        if query.is_empty() {
            return Vec::new();
        }

        let mut exact = Vec::new();
        let mut partial = Vec::new();
        for (id, node) in self.nodes.iter().enumerate() {
            let kind = if node.key == query {
                MatchKind::Exact
            } else if node.key.contains(query.as_str()) {
                MatchKind::Contains
            } else if contains_word(&query, &node.key) {
                MatchKind::Contained
            } else {
                continue;
            };
            let m = ConceptMatch {
                id,
                label: node.label.clone(),
                kind,
            };
            if kind == MatchKind::Exact {
                exact.push(m);
            } else {
                partial.push(m);
            }
        }

        // Stable sort keeps creation order among equal lengths.
        partial.sort_by_key(|m| std::cmp::Reverse(self.nodes[m.id].key.chars().count()));
        exact.extend(partial);
        exact
    }

    /// Descendants of `start` up to `depth` child hops, breadth-first,
    /// excluding the start nodes themselves.
    pub fn spread(&self, start: &[ConceptId], depth: usize) -> Vec<ConceptId> {
        let mut visited: HashSet<ConceptId> = start.iter().copied().collect();
        let mut queue: VecDeque<(ConceptId, usize)> = start.iter().map(|&id| (id, 0)).collect();
        let mut reached = Vec::new();

        while let Some((id, hops)) = queue.pop_front() {
            if hops >= depth {
                continue;
            }
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            for &child in &node.children {
                if visited.insert(child) {
                    reached.push(child);
                    queue.push_back((child, hops + 1));
                }
            }
        }
        reached
    }

    /// Display labels of the parents and children of `label`.
    pub fn neighbors(&self, label: &str) -> Option<(Vec<String>, Vec<String>)> {
        let node = self.get(label)?;
        Some((self.labels_of(&node.parents), self.labels_of(&node.children)))
    }

    /// The concept for `label` with its parent and child labels.
    pub fn view(&self, label: &str) -> Option<ConceptView> {
        let node = self.get(label)?;
        let (parents, children) = self.neighbors(label)?;
        Some(ConceptView {
            label: node.label.clone(),
            parents,
            children,
            engram_ids: node.engram_ids.clone(),
        })
    }

    fn labels_of(&self, ids: &[ConceptId]) -> Vec<String> {
        ids.iter().map(|&i| self.nodes[i].label.clone()).collect()
    }

    /// Depth-first merge. Returns the concept id of every visited node in
    /// pre-order, repeats included.
    fn merge_tree(&mut self, root: &MindmapNode) -> Vec<ConceptId> {
        let mut visited = Vec::new();
        let mut stack: Vec<(&MindmapNode, Option<ConceptId>)> = vec![(root, None)];

        while let Some((node, parent)) = stack.pop() {
            let Some(id) = self.find_or_create(&node.label) else {
                continue;
            };
            if let Some(parent) = parent {
                self.link(parent, id);
            }
            visited.push(id);
            stack.extend(node.children.iter().rev().map(|child| (child, Some(id))));
        }
        visited
    }

    fn find_or_create(&mut self, label: &str) -> Option<ConceptId> {
        let key = normalize(label);
        if key.is_empty() {
            return None;
        }
        if let Some(&id) = self.index.get(&key) {
            return Some(id);
        }
        let id = self.nodes.len();
        self.nodes.push(ConceptNode::new(key.clone(), label));
        self.index.insert(key, id);
        Some(id)
    }

    /// Idempotently add parent→child and child→parent. Self-edges are skipped.
    fn link(&mut self, parent: ConceptId, child: ConceptId) {
        if parent == child {
            return;
        }
        if !self.nodes[parent].children.contains(&child) {
            self.nodes[parent].children.push(child);
        }
        if !self.nodes[child].parents.contains(&parent) {
            self.nodes[child].parents.push(parent);
        }
    }

    fn attach_id(&mut self, id: ConceptId, engram_id: &str) {
        let ids = &mut self.nodes[id].engram_ids;
        if !ids.iter().any(|e| e == engram_id) {
            ids.push(engram_id.to_string());
        }
    }
}

/// Whether `key` occurs in `text` as a whole word.
///
/// An occurrence is bounded when the neighboring character is absent or not a
/// word character. Scripts written without spaces (Han, kana, Hangul) have no
/// word boundaries, so their characters never count as word characters.
fn contains_word(text: &str, key: &str) -> bool {
    let (Some(first), Some(last)) = (key.chars().next(), key.chars().next_back()) else {
        return false;
    };
    text.match_indices(key).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + key.len()..].chars().next();
        let bounded = |edge: char, neighbor: Option<char>| {
            !is_word_char(edge) || !neighbor.is_some_and(is_word_char)
        };
        bounded(first, before) && bounded(last, after)
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() && !is_unspaced_script(c)
}

fn is_unspaced_script(c: char) -> bool {
    matches!(
        c as u32,
        0x3040..=0x30FF     // hiragana, katakana
            | 0x3400..=0x4DBF // CJK extension A
            | 0x4E00..=0x9FFF // CJK unified ideographs
            | 0xAC00..=0xD7AF // hangul syllables
            | 0xF900..=0xFAFF // CJK compatibility ideographs
            | 0x20000..=0x2FA1F
    )
}
