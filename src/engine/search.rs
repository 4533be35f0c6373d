//! Weighted multi-field ranking of papers against a free-text query.
//!
//! Each query term is counted (non-overlapping) in the lowercased title,
//! authors, domain and summary. Counts are multiplied by the field weight and
//! summed. Matches then receive a small bonus proportional to their degree,
//! capped so it can only reorder papers whose base scores are within 1.0.

use std::collections::HashSet;

use super::adjacency::AdjacencyIndex;
use super::types::{Node, NodeId};

pub const TITLE_WEIGHT: f64 = 3.0;
pub const AUTHORS_WEIGHT: f64 = 2.0;
pub const DOMAIN_WEIGHT: f64 = 1.5;
pub const SUMMARY_WEIGHT: f64 = 1.0;

/// Degree beyond which the tie-break bonus stops growing.
pub const DEGREE_CAP: usize = 50;
/// Bonus per neighbor, up to [`DEGREE_CAP`].
pub const DEGREE_BONUS: f64 = 0.02;

/// One ranked result.
#[derive(Clone, Copy, Debug)]
pub struct SearchHit<'a> {
	pub node: &'a Node,
	pub score: f64,
	pub degree: usize,
}

/// Lowercases and trims `query`, then splits it on whitespace.
pub fn tokenize(query: &str) -> Vec<String> {
	query
		.trim()
		.to_lowercase()
		.split_whitespace()
		.map(str::to_owned)
		.collect()
}

/// Non-overlapping occurrences of `needle` in `haystack`.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
	if needle.is_empty() {
		return 0;
	}
	let mut count = 0;
	let mut pos = 0;
	while let Some(found) = haystack[pos..].find(needle) {
		count += 1;
		pos += found + needle.len();
	}
	count
}

/// Tie-break bonus for a matched node of the given degree.
pub fn degree_bonus(degree: usize) -> f64 {
	degree.min(DEGREE_CAP) as f64 * DEGREE_BONUS
}

struct Fields {
	title: String,
	authors: String,
	domain: String,
	summary: String,
	/// All fields joined, for the cheap substring match set.
	haystack: String,
}

impl Fields {
	fn new(node: &Node) -> Self {
		let title = node.title.to_lowercase();
		let authors = node.authors.to_lowercase();
		let domain = node.domain.to_lowercase();
		let summary = node.summary.as_deref().unwrap_or_default().to_lowercase();
		let haystack = [title.as_str(), authors.as_str(), domain.as_str(), summary.as_str()].join(" ");
		Self {
			title,
			authors,
			domain,
			summary,
			haystack,
		}
	}

	fn base_score(&self, terms: &[String]) -> f64 {
		terms
			.iter()
			.map(|term| {
				count_occurrences(&self.title, term) as f64 * TITLE_WEIGHT
					+ count_occurrences(&self.authors, term) as f64 * AUTHORS_WEIGHT
					+ count_occurrences(&self.domain, term) as f64 * DOMAIN_WEIGHT
					+ count_occurrences(&self.summary, term) as f64 * SUMMARY_WEIGHT
			})
			.sum()
	}
}

/// Lowercased search fields for every node, built once per dataset.
///
/// The index is positional: query methods must be given the same node slice
/// it was built from.
#[derive(Default)]
pub struct SearchIndex {
	fields: Vec<Fields>,
}

impl SearchIndex {
	pub fn new(nodes: &[Node]) -> Self {
		Self {
			fields: nodes.iter().map(Fields::new).collect(),
		}
	}

	/// Ranked matches for `query`, at most `limit` of them. An empty query
	/// yields no results; use [`SearchIndex::default_listing`] for the
	/// initial view.
	pub fn search<'a>(
		&self,
		nodes: &'a [Node],
		query: &str,
		adjacency: &AdjacencyIndex,
		limit: usize,
	) -> Vec<SearchHit<'a>> {
		let terms = tokenize(query);
		if terms.is_empty() {
			return Vec::new();
		}

		let mut hits: Vec<SearchHit<'a>> = nodes
			.iter()
			.zip(&self.fields)
			.filter_map(|(node, fields)| {
				let base = fields.base_score(&terms);
				if base <= 0.0 {
					return None;
				}
				let degree = adjacency.degree(node.id);
				Some(SearchHit {
					node,
					score: base + degree_bonus(degree),
					degree,
				})
			})
			.collect();

		hits.sort_by(|a, b| b.score.total_cmp(&a.score));
		hits.truncate(limit);
		hits
	}

	/// Every node with score 0, most connected first.
	pub fn default_listing<'a>(&self, nodes: &'a [Node], adjacency: &AdjacencyIndex) -> Vec<SearchHit<'a>> {
		let mut hits: Vec<SearchHit<'a>> = nodes
			.iter()
			.map(|node| SearchHit {
				node,
				score: 0.0,
				degree: adjacency.degree(node.id),
			})
			.collect();
		hits.sort_by(|a, b| b.degree.cmp(&a.degree));
		hits
	}

	/// Ids whose joined lowercased fields contain the whole trimmed query.
	/// Only used to decide what to dim; independent of the ranking.
	pub fn match_set(&self, nodes: &[Node], query: &str) -> HashSet<NodeId> {
		let needle = query.trim().to_lowercase();
		if needle.is_empty() {
			return HashSet::new();
		}
		nodes
			.iter()
			.zip(&self.fields)
			.filter(|(_, fields)| fields.haystack.contains(&needle))
			.map(|(node, _)| node.id)
			.collect()
	}
}

/// One-shot ranking without a prebuilt index.
pub fn search<'a>(
	nodes: &'a [Node],
	query: &str,
	adjacency: &AdjacencyIndex,
	limit: usize,
) -> Vec<SearchHit<'a>> {
	SearchIndex::new(nodes).search(nodes, query, adjacency, limit)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::engine::adjacency::DanglingLinkPolicy;
	use crate::engine::adjacency::tests::node;
	use crate::engine::types::Link;

	fn build(nodes: &[Node], links: &[Link]) -> AdjacencyIndex {
		AdjacencyIndex::build(nodes, links, DanglingLinkPolicy::Skip)
			.unwrap()
			.adjacency
	}

	fn link(s: u64, t: u64) -> Link {
		Link {
			source: NodeId(s),
			target: NodeId(t),
			weight: 0.9,
		}
	}

	#[test]
	fn tokenize_splits_and_lowercases() {
		assert_eq!(tokenize("  Reward  HACKING\tRL "), vec!["reward", "hacking", "rl"]);
		assert!(tokenize("   ").is_empty());
	}

	#[test]
	fn occurrences_do_not_overlap() {
		assert_eq!(count_occurrences("aaaa", "aa"), 2);
		assert_eq!(count_occurrences("aaa", "aa"), 1);
		assert_eq!(count_occurrences("alignment of alignment", "alignment"), 2);
		assert_eq!(count_occurrences("abc", ""), 0);
		assert_eq!(count_occurrences("", "a"), 0);
	}

	#[test]
	fn two_node_scenario() {
		let mut a = node(1, "alignment survey");
		a.authors = "A".into();
		let mut b = node(2, "robotics");
		b.authors = "B".into();
		let nodes = vec![a, b];
		let adjacency = build(&nodes, &[Link {
			source: NodeId(1),
			target: NodeId(2),
			weight: 0.8,
		}]);

		let hits = search(&nodes, "alignment", &adjacency, 100);
		assert_eq!(hits.len(), 1);
		assert_eq!(hits[0].node.id, NodeId(1));
		assert_eq!(hits[0].degree, 1);
		assert!((hits[0].score - 3.02).abs() < 1e-9);
	}

	#[test]
	fn field_weights_apply() {
		let mut n = node(1, "x");
		n.authors = "Safety".into();
		n.domain = "safety".into();
		n.summary = Some("safety safety".into());
		let nodes = vec![n];
		let adjacency = build(&nodes, &[]);
		let hits = search(&nodes, "SAFETY", &adjacency, 10);
		assert!((hits[0].score - (2.0 + 1.5 + 2.0)).abs() < 1e-9);
	}

	#[test]
	fn no_match_returns_empty_but_default_listing_returns_all() {
		let nodes = vec![node(1, "a"), node(2, "b"), node(3, "c")];
		let adjacency = build(&nodes, &[link(2, 1), link(2, 3)]);
		let index = SearchIndex::new(&nodes);
		assert!(index.search(&nodes, "zebra", &adjacency, 100).is_empty());
		assert!(index.search(&nodes, "", &adjacency, 100).is_empty());

		let listing = index.default_listing(&nodes, &adjacency);
		assert_eq!(listing.len(), 3);
		assert_eq!(listing[0].node.id, NodeId(2));
		assert!(listing.iter().all(|hit| hit.score == 0.0));
	}

	#[test]
	fn tie_break_never_promotes_non_matches() {
		let mut nodes = vec![node(1, "alignment")];
		nodes.extend((2..60).map(|i| node(i, "unrelated")));
		let links: Vec<_> = (3..60).map(|i| link(2, i)).collect();
		let adjacency = build(&nodes, &links);
		let hits = search(&nodes, "alignment", &adjacency, 100);
		assert_eq!(hits.len(), 1);
		assert_eq!(hits[0].node.id, NodeId(1));
	}

	#[test]
	fn tie_break_is_bounded() {
		let mut nodes = vec![node(1, "alignment"), node(2, "alignment")];
		nodes.extend((3..100).map(|i| node(i, "other")));
		let links: Vec<_> = (3..100).map(|i| link(1, i)).collect();
		let adjacency = build(&nodes, &links);
		let hits = search(&nodes, "alignment", &adjacency, 100);
		assert_eq!(hits[0].node.id, NodeId(1));
		assert!(hits[0].score - hits[1].score <= 1.0 + 1e-9);
		assert!((degree_bonus(500) - 1.0).abs() < 1e-9);
	}

	#[test]
	fn more_title_occurrences_never_lower_score() {
		let nodes = vec![node(1, "alignment"), node(2, "alignment alignment")];
		let adjacency = build(&nodes, &[]);
		let hits = search(&nodes, "alignment", &adjacency, 10);
		assert_eq!(hits[0].node.id, NodeId(2));
		assert!(hits[0].score > hits[1].score);
	}

	#[test]
	fn results_truncate_to_limit() {
		let nodes: Vec<_> = (1..=30).map(|i| node(i, "interpretability")).collect();
		let adjacency = build(&nodes, &[]);
		assert_eq!(search(&nodes, "interpretability", &adjacency, 10).len(), 10);
	}

	#[test]
	fn match_set_uses_whole_query_as_one_substring() {
		let mut a = node(1, "Scalable Oversight");
		a.authors = "Jane Doe".into();
		let b = node(2, "oversight scalable");
		let nodes = vec![a, b];
		let index = SearchIndex::new(&nodes);
		let set = index.match_set(&nodes, "  scalable oversight ");
		assert!(set.contains(&NodeId(1)));
		assert!(!set.contains(&NodeId(2)));
		assert!(index.match_set(&nodes, "jane").contains(&NodeId(1)));
		assert!(index.match_set(&nodes, "").is_empty());
	}
}
