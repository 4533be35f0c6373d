//! Undirected neighbor index ranked by similarity weight.

use std::collections::HashMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::error::{DataError, Result};
use super::types::{Link, Node, NodeId};

/// What to do with a link whose endpoint is not in the node set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DanglingLinkPolicy {
	/// Drop the link.
	#[default]
	Skip,
	/// Fail the whole build.
	Error,
	/// Synthesize a placeholder node for the missing endpoint.
	Placeholder,
}

/// One ranked neighbor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
	pub id: NodeId,
	pub weight: f64,
}

/// Read-only neighbor lists, each sorted by weight descending.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyIndex {
	lists: HashMap<NodeId, Vec<Neighbor>>,
}

/// Output of [`AdjacencyIndex::build`].
#[derive(Debug)]
pub struct AdjacencyBuild {
	/// Node id to position in the node slice. Placeholders are indexed after
	/// the input nodes, in the order of `placeholders`.
	pub by_id: HashMap<NodeId, usize>,
	pub adjacency: AdjacencyIndex,
	/// Links that made it into the index, in input order.
	pub links: Vec<Link>,
	/// Nodes synthesized under [`DanglingLinkPolicy::Placeholder`].
	pub placeholders: Vec<Node>,
}

impl AdjacencyIndex {
	/// Builds the index from `nodes` and `links`, expanding every link into both
	/// endpoints' lists.
	pub fn build(nodes: &[Node], links: &[Link], policy: DanglingLinkPolicy) -> Result<AdjacencyBuild> {
		let mut by_id = HashMap::with_capacity(nodes.len());
		let mut lists: HashMap<NodeId, Vec<Neighbor>> = HashMap::with_capacity(nodes.len());
		for (i, node) in nodes.iter().enumerate() {
			by_id.insert(node.id, i);
			lists.insert(node.id, Vec::new());
		}

		let mut placeholders = Vec::new();
		let mut accepted = Vec::with_capacity(links.len());
		let mut skipped = 0usize;
		for link in links {
			if link.source == link.target {
				debug!("dropping self-link on {}", link.source);
				continue;
			}
			let missing = [link.source, link.target]
				.into_iter()
				.filter(|id| !by_id.contains_key(id))
				.collect::<Vec<_>>();
			if !missing.is_empty() {
				match policy {
					DanglingLinkPolicy::Skip => {
						skipped += 1;
						continue;
					}
					DanglingLinkPolicy::Error => {
						return Err(DataError::DanglingLink {
							from: link.source,
							to: link.target,
						});
					}
					DanglingLinkPolicy::Placeholder => {
						for id in missing {
							by_id.insert(id, nodes.len() + placeholders.len());
							lists.insert(id, Vec::new());
							placeholders.push(Node::placeholder(id));
						}
					}
				}
			}

			let weight = link.weight;
			if let Some(list) = lists.get_mut(&link.source) {
				list.push(Neighbor {
					id: link.target,
					weight,
				});
			}
			if let Some(list) = lists.get_mut(&link.target) {
				list.push(Neighbor {
					id: link.source,
					weight,
				});
			}
			accepted.push(*link);
		}

		if skipped > 0 {
			warn!("skipped {skipped} links with missing endpoints");
		}
		if !placeholders.is_empty() {
			warn!("synthesized {} placeholder nodes", placeholders.len());
		}

		for list in lists.values_mut() {
			list.sort_by(|a, b| b.weight.total_cmp(&a.weight));
		}

		Ok(AdjacencyBuild {
			by_id,
			adjacency: AdjacencyIndex { lists },
			links: accepted,
			placeholders,
		})
	}

	/// Ranked neighbors of `id`; empty for unknown ids.
	pub fn neighbors(&self, id: NodeId) -> &[Neighbor] {
		self.lists.get(&id).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Number of neighbors, 0 for unknown ids.
	pub fn degree(&self, id: NodeId) -> usize {
		self.neighbors(id).len()
	}

	pub fn contains(&self, id: NodeId) -> bool {
		self.lists.contains_key(&id)
	}

	pub fn len(&self) -> usize {
		self.lists.len()
	}

	pub fn is_empty(&self) -> bool {
		self.lists.is_empty()
	}
}
