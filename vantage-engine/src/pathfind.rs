// Shortest paths and search over the currently visible graph
//
// Paths are computed over the visible link set only: a route through a
// clustered or level-hidden node is deliberately not found, because the
// highlighted path must be drawable as-is.

use std::collections::{HashMap, HashSet, VecDeque};

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use vantage_graph::graph::RawGraph;
use vantage_graph::score::label_order;

use crate::perspective::{VisibleGraph, VisibleLink};

pub const MAX_BFS_STEPS: usize = 100_000;

/// How many top matches per term the two-term search pairs up.
pub const SEARCH_CANDIDATES: usize = 5;

/// Breadth-first shortest path between two visible nodes, treating
/// containment links as undirected. Returns the node ids from `from` to
/// `to` inclusive, or an empty vector when the endpoints are disconnected
/// in the visible graph.
pub fn shortest_path(from: &str, to: &str, links: &[VisibleLink]) -> Vec<String> {
    if from == to {
        return vec![from.to_string()];
    }

    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for link in links {
        adjacency
            .entry(link.source.as_str())
            .or_default()
            .push(link.target.as_str());
        adjacency
            .entry(link.target.as_str())
            .or_default()
            .push(link.source.as_str());
    }
    if !adjacency.contains_key(from) || !adjacency.contains_key(to) {
        return Vec::new();
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut parent: HashMap<&str, &str> = HashMap::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    visited.insert(from);
    queue.push_back(from);

    let mut steps = 0usize;
    let mut found = false;
    while let Some(current) = queue.pop_front() {
        steps += 1;
        if steps > MAX_BFS_STEPS {
            break;
        }
        if current == to {
            found = true;
            break;
        }
        if let Some(neighbors) = adjacency.get(current) {
            for &next in neighbors {
                if visited.insert(next) {
                    parent.insert(next, current);
                    queue.push_back(next);
                }
            }
        }
    }

    if !found {
        return Vec::new();
    }

    let mut path = vec![to.to_string()];
    let mut cursor = to;
    while cursor != from {
        let Some(&prev) = parent.get(cursor) else {
            return Vec::new();
        };
        path.push(prev.to_string());
        cursor = prev;
    }
    path.reverse();
    path
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchMatch {
    pub id: String,
    pub score: i64,
}

fn fuzzy_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Fuzzy-match a single term against every node's label and full label.
/// Results are ranked by match quality with the deterministic label
/// tie-break, truncated to `limit`.
pub fn search_nodes(graph: &RawGraph, query: &str, limit: usize) -> Vec<SearchMatch> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut matches: Vec<SearchMatch> = graph
        .iter_nodes()
        .filter_map(|node| {
            let label_score = fuzzy_score(&matcher, &node.label, query);
            let full_score = fuzzy_score(&matcher, node.display_path(), query);
            let best = match (label_score, full_score) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            }?;
            Some(SearchMatch {
                id: node.id.clone(),
                score: best,
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        b.score.cmp(&a.score).then_with(|| {
            match (graph.node(&a.id), graph.node(&b.id)) {
                (Some(na), Some(nb)) => label_order(na, nb),
                _ => a.id.cmp(&b.id),
            }
        })
    });
    matches.truncate(limit);
    matches
}

/// Two-term search: the shortest visible path over every pairing of the
/// top candidate matches for each term. Empty when no visible path
/// connects any pair.
pub fn two_term_path(
    graph: &RawGraph,
    visible: &VisibleGraph,
    term_a: &str,
    term_b: &str,
) -> Vec<String> {
    let visible_ids: HashSet<&str> = visible.nodes.iter().map(|n| n.id.as_str()).collect();
    let candidates = |term: &str| -> Vec<String> {
        search_nodes(graph, term, usize::MAX)
            .into_iter()
            .filter(|m| visible_ids.contains(m.id.as_str()))
            .take(SEARCH_CANDIDATES)
            .map(|m| m.id)
            .collect()
    };

    let from_candidates = candidates(term_a);
    let to_candidates = candidates(term_b);

    let mut best: Vec<String> = Vec::new();
    for from in &from_candidates {
        for to in &to_candidates {
            let path = shortest_path(from, to, &visible.links);
            if path.is_empty() {
                continue;
            }
            if best.is_empty() || path.len() < best.len() {
                best = path;
            }
        }
    }
    best
}
