// Copyright 2026 The Production Chain Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::hash::Hash;

use crate::common::Result;
use crate::layout_err;

/// 2D position/vector used throughout the layout pipeline.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Trait bound for graph node identifiers.
pub trait NodeId: Hash + Eq + Clone + Ord + Display {}
impl<T: Hash + Eq + Clone + Ord + Display> NodeId for T {}

/// Maps nodes to positions.
pub type Layout<N> = BTreeMap<N, Position>;

/// Immutable directed graph with deterministic (ordered) adjacency.
/// Use `GraphBuilder` to construct.
#[derive(Debug)]
pub struct Graph<N: NodeId> {
    nodes: BTreeSet<N>,
    adj: BTreeMap<N, BTreeSet<N>>,
    adj_incoming: BTreeMap<N, BTreeSet<N>>,
}

impl<N: NodeId> Graph<N> {
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter()
    }

    pub fn successors(&self, node: &N) -> impl Iterator<Item = &N> {
        self.adj.get(node).into_iter().flatten()
    }

    pub fn predecessors(&self, node: &N) -> impl Iterator<Item = &N> {
        self.adj_incoming.get(node).into_iter().flatten()
    }

    pub fn has_node(&self, node: &N) -> bool {
        self.nodes.contains(node)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn has_cycle(&self) -> bool {
        let mut visited = BTreeSet::new();
        let mut rec_stack = BTreeSet::new();

        for node in &self.nodes {
            if !visited.contains(node) && self.dfs_has_cycle(node, &mut visited, &mut rec_stack) {
                return true;
            }
        }
        false
    }

    fn dfs_has_cycle(
        &self,
        node: &N,
        visited: &mut BTreeSet<N>,
        rec_stack: &mut BTreeSet<N>,
    ) -> bool {
        visited.insert(node.clone());
        rec_stack.insert(node.clone());

        for neighbor in self.successors(node) {
            if !visited.contains(neighbor) {
                if self.dfs_has_cycle(neighbor, visited, rec_stack) {
                    return true;
                }
            } else if rec_stack.contains(neighbor) {
                return true;
            }
        }

        rec_stack.remove(node);
        false
    }

    /// Longest-path rank for every node: sources get rank 0, every
    /// other node sits one past its deepest predecessor.  Fails on
    /// cyclic graphs, which have no layering.
    pub fn longest_path_ranks(&self) -> Result<BTreeMap<N, usize>> {
        if self.has_cycle() {
            return layout_err!(
                CircularDependency,
                "cannot rank a cyclic graph".to_string()
            );
        }

        let mut ranks: BTreeMap<N, usize> = BTreeMap::new();
        for node in &self.nodes {
            self.rank_of(node, &mut ranks);
        }
        Ok(ranks)
    }

    fn rank_of(&self, node: &N, ranks: &mut BTreeMap<N, usize>) -> usize {
        if let Some(&rank) = ranks.get(node) {
            return rank;
        }
        let rank = self
            .predecessors(node)
            .collect::<Vec<_>>()
            .into_iter()
            .map(|pred| self.rank_of(pred, ranks) + 1)
            .max()
            .unwrap_or(0);
        ranks.insert(node.clone(), rank);
        rank
    }
}

/// Builder for `Graph`.  `build` validates that every edge endpoint
/// was registered as a node.
pub struct GraphBuilder<N: NodeId> {
    nodes: BTreeSet<N>,
    edges: Vec<(N, N)>,
}

impl<N: NodeId> Default for GraphBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NodeId> GraphBuilder<N> {
    pub fn new() -> Self {
        Self {
            nodes: BTreeSet::new(),
            edges: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: N) {
        self.nodes.insert(node);
    }

    pub fn add_edge(&mut self, from: N, to: N) {
        self.edges.push((from, to));
    }

    pub fn build(self) -> Result<Graph<N>> {
        let mut adj: BTreeMap<N, BTreeSet<N>> = BTreeMap::new();
        let mut adj_incoming: BTreeMap<N, BTreeSet<N>> = BTreeMap::new();

        for (from, to) in &self.edges {
            for endpoint in [from, to] {
                if !self.nodes.contains(endpoint) {
                    return layout_err!(
                        DanglingEdge,
                        format!("edge '{from}' -> '{to}' references unknown node '{endpoint}'")
                    );
                }
            }
            adj.entry(from.clone()).or_default().insert(to.clone());
            adj_incoming.entry(to.clone()).or_default().insert(from.clone());
        }

        Ok(Graph {
            nodes: self.nodes,
            adj,
            adj_incoming,
        })
    }
}
