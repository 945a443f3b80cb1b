// Copyright 2026 The Production Chain Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Deterministic left-to-right layered layout.
//!
//! Producers sit to the left of their consumers: rank is the longest
//! path from any source, in-rank order comes from a fixed number of
//! barycenter sweeps with node-id tie-breaking, and coordinates come
//! straight from the rank/row indices and the configured footprint.
//! There is no randomness anywhere, so identical input yields
//! identical positions.

use std::collections::BTreeMap;

use crate::common::Result;
use crate::graph::ProductionGraph;

use super::config::LayoutConfig;
use super::graph::{Graph, GraphBuilder, Layout, Position};

/// Compute a top-left anchor for every node of `graph`.
///
/// Fails (with no partial result) if an edge references a missing node
/// or the graph is cyclic.
pub fn compute_layout(graph: &ProductionGraph, config: &LayoutConfig) -> Result<Layout<String>> {
    let mut builder = GraphBuilder::new();
    for node in &graph.nodes {
        builder.add_node(node.id.clone());
    }
    for edge in &graph.edges {
        builder.add_edge(edge.source.clone(), edge.target.clone());
    }
    let layout_graph = builder.build()?;

    let layers = ordered_layers(&layout_graph, config.ordering_sweeps)?;
    Ok(assign_positions(&layers, config))
}

/// Group nodes into rank layers and run barycenter ordering sweeps.
fn ordered_layers(graph: &Graph<String>, sweeps: usize) -> Result<Vec<Vec<String>>> {
    let ranks = graph.longest_path_ranks()?;

    let layer_count = ranks.values().map(|&r| r + 1).max().unwrap_or(0);
    let mut layers: Vec<Vec<String>> = vec![Vec::new(); layer_count];
    // BTreeMap iteration seeds each layer in node-id order
    for (node, &rank) in &ranks {
        layers[rank].push(node.clone());
    }

    for sweep in 0..sweeps {
        if sweep % 2 == 0 {
            // forward: order each layer by its predecessors
            for rank in 1..layers.len() {
                let index = index_of(&layers[rank - 1]);
                reorder(&mut layers[rank], |node| {
                    barycenter(graph.predecessors(node), &index)
                });
            }
        } else {
            // backward: order each layer by its successors
            for rank in (0..layers.len().saturating_sub(1)).rev() {
                let index = index_of(&layers[rank + 1]);
                reorder(&mut layers[rank], |node| {
                    barycenter(graph.successors(node), &index)
                });
            }
        }
    }

    Ok(layers)
}

fn index_of(layer: &[String]) -> BTreeMap<String, usize> {
    layer
        .iter()
        .enumerate()
        .map(|(i, node)| (node.clone(), i))
        .collect()
}

/// Mean index of a node's neighbors in the adjacent layer, or `None`
/// when it has none there (such nodes keep their current position).
fn barycenter<'a>(
    neighbors: impl Iterator<Item = &'a String>,
    index: &BTreeMap<String, usize>,
) -> Option<f64> {
    let indices: Vec<usize> = neighbors
        .filter_map(|n| index.get(n).copied())
        .collect();
    if indices.is_empty() {
        return None;
    }
    Some(indices.iter().sum::<usize>() as f64 / indices.len() as f64)
}

fn reorder(layer: &mut Vec<String>, barycenter_of: impl Fn(&String) -> Option<f64>) {
    let mut keyed: Vec<(f64, String)> = layer
        .iter()
        .enumerate()
        .map(|(i, node)| (barycenter_of(node).unwrap_or(i as f64), node.clone()))
        .collect();
    // stable sort plus id tie-break keeps the order fully deterministic
    keyed.sort_by(|(a_key, a_id), (b_key, b_id)| {
        a_key.total_cmp(b_key).then_with(|| a_id.cmp(b_id))
    });
    *layer = keyed.into_iter().map(|(_, node)| node).collect();
}

/// Turn layer/row indices into top-left anchors.  Ranks advance along
/// x; each layer is centered vertically against the tallest layer.
/// Centers are computed first, then shifted by half the footprint to
/// match the top-left-anchored render model.
fn assign_positions(layers: &[Vec<String>], config: &LayoutConfig) -> Layout<String> {
    let row_pitch = config.node_height + config.node_spacing;
    let tallest = layers.iter().map(Vec::len).max().unwrap_or(0);
    let max_height = layer_height(tallest, config);

    let mut layout = BTreeMap::new();
    for (rank, layer) in layers.iter().enumerate() {
        let center_x = config.origin_margin
            + rank as f64 * (config.node_width + config.rank_spacing)
            + config.node_width / 2.0;
        let top = config.origin_margin + (max_height - layer_height(layer.len(), config)) / 2.0;
        for (row, node) in layer.iter().enumerate() {
            let center_y = top + row as f64 * row_pitch + config.node_height / 2.0;
            let anchor = Position::new(
                center_x - config.node_width / 2.0,
                center_y - config.node_height / 2.0,
            );
            layout.insert(node.clone(), anchor);
        }
    }
    layout
}

fn layer_height(count: usize, config: &LayoutConfig) -> f64 {
    if count == 0 {
        return 0.0;
    }
    count as f64 * config.node_height + (count - 1) as f64 * config.node_spacing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorCode;
    use crate::fraction::Fraction;
    use crate::graph::{ProductionEdge, ProductionNode};

    fn node(id: &str, products: &[&str], resources: &[&str]) -> ProductionNode {
        ProductionNode {
            id: id.to_string(),
            facility_name: id.to_string(),
            recipe_name: "r".to_string(),
            resource_names: resources.iter().map(|s| s.to_string()).collect(),
            product_names: products.iter().map(|s| s.to_string()).collect(),
            number_facilities: Fraction::ONE,
        }
    }

    fn edge(source: &str, target: &str, resource: &str) -> ProductionEdge {
        ProductionEdge {
            id: format!("{source}:{resource}"),
            source: source.to_string(),
            target: target.to_string(),
            resource: resource.to_string(),
        }
    }

    fn line_graph() -> ProductionGraph {
        // camp -> workshop -> factory, resources flowing rightward
        ProductionGraph::new(
            vec![
                node("factory", &["Plank"], &["Treated Log"]),
                node("workshop", &["Treated Log"], &["Log"]),
                node("camp", &["Log"], &[]),
            ],
            vec![
                edge("workshop", "factory", "Treated Log"),
                edge("camp", "workshop", "Log"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_line_graph_ranks_left_to_right() {
        let layout = compute_layout(&line_graph(), &LayoutConfig::default()).unwrap();
        assert_eq!(3, layout.len());
        assert!(layout["camp"].x < layout["workshop"].x);
        assert!(layout["workshop"].x < layout["factory"].x);
        // single-node layers of a line share a row
        assert!((layout["camp"].y - layout["factory"].y).abs() < f64::EPSILON);
    }

    #[test]
    fn test_anchor_is_top_left_of_center() {
        let config = LayoutConfig::default();
        let layout = compute_layout(&line_graph(), &config).unwrap();
        // the first rank's center sits half a footprint right and down
        // of its anchor, one margin in from the origin
        let anchor = layout["camp"];
        assert!((anchor.x - config.origin_margin).abs() < f64::EPSILON);
    }

    #[test]
    fn test_deterministic() {
        let graph = line_graph();
        let config = LayoutConfig::default();
        let a = compute_layout(&graph, &config).unwrap();
        let b = compute_layout(&graph, &config).unwrap();
        assert_eq!(a.len(), b.len());
        for (id, pos) in &a {
            assert_eq!(*pos, b[id], "position of '{id}' differs across runs");
        }
    }

    #[test]
    fn test_no_overlap_with_nominal_footprint() {
        // fan-in: two producers feed one consumer
        let graph = ProductionGraph::new(
            vec![
                node("assembler", &["Bot"], &["Steel", "Treated Log"]),
                node("smelter", &["Steel"], &[]),
                node("workshop", &["Treated Log"], &[]),
            ],
            vec![
                edge("smelter", "assembler", "Steel"),
                edge("workshop", "assembler", "Treated Log"),
            ],
        )
        .unwrap();
        let config = LayoutConfig::default();
        let layout = compute_layout(&graph, &config).unwrap();

        let ids: Vec<_> = layout.keys().collect();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                let pa = layout[*a];
                let pb = layout[*b];
                let overlap_x = (pa.x - pb.x).abs() < config.node_width;
                let overlap_y = (pa.y - pb.y).abs() < config.node_height;
                assert!(
                    !(overlap_x && overlap_y),
                    "nodes '{a}' and '{b}' overlap: {pa:?} vs {pb:?}"
                );
            }
        }
    }

    #[test]
    fn test_cycle_is_a_layout_error() {
        let graph = ProductionGraph::new(
            vec![node("a", &["X"], &["Y"]), node("b", &["Y"], &["X"])],
            vec![edge("a", "b", "X"), edge("b", "a", "Y")],
        )
        .unwrap();
        let err = compute_layout(&graph, &LayoutConfig::default()).unwrap_err();
        assert_eq!(ErrorCode::CircularDependency, err.code);
    }

    #[test]
    fn test_missing_node_is_a_layout_error() {
        // bypass ProductionGraph::new to simulate a corrupt upstream set
        let graph = ProductionGraph {
            nodes: vec![node("a", &["X"], &[])],
            edges: vec![edge("a", "ghost", "X")],
        };
        let err = compute_layout(&graph, &LayoutConfig::default()).unwrap_err();
        assert_eq!(ErrorCode::DanglingEdge, err.code);
    }

    #[test]
    fn test_empty_graph_yields_empty_layout() {
        let graph = ProductionGraph::new(vec![], vec![]).unwrap();
        let layout = compute_layout(&graph, &LayoutConfig::default()).unwrap();
        assert!(layout.is_empty());
    }
}
