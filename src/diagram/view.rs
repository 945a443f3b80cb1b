// Copyright 2026 The Production Chain Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The renderable view model: node templates plus port-bound edges.
//!
//! Pure mapping over `(ProductionGraph, Layout)` — no hidden caching,
//! so re-rendering identical data is trivially stable.  Resource ports
//! sit on the left edge of a node, product ports on the right, and
//! every edge is bound to the port named for its resource on both
//! ends.

use serde::Serialize;

use crate::common::Result;
use crate::fraction::MixedNumber;
use crate::graph::{ProductionGraph, ProductionNode};
use crate::layout::{Layout, LayoutConfig};
use crate::layout_err;

/// A connection point on a node edge, in diagram coordinates.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ViewPort {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub facility_name: String,
    pub recipe_name: String,
    pub count: MixedNumber,
    /// Resource ports on the left edge, top to bottom.
    pub inputs: Vec<ViewPort>,
    /// Product ports on the right edge, top to bottom.
    pub outputs: Vec<ViewPort>,
}

impl ViewNode {
    /// Facility-count text: the integer part always, the fractional
    /// part only when the numerator is nonzero (never "3 0/1").
    pub fn count_label(&self) -> String {
        if self.count.numerator > 0 {
            format!(
                "{} {}/{}",
                self.count.integer, self.count.numerator, self.count.denominator
            )
        } else {
            format!("{}", self.count.integer)
        }
    }
}

/// An edge bound to its source output port and target input port.
/// Both ports carry the edge's resource name.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewEdge {
    pub id: String,
    pub source: String,
    pub source_port: String,
    pub target: String,
    pub target_port: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ViewModel {
    pub nodes: Vec<ViewNode>,
    pub edges: Vec<ViewEdge>,
}

/// Distribute `count` ports evenly along one node edge.
fn port_ys(top: f64, height: f64, count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| top + height * (i + 1) as f64 / (count + 1) as f64)
        .collect()
}

fn build_node(
    node: &ProductionNode,
    layout: &Layout<String>,
    config: &LayoutConfig,
) -> Result<ViewNode> {
    let Some(anchor) = layout.get(&node.id) else {
        return layout_err!(Generic, format!("no position computed for node '{}'", node.id));
    };
    let (width, height) = (config.node_width, config.node_height);

    let inputs = node
        .resource_names
        .iter()
        .zip(port_ys(anchor.y, height, node.resource_names.len()))
        .map(|(name, y)| ViewPort {
            name: name.clone(),
            x: anchor.x,
            y,
        })
        .collect();
    let outputs = node
        .product_names
        .iter()
        .zip(port_ys(anchor.y, height, node.product_names.len()))
        .map(|(name, y)| ViewPort {
            name: name.clone(),
            x: anchor.x + width,
            y,
        })
        .collect();

    Ok(ViewNode {
        id: node.id.clone(),
        x: anchor.x,
        y: anchor.y,
        width,
        height,
        facility_name: node.facility_name.clone(),
        recipe_name: node.recipe_name.clone(),
        count: node.number_facilities.mixed(),
        inputs,
        outputs,
    })
}

/// Compose graph and layout into the view model.  Assumes the graph
/// invariants already hold; a port that still cannot be resolved is an
/// internal inconsistency and surfaces as a layout error.
pub fn build_view(
    graph: &ProductionGraph,
    layout: &Layout<String>,
    config: &LayoutConfig,
) -> Result<ViewModel> {
    let nodes: Vec<ViewNode> = graph
        .nodes
        .iter()
        .map(|node| build_node(node, layout, config))
        .collect::<Result<_>>()?;

    let port_of = |node_id: &str, ports: fn(&ViewNode) -> &Vec<ViewPort>, name: &str| {
        nodes
            .iter()
            .find(|n| n.id == node_id)
            .and_then(|n| ports(n).iter().find(|p| p.name == name))
            .cloned()
    };

    let mut edges = Vec::with_capacity(graph.edges.len());
    for edge in &graph.edges {
        let source_port = port_of(&edge.source, |n| &n.outputs, &edge.resource);
        let target_port = port_of(&edge.target, |n| &n.inputs, &edge.resource);
        let (Some(source_port), Some(target_port)) = (source_port, target_port) else {
            return layout_err!(
                PortMismatch,
                format!("edge '{}' has no port named '{}'", edge.id, edge.resource)
            );
        };
        edges.push(ViewEdge {
            id: edge.id.clone(),
            source: edge.source.clone(),
            source_port: source_port.name.clone(),
            target: edge.target.clone(),
            target_port: target_port.name.clone(),
            x1: source_port.x,
            y1: source_port.y,
            x2: target_port.x,
            y2: target_port.y,
        });
    }

    Ok(ViewModel { nodes, edges })
}
