// Copyright 2026 The Production Chain Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Flattened node/edge form of a production chain, the shape that
//! crosses the serialization boundary and feeds the layout pass.
//!
//! Node identifiers are path-derived: the root is `/<facility>`, and a
//! producer feeding resource R into node N is `<N.id>/R/<facility>`.
//! The same facility can therefore appear as several nodes, one per
//! place it is needed in the tree.

use std::collections::BTreeSet;

use serde::{Serialize, Serializer};

use crate::chain::ProductionChain;
use crate::common::Result;
use crate::fraction::Fraction;
use crate::layout_err;

fn serialize_mixed<S: Serializer>(
    fraction: &Fraction,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    fraction.mixed().serialize(serializer)
}

/// One facility instance in the production graph.  Resource ports are
/// the recipe's requirements (raw resources included); product ports
/// are the recipe's outputs.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionNode {
    pub id: String,
    pub facility_name: String,
    pub recipe_name: String,
    pub resource_names: Vec<String>,
    pub product_names: Vec<String>,
    #[serde(serialize_with = "serialize_mixed")]
    pub number_facilities: Fraction,
}

/// A producer-to-consumer connection.  `resource` must name a product
/// port on the source and a resource port on the target.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductionEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub resource: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductionGraph {
    pub nodes: Vec<ProductionNode>,
    pub edges: Vec<ProductionEdge>,
}

impl ProductionGraph {
    /// Build a graph, enforcing the structural contract: unique node
    /// ids, edge endpoints present, and every edge's resource matching
    /// a product port on its source and a resource port on its target.
    /// Violations are upstream bugs and are surfaced, never dropped.
    pub fn new(nodes: Vec<ProductionNode>, edges: Vec<ProductionEdge>) -> Result<ProductionGraph> {
        let mut ids = BTreeSet::new();
        for node in &nodes {
            if !ids.insert(node.id.as_str()) {
                return layout_err!(DuplicateNode, format!("duplicate node id '{}'", node.id));
            }
        }

        for edge in &edges {
            let source = nodes.iter().find(|n| n.id == edge.source);
            let target = nodes.iter().find(|n| n.id == edge.target);
            let (Some(source), Some(target)) = (source, target) else {
                let missing = if source.is_none() {
                    &edge.source
                } else {
                    &edge.target
                };
                return layout_err!(
                    DanglingEdge,
                    format!("edge '{}' references unknown node '{missing}'", edge.id)
                );
            };
            if !source.product_names.iter().any(|p| *p == edge.resource) {
                return layout_err!(
                    PortMismatch,
                    format!(
                        "edge '{}': '{}' is not a product port of '{}'",
                        edge.id, edge.resource, source.id
                    )
                );
            }
            if !target.resource_names.iter().any(|r| *r == edge.resource) {
                return layout_err!(
                    PortMismatch,
                    format!(
                        "edge '{}': '{}' is not a resource port of '{}'",
                        edge.id, edge.resource, target.id
                    )
                );
            }
        }

        Ok(ProductionGraph { nodes, edges })
    }

    /// Flatten a chain tree into nodes plus producer->consumer edges.
    pub fn from_chain(chain: &ProductionChain) -> Result<ProductionGraph> {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        flatten(chain, "", &mut nodes, &mut edges);
        ProductionGraph::new(nodes, edges)
    }

    pub fn node(&self, id: &str) -> Option<&ProductionNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

fn flatten(
    chain: &ProductionChain,
    path: &str,
    nodes: &mut Vec<ProductionNode>,
    edges: &mut Vec<ProductionEdge>,
) {
    let node_id = format!("{path}/{}", chain.facility_name);
    nodes.push(ProductionNode {
        id: node_id.clone(),
        facility_name: chain.facility_name.clone(),
        recipe_name: chain.recipe.name.clone(),
        resource_names: chain.recipe.requirements.keys().cloned().collect(),
        product_names: chain.recipe.products.keys().cloned().collect(),
        number_facilities: chain.number_facilities,
    });

    for (resource, child) in &chain.inputs {
        let child_path = format!("{node_id}/{resource}");
        let child_id = format!("{child_path}/{}", child.facility_name);
        edges.push(ProductionEdge {
            id: format!("{child_id}:{resource}"),
            source: child_id,
            target: node_id.clone(),
            resource: resource.clone(),
        });
        flatten(child, &child_path, nodes, edges);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::compute_chain_for_product;
    use crate::common::ErrorCode;
    use crate::gamedata::{EMBEDDED_GAME_DATA, GameData};

    fn plank_graph() -> ProductionGraph {
        let data = GameData::from_yaml(EMBEDDED_GAME_DATA).unwrap();
        let faction = data.faction("IronTeeth").unwrap();
        let chain = compute_chain_for_product(faction, "Plank", Fraction::ONE).unwrap();
        ProductionGraph::from_chain(&chain).unwrap()
    }

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

    #[test]
    fn test_plank_graph_shape() {
        let graph = plank_graph();
        assert_eq!(3, graph.nodes.len());
        assert_eq!(2, graph.edges.len());

        let root = graph.node("/Plank Factory").unwrap();
        assert_eq!("Press Planks", root.recipe_name);
        assert_eq!(vec!["Treated Log"], root.resource_names);
        assert_eq!(vec!["Plank"], root.product_names);

        // edges point producer -> consumer
        let edge = graph
            .edges
            .iter()
            .find(|e| e.resource == "Treated Log")
            .unwrap();
        assert_eq!("/Plank Factory/Treated Log/Wood Workshop", edge.source);
        assert_eq!("/Plank Factory", edge.target);
    }

    #[test]
    fn test_port_closure_invariant() {
        let graph = plank_graph();
        for edge in &graph.edges {
            let source = graph.node(&edge.source).unwrap();
            let target = graph.node(&edge.target).unwrap();
            assert!(
                source.product_names.contains(&edge.resource),
                "edge '{}' resource missing from source products",
                edge.id
            );
            assert!(
                target.resource_names.contains(&edge.resource),
                "edge '{}' resource missing from target resources",
                edge.id
            );
        }
    }

    #[test]
    fn test_repeated_facility_gets_distinct_ids() {
        let data = GameData::from_yaml(EMBEDDED_GAME_DATA).unwrap();
        let faction = data.faction("IronTeeth").unwrap();
        let chain = compute_chain_for_product(faction, "Bot", Fraction::ONE).unwrap();
        let graph = ProductionGraph::from_chain(&chain).unwrap();

        let camps: Vec<_> = graph
            .nodes
            .iter()
            .filter(|n| n.facility_name == "Logging Camp")
            .collect();
        assert_eq!(2, camps.len());
        assert_ne!(camps[0].id, camps[1].id);
    }

    #[test]
    fn test_rejects_dangling_edge() {
        let nodes = vec![node("a", &["X"], &[])];
        let edges = vec![edge("a", "missing", "X")];
        let err = ProductionGraph::new(nodes, edges).unwrap_err();
        assert_eq!(ErrorCode::DanglingEdge, err.code);
    }

    #[test]
    fn test_rejects_port_mismatch() {
        // resource not a product port of the source
        let nodes = vec![node("a", &["X"], &[]), node("b", &[], &["Y"])];
        let edges = vec![edge("a", "b", "Y")];
        let err = ProductionGraph::new(nodes, edges).unwrap_err();
        assert_eq!(ErrorCode::PortMismatch, err.code);

        // resource not a resource port of the target
        let nodes = vec![node("a", &["X"], &[]), node("b", &[], &["Y"])];
        let edges = vec![edge("a", "b", "X")];
        let err = ProductionGraph::new(nodes, edges).unwrap_err();
        assert_eq!(ErrorCode::PortMismatch, err.code);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let nodes = vec![node("a", &["X"], &[]), node("a", &["X"], &[])];
        let err = ProductionGraph::new(nodes, vec![]).unwrap_err();
        assert_eq!(ErrorCode::DuplicateNode, err.code);
    }

    #[test]
    fn test_wire_serialization() {
        let graph = plank_graph();
        let json = serde_json::to_value(&graph).unwrap();
        assert!(json["nodes"].is_array());
        assert!(json["edges"].is_array());

        let root = &json["nodes"][0];
        assert_eq!("/Plank Factory", root["id"]);
        assert_eq!("Plank Factory", root["facilityName"]);
        assert_eq!("Press Planks", root["recipeName"]);
        assert_eq!(1, root["numberFacilities"]["integer"]);
        assert_eq!(0, root["numberFacilities"]["numerator"]);
    }
}
