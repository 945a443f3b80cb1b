// Copyright 2026 The Production Chain Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Legacy DOT-language serialization of a production chain.
//!
//! Kept for the old graphviz render path; the structured node/edge
//! graph is the authoritative interface.  Facilities are rectangles,
//! resources are dashed junction nodes between producer and consumer.

use crate::chain::ProductionChain;

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn node_label(chain: &ProductionChain) -> String {
    format!(
        "<{}<BR/><FONT POINT-SIZE=\"10\">Recipe: {}<BR/>Count: {:.2}<BR/></FONT>>",
        chain.facility_name,
        chain.recipe.name,
        chain.number_facilities.as_f64(),
    )
}

pub fn render_dot(chain: &ProductionChain) -> String {
    let mut out = String::from("digraph {\n");
    out.push_str("  node [shape=rectangle]\n");
    render_subgraph(chain, None, &mut out);
    out.push_str("}\n");
    out
}

fn render_subgraph(chain: &ProductionChain, parent_id: Option<&str>, out: &mut String) {
    let node_id = match parent_id {
        Some(parent) => format!("{parent}<-{}({})", chain.facility_name, chain.recipe.name),
        None => format!("{}({})", chain.facility_name, chain.recipe.name),
    };

    out.push_str(&format!(
        "  \"{}\" [label={}]\n",
        escape(&node_id),
        node_label(chain)
    ));
    if let Some(parent) = parent_id {
        out.push_str(&format!(
            "  \"{}\" -> \"{}\"\n",
            escape(&node_id),
            escape(parent)
        ));
    }

    for (resource, child) in &chain.inputs {
        let resource_id = format!("{node_id}[{resource}]");
        out.push_str(&format!(
            "  \"{}\" [label=\"{}\" style=dashed]\n",
            escape(&resource_id),
            escape(resource)
        ));
        out.push_str(&format!(
            "  \"{}\" -> \"{}\"\n",
            escape(&resource_id),
            escape(&node_id)
        ));
        render_subgraph(child, Some(&resource_id), out);
    }
}
