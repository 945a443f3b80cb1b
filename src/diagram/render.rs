// Copyright 2026 The Production Chain Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! SVG rendering of the view model.
//!
//! Purely presentational: everything geometric was decided by the
//! layout pass and `build_view`; this module only writes markup.

use super::view::{ViewEdge, ViewModel, ViewNode};

const VIEW_BOX_MARGIN: f64 = 20.0;

const RENDER_STYLES: &str = r#"
.pc-node rect {
  stroke-width: 1px;
  stroke: #000000;
  fill: #ffffff;
}

.pc-node text {
  fill: #000000;
  font-size: 12px;
  font-family: "Roboto", "Open Sans", "Arial", sans-serif;
  white-space: nowrap;
}

.pc-node .pc-count {
  font-size: 16px;
  text-anchor: end;
}

.pc-port circle {
  stroke-width: 1px;
  stroke: #000000;
  fill: #ffffff;
}

.pc-port text {
  font-size: 9px;
}

.pc-edge {
  stroke-width: 1.5px;
  stroke: gray;
  fill: none;
}
"#;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

fn calc_view_box(view: &ViewModel) -> Rect {
    if view.nodes.is_empty() {
        return Rect {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        };
    }
    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for node in &view.nodes {
        min_x = min_x.min(node.x);
        min_y = min_y.min(node.y);
        max_x = max_x.max(node.x + node.width);
        max_y = max_y.max(node.y + node.height);
    }
    Rect {
        x: min_x - VIEW_BOX_MARGIN,
        y: min_y - VIEW_BOX_MARGIN,
        width: max_x - min_x + 2.0 * VIEW_BOX_MARGIN,
        height: max_y - min_y + 2.0 * VIEW_BOX_MARGIN,
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render_node(node: &ViewNode, out: &mut String) {
    out.push_str(&format!(
        r#"  <g class="pc-node">
    <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="2"/>
    <text x="{:.1}" y="{:.1}">{}</text>
    <text x="{:.1}" y="{:.1}">{}</text>
    <text class="pc-count" x="{:.1}" y="{:.1}">{}</text>
"#,
        node.x,
        node.y,
        node.width,
        node.height,
        node.x + 8.0,
        node.y + 16.0,
        xml_escape(&node.facility_name),
        node.x + 8.0,
        node.y + 32.0,
        xml_escape(&node.recipe_name),
        node.x + node.width - 8.0,
        node.y + 20.0,
        xml_escape(&node.count_label()),
    ));

    for port in &node.inputs {
        out.push_str(&format!(
            r#"    <g class="pc-port"><circle cx="{:.1}" cy="{:.1}" r="3"/><text x="{:.1}" y="{:.1}">{}</text></g>
"#,
            port.x,
            port.y,
            port.x + 6.0,
            port.y + 3.0,
            xml_escape(&port.name),
        ));
    }
    for port in &node.outputs {
        out.push_str(&format!(
            r#"    <g class="pc-port"><circle cx="{:.1}" cy="{:.1}" r="3"/><text x="{:.1}" y="{:.1}" text-anchor="end">{}</text></g>
"#,
            port.x,
            port.y,
            port.x - 6.0,
            port.y + 3.0,
            xml_escape(&port.name),
        ));
    }
    out.push_str("  </g>\n");
}

fn render_edge(edge: &ViewEdge, out: &mut String) {
    // horizontal-tangent bezier between the two ports
    let dx = (edge.x2 - edge.x1) / 2.0;
    out.push_str(&format!(
        r#"  <path class="pc-edge" d="M {:.1} {:.1} C {:.1} {:.1}, {:.1} {:.1}, {:.1} {:.1}"/>
"#,
        edge.x1,
        edge.y1,
        edge.x1 + dx,
        edge.y1,
        edge.x2 - dx,
        edge.y2,
        edge.x2,
        edge.y2,
    ));
}

pub fn render_svg(view: &ViewModel) -> String {
    let view_box = calc_view_box(view);
    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{:.1} {:.1} {:.1} {:.1}">
<style>{}</style>
"#,
        view_box.x, view_box.y, view_box.width, view_box.height, RENDER_STYLES,
    );
    for edge in &view.edges {
        render_edge(edge, &mut out);
    }
    for node in &view.nodes {
        render_node(node, &mut out);
    }
    out.push_str("</svg>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::compute_chain_for_product;
    use crate::diagram::view::build_view;
    use crate::fraction::Fraction;
    use crate::gamedata::{EMBEDDED_GAME_DATA, GameData};
    use crate::graph::ProductionGraph;
    use crate::layout::{LayoutConfig, compute_layout};

    fn plank_view() -> ViewModel {
        let data = GameData::from_yaml(EMBEDDED_GAME_DATA).unwrap();
        let faction = data.faction("IronTeeth").unwrap();
        let chain = compute_chain_for_product(faction, "Plank", Fraction::ONE).unwrap();
        let graph = ProductionGraph::from_chain(&chain).unwrap();
        let config = LayoutConfig::default();
        let layout = compute_layout(&graph, &config).unwrap();
        build_view(&graph, &layout, &config).unwrap()
    }

    #[test]
    fn test_render_svg() {
        let view = plank_view();
        let svg = render_svg(&view);
        assert!(svg.starts_with("<svg "));
        assert!(svg.ends_with("</svg>\n"));
        assert_eq!(3, svg.matches("class=\"pc-node\"").count());
        assert_eq!(2, svg.matches("class=\"pc-edge\"").count());
        assert!(svg.contains("Plank Factory"));
        assert!(svg.contains("Press Planks"));
    }

    #[test]
    fn test_empty_view_still_renders() {
        let view = ViewModel {
            nodes: vec![],
            edges: vec![],
        };
        let svg = render_svg(&view);
        assert!(svg.contains("viewBox=\"0.0 0.0 0.0 0.0\""));
    }

    #[test]
    fn test_escapes_markup_in_names() {
        let mut view = plank_view();
        view.nodes[0].facility_name = "Saw <&> Mill".to_string();
        let svg = render_svg(&view);
        assert!(svg.contains("Saw &lt;&amp;&gt; Mill"));
        assert!(!svg.contains("Saw <&> Mill"));
    }
}
