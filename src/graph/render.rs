//! SVG drawing of a laid out [KnowledgeGraph].

use std::fmt::Write;
use crate::graph::KnowledgeGraph;
use crate::graph::layout::Point;

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub width: f64,
    pub height: f64,
    /// Fraction of the canvas kept free on each side
    pub margin: f64,
    pub node_radius: f64,
    pub node_color: String,
    pub edge_color: String,
    /// Bend of the edges, 0 draws straight arrows
    pub curvature: f64,
    pub font_size: f64,
    pub title: String,
    pub title_font_size: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 2000.0,
            height: 1600.0,
            margin: 0.1,
            node_radius: 31.0,
            node_color: "skyblue".to_string(),
            edge_color: "gray".to_string(),
            curvature: 0.0,
            font_size: 20.0,
            title: "Knowledge Graph".to_string(),
            title_font_size: 32.0,
        }
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Maps layout coordinates onto the canvas, below the title. The y axis points up in the layout and down in SVG.
struct Canvas {
    left: f64,
    top: f64,
    inner_width: f64,
    inner_height: f64,
}

impl Canvas {
    fn new(config: &RenderConfig) -> Self {
        let title_band = config.title_font_size * 2.0;
        let margin_x = config.width * config.margin;
        let margin_y = (config.height - title_band) * config.margin;
        Self {
            left: margin_x,
            top: title_band + margin_y,
            inner_width: config.width - 2.0 * margin_x,
            inner_height: config.height - title_band - 2.0 * margin_y,
        }
    }

    fn project(&self, (x, y): Point) -> Point {
        (
            self.left + (x + 1.0) / 2.0 * self.inner_width,
            self.top + (1.0 - y) / 2.0 * self.inner_height,
        )
    }
}

/// Draws `graph` at `positions` (indexed like [KnowledgeGraph::nodes]) into a standalone SVG document.
///
/// Edges go under nodes, node and edge labels on top. Edge labels sit at the midpoint of their edge on a white
/// background.
pub fn render_svg(graph: &KnowledgeGraph, positions: &[Point], config: &RenderConfig) -> Result<String, std::fmt::Error> {
    let canvas = Canvas::new(config);
    let points: Vec<Point> = positions.iter().map(|&p| canvas.project(p)).collect();
    let mut svg = String::new();
    write_svg(&mut svg, graph, &points, config)?;
    Ok(svg)
}

fn write_svg(svg: &mut String, graph: &KnowledgeGraph, points: &[Point], config: &RenderConfig) -> std::fmt::Result {
    writeln!(svg, r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
             w = config.width, h = config.height)?;
    writeln!(svg, r#"<defs><marker id="arrow" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="8" markerHeight="8" orient="auto-start-reverse"><path d="M 0 0 L 10 5 L 0 10 z" fill="{}" fill-opacity="0.7"/></marker></defs>"#,
             config.edge_color)?;
    writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
    writeln!(svg, r#"<text x="{}" y="{}" font-size="{}" font-family="sans-serif" text-anchor="middle">{}</text>"#,
             config.width / 2.0, config.title_font_size * 1.4, config.title_font_size, escape(&config.title))?;

    let mut edge_labels = Vec::with_capacity(graph.edge_count());
    writeln!(svg, r#"<g class="edges" stroke="{}" stroke-opacity="0.7" stroke-width="1.5" fill="none">"#, config.edge_color)?;
    for edge in graph.edges() {
        let (Some(&from), Some(&to)) = (points.get(edge.source), points.get(edge.target)) else {
            continue;
        };
        let label_at = if edge.source == edge.target {
            write_self_loop(svg, from, config.node_radius)?
        } else {
            write_edge(svg, from, to, config.node_radius, config.curvature)?
        };
        edge_labels.push((label_at, edge.label.as_str()));
    }
    writeln!(svg, "</g>")?;

    writeln!(svg, r#"<g class="nodes" fill="{}" fill-opacity="0.8" stroke="black" stroke-width="2">"#, config.node_color)?;
    for &(x, y) in points {
        writeln!(svg, r#"<circle cx="{:.2}" cy="{:.2}" r="{}"/>"#, x, y, config.node_radius)?;
    }
    writeln!(svg, "</g>")?;

    writeln!(svg, r#"<g class="node-labels" font-size="{}" font-family="sans-serif" font-weight="bold" text-anchor="middle" dominant-baseline="central">"#,
             config.font_size)?;
    for (name, &(x, y)) in graph.nodes().iter().zip(points) {
        writeln!(svg, r#"<text x="{:.2}" y="{:.2}">{}</text>"#, x, y, escape(name))?;
    }
    writeln!(svg, "</g>")?;

    writeln!(svg, r#"<g class="edge-labels" font-size="{}" font-family="sans-serif" text-anchor="middle" dominant-baseline="central">"#,
             config.font_size)?;
    for ((x, y), label) in edge_labels {
        if label.is_empty() {
            continue;
        }
        // no text metrics here, so the box width is estimated from the character count
        let box_width = 0.6 * config.font_size * label.chars().count() as f64 + 0.6 * config.font_size;
        let box_height = 1.6 * config.font_size;
        writeln!(svg, r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="{:.2}" fill="white" fill-opacity="0.8"/>"#,
                 x - box_width / 2.0, y - box_height / 2.0, box_width, box_height, 0.3 * config.font_size)?;
        writeln!(svg, r#"<text x="{:.2}" y="{:.2}" stroke="white" stroke-width="4" paint-order="stroke">{}</text>"#,
                 x, y, escape(label))?;
    }
    writeln!(svg, "</g>")?;
    writeln!(svg, "</svg>")
}

/// Draws an arrow from the rim of `from` to the rim of `to` and returns where its label goes.
fn write_edge(svg: &mut String, from: Point, to: Point, radius: f64, curvature: f64) -> Result<Point, std::fmt::Error> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let (mid_x, mid_y) = ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);
    let control = (mid_x + curvature * dy, mid_y - curvature * dx);

    // leave the arrow at the node rims, along the tangent at each end
    let trim = |anchor: Point, toward: Point| -> Point {
        let (tx, ty) = (toward.0 - anchor.0, toward.1 - anchor.1);
        let length = tx.hypot(ty);
        if length <= radius {
            anchor
        } else {
            (anchor.0 + tx / length * radius, anchor.1 + ty / length * radius)
        }
    };
    let start = trim(from, control);
    let end = trim(to, control);

    if curvature == 0.0 {
        writeln!(svg, r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" marker-end="url(#arrow)"/>"#,
                 start.0, start.1, end.0, end.1)?;
    } else {
        writeln!(svg, r#"<path d="M {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2}" marker-end="url(#arrow)"/>"#,
                 start.0, start.1, control.0, control.1, end.0, end.1)?;
    }
    // midpoint of the quadratic curve through the control point
    Ok((0.25 * from.0 + 0.5 * control.0 + 0.25 * to.0, 0.25 * from.1 + 0.5 * control.1 + 0.25 * to.1))
}

/// Draws a loop above the node and returns where its label goes.
fn write_self_loop(svg: &mut String, at: Point, radius: f64) -> Result<Point, std::fmt::Error> {
    let (x, y) = at;
    writeln!(svg, r#"<path d="M {:.2} {:.2} C {:.2} {:.2} {:.2} {:.2} {:.2} {:.2}" marker-end="url(#arrow)"/>"#,
             x - radius * 0.5, y - radius * 0.87,
             x - radius * 1.5, y - radius * 3.0,
             x + radius * 1.5, y - radius * 3.0,
             x + radius * 0.5, y - radius * 0.87)?;
    Ok((x, y - radius * 2.6))
}

#[cfg(test)]
mod test_render {
    use super::{escape, render_svg, RenderConfig};
    use crate::graph::{KnowledgeGraph, KnowledgeTriple, LayoutConfig};

    #[test]
    fn test_escape() {
        assert_eq!("R&amp;D &lt;up&gt; &quot;10%&quot;", escape("R&D <up> \"10%\""));
    }

    #[test]
    fn test_draw() {
        let graph = KnowledgeGraph::from_triples(&[
            KnowledgeTriple::new("Acme", "reported", "record sales"),
            KnowledgeTriple::new("Acme", "spends on", "R&D"),
        ]);
        let svg = graph.draw(&LayoutConfig::default(), &RenderConfig::default()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(3, svg.matches("<circle").count());
        assert_eq!(2, svg.matches("<line").count());
        assert!(svg.contains(">Knowledge Graph</text>"));
        assert!(svg.contains(">reported</text>"));
        assert!(svg.contains(">R&amp;D</text>"));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_curved_and_self_loop() {
        let graph = KnowledgeGraph::from_triples(&[
            KnowledgeTriple::new("a", "to", "b"),
            KnowledgeTriple::new("b", "refers to", "b"),
        ]);
        let config = RenderConfig { curvature: 0.2, ..RenderConfig::default() };
        let svg = graph.draw(&LayoutConfig::default(), &config).unwrap();
        assert_eq!(0, svg.matches("<line").count());
        assert!(svg.contains(" Q "));
        assert!(svg.contains(" C "));
        assert!(svg.contains(">refers to</text>"));
    }

    #[test]
    fn test_empty_graph_renders() {
        let graph = KnowledgeGraph::from_triples(&Vec::<KnowledgeTriple>::new());
        let svg = graph.draw(&LayoutConfig::default(), &RenderConfig::default()).unwrap();
        assert_eq!(0, svg.matches("<circle").count());
        assert!(svg.contains(">Knowledge Graph</text>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_label_on_straight_edge_midpoint() {
        let graph = KnowledgeGraph::from_triples(&[KnowledgeTriple::new("a", "to", "b")]);
        let svg = render_svg(&graph, &[(-1.0, 0.0), (1.0, 0.0)], &RenderConfig::default()).unwrap();
        let config = RenderConfig::default();
        assert!(svg.contains(&format!(r#"<text x="{:.2}""#, config.width / 2.0)));
    }
}
