//! Plain SVG backend.

use super::{Renderer, Scene};
use crate::layout::EdgeClass;
use crate::partlab_error::PartLabError;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const COLORS: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

const TITLE_HEIGHT: f64 = 40.0;

#[derive(Debug, Clone)]
pub struct SvgRenderer {
    pub width: f64,
    pub height: f64,
    pub node_radius: f64,
    pub margin: f64,
    pub show_labels: bool,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 800.0,
            node_radius: 8.0,
            margin: 30.0,
            show_labels: true,
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl SvgRenderer {
    /// Render `scene` to an SVG document.
    pub fn to_svg(&self, scene: &Scene) -> String {
        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in scene.positions.values() {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        let span_x = (max_x - min_x).max(1e-9);
        let span_y = (max_y - min_y).max(1e-9);
        let draw_w = self.width - 2.0 * self.margin;
        let draw_h = self.height - 2.0 * self.margin - TITLE_HEIGHT;
        let project = |x: f64, y: f64| {
            (
                self.margin + (x - min_x) / span_x * draw_w,
                // svg y grows downwards
                TITLE_HEIGHT + self.margin + (max_y - y) / span_y * draw_h,
            )
        };

        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        let _ = writeln!(out, r#"<rect width="100%" height="100%" fill="white"/>"#);
        let _ = writeln!(
            out,
            r#"<text x="{}" y="28" font-family="sans-serif" font-size="20" text-anchor="middle">{}</text>"#,
            self.width / 2.0,
            escape(&scene.title)
        );

        // internal edges first so cut edges stay visible on top
        for pass in [EdgeClass::Internal, EdgeClass::Cut] {
            for (&(u, v), _) in scene.edges.iter().filter(|(_, c)| **c == pass) {
                let (Some(a), Some(b)) = (scene.positions.get(&u), scene.positions.get(&v)) else {
                    continue;
                };
                let (x1, y1) = project(a.x, a.y);
                let (x2, y2) = project(b.x, b.y);
                let (stroke, opacity) = match pass {
                    EdgeClass::Cut => ("red", 0.5),
                    EdgeClass::Internal => ("gray", 0.3),
                };
                let _ = writeln!(
                    out,
                    r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{stroke}" stroke-opacity="{opacity}"/>"#
                );
            }
        }

        for (&v, p) in &scene.positions {
            let (cx, cy) = project(p.x, p.y);
            let color = scene
                .groups
                .get(&v)
                .map_or(COLORS[0], |&g| COLORS[g % COLORS.len()]);
            let _ = writeln!(
                out,
                r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{}" fill="{color}"/>"#,
                self.node_radius
            );
            if self.show_labels {
                let _ = writeln!(
                    out,
                    r#"<text x="{cx:.2}" y="{:.2}" font-family="sans-serif" font-size="8" fill="white" text-anchor="middle">{v}</text>"#,
                    cy + 3.0
                );
            }
        }
        out.push_str("</svg>\n");
        out
    }
}

impl Renderer for SvgRenderer {
    fn render(&self, scene: &Scene, path: &Path) -> Result<(), PartLabError> {
        fs::write(path, self.to_svg(scene))?;
        log::info!("graph saved as {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::layout::{LayoutConfig, compose_layout};
    use crate::partitioning::PartitionAssignment;

    #[test]
    fn svg_contains_nodes_edges_and_title() {
        let g = Graph::from_edges(4, [(1, 2), (2, 3), (3, 4)]).unwrap();
        let a: PartitionAssignment = vec![0, 0, 1, 1].into();
        let pos = compose_layout(&g, &a, &LayoutConfig::default()).unwrap();
        let scene = Scene::build("Parts <2>", &g, &a, pos).unwrap();
        let svg = SvgRenderer::default().to_svg(&scene);
        assert_eq!(svg.matches("<circle").count(), 4);
        assert_eq!(svg.matches("<line").count(), 3);
        assert_eq!(svg.matches(r#"stroke="red""#).count(), 1);
        assert!(svg.contains("Parts &lt;2&gt;"));
    }
}
