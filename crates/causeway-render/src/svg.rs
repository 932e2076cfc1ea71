//! Headless SVG writer for a projected [`CanvasScene`].
//!
//! Colors and stroke metrics reproduce the original canvas: neutral links in
//! `#d1d5db` with the selection highlight in `#fcd34d`, dashed slate guide
//! lines, and per-color arrowhead markers.

use std::fmt::Write as _;

use crate::model::{CanvasScene, SceneNodeKind};

const LINK_COLOR: &str = "#d1d5db";
const LINK_HIGHLIGHT_COLOR: &str = "#fcd34d";
const GUIDE_COLOR: &str = "#94a3b8";
const AXIS_COLOR: &str = "#3b82f6";
const AXIS_USED_COLOR: &str = "#facc15";
const AXIS_LABEL_COLOR: &str = "#93c5fd";
const AXIS_LABEL_USED_COLOR: &str = "#fde047";
const SELECTION_RING_COLOR: &str = "#eab308";

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Fill painted behind the scene; `None` leaves the canvas transparent.
    pub background: Option<String>,
    /// When false, the year axis and its labels are omitted.
    pub include_axis: bool,
    /// When false, the dotted year guides are omitted.
    pub include_guides: bool,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            background: Some("#111827".to_string()),
            include_axis: true,
            include_guides: true,
        }
    }
}

fn escape_xml_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_xml_into(&mut out, text);
    out
}

/// JS-compatible shortest float formatting; whole numbers print without a
/// trailing `.0`.
fn fmt_num(v: f64, buf: &mut ryu_js::Buffer) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let v = if v == -0.0 { 0.0 } else { v };
    buf.format_finite(v).to_string()
}

/// Renders the scene as a standalone SVG document.
pub fn render_svg(scene: &CanvasScene, options: &SvgRenderOptions) -> String {
    let mut out = String::with_capacity(4096);
    let mut buf = ryu_js::Buffer::new();
    let w = fmt_num(scene.width, &mut buf);
    let h = fmt_num(scene.height, &mut buf);

    let _ = write!(
        &mut out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="ui-sans-serif, system-ui, sans-serif">"#
    );

    out.push_str(r#"<defs>"#);
    for color in [LINK_COLOR, LINK_HIGHLIGHT_COLOR] {
        let id = color.trim_start_matches('#');
        let _ = write!(
            &mut out,
            r#"<marker id="arrowhead-{id}" viewBox="0 0 10 10" refX="8" refY="5" markerWidth="6" markerHeight="6" orient="auto-start-reverse" fill="{color}"><path d="M 0 0 L 10 5 L 0 10 z"/></marker>"#
        );
    }
    out.push_str(r#"</defs>"#);

    if let Some(background) = &options.background {
        let _ = write!(
            &mut out,
            r#"<rect x="0" y="0" width="{w}" height="{h}" fill="{}"/>"#,
            escape_attr(background)
        );
    }

    if options.include_axis {
        render_axis(&mut out, scene, &mut buf);
    }

    if options.include_guides {
        for guide in &scene.guides {
            let x1 = fmt_num(guide.x1, &mut buf);
            let y1 = fmt_num(guide.y1, &mut buf);
            let x2 = fmt_num(guide.x2, &mut buf);
            let y2 = fmt_num(guide.y2, &mut buf);
            let _ = write!(
                &mut out,
                r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{GUIDE_COLOR}" stroke-width="2" stroke-dasharray="5,5" data-node-id="{}"/>"#,
                escape_attr(&guide.node_id)
            );
        }
    }

    for link in &scene.links {
        let color = if link.highlighted {
            LINK_HIGHLIGHT_COLOR
        } else {
            LINK_COLOR
        };
        let marker = color.trim_start_matches('#');
        let x1 = fmt_num(link.x1, &mut buf);
        let y1 = fmt_num(link.y1, &mut buf);
        let x2 = fmt_num(link.x2, &mut buf);
        let y2 = fmt_num(link.y2, &mut buf);
        let _ = write!(
            &mut out,
            r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{color}" stroke-width="3" marker-end="url(#arrowhead-{marker})" data-link-id="{}"/>"#,
            escape_attr(&link.id)
        );
    }

    for node in &scene.nodes {
        render_node(&mut out, node, &mut buf);
    }

    out.push_str("</svg>");
    out
}

fn render_axis(out: &mut String, scene: &CanvasScene, buf: &mut ryu_js::Buffer) {
    let Some(first) = scene.axis.first() else {
        return;
    };
    let last = scene.axis.last().unwrap_or(first);
    let axis_x = fmt_num(scene.axis_x, buf);
    let top = fmt_num(first.y, buf);
    let bottom = fmt_num(last.y, buf);
    let _ = write!(
        out,
        r#"<line x1="{axis_x}" y1="{top}" x2="{axis_x}" y2="{bottom}" stroke="{AXIS_COLOR}" stroke-width="4" stroke-linecap="round"/>"#
    );

    for tick in &scene.axis {
        let ridge_color = if tick.used { AXIS_USED_COLOR } else { AXIS_COLOR };
        let label_color = if tick.used {
            AXIS_LABEL_USED_COLOR
        } else {
            AXIS_LABEL_COLOR
        };
        let rx = fmt_num(scene.axis_x - 12.0, buf);
        let ry = fmt_num(tick.y - 2.0, buf);
        let _ = write!(
            out,
            r#"<rect x="{rx}" y="{ry}" width="24" height="4" rx="2" fill="{ridge_color}"/>"#
        );
        let lx = fmt_num(scene.axis_x - 20.0, buf);
        let ly = fmt_num(tick.y + 6.0, buf);
        let _ = write!(
            out,
            r#"<text x="{lx}" y="{ly}" text-anchor="end" font-family="ui-monospace, monospace" font-size="18" font-weight="bold" fill="{label_color}">{}</text>"#,
            tick.year
        );
    }
}

fn render_node(out: &mut String, node: &crate::model::SceneNode, buf: &mut ryu_js::Buffer) {
    let x = fmt_num(node.x, buf);
    let y = fmt_num(node.y, buf);
    let w = fmt_num(node.width, buf);
    let h = fmt_num(node.height, buf);

    let (fill, stroke, stroke_width) = match node.kind {
        SceneNodeKind::Outcome => ("#b91c1c", "#ef4444", "4"),
        SceneNodeKind::Cause => ("#1f2937", "#4b5563", "2"),
    };

    if node.selected {
        let ring_x = fmt_num(node.x - 4.0, buf);
        let ring_y = fmt_num(node.y - 4.0, buf);
        let ring_w = fmt_num(node.width + 8.0, buf);
        let ring_h = fmt_num(node.height + 8.0, buf);
        let _ = write!(
            out,
            r#"<rect x="{ring_x}" y="{ring_y}" width="{ring_w}" height="{ring_h}" rx="16" fill="none" stroke="{SELECTION_RING_COLOR}" stroke-width="4"/>"#
        );
    }

    let _ = write!(
        out,
        r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" rx="12" fill="{fill}" stroke="{stroke}" stroke-width="{stroke_width}" data-node-id="{}"/>"#,
        escape_attr(&node.id)
    );

    let label_x = fmt_num(node.x + node.width / 2.0, buf);
    let label_y = fmt_num(node.y + node.height / 2.0 - 4.0, buf);
    let _ = write!(
        out,
        r##"<text x="{label_x}" y="{label_y}" text-anchor="middle" font-size="15" font-weight="600" fill="#ffffff">"##
    );
    escape_xml_into(out, &node.label);
    out.push_str("</text>");

    if let Some(year) = node.year {
        let year_y = fmt_num(node.y + node.height / 2.0 + 16.0, buf);
        let _ = write!(
            out,
            r##"<text x="{label_x}" y="{year_y}" text-anchor="middle" font-size="12" fill="#9ca3af">Year: {year}</text>"##
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::project;
    use causeway_core::case::builtin_cases;
    use causeway_core::config::CanvasConfig;
    use causeway_core::map::{MindMapState, OUTCOME_ID};
    use causeway_core::timeline::TimelineRange;

    fn scene_with_selection() -> (CanvasScene, String) {
        let case = builtin_cases().remove(0);
        let mut state = MindMapState::new_for_case(
            CanvasConfig::default(),
            TimelineRange::default(),
            &case,
        );
        let id = state
            .add_cause_node("Severe drought & <bad> harvest (1987)", None)
            .unwrap()
            .id
            .clone();
        state.link_nodes(&id, OUTCOME_ID);
        (project(&state, Some(&id)), id)
    }

    #[test]
    fn document_shape_and_markers() {
        let (scene, _) = scene_with_selection();
        let svg = render_svg(&scene, &SvgRenderOptions::default());
        assert!(svg.starts_with("<svg "));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"viewBox="0 0 800 680""#));
        assert!(svg.contains(r##"id="arrowhead-d1d5db""##));
        assert!(svg.contains(r##"id="arrowhead-fcd34d""##));
    }

    #[test]
    fn selected_adjacency_uses_highlight_stroke() {
        let (scene, _) = scene_with_selection();
        let svg = render_svg(&scene, &SvgRenderOptions::default());
        assert!(svg.contains(r##"stroke="#fcd34d""##));
        assert!(svg.contains(r##"marker-end="url(#arrowhead-fcd34d)""##));
        assert!(svg.contains(r##"stroke="#eab308""##));
    }

    #[test]
    fn labels_are_escaped() {
        let (scene, _) = scene_with_selection();
        let svg = render_svg(&scene, &SvgRenderOptions::default());
        assert!(svg.contains("Severe drought &amp; &lt;bad&gt; harvest (1987)"));
        assert!(!svg.contains("<bad>"));
        assert!(svg.contains(r##"fill="#ffffff">"##));
        assert!(svg.contains(r##"fill="#9ca3af">Year: 1987</text>"##));
    }

    #[test]
    fn axis_and_guides_can_be_disabled() {
        let (scene, _) = scene_with_selection();
        let options = SvgRenderOptions {
            include_axis: false,
            include_guides: false,
            background: None,
        };
        let svg = render_svg(&scene, &options);
        assert!(!svg.contains("stroke-dasharray"));
        assert!(!svg.contains(">1990</text>"));
        assert!(!svg.contains("<rect x=\"0\" y=\"0\""));
    }

    #[test]
    fn whole_floats_print_without_decimal_suffix() {
        let mut buf = ryu_js::Buffer::new();
        assert_eq!(fmt_num(420.0, &mut buf), "420");
        assert_eq!(fmt_num(420.5, &mut buf), "420.5");
        assert_eq!(fmt_num(-0.0, &mut buf), "0");
    }
}
