//! SVG snapshot of the renderer scene.
//!
//! The document mirrors the map page markup: everything sits in one group
//! translated by the pan offset, stops are `circle.stop` elements carrying
//! their id and name, segments are `path` elements tagged with a frequency
//! label.

use crate::rendering::context::{DrawCommand, Renderer};
use std::fmt::Write;

pub fn render_svg(renderer: &Renderer, width: f64, height: f64) -> String {
    let translation = renderer.translation();
    let mut out = String::new();

    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
        width, height
    );
    let _ = writeln!(
        out,
        r#"<g transform="translate({},{})">"#,
        translation.x, translation.y
    );

    for command in renderer.draw_commands() {
        match command {
            DrawCommand::DebugOverlay { name, min, max } => {
                let _ = writeln!(
                    out,
                    r#"<rect id="{}" class="debug-marker" x="{}" y="{}" width="{}" height="{}"/>"#,
                    escape(&name),
                    min.x,
                    min.y,
                    max.x - min.x,
                    max.y - min.y
                );
            }
            DrawCommand::Segment {
                id,
                from,
                to,
                label,
            } => {
                let _ = writeln!(
                    out,
                    r#"<path id="{}" d="M {} {} L {} {}" frequency="{}"/>"#,
                    escape(&id),
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    label
                );
            }
            DrawCommand::Stop {
                id,
                name,
                center,
                radius,
            } => {
                let _ = writeln!(
                    out,
                    r#"<circle id="stop_{}" class="stop" cx="{}" cy="{}" r="{}" data-stop-id="{}" data-stop-name="{}"/>"#,
                    escape(&id),
                    center.x,
                    center.y,
                    radius,
                    escape(&id),
                    escape(&name)
                );
            }
            DrawCommand::Downloading { min, max } => {
                let _ = writeln!(
                    out,
                    r#"<rect class="being-downloaded" x="{}" y="{}" width="{}" height="{}"/>"#,
                    min.x,
                    min.y,
                    max.x - min.x,
                    max.y - min.y
                );
            }
        }
    }

    out.push_str("</g>\n</svg>\n");
    out
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
