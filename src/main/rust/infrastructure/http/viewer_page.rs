use crate::domain::value_objects::CameraInfo;

const TEMPLATE: &str = include_str!("viewer.html");
const TITLE_SLOT: &str = "{{TITLE}}";

/// Render the viewer page for `camera`.
pub fn render_viewer_page(camera: &CameraInfo) -> String {
    TEMPLATE.replace(TITLE_SLOT, &escape_html(&camera.title()))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
