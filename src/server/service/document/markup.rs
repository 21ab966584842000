//! Lightweight markup for styled text runs.

use crate::server::model::google_doc::{TextRun, TextStyle};

/// Renders a text run, wrapping its non-whitespace core in markup for its style.
///
/// Leading and trailing whitespace (including the paragraph's closing newline) stays
/// outside the markers so that `"bold \n"` becomes `"**bold** \n"` rather than
/// `"**bold \n**"`. Links are innermost, bold outermost.
pub fn render_text_run(run: &TextRun) -> String {
    let content = run.content.as_str();
    let core = content.trim();
    if core.is_empty() {
        return content.to_string();
    }

    let start = content.len() - content.trim_start().len();
    let end = start + core.len();

    format!(
        "{}{}{}",
        &content[..start],
        apply_style(core, &run.text_style),
        &content[end..]
    )
}

fn apply_style(text: &str, style: &TextStyle) -> String {
    let mut out = text.to_string();

    if let Some(url) = style.link.as_ref().and_then(|link| link.url.as_deref()) {
        out = format!("[{}]({})", out, url);
    }
    if style.strikethrough {
        out = format!("~~{}~~", out);
    }
    // Link text is underlined by Docs by default
    if style.underline && style.link.is_none() {
        out = format!("__{}__", out);
    }
    if style.italic {
        out = format!("*{}*", out);
    }
    if style.bold {
        out = format!("**{}**", out);
    }

    out
}
