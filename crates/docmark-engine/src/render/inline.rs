use crate::model::InlineRun;

/// Font families rendered as inline code, compared case-insensitively.
const MONOSPACE_FAMILIES: &[&str] = &[
    "courier new",
    "courier",
    "consolas",
    "roboto mono",
    "source code pro",
    "monaco",
    "menlo",
    "fira code",
    "fira mono",
    "inconsolata",
    "jetbrains mono",
    "ubuntu mono",
];

pub fn is_monospace(font_family: Option<&str>) -> bool {
    font_family.is_some_and(|family| {
        let family = family.trim().to_ascii_lowercase();
        MONOSPACE_FAMILIES.contains(&family.as_str())
    })
}

/// Renders one run as Markdown.
///
/// Monospace runs become code spans and take no other marker. Otherwise
/// emphasis is innermost, then strikethrough, then underline (only when not
/// linked), with the link outermost. A trailing newline is detached first so
/// markers never straddle it.
pub fn format_run(run: &InlineRun) -> String {
    let (body, newline) = match run.text.strip_suffix('\n') {
        Some(body) => (body, "\n"),
        None => (run.text.as_str(), ""),
    };
    if body.trim().is_empty() {
        return run.text.clone();
    }

    if is_monospace(run.font_family.as_deref()) {
        return format!("`{body}`{newline}");
    }

    let mut out = match (run.bold, run.italic) {
        (true, true) => format!("***{body}***"),
        (true, false) => format!("**{body}**"),
        (false, true) => format!("*{body}*"),
        (false, false) => body.to_string(),
    };
    if run.strikethrough {
        out = format!("~~{out}~~");
    }
    if run.underline && run.link_url.is_none() {
        out = format!("<u>{out}</u>");
    }
    if let Some(url) = &run.link_url {
        out = format!("[{out}]({url})");
    }
    out.push_str(newline);
    out
}

/// Concatenates the rendered runs.
pub fn format_runs(runs: &[InlineRun]) -> String {
    runs.iter().map(format_run).collect()
}
