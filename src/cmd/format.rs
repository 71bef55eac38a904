/*!
format.rs

Human-output helpers for the local CLI (`list`, `exec`, `read`).

  - StyleOptions::detect() honours NO_COLOR / NO_EMOJI / COLUMNS and
    falls back to plain output when stdout is not a terminal
  - color(role, text, &style)
  - emoji(tag, &style)
  - box_header(title, subtitle, &style)
  - table(headers, rows, &style)

JSON output paths must not use these helpers. Everything here returns
strings; nothing prints.
*/

use std::borrow::Cow;
use std::io::IsTerminal;

#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub use_color: bool,
    pub use_emoji: bool,
    pub term_width: usize,
}

impl StyleOptions {
    pub fn detect() -> Self {
        let width = std::env::var("COLUMNS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .map(|w| w.clamp(40, 220))
            .unwrap_or(100);

        if !std::io::stdout().is_terminal() {
            return Self::plain(width);
        }
        StyleOptions {
            use_color: std::env::var_os("NO_COLOR").is_none(),
            use_emoji: std::env::var_os("NO_EMOJI").is_none(),
            term_width: width,
        }
    }

    /// No color, no emoji.
    pub fn plain(term_width: usize) -> Self {
        StyleOptions {
            use_color: false,
            use_emoji: false,
            term_width,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Primary,
    Secondary,
    Accent,
    Success,
    Error,
    Dim,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Primary => "38;5;45",
        Role::Secondary => "38;5;250",
        Role::Accent => "38;5;213",
        Role::Success => "38;5;82",
        Role::Error => "38;5;196",
        Role::Dim => "2",
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

pub fn emoji(tag: &str, style: &StyleOptions) -> &'static str {
    if !style.use_emoji {
        return "";
    }
    match tag {
        "success" => "✔",
        "error" => "✖",
        "info" => "ℹ",
        "tool" => "🛠",
        "list" => "📜",
        "resource" => "📦",
        _ => "",
    }
}

/// Single-line title (plus optional dim subtitle) inside a light box.
/// Content longer than the terminal width is truncated with an ellipsis.
pub fn box_header(
    title: impl AsRef<str>,
    subtitle: Option<impl AsRef<str>>,
    style: &StyleOptions,
) -> String {
    let plain = match &subtitle {
        Some(s) => format!("{}  {}", title.as_ref(), s.as_ref()),
        None => title.as_ref().to_string(),
    };
    let max_inner = style.term_width.saturating_sub(4).max(10);
    let fits = plain.chars().count() <= max_inner;

    let inner = if fits {
        let t = color(Role::Primary, title.as_ref(), style);
        match &subtitle {
            Some(s) => format!("{t}  {}", color(Role::Secondary, s.as_ref(), style)),
            None => t,
        }
    } else {
        color(Role::Primary, truncate_ellipsis(&plain, max_inner), style)
    };

    let width = display_width(&inner);
    let rule = "─".repeat(width + 2);
    format!("┌{rule}┐\n│ {inner} │\n└{rule}┘")
}

/// Left-aligned columns separated by two spaces; the widest columns shrink
/// (with an ellipsis) until the table fits `style.term_width`.
pub fn table(headers: &[&str], rows: &[Vec<String>], style: &StyleOptions) -> String {
    const MIN_COL: usize = 4;
    if headers.is_empty() {
        return String::new();
    }
    let cols = headers.len();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(cols) {
            widths[i] = widths[i].max(display_width(cell));
        }
    }

    let total = widths.iter().sum::<usize>() + (cols - 1) * 2;
    let mut overflow = total.saturating_sub(style.term_width);
    while overflow > 0 {
        let Some((idx, w)) = widths
            .iter()
            .copied()
            .enumerate()
            .max_by_key(|(_, w)| *w)
            .filter(|(_, w)| *w > MIN_COL)
        else {
            break;
        };
        let shrink = (w - MIN_COL).min(overflow);
        widths[idx] -= shrink;
        overflow -= shrink;
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(color(
        Role::Accent,
        render_row(headers.iter().copied(), &widths),
        style,
    ));
    let sep = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("  ");
    lines.push(color(Role::Dim, sep, style));
    for row in rows {
        let cells = (0..cols).map(|c| row.get(c).map(String::as_str).unwrap_or(""));
        lines.push(render_row(cells, &widths));
    }
    lines.join("\n")
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths.iter())
        .map(|(cell, w)| pad_or_truncate(cell, *w))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn pad_or_truncate(s: &str, width: usize) -> String {
    let len = display_width(s);
    if len <= width {
        return format!("{s}{}", " ".repeat(width - len));
    }
    truncate_ellipsis(&strip_ansi(s), width)
}

pub fn truncate_ellipsis(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars <= 1 {
        return "…".chars().take(max_chars).collect();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

/* ---- ANSI / Width Utilities ---- */

fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains('\x1b') {
        return Cow::Borrowed(s);
    }
    let mut buf = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        buf.push(c);
    }
    Cow::Owned(buf)
}

fn display_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}
