//! Markup and terminal rendering of refined edit scripts

use crate::change::{ChangeKind, CharPart, DiffOp, RefinedOp};
use std::borrow::Cow;

const DELETE_OPEN: &str = "[-";
const DELETE_CLOSE: &str = "-]";
const INSERT_OPEN: &str = "{+";
const INSERT_CLOSE: &str = "+}";

/// Escape the three markup metacharacters `&`, `<` and `>`
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

fn class_suffix(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Equal => "eq",
        ChangeKind::Insert => "ins",
        ChangeKind::Delete => "del",
        ChangeKind::Replace => "rep",
    }
}

fn push_span(out: &mut String, class: &str, kind: ChangeKind, text: &str) {
    out.push_str("<span class=\"");
    out.push_str(class);
    out.push(' ');
    out.push_str(class_suffix(kind));
    out.push_str("\">");
    out.push_str(&escape_html(text));
    out.push_str("</span>");
}

/// Render an edit script as a stream of `<span>` elements.
///
/// Token ops use the `tok eq|ins|del` classes. A replacement is wrapped in
/// `tok rep` and holds one `ch eq|ins|del` span per character part.
pub fn render_markup(ops: &[RefinedOp]) -> String {
    let mut out = String::new();
    let mut buf = [0u8; 4];

    for refined in ops {
        match &refined.op {
            DiffOp::Equal(text) | DiffOp::Delete(text) | DiffOp::Insert(text) => {
                push_span(&mut out, "tok", refined.op.kind(), text);
            }
            DiffOp::Replace { old, new } => {
                out.push_str("<span class=\"tok rep\">");
                if refined.parts.is_empty() {
                    push_span(&mut out, "ch", ChangeKind::Delete, old);
                    push_span(&mut out, "ch", ChangeKind::Insert, new);
                } else {
                    for part in &refined.parts {
                        let ch = part.ch().encode_utf8(&mut buf);
                        push_span(&mut out, "ch", part.kind(), ch);
                    }
                }
                out.push_str("</span>");
            }
        }
    }

    out
}

fn push_marked(out: &mut String, kind: ChangeKind, text: &str) {
    match kind {
        ChangeKind::Delete => {
            out.push_str(DELETE_OPEN);
            out.push_str(text);
            out.push_str(DELETE_CLOSE);
        }
        ChangeKind::Insert => {
            out.push_str(INSERT_OPEN);
            out.push_str(text);
            out.push_str(INSERT_CLOSE);
        }
        ChangeKind::Equal | ChangeKind::Replace => out.push_str(text),
    }
}

/// Group adjacent character parts of the same kind into runs
fn char_runs(parts: &[CharPart]) -> Vec<(ChangeKind, String)> {
    let mut runs: Vec<(ChangeKind, String)> = Vec::new();
    for part in parts {
        match runs.last_mut() {
            Some((kind, text)) if *kind == part.kind() => text.push(part.ch()),
            _ => runs.push((part.kind(), part.ch().to_string())),
        }
    }
    runs
}

/// Render an edit script as plain text with `[-deleted-]` and `{+inserted+}`
/// markers, for terminals and logs.
pub fn render_plain(ops: &[RefinedOp]) -> String {
    let mut out = String::new();

    for refined in ops {
        match &refined.op {
            DiffOp::Equal(text) | DiffOp::Delete(text) | DiffOp::Insert(text) => {
                push_marked(&mut out, refined.op.kind(), text);
            }
            DiffOp::Replace { old, new } => {
                if refined.parts.is_empty() {
                    push_marked(&mut out, ChangeKind::Delete, old);
                    push_marked(&mut out, ChangeKind::Insert, new);
                } else {
                    for (kind, text) in char_runs(&refined.parts) {
                        push_marked(&mut out, kind, &text);
                    }
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
        assert!(matches!(escape_html("plain"), Cow::Borrowed("plain")));
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_markup(&[]), "");
        assert_eq!(render_plain(&[]), "");
    }

    #[test]
    fn test_render_token_ops() {
        let ops: Vec<RefinedOp> = vec![
            DiffOp::Equal("a".into()).into(),
            DiffOp::Delete(" ".into()).into(),
            DiffOp::Insert("  ".into()).into(),
        ];
        assert_eq!(
            render_markup(&ops),
            "<span class=\"tok eq\">a</span>\
             <span class=\"tok del\"> </span>\
             <span class=\"tok ins\">  </span>"
        );
    }

    #[test]
    fn test_render_replace_with_parts() {
        let op = RefinedOp::new(DiffOp::Replace {
            old: "a<".into(),
            new: "a>".into(),
        })
        .with_parts(vec![
            CharPart::Equal('a'),
            CharPart::Delete('<'),
            CharPart::Insert('>'),
        ]);
        assert_eq!(
            render_markup(&[op]),
            "<span class=\"tok rep\">\
             <span class=\"ch eq\">a</span>\
             <span class=\"ch del\">&lt;</span>\
             <span class=\"ch ins\">&gt;</span>\
             </span>"
        );
    }

    #[test]
    fn test_render_replace_without_parts() {
        let op = RefinedOp::new(DiffOp::Replace {
            old: "x".into(),
            new: "y".into(),
        });
        assert_eq!(
            render_markup(&[op]),
            "<span class=\"tok rep\">\
             <span class=\"ch del\">x</span>\
             <span class=\"ch ins\">y</span>\
             </span>"
        );
    }

    #[test]
    fn test_render_plain_groups_char_runs() {
        let ops = vec![
            RefinedOp::new(DiffOp::Equal("at ".into())),
            RefinedOp::new(DiffOp::Replace {
                old: "Yale".into(),
                new: "Yalta".into(),
            })
            .with_parts(vec![
                CharPart::Equal('Y'),
                CharPart::Equal('a'),
                CharPart::Equal('l'),
                CharPart::Delete('e'),
                CharPart::Insert('t'),
                CharPart::Insert('a'),
            ]),
            RefinedOp::new(DiffOp::Delete("!".into())),
        ];
        assert_eq!(render_plain(&ops), "at Yal[-e-]{+ta+}[-!-]");
    }

    #[test]
    fn test_rendering_is_repeatable() {
        let ops = vec![
            RefinedOp::new(DiffOp::Insert("<b>".into())),
            RefinedOp::new(DiffOp::Equal("&".into())),
        ];
        assert_eq!(render_markup(&ops), render_markup(&ops));
    }
}
