//! Builders for Graphviz HTML-like labels and attribute lists

use std::fmt;

/// An attribute as a `(name, value)` pair; order is preserved on output
pub type Attr<'a> = (&'a str, &'a str);

/// A fragment of HTML-like label markup
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Markup(String);

impl Markup {
    /// Markup for plain text, with markup characters escaped
    pub fn text(text: &str) -> Self {
        Markup(escape_text(text))
    }

    /// Join fragments without a separator
    pub fn concat<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = Markup>,
    {
        Markup(parts.into_iter().map(|m| m.0).collect())
    }

    /// Append another fragment
    pub fn push(mut self, other: Markup) -> Self {
        self.0.push_str(&other.0);
        self
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Quote an attribute value.
///
/// Values starting with `<` are HTML-like strings and are wrapped in angle
/// brackets; everything else becomes a double-quoted string.
pub fn quote(value: &str) -> String {
    if value.starts_with('<') {
        format!("<{}>", value)
    } else {
        format!("\"{}\"", escape_quoted(value))
    }
}

/// Escape `\` and `"` for use inside a double-quoted DOT string
pub fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render `name=value` pairs joined by `sep`, each prefixed with `indent`
pub fn attr_list(attrs: &[Attr<'_>], sep: &str, indent: &str) -> String {
    attrs
        .iter()
        .map(|(name, value)| format!("{}{}={}", indent, name, quote(value)))
        .collect::<Vec<_>>()
        .join(sep)
}

/// Wrap `content` in an element
pub fn tag(name: &str, content: Markup, attrs: &[Attr<'_>]) -> Markup {
    if attrs.is_empty() {
        Markup(format!("<{name}>{content}</{name}>"))
    } else {
        Markup(format!(
            "<{name} {}>{content}</{name}>",
            attr_list(attrs, " ", "")
        ))
    }
}

pub fn font(content: Markup, attrs: &[Attr<'_>]) -> Markup {
    tag("font", content, attrs)
}

/// Bold text inside a `font` element carrying `attrs`
pub fn bold(content: Markup, attrs: &[Attr<'_>]) -> Markup {
    font(tag("b", content, &[]), attrs)
}

/// A left-aligned table cell
pub fn td(content: Markup, attrs: &[Attr<'_>]) -> Markup {
    tag("td", content, &with_defaults(&[("align", "left")], attrs))
}

pub fn tr(cells: Vec<Markup>) -> Markup {
    tag("tr", Markup::concat(cells), &[])
}

/// A borderless table holding `rows`
pub fn table(rows: Vec<Markup>, attrs: &[Attr<'_>]) -> Markup {
    tag(
        "table",
        Markup::concat(rows),
        &with_defaults(&[("border", "0"), ("cellspacing", "0.5")], attrs),
    )
}

/// Start from `defaults` and apply `attrs` over them. Overridden defaults keep
/// their position; new attributes are appended.
fn with_defaults<'a>(defaults: &[Attr<'a>], attrs: &[Attr<'a>]) -> Vec<Attr<'a>> {
    let mut merged = defaults.to_vec();
    for &(name, value) in attrs {
        match merged.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => merged.push((name, value)),
        }
    }
    merged
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
