//! Inline style handling built on cssparser
//!
//! The working document stores each element's inline styles as a [`StyleMap`]:
//! an insertion-ordered set of declarations with unique, hyphenated property
//! names. Property panels may hand us camelCase names (`fontSize`); those are
//! normalized to CSS form (`font-size`) before storage so the two spellings
//! always land on the same declaration.

use cssparser::{Delimiter, ParseError, Parser, ParserInput};

/// Properties whose bare numeric values are interpreted as pixel lengths.
const PX_COERCED_PROPERTIES: &[&str] = &["width", "height", "font-size"];

/// A single CSS declaration (`property: value [!important]`).
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

/// Insertion-ordered map of CSS declarations with unique property names.
///
/// Updating an existing property rewrites its value in place, keeping the
/// original declaration order stable across edits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleMap {
    entries: Vec<Declaration>,
}

impl StyleMap {
    /// Create an empty style map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no declarations are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get a property's value. The name is normalized before lookup.
    pub fn get(&self, property: &str) -> Option<&str> {
        let property = normalize_property(property);
        self.entries
            .iter()
            .find(|d| d.property == property)
            .map(|d| d.value.as_str())
    }

    /// Get the full declaration for a property, if present.
    pub fn declaration(&self, property: &str) -> Option<&Declaration> {
        let property = normalize_property(property);
        self.entries.iter().find(|d| d.property == property)
    }

    /// Set a property with normal precedence. Last write wins per property.
    pub fn set(&mut self, property: &str, value: impl Into<String>) {
        self.insert(Declaration {
            property: normalize_property(property),
            value: value.into(),
            important: false,
        });
    }

    /// Set a property flagged `!important`.
    ///
    /// Programmatic edits from the store use this so they override any rule
    /// carried by the imported document's stylesheet.
    pub fn set_important(&mut self, property: &str, value: impl Into<String>) {
        self.insert(Declaration {
            property: normalize_property(property),
            value: value.into(),
            important: true,
        });
    }

    /// Restore a previously captured declaration verbatim.
    pub fn set_declaration(&mut self, declaration: Declaration) {
        self.insert(declaration);
    }

    /// Remove a property. No-op if absent.
    pub fn remove(&mut self, property: &str) {
        let property = normalize_property(property);
        self.entries.retain(|d| d.property != property);
    }

    /// Iterate declarations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.entries.iter()
    }

    /// Serialize to `style` attribute text.
    pub fn to_attr_value(&self) -> String {
        let mut out = String::new();
        for decl in &self.entries {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&decl.property);
            out.push_str(": ");
            out.push_str(&decl.value);
            if decl.important {
                out.push_str(" !important");
            }
            out.push(';');
        }
        out
    }

    fn insert(&mut self, declaration: Declaration) {
        match self
            .entries
            .iter_mut()
            .find(|d| d.property == declaration.property)
        {
            Some(existing) => *existing = declaration,
            None => self.entries.push(declaration),
        }
    }
}

/// Normalize a property name to hyphenated CSS form.
///
/// `fontSize` and `font-size` both become `font-size`.
pub fn normalize_property(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    for ch in name.trim().chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Apply pixel coercion for length-like properties.
///
/// A bare numeric value for `width`, `height`, or `font-size` gains a `px`
/// suffix (`"24"` becomes `"24px"`); anything already carrying a unit
/// (`"2rem"`, `"50%"`) is left alone. `property` must already be normalized.
pub fn coerce_px(property: &str, value: &str) -> String {
    let trimmed = value.trim();
    if PX_COERCED_PROPERTIES.contains(&property)
        && !trimmed.is_empty()
        && trimmed.chars().all(|c| c.is_ascii_digit() || c == '.')
    {
        format!("{trimmed}px")
    } else {
        trimmed.to_string()
    }
}

/// Format a pixel length, dropping a trailing `.0` for whole values.
pub fn format_px(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}px")
    } else {
        format!("{value}px")
    }
}

/// Parse a pixel length back out of a stored style value.
pub fn parse_px(value: &str) -> Option<f64> {
    value.trim().strip_suffix("px")?.trim().parse().ok()
}

/// Tokenize inline `style="…"` attribute text into a [`StyleMap`].
///
/// Uses the cssparser tokenizer so separators inside strings and `url(…)`
/// don't split declarations. Malformed declarations are skipped, not fatal.
pub fn parse_inline_style(text: &str) -> StyleMap {
    let mut style = StyleMap::new();
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);

    loop {
        parser.skip_whitespace();
        if parser.is_exhausted() {
            break;
        }

        let property = match parser.expect_ident() {
            Ok(name) => normalize_property(&name),
            Err(_) => {
                skip_to_semicolon(&mut parser);
                continue;
            }
        };
        if parser.expect_colon().is_err() {
            skip_to_semicolon(&mut parser);
            continue;
        }

        let raw_value: String = parser
            .parse_until_before(Delimiter::Semicolon, |p| {
                p.skip_whitespace();
                let start = p.position();
                while p.next().is_ok() {}
                Ok::<_, ParseError<'_, ()>>(p.slice_from(start).trim_end().to_string())
            })
            .unwrap_or_default();
        // Consume the separator itself.
        let _ = parser.next();

        if property.is_empty() || raw_value.is_empty() {
            continue;
        }

        let (value, important) = split_important(&raw_value);
        if value.is_empty() {
            continue;
        }
        style.set_declaration(Declaration {
            property,
            value,
            important,
        });
    }

    style
}

fn skip_to_semicolon(parser: &mut Parser<'_, '_>) {
    let _ = parser.parse_until_before(Delimiter::Semicolon, |p| {
        while p.next().is_ok() {}
        Ok::<_, ParseError<'_, ()>>(())
    });
    let _ = parser.next();
}

fn split_important(raw: &str) -> (String, bool) {
    let lower = raw.to_ascii_lowercase();
    if let Some(stripped) = lower.strip_suffix("!important") {
        let cut = stripped.len();
        (raw[..cut].trim_end().to_string(), true)
    } else {
        (raw.to_string(), false)
    }
}
