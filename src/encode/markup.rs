//! Minimal text-based markup builder
//!
//! All XML-bearing export formats assemble their output through this builder,
//! which is the single place where user-supplied text and attribute values
//! are entity-escaped. Output stays plain text; no XML library is involved.

use std::borrow::Cow;

const INDENT: &str = "    ";

/// Escape character data for element text.
pub(crate) fn escape_text(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    )
}

/// Escape character data for attribute values (double-quoted).
pub(crate) fn escape_attr(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}

/// Incremental builder for indented markup text.
///
/// Tracks nesting depth for indentation only; tag balance is the caller's
/// responsibility, since headers and footers are emitted as separate
/// partial documents.
pub(crate) struct MarkupBuilder {
    buf: String,
    depth: usize,
}

impl MarkupBuilder {
    /// Create a builder starting at the document root.
    pub(crate) fn new() -> Self {
        Self::at_depth(0)
    }

    /// Create a builder starting at the given nesting depth.
    ///
    /// Waypoint fragments live inside an envelope emitted separately, so
    /// they start indented.
    pub(crate) fn at_depth(depth: usize) -> Self {
        Self {
            buf: String::new(),
            depth,
        }
    }

    /// Emit the XML declaration.
    pub(crate) fn declaration(&mut self) -> &mut Self {
        self.buf.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        self
    }

    /// Open an element and increase depth.
    pub(crate) fn open(&mut self, tag: &str, attrs: &[(&str, &str)]) -> &mut Self {
        self.indent();
        self.buf.push('<');
        self.buf.push_str(tag);
        self.push_attrs(attrs);
        self.buf.push_str(">\n");
        self.depth += 1;
        self
    }

    /// Close the innermost element.
    pub(crate) fn close(&mut self, tag: &str) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push_str(">\n");
        self
    }

    /// Emit `<tag attrs>text</tag>` on one line, with text escaped.
    pub(crate) fn element(&mut self, tag: &str, attrs: &[(&str, &str)], text: &str) -> &mut Self {
        self.indent();
        self.buf.push('<');
        self.buf.push_str(tag);
        self.push_attrs(attrs);
        self.buf.push('>');
        self.buf.push_str(&escape_text(text));
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push_str(">\n");
        self
    }

    /// Emit a self-closing `<tag attrs />`.
    pub(crate) fn empty(&mut self, tag: &str, attrs: &[(&str, &str)]) -> &mut Self {
        self.indent();
        self.buf.push('<');
        self.buf.push_str(tag);
        self.push_attrs(attrs);
        self.buf.push_str(" />\n");
        self
    }

    /// Consume the builder and return the accumulated text.
    pub(crate) fn finish(self) -> String {
        self.buf
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.buf.push_str(INDENT);
        }
    }

    fn push_attrs(&mut self, attrs: &[(&str, &str)]) {
        for (name, value) in attrs {
            self.buf.push(' ');
            self.buf.push_str(name);
            self.buf.push_str("=\"");
            self.buf.push_str(&escape_attr(value));
            self.buf.push('"');
        }
    }
}
