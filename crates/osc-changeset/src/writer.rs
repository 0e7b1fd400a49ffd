//! Document tree → bytes.
//!
//! The encoding is XML with a single declaration line, two-space
//! indentation, one element per line, no blank lines, and no trailing
//! newline. Elements without children are self-closing. The whole document
//! is rendered into memory before anything touches the destination.

use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::document::Element;
use crate::error::{ChangesetError, ChangesetResult};

/// The declaration line every rendered document starts with.
pub const XML_DECLARATION: &str = "<?xml version='1.0' encoding='UTF-8'?>";

const INDENT: &str = "  ";

/// A fully rendered changeset document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedChangeset {
    bytes: Vec<u8>,
    hash: [u8; 32],
}

impl RenderedChangeset {
    /// Render a document tree.
    ///
    /// Fails if an attribute value holds a character XML 1.0 cannot
    /// represent, even as a character reference.
    pub fn render(root: &Element) -> ChangesetResult<Self> {
        let mut out = String::from(XML_DECLARATION);
        render_element(&mut out, root, 0)?;
        let bytes = out.into_bytes();
        let hash = *blake3::hash(&bytes).as_bytes();
        Ok(Self { bytes, hash })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Rendered length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// BLAKE3 hash of the rendered bytes.
    pub fn content_hash(&self) -> [u8; 32] {
        self.hash
    }

    /// Hex-encoded BLAKE3 hash of the rendered bytes.
    pub fn content_hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Write the document to a byte sink in a single call.
    pub fn write_to<W: Write>(&self, mut sink: W) -> ChangesetResult<()> {
        sink.write_all(&self.bytes)?;
        sink.flush()?;
        Ok(())
    }

    /// Write the document to `path`.
    ///
    /// Bytes go to a temporary file in the destination directory which is
    /// then renamed over `path`, so a failed write never leaves a partial
    /// document behind.
    pub fn persist(&self, path: &Path) -> ChangesetResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&self.bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;

        info!(
            path = %path.display(),
            bytes = self.bytes.len(),
            hash = %self.content_hash_hex(),
            "changeset written"
        );
        Ok(())
    }
}

fn render_element(out: &mut String, el: &Element, depth: usize) -> ChangesetResult<()> {
    out.push('\n');
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push('<');
    out.push_str(el.name);
    for (key, value) in &el.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        escape_attribute(out, value).map_err(|ch| ChangesetError::InvalidCharacter {
            element: el.name,
            attribute: *key,
            codepoint: u32::from(ch),
        })?;
        out.push('"');
    }

    if el.children.is_empty() {
        out.push_str("/>");
        return Ok(());
    }

    out.push('>');
    for child in &el.children {
        render_element(out, child, depth + 1)?;
    }
    out.push('\n');
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str("</");
    out.push_str(el.name);
    out.push('>');
    Ok(())
}

/// Escape an attribute value. Line breaks and tabs become character
/// references so a value can never introduce a new line. Returns the first
/// character outside the XML 1.0 `Char` production.
fn escape_attribute(out: &mut String, value: &str) -> Result<(), char> {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => return Err(ch),
            c => out.push(c),
        }
    }
    Ok(())
}
