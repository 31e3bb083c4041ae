// Declaration-safe JSON Formatter
//
// Pretty JSON whose string tokens are also valid declaration strings:
// template introducers are doubled and control characters only use
// escapes both grammars accept.

use std::io;

use serde::Serialize;
use serde_json::ser::{CharEscape, Formatter, PrettyFormatter};
use serde_json::Serializer;

use super::escape::escape_templates;
use super::RenderError;

/// [`PrettyFormatter`] with declaration-safe string escaping.
pub struct HclFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl<'a> HclFormatter<'a> {
    pub fn new() -> Self {
        Self {
            inner: PrettyFormatter::new(),
        }
    }
}

impl Default for HclFormatter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for HclFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }

    // `$` and `{` are never escaped, so a `${` pair always lands in a
    // single fragment.
    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        writer.write_all(escape_templates(fragment).as_bytes())
    }

    fn write_char_escape<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        char_escape: CharEscape,
    ) -> io::Result<()> {
        match char_escape {
            CharEscape::Backspace => writer.write_all(b"\\u0008"),
            CharEscape::FormFeed => writer.write_all(b"\\u000c"),
            other => self.inner.write_char_escape(writer, other),
        }
    }
}

/// Serialize `value` as pretty JSON through [`HclFormatter`].
pub fn to_string_pretty<T: ?Sized + Serialize>(value: &T) -> Result<String, RenderError> {
    let mut buf = Vec::with_capacity(128);
    let mut ser = Serializer::with_formatter(&mut buf, HclFormatter::new());
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}
