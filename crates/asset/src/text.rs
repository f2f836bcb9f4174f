//! Byte-level line reading shared by the OBJ and MTL readers.
//!
//! Exporters put Latin-1 names and comments into otherwise ASCII files, so
//! lines are read as bytes and only decoded when a directive we consume needs
//! them.

use std::{borrow::Cow, io::BufRead};

use crate::error::{AssetError, AssetResult};

/// One raw line: decoded text, or the bytes if they are not valid UTF-8.
pub(crate) type Line<'a> = Result<&'a str, &'a [u8]>;

/// Call `f(line_no, line)` for every line, 1-based, without the trailing
/// `\n` / `\r\n`.
pub(crate) fn for_each_line<R, F>(mut reader: R, mut f: F) -> AssetResult<()>
where
    R: BufRead,
    F: FnMut(usize, Line<'_>) -> AssetResult<()>,
{
    let mut buf = Vec::new();
    let mut line_no = 0;
    loop {
        buf.clear();
        line_no += 1;
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| AssetError::Read {
                line: line_no,
                source,
            })?;
        if read == 0 {
            return Ok(());
        }

        let mut bytes = buf.as_slice();
        if let Some(rest) = bytes.strip_suffix(b"\n") {
            bytes = rest;
        }
        if let Some(rest) = bytes.strip_suffix(b"\r") {
            bytes = rest;
        }
        f(line_no, std::str::from_utf8(bytes).map_err(|_| bytes))?;
    }
}

/// First whitespace-delimited token of a raw line.
pub(crate) fn leading_tag(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let rest = &bytes[start..];
    let end = rest
        .iter()
        .position(|b| b.is_ascii_whitespace())
        .unwrap_or(rest.len());
    &rest[..end]
}

/// Lossy text of an undecodable line, for error messages.
pub(crate) fn lossy(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}
