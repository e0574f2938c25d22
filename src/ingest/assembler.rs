//! Byte-to-line assembly.

use std::collections::VecDeque;

/// Splits a byte stream into lines.
///
/// Bytes are buffered until a `\n` arrives. A trailing `\r` is stripped and
/// the line is decoded lossily, so invalid UTF-8 never fails the stream.
#[derive(Debug, Default, Clone)]
pub struct LineAssembler {
    partial: Vec<u8>,
}

impl LineAssembler {
    /// Create an empty assembler.
    pub const fn new() -> Self {
        Self {
            partial: Vec::new(),
        }
    }

    /// Feed bytes, pushing every completed line onto `out`.
    ///
    /// Returns the number of lines completed.
    pub fn push(&mut self, bytes: &[u8], out: &mut VecDeque<String>) -> usize {
        let mut completed = 0;
        let mut rest = bytes;
        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            self.partial.extend_from_slice(&rest[..pos]);
            out.push_back(decode(&self.partial));
            self.partial.clear();
            completed += 1;
            rest = &rest[pos + 1..];
        }
        self.partial.extend_from_slice(rest);
        completed
    }

    /// Bytes waiting for a terminator.
    pub fn pending(&self) -> usize {
        self.partial.len()
    }

    /// Take the unterminated tail, if any, as a final line.
    pub fn finish(&mut self) -> Option<String> {
        if self.partial.is_empty() {
            return None;
        }
        let line = decode(&self.partial);
        self.partial.clear();
        Some(line)
    }
}

fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
