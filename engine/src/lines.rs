use std::io::{self, BufRead, Read};

use log::debug;

/// Longest engine output line kept. Real `info` lines stay far below this.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Splits engine output into lines.
///
/// Invalid UTF-8 is replaced rather than ending the stream, and lines
/// longer than [`MAX_LINE_BYTES`] are skipped without being buffered whole.
pub struct EngineLines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> EngineLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        loop {
            self.buf.clear();
            let read = (&mut self.reader)
                .take(MAX_LINE_BYTES as u64 + 1)
                .read_until(b'\n', &mut self.buf)?;
            if read == 0 {
                return Ok(None);
            }

            if self.buf.len() > MAX_LINE_BYTES && self.buf.last() != Some(&b'\n') {
                debug!("Skipping engine output line over {} bytes", MAX_LINE_BYTES);
                self.skip_rest_of_line()?;
                continue;
            }

            while matches!(self.buf.last(), Some(b'\n' | b'\r')) {
                self.buf.pop();
            }
            return Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()));
        }
    }

    fn skip_rest_of_line(&mut self) -> io::Result<()> {
        loop {
            let available = self.reader.fill_buf()?;
            if available.is_empty() {
                return Ok(());
            }

            match available.iter().position(|&b| b == b'\n') {
                Some(end) => {
                    self.reader.consume(end + 1);
                    return Ok(());
                }
                None => {
                    let len = available.len();
                    self.reader.consume(len);
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for EngineLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_line().transpose()
    }
}
