//! Splits a `multipart/x-mixed-replace` MJPEG byte stream into JPEG payloads
//!
//! Part headers and boundaries are skipped by scanning for the JPEG start
//! marker (`FF D8`), so the splitter does not need the boundary string or
//! per-part `Content-Length`. The end of a frame is found by walking its
//! marker segments: length-prefixed segments are skipped whole, so an EXIF
//! thumbnail embedded in `APP1` never ends the outer frame early.

const SOI: [u8; 2] = [0xFF, 0xD8];
const EOI_CODE: u8 = 0xD9;
const SOS_CODE: u8 = 0xDA;

/// Upper bound on buffered bytes without a complete frame
const MAX_BUFFERED: usize = 16 * 1024 * 1024;

#[derive(Debug, Default)]
pub struct JpegSplitter {
    buffer: Vec<u8>,
}

/// Result of walking a JPEG that starts at offset 0
#[derive(Debug, PartialEq, Eq)]
enum Scan {
    /// Frame ends (exclusive) at this offset
    Complete(usize),
    /// More bytes are needed
    Incomplete,
    /// Not a JPEG after all
    Malformed,
}

fn find(haystack: &[u8], needle: &[u8; 2]) -> Option<usize> {
    haystack.windows(2).position(|window| window == needle)
}

/// Markers that stand alone, without a length field
fn is_standalone(code: u8) -> bool {
    matches!(code, 0x01 | 0xD0..=0xD7)
}

fn segment_len(data: &[u8], pos: usize) -> Option<usize> {
    let bytes = data.get(pos..pos + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]) as usize)
}

/// Skip entropy-coded scan data starting at `pos`, returning the offset of
/// the next real marker
fn skip_scan_data(data: &[u8], mut pos: usize) -> Option<usize> {
    loop {
        let offset = data.get(pos..)?.iter().position(|&b| b == 0xFF)?;
        pos += offset;
        let next = *data.get(pos + 1)?;
        // Byte stuffing, restart markers and fill bytes stay in the scan
        if next == 0x00 || is_standalone(next) {
            pos += 2;
        } else if next == 0xFF {
            pos += 1;
        } else {
            return Some(pos);
        }
    }
}

fn scan_jpeg(data: &[u8]) -> Scan {
    let mut pos = SOI.len();
    loop {
        match data.get(pos) {
            None => return Scan::Incomplete,
            Some(0xFF) => {}
            Some(_) => return Scan::Malformed,
        }
        while data.get(pos + 1) == Some(&0xFF) {
            pos += 1;
        }
        let Some(&code) = data.get(pos + 1) else {
            return Scan::Incomplete;
        };
        pos += 2;

        match code {
            EOI_CODE => return Scan::Complete(pos),
            0x00 | 0xD8 => return Scan::Malformed,
            code if is_standalone(code) => {}
            code => {
                let Some(len) = segment_len(data, pos) else {
                    return Scan::Incomplete;
                };
                if len < 2 {
                    return Scan::Malformed;
                }
                pos += len;
                if code == SOS_CODE {
                    match skip_scan_data(data, pos) {
                        Some(marker) => pos = marker,
                        None => return Scan::Incomplete,
                    }
                }
            }
        }
    }
}

impl JpegSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk read from the stream
    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
        if self.buffer.len() > MAX_BUFFERED {
            // Keep only a possible marker prefix straddling the next chunk
            let keep = self.buffer.split_off(self.buffer.len() - 1);
            self.buffer = keep;
        }
    }

    /// Take the next complete JPEG, discarding anything before it
    pub fn next_frame(&mut self) -> Option<Vec<u8>> {
        loop {
            let Some(start) = find(&self.buffer, &SOI) else {
                // No frame start yet; only a trailing 0xFF can still matter
                let keep_from = self.buffer.len().saturating_sub(1);
                self.buffer.drain(..keep_from);
                return None;
            };

            match scan_jpeg(&self.buffer[start..]) {
                Scan::Complete(len) => {
                    let end = start + len;
                    let frame = self.buffer[start..end].to_vec();
                    self.buffer.drain(..end);
                    return Some(frame);
                }
                Scan::Incomplete => {
                    self.buffer.drain(..start);
                    return None;
                }
                // Stray start marker; resume the search after it
                Scan::Malformed => {
                    self.buffer.drain(..start + SOI.len());
                }
            }
        }
    }

    /// Bytes currently buffered
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}
