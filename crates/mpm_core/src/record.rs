/// One detection record extracted from a log line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogRecord<'a> {
    /// MPM identifier, e.g. `StreamMpmFunc`.
    pub tag: &'a str,
    /// Number of pattern matches reported by the scan.
    pub matched: u64,
    /// Size in bytes of the buffer that was scanned.
    pub buffer_len: u64,
}

impl<'a> LogRecord<'a> {
    pub fn new(tag: &'a str, matched: u64, buffer_len: u64) -> Self {
        Self {
            tag,
            matched,
            buffer_len,
        }
    }
}
