//! Output sinks for the printf engine.
//!
//! Every renderer writes through [`FormatSink`], so one code path serves the
//! measuring pass ([`CountingSink`]), growable output (`Vec<u8>`), and bounded
//! snprintf-style output ([`SliceSink`]).
//!
//! Counts saturate at `usize::MAX`; a saturated length cannot be allocated.

/// Destination for rendered bytes.
pub trait FormatSink {
    /// Append one byte.
    fn put(&mut self, byte: u8);

    /// Append a run of bytes.
    fn put_slice(&mut self, bytes: &[u8]);

    /// Append `count` copies of `byte`.
    fn put_repeat(&mut self, byte: u8, count: usize) {
        for _ in 0..count {
            self.put(byte);
        }
    }
}

impl FormatSink for Vec<u8> {
    #[inline]
    fn put(&mut self, byte: u8) {
        self.push(byte);
    }

    #[inline]
    fn put_slice(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }

    #[inline]
    fn put_repeat(&mut self, byte: u8, count: usize) {
        self.resize(self.len() + count, byte);
    }
}

/// Dry-run sink: discards bytes and counts them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CountingSink {
    count: usize,
}

impl CountingSink {
    #[must_use]
    pub const fn new() -> Self {
        Self { count: 0 }
    }

    /// Bytes seen so far.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }
}

impl FormatSink for CountingSink {
    #[inline]
    fn put(&mut self, _byte: u8) {
        self.count = self.count.saturating_add(1);
    }

    #[inline]
    fn put_slice(&mut self, bytes: &[u8]) {
        self.count = self.count.saturating_add(bytes.len());
    }

    #[inline]
    fn put_repeat(&mut self, _byte: u8, count: usize) {
        self.count = self.count.saturating_add(count);
    }
}

/// Writes into a fixed slice, silently dropping overflow while still counting
/// the full untruncated length.
#[derive(Debug)]
pub struct SliceSink<'a> {
    buf: &'a mut [u8],
    stored: usize,
    total: usize,
}

impl<'a> SliceSink<'a> {
    #[must_use]
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            stored: 0,
            total: 0,
        }
    }

    /// Bytes actually stored in the slice.
    #[must_use]
    pub const fn stored(&self) -> usize {
        self.stored
    }

    /// Length the output would have had without truncation.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// True when some output did not fit.
    #[must_use]
    pub const fn truncated(&self) -> bool {
        self.total > self.stored
    }
}

impl FormatSink for SliceSink<'_> {
    fn put(&mut self, byte: u8) {
        if let Some(slot) = self.buf.get_mut(self.stored) {
            *slot = byte;
            self.stored += 1;
        }
        self.total = self.total.saturating_add(1);
    }

    fn put_slice(&mut self, bytes: &[u8]) {
        let room = self.buf.len() - self.stored;
        let n = bytes.len().min(room);
        self.buf[self.stored..self.stored + n].copy_from_slice(&bytes[..n]);
        self.stored += n;
        self.total = self.total.saturating_add(bytes.len());
    }

    fn put_repeat(&mut self, byte: u8, count: usize) {
        let room = self.buf.len() - self.stored;
        let n = count.min(room);
        self.buf[self.stored..self.stored + n].fill(byte);
        self.stored += n;
        self.total = self.total.saturating_add(count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting_sink_counts_every_path() {
        let mut sink = CountingSink::new();
        sink.put(b'a');
        sink.put_slice(b"bcd");
        sink.put_repeat(b' ', 4);
        assert_eq!(sink.count(), 8);
    }

    #[test]
    fn vec_sink_repeat_appends() {
        let mut buf = b"x".to_vec();
        buf.put_repeat(b'0', 3);
        assert_eq!(buf, b"x000");
    }

    #[test]
    fn slice_sink_truncates_but_counts() {
        let mut storage = [0u8; 4];
        let mut sink = SliceSink::new(&mut storage);
        sink.put_slice(b"abc");
        sink.put_repeat(b'-', 3);
        sink.put(b'!');
        assert_eq!(sink.stored(), 4);
        assert_eq!(sink.total(), 7);
        assert!(sink.truncated());
        assert_eq!(&storage, b"abc-");
    }

    #[test]
    fn slice_sink_zero_length() {
        let mut storage: [u8; 0] = [];
        let mut sink = SliceSink::new(&mut storage);
        sink.put(b'a');
        sink.put_slice(b"bc");
        assert_eq!(sink.stored(), 0);
        assert_eq!(sink.total(), 3);
    }

    #[test]
    fn counts_saturate_instead_of_wrapping() {
        let mut counter = CountingSink::new();
        counter.put_repeat(b' ', usize::MAX);
        counter.put_slice(b"ab");
        counter.put(b'c');
        assert_eq!(counter.count(), usize::MAX);

        let mut storage = [0u8; 2];
        let mut sink = SliceSink::new(&mut storage);
        sink.put(b'x');
        sink.put_repeat(b'0', usize::MAX);
        assert_eq!(sink.stored(), 2);
        assert_eq!(sink.total(), usize::MAX);
        assert_eq!(&storage, b"x0");
    }
}
