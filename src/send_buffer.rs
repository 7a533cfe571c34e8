pub struct SendBuffer<const BUFSIZE: usize> {
    buf: [u8; BUFSIZE],
    pos: usize,
}

impl<const BUFSIZE: usize> SendBuffer<BUFSIZE> {
    pub const fn new() -> Self {
        Self {
            buf: [0; BUFSIZE],
            pos: 0,
        }
    }

    pub fn write(&mut self, data: &[u8]) {
        assert!(
            data.len() <= BUFSIZE,
            "Trying to write too much data into the send buffer"
        );

        self.buf[..data.len()].copy_from_slice(data);
        self.pos = 0;
    }

    pub fn rewind(&mut self) {
        self.pos = 0;
    }

    pub fn bytes_sent(&self) -> usize {
        self.pos
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.buf
    }
}

/// Yields bytes left-to-right up to the buffer's capacity. Bytes past the
/// last `write` keep their previous (or zero) value; the transaction
/// engine reports an overflow only once the capacity is exhausted.
impl<const BUFSIZE: usize> Iterator for SendBuffer<BUFSIZE> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos == BUFSIZE {
            None
        } else {
            self.pos += 1;
            Some(self.buf[self.pos - 1])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_written_prefix_then_remainder_until_capacity() {
        let mut buf = SendBuffer::<4>::new();

        buf.write(&[0x11, 0x22]);
        assert_eq!(buf.next(), Some(0x11));
        assert_eq!(buf.next(), Some(0x22));
        assert_eq!(buf.next(), Some(0x00));
        assert_eq!(buf.next(), Some(0x00));
        assert_eq!(buf.next(), None);
        assert_eq!(buf.bytes_sent(), 4);
    }

    #[test]
    fn rewind_restarts_the_cursor_without_touching_data() {
        let mut buf = SendBuffer::<4>::new();

        buf.write(&[0xAB, 0xCD]);
        buf.next();
        buf.next();
        buf.rewind();

        assert_eq!(buf.bytes_sent(), 0);
        assert_eq!(buf.next(), Some(0xAB));
    }

    #[test]
    #[should_panic]
    fn write_past_capacity_panics() {
        let mut buf = SendBuffer::<2>::new();
        buf.write(&[1, 2, 3]);
    }
}
