use core::mem::MaybeUninit;

pub struct ReceiveBuffer<const BUFSIZE: usize> {
    buf: MaybeUninit<[u8; BUFSIZE]>,
    size: usize,
}

impl<const BUFSIZE: usize> ReceiveBuffer<BUFSIZE> {
    pub const fn new() -> Self {
        Self {
            buf: MaybeUninit::uninit(),
            size: 0,
        }
    }

    pub fn write_byte(&mut self, byte: u8) -> Result<(), ()> {
        if self.size == BUFSIZE {
            Err(())
        } else {
            unsafe { self.buf.assume_init_mut()[self.size] = byte }
            self.size += 1;
            Ok(())
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_full(&self) -> bool {
        self.size == BUFSIZE
    }

    pub fn as_slice(&self) -> &[u8] {
        unsafe { &self.buf.assume_init_ref()[..self.size] }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { &mut self.buf.assume_init_mut()[..self.size] }
    }

    pub fn reset(&mut self) {
        self.size = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bytes_past_capacity() {
        let mut buf = ReceiveBuffer::<2>::new();

        assert_eq!(buf.write_byte(0xA0), Ok(()));
        assert_eq!(buf.write_byte(0xA1), Ok(()));
        assert!(buf.is_full());
        assert_eq!(buf.write_byte(0xA2), Err(()));

        assert_eq!(buf.as_slice(), &[0xA0, 0xA1]);
    }

    #[test]
    fn reset_clears_length_only() {
        let mut buf = ReceiveBuffer::<4>::new();

        buf.write_byte(0x11).unwrap();
        buf.reset();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.as_slice(), &[]);

        buf.write_byte(0x22).unwrap();
        assert_eq!(buf.as_slice(), &[0x22]);
    }
}
