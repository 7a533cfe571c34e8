use crate::{
    bus::{BusController, InterruptLevel},
    receive_buffer::ReceiveBuffer,
    send_buffer::SendBuffer,
    state::SlaveState,
    SlaveResult, SlaveStatus,
};

/// Callback view of an in-flight host-write transaction.
///
/// Handed to the byte callback right after a byte lands in the receive
/// buffer; the slice covers everything received so far, newest byte last.
pub struct Transaction<'t> {
    pub(crate) byte: u8,
    pub(crate) received: &'t mut [u8],
    pub(crate) state: &'t SlaveState,
}

impl Transaction<'_> {
    /// The byte that was just received.
    pub fn byte(&self) -> u8 {
        self.byte
    }

    pub fn received(&self) -> &[u8] {
        self.received
    }

    pub fn received_mut(&mut self) -> &mut [u8] {
        self.received
    }

    /// End the transaction after this byte instead of acknowledging it.
    pub fn abort(&self) {
        self.state.request_abort();
    }
}

/// One TWI slave context: configuration, buffers and transaction state for
/// a single bus interface.
///
/// The context is owned by whoever dispatches bus events into it; the
/// application observes progress through the shared [`SlaveState`] and
/// touches the buffers only while the state reads [`SlaveStatus::Ready`].
pub struct TwiSlave<'a, B, F, const TXBUFSIZE: usize, const RXBUFSIZE: usize>
where
    B: BusController,
    F: FnMut(&mut Transaction<'_>),
{
    pub(crate) bus: B,
    pub(crate) state: &'a SlaveState,
    pub(crate) on_byte_received: F,
    pub(crate) send_buffer: SendBuffer<TXBUFSIZE>,
    pub(crate) receive_buffer: ReceiveBuffer<RXBUFSIZE>,
}

impl<'a, B, F, const TXBUFSIZE: usize, const RXBUFSIZE: usize>
    TwiSlave<'a, B, F, TXBUFSIZE, RXBUFSIZE>
where
    B: BusController,
    F: FnMut(&mut Transaction<'_>),
{
    /// Bind a bus controller and a per-byte callback into a fresh context.
    ///
    /// The callback runs synchronously in the interrupt context once per
    /// received byte and must not block.
    pub fn new(bus: B, state: &'a SlaveState, on_byte_received: F) -> Self {
        Self {
            bus,
            state,
            on_byte_received,
            send_buffer: SendBuffer::new(),
            receive_buffer: ReceiveBuffer::new(),
        }
    }

    /// One-time setup: arm the bus controller with this device's address
    /// and interrupt priority.
    pub fn bind_address(&mut self, address: u8, level: InterruptLevel) {
        assert!(
            address <= 127,
            "Own address is out of range. 10-bit addresses are not supported."
        );

        self.bus.listen(address, level);
    }

    pub fn status(&self) -> SlaveStatus {
        self.state.status()
    }

    pub fn result(&self) -> SlaveResult {
        self.state.result()
    }

    /// Bytes received in the most recent host-write transaction. Valid
    /// until the next address match rewinds the buffer.
    pub fn received(&self) -> &[u8] {
        self.receive_buffer.as_slice()
    }

    pub fn bytes_received(&self) -> usize {
        self.receive_buffer.len()
    }

    pub fn bytes_sent(&self) -> usize {
        self.send_buffer.bytes_sent()
    }

    /// Stage response data for the next host-read transaction. Must only
    /// be called while the context reads `Ready`.
    pub fn write_response(&mut self, data: &[u8]) {
        self.send_buffer.write(data);
    }

    /// Direct access to the full response buffer, stale bytes included.
    pub fn response_mut(&mut self) -> &mut [u8] {
        self.send_buffer.as_mut_slice()
    }

    /// Request cooperative termination of the current transaction.
    pub fn request_abort(&self) {
        self.state.request_abort();
    }

    pub fn state(&self) -> &'a SlaveState {
        self.state
    }

    pub fn release(self) -> B {
        self.bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::StatusFlags;

    struct NopBus {
        bound: Option<(u8, InterruptLevel)>,
    }

    impl NopBus {
        fn new() -> Self {
            Self { bound: None }
        }
    }

    impl BusController for NopBus {
        fn listen(&mut self, address: u8, level: InterruptLevel) {
            self.bound = Some((address, level));
        }

        fn read_status(&mut self) -> StatusFlags {
            StatusFlags::default()
        }

        fn read_byte(&mut self) -> u8 {
            0
        }

        fn write_byte(&mut self, _byte: u8) {}
        fn acknowledge(&mut self) {}
        fn nack(&mut self) {}
        fn request_response(&mut self) {}
        fn complete_transaction(&mut self) {}
        fn enable_stop_notification(&mut self) {}
        fn disable_stop_notification(&mut self) {}
    }

    fn noop(_: &mut Transaction<'_>) {}

    #[test]
    fn bind_address_arms_the_bus_controller() {
        let state = SlaveState::new();
        let mut bus = NopBus::new();
        let mut slave: TwiSlave<_, _, 8, 8> = TwiSlave::new(&mut bus, &state, noop);

        slave.bind_address(0x42, InterruptLevel::Medium);
        drop(slave);

        assert_eq!(bus.bound, Some((0x42, InterruptLevel::Medium)));
    }

    #[test]
    #[should_panic]
    fn bind_address_rejects_ten_bit_addresses() {
        let state = SlaveState::new();
        let mut slave: TwiSlave<_, _, 8, 8> = TwiSlave::new(NopBus::new(), &state, noop);

        slave.bind_address(0x80, InterruptLevel::Low);
    }

    #[test]
    fn fresh_context_is_ready_and_empty() {
        let state = SlaveState::new();
        let slave: TwiSlave<_, _, 8, 8> = TwiSlave::new(NopBus::new(), &state, noop);

        assert_eq!(slave.status(), SlaveStatus::Ready);
        assert_eq!(slave.result(), SlaveResult::Unknown);
        assert_eq!(slave.received(), &[]);
        assert_eq!(slave.bytes_sent(), 0);
    }

    #[test]
    fn response_buffer_is_writable_in_place() {
        let state = SlaveState::new();
        let mut slave: TwiSlave<_, _, 4, 4> = TwiSlave::new(NopBus::new(), &state, noop);

        slave.write_response(&[0x11, 0x22]);
        slave.response_mut()[2] = 0x33;

        assert_eq!(slave.response_mut(), &[0x11, 0x22, 0x33, 0x00]);
    }
}
