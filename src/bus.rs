/// Interrupt priority the bus controller arms address-match and data
/// events with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptLevel {
    Off,
    Low,
    Medium,
    High,
}

/// One snapshot of the bus controller's latched event flags.
///
/// `address_phase` qualifies `address_match`: set means a master addressed
/// this device, clear means the same latch fired for a stop condition.
/// `received_nack` reflects the master's acknowledge bit for the byte this
/// device transmitted last.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusFlags {
    pub bus_error: bool,
    pub collision: bool,
    pub address_match: bool,
    pub address_phase: bool,
    pub data_ready: bool,
    pub direction_transmit: bool,
    pub received_nack: bool,
}

/// The physical TWI slave interface as the transaction engine sees it.
///
/// Implementations wrap a register block; the engine issues at most one
/// transaction-control command per dispatched event.
pub trait BusController {
    /// One-time arm: set the 7-bit device address and enable address-match
    /// and data interrupts at the given priority.
    fn listen(&mut self, address: u8, level: InterruptLevel);

    /// Snapshot the latched event flags for one dispatch.
    fn read_status(&mut self) -> StatusFlags;

    /// Fetch the byte the master placed in the data register.
    fn read_byte(&mut self) -> u8;

    /// Stage a byte in the data register for the master to clock out.
    fn write_byte(&mut self, byte: u8);

    /// Drive ACK and wait for the next byte event.
    fn acknowledge(&mut self);

    /// Select NACK as the response to the current byte.
    fn nack(&mut self);

    /// Release the bus for the next event without driving ACK or NACK.
    fn request_response(&mut self);

    /// End the transaction and wait for the next address match.
    fn complete_transaction(&mut self);

    /// Route stop conditions to the event interrupt.
    fn enable_stop_notification(&mut self);

    fn disable_stop_notification(&mut self);
}

impl<B: BusController + ?Sized> BusController for &mut B {
    fn listen(&mut self, address: u8, level: InterruptLevel) {
        B::listen(self, address, level)
    }

    fn read_status(&mut self) -> StatusFlags {
        B::read_status(self)
    }

    fn read_byte(&mut self) -> u8 {
        B::read_byte(self)
    }

    fn write_byte(&mut self, byte: u8) {
        B::write_byte(self, byte)
    }

    fn acknowledge(&mut self) {
        B::acknowledge(self)
    }

    fn nack(&mut self) {
        B::nack(self)
    }

    fn request_response(&mut self) {
        B::request_response(self)
    }

    fn complete_transaction(&mut self) {
        B::complete_transaction(self)
    }

    fn enable_stop_notification(&mut self) {
        B::enable_stop_notification(self)
    }

    fn disable_stop_notification(&mut self) {
        B::disable_stop_notification(self)
    }
}
