use crate::{
    bus::{BusController, StatusFlags},
    slave::{Transaction, TwiSlave},
    SlaveResult,
};

impl<B, F, const TXBUFSIZE: usize, const RXBUFSIZE: usize> TwiSlave<'_, B, F, TXBUFSIZE, RXBUFSIZE>
where
    B: BusController,
    F: FnMut(&mut Transaction<'_>),
{
    /// Dispatch one latched bus event.
    ///
    /// Call once per hardware event, from a single logical thread; the
    /// handlers run to completion and issue at most one transaction
    /// control command before returning.
    pub fn handle_interrupt(&mut self) {
        let flags = self.bus.read_status();

        if flags.bus_error {
            self.receive_buffer.reset();
            self.send_buffer.rewind();
            self.transaction_finished(SlaveResult::BusError);
        } else if flags.collision {
            self.receive_buffer.reset();
            self.send_buffer.rewind();
            self.transaction_finished(SlaveResult::TransmitCollision);
        } else if flags.address_match && flags.address_phase {
            self.handle_address_match();
        } else if flags.address_match {
            // Same latch without the address qualifier: a stop condition.
            self.handle_stop();
        } else if flags.data_ready {
            self.handle_data(flags);
        } else {
            self.transaction_finished(SlaveResult::Fail);
        }
    }

    /// Entry point of every transaction; rewinds both counters so nothing
    /// carries over from the previous one.
    fn handle_address_match(&mut self) {
        if self.state.take_abort() {
            self.bus.complete_transaction();
            self.transaction_finished(SlaveResult::Aborted);
            return;
        }

        self.state.begin_transaction();
        // The stop path stays off until a data byte moves.
        self.bus.disable_stop_notification();
        self.receive_buffer.reset();
        self.send_buffer.rewind();
        self.bus.acknowledge();
    }

    fn handle_stop(&mut self) {
        self.bus.disable_stop_notification();
        // Release the latch without driving ACK or NACK.
        self.bus.request_response();
        self.transaction_finished(SlaveResult::Ok);
    }

    fn handle_data(&mut self, flags: StatusFlags) {
        if flags.direction_transmit {
            self.handle_transmit(flags);
        } else {
            self.handle_receive();
        }
    }

    /// Master reads: hand one send-buffer byte per event to the bus
    /// controller until the master NACKs or the buffer runs out.
    fn handle_transmit(&mut self, flags: StatusFlags) {
        self.bus.enable_stop_notification();

        // The first byte can never see a NACK because none has been sent yet.
        if self.send_buffer.bytes_sent() > 0 && flags.received_nack {
            self.bus.complete_transaction();
            self.transaction_finished(SlaveResult::Ok);
        } else if let Some(byte) = self.send_buffer.next() {
            self.bus.write_byte(byte);
            self.bus.acknowledge();
        } else {
            self.bus.complete_transaction();
            self.transaction_finished(SlaveResult::BufferOverflow);
        }
    }

    /// Master writes: append one byte per event and run the user callback
    /// on it, synchronously, before acknowledging.
    fn handle_receive(&mut self) {
        self.bus.enable_stop_notification();

        if self.receive_buffer.is_full() {
            self.bus.nack();
            self.bus.complete_transaction();
            self.transaction_finished(SlaveResult::BufferOverflow);
            return;
        }

        let byte = self.bus.read_byte();
        self.receive_buffer.write_byte(byte).ok();

        {
            let Self {
                receive_buffer,
                state,
                on_byte_received,
                ..
            } = self;

            let mut transaction = Transaction {
                byte,
                received: receive_buffer.as_mut_slice(),
                state: *state,
            };
            on_byte_received(&mut transaction);
        }

        if self.state.take_abort() {
            self.bus.complete_transaction();
            self.transaction_finished(SlaveResult::Aborted);
        } else {
            self.bus.acknowledge();
        }
    }

    /// The single funnel every transaction ends through. Buffers and
    /// counters are left untouched for inspection until the next address
    /// match.
    fn transaction_finished(&mut self, result: SlaveResult) {
        self.state.finish_transaction(result);
    }
}
