//! An 8-register I2C device emulated on top of the slave transaction
//! engine, driven by a scripted master over a simulated bus.
//!
//! Protocol: a host write carries a register index followed by values to
//! store at autoincrementing indices; a host read returns register
//! contents starting at the last written index.

use std::{cell::RefCell, rc::Rc};

use twi_slave::{
    BusController, InterruptLevel, SlaveResult, SlaveState, StatusFlags, Transaction, TwiSlave,
};

const DEVICE_ADDRESS: u8 = 0x3A;
const REGISTER_COUNT: usize = 8;

#[derive(Default)]
struct BusInner {
    flags: StatusFlags,
    data: u8,
    transmitted: Vec<u8>,
}

/// Simulated bus controller; clones share the inner state so the master
/// script keeps a handle while the slave context owns another.
#[derive(Clone, Default)]
struct SimBus(Rc<RefCell<BusInner>>);

impl SimBus {
    fn new() -> Self {
        Self::default()
    }

    fn raise(&self, flags: StatusFlags) {
        self.0.borrow_mut().flags = flags;
    }

    fn feed(&self, byte: u8) {
        self.0.borrow_mut().data = byte;
    }

    fn take_transmitted(&self) -> Vec<u8> {
        std::mem::take(&mut self.0.borrow_mut().transmitted)
    }
}

impl BusController for SimBus {
    fn listen(&mut self, address: u8, level: InterruptLevel) {
        println!("bus: listening on 0x{address:02X} at {level:?} priority");
    }

    fn read_status(&mut self) -> StatusFlags {
        self.0.borrow().flags
    }

    fn read_byte(&mut self) -> u8 {
        self.0.borrow().data
    }

    fn write_byte(&mut self, byte: u8) {
        self.0.borrow_mut().transmitted.push(byte);
    }

    fn acknowledge(&mut self) {}
    fn nack(&mut self) {}
    fn request_response(&mut self) {}
    fn complete_transaction(&mut self) {}
    fn enable_stop_notification(&mut self) {}
    fn disable_stop_notification(&mut self) {}
}

type Slave<'a> = TwiSlave<'a, SimBus, fn(&mut Transaction<'_>), REGISTER_COUNT, REGISTER_COUNT>;

/// Refuse transactions that start with an out-of-range register index.
fn validate_index(t: &mut Transaction<'_>) {
    if t.received().len() == 1 && t.byte() as usize >= REGISTER_COUNT {
        t.abort();
    }
}

fn master_write(bus: &SimBus, slave: &mut Slave<'_>, bytes: &[u8]) -> SlaveResult {
    bus.raise(StatusFlags {
        address_match: true,
        address_phase: true,
        ..Default::default()
    });
    slave.handle_interrupt();

    for &byte in bytes {
        if slave.result() == SlaveResult::Aborted {
            return SlaveResult::Aborted;
        }
        bus.feed(byte);
        bus.raise(StatusFlags {
            data_ready: true,
            ..Default::default()
        });
        slave.handle_interrupt();
    }

    bus.raise(StatusFlags {
        address_match: true,
        ..Default::default()
    });
    slave.handle_interrupt();
    slave.result()
}

fn master_read(bus: &SimBus, slave: &mut Slave<'_>, count: usize) -> Vec<u8> {
    bus.raise(StatusFlags {
        address_match: true,
        address_phase: true,
        direction_transmit: true,
        ..Default::default()
    });
    slave.handle_interrupt();

    for _ in 0..count {
        bus.raise(StatusFlags {
            data_ready: true,
            direction_transmit: true,
            ..Default::default()
        });
        slave.handle_interrupt();
    }

    // The master NACKs the last byte to end the read.
    bus.raise(StatusFlags {
        data_ready: true,
        direction_transmit: true,
        received_nack: true,
        ..Default::default()
    });
    slave.handle_interrupt();

    bus.take_transmitted()
}

fn apply_write(registers: &mut [u8; REGISTER_COUNT], payload: &[u8]) -> usize {
    let index = payload[0] as usize;
    for (offset, &value) in payload[1..].iter().enumerate() {
        if let Some(slot) = registers.get_mut(index + offset) {
            *slot = value;
        }
    }
    index
}

fn main() {
    let bus = SimBus::new();
    let state = SlaveState::new();
    let mut slave: Slave<'_> = TwiSlave::new(bus.clone(), &state, validate_index);
    slave.bind_address(DEVICE_ADDRESS, InterruptLevel::Medium);

    let mut registers = [0u8; REGISTER_COUNT];

    // Store 0xAA/0xBB at registers 2 and 3.
    let result = master_write(&bus, &mut slave, &[0x02, 0xAA, 0xBB]);
    println!("write [02 AA BB] -> {result:?}");
    let index = apply_write(&mut registers, slave.received());
    println!("registers: {registers:02X?}");

    // Stage the registers from the written index and read two back.
    slave.write_response(&registers[index..]);
    let values = master_read(&bus, &mut slave, 2);
    println!("read 2 from index {index} -> {values:02X?} ({:?})", slave.result());

    // An out-of-range index is refused by the byte callback.
    let result = master_write(&bus, &mut slave, &[0x55, 0x01]);
    println!("write [55 01] -> {result:?}");

    println!("state dump: {:?}", state.dump());
}
