//! Interrupt-driven TWI (I2C) slave-mode transaction engine.
//!
//! The engine accepts externally clocked bus events through
//! [`TwiSlave::handle_interrupt`], buffers a bounded number of bytes per
//! transaction and reports a terminal [`SlaveResult`] once the transaction
//! ends. Hardware access goes through the [`BusController`] trait, so the
//! state machine runs unchanged against a register block or a test double.

#![cfg_attr(not(test), no_std)]

mod bus;
mod events;
mod receive_buffer;
mod send_buffer;
mod slave;
mod state;

pub use bus::{BusController, InterruptLevel, StatusFlags};
pub use slave::{Transaction, TwiSlave};
pub use state::SlaveState;

#[cfg(feature = "dump")]
pub use state::StateDump;

/// Transaction phase of a slave context.
///
/// `Busy` holds from address match until the transaction finishes; the
/// application may touch the context's buffers only while `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::NoUninit)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SlaveStatus {
    Ready,
    Busy,
}

/// Terminal outcome of the most recently completed transaction.
///
/// Meaningful once [`SlaveStatus::Ready`] is observed again; while a
/// transaction is in flight the value is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::NoUninit)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SlaveResult {
    Unknown,
    Ok,
    BufferOverflow,
    TransmitCollision,
    BusError,
    Fail,
    Aborted,
}
