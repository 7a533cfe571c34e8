use core::cell::RefCell;

use atomic::{Atomic, Ordering};
use critical_section::Mutex;
use heapless::Deque;

use crate::{SlaveResult, SlaveStatus};

pub const RESULT_HISTORY_SIZE: usize = 5;

#[cfg(feature = "dump")]
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StateDump {
    pub status: SlaveStatus,
    pub result: SlaveResult,
    pub result_history: [SlaveResult; RESULT_HISTORY_SIZE],
}

/// Shared status/result/abort cell of one slave context.
///
/// Lives outside the context (typically in a `static`) so the application
/// thread can poll the transaction phase and request an abort while the
/// interrupt context owns the buffers. Terminal results of recent
/// transactions are kept in a bounded history for post-mortem inspection.
pub struct SlaveState {
    status: Atomic<SlaveStatus>,
    result: Atomic<SlaveResult>,
    abort: Atomic<bool>,
    history: Mutex<RefCell<Deque<SlaveResult, RESULT_HISTORY_SIZE>>>,
}

impl SlaveState {
    pub const fn new() -> Self {
        Self {
            status: Atomic::new(SlaveStatus::Ready),
            result: Atomic::new(SlaveResult::Unknown),
            abort: Atomic::new(false),
            history: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    pub fn status(&self) -> SlaveStatus {
        self.status.load(Ordering::SeqCst)
    }

    pub fn result(&self) -> SlaveResult {
        self.result.load(Ordering::SeqCst)
    }

    /// Ask the engine to end the current transaction at the next
    /// opportunity. Honored at most once, then cleared.
    pub fn request_abort(&self) {
        self.abort.store(true, Ordering::SeqCst);
    }

    pub(crate) fn take_abort(&self) -> bool {
        self.abort.swap(false, Ordering::SeqCst)
    }

    pub(crate) fn begin_transaction(&self) {
        self.result.store(SlaveResult::Unknown, Ordering::SeqCst);
        self.status.store(SlaveStatus::Busy, Ordering::SeqCst);
    }

    /// Result is stored before status so that an observer seeing `Ready`
    /// always reads the matching result.
    pub(crate) fn finish_transaction(&self, result: SlaveResult) {
        self.add_result_in_history(result);
        self.result.store(result, Ordering::SeqCst);
        self.status.store(SlaveStatus::Ready, Ordering::SeqCst);
    }

    #[cfg(feature = "dump")]
    pub fn dump(&self) -> StateDump {
        let mut history = [SlaveResult::Unknown; RESULT_HISTORY_SIZE];

        critical_section::with(|cs| {
            let h = self.history.borrow_ref(cs);
            deque_into_array(&h, &mut history);
        });

        StateDump {
            status: self.status(),
            result: self.result(),
            result_history: history,
        }
    }

    fn add_result_in_history(&self, result: SlaveResult) {
        critical_section::with(|cs| {
            let mut h = self.history.borrow_ref_mut(cs);
            if h.is_full() {
                h.pop_front();
            }
            h.push_back(result).ok();
        });
    }
}

#[cfg(feature = "dump")]
fn deque_into_array<T: Copy, const N: usize>(d: &Deque<T, N>, arr: &mut [T; N]) {
    let n = d.len();
    let (a, b) = d.as_slices();
    let s = N - n;

    arr[s..s + a.len()].copy_from_slice(a);
    arr[s + a.len()..].copy_from_slice(b);
}
