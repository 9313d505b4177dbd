use cosmwasm_schema::cw_serde;
use cw_storage_plus::Item;

/// The item used to store the callback counter.
pub const CALLBACK_COUNTER: Item<CallbackCounter> = Item::new("callback_counter");

/// Counts the resolved packets reported by the controller. Exactly one
/// of the counters is incremented per packet, and counters only grow.
#[cw_serde]
#[derive(Default)]
pub struct CallbackCounter {
    /// The host executed all messages of the packet.
    pub success: u64,
    /// The host returned an application error for the packet.
    pub error: u64,
    /// The packet timed out before being acknowledged.
    pub timeout: u64,
}

impl CallbackCounter {
    /// Increments the success counter.
    pub fn success(&mut self) {
        self.success = self.success.saturating_add(1);
    }

    /// Increments the error counter.
    pub fn error(&mut self) {
        self.error = self.error.saturating_add(1);
    }

    /// Increments the timeout counter.
    pub fn timeout(&mut self) {
        self.timeout = self.timeout.saturating_add(1);
    }
}
