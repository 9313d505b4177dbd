//! Contract name, version, and reply ids.

/// The name of the contract for cw2.
pub const CONTRACT_NAME: &str = "crates.io:cw-ica-controller";
/// The version of the contract for cw2.
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Reply ids of the submessages this contract dispatches.
pub mod reply_ids {
    /// `IbcMsg::SendPacket` submessage, replied on success so the
    /// sequence assigned by ibc core can be recorded.
    pub const SEND_PACKET: u64 = 1;
    /// Callback notification submessage, replied on error so a failing
    /// callback contract cannot roll back packet resolution.
    pub const ICA_CALLBACK: u64 = 2;
}
