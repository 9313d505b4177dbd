//! ICS-27 protocol constants.

/// The version of the interchain accounts protocol this contract speaks.
pub const ICA_VERSION: &str = "ics27-1";

/// The port bound by the ICA host module on the counterparty chain.
pub const HOST_PORT_ID: &str = "icahost";
