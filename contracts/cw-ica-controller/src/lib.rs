//! # cw-ica-controller
//!
//! An ICS-27 interchain accounts controller written as a CosmWasm contract.
//! The contract opens an ICA channel during instantiation, registers the
//! interchain account on the counterparty chain, and relays batches of
//! [`cosmwasm_std::CosmosMsg`] to that account. Packet outcomes (success,
//! host-side error, timeout) are reported to an optional callback contract.

pub mod contract;
pub mod helpers;
pub mod ibc;
pub mod types;
