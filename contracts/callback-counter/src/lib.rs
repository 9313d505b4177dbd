//! # callback-counter
//!
//! A minimal observer contract for the cw-ica-controller: it counts the
//! packet lifecycle callbacks it receives, one increment per resolved
//! packet.

pub mod contract;
pub mod error;
pub mod msg;
pub mod state;

pub use error::ContractError;
