//! The IBC side of the contract: handshake and packet lifecycle entry
//! points, and the ICS-27 wire types.

pub mod handshake;
pub mod relay;
pub mod types;
