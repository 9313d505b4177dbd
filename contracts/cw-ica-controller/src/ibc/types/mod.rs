//! The ICS-27 types: protocol constants, channel version metadata, the
//! packet wire format, and the stargate handshake message.

pub mod keys;
pub mod metadata;
pub mod packet;
pub mod stargate;
