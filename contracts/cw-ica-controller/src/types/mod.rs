//! The types used by the contract: messages, state, errors, and the
//! `CosmosMsg` to protobuf codec.

pub mod callbacks;
pub mod cosmos_msg;
mod error;
pub mod keys;
pub mod msg;
pub mod state;

pub use error::ContractError;
