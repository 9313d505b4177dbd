use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    OwnershipError(#[from] cw_ownable::OwnershipError),

    #[error("{0}")]
    SemverError(#[from] semver::Error),

    #[error("error deserializing protobuf: {0:?}")]
    BufanyError(#[from] anybuf::BufanyError),

    #[error("submessage error: {0}")]
    SubMsgError(String),

    #[error("this contract must have an owner")]
    OwnershipCannotBeRenounced,

    #[error("invalid migration version: expected {expected}, got {actual}")]
    InvalidMigrationVersion { expected: String, actual: String },

    #[error("message list cannot be empty")]
    EmptyMsgList,

    #[error("unsupported CosmosMsg: only messages the host account can execute may be sent")]
    UnsupportedCosmosMsg,

    #[error("invalid channel ordering")]
    InvalidChannelOrdering,

    #[error("invalid interchain accounts version: expected {expected}, got {actual}")]
    InvalidVersion { expected: String, actual: String },

    #[error("unsupported packet encoding: {0}")]
    UnsupportedPacketEncoding(String),

    #[error("connection id does not match the channel's connection")]
    InvalidConnection,

    #[error("handshake acknowledgement carries no interchain account address")]
    EmptyIcaAddress,

    #[error("ica information is not set")]
    IcaInfoNotSet,

    #[error("invalid channel status: expected {expected}, got {actual}")]
    InvalidChannelStatus { expected: String, actual: String },

    #[error("channel open init is not allowed: a closed channel needs a new contract instance")]
    ChannelOpenInitNotAllowed,

    #[error("channel close init is not allowed: use the CloseChannel execute message")]
    ChannelCloseInitNotAllowed,

    #[error("open try and open confirm are handshake steps of the host chain")]
    InvalidHandshakeStep,

    #[error("packet sequence missing from the send response")]
    MissingPacketSequence,

    #[error("no pending packet for channel {channel_id} and sequence {sequence}")]
    PendingPacketNotFound { channel_id: String, sequence: u64 },

    #[error("unknown reply id: {0}")]
    UnknownReplyId(u64),
}
