//! State of the contract, persisted through `cw-storage-plus`.

use cosmwasm_schema::cw_serde;
use cw_storage_plus::{Item, Map};

pub use channel::{ChannelState, ChannelStatus};
pub use contract::{ContractState, IcaInfo};
pub use packet::PendingPacket;

use super::msg::options::ChannelOpenInitOptions;

/// The item used to store the state of the IBC application.
pub const STATE: Item<ContractState> = Item::new("state");
/// The item used to store the state of the channel.
pub const CHANNEL_STATE: Item<ChannelState> = Item::new("channel_state");
/// The item used to store the channel handshake options given at
/// instantiation.
pub const CHANNEL_OPEN_INIT_OPTIONS: Item<ChannelOpenInitOptions> =
    Item::new("channel_open_init_options");
/// Consumed by the one channel-open-init this instance performs. A closed
/// channel is never re-opened on the same instance.
pub const ALLOW_CHANNEL_OPEN_INIT: Item<bool> = Item::new("allow_channel_open_init");
/// Set by an owner's `CloseChannel` call, consumed by the close-init
/// handshake step.
pub const ALLOW_CHANNEL_CLOSE_INIT: Item<bool> = Item::new("allow_channel_close_init");
/// The packet staged by `SendCosmosMsgs` until the send-packet reply
/// reports the sequence assigned by ibc core.
pub const OUTGOING_PACKET: Item<PendingPacket> = Item::new("outgoing_packet");
/// The map of in-flight packets, keyed by `(channel_id, sequence)`.
/// An entry is removed when its packet is acknowledged or times out.
pub const PENDING_PACKETS: Map<(String, u64), PendingPacket> = Map::new("pending_packets");

mod contract {
    use cosmwasm_std::Addr;

    use crate::ibc::types::metadata::TxEncoding;
    use crate::types::ContractError;

    use super::cw_serde;

    /// ContractState is the state of the IBC application.
    #[cw_serde]
    pub struct ContractState {
        /// The address receiving packet lifecycle callbacks, if any.
        pub callback_address: Option<Addr>,
        /// The interchain account, set once the handshake completes.
        pub ica_info: Option<IcaInfo>,
    }

    impl ContractState {
        /// Creates a new ContractState. The ica info is only known once
        /// the handshake completes.
        pub fn new(callback_address: Option<Addr>) -> Self {
            Self {
                callback_address,
                ica_info: None,
            }
        }

        /// Returns the ica info, or an error if the handshake has not
        /// completed.
        pub fn get_ica_info(&self) -> Result<IcaInfo, ContractError> {
            self.ica_info.clone().ok_or(ContractError::IcaInfoNotSet)
        }

        /// Records the interchain account registered by the handshake.
        pub fn set_ica_info(
            &mut self,
            ica_address: impl Into<String>,
            channel_id: impl Into<String>,
            encoding: TxEncoding,
        ) {
            self.ica_info = Some(IcaInfo::new(ica_address, channel_id, encoding));
        }
    }

    /// IcaInfo is the registered interchain account.
    #[cw_serde]
    pub struct IcaInfo {
        /// The account address on the counterparty chain.
        pub ica_address: String,
        /// The channel the account is bound to.
        pub channel_id: String,
        /// The tx encoding negotiated during the handshake.
        pub encoding: TxEncoding,
    }

    impl IcaInfo {
        /// Creates a new [`IcaInfo`].
        pub fn new(
            ica_address: impl Into<String>,
            channel_id: impl Into<String>,
            encoding: TxEncoding,
        ) -> Self {
            Self {
                ica_address: ica_address.into(),
                channel_id: channel_id.into(),
                encoding,
            }
        }
    }
}

mod channel {
    use std::fmt;

    use cosmwasm_std::IbcChannel;

    use super::cw_serde;

    /// ChannelState is the state of the IBC channel.
    #[cw_serde]
    pub struct ChannelState {
        /// The channel as negotiated so far.
        pub channel: IbcChannel,
        /// The handshake status of the channel.
        pub channel_status: ChannelStatus,
    }

    impl ChannelState {
        /// Creates a new [`ChannelState`].
        pub fn new(channel: IbcChannel, channel_status: ChannelStatus) -> Self {
            Self {
                channel,
                channel_status,
            }
        }

        /// Whether the channel is open for packets.
        pub fn is_open(&self) -> bool {
            self.channel_status == ChannelStatus::Open
        }

        /// Marks the channel closed. Status only moves forward; a closed
        /// channel never reopens.
        pub fn close(&mut self) {
            self.channel_status = ChannelStatus::Closed;
        }
    }

    /// The status of a channel, named after the ibc-go channel states.
    #[cw_serde]
    pub enum ChannelStatus {
        #[serde(rename = "STATE_UNINITIALIZED_UNSPECIFIED")]
        Uninitialized,
        #[serde(rename = "STATE_INIT")]
        Init,
        #[serde(rename = "STATE_TRYOPEN")]
        TryOpen,
        #[serde(rename = "STATE_OPEN")]
        Open,
        #[serde(rename = "STATE_CLOSED")]
        Closed,
    }

    impl fmt::Display for ChannelStatus {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            let status = match self {
                Self::Uninitialized => "STATE_UNINITIALIZED_UNSPECIFIED",
                Self::Init => "STATE_INIT",
                Self::TryOpen => "STATE_TRYOPEN",
                Self::Open => "STATE_OPEN",
                Self::Closed => "STATE_CLOSED",
            };
            write!(f, "{status}")
        }
    }
}

mod packet {
    use cosmwasm_std::{CosmosMsg, Timestamp};

    use super::cw_serde;

    /// PendingPacket is an in-flight packet awaiting its acknowledgement
    /// or timeout.
    #[cw_serde]
    pub struct PendingPacket {
        /// The messages carried by the packet, in execution order.
        pub messages: Vec<CosmosMsg>,
        /// The block time the packet was sent at.
        pub created_at: Timestamp,
    }

    impl PendingPacket {
        /// Creates a new [`PendingPacket`].
        pub fn new(messages: Vec<CosmosMsg>, created_at: Timestamp) -> Self {
            Self {
                messages,
                created_at,
            }
        }
    }
}
