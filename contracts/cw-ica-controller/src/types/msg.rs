//! The messages of the contract.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, CosmosMsg};

use super::state::IcaInfo;

#[cw_serde]
pub struct InstantiateMsg {
    /// The owner of this contract and of the interchain account it
    /// controls. Defaults to the sender.
    pub owner: Option<String>,
    /// The contract receiving packet lifecycle callbacks, if any.
    pub send_callbacks_to: Option<String>,
    /// The options of the channel handshake started at instantiation.
    pub channel_open_init_options: options::ChannelOpenInitOptions,
}

#[cw_ownable::cw_ownable_execute]
#[cw_serde]
pub enum ExecuteMsg {
    /// Sends an ordered batch of [`CosmosMsg`] to be executed by the
    /// interchain account on the counterparty chain. Only callable by the
    /// owner while the channel is open. The messages of one call execute
    /// in order and atomically on the host.
    SendCosmosMsgs {
        /// The messages to execute, must not be empty.
        messages: Vec<CosmosMsg>,
        /// Optional memo included in the packet.
        packet_memo: Option<String>,
        /// Optional packet lifetime in seconds. If not specified, the
        /// [default](crate::ibc::types::packet::DEFAULT_TIMEOUT_SECONDS)
        /// is used.
        timeout_seconds: Option<u64>,
    },
    /// Initiates closing of the channel. In-flight packets then resolve
    /// as timeouts. The channel cannot be reopened on this instance.
    CloseChannel {},
    /// Updates the address receiving packet lifecycle callbacks.
    UpdateCallbackAddress {
        /// `None` stops callbacks altogether.
        callback_address: Option<String>,
    },
}

#[cw_ownable::cw_ownable_query]
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// GetChannel returns the channel state.
    #[returns(crate::types::state::ChannelState)]
    GetChannel {},
    /// GetContractState returns the owner, the callback address, and the
    /// ica info.
    #[returns(ContractStateResponse)]
    GetContractState {},
}

#[cw_serde]
pub struct MigrateMsg {}

/// The response to [`QueryMsg::GetContractState`].
#[cw_serde]
pub struct ContractStateResponse {
    /// The current owner of the contract.
    pub owner: Addr,
    /// The address receiving packet lifecycle callbacks, if any.
    pub callback_address: Option<Addr>,
    /// The interchain account, set once the handshake completes.
    pub ica_info: Option<IcaInfo>,
}

pub mod options {
    use cosmwasm_std::IbcOrder;

    use crate::ibc::types::keys::HOST_PORT_ID;

    use super::cw_serde;

    /// The options needed to initialize the channel handshake.
    #[cw_serde]
    pub struct ChannelOpenInitOptions {
        /// The connection id on this chain.
        pub connection_id: String,
        /// The counterparty connection id on the counterparty chain.
        pub counterparty_connection_id: String,
        /// The counterparty port id. Defaults to the ICA host port.
        pub counterparty_port_id: Option<String>,
        /// The ordering of the channel. Defaults to ordered.
        pub channel_ordering: Option<IbcOrder>,
    }

    impl ChannelOpenInitOptions {
        /// Returns the counterparty port id.
        pub fn counterparty_port_id(&self) -> String {
            self.counterparty_port_id
                .clone()
                .unwrap_or_else(|| HOST_PORT_ID.to_string())
        }

        /// Returns the channel ordering.
        pub fn channel_ordering(&self) -> IbcOrder {
            self.channel_ordering.clone().unwrap_or(IbcOrder::Ordered)
        }
    }
}
