//! The callback messages sent to the contract registered with
//! `send_callbacks_to`.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_binary, Addr, CosmosMsg, IbcChannel, StdResult, WasmMsg};

use crate::ibc::types::{metadata::TxEncoding, packet::acknowledgement::Data};

/// The message the controller sends to the callback contract. Receivers
/// expose it as a `ReceiveIcaCallback` variant on their `ExecuteMsg`,
/// see the callback-counter contract.
#[cw_serde]
pub enum IcaControllerCallbackMsg {
    /// Sent when a packet is acknowledged. The acknowledgement data
    /// distinguishes a host-side success from a host-side error.
    OnAcknowledgementPacketCallback {
        /// The sequence the packet was sent with.
        packet_sequence: u64,
        /// The acknowledgement returned by the host chain.
        ica_acknowledgement: Data,
        /// The messages the packet carried, in order.
        original_messages: Vec<CosmosMsg>,
    },
    /// Sent when a packet timed out before being acknowledged.
    OnTimeoutPacketCallback {
        /// The sequence the packet was sent with.
        packet_sequence: u64,
        /// The messages the packet carried, in order.
        original_messages: Vec<CosmosMsg>,
    },
    /// Sent when the channel handshake completes and the interchain
    /// account is registered.
    OnChannelOpenAckCallback {
        /// The negotiated channel.
        channel: IbcChannel,
        /// The address of the interchain account on the counterparty
        /// chain.
        ica_address: String,
        /// The tx encoding negotiated for the channel.
        tx_encoding: TxEncoding,
    },
}

impl IcaControllerCallbackMsg {
    /// Wraps the callback into the receiver's `ReceiveIcaCallback`
    /// execute variant and builds the [`WasmMsg::Execute`] delivering it.
    pub fn into_cosmos_msg(self, callback_address: Addr) -> StdResult<CosmosMsg> {
        /// Tags the callback the way receivers declare it:
        /// `{"receive_ica_callback": ...}`.
        #[cw_serde]
        enum ReceiverExecuteMsg {
            ReceiveIcaCallback(IcaControllerCallbackMsg),
        }

        Ok(WasmMsg::Execute {
            contract_addr: callback_address.into_string(),
            msg: to_json_binary(&ReceiverExecuteMsg::ReceiveIcaCallback(self))?,
            funds: vec![],
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use cosmwasm_std::from_json;

    use super::*;

    #[test]
    fn callback_is_wrapped_for_the_receiver() {
        let callback = IcaControllerCallbackMsg::OnTimeoutPacketCallback {
            packet_sequence: 7,
            original_messages: vec![],
        };

        let msg = callback
            .into_cosmos_msg(Addr::unchecked("callback-contract"))
            .unwrap();

        // a receiver declaring the same variant must be able to parse it
        #[cw_serde]
        enum ReceiverMsg {
            ReceiveIcaCallback(IcaControllerCallbackMsg),
        }

        match msg {
            CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr, msg, ..
            }) => {
                assert_eq!(contract_addr, "callback-contract");
                let ReceiverMsg::ReceiveIcaCallback(callback) = from_json(&msg).unwrap();
                match callback {
                    IcaControllerCallbackMsg::OnTimeoutPacketCallback {
                        packet_sequence, ..
                    } => assert_eq!(packet_sequence, 7),
                    o => panic!("unexpected callback: {o:?}"),
                }
            }
            o => panic!("unexpected message: {o:?}"),
        }
    }
}
