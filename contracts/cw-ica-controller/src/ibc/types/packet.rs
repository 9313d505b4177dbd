//! The ICS-27 packet wire format.

use anybuf::Anybuf;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Binary, CosmosMsg, Env, IbcMsg, IbcTimeout};

use crate::types::cosmos_msg::convert_to_proto_any;
use crate::types::ContractError;

/// Default lifetime of a sent packet, in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 600;

/// The `InterchainAccountPacketData.Type` executing sdk messages.
const EXECUTE_TX: i32 = 1;

/// IcaPacketData carries the payload of an ICS-27
/// `InterchainAccountPacketData`: a protobuf `CosmosTx` with the ordered
/// messages, and a memo surfaced in host chain events.
#[cw_serde]
pub struct IcaPacketData {
    /// The protobuf-encoded `CosmosTx`.
    pub data: Binary,
    /// The packet memo.
    pub memo: String,
}

impl IcaPacketData {
    /// Packs `messages` into a `CosmosTx` executed by the interchain
    /// account, preserving their order. `ica_address` becomes the signer
    /// of every message.
    pub fn from_cosmos_msgs(
        messages: &[CosmosMsg],
        ica_address: &str,
        memo: Option<String>,
    ) -> Result<Self, ContractError> {
        let anys = messages
            .iter()
            .map(|msg| convert_to_proto_any(msg.clone(), ica_address))
            .collect::<Result<Vec<_>, _>>()?;

        let any_bufs: Vec<Anybuf> = anys
            .iter()
            .map(|any| {
                Anybuf::new()
                    .append_string(1, &any.type_url)
                    .append_bytes(2, &any.value)
            })
            .collect();

        // proto ref: ibc-go/proto/ibc/applications/interchain_accounts/v1/packet.proto
        let cosmos_tx = Anybuf::new().append_repeated_message(1, &any_bufs).into_vec();

        Ok(Self {
            data: cosmos_tx.into(),
            memo: memo.unwrap_or_default(),
        })
    }

    /// Encodes the full `InterchainAccountPacketData` envelope.
    pub fn to_proto_bytes(&self) -> Vec<u8> {
        Anybuf::new()
            .append_int32(1, EXECUTE_TX)
            .append_bytes(2, &self.data)
            .append_string(3, &self.memo)
            .into_vec()
    }

    /// Creates the [`IbcMsg::SendPacket`] carrying this packet data.
    pub fn to_ibc_msg(
        &self,
        env: &Env,
        channel_id: impl Into<String>,
        timeout_seconds: Option<u64>,
    ) -> IbcMsg {
        let timeout_timestamp = env
            .block
            .time
            .plus_seconds(timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS));
        IbcMsg::SendPacket {
            channel_id: channel_id.into(),
            data: self.to_proto_bytes().into(),
            timeout: IbcTimeout::with_timestamp(timeout_timestamp),
        }
    }
}

pub mod acknowledgement {
    use super::{cw_serde, Binary};

    /// The acknowledgement returned by the ICA host module, as JSON:
    /// `{"result": <base64>}` when all messages executed, or
    /// `{"error": <text>}` when at least one of them failed on the host.
    #[cw_serde]
    pub enum Data {
        /// The protobuf `TxMsgData` of the executed messages.
        Result(Binary),
        /// The host-side application error.
        Error(String),
    }
}
