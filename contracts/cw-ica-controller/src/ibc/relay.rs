//! The packet lifecycle entry points. Acknowledgement and timeout are the
//! only ways an in-flight packet is resolved; both consume the pending
//! packet exactly once and notify the callback contract best effort.

#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    from_json, DepsMut, Env, IbcBasicResponse, IbcPacketAckMsg, IbcPacketReceiveMsg,
    IbcPacketTimeoutMsg, IbcReceiveResponse, Storage, SubMsg,
};

use crate::types::callbacks::IcaControllerCallbackMsg;
use crate::types::keys::reply_ids;
use crate::types::state::{self, PendingPacket};
use crate::types::ContractError;

use super::types::packet::acknowledgement::Data;

/// Resolves a pending packet with the acknowledgement returned by the
/// host. The entry point itself succeeds even when the host reports an
/// application error: that outcome belongs to the callback contract, not
/// to this transaction.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn ibc_packet_ack(
    deps: DepsMut,
    _env: Env,
    msg: IbcPacketAckMsg,
) -> Result<IbcBasicResponse, ContractError> {
    let ack: Data = from_json(&msg.acknowledgement.data)?;
    let sequence = msg.original_packet.sequence;
    let packet = consume_pending(
        deps.storage,
        &msg.original_packet.src.channel_id,
        sequence,
    )?;

    let outcome = match &ack {
        Data::Result(_) => "success",
        Data::Error(_) => "error",
    };
    let resp = IbcBasicResponse::new()
        .add_attribute("action", "ibc_packet_ack")
        .add_attribute("packet_sequence", sequence.to_string())
        .add_attribute("outcome", outcome);

    let callback = IcaControllerCallbackMsg::OnAcknowledgementPacketCallback {
        packet_sequence: sequence,
        ica_acknowledgement: ack,
        original_messages: packet.messages,
    };
    notify(deps, resp, callback)
}

/// Resolves a pending packet that was never acknowledged. On an ordered
/// channel the host chain closes the channel as well; that arrives as a
/// separate close-confirm step.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn ibc_packet_timeout(
    deps: DepsMut,
    _env: Env,
    msg: IbcPacketTimeoutMsg,
) -> Result<IbcBasicResponse, ContractError> {
    let sequence = msg.packet.sequence;
    let packet = consume_pending(deps.storage, &msg.packet.src.channel_id, sequence)?;

    let resp = IbcBasicResponse::new()
        .add_attribute("action", "ibc_packet_timeout")
        .add_attribute("packet_sequence", sequence.to_string())
        .add_attribute("outcome", "timeout");

    let callback = IcaControllerCallbackMsg::OnTimeoutPacketCallback {
        packet_sequence: sequence,
        original_messages: packet.messages,
    };
    notify(deps, resp, callback)
}

/// The host module never sends packets to the controller.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn ibc_packet_receive(
    _deps: DepsMut,
    _env: Env,
    _msg: IbcPacketReceiveMsg,
) -> Result<IbcReceiveResponse, ContractError> {
    unreachable!("the host never sends packets to the controller")
}

/// Removes and returns the pending packet for `(channel_id, sequence)`.
/// Sequences are assigned only to packets this contract sent, so a miss
/// is unreachable short of a relayer replay; replays must not resolve a
/// packet twice.
fn consume_pending(
    storage: &mut dyn Storage,
    channel_id: &str,
    sequence: u64,
) -> Result<PendingPacket, ContractError> {
    let key = (channel_id.to_string(), sequence);
    let packet = state::PENDING_PACKETS
        .may_load(storage, key.clone())?
        .ok_or_else(|| ContractError::PendingPacketNotFound {
            channel_id: channel_id.to_string(),
            sequence,
        })?;
    state::PENDING_PACKETS.remove(storage, key);
    Ok(packet)
}

/// Attaches the best-effort notification to the response. The submessage
/// replies on error only and the reply swallows it, so a failing callback
/// contract cannot roll back the resolution.
fn notify(
    deps: DepsMut,
    resp: IbcBasicResponse,
    callback: IcaControllerCallbackMsg,
) -> Result<IbcBasicResponse, ContractError> {
    let Some(callback_address) = state::STATE.load(deps.storage)?.callback_address else {
        return Ok(resp);
    };

    let callback_msg = callback.into_cosmos_msg(callback_address)?;
    Ok(resp.add_submessage(SubMsg::reply_on_error(
        callback_msg,
        reply_ids::ICA_CALLBACK,
    )))
}
