//! This module handles the execution logic of the contract.

#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response, StdResult,
};

use crate::ibc::types::stargate::new_ica_channel_open_init_cosmos_msg;
use crate::types::keys;
use crate::types::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::types::state::{self, ContractState};
use crate::types::ContractError;

/// Instantiates the contract and starts the channel handshake.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    cw2::set_contract_version(deps.storage, keys::CONTRACT_NAME, keys::CONTRACT_VERSION)?;

    let owner = msg.owner.unwrap_or_else(|| info.sender.to_string());
    cw_ownable::initialize_owner(deps.storage, deps.api, Some(&owner))?;

    let callback_address = msg
        .send_callbacks_to
        .map(|addr| deps.api.addr_validate(&addr))
        .transpose()?;

    // The ica address is only known once the handshake completes.
    state::STATE.save(deps.storage, &ContractState::new(callback_address))?;

    state::CHANNEL_OPEN_INIT_OPTIONS.save(deps.storage, &msg.channel_open_init_options)?;

    state::ALLOW_CHANNEL_OPEN_INIT.save(deps.storage, &true)?;

    let ica_channel_open_init_msg = new_ica_channel_open_init_cosmos_msg(
        env.contract.address.as_str(),
        msg.channel_open_init_options.connection_id.clone(),
        msg.channel_open_init_options.counterparty_port_id(),
        msg.channel_open_init_options.counterparty_connection_id.clone(),
        msg.channel_open_init_options.channel_ordering(),
    );

    Ok(Response::new().add_message(ica_channel_open_init_msg))
}

/// Handles the execution of the contract.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::SendCosmosMsgs {
            messages,
            packet_memo,
            timeout_seconds,
        } => execute::send_cosmos_msgs(deps, env, info, messages, packet_memo, timeout_seconds),
        ExecuteMsg::CloseChannel {} => execute::close_channel(deps, info),
        ExecuteMsg::UpdateCallbackAddress { callback_address } => {
            execute::update_callback_address(deps, info, callback_address)
        }
        ExecuteMsg::UpdateOwnership(action) => execute::update_ownership(deps, env, info, action),
    }
}

/// Handles the replies to the submessages.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        keys::reply_ids::SEND_PACKET => reply::send_packet(deps, msg.result),
        keys::reply_ids::ICA_CALLBACK => reply::ica_callback(msg.result),
        _ => Err(ContractError::UnknownReplyId(msg.id)),
    }
}

/// Handles the query of the contract.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::GetChannel {} => to_json_binary(&query::channel(deps)?),
        QueryMsg::GetContractState {} => to_json_binary(&query::state(deps)?),
        QueryMsg::Ownership {} => to_json_binary(&cw_ownable::get_ownership(deps.storage)?),
    }
}

/// Migrate contract if version is lower than current version.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    migrate::validate_semver(deps.as_ref())?;
    migrate::validate_channel_encoding(deps.as_ref())?;

    cw2::set_contract_version(deps.storage, keys::CONTRACT_NAME, keys::CONTRACT_VERSION)?;

    Ok(Response::default())
}

mod execute {
    use cosmwasm_std::{CosmosMsg, IbcMsg, SubMsg};

    use crate::ibc::types::packet::IcaPacketData;
    use crate::types::state::{ChannelStatus, PendingPacket};

    use super::{keys, state, ContractError, DepsMut, Env, MessageInfo, Response};

    /// Sends an array of [`CosmosMsg`] to the interchain account. The
    /// packet is staged until the reply reports the assigned sequence.
    #[allow(clippy::needless_pass_by_value)]
    pub fn send_cosmos_msgs(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        messages: Vec<CosmosMsg>,
        packet_memo: Option<String>,
        timeout_seconds: Option<u64>,
    ) -> Result<Response, ContractError> {
        cw_ownable::assert_owner(deps.storage, &info.sender)?;

        if messages.is_empty() {
            return Err(ContractError::EmptyMsgList);
        }

        let channel_state = state::CHANNEL_STATE.load(deps.storage)?;
        if !channel_state.is_open() {
            return Err(ContractError::InvalidChannelStatus {
                expected: ChannelStatus::Open.to_string(),
                actual: channel_state.channel_status.to_string(),
            });
        }

        let ica_info = state::STATE.load(deps.storage)?.get_ica_info()?;

        let ica_packet =
            IcaPacketData::from_cosmos_msgs(&messages, &ica_info.ica_address, packet_memo)?;
        let send_packet_msg = ica_packet.to_ibc_msg(&env, ica_info.channel_id, timeout_seconds);

        state::OUTGOING_PACKET.save(
            deps.storage,
            &PendingPacket::new(messages, env.block.time),
        )?;

        let send_packet_submsg =
            SubMsg::reply_on_success(send_packet_msg, keys::reply_ids::SEND_PACKET);

        Ok(Response::default().add_submessage(send_packet_submsg))
    }

    /// Submits an [`IbcMsg::CloseChannel`]. The close completes through
    /// the close-init handshake step, which this call unlocks.
    #[allow(clippy::needless_pass_by_value)]
    pub fn close_channel(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
        cw_ownable::assert_owner(deps.storage, &info.sender)?;

        let channel_state = state::CHANNEL_STATE.load(deps.storage)?;
        if !channel_state.is_open() {
            return Err(ContractError::InvalidChannelStatus {
                expected: ChannelStatus::Open.to_string(),
                actual: channel_state.channel_status.to_string(),
            });
        }

        state::ALLOW_CHANNEL_CLOSE_INIT.save(deps.storage, &true)?;

        let channel_close_msg = CosmosMsg::Ibc(IbcMsg::CloseChannel {
            channel_id: channel_state.channel.endpoint.channel_id,
        });

        Ok(Response::new().add_message(channel_close_msg))
    }

    /// Updates the address receiving packet lifecycle callbacks.
    #[allow(clippy::needless_pass_by_value)]
    pub fn update_callback_address(
        deps: DepsMut,
        info: MessageInfo,
        callback_address: Option<String>,
    ) -> Result<Response, ContractError> {
        cw_ownable::assert_owner(deps.storage, &info.sender)?;

        let mut contract_state = state::STATE.load(deps.storage)?;

        contract_state.callback_address = callback_address
            .map(|addr| deps.api.addr_validate(&addr))
            .transpose()?;

        state::STATE.save(deps.storage, &contract_state)?;

        Ok(Response::default())
    }

    /// Update the ownership of the contract.
    #[allow(clippy::needless_pass_by_value)]
    pub fn update_ownership(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        action: cw_ownable::Action,
    ) -> Result<Response, ContractError> {
        if action == cw_ownable::Action::RenounceOwnership {
            return Err(ContractError::OwnershipCannotBeRenounced);
        }

        cw_ownable::update_ownership(deps, &env.block, &info.sender, action)?;

        Ok(Response::default())
    }
}

mod reply {
    use cosmwasm_std::SubMsgResult;

    use super::{state, ContractError, DepsMut, Response};

    /// Records the staged packet under the sequence ibc core assigned to
    /// it, reported in the `MsgIbcSendResponse` reply data.
    pub fn send_packet(deps: DepsMut, result: SubMsgResult) -> Result<Response, ContractError> {
        match result {
            SubMsgResult::Ok(resp) => {
                #[allow(deprecated)] // ibc core still reports the sequence in `data`
                let data = resp.data.unwrap_or_default();
                let sequence = anybuf::Bufany::deserialize(&data)?
                    .uint64(1)
                    .ok_or(ContractError::MissingPacketSequence)?;

                let packet = state::OUTGOING_PACKET.load(deps.storage)?;
                state::OUTGOING_PACKET.remove(deps.storage);

                let channel_id = state::STATE.load(deps.storage)?.get_ica_info()?.channel_id;
                state::PENDING_PACKETS.save(
                    deps.storage,
                    (channel_id.clone(), sequence),
                    &packet,
                )?;

                Ok(Response::default()
                    .add_attribute("action", "send_packet")
                    .add_attribute("channel_id", channel_id)
                    .add_attribute("packet_sequence", sequence.to_string()))
            }
            SubMsgResult::Err(err) => Err(ContractError::SubMsgError(err)),
        }
    }

    /// Callback delivery is best effort: an error here must not undo the
    /// packet resolution that queued it.
    pub fn ica_callback(result: SubMsgResult) -> Result<Response, ContractError> {
        match result {
            SubMsgResult::Ok(_) => Ok(Response::default()),
            SubMsgResult::Err(err) => Ok(Response::default()
                .add_attribute("action", "ica_callback")
                .add_attribute("callback_error", err)),
        }
    }
}

mod query {
    use cosmwasm_std::StdError;

    use crate::types::msg::ContractStateResponse;
    use crate::types::state::ChannelState;

    use super::{state, Deps, StdResult};

    /// Returns the saved channel state.
    pub fn channel(deps: Deps) -> StdResult<ChannelState> {
        state::CHANNEL_STATE.load(deps.storage)
    }

    /// Returns the contract state together with the owner.
    pub fn state(deps: Deps) -> StdResult<ContractStateResponse> {
        let contract_state = state::STATE.load(deps.storage)?;
        let owner = cw_ownable::get_ownership(deps.storage)?
            .owner
            .ok_or_else(|| StdError::not_found("owner"))?;

        Ok(ContractStateResponse {
            owner,
            callback_address: contract_state.callback_address,
            ica_info: contract_state.ica_info,
        })
    }
}

mod migrate {
    use crate::ibc::types::metadata::TxEncoding;

    use super::{keys, state, ContractError, Deps};

    /// Validate that the contract version is semver compliant
    /// and greater than the previous version.
    pub fn validate_semver(deps: Deps) -> Result<(), ContractError> {
        let prev_cw2_version = cw2::get_contract_version(deps.storage)?;
        if prev_cw2_version.contract != keys::CONTRACT_NAME {
            return Err(ContractError::InvalidMigrationVersion {
                expected: keys::CONTRACT_NAME.to_string(),
                actual: prev_cw2_version.contract,
            });
        }

        let version: semver::Version = keys::CONTRACT_VERSION.parse()?;
        let prev_version: semver::Version = prev_cw2_version.version.parse()?;
        if prev_version >= version {
            return Err(ContractError::InvalidMigrationVersion {
                expected: format!("> {prev_version}"),
                actual: keys::CONTRACT_VERSION.to_string(),
            });
        }
        Ok(())
    }

    /// Validate that the channel encoding is protobuf if set.
    pub fn validate_channel_encoding(deps: Deps) -> Result<(), ContractError> {
        if let Some(ica_info) = state::STATE.load(deps.storage)?.ica_info {
            if !matches!(ica_info.encoding, TxEncoding::Protobuf) {
                return Err(ContractError::UnsupportedPacketEncoding(
                    ica_info.encoding.to_string(),
                ));
            }
        }

        Ok(())
    }
}
