//! This module handles the execution logic of the contract.

#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};

use cw_ica_controller::ibc::types::packet::acknowledgement::Data;
use cw_ica_controller::types::callbacks::IcaControllerCallbackMsg;

use crate::error::ContractError;
use crate::msg::{ExecuteMsg, InstantiateMsg, QueryMsg};
use crate::state::{CallbackCounter, CALLBACK_COUNTER};

// version info for migration info
const CONTRACT_NAME: &str = "crates.io:callback-counter";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Instantiates the contract with a zeroed counter.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    _msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    cw2::set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    CALLBACK_COUNTER.save(deps.storage, &CallbackCounter::default())?;

    Ok(Response::default())
}

/// Handles the execution of the contract.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::ReceiveIcaCallback(callback_msg) => {
            execute::ica_callback_handler(deps, callback_msg)
        }
    }
}

/// Handles the query of the contract.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::GetCallbackCounter {} => to_json_binary(&query::callback_counter(deps)?),
    }
}

mod execute {
    use super::{
        ContractError, Data, DepsMut, IcaControllerCallbackMsg, Response, CALLBACK_COUNTER,
    };

    /// Increments exactly one counter per packet callback. The channel
    /// open-ack callback is acknowledged without counting: it reports a
    /// handshake, not a packet.
    pub fn ica_callback_handler(
        deps: DepsMut,
        callback_msg: IcaControllerCallbackMsg,
    ) -> Result<Response, ContractError> {
        match callback_msg {
            IcaControllerCallbackMsg::OnAcknowledgementPacketCallback {
                packet_sequence,
                ica_acknowledgement,
                ..
            } => {
                let outcome = match ica_acknowledgement {
                    Data::Result(_) => {
                        CALLBACK_COUNTER.update::<_, ContractError>(deps.storage, |mut counter| {
                            counter.success();
                            Ok(counter)
                        })?;
                        "success"
                    }
                    Data::Error(_) => {
                        CALLBACK_COUNTER.update::<_, ContractError>(deps.storage, |mut counter| {
                            counter.error();
                            Ok(counter)
                        })?;
                        "error"
                    }
                };

                Ok(Response::default()
                    .add_attribute("action", "ica_callback")
                    .add_attribute("packet_sequence", packet_sequence.to_string())
                    .add_attribute("outcome", outcome))
            }
            IcaControllerCallbackMsg::OnTimeoutPacketCallback {
                packet_sequence, ..
            } => {
                CALLBACK_COUNTER.update::<_, ContractError>(deps.storage, |mut counter| {
                    counter.timeout();
                    Ok(counter)
                })?;

                Ok(Response::default()
                    .add_attribute("action", "ica_callback")
                    .add_attribute("packet_sequence", packet_sequence.to_string())
                    .add_attribute("outcome", "timeout"))
            }
            IcaControllerCallbackMsg::OnChannelOpenAckCallback { ica_address, .. } => {
                Ok(Response::default()
                    .add_attribute("action", "ica_callback")
                    .add_attribute("ica_address", ica_address))
            }
        }
    }
}

mod query {
    use super::{CallbackCounter, Deps, StdResult, CALLBACK_COUNTER};

    /// Returns the callback counter.
    pub fn callback_counter(deps: Deps) -> StdResult<CallbackCounter> {
        CALLBACK_COUNTER.load(deps.storage)
    }
}
