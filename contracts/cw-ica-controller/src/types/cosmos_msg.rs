//! Converts the supported [`CosmosMsg`] variants to the protobuf `Any`
//! messages executed by the interchain account.

use cosmos_sdk_proto::{
    cosmos::{
        bank::v1beta1::MsgSend,
        base::v1beta1::Coin as ProtoCoin,
        distribution::v1beta1::{MsgSetWithdrawAddress, MsgWithdrawDelegatorReward},
        staking::v1beta1::{MsgBeginRedelegate, MsgDelegate, MsgUndelegate},
    },
    cosmwasm::wasm::v1::MsgExecuteContract,
    prost, Any,
};
use cosmwasm_std::{BankMsg, Coin, CosmosMsg, DistributionMsg, StakingMsg, WasmMsg};
use prost::Message;

use super::ContractError;

/// Converts a [`CosmosMsg`] to a protobuf [`Any`]. `from_address` is the
/// interchain account executing the message on the counterparty chain.
///
/// Stargate messages pass through untouched, so any host chain message
/// can be sent without a dedicated variant here.
#[allow(deprecated)] // stargate is the pre-2.0 name of the `Any` variant
pub fn convert_to_proto_any(msg: CosmosMsg, from_address: &str) -> Result<Any, ContractError> {
    match msg {
        CosmosMsg::Stargate { type_url, value } => Ok(Any {
            type_url,
            value: value.to_vec(),
        }),
        CosmosMsg::Bank(bank_msg) => convert_bank_msg(bank_msg, from_address),
        CosmosMsg::Staking(staking_msg) => convert_staking_msg(staking_msg, from_address),
        CosmosMsg::Distribution(distribution_msg) => {
            convert_distribution_msg(distribution_msg, from_address)
        }
        CosmosMsg::Wasm(wasm_msg) => convert_wasm_msg(wasm_msg, from_address),
        _ => Err(ContractError::UnsupportedCosmosMsg),
    }
}

fn convert_bank_msg(msg: BankMsg, from_address: &str) -> Result<Any, ContractError> {
    match msg {
        BankMsg::Send { to_address, amount } => Ok(Any {
            type_url: "/cosmos.bank.v1beta1.MsgSend".to_string(),
            value: MsgSend {
                from_address: from_address.to_string(),
                to_address,
                amount: convert_coins(amount),
            }
            .encode_to_vec(),
        }),
        _ => Err(ContractError::UnsupportedCosmosMsg),
    }
}

fn convert_staking_msg(msg: StakingMsg, from_address: &str) -> Result<Any, ContractError> {
    match msg {
        StakingMsg::Delegate { validator, amount } => Ok(Any {
            type_url: "/cosmos.staking.v1beta1.MsgDelegate".to_string(),
            value: MsgDelegate {
                delegator_address: from_address.to_string(),
                validator_address: validator,
                amount: Some(convert_coin(amount)),
            }
            .encode_to_vec(),
        }),
        StakingMsg::Undelegate { validator, amount } => Ok(Any {
            type_url: "/cosmos.staking.v1beta1.MsgUndelegate".to_string(),
            value: MsgUndelegate {
                delegator_address: from_address.to_string(),
                validator_address: validator,
                amount: Some(convert_coin(amount)),
            }
            .encode_to_vec(),
        }),
        StakingMsg::Redelegate {
            src_validator,
            dst_validator,
            amount,
        } => Ok(Any {
            type_url: "/cosmos.staking.v1beta1.MsgBeginRedelegate".to_string(),
            value: MsgBeginRedelegate {
                delegator_address: from_address.to_string(),
                validator_src_address: src_validator,
                validator_dst_address: dst_validator,
                amount: Some(convert_coin(amount)),
            }
            .encode_to_vec(),
        }),
        _ => Err(ContractError::UnsupportedCosmosMsg),
    }
}

fn convert_distribution_msg(
    msg: DistributionMsg,
    from_address: &str,
) -> Result<Any, ContractError> {
    match msg {
        DistributionMsg::SetWithdrawAddress { address } => Ok(Any {
            type_url: "/cosmos.distribution.v1beta1.MsgSetWithdrawAddress".to_string(),
            value: MsgSetWithdrawAddress {
                delegator_address: from_address.to_string(),
                withdraw_address: address,
            }
            .encode_to_vec(),
        }),
        DistributionMsg::WithdrawDelegatorReward { validator } => Ok(Any {
            type_url: "/cosmos.distribution.v1beta1.MsgWithdrawDelegatorReward".to_string(),
            value: MsgWithdrawDelegatorReward {
                delegator_address: from_address.to_string(),
                validator_address: validator,
            }
            .encode_to_vec(),
        }),
        _ => Err(ContractError::UnsupportedCosmosMsg),
    }
}

fn convert_wasm_msg(msg: WasmMsg, from_address: &str) -> Result<Any, ContractError> {
    match msg {
        WasmMsg::Execute {
            contract_addr,
            msg,
            funds,
        } => Ok(Any {
            type_url: "/cosmwasm.wasm.v1.MsgExecuteContract".to_string(),
            value: MsgExecuteContract {
                sender: from_address.to_string(),
                contract: contract_addr,
                msg: msg.to_vec(),
                funds: convert_coins(funds),
            }
            .encode_to_vec(),
        }),
        _ => Err(ContractError::UnsupportedCosmosMsg),
    }
}

fn convert_coin(coin: Coin) -> ProtoCoin {
    ProtoCoin {
        denom: coin.denom,
        amount: coin.amount.to_string(),
    }
}

fn convert_coins(coins: Vec<Coin>) -> Vec<ProtoCoin> {
    coins.into_iter().map(convert_coin).collect()
}
