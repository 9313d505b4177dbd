//! Helpers for interacting with this contract from other contracts.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_binary, Addr, CosmosMsg, QuerierWrapper, StdResult, WasmMsg};

use crate::types::msg::{ContractStateResponse, ExecuteMsg, QueryMsg};
use crate::types::state::ChannelState;

/// CwIcaControllerContract is a wrapper around Addr that provides helpers
/// for working with a deployed controller.
#[cw_serde]
pub struct CwIcaControllerContract(pub Addr);

impl CwIcaControllerContract {
    /// Creates a new [`CwIcaControllerContract`].
    pub fn new(addr: Addr) -> Self {
        Self(addr)
    }

    /// Returns the address of the contract.
    pub fn addr(&self) -> Addr {
        self.0.clone()
    }

    /// Creates a [`WasmMsg::Execute`] against the contract.
    pub fn call(&self, msg: impl Into<ExecuteMsg>) -> StdResult<CosmosMsg> {
        let msg = to_json_binary(&msg.into())?;
        Ok(WasmMsg::Execute {
            contract_addr: self.addr().into(),
            msg,
            funds: vec![],
        }
        .into())
    }

    /// Queries the channel state of the contract.
    pub fn query_channel(&self, querier: QuerierWrapper) -> StdResult<ChannelState> {
        querier.query_wasm_smart(self.addr(), &QueryMsg::GetChannel {})
    }

    /// Queries the contract state, including the registered interchain
    /// account.
    pub fn query_state(&self, querier: QuerierWrapper) -> StdResult<ContractStateResponse> {
        querier.query_wasm_smart(self.addr(), &QueryMsg::GetContractState {})
    }
}

#[cfg(test)]
mod tests {
    use cosmwasm_std::{coin, from_json, StakingMsg};

    use super::*;

    #[test]
    fn call_wraps_the_execute_msg() {
        let contract = CwIcaControllerContract::new(Addr::unchecked("controller"));

        let msg = ExecuteMsg::SendCosmosMsgs {
            messages: vec![StakingMsg::Delegate {
                validator: "validator".to_string(),
                amount: coin(1, "stake"),
            }
            .into()],
            packet_memo: None,
            timeout_seconds: None,
        };
        let cosmos_msg = contract.call(msg.clone()).unwrap();

        match cosmos_msg {
            CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr, msg: wrapped, ..
            }) => {
                assert_eq!(contract_addr, "controller");
                let parsed: ExecuteMsg = from_json(&wrapped).unwrap();
                assert_eq!(parsed, msg);
            }
            o => panic!("unexpected message: {o:?}"),
        }
    }
}
