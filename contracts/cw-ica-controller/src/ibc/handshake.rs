//! The IBC channel handshake entry points.

#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    from_json, to_json_string, DepsMut, Env, Ibc3ChannelOpenResponse, IbcBasicResponse,
    IbcChannel, IbcChannelCloseMsg, IbcChannelConnectMsg, IbcChannelOpenMsg,
    IbcChannelOpenResponse, SubMsg,
};

use crate::ibc::types::keys::ICA_VERSION;
use crate::ibc::types::metadata::IcaMetadata;
use crate::types::callbacks::IcaControllerCallbackMsg;
use crate::types::keys::reply_ids;
use crate::types::state::{self, ChannelState, ChannelStatus};
use crate::types::ContractError;

/// Handles the `OpenInit` step of the handshake. `OpenTry` belongs to the
/// host chain and is rejected.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn ibc_channel_open(
    deps: DepsMut,
    _env: Env,
    msg: IbcChannelOpenMsg,
) -> Result<IbcChannelOpenResponse, ContractError> {
    match msg {
        IbcChannelOpenMsg::OpenInit { channel } => handshake::open_init(deps, channel),
        IbcChannelOpenMsg::OpenTry { .. } => Err(ContractError::InvalidHandshakeStep),
    }
}

/// Handles the `OpenAck` step of the handshake, registering the
/// interchain account. `OpenConfirm` belongs to the host chain and is
/// rejected.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn ibc_channel_connect(
    deps: DepsMut,
    _env: Env,
    msg: IbcChannelConnectMsg,
) -> Result<IbcBasicResponse, ContractError> {
    match msg {
        IbcChannelConnectMsg::OpenAck {
            channel,
            counterparty_version,
        } => handshake::open_ack(deps, channel, counterparty_version),
        IbcChannelConnectMsg::OpenConfirm { .. } => Err(ContractError::InvalidHandshakeStep),
    }
}

/// Handles the closing of the channel. `CloseInit` is only accepted when
/// the owner requested it through `ExecuteMsg::CloseChannel`.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn ibc_channel_close(
    deps: DepsMut,
    _env: Env,
    msg: IbcChannelCloseMsg,
) -> Result<IbcBasicResponse, ContractError> {
    match msg {
        IbcChannelCloseMsg::CloseInit { channel } => handshake::close_init(deps, channel),
        IbcChannelCloseMsg::CloseConfirm { channel } => handshake::close_confirm(deps, channel),
    }
}

mod handshake {
    use super::{
        from_json, to_json_string, ChannelState, ChannelStatus, ContractError, DepsMut,
        Ibc3ChannelOpenResponse, IbcBasicResponse, IbcChannel, IbcChannelOpenResponse,
        IcaControllerCallbackMsg, IcaMetadata, SubMsg, state, reply_ids, ICA_VERSION,
    };

    /// Validates the proposed channel and records it with status `Init`.
    /// Allowed exactly once per contract instance: a closed channel is
    /// never re-opened, a new instance is required.
    pub fn open_init(
        deps: DepsMut,
        channel: IbcChannel,
    ) -> Result<IbcChannelOpenResponse, ContractError> {
        if !state::ALLOW_CHANNEL_OPEN_INIT
            .may_load(deps.storage)?
            .unwrap_or_default()
        {
            return Err(ContractError::ChannelOpenInitNotAllowed);
        }
        state::ALLOW_CHANNEL_OPEN_INIT.save(deps.storage, &false)?;

        let options = state::CHANNEL_OPEN_INIT_OPTIONS.load(deps.storage)?;
        if channel.order != options.channel_ordering() {
            return Err(ContractError::InvalidChannelOrdering);
        }

        // an empty version asks the contract to propose one
        let metadata = if channel.version.is_empty() {
            IcaMetadata::from_channel_open_init_options(&options)
        } else {
            from_json(channel.version.as_bytes()).map_err(|_| ContractError::InvalidVersion {
                expected: ICA_VERSION.to_string(),
                actual: channel.version.clone(),
            })?
        };
        metadata.validate(&channel, &options)?;

        state::CHANNEL_STATE.save(
            deps.storage,
            &ChannelState::new(channel, ChannelStatus::Init),
        )?;

        Ok(Some(Ibc3ChannelOpenResponse {
            version: to_json_string(&metadata)?,
        }))
    }

    /// Completes the handshake: the counterparty version must carry the
    /// registered account address. On any validation failure the stored
    /// state is left untouched so the relayer can retry or give up.
    pub fn open_ack(
        deps: DepsMut,
        channel: IbcChannel,
        counterparty_version: String,
    ) -> Result<IbcBasicResponse, ContractError> {
        // a late ack, e.g. racing a close, must not resurrect the channel
        let mut channel_state = state::CHANNEL_STATE.load(deps.storage)?;
        if channel_state.channel_status != ChannelStatus::Init {
            return Err(ContractError::InvalidChannelStatus {
                expected: ChannelStatus::Init.to_string(),
                actual: channel_state.channel_status.to_string(),
            });
        }

        let options = state::CHANNEL_OPEN_INIT_OPTIONS.load(deps.storage)?;
        let metadata: IcaMetadata =
            from_json(counterparty_version.as_bytes()).map_err(|_| {
                ContractError::InvalidVersion {
                    expected: ICA_VERSION.to_string(),
                    actual: counterparty_version.clone(),
                }
            })?;
        metadata.validate(&channel, &options)?;
        if metadata.address.is_empty() {
            return Err(ContractError::EmptyIcaAddress);
        }

        let mut contract_state = state::STATE.load(deps.storage)?;
        contract_state.set_ica_info(
            &metadata.address,
            &channel.endpoint.channel_id,
            metadata.encoding.clone(),
        );
        state::STATE.save(deps.storage, &contract_state)?;

        channel_state.channel = channel.clone();
        channel_state.channel_status = ChannelStatus::Open;
        state::CHANNEL_STATE.save(deps.storage, &channel_state)?;

        let mut resp = IbcBasicResponse::new()
            .add_attribute("action", "ibc_channel_connect")
            .add_attribute("channel_id", &channel.endpoint.channel_id)
            .add_attribute("ica_address", &metadata.address);

        if let Some(callback_address) = contract_state.callback_address {
            let callback_msg = IcaControllerCallbackMsg::OnChannelOpenAckCallback {
                channel,
                ica_address: metadata.address,
                tx_encoding: metadata.encoding,
            }
            .into_cosmos_msg(callback_address)?;
            resp = resp.add_submessage(SubMsg::reply_on_error(callback_msg, reply_ids::ICA_CALLBACK));
        }

        Ok(resp)
    }

    /// The channel may only be closed from this side through
    /// `ExecuteMsg::CloseChannel`.
    pub fn close_init(
        deps: DepsMut,
        channel: IbcChannel,
    ) -> Result<IbcBasicResponse, ContractError> {
        if !state::ALLOW_CHANNEL_CLOSE_INIT
            .may_load(deps.storage)?
            .unwrap_or_default()
        {
            return Err(ContractError::ChannelCloseInitNotAllowed);
        }
        state::ALLOW_CHANNEL_CLOSE_INIT.save(deps.storage, &false)?;

        close(deps, channel)
    }

    /// The counterparty closed the channel, e.g. after an ordered channel
    /// packet timed out. In-flight packets are resolved through the
    /// timeout entry point, not here.
    pub fn close_confirm(
        deps: DepsMut,
        channel: IbcChannel,
    ) -> Result<IbcBasicResponse, ContractError> {
        close(deps, channel)
    }

    fn close(deps: DepsMut, channel: IbcChannel) -> Result<IbcBasicResponse, ContractError> {
        let mut channel_state = state::CHANNEL_STATE.load(deps.storage)?;
        channel_state.close();
        state::CHANNEL_STATE.save(deps.storage, &channel_state)?;

        Ok(IbcBasicResponse::new()
            .add_attribute("action", "ibc_channel_close")
            .add_attribute("channel_id", channel.endpoint.channel_id))
    }
}

#[cfg(test)]
mod tests {
    use cosmwasm_std::testing::{
        message_info, mock_dependencies, mock_env, mock_ibc_channel, mock_ibc_channel_close_confirm,
        mock_ibc_channel_close_init, mock_ibc_channel_open_try, MockApi, MockQuerier, MockStorage,
    };
    use cosmwasm_std::{IbcChannelConnectMsg, IbcChannelOpenMsg, IbcOrder, OwnedDeps};

    use crate::contract::instantiate;
    use crate::types::msg::options::ChannelOpenInitOptions;
    use crate::types::msg::InstantiateMsg;

    use super::*;

    const CHANNEL_ID: &str = "channel-0";
    const ICA_ADDRESS: &str = "ica-address-on-host";

    /// The mock channel uses `connection-2` on our side, so the options
    /// must match it for validation to pass.
    fn open_init_options() -> ChannelOpenInitOptions {
        ChannelOpenInitOptions {
            connection_id: "connection-2".to_string(),
            counterparty_connection_id: "connection-1".to_string(),
            counterparty_port_id: None,
            channel_ordering: None,
        }
    }

    fn setup(
        callback_address: Option<String>,
    ) -> OwnedDeps<MockStorage, MockApi, MockQuerier> {
        let mut deps = mock_dependencies();
        let creator = deps.api.addr_make("creator");
        let info = message_info(&creator, &[]);
        instantiate(
            deps.as_mut(),
            mock_env(),
            info,
            InstantiateMsg {
                owner: None,
                send_callbacks_to: callback_address,
                channel_open_init_options: open_init_options(),
            },
        )
        .unwrap();
        deps
    }

    fn counterparty_version(address: &str) -> String {
        let mut metadata = IcaMetadata::new("connection-2", "connection-1");
        metadata.address = address.to_string();
        to_json_string(&metadata).unwrap()
    }

    fn open_init_msg(order: IbcOrder, version: &str) -> IbcChannelOpenMsg {
        IbcChannelOpenMsg::OpenInit {
            channel: mock_ibc_channel(CHANNEL_ID, order, version),
        }
    }

    fn open_ack_msg(version: &str) -> IbcChannelConnectMsg {
        IbcChannelConnectMsg::OpenAck {
            channel: mock_ibc_channel(CHANNEL_ID, IbcOrder::Ordered, ""),
            counterparty_version: version.to_string(),
        }
    }

    /// Runs open-init and open-ack against a fresh contract.
    fn connect(mut deps: DepsMut) {
        ibc_channel_open(
            deps.branch(),
            mock_env(),
            open_init_msg(IbcOrder::Ordered, ""),
        )
        .unwrap();
        ibc_channel_connect(
            deps.branch(),
            mock_env(),
            open_ack_msg(&counterparty_version(ICA_ADDRESS)),
        )
        .unwrap();
    }

    #[test]
    fn open_init_records_the_channel_and_proposes_the_version() {
        let mut deps = setup(None);

        let res = ibc_channel_open(
            deps.as_mut(),
            mock_env(),
            open_init_msg(IbcOrder::Ordered, ""),
        )
        .unwrap();

        let version = res.unwrap().version;
        assert!(version.contains(r#""version":"ics27-1""#));
        assert!(version.contains(r#""encoding":"proto3""#));

        let channel_state = state::CHANNEL_STATE.load(&deps.storage).unwrap();
        assert_eq!(channel_state.channel_status, ChannelStatus::Init);
        assert_eq!(channel_state.channel.endpoint.channel_id, CHANNEL_ID);
    }

    #[test]
    fn open_init_is_allowed_only_once() {
        let mut deps = setup(None);

        ibc_channel_open(
            deps.as_mut(),
            mock_env(),
            open_init_msg(IbcOrder::Ordered, ""),
        )
        .unwrap();

        let err = ibc_channel_open(
            deps.as_mut(),
            mock_env(),
            open_init_msg(IbcOrder::Ordered, ""),
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::ChannelOpenInitNotAllowed));
    }

    #[test]
    fn open_init_enforces_ordering_and_version() {
        let mut deps = setup(None);
        let err = ibc_channel_open(
            deps.as_mut(),
            mock_env(),
            open_init_msg(IbcOrder::Unordered, ""),
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidChannelOrdering));

        // the flag was consumed, set up a fresh instance for the version case
        let mut deps = setup(None);
        let err = ibc_channel_open(
            deps.as_mut(),
            mock_env(),
            open_init_msg(IbcOrder::Ordered, "not-json"),
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidVersion { .. }));
    }

    #[test]
    fn open_try_is_rejected() {
        let mut deps = setup(None);
        let err = ibc_channel_open(
            deps.as_mut(),
            mock_env(),
            mock_ibc_channel_open_try(CHANNEL_ID, IbcOrder::Ordered, "ics27-1"),
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidHandshakeStep));
    }

    #[test]
    fn open_ack_registers_the_interchain_account() {
        let mut deps = setup(None);
        connect(deps.as_mut());

        let channel_state = state::CHANNEL_STATE.load(&deps.storage).unwrap();
        assert!(channel_state.is_open());

        let ica_info = state::STATE
            .load(&deps.storage)
            .unwrap()
            .get_ica_info()
            .unwrap();
        assert_eq!(ica_info.ica_address, ICA_ADDRESS);
        assert_eq!(ica_info.channel_id, CHANNEL_ID);
    }

    #[test]
    fn open_ack_notifies_the_callback_contract() {
        let mut deps = setup(Some(MockApi::default().addr_make("callback").into_string()));

        ibc_channel_open(
            deps.as_mut(),
            mock_env(),
            open_init_msg(IbcOrder::Ordered, ""),
        )
        .unwrap();
        let res = ibc_channel_connect(
            deps.as_mut(),
            mock_env(),
            open_ack_msg(&counterparty_version(ICA_ADDRESS)),
        )
        .unwrap();

        assert_eq!(res.messages.len(), 1);
        assert_eq!(res.messages[0].id, reply_ids::ICA_CALLBACK);
        assert_eq!(
            res.messages[0].reply_on,
            cosmwasm_std::ReplyOn::Error
        );
    }

    #[test]
    fn open_ack_without_address_leaves_state_untouched() {
        let mut deps = setup(None);
        ibc_channel_open(
            deps.as_mut(),
            mock_env(),
            open_init_msg(IbcOrder::Ordered, ""),
        )
        .unwrap();

        let err = ibc_channel_connect(
            deps.as_mut(),
            mock_env(),
            open_ack_msg(&counterparty_version("")),
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::EmptyIcaAddress));

        let channel_state = state::CHANNEL_STATE.load(&deps.storage).unwrap();
        assert_eq!(channel_state.channel_status, ChannelStatus::Init);
        assert!(state::STATE.load(&deps.storage).unwrap().ica_info.is_none());
    }

    #[test]
    fn open_ack_with_malformed_version_leaves_state_untouched() {
        let mut deps = setup(None);
        ibc_channel_open(
            deps.as_mut(),
            mock_env(),
            open_init_msg(IbcOrder::Ordered, ""),
        )
        .unwrap();

        let err = ibc_channel_connect(deps.as_mut(), mock_env(), open_ack_msg("not-json"))
            .unwrap_err();
        assert!(matches!(err, ContractError::InvalidVersion { .. }));

        let channel_state = state::CHANNEL_STATE.load(&deps.storage).unwrap();
        assert_eq!(channel_state.channel_status, ChannelStatus::Init);
    }

    #[test]
    fn late_open_ack_is_rejected() {
        let mut deps = setup(None);
        connect(deps.as_mut());

        // the channel is already open, a second ack must not be applied
        let err = ibc_channel_connect(
            deps.as_mut(),
            mock_env(),
            open_ack_msg(&counterparty_version("other-address")),
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidChannelStatus { .. }));

        let ica_info = state::STATE
            .load(&deps.storage)
            .unwrap()
            .get_ica_info()
            .unwrap();
        assert_eq!(ica_info.ica_address, ICA_ADDRESS);
    }

    #[test]
    fn close_init_requires_the_owner_gate() {
        let mut deps = setup(None);
        connect(deps.as_mut());

        let err = ibc_channel_close(
            deps.as_mut(),
            mock_env(),
            mock_ibc_channel_close_init(CHANNEL_ID, IbcOrder::Ordered, ""),
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::ChannelCloseInitNotAllowed));

        state::ALLOW_CHANNEL_CLOSE_INIT
            .save(deps.as_mut().storage, &true)
            .unwrap();
        ibc_channel_close(
            deps.as_mut(),
            mock_env(),
            mock_ibc_channel_close_init(CHANNEL_ID, IbcOrder::Ordered, ""),
        )
        .unwrap();

        let channel_state = state::CHANNEL_STATE.load(&deps.storage).unwrap();
        assert_eq!(channel_state.channel_status, ChannelStatus::Closed);
    }

    #[test]
    fn close_confirm_marks_the_channel_closed() {
        let mut deps = setup(None);
        connect(deps.as_mut());

        ibc_channel_close(
            deps.as_mut(),
            mock_env(),
            mock_ibc_channel_close_confirm(CHANNEL_ID, IbcOrder::Ordered, ""),
        )
        .unwrap();

        let channel_state = state::CHANNEL_STATE.load(&deps.storage).unwrap();
        assert_eq!(channel_state.channel_status, ChannelStatus::Closed);
        // the registered account stays readable after the close
        assert!(state::STATE.load(&deps.storage).unwrap().ica_info.is_some());
    }
}
