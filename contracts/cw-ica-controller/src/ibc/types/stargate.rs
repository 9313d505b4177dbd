//! The stargate message starting the channel handshake. CosmWasm has no
//! native `IbcMsg` for channel-open-init, so the message is submitted to
//! ibc core as protobuf.

use anybuf::Anybuf;
use cosmwasm_std::{to_json_string, CosmosMsg, IbcOrder};

use super::metadata::IcaMetadata;

/// Creates the `/ibc.core.channel.v1.MsgChannelOpenInit` submitted by the
/// contract to open an ICA channel on `connection_id`. The version is the
/// ICS-27 metadata built from the connection pair.
#[allow(deprecated)] // stargate is the pre-2.0 name of the `Any` variant
pub fn new_ica_channel_open_init_cosmos_msg(
    contract_address: impl Into<String>,
    connection_id: impl Into<String>,
    counterparty_port_id: impl Into<String>,
    counterparty_connection_id: impl Into<String>,
    ordering: IbcOrder,
) -> CosmosMsg {
    let contract_address = contract_address.into();
    let connection_id = connection_id.into();

    let metadata = IcaMetadata::new(connection_id.clone(), counterparty_connection_id.into());
    let version =
        to_json_string(&metadata).expect("fields are known to be serializable");

    // proto ref: ibc-go/proto/ibc/core/channel/v1/tx.proto
    let counterparty = Anybuf::new()
        .append_string(1, counterparty_port_id.into())
        .append_string(2, "");
    let channel = Anybuf::new()
        .append_int32(1, 1) // State::Init
        .append_int32(2, proto_ordering(ordering))
        .append_message(3, &counterparty)
        // connection_hops is repeated, a single hop encodes as one element
        .append_string(4, &connection_id)
        .append_string(5, &version);
    let msg_channel_open_init = Anybuf::new()
        .append_string(1, format!("wasm.{contract_address}"))
        .append_message(2, &channel)
        .append_string(3, &contract_address);

    CosmosMsg::Stargate {
        type_url: "/ibc.core.channel.v1.MsgChannelOpenInit".to_string(),
        value: msg_channel_open_init.into_vec().into(),
    }
}

/// The `ibc.core.channel.v1.Order` value of an [`IbcOrder`].
fn proto_ordering(ordering: IbcOrder) -> i32 {
    match ordering {
        IbcOrder::Unordered => 1,
        IbcOrder::Ordered => 2,
    }
}

#[cfg(test)]
mod tests {
    use anybuf::Bufany;

    use super::*;

    #[test]
    fn channel_open_init_encodes_port_channel_and_signer() {
        let msg = new_ica_channel_open_init_cosmos_msg(
            "contract-address",
            "connection-0",
            "icahost",
            "connection-1",
            IbcOrder::Ordered,
        );

        #[allow(deprecated)]
        let (type_url, value) = match msg {
            CosmosMsg::Stargate { type_url, value } => (type_url, value),
            o => panic!("unexpected message: {o:?}"),
        };
        assert_eq!(type_url, "/ibc.core.channel.v1.MsgChannelOpenInit");

        let decoded = Bufany::deserialize(&value).unwrap();
        assert_eq!(decoded.string(1), Some("wasm.contract-address".to_string()));
        assert_eq!(decoded.string(3), Some("contract-address".to_string()));

        // nested messages are length-delimited, so they re-deserialize
        let channel_bytes = decoded.bytes(2).unwrap();
        let channel = Bufany::deserialize(&channel_bytes).unwrap();
        assert_eq!(channel.uint64(1), Some(1)); // init
        assert_eq!(channel.uint64(2), Some(2)); // ordered
        assert_eq!(channel.string(4), Some("connection-0".to_string()));

        let version = channel.string(5).unwrap();
        assert!(version.contains(r#""version":"ics27-1""#));
        assert!(version.contains(r#""controller_connection_id":"connection-0""#));
        assert!(version.contains(r#""host_connection_id":"connection-1""#));

        let counterparty_bytes = channel.bytes(3).unwrap();
        let counterparty = Bufany::deserialize(&counterparty_bytes).unwrap();
        assert_eq!(counterparty.string(1), Some("icahost".to_string()));
    }
}
