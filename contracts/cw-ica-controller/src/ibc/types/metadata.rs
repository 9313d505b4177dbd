//! The ICS-27 channel version metadata. The version string of an ICA
//! channel is this struct as JSON; the host fills in `address` on the
//! open-ack step of the handshake.

use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::IbcChannel;

use crate::types::msg::options::ChannelOpenInitOptions;
use crate::types::ContractError;

use super::keys::ICA_VERSION;

/// IcaMetadata is the channel version negotiated with the host module.
#[cw_serde]
pub struct IcaMetadata {
    /// The protocol version, always [`ICA_VERSION`].
    pub version: String,
    /// The connection id on the controller chain.
    pub controller_connection_id: String,
    /// The connection id on the host chain.
    pub host_connection_id: String,
    /// The interchain account address. Empty until the host registers the
    /// account; carried back in the open-ack version.
    pub address: String,
    /// The encoding of the packet data.
    pub encoding: TxEncoding,
    /// The type of transactions the account executes.
    pub tx_type: TxType,
}

impl IcaMetadata {
    /// Creates a new [`IcaMetadata`].
    pub fn new(
        controller_connection_id: impl Into<String>,
        host_connection_id: impl Into<String>,
    ) -> Self {
        Self {
            version: ICA_VERSION.to_string(),
            controller_connection_id: controller_connection_id.into(),
            host_connection_id: host_connection_id.into(),
            address: String::new(),
            encoding: TxEncoding::Protobuf,
            tx_type: TxType::SdkMultiMsg,
        }
    }

    /// Creates the metadata proposed in the channel-open-init step.
    pub fn from_channel_open_init_options(options: &ChannelOpenInitOptions) -> Self {
        Self::new(
            options.connection_id.clone(),
            options.counterparty_connection_id.clone(),
        )
    }

    /// Validates the metadata against the channel and the handshake
    /// options this contract was instantiated with.
    pub fn validate(
        &self,
        channel: &IbcChannel,
        options: &ChannelOpenInitOptions,
    ) -> Result<(), ContractError> {
        if self.version != ICA_VERSION {
            return Err(ContractError::InvalidVersion {
                expected: ICA_VERSION.to_string(),
                actual: self.version.clone(),
            });
        }
        if !matches!(self.encoding, TxEncoding::Protobuf) {
            return Err(ContractError::UnsupportedPacketEncoding(
                self.encoding.to_string(),
            ));
        }
        if self.controller_connection_id != channel.connection_id
            || self.controller_connection_id != options.connection_id
        {
            return Err(ContractError::InvalidConnection);
        }
        if self.host_connection_id != options.counterparty_connection_id {
            return Err(ContractError::InvalidConnection);
        }
        Ok(())
    }
}

/// The encoding of the packet data, as named by ibc-go.
#[cw_serde]
pub enum TxEncoding {
    /// The only encoding this contract sends.
    #[serde(rename = "proto3")]
    Protobuf,
    /// Recognized during the handshake but rejected as unsupported.
    #[serde(rename = "proto3json")]
    Proto3Json,
}

impl fmt::Display for TxEncoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Protobuf => write!(f, "proto3"),
            Self::Proto3Json => write!(f, "proto3json"),
        }
    }
}

/// The type of transactions the interchain account executes.
#[cw_serde]
pub enum TxType {
    #[serde(rename = "sdk_multi_msg")]
    SdkMultiMsg,
}

#[cfg(test)]
mod tests {
    use cosmwasm_std::testing::mock_ibc_channel;
    use cosmwasm_std::{from_json, to_json_string, IbcOrder};

    use super::*;

    fn options() -> ChannelOpenInitOptions {
        ChannelOpenInitOptions {
            connection_id: "connection-2".to_string(),
            counterparty_connection_id: "connection-1".to_string(),
            counterparty_port_id: None,
            channel_ordering: None,
        }
    }

    #[test]
    fn metadata_json_uses_the_ibc_go_field_names() {
        let metadata = IcaMetadata::new("connection-2", "connection-1");
        let json = to_json_string(&metadata).unwrap();

        assert!(json.contains(r#""version":"ics27-1""#));
        assert!(json.contains(r#""encoding":"proto3""#));
        assert!(json.contains(r#""tx_type":"sdk_multi_msg""#));
        assert!(json.contains(r#""address":"""#));

        let parsed: IcaMetadata = from_json(json.as_bytes()).unwrap();
        assert_eq!(parsed, metadata);
    }

    #[test]
    fn validate_enforces_version_encoding_and_connections() {
        let channel = mock_ibc_channel("channel-0", IbcOrder::Ordered, "");
        let options = options();

        // the mock channel uses connection-2 on our side
        let metadata = IcaMetadata::new("connection-2", "connection-1");
        metadata.validate(&channel, &options).unwrap();

        let mut wrong_version = metadata.clone();
        wrong_version.version = "ics27-2".to_string();
        assert!(matches!(
            wrong_version.validate(&channel, &options).unwrap_err(),
            ContractError::InvalidVersion { .. }
        ));

        let mut wrong_encoding = metadata.clone();
        wrong_encoding.encoding = TxEncoding::Proto3Json;
        assert!(matches!(
            wrong_encoding.validate(&channel, &options).unwrap_err(),
            ContractError::UnsupportedPacketEncoding(_)
        ));

        let mut wrong_connection = metadata.clone();
        wrong_connection.controller_connection_id = "connection-9".to_string();
        assert!(matches!(
            wrong_connection.validate(&channel, &options).unwrap_err(),
            ContractError::InvalidConnection
        ));

        let mut wrong_host_connection = metadata;
        wrong_host_connection.host_connection_id = "connection-9".to_string();
        assert!(matches!(
            wrong_host_connection
                .validate(&channel, &options)
                .unwrap_err(),
            ContractError::InvalidConnection
        ));
    }
}
