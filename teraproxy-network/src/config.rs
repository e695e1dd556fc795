//! Serializer configuration.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use teraproxy_primitives::region::Region;

use crate::io::{
    error::{ConfigError, ConfigResult},
    table::MessageTable,
};

/// Selects the message table the serializer runs with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// The region the proxy is deployed in.
    pub region: Region,
    /// The protocol version.
    pub version: u32,
    /// Map file of the message table. Relative paths are
    /// resolved against the directory of the config file.
    pub message_table: PathBuf,
}

impl CodecConfig {
    /// Loads a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        let mut config = Self::from_json(&source)?;
        if config.message_table.is_relative() {
            if let Some(dir) = path.parent() {
                config.message_table = dir.join(&config.message_table);
            }
        }
        Ok(config)
    }

    pub fn from_json(source: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Reads the message table this config points at.
    pub fn message_table(&self) -> ConfigResult<MessageTable> {
        MessageTable::from_file(self.region, self.version, &self.message_table)
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use tempfile::tempdir;

    use teraproxy_primitives::region::Region;

    use crate::{
        io::{error::ConfigError, packet::client::CExtendPartyPacket},
        PacketSerializer,
    };

    use super::CodecConfig;

    #[test]
    fn parse_json() {
        let config = CodecConfig::from_json(
            r#"{ "region": "EU", "version": 366001, "message_table": "protocol.366001.map" }"#,
        )
        .unwrap();
        assert_eq!(config.region, Region::Eu);
        assert_eq!(config.version, 366001);
        assert_eq!(config.message_table, PathBuf::from("protocol.366001.map"));

        assert!(matches!(
            CodecConfig::from_json(r#"{ "region": "XX", "version": 1, "message_table": "a" }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn load_serializer_from_files() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("protocol.map"),
            "C_EXTEND_PARTY = 4321\nS_UNKNOWN_TO_US = 1\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("config.json"),
            r#"{ "region": "KR", "version": 100, "message_table": "protocol.map" }"#,
        )
        .unwrap();

        let config = CodecConfig::load(dir.path().join("config.json")).unwrap();
        assert_eq!(config.message_table, dir.path().join("protocol.map"));

        let serializer = PacketSerializer::from_config(&config).unwrap();
        assert_eq!(serializer.region(), Region::Kr);
        assert_eq!(serializer.messages().version(), 100);
        assert!(serializer.is_known(4321));
        assert!(!serializer.is_known(1));
        assert!(serializer.create(4321).unwrap().is::<CExtendPartyPacket>());
    }

    #[test]
    fn duplicate_opcode_aborts_startup() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("protocol.map"),
            "C_EXTEND_PARTY = 7\nS_NPC_TARGET_USER = 7\n",
        )
        .unwrap();
        let config = CodecConfig {
            region: Region::Na,
            version: 1,
            message_table: dir.path().join("protocol.map"),
        };
        assert!(matches!(
            PacketSerializer::from_config(&config),
            Err(ConfigError::DuplicateOpCode { opcode: 7, .. })
        ));
    }
}
