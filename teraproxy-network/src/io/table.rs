//! Message tables: the name to opcode mapping
//! of one protocol version in one region.
use std::path::Path;

use ahash::AHashMap;
use teraproxy_primitives::region::Region;

use super::error::{ConfigError, ConfigResult};

/// The active mapping from message names to opcodes.
///
/// No two names share an opcode and no name
/// appears twice; construction fails otherwise.
#[derive(Debug, Clone)]
pub struct MessageTable {
    region: Region,
    version: u32,
    name_to_opcode: AHashMap<String, u16>,
    opcode_to_name: AHashMap<u16, String>,
}

impl MessageTable {
    pub fn new<N: Into<String>>(
        region: Region,
        version: u32,
        mapping: impl IntoIterator<Item = (N, u16)>,
    ) -> ConfigResult<Self> {
        let mut name_to_opcode = AHashMap::default();
        let mut opcode_to_name: AHashMap<u16, String> = AHashMap::default();
        for (name, opcode) in mapping {
            let name = name.into();
            if name_to_opcode.contains_key(&name) {
                return Err(ConfigError::DuplicateName(name));
            }
            if let Some(first) = opcode_to_name.get(&opcode) {
                return Err(ConfigError::DuplicateOpCode {
                    opcode,
                    first: first.clone(),
                    second: name,
                });
            }
            name_to_opcode.insert(name.clone(), opcode);
            opcode_to_name.insert(opcode, name);
        }
        Ok(Self {
            region,
            version,
            name_to_opcode,
            opcode_to_name,
        })
    }

    /// Parses a map file. Each line holds `NAME = OPCODE`
    /// or `NAME OPCODE`; `#` starts a comment.
    pub fn parse(region: Region, version: u32, source: &str) -> ConfigResult<Self> {
        let mut mapping = vec![];
        for (i, line) in source.lines().enumerate() {
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            mapping.push(parse_line(line).map_err(|reason| ConfigError::Parse {
                line: i + 1,
                reason,
            })?);
        }
        Self::new(region, version, mapping)
    }

    /// Reads and parses the map file at `path`.
    pub fn from_file(region: Region, version: u32, path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        let table = Self::parse(region, version, &source)?;
        log::debug!(
            "Loaded {} messages for {} v{} from {:?}",
            table.len(),
            region,
            version,
            path
        );
        Ok(table)
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn opcode(&self, name: &str) -> Option<u16> {
        self.name_to_opcode.get(name).copied()
    }

    pub fn name(&self, opcode: u16) -> Option<&str> {
        self.opcode_to_name.get(&opcode).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.name_to_opcode.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_to_opcode.is_empty()
    }

    /// All `(name, opcode)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.name_to_opcode.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

fn parse_line(line: &str) -> Result<(String, u16), String> {
    let (name, opcode) = match line.split_once('=') {
        Some((name, opcode)) => (name.trim(), opcode.trim()),
        None => {
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(name), Some(opcode), None) => (name, opcode),
                _ => return Err(format!("expected `NAME = OPCODE`, got {line:?}")),
            }
        }
    };
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(format!("invalid message name {name:?}"));
    }
    let opcode = opcode
        .parse::<u16>()
        .map_err(|e| format!("invalid opcode {opcode:?}: {e}"))?;
    Ok((name.to_owned(), opcode))
}
