use std::any::TypeId;

use ahash::{AHashMap, AHashSet};

use super::{
    error::{ConfigError, ConfigResult},
    packet::{Packet, PacketSchema},
    table::MessageTable,
};

/// A compiled-in packet type.
#[derive(Clone, Copy)]
pub struct PacketEntry {
    name: &'static str,
    type_id: TypeId,
    create: fn() -> Box<dyn Packet>,
}

impl PacketEntry {
    pub fn of<P: PacketSchema>() -> Self {
        Self {
            name: P::NAME,
            type_id: TypeId::of::<P>(),
            create: create_packet::<P>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Create a fresh, default-valued packet.
    pub fn create(&self) -> Box<dyn Packet> {
        (self.create)()
    }
}

impl std::fmt::Debug for PacketEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PacketEntry").field(&self.name).finish()
    }
}

fn create_packet<P: PacketSchema>() -> Box<dyn Packet> {
    Box::<P>::default()
}

/// Maps opcodes of the active message table
/// to the packet types that implement them.
#[derive(Debug)]
pub struct OpcodeRegistry {
    entries: AHashMap<u16, PacketEntry>,
}

impl OpcodeRegistry {
    /// Registers every packet in `packets` that has an opcode in
    /// `messages`. Packets missing from the table are skipped.
    pub fn new(
        packets: impl IntoIterator<Item = PacketEntry>,
        messages: &MessageTable,
    ) -> ConfigResult<Self> {
        let mut entries = AHashMap::default();
        let mut seen = AHashSet::default();
        let mut skipped = 0;
        for entry in packets {
            if !seen.insert(entry.name) {
                return Err(ConfigError::DuplicateSchema(entry.name));
            }
            match messages.opcode(entry.name) {
                Some(opcode) => {
                    log::trace!("{} -> {}", entry.name, opcode);
                    entries.insert(opcode, entry);
                }
                None => {
                    log::trace!(
                        "{} has no opcode in {} v{}, skipping",
                        entry.name,
                        messages.region(),
                        messages.version()
                    );
                    skipped += 1;
                }
            }
        }
        let mut unimplemented = 0;
        for (name, opcode) in messages.iter() {
            if !seen.contains(name) {
                log::trace!("{} ({}) has no packet type", name, opcode);
                unimplemented += 1;
            }
        }
        log::debug!(
            "Registered {} packets for {} v{} ({} without opcode, {} messages without packet)",
            entries.len(),
            messages.region(),
            messages.version(),
            skipped,
            unimplemented
        );
        Ok(Self { entries })
    }

    pub fn is_known(&self, opcode: u16) -> bool {
        self.entries.contains_key(&opcode)
    }

    pub fn type_of(&self, opcode: u16) -> Option<TypeId> {
        self.entries.get(&opcode).map(PacketEntry::type_id)
    }

    pub fn name_of(&self, opcode: u16) -> Option<&'static str> {
        self.entries.get(&opcode).map(PacketEntry::name)
    }

    pub fn create(&self, opcode: u16) -> Option<Box<dyn Packet>> {
        self.entries.get(&opcode).map(PacketEntry::create)
    }

    /// Registered opcodes, ascending.
    pub fn opcodes(&self) -> impl Iterator<Item = u16> {
        let mut opcodes: Vec<_> = self.entries.keys().copied().collect();
        opcodes.sort_unstable();
        opcodes.into_iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
