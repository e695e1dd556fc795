use std::{any::TypeId, io::Cursor, sync::Arc};

use teraproxy_primitives::region::Region;

use crate::config::CodecConfig;

use super::{
    error::{ConfigResult, DecodeResult, EncodeResult},
    packet::{known_packets, FieldCache, Packet, PacketField, PacketSchema},
    registry::{OpcodeRegistry, PacketEntry},
    remaining,
    table::MessageTable,
};

/// Converts packets to payloads and back.
///
/// Payloads carry no opcode or length; framing
/// is left to the connection layer.
pub struct PacketSerializer {
    messages: MessageTable,
    registry: OpcodeRegistry,
    fields: FieldCache,
}

impl PacketSerializer {
    /// Creates a serializer for every compiled-in packet.
    pub fn new(messages: MessageTable) -> ConfigResult<Self> {
        Self::with_packets(messages, known_packets())
    }

    /// Creates a serializer for a specific set of packets.
    pub fn with_packets(
        messages: MessageTable,
        packets: impl IntoIterator<Item = PacketEntry>,
    ) -> ConfigResult<Self> {
        let registry = OpcodeRegistry::new(packets, &messages)?;
        Ok(Self {
            fields: FieldCache::new(messages.region()),
            registry,
            messages,
        })
    }

    /// Loads the message table named by `config`.
    pub fn from_config(config: &CodecConfig) -> ConfigResult<Self> {
        Self::new(config.message_table()?)
    }

    pub fn messages(&self) -> &MessageTable {
        &self.messages
    }

    pub fn region(&self) -> Region {
        self.fields.region()
    }

    pub fn is_known(&self, opcode: u16) -> bool {
        self.registry.is_known(opcode)
    }

    pub fn type_of(&self, opcode: u16) -> Option<TypeId> {
        self.registry.type_of(opcode)
    }

    pub fn create(&self, opcode: u16) -> Option<Box<dyn Packet>> {
        self.registry.create(opcode)
    }

    pub fn registry(&self) -> &OpcodeRegistry {
        &self.registry
    }

    /// The opcode `packet` is sent with under the active table.
    /// `None` unless this serializer registered the packet's type.
    pub fn opcode_of(&self, packet: &dyn Packet) -> Option<u16> {
        self.messages
            .opcode(packet.name())
            .filter(|&opcode| self.registry.type_of(opcode) == Some(packet.as_any().type_id()))
    }

    /// The fields of `P` in wire order for this serializer's region.
    pub fn fields_for<P: PacketSchema>(&self) -> Arc<[PacketField<P>]> {
        self.fields.fields_for::<P>()
    }

    /// The smallest payload a `P` can be decoded from.
    pub fn minimum_size<P: PacketSchema>(&self) -> usize {
        self.fields_for::<P>().iter().map(PacketField::min_size).sum()
    }

    /// Serializes `packet`, running its pre-serialize hook first.
    pub fn serialize(&self, packet: &mut dyn Packet) -> EncodeResult<Vec<u8>> {
        packet.on_serialize(self);
        let mut target = Vec::new();
        packet.write_fields(self, &mut target)?;
        Ok(target)
    }

    /// Reads `payload` into `packet`, then runs its post-deserialize hook.
    ///
    /// On error `packet` may be partially populated and should be discarded.
    pub fn deserialize(&self, payload: &[u8], packet: &mut dyn Packet) -> DecodeResult<()> {
        let mut data = Cursor::new(payload);
        packet.read_fields(self, &mut data)?;
        let unread = remaining(&data);
        if unread != 0 {
            log::trace!("{}: {} bytes left unread", packet.name(), unread);
        }
        packet.on_deserialize(self);
        Ok(())
    }

    /// Creates the packet registered for `opcode` and reads `payload` into it.
    /// Returns `Ok(None)` if the opcode is unknown.
    pub fn decode(&self, opcode: u16, payload: &[u8]) -> DecodeResult<Option<Box<dyn Packet>>> {
        let Some(mut packet) = self.create(opcode) else {
            return Ok(None);
        };
        self.deserialize(payload, &mut *packet)?;
        Ok(Some(packet))
    }

    /// Writes the fields of `packet` in wire order.
    pub fn write_fields<P: PacketSchema>(&self, packet: &P, target: &mut Vec<u8>) -> EncodeResult<()> {
        for field in self.fields_for::<P>().iter() {
            field.write(packet, target)?;
        }
        Ok(())
    }

    /// Reads the fields of `packet` in wire order.
    pub fn read_fields<P: PacketSchema>(
        &self,
        packet: &mut P,
        data: &mut Cursor<&[u8]>,
    ) -> DecodeResult<()> {
        for field in self.fields_for::<P>().iter() {
            field.read(packet, data)?;
        }
        Ok(())
    }
}
