//! Server to client packets.
use teraproxy_primitives::{entity::EntityId, skill::SkillId};

use crate::io::{packet::def_packets, registry::PacketEntry};

def_packets! {
    SNpcTargetUserPacket("S_NPC_TARGET_USER") {
        source: EntityId,
        unknown1: u8
    },
    /// A skill went on cooldown.
    SStartCoolTimeSkillPacket("S_START_COOLTIME_SKILL") {
        skill: SkillId,
        cooldown: u32
    }
}

pub fn packets() -> Vec<PacketEntry> {
    vec![
        PacketEntry::of::<SNpcTargetUserPacket>(),
        PacketEntry::of::<SStartCoolTimeSkillPacket>(),
    ]
}
