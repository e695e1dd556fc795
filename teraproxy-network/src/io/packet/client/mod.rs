//! Client to server packets.
use crate::io::{packet::def_packets, registry::PacketEntry};

def_packets! {
    CAvailableEventMatchingListPacket("C_AVAILABLE_EVENT_MATCHING_LIST") {
        unknown1: u8
    },
    /// Turns the current party into a raid, or back.
    CExtendPartyPacket("C_EXTEND_PARTY") {
        is_raid: bool
    }
}

pub fn packets() -> Vec<PacketEntry> {
    vec![
        PacketEntry::of::<CAvailableEventMatchingListPacket>(),
        PacketEntry::of::<CExtendPartyPacket>(),
    ]
}
