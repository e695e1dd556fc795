use std::{fmt::Debug, io::Cursor, sync::Arc};

use teraproxy_primitives::region::Region;
use teraproxy_utils::typemap::TypeCache;

use crate::io::{
    error::{DecodeResult, EncodeResult},
    WireType,
};

use super::PacketSchema;

type WriteFn<P> = fn(&P, &mut Vec<u8>) -> EncodeResult<()>;
type ReadFn<P> = fn(&mut P, &mut Cursor<&[u8]>) -> DecodeResult<()>;

/// One serializable field of the packet type `P`.
pub struct PacketField<P> {
    name: &'static str,
    regions: &'static [Region],
    wire_type: WireType,
    min_size: usize,
    write: WriteFn<P>,
    read: ReadFn<P>,
}

impl<P> PacketField<P> {
    pub fn new(
        name: &'static str,
        regions: &'static [Region],
        wire_type: WireType,
        min_size: usize,
        write: WriteFn<P>,
        read: ReadFn<P>,
    ) -> Self {
        debug_assert!(
            wire_type.fixed_size().map_or(true, |size| size == min_size),
            "{name}: minimum size {min_size} disagrees with {wire_type:?}"
        );
        Self {
            name,
            regions,
            wire_type,
            min_size,
            write,
            read,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Regions this field exists in. Empty means all of them.
    pub fn regions(&self) -> &'static [Region] {
        self.regions
    }

    pub fn wire_type(&self) -> WireType {
        self.wire_type
    }

    pub fn min_size(&self) -> usize {
        self.min_size
    }

    pub fn applies_to(&self, region: Region) -> bool {
        self.regions.is_empty() || self.regions.contains(&region)
    }

    /// Encode this field of `packet` to `target`.
    pub fn write(&self, packet: &P, target: &mut Vec<u8>) -> EncodeResult<()> {
        (self.write)(packet, target)
    }

    /// Decode this field from `data` into `packet`.
    pub fn read(&self, packet: &mut P, data: &mut Cursor<&[u8]>) -> DecodeResult<()> {
        (self.read)(packet, data)
    }
}

impl<P> Clone for PacketField<P> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<P> Copy for PacketField<P> {}

impl<P> Debug for PacketField<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacketField")
            .field("name", &self.name)
            .field("regions", &self.regions)
            .field("wire_type", &self.wire_type)
            .finish()
    }
}

/// Per-type field lists, filtered for one region.
pub struct FieldCache {
    region: Region,
    cache: TypeCache,
}

impl FieldCache {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            cache: TypeCache::new(),
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// The fields of `P` that exist in this cache's region,
    /// in wire order. Computed on first use.
    pub fn fields_for<P: PacketSchema>(&self) -> Arc<[PacketField<P>]> {
        let cached = self.cache.get_or_insert_with::<P, Arc<[PacketField<P>]>>(|| {
            let declared = P::declared_fields();
            let total = declared.len();
            let fields: Arc<[_]> = declared
                .into_iter()
                .filter(|f| f.applies_to(self.region))
                .collect();
            log::trace!(
                "{}: {} of {} fields apply to {}",
                P::NAME,
                fields.len(),
                total,
                self.region
            );
            fields
        });
        Arc::clone(&cached)
    }

    /// Number of packet types cached so far.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use teraproxy_primitives::region::Region;

    use crate::io::{
        packet::{
            client::CExtendPartyPacket,
            test_packets::{STestEmpty, STestInventory},
        },
        WireType,
    };

    use super::FieldCache;

    fn names<P>(fields: &[super::PacketField<P>]) -> Vec<&'static str> {
        fields.iter().map(|f| f.name()).collect()
    }

    #[test]
    fn declaration_order_and_region_filter() {
        let eu = FieldCache::new(Region::Eu);
        assert_eq!(
            names(&eu.fields_for::<STestInventory>()),
            ["item_count", "items", "gold", "owner"]
        );

        let kr = FieldCache::new(Region::Kr);
        assert_eq!(
            names(&kr.fields_for::<STestInventory>()),
            ["item_count", "items", "loot_mode", "owner"]
        );

        let na = FieldCache::new(Region::Na);
        assert_eq!(
            names(&na.fields_for::<STestInventory>()),
            ["item_count", "items", "owner"]
        );
    }

    #[test]
    fn cached_once() {
        let cache = FieldCache::new(Region::Eu);
        let a = cache.fields_for::<STestInventory>();
        let b = cache.fields_for::<STestInventory>();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);

        let party = cache.fields_for::<CExtendPartyPacket>();
        assert_eq!(names(&party), ["is_raid"]);
        assert_eq!(party[0].wire_type(), WireType::Bool);
        assert_eq!(party[0].min_size(), 1);
        assert!(party[0].regions().is_empty());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn empty_packets_have_no_fields() {
        let cache = FieldCache::new(Region::Kr);
        assert!(cache.fields_for::<STestEmpty>().is_empty());
    }

    #[test]
    fn concurrent_first_access() {
        let cache = FieldCache::new(Region::Kr);
        let results: Vec<_> = thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| cache.fields_for::<STestInventory>()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        let stored = cache.fields_for::<STestInventory>();
        for r in results {
            assert!(Arc::ptr_eq(&r, &stored));
            assert_eq!(names(&r), names(&stored));
        }
    }
}
