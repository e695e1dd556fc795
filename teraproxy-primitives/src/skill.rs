use std::ops::Deref;

/// A packed skill identifier.
///
/// The low 32 bits hold the skill number; the
/// upper bits are owner specific and kept as-is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct SkillId(pub u64);

impl SkillId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The skill number.
    pub const fn id(&self) -> u32 {
        self.0 as u32
    }

    /// Returns a copy of this ID with the
    /// skill number replaced.
    pub const fn with_id(&self, id: u32) -> Self {
        Self((self.0 & !(u32::MAX as u64)) | id as u64)
    }
}

impl Deref for SkillId {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
