mod primitives;
pub mod codec;
pub mod error;
pub mod packet;
pub mod registry;
pub mod table;

use std::io::Cursor;

use self::error::{DecodeResult, EncodeResult};

/// Objects which can be read from byte arrays.
pub trait Readable: Sized {
    /// Read this object from a byte array.
    fn read_from(data: &mut Cursor<&[u8]>) -> DecodeResult<Self>;
}

/// Objects which can be written to byte arrays.
pub trait Writable {
    /// Write this object to a byte array.
    fn write_to(&self, target: &mut Vec<u8>) -> EncodeResult<()>;
}

/// Readable and writable.
pub trait Serializable: Readable + Writable {}
impl<T> Serializable for T where T: Readable + Writable {}

/// The byte-level encoding rule of a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WireType {
    Bool,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    /// NUL-terminated UTF-16LE.
    String,
    /// `u16` element count, then the elements.
    Array,
    /// Fields of a nested structure, in order.
    Struct,
}

impl WireType {
    /// Size in bytes of values of this type, if it is fixed.
    pub const fn fixed_size(&self) -> Option<usize> {
        match self {
            WireType::Bool | WireType::Int8 | WireType::UInt8 => Some(1),
            WireType::Int16 | WireType::UInt16 => Some(2),
            WireType::Int32 | WireType::UInt32 | WireType::Float32 => Some(4),
            WireType::Int64 | WireType::UInt64 | WireType::Float64 => Some(8),
            WireType::String | WireType::Array | WireType::Struct => None,
        }
    }
}

/// A value that can appear as a packet field.
pub trait WireValue: Serializable {
    const WIRE_TYPE: WireType;
    /// The fewest bytes a value of this type occupies on the wire.
    const MIN_SIZE: usize;
}

/// Bytes left unread in `data`.
pub fn remaining(data: &Cursor<&[u8]>) -> usize {
    data.get_ref()
        .len()
        .saturating_sub(data.position().try_into().unwrap_or(usize::MAX))
}
