use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use teraproxy_primitives::{entity::EntityId, skill::SkillId, vector::Vector3};

use super::{
    error::{DecodeError, DecodeResult, EncodeError, EncodeResult},
    remaining, Readable, WireType, WireValue, Writable,
};

use std::io::Cursor;

macro_rules! integer_impl {
    (
        $({$int:ty, $wire:ident, $read:ident, $write:ident}),*
    ) => {
        $(
            impl Readable for $int {
                fn read_from(data: &mut Cursor<&[u8]>) -> DecodeResult<Self> {
                    Ok(data.$read::<LittleEndian>()?)
                }
            }

            impl Writable for $int {
                fn write_to(&self, target: &mut Vec<u8>) -> EncodeResult<()> {
                    target.$write::<LittleEndian>(*self)?;
                    Ok(())
                }
            }

            impl WireValue for $int {
                const WIRE_TYPE: WireType = WireType::$wire;
                const MIN_SIZE: usize = std::mem::size_of::<$int>();
            }
        )*
    };
}

integer_impl!(
    {i16, Int16, read_i16, write_i16},
    {i32, Int32, read_i32, write_i32},
    {i64, Int64, read_i64, write_i64},
    {u16, UInt16, read_u16, write_u16},
    {u32, UInt32, read_u32, write_u32},
    {u64, UInt64, read_u64, write_u64},
    {f32, Float32, read_f32, write_f32},
    {f64, Float64, read_f64, write_f64}
);

impl Readable for i8 {
    fn read_from(data: &mut Cursor<&[u8]>) -> DecodeResult<Self> {
        Ok(data.read_i8()?)
    }
}
impl Readable for u8 {
    fn read_from(data: &mut Cursor<&[u8]>) -> DecodeResult<Self> {
        Ok(data.read_u8()?)
    }
}
impl Writable for i8 {
    fn write_to(&self, target: &mut Vec<u8>) -> EncodeResult<()> {
        target.write_i8(*self)?;
        Ok(())
    }
}
impl Writable for u8 {
    fn write_to(&self, target: &mut Vec<u8>) -> EncodeResult<()> {
        target.write_u8(*self)?;
        Ok(())
    }
}
impl WireValue for i8 {
    const WIRE_TYPE: WireType = WireType::Int8;
    const MIN_SIZE: usize = 1;
}
impl WireValue for u8 {
    const WIRE_TYPE: WireType = WireType::UInt8;
    const MIN_SIZE: usize = 1;
}

impl Readable for bool {
    fn read_from(data: &mut Cursor<&[u8]>) -> DecodeResult<Self> {
        Ok(data.read_u8()? != 0)
    }
}
impl Writable for bool {
    fn write_to(&self, target: &mut Vec<u8>) -> EncodeResult<()> {
        target.write_u8(*self as u8)?;
        Ok(())
    }
}
impl WireValue for bool {
    const WIRE_TYPE: WireType = WireType::Bool;
    const MIN_SIZE: usize = 1;
}

impl Readable for String {
    fn read_from(data: &mut Cursor<&[u8]>) -> DecodeResult<Self> {
        let mut units = vec![];
        loop {
            match u16::read_from(data)? {
                0 => break,
                unit => units.push(unit),
            }
        }
        Ok(char::decode_utf16(units).collect::<Result<String, _>>()?)
    }
}
impl Writable for String {
    fn write_to(&self, target: &mut Vec<u8>) -> EncodeResult<()> {
        for (i, unit) in self.encode_utf16().enumerate() {
            if unit == 0 {
                return Err(EncodeError::InteriorNul(i));
            }
            unit.write_to(target)?;
        }
        0u16.write_to(target)
    }
}
impl WireValue for String {
    const WIRE_TYPE: WireType = WireType::String;
    const MIN_SIZE: usize = 2;
}

impl<T: WireValue> Readable for Vec<T> {
    fn read_from(data: &mut Cursor<&[u8]>) -> DecodeResult<Self> {
        let len = usize::from(u16::read_from(data)?);
        let needed = len.saturating_mul(T::MIN_SIZE);
        let remaining = remaining(data);
        if needed > remaining {
            return Err(DecodeError::LengthOutOfBounds {
                length: len,
                needed,
                remaining,
            });
        }
        let mut v = Vec::with_capacity(len);
        for _ in 0..len {
            v.push(T::read_from(data)?);
        }
        Ok(v)
    }
}
impl<T: WireValue> Writable for Vec<T> {
    fn write_to(&self, target: &mut Vec<u8>) -> EncodeResult<()> {
        let len = u16::try_from(self.len()).map_err(|_| EncodeError::Overflow {
            what: "array length",
            value: self.len(),
            max: u16::MAX.into(),
        })?;
        len.write_to(target)?;
        for element in self {
            element.write_to(target)?;
        }
        Ok(())
    }
}
impl<T: WireValue> WireValue for Vec<T> {
    const WIRE_TYPE: WireType = WireType::Array;
    const MIN_SIZE: usize = 2;
}

macro_rules! newtype_impl {
    (
        $({$newtype:ty, $inner:ty}),*
    ) => {
        $(
            impl Readable for $newtype {
                fn read_from(data: &mut Cursor<&[u8]>) -> DecodeResult<Self> {
                    Ok(Self(<$inner>::read_from(data)?))
                }
            }

            impl Writable for $newtype {
                fn write_to(&self, target: &mut Vec<u8>) -> EncodeResult<()> {
                    self.0.write_to(target)
                }
            }

            impl WireValue for $newtype {
                const WIRE_TYPE: WireType = <$inner as WireValue>::WIRE_TYPE;
                const MIN_SIZE: usize = <$inner as WireValue>::MIN_SIZE;
            }
        )*
    };
}

newtype_impl!(
    {EntityId, u64},
    {SkillId, u64}
);

impl Readable for Vector3 {
    fn read_from(data: &mut Cursor<&[u8]>) -> DecodeResult<Self> {
        Ok(Self {
            x: f32::read_from(data)?,
            y: f32::read_from(data)?,
            z: f32::read_from(data)?,
        })
    }
}
impl Writable for Vector3 {
    fn write_to(&self, target: &mut Vec<u8>) -> EncodeResult<()> {
        self.x.write_to(target)?;
        self.y.write_to(target)?;
        self.z.write_to(target)
    }
}
impl WireValue for Vector3 {
    const WIRE_TYPE: WireType = WireType::Struct;
    const MIN_SIZE: usize = 12;
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use teraproxy_primitives::{entity::EntityId, vector::Vector3};

    use crate::io::{
        error::{DecodeError, EncodeError},
        packet::def_user_enum,
        Readable, WireType, WireValue, Writable,
    };

    fn encode<T: Writable>(value: &T) -> Vec<u8> {
        let mut v = vec![];
        value.write_to(&mut v).unwrap();
        v
    }

    fn decode<T: Readable>(bytes: &[u8]) -> Result<T, DecodeError> {
        T::read_from(&mut Cursor::new(bytes))
    }

    def_user_enum!(PartyKind (u8) {
        Party = 0,
        Raid = 1
    });

    #[test]
    fn integers_are_little_endian() {
        assert_eq!(encode(&0x1234u16), [0x34, 0x12]);
        assert_eq!(encode(&-2i32), [0xfe, 0xff, 0xff, 0xff]);
        assert_eq!(encode(&EntityId(0x0102030405060708)), [8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(decode::<u32>(&[0x78, 0x56, 0x34, 0x12]).unwrap(), 0x12345678);
        assert_eq!(encode(&1.0f32), [0x00, 0x00, 0x80, 0x3f]);
    }

    #[test]
    fn fixed_sizes_match_encoding() {
        fn check<T: WireValue + Default>() {
            let size = T::WIRE_TYPE.fixed_size().unwrap();
            assert_eq!(T::MIN_SIZE, size);
            assert_eq!(encode(&T::default()).len(), size);
        }
        check::<bool>();
        check::<i8>();
        check::<u8>();
        check::<i16>();
        check::<u16>();
        check::<i32>();
        check::<u32>();
        check::<i64>();
        check::<u64>();
        check::<f32>();
        check::<f64>();
        check::<EntityId>();

        assert_eq!(WireType::String.fixed_size(), None);
        assert_eq!(WireType::Array.fixed_size(), None);
        assert_eq!(Vector3::WIRE_TYPE.fixed_size(), None);
    }

    #[test]
    fn bools() {
        assert_eq!(encode(&true), [1]);
        assert_eq!(encode(&false), [0]);
        assert!(decode::<bool>(&[2]).unwrap());
    }

    #[test]
    fn strings() {
        assert_eq!(encode(&"Hi".to_owned()), [b'H', 0, b'i', 0, 0, 0]);
        assert_eq!(encode(&String::new()), [0, 0]);
        let s = "Ünïcode ✓ 𝄞".to_owned();
        assert_eq!(decode::<String>(&encode(&s)).unwrap(), s);

        assert!(matches!(
            "a\0b".to_owned().write_to(&mut vec![]),
            Err(EncodeError::InteriorNul(1))
        ));
        // unterminated
        assert!(matches!(
            decode::<String>(&[b'H', 0, b'i', 0]),
            Err(DecodeError::UnexpectedEof)
        ));
        // lone surrogate
        assert!(matches!(
            decode::<String>(&[0x00, 0xd8, 0, 0]),
            Err(DecodeError::InvalidString(_))
        ));
    }

    #[test]
    fn arrays() {
        let v: Vec<u16> = vec![1, 2, 3];
        assert_eq!(encode(&v), [3, 0, 1, 0, 2, 0, 3, 0]);
        assert_eq!(decode::<Vec<u16>>(&encode(&v)).unwrap(), v);
        assert_eq!(<Vec<u16> as WireValue>::WIRE_TYPE, WireType::Array);

        let too_long = vec![0u8; usize::from(u16::MAX) + 1];
        assert!(matches!(
            too_long.write_to(&mut vec![]),
            Err(EncodeError::Overflow { value: 65536, max: 65535, .. })
        ));
    }

    #[test]
    fn array_length_exceeding_payload() {
        // claims 0xffff u32s with 4 bytes following
        let err = decode::<Vec<u32>>(&[0xff, 0xff, 1, 0, 0, 0]).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::LengthOutOfBounds {
                length: 65535,
                needed: 262140,
                remaining: 4
            }
        ));
    }

    #[test]
    fn truncated_integer() {
        assert!(matches!(
            decode::<u64>(&[1, 2, 3]),
            Err(DecodeError::UnexpectedEof)
        ));
    }

    #[test]
    fn vectors() {
        let v = Vector3::new(1.0, -2.5, 100.0);
        let bytes = encode(&v);
        assert_eq!(bytes.len(), Vector3::MIN_SIZE);
        assert_eq!(decode::<Vector3>(&bytes).unwrap(), v);
    }

    #[test]
    fn user_enums() {
        assert_eq!(encode(&PartyKind::Raid), [1]);
        assert_eq!(decode::<PartyKind>(&[0]).unwrap(), PartyKind::Party);
        assert_eq!(PartyKind::default(), PartyKind::Party);
        assert!(matches!(
            decode::<PartyKind>(&[7]),
            Err(DecodeError::InvalidVariant { value: 7, .. })
        ));
        assert_eq!(PartyKind::WIRE_TYPE, WireType::UInt8);
    }
}
