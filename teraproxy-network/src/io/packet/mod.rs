//! Packet definitions and the traits the serializer drives them through.
use std::{any::Any, fmt::Debug};

use super::{codec::PacketSerializer, error::DecodeResult, error::EncodeResult, registry::PacketEntry};

pub mod client;
mod field;
pub mod server;

pub use field::{FieldCache, PacketField};

/// Extension points the serializer calls
/// around every serialize/deserialize.
pub trait PacketHooks {
    /// Runs before any field is written. Use it to
    /// compute derived fields from the current state.
    fn on_serialize(&mut self, _serializer: &PacketSerializer) {}

    /// Runs after all fields have been read.
    fn on_deserialize(&mut self, _serializer: &PacketSerializer) {}
}

/// A message that can be sent over the wire.
pub trait Packet: PacketHooks + Any + Debug + Send + Sync {
    /// The message name used to look up this packet's opcode.
    fn name(&self) -> &'static str;

    /// Writes all fields that apply to the serializer's region.
    fn write_fields(
        &self,
        serializer: &PacketSerializer,
        target: &mut Vec<u8>,
    ) -> EncodeResult<()>;

    /// Reads all fields that apply to the serializer's region.
    fn read_fields(
        &mut self,
        serializer: &PacketSerializer,
        data: &mut std::io::Cursor<&[u8]>,
    ) -> DecodeResult<()>;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn Packet {
    pub fn is<P: Packet>(&self) -> bool {
        self.as_any().is::<P>()
    }

    pub fn downcast_ref<P: Packet>(&self) -> Option<&P> {
        self.as_any().downcast_ref()
    }

    pub fn downcast_mut<P: Packet>(&mut self) -> Option<&mut P> {
        self.as_any_mut().downcast_mut()
    }
}

/// Static metadata of a packet type.
pub trait PacketSchema: Packet + Default + Sized {
    /// The message name.
    const NAME: &'static str;

    /// Every field of this packet, in declaration order,
    /// regardless of region.
    fn declared_fields() -> Vec<PacketField<Self>>;
}

/// All packets compiled into the proxy.
pub fn known_packets() -> Vec<PacketEntry> {
    let mut packets = client::packets();
    packets.extend(server::packets());
    packets
}

macro_rules! def_packets {
    (@hooks $packet_name:ident) => {
        impl crate::io::packet::PacketHooks for $packet_name {}
    };
    (@hooks $packet_name:ident custom_hooks) => {};
    (
        $(
            $(#[$meta:meta])*
            $packet_name:ident ($message_name:literal) $([$hooks:ident])? {
                $(
                    $(#[regions($($region:ident),+)])?
                    $field_name:ident: $field_ty:ty
                ),* $(,)?
            }
        ),* $(,)?
    ) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Default, Clone, PartialEq)]
            pub struct $packet_name {
                $(
                    pub $field_name: $field_ty
                ),*
            }

            impl crate::io::packet::PacketSchema for $packet_name {
                const NAME: &'static str = $message_name;

                fn declared_fields() -> std::vec::Vec<crate::io::packet::PacketField<Self>> {
                    std::vec![
                        $(
                            crate::io::packet::PacketField::new(
                                stringify!($field_name),
                                &[$($(teraproxy_primitives::region::Region::$region),+)?],
                                <$field_ty as crate::io::WireValue>::WIRE_TYPE,
                                <$field_ty as crate::io::WireValue>::MIN_SIZE,
                                |packet: &Self, target: &mut std::vec::Vec<u8>| {
                                    crate::io::Writable::write_to(&packet.$field_name, target)
                                },
                                |packet: &mut Self, data: &mut std::io::Cursor<&[u8]>| {
                                    packet.$field_name = <$field_ty as crate::io::Readable>::read_from(data)?;
                                    Ok(())
                                },
                            )
                        ),*
                    ]
                }
            }

            impl crate::io::packet::Packet for $packet_name {
                fn name(&self) -> &'static str {
                    $message_name
                }

                fn write_fields(
                    &self,
                    serializer: &crate::io::codec::PacketSerializer,
                    target: &mut std::vec::Vec<u8>,
                ) -> crate::io::error::EncodeResult<()> {
                    serializer.write_fields(self, target)
                }

                fn read_fields(
                    &mut self,
                    serializer: &crate::io::codec::PacketSerializer,
                    data: &mut std::io::Cursor<&[u8]>,
                ) -> crate::io::error::DecodeResult<()> {
                    serializer.read_fields(self, data)
                }

                fn as_any(&self) -> &dyn std::any::Any {
                    self
                }

                fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
                    self
                }
            }

            crate::io::packet::def_packets!(@hooks $packet_name $($hooks)?);
        )*
    };
}
pub(crate) use def_packets;

/// Nested structures appearing inside packets.
/// Their fields are always written, whatever the region.
#[allow(unused_macros)]
macro_rules! def_structs {
    (
        $(
            $(#[$meta:meta])*
            $struct_name:ident {
                $(
                    $field_name:ident: $field_ty:ty
                ),* $(,)?
            }
        ),* $(,)?
    ) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Default, Clone, PartialEq)]
            pub struct $struct_name {
                $(
                    pub $field_name: $field_ty
                ),*
            }

            impl crate::io::Readable for $struct_name {
                fn read_from(data: &mut std::io::Cursor<&[u8]>) -> crate::io::error::DecodeResult<Self> {
                    Ok(Self {
                        $(
                            $field_name: <$field_ty as crate::io::Readable>::read_from(data)?
                        ),*
                    })
                }
            }

            impl crate::io::Writable for $struct_name {
                fn write_to(&self, target: &mut std::vec::Vec<u8>) -> crate::io::error::EncodeResult<()> {
                    $(
                        crate::io::Writable::write_to(&self.$field_name, target)?;
                    )*
                    Ok(())
                }
            }

            impl crate::io::WireValue for $struct_name {
                const WIRE_TYPE: crate::io::WireType = crate::io::WireType::Struct;
                const MIN_SIZE: usize = 0 $(+ <$field_ty as crate::io::WireValue>::MIN_SIZE)*;
            }
        )*
    };
}
#[allow(unused_imports)]
pub(crate) use def_structs;

#[allow(unused_macros)]
macro_rules! def_user_enum {
    (
        $enum_ident:ident ($enum_ty:ty) {
            $first_ident:ident = $first_discriminator:literal
            $(, $variant_ident:ident = $variant_discriminator:literal)* $(,)?
        }
    ) => {
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
        pub enum $enum_ident {
            #[default]
            $first_ident,
            $(
                $variant_ident
            ),*
        }

        impl crate::io::Readable for $enum_ident {
            fn read_from(data: &mut std::io::Cursor<&[u8]>) -> crate::io::error::DecodeResult<Self> {
                match <$enum_ty as crate::io::Readable>::read_from(data)? {
                    $first_discriminator => Ok(Self::$first_ident),
                    $(
                        $variant_discriminator => Ok(Self::$variant_ident),
                    )*
                    n => Err(crate::io::error::DecodeError::InvalidVariant {
                        type_name: std::any::type_name::<Self>(),
                        value: n as u64,
                    }),
                }
            }
        }

        impl crate::io::Writable for $enum_ident {
            fn write_to(&self, target: &mut std::vec::Vec<u8>) -> crate::io::error::EncodeResult<()> {
                let discriminator: $enum_ty = match self {
                    Self::$first_ident => $first_discriminator,
                    $(
                        Self::$variant_ident => $variant_discriminator
                    ),*
                };
                crate::io::Writable::write_to(&discriminator, target)
            }
        }

        impl crate::io::WireValue for $enum_ident {
            const WIRE_TYPE: crate::io::WireType = <$enum_ty as crate::io::WireValue>::WIRE_TYPE;
            const MIN_SIZE: usize = <$enum_ty as crate::io::WireValue>::MIN_SIZE;
        }
    };
}
#[allow(unused_imports)]
pub(crate) use def_user_enum;
