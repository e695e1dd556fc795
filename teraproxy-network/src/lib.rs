//! TERA packet serialization.
pub mod config;
pub mod io;

pub use io::codec::PacketSerializer;
