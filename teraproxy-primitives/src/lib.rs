//! TERA primitive types.

pub mod entity;
pub mod region;
pub mod skill;
pub mod vector;
