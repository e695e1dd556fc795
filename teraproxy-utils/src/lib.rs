//! Various utilities for the proxy.
pub mod typemap;
