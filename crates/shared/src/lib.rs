//! Wire contract shared between the upload client front ends.

pub mod domain;
pub mod error;
pub mod protocol;
