#![forbid(unsafe_code)]
#![doc = "Common types, error codes and algorithm specifications for seedwell."]

pub mod algorithm;
pub mod error;

pub use algorithm::*;
pub use error::*;
