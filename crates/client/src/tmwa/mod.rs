//! The tmwAthena protocol family: the frozen fork with the custom
//! `0x753x` version-exchange packets and none of the later subsystems.

pub mod protocol;
pub(crate) mod recv;

mod out;

pub use out::handlers;
