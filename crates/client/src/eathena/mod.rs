//! The eAthena protocol family: the actively developed fork whose wire
//! layouts are gated by dated packet revisions.

pub mod protocol;
pub(crate) mod recv;

mod out;

pub use out::handlers;
