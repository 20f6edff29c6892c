//! Command handlers.

pub(crate) mod convert;
pub(crate) mod size;

pub(crate) use convert::handle_convert;
pub(crate) use size::handle_size;
