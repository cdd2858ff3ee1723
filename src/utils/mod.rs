//! Small helpers without a better home
mod unwrap_or;

pub(crate) use unwrap_or::unwrap_or;
