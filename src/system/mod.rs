pub mod collector;
pub mod kill;
pub(crate) mod platform;
pub mod process;
pub mod summary;
