pub mod identity;

pub use identity::{resolve_caller, Caller};
