//! Shared types used throughout the library.

mod block;
mod identifier;
mod state;

pub use block::Block;
pub use identifier::{normalize_resource, Identifier, DEFAULT_NAMESPACE};
pub use state::{BlockState, StateMapping, StateOption, StateSet, ValueTable};

/// Values treated as "on" when a boolean target state is filled in.
pub const TRUTHY_VALUES: [&str; 2] = ["1", "true"];

/// Whether a state value reads as boolean true.
pub fn is_truthy(value: &str) -> bool {
    TRUTHY_VALUES.contains(&value)
}
