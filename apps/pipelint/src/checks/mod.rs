//! Built-in rule sets.
//!
//! - `labels`: one standard resource label per process.
//! - `containers`: container references must be well-formed and tagged.
//!
//! Each submodule exposes `register`, which appends its rules to a
//! [`RuleRegistry`](crate::registry::RuleRegistry) in a fixed order.

pub mod containers;
pub mod labels;
