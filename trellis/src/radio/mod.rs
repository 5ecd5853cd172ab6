//! RadioGroup widget - a group of mutually exclusive radio options.

mod state;

pub use state::{RadioChange, RadioGroup, RadioGroupId, RadioOption};
