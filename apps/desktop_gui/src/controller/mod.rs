//! Controller layer: UI events, the form-state holder, and command orchestration.

pub mod events;
pub mod form;
pub mod orchestration;
