//! The setup engine: every step of the wizard except the terminal itself.
//!
//! Steps are plain functions over explicit state values so each one can be
//! exercised on its own:
//!
//! * [`input`] turns prompt answers into [`input::SetupInputs`].
//! * [`hasher`] produces the escaped basic-auth line.
//! * [`layout`] resets the target tree and copies the templates.
//! * [`patch`] rewrites placeholder lines in the copied files.
//! * [`pipeline`] runs the last three in order.

pub mod hasher;
pub mod input;
pub mod layout;
pub mod patch;
pub mod pipeline;
