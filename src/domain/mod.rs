//! Domain layer containing the access types and their invariants.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (state machine trait, validation errors)
//! - `access` - Access state, purchase signal, presentation guards and outcomes

pub mod access;
pub mod foundation;
