//! Value types shared by the embed generators.
//!
//! # Responsibility
//! - Define the attribute bag used to route values into object/embed tags.
//! - Define the version triple used for plugin capability gating.
//!
//! # Invariants
//! - Both types are built fresh per call; nothing here holds global state.
//! - Scoped attribute keys take precedence over unscoped keys for their tag.

pub mod attrs;
pub mod version;
