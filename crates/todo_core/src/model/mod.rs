//! Domain model for todo items.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep the wire shape (`id`, `title`, `completed`) owned by one type.
//!
//! # Invariants
//! - Every todo is identified by a positive `TodoId` that is never reused.
//! - Deletion is a hard removal; there are no tombstones.

pub mod todo;
