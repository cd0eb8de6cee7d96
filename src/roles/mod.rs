//! Hidden roles: alignments, special roles, assignment and visibility.
//!
//! Data flows one way: the validated `Configuration` feeds the assigner,
//! whose `RoleAssignment` then feeds the visibility resolver. The assignment
//! is immutable once made.

pub mod role;
pub mod assigner;
pub mod visibility;

pub use role::{Alignment, Role, RoleAssignment};
pub use assigner::{assign, Assignment};
pub use visibility::{resolve, Insight, KnowledgeMap};
