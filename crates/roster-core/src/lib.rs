//! `roster-core`: team membership, role assignment and edit validation for
//! a company's project listing.
//!
//! ```text
//! ProjectBoard ── owns ──▶ ProjectEditSession ── owns ──▶ EditFormState
//!     │                        │                              └─ TeamRoster
//!     ├─ PageState             ├─ RoleCatalog (shared)
//!     └─ EmployeeIndex         └─ validate()
//!
//! ProjectStore / EmployeeDirectory: async collaborators (YamlStore on disk)
//! ```

pub mod board;
pub mod catalog;
pub mod config;
pub mod error;
pub mod io;
pub mod notice;
pub mod pager;
pub mod paths;
pub mod project;
pub mod roster;
pub mod session;
pub mod store;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_support;

pub use board::ProjectBoard;
pub use error::{Result, RosterError};
