//! # policy
//!
//! Cedar policy AST and renderer.
//!
//! Access policies are declared as structured blocks (an effect, three
//! optional scopes and optional `when`/`unless` conditions) and rendered to
//! Cedar text before they are sent to the authorization service.
//!
//! ## Example
//!
//! ```
//! use policy::{render, Effect, EntityRef, Policy, Scope};
//!
//! let policy = Policy {
//!     principal: Some(Scope::eq(EntityRef::new("CF::User", "user1"))),
//!     ..Policy::new(Effect::Permit)
//! };
//!
//! let text = render(&policy).unwrap();
//! assert!(text.starts_with("permit (\n    principal == CF::User::\"user1\","));
//! ```
//!
//! Rendering is deterministic: the AST holds no maps, and clauses are always
//! written in the same order, so identical input produces identical bytes.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod render;
pub mod types;

pub use error::{RenderError, Result};
pub use render::{render, render_all};
pub use types::{Condition, Effect, EntityRef, Policy, Scope, StructuredCondition};
