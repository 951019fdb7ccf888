//! Path-scoped access grants.
//!
//! Core principle: **a request is allowed only if some grant covers it.**
//!
//! A [`PathGrant`] pairs an [`AccessLevel`] with a literal path prefix. The
//! [`evaluate`] function decides whether a grant set permits a request for a
//! path with a given HTTP method. Read-only methods need [`AccessLevel::Read`]
//! or better; every other method needs [`AccessLevel::ReadWrite`].
//!
//! # Example
//!
//! ```
//! use grants::{PathGrant, evaluate};
//! use http::Method;
//!
//! let grants = vec![
//!     PathGrant::read("/managers/"),
//!     PathGrant::read_write("/hr/shipping/"),
//! ];
//!
//! assert!(evaluate("/managers/instructions.pdf", &Method::GET, &grants).is_allowed());
//! assert!(!evaluate("/managers/instructions.pdf", &Method::POST, &grants).is_allowed());
//! assert!(evaluate("/hr/shipping/x", &Method::DELETE, &grants).is_allowed());
//! ```
//!
//! Grant tables can be loaded from TOML with [`GrantTable`].

mod error;
mod evaluate;
mod grant;
mod table;

pub use error::{Error, Result};
pub use evaluate::{Decision, DenyReason, Evaluator, PrefixMatch, evaluate};
pub use grant::{AccessLevel, PathGrant};
pub use table::{GrantTable, UserGrants};
