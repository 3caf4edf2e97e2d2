//! Job context building and template rendering.
//!
//! Two halves, used in sequence: [`context`] turns the loosely-typed field
//! bag supplied by the caller into a fully-typed, fully-defaulted
//! [`JobContext`], and [`renderer`] binds a resolved template to that context
//! to produce the final `config.xml` text.

pub mod context;
pub mod renderer;

pub use context::{JobContext, JobParameter};
