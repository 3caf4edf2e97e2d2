//! jenkins-config-template - Jenkins `config.xml` template resolution and rendering
//!
//! This crate resolves a templated Jenkins job descriptor from one of several
//! source locations, verifies its content identity, and binds it to a set of
//! typed job parameters to produce the final `config.xml` document string.
//!
//! # Template References
//!
//! A template reference is a single string naming where the template lives
//! and, optionally, which content it is expected to carry:
//!
//! ```text
//! <location-or-literal>[@<32-hex-digest>]
//! ```
//!
//! The location part is classified by prefix, in priority order:
//! - `http://` / `https://` - fetched with an HTTP GET
//! - `file://` - read from the local filesystem
//! - anything else - the string itself is the template body (inline)
//!
//! The optional trailing digest is the *recorded* hash: the content digest
//! the caller last observed. Comparing it against the digest computed from
//! the freshly fetched content detects drift between the recorded reference
//! and the live template.
//!
//! # Core Modules
//!
//! - [`core`] - Error types shared across the crate
//! - [`source`] - Reference parsing, content retrieval, and content identity
//! - [`templating`] - Job context building and Tera-based rendering
//!
//! # Example
//!
//! ```rust,no_run
//! use jenkins_config_template::{JobContext, ResolvedTemplate};
//!
//! # async fn example() -> jenkins_config_template::Result<()> {
//! // Resolve the template from wherever the reference points.
//! let template = ResolvedTemplate::resolve("file:///etc/jenkins/pipeline.xml").await?;
//!
//! // A canonical identity for what was actually fetched; resolving it again
//! // reproduces the same content as long as the backing file is unchanged.
//! let id = template.template_id();
//! println!("resolved {id}");
//!
//! // Bind the template to a typed job context.
//! let fields = serde_json::json!({
//!     "name": "nightly-build",
//!     "description": "Nightly pipeline",
//!     "permissions": "hudson.model.Item.Read:authenticated",
//! });
//! let context = JobContext::from_fields(fields.as_object().unwrap())?;
//! let xml = template.bind(&context)?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod source;
pub mod templating;

pub use crate::core::{Error, Result};
pub use crate::source::{RequireTemplate, ResolvedTemplate, TemplateSource};
pub use crate::templating::{JobContext, JobParameter};
