//! Error handling for jenkins-config-template.
//!
//! One strongly-typed enum covers the four failure families of the crate:
//! resolution I/O, invalid-object probes, parameter coercion, and the two
//! template failure modes (parse vs. execution). Errors are surfaced to the
//! immediate caller exactly once - nothing is retried and nothing is
//! downgraded to a warning, so there is no partial or degraded rendering
//! mode.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error type for template resolution, adaptation, and rendering.
///
/// Variants map one-to-one onto the failure taxonomy of the crate, so callers
/// can match precisely instead of string-probing messages.
#[derive(Error, Debug)]
pub enum Error {
    /// Remote template retrieval failed.
    ///
    /// Raised for connection failures and body-read failures alike. The HTTP
    /// status code is not inspected: a served body is accepted whatever the
    /// status, matching the retrieval contract.
    #[error("failed to retrieve template from {url}")]
    Fetch {
        /// The URL the GET request was issued against
        url: String,
        /// The underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// Local template file could not be read.
    #[error("failed to read template file {path}")]
    Io {
        /// Filesystem path after stripping the `file://` prefix
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An operation was probed on an absent template value.
    ///
    /// Returned by [`RequireTemplate::require`](crate::source::RequireTemplate)
    /// when a caller deliberately accesses an empty template slot. Operations
    /// on a present [`ResolvedTemplate`](crate::source::ResolvedTemplate)
    /// cannot produce this.
    #[error("invalid config.xml template object")]
    InvalidTemplate,

    /// A recognized job field carried the wrong representation.
    ///
    /// Fails the whole adapt call; fields are never skipped silently.
    #[error("job field '{key}' has the wrong type, expected {expected}")]
    Parameter {
        /// The offending field key (dotted for nested entries)
        key: String,
        /// Human-readable description of the expected representation
        expected: &'static str,
    },

    /// The template body failed to parse.
    #[error("template syntax error: {message}")]
    TemplateSyntax {
        /// Parser message, cleaned of engine-internal template names
        message: String,
        #[source]
        source: tera::Error,
    },

    /// The template parsed but failed to execute against the job context.
    #[error("template execution error: {message}")]
    TemplateRender {
        /// Engine message, with nearest-key suggestions for unresolved
        /// variables where available
        message: String,
        #[source]
        source: tera::Error,
    },
}
