//! Template reference resolution.
//!
//! A template reference is a single caller-supplied string encoding where a
//! `config.xml` template lives and, optionally, which content it is expected
//! to carry:
//!
//! ```text
//! <location-or-literal>[@<32-hex-digest>]
//! ```
//!
//! Resolution is a one-shot, stateless operation: split off the recorded
//! digest if present, classify the remainder into a [`TemplateSource`], fetch
//! or interpret it, and hand back an immutable [`ResolvedTemplate`]. There is
//! no cache, no retry, and no timeout beyond what the transport itself
//! applies - callers needing those wrap the call at the I/O boundary.

pub mod identity;

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::core::{Error, Result};

/// Matches a trailing `@` followed by exactly 32 lowercase hex characters.
fn hash_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@[a-f0-9]{32}$").expect("hash suffix pattern is valid"))
}

/// Split a trailing recorded digest off a reference string.
///
/// The digest suffix has priority over content classification: a reference
/// that merely looks like inline text but happens to end in `@<32-hex>` is
/// still split. Any other `@` stays part of the candidate.
fn split_recorded_hash(reference: &str) -> (&str, Option<&str>) {
    match hash_suffix().find(reference) {
        Some(suffix) => {
            (&reference[..suffix.start()], Some(&reference[suffix.start() + 1..]))
        }
        None => (reference, None),
    }
}

/// Where a template's content comes from.
///
/// A closed set with fixed classification priority: `http://` and `https://`
/// win over `file://`, and anything else is the literal template body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Fetched over HTTP GET from the given URL.
    Remote(String),
    /// Read from the local filesystem. Holds the full `file://`-prefixed
    /// location exactly as written in the reference; the path is stripped
    /// out only at read time.
    Local(String),
    /// The reference itself is the template body.
    Inline(String),
}

impl TemplateSource {
    /// Classify a candidate location/content string by prefix.
    pub fn classify(candidate: String) -> Self {
        if candidate.starts_with("http://") || candidate.starts_with("https://") {
            Self::Remote(candidate)
        } else if candidate.starts_with("file://") {
            Self::Local(candidate)
        } else {
            Self::Inline(candidate)
        }
    }
}

/// The in-memory result of resolving a template reference.
///
/// Immutable once constructed: [`resolve`](Self::resolve) is the only way to
/// obtain one, and accessors never mutate. The location is `None` exactly
/// when the template body was supplied inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    location: Option<String>,
    content: String,
    recorded_hash: Option<String>,
}

impl ResolvedTemplate {
    /// Resolve a template reference into its content.
    ///
    /// Splits off the recorded digest, classifies the remainder, and fetches
    /// or interprets it:
    ///
    /// - `http://` / `https://` - HTTP GET with the transport defaults. The
    ///   body is read whatever the response status; only connection and
    ///   body-read failures are errors.
    /// - `file://` - the remaining path is read from the local filesystem.
    /// - anything else - the candidate string is the template body verbatim.
    ///
    /// A fetch or read failure aborts resolution with the underlying I/O
    /// error; no partial value is returned.
    pub async fn resolve(reference: &str) -> Result<Self> {
        let (candidate, recorded_hash) = split_recorded_hash(reference);
        let recorded_hash = recorded_hash.map(str::to_string);

        match TemplateSource::classify(candidate.to_string()) {
            TemplateSource::Remote(url) => {
                debug!("retrieving template from URL {url:?}");
                let response = reqwest::Client::new().get(&url).send().await.map_err(|e| {
                    Error::Fetch {
                        url: url.clone(),
                        source: e,
                    }
                })?;
                let content = response.text().await.map_err(|e| Error::Fetch {
                    url: url.clone(),
                    source: e,
                })?;
                Ok(Self {
                    location: Some(url),
                    content,
                    recorded_hash,
                })
            }
            TemplateSource::Local(location) => {
                debug!("retrieving template from filesystem {location:?}");
                let path = location.strip_prefix("file://").unwrap_or(&location);
                let content = tokio::fs::read_to_string(path).await.map_err(|e| Error::Io {
                    path: path.to_string(),
                    source: e,
                })?;
                Ok(Self {
                    location: Some(location),
                    content,
                    recorded_hash,
                })
            }
            TemplateSource::Inline(body) => {
                debug!("template is inline ({} bytes)", body.len());
                Ok(Self {
                    location: None,
                    content: body,
                    recorded_hash,
                })
            }
        }
    }

    /// The location the content was fetched from, `None` for inline bodies.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Raw template text, exactly as fetched or given.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The digest recorded in the original reference, if one was present.
    ///
    /// Always 32 lowercase hex characters when `Some`. This is the *claimed*
    /// digest; compare with
    /// [`computed_hash`](Self::computed_hash) (or use
    /// [`verify_recorded_hash`](Self::verify_recorded_hash)) to detect drift.
    pub fn recorded_hash(&self) -> Option<&str> {
        self.recorded_hash.as_deref()
    }
}

/// Accessor path for callers holding a possibly-absent template.
///
/// Operations live on [`ResolvedTemplate`] itself, so an absent value cannot
/// be hashed or bound by accident. Callers that deliberately probe an
/// optional slot go through [`require`](Self::require) and get the documented
/// invalid-object error instead of a panic.
pub trait RequireTemplate {
    /// Borrow the template, or fail with [`Error::InvalidTemplate`].
    fn require(&self) -> Result<&ResolvedTemplate>;
}

impl RequireTemplate for Option<ResolvedTemplate> {
    fn require(&self) -> Result<&ResolvedTemplate> {
        self.as_ref().ok_or(Error::InvalidTemplate)
    }
}
