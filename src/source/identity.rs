//! Content identity for resolved templates.
//!
//! A template's identity derives from the content that was actually fetched,
//! not just from where it came from: located templates are named
//! `location@digest`, inline templates are their own identity. The digest
//! recorded in the original reference (claimed) and the digest computed from
//! the fetched content (observed) are kept apart so callers can compare them
//! and detect drift.

use md5::{Digest, Md5};

use super::ResolvedTemplate;

impl ResolvedTemplate {
    /// Compute the digest of the template content.
    ///
    /// Lowercase hex MD5 over the raw content bytes - 32 characters, the
    /// exact width the reference pattern expects. Deterministic: equal
    /// content always yields an equal digest. The digest is drift-detection
    /// metadata, not a security boundary.
    pub fn computed_hash(&self) -> String {
        let mut hasher = Md5::new();
        hasher.update(self.content.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Canonical identity string for the current content.
    ///
    /// Inline templates return their body verbatim; located templates return
    /// `location@digest`. The identity round-trips through
    /// [`resolve`](Self::resolve): resolving it again reproduces a template
    /// with the same content (given a stable backing source) whose recorded
    /// digest equals the one embedded here.
    pub fn template_id(&self) -> String {
        match &self.location {
            None => self.content.clone(),
            Some(location) => format!("{}@{}", location, self.computed_hash()),
        }
    }

    /// Compare the recorded digest against the computed one.
    ///
    /// `None` when the reference carried no digest, otherwise whether the
    /// recorded digest still matches the fetched content. `Some(false)` means
    /// the template drifted since the reference was recorded.
    pub fn verify_recorded_hash(&self) -> Option<bool> {
        self.recorded_hash.as_deref().map(|recorded| recorded == self.computed_hash())
    }
}

#[cfg(test)]
mod tests {
    use super::super::ResolvedTemplate;

    async fn inline(body: &str) -> ResolvedTemplate {
        ResolvedTemplate::resolve(body).await.unwrap()
    }

    #[tokio::test]
    async fn test_computed_hash_is_deterministic() {
        let a = inline("<project/>").await;
        let b = inline("<project/>").await;
        assert_eq!(a.computed_hash(), b.computed_hash());
        assert_eq!(a.computed_hash(), a.computed_hash());
    }

    #[tokio::test]
    async fn test_computed_hash_is_32_lowercase_hex() {
        let digest = inline("<project/>").await.computed_hash();
        assert_eq!(digest.len(), 32);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[tokio::test]
    async fn test_different_content_hashes_differently() {
        let a = inline("<project/>").await;
        let b = inline("<project></project>").await;
        assert_ne!(a.computed_hash(), b.computed_hash());
    }

    #[tokio::test]
    async fn test_empty_content_digest_vector() {
        // MD5 of the empty string
        assert_eq!(inline("").await.computed_hash(), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[tokio::test]
    async fn test_inline_template_is_its_own_identity() {
        let resolved = inline("inline-body-text").await;
        assert_eq!(resolved.template_id(), "inline-body-text");
    }

    #[tokio::test]
    async fn test_verify_is_none_without_recorded_hash() {
        assert_eq!(inline("<project/>").await.verify_recorded_hash(), None);
    }

    #[tokio::test]
    async fn test_verify_detects_drift() {
        // the recorded digest names different content than what "arrived"
        let resolved =
            ResolvedTemplate::resolve("stale-body@d41d8cd98f00b204e9800998ecf8427e").await.unwrap();
        assert_eq!(resolved.verify_recorded_hash(), Some(false));
    }

    #[tokio::test]
    async fn test_verify_accepts_matching_digest() {
        let digest = inline("fresh-body").await.computed_hash();
        let resolved = ResolvedTemplate::resolve(&format!("fresh-body@{digest}")).await.unwrap();
        assert_eq!(resolved.verify_recorded_hash(), Some(true));
    }
}
