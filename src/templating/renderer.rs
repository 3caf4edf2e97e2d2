//! Template binding with Tera.
//!
//! A resolved template body is parsed and executed in two distinct steps so
//! the two failure modes stay apart: a body that does not parse is a syntax
//! error, a body that parses but references something the engine cannot
//! resolve is an execution error. Rendering is synchronous and side-effect
//! free beyond `tracing` diagnostics.

use std::sync::OnceLock;

use regex::Regex;
use strsim::levenshtein;
use tera::{Context as TeraContext, Tera};
use tracing::debug;

use super::context::JobContext;
use crate::core::{Error, Result};
use crate::source::ResolvedTemplate;

/// Name the body is registered under inside the engine. Never shown to
/// callers; error messages are scrubbed of it.
const TEMPLATE_NAME: &str = "config_xml";

/// Maximum allowed Levenshtein distance for a suggestion, as a percentage of
/// the unresolved name's length.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Top-level keys available to every template, for nearest-name suggestions.
const CONTEXT_KEYS: &[&str] = &[
    "name",
    "description",
    "display_name",
    "trigger_remotely_token",
    "disabled",
    "master_merge_triggering",
    "permissions",
    "parameters",
    "branch_push_triggering",
    "pr_triggering_ghpr",
    "pr_triggering_gh_integration",
    "jenkinsfile",
    "configuration",
];

impl ResolvedTemplate {
    /// Bind the template to a job context, producing the final `config.xml`.
    ///
    /// # Errors
    ///
    /// - [`Error::TemplateSyntax`] when the body fails to parse; no output is
    ///   produced.
    /// - [`Error::TemplateRender`] when the parsed template fails to execute
    ///   against the context. Unresolved-variable failures carry nearest-key
    ///   suggestions when a close context key exists.
    pub fn bind(&self, context: &JobContext) -> Result<String> {
        debug!("binding template ({} bytes)", self.content().len());

        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, self.content()).map_err(|e| {
            Error::TemplateSyntax {
                message: format_tera_error(&e),
                source: e,
            }
        })?;

        let tera_context =
            TeraContext::from_serialize(context).map_err(|e| Error::TemplateRender {
                message: format_tera_error(&e),
                source: e,
            })?;

        let xml = tera.render(TEMPLATE_NAME, &tera_context).map_err(|e| Error::TemplateRender {
            message: render_error_message(&e),
            source: e,
        })?;

        debug!("bound template ({} bytes)", xml.len());
        Ok(xml)
    }
}

/// Flatten a Tera error chain into one message without leaking the internal
/// template name.
fn format_tera_error(error: &tera::Error) -> String {
    use std::error::Error as _;

    let mut messages = vec![error.to_string()];
    let mut current = error.source();
    while let Some(err) = current {
        messages.push(err.to_string());
        current = err.source();
    }

    let internal = format!("'{TEMPLATE_NAME}'");
    let cleaned: Vec<String> = messages
        .iter()
        .map(|msg| msg.replace(&internal, "template").trim().to_string())
        .filter(|msg| !msg.is_empty())
        .collect();

    cleaned.join(": ")
}

/// Execution-phase message, with nearest-key suggestions when the failure is
/// an unresolved variable.
fn render_error_message(error: &tera::Error) -> String {
    let message = format_tera_error(error);
    let Some(variable) = extract_variable_name(&message) else {
        return message;
    };

    let suggestions = find_similar_keys(&variable);
    if suggestions.is_empty() {
        message
    } else {
        format!("{message} (did you mean {}?)", suggestions.join(", "))
    }
}

/// Extract `foo` from Tera's "Variable `foo` not found" message.
fn extract_variable_name(message: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE
        .get_or_init(|| Regex::new(r"Variable `([^`]+)` not found").expect("variable pattern"));
    re.captures(message).and_then(|caps| caps.get(1)).map(|m| m.as_str().to_string())
}

/// Context keys within the similarity threshold of the unresolved name,
/// closest first.
fn find_similar_keys(variable: &str) -> Vec<String> {
    let root = variable.split('.').next().unwrap_or(variable);
    let threshold = root.len() * SIMILARITY_THRESHOLD_PERCENT / 100;

    let mut scored: Vec<(usize, &str)> = CONTEXT_KEYS
        .iter()
        .map(|key| (levenshtein(root, key), *key))
        .filter(|(distance, _)| *distance > 0 && *distance <= threshold)
        .collect();
    scored.sort();
    scored.into_iter().take(3).map(|(_, key)| key.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn inline(body: &str) -> ResolvedTemplate {
        ResolvedTemplate::resolve(body).await.unwrap()
    }

    #[tokio::test]
    async fn test_bind_renders_context_fields() {
        let template = inline("<name>{{ name }}</name><disabled>{{ disabled }}</disabled>").await;
        let mut context = JobContext::default();
        context.name = "nightly-build".to_string();

        let xml = template.bind(&context).unwrap();
        assert_eq!(xml, "<name>nightly-build</name><disabled>false</disabled>");
    }

    #[tokio::test]
    async fn test_bind_iterates_lists_and_maps() {
        let template = inline(
            "{% for p in permissions %}<permission>{{ p }}</permission>{% endfor %}\
             <script>{{ jenkinsfile.path }}</script>",
        )
        .await;
        let mut context = JobContext::default();
        context.permissions = vec!["read".into(), "build".into()];
        context.jenkinsfile.insert("path".into(), "ci/Jenkinsfile".into());

        let xml = template.bind(&context).unwrap();
        assert_eq!(
            xml,
            "<permission>read</permission><permission>build</permission>\
             <script>ci/Jenkinsfile</script>"
        );
    }

    #[tokio::test]
    async fn test_unterminated_directive_is_a_syntax_error() {
        let template = inline("<project>{% if disabled %}</project>").await;
        let result = template.bind(&JobContext::default());
        assert!(matches!(result, Err(Error::TemplateSyntax { .. })));
    }

    #[tokio::test]
    async fn test_unclosed_expression_is_a_syntax_error() {
        let template = inline("<name>{{ name </name>").await;
        assert!(matches!(
            template.bind(&JobContext::default()),
            Err(Error::TemplateSyntax { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_variable_is_an_execution_error() {
        let template = inline("<name>{{ nonexistent_field }}</name>").await;
        let result = template.bind(&JobContext::default());
        assert!(matches!(result, Err(Error::TemplateRender { .. })));
    }

    #[tokio::test]
    async fn test_execution_error_suggests_close_context_key() {
        let template = inline("<permission>{{ permission }}</permission>").await;
        let err = template.bind(&JobContext::default()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("permissions"), "no suggestion in: {message}");
    }

    #[tokio::test]
    async fn test_errors_do_not_leak_internal_template_name() {
        let template = inline("<name>{{ nonexistent_field }}</name>").await;
        let err = template.bind(&JobContext::default()).unwrap_err();
        let message = format!("{err}");
        assert!(!message.contains(TEMPLATE_NAME), "internal name leaked: {message}");
    }

    #[test]
    fn test_find_similar_keys_orders_by_distance() {
        let suggestions = find_similar_keys("permission");
        assert_eq!(suggestions, vec!["permissions".to_string()]);
    }

    #[test]
    fn test_find_similar_keys_gives_up_on_distant_names() {
        assert!(find_similar_keys("workspace_cleanup").is_empty());
    }
}
