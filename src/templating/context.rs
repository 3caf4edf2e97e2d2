//! Job context building for `config.xml` rendering.
//!
//! The caller supplies job settings as a loosely-typed key/value bag
//! (a [`serde_json::Map`]); [`JobContext::from_fields`] is the single typed
//! adapter over it. Every recognized key is coerced into its typed slot, and
//! a wrong representation fails the whole call - no field is ever skipped
//! silently. Absent keys keep their defaults, and every list and map field
//! defaults to an empty container rather than staying absent, so template
//! execution never fails on a missing key.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::{Error, Result};

/// A single build parameter declared by a job.
///
/// Sub-keys missing from the input record default to empty strings, so each
/// rendered record always carries all four keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobParameter {
    /// Parameter kind, e.g. `hudson.model.StringParameterDefinition`
    #[serde(rename = "type")]
    pub parameter_type: String,
    pub name: String,
    pub description: String,
    pub default: String,
}

/// Fully-typed, fully-defaulted data passed into template execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobContext {
    /// Job name
    pub name: String,
    pub description: String,
    pub display_name: String,
    /// Token accepted by the remote-trigger endpoint, empty when the job is
    /// not remotely triggerable
    pub trigger_remotely_token: String,
    pub disabled: bool,
    pub master_merge_triggering: bool,
    /// Ordered permission identifiers; order, duplicates, and empty entries
    /// are preserved from the input
    pub permissions: Vec<String>,
    pub parameters: Vec<JobParameter>,
    pub branch_push_triggering: BTreeMap<String, String>,
    pub pr_triggering_ghpr: BTreeMap<String, String>,
    pub pr_triggering_gh_integration: BTreeMap<String, String>,
    pub jenkinsfile: BTreeMap<String, String>,
    pub configuration: BTreeMap<String, String>,
}

impl JobContext {
    /// Build a job context from a loosely-typed field bag.
    ///
    /// Recognized keys: `name`, `display_name`, `description`,
    /// `trigger_remotely_token`, `disabled`, `master_merge_triggering`,
    /// `permissions` (one comma-joined string, split into an ordered list),
    /// `configuration`, `pr_triggering_ghpr`, `pr_triggering_gh_integration`,
    /// `parameter` (list of records), `branch_push_triggering`, and
    /// `jenkinsfile`. Unrecognized keys are ignored.
    ///
    /// # Errors
    ///
    /// [`Error::Parameter`] when a recognized key carries the wrong JSON
    /// representation. The whole call fails; nothing is defaulted over.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self> {
        let mut context = Self::default();

        if let Some(value) = fields.get("name") {
            context.name = coerce_str(value, "name")?;
        }
        if let Some(value) = fields.get("display_name") {
            context.display_name = coerce_str(value, "display_name")?;
        }
        if let Some(value) = fields.get("description") {
            context.description = coerce_str(value, "description")?;
        }
        if let Some(value) = fields.get("trigger_remotely_token") {
            context.trigger_remotely_token = coerce_str(value, "trigger_remotely_token")?;
        }
        if let Some(value) = fields.get("disabled") {
            context.disabled = coerce_bool(value, "disabled")?;
        }
        if let Some(value) = fields.get("master_merge_triggering") {
            context.master_merge_triggering = coerce_bool(value, "master_merge_triggering")?;
        }
        if let Some(value) = fields.get("permissions") {
            // one comma-joined string; empty segments and duplicates survive
            context.permissions =
                coerce_str(value, "permissions")?.split(',').map(str::to_string).collect();
        }
        if let Some(value) = fields.get("configuration") {
            context.configuration = coerce_string_map(value, "configuration")?;
        }
        if let Some(value) = fields.get("pr_triggering_ghpr") {
            context.pr_triggering_ghpr = coerce_string_map(value, "pr_triggering_ghpr")?;
        }
        if let Some(value) = fields.get("pr_triggering_gh_integration") {
            context.pr_triggering_gh_integration =
                coerce_string_map(value, "pr_triggering_gh_integration")?;
        }
        if let Some(value) = fields.get("parameter") {
            context.parameters = coerce_parameters(value)?;
        }
        if let Some(value) = fields.get("branch_push_triggering") {
            context.branch_push_triggering = coerce_string_map(value, "branch_push_triggering")?;
        }
        if let Some(value) = fields.get("jenkinsfile") {
            context.jenkinsfile = coerce_string_map(value, "jenkinsfile")?;
        }

        Ok(context)
    }
}

fn coerce_str(value: &Value, key: &str) -> Result<String> {
    value.as_str().map(str::to_string).ok_or_else(|| Error::Parameter {
        key: key.to_string(),
        expected: "string",
    })
}

fn coerce_bool(value: &Value, key: &str) -> Result<bool> {
    value.as_bool().ok_or_else(|| Error::Parameter {
        key: key.to_string(),
        expected: "boolean",
    })
}

fn coerce_string_map(value: &Value, key: &str) -> Result<BTreeMap<String, String>> {
    let object = value.as_object().ok_or_else(|| Error::Parameter {
        key: key.to_string(),
        expected: "map of strings",
    })?;

    let mut map = BTreeMap::new();
    for (entry_key, entry_value) in object {
        let text = entry_value.as_str().ok_or_else(|| Error::Parameter {
            key: format!("{key}.{entry_key}"),
            expected: "string",
        })?;
        map.insert(entry_key.clone(), text.to_string());
    }
    Ok(map)
}

fn coerce_parameters(value: &Value) -> Result<Vec<JobParameter>> {
    let records = value.as_array().ok_or_else(|| Error::Parameter {
        key: "parameter".to_string(),
        expected: "list of records",
    })?;

    let mut parameters = Vec::with_capacity(records.len());
    for record in records {
        let record = record.as_object().ok_or_else(|| Error::Parameter {
            key: "parameter".to_string(),
            expected: "record with type/name/description/default",
        })?;

        let mut parameter = JobParameter::default();
        if let Some(value) = record.get("type") {
            parameter.parameter_type = coerce_str(value, "parameter.type")?;
        }
        if let Some(value) = record.get("name") {
            parameter.name = coerce_str(value, "parameter.name")?;
        }
        if let Some(value) = record.get("description") {
            parameter.description = coerce_str(value, "parameter.description")?;
        }
        if let Some(value) = record.get("default") {
            parameter.default = coerce_str(value, "parameter.default")?;
        }
        parameters.push(parameter);
    }
    Ok(parameters)
}
