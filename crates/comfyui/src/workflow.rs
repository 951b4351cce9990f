//! Workflow template loading and placeholder substitution.
//!
//! Templates are ComfyUI API-format workflows containing `{{name}}`
//! placeholders inside string values. A string that consists of exactly one
//! numeric placeholder is replaced by a JSON number so node inputs such as
//! `seed` or `cfg` keep their expected type.

use std::path::Path;

use serde_json::{json, Map, Value};
use vton_core::synthesis::ClothRegion;

use crate::api::ComfyUIApiError;

/// Built-in CatVTON workflow.
pub const DEFAULT_WORKFLOW: &str = include_str!("../workflows/catvton.json");

/// Values substituted into a workflow template.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowParams {
    pub person_image: String,
    pub cloth_image: String,
    pub cloth_type: ClothRegion,
    pub seed: u64,
    pub steps: u32,
    pub cfg: f64,
    pub width: u32,
    pub height: u32,
}

impl WorkflowParams {
    fn lookup(&self, name: &str) -> Option<Value> {
        let value = match name {
            "person_image" => json!(self.person_image),
            "cloth_image" => json!(self.cloth_image),
            "cloth_type" => json!(self.cloth_type.as_str()),
            "seed" => json!(self.seed),
            "steps" => json!(self.steps),
            "cfg" => json!(self.cfg),
            "width" => json!(self.width),
            "height" => json!(self.height),
            _ => return None,
        };
        Some(value)
    }
}

/// Load a template from disk, or the built-in workflow when `path` is `None`.
pub fn load_template(path: Option<&Path>) -> Result<Value, ComfyUIApiError> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            ComfyUIApiError::Template(format!("cannot read {}: {e}", path.display()))
        })?,
        None => DEFAULT_WORKFLOW.to_string(),
    };
    let template: Value =
        serde_json::from_str(&raw).map_err(|e| ComfyUIApiError::Template(e.to_string()))?;
    if !template.is_object() {
        return Err(ComfyUIApiError::Template(
            "workflow must be a JSON object keyed by node id".into(),
        ));
    }
    Ok(template)
}

/// Return a copy of `template` with every placeholder filled from `params`.
///
/// Unknown placeholders are left untouched.
pub fn fill_template(template: &Value, params: &WorkflowParams) -> Value {
    match template {
        Value::String(s) => fill_string(s, params),
        Value::Array(items) => Value::Array(items.iter().map(|v| fill_template(v, params)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), fill_template(v, params)))
                .collect::<Map<_, _>>(),
        ),
        other => other.clone(),
    }
}

fn fill_string(s: &str, params: &WorkflowParams) -> Value {
    // Whole-string placeholder keeps the parameter's JSON type.
    if let Some(name) = s.strip_prefix("{{").and_then(|r| r.strip_suffix("}}")) {
        if !name.contains("{{") {
            if let Some(value) = params.lookup(name.trim()) {
                return value;
            }
        }
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = &after[..end];
                match params.lookup(name.trim()) {
                    Some(Value::String(text)) => out.push_str(&text),
                    Some(other) => out.push_str(&other.to_string()),
                    None => {
                        out.push_str("{{");
                        out.push_str(name);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    Value::String(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> WorkflowParams {
        WorkflowParams {
            person_image: "person_1.jpg".into(),
            cloth_image: "clothing_1.jpg".into(),
            cloth_type: ClothRegion::Lower,
            seed: 42,
            steps: 50,
            cfg: 3.5,
            width: 768,
            height: 1024,
        }
    }

    #[test]
    fn numeric_placeholders_become_numbers() {
        let filled = fill_template(
            &json!({ "seed": "{{seed}}", "cfg": "{{cfg}}", "w": "{{ width }}" }),
            &params(),
        );
        assert_eq!(filled, json!({ "seed": 42, "cfg": 3.5, "w": 768 }));
    }

    #[test]
    fn embedded_placeholders_are_interpolated_as_text() {
        let filled = fill_template(&json!("tryon_{{cloth_type}}_{{steps}}"), &params());
        assert_eq!(filled, json!("tryon_lower_50"));
    }

    #[test]
    fn unknown_and_unterminated_placeholders_are_kept() {
        assert_eq!(fill_template(&json!("{{mystery}}"), &params()), json!("{{mystery}}"));
        assert_eq!(fill_template(&json!("a {{seed"), &params()), json!("a {{seed"));
    }

    #[test]
    fn links_and_scalars_pass_through() {
        let filled = fill_template(&json!({ "pipe": ["5", 0], "blur": 9, "on": true }), &params());
        assert_eq!(filled, json!({ "pipe": ["5", 0], "blur": 9, "on": true }));
    }

    #[test]
    fn built_in_workflow_fills_every_placeholder() {
        let template = load_template(None).unwrap();
        let filled = fill_template(&template, &params());
        let rendered = filled.to_string();
        assert!(!rendered.contains("{{"), "unfilled placeholder in {rendered}");
        assert_eq!(filled["1"]["inputs"]["image"], "person_1.jpg");
        assert_eq!(filled["2"]["inputs"]["image"], "clothing_1.jpg");
        assert_eq!(filled["4"]["inputs"]["cloth_type"], "lower");
        assert_eq!(filled["6"]["inputs"]["steps"], 50);
        assert_eq!(filled["6"]["inputs"]["height"], 1024);
    }

    #[test]
    fn template_file_must_be_an_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wf.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(
            load_template(Some(&path)),
            Err(ComfyUIApiError::Template(_))
        ));
        assert!(matches!(
            load_template(Some(&dir.path().join("missing.json"))),
            Err(ComfyUIApiError::Template(_))
        ));
    }
}
