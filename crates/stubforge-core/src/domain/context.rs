use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::domain::{artifact::ArtifactSpec, template::TemplateLocation};

/// Upper-case the first character, leave the rest untouched.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `capitalize(name) + suffix`.
pub fn class_name(name: &str, suffix: &str) -> String {
    format!("{}{}", capitalize(name), suffix)
}

/// Mutable key/value bag that drives one class generation.
///
/// Well-known keys map onto typed fields; anything else (route prefixes,
/// placeholder variables, custom hook output) lands in `extra`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationContext {
    pub name: String,
    pub suffix: String,
    pub namespace: String,
    pub class_name: String,
    #[serde(rename = "tplFilename")]
    pub template_filename: String,
    #[serde(rename = "tplDir")]
    pub template_dir: PathBuf,
    #[serde(rename = "tplFile", skip_serializing_if = "Option::is_none")]
    pub template_file: Option<PathBuf>,
    pub work_dir: PathBuf,
    pub output_dir: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl GenerationContext {
    pub fn new(spec: &ArtifactSpec, name: &str, template_dir: PathBuf, work_dir: PathBuf) -> Self {
        Self {
            name: name.to_owned(),
            suffix: spec.suffix.clone(),
            namespace: spec.namespace.clone(),
            class_name: class_name(name, &spec.suffix),
            template_filename: spec.template_name.clone(),
            template_dir,
            template_file: None,
            work_dir,
            output_dir: spec.output_dir.clone(),
            extra: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "name" => Some(&self.name),
            "suffix" => Some(&self.suffix),
            "namespace" => Some(&self.namespace),
            "className" => Some(&self.class_name),
            "tplFilename" => Some(&self.template_filename),
            "outputDir" => Some(&self.output_dir),
            _ => self.extra.get(key).map(String::as_str),
        }
    }

    /// Set a value. Changing `name` or `suffix` re-derives `className`.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match key {
            "name" => {
                self.name = value;
                self.class_name = class_name(&self.name, &self.suffix);
            }
            "suffix" => {
                self.suffix = value;
                self.class_name = class_name(&self.name, &self.suffix);
            }
            "namespace" => self.namespace = value,
            "className" => self.class_name = value,
            "tplFilename" => self.template_filename = value,
            "outputDir" => self.output_dir = value,
            _ => {
                self.extra.insert(key.to_owned(), value);
            }
        }
    }

    pub fn template_location(&self, ext: &str) -> TemplateLocation {
        let location = TemplateLocation::new(&self.template_dir, &self.template_filename, ext);
        match &self.template_file {
            Some(file) => location.with_file(file.clone()),
            None => location,
        }
    }

    /// Variables visible to the template.
    pub fn render_context(&self) -> RenderContext {
        let mut ctx = RenderContext::new()
            .with_variable("name", &self.name)
            .with_variable("suffix", &self.suffix)
            .with_variable("namespace", &self.namespace)
            .with_variable("className", &self.class_name);
        for (key, value) in &self.extra {
            ctx.insert(key, value);
        }
        ctx
    }
}

/// Flat string map handed to the template engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RenderContext {
    variables: BTreeMap<String, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::artifact::lookup;

    fn controller_context(name: &str) -> GenerationContext {
        let spec = lookup("httpController").unwrap();
        GenerationContext::new(&spec, name, PathBuf::from("/tpl"), PathBuf::from("/work"))
    }

    #[test]
    fn capitalize_handles_edges() {
        assert_eq!(capitalize("user"), "User");
        assert_eq!(capitalize("User"), "User");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("ébène"), "Ébène");
    }

    #[test]
    fn class_name_is_capitalized_name_plus_suffix() {
        assert_eq!(controller_context("user").class_name, "UserController");
    }

    #[test]
    fn set_name_rederives_class_name() {
        let mut ctx = controller_context("user");
        ctx.set("name", "order");
        assert_eq!(ctx.class_name, "OrderController");

        ctx.set("suffix", "Ctrl");
        assert_eq!(ctx.class_name, "OrderCtrl");
    }

    #[test]
    fn unknown_keys_go_to_extra() {
        let mut ctx = controller_context("user");
        ctx.set("prefix", "/user");
        assert_eq!(ctx.get("prefix"), Some("/user"));
        assert_eq!(ctx.extra.len(), 1);
        assert_eq!(ctx.get("missing"), None);
    }

    #[test]
    fn render_context_carries_core_and_extra_keys() {
        let mut ctx = controller_context("user");
        ctx.set("idVar", "{id}");
        let render = ctx.render_context();

        assert_eq!(render.get("className"), Some("UserController"));
        assert_eq!(render.get("namespace"), Some("App\\Http\\Controller"));
        assert_eq!(render.get("idVar"), Some("{id}"));
        assert_eq!(render.get("tplDir"), None);
    }

    #[test]
    fn template_location_uses_full_path_when_set() {
        let mut ctx = controller_context("user");
        assert_eq!(
            ctx.template_location(".stub").resolve(),
            PathBuf::from("/tpl/http-rest-controller.stub")
        );

        ctx.template_file = Some(PathBuf::from("/custom/ctrl.tpl"));
        assert_eq!(
            ctx.template_location(".stub").resolve(),
            PathBuf::from("/custom/ctrl.tpl")
        );
    }
}
