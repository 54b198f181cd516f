//! Handlebars-backed template renderer.
//!
//! Templates are plain text with `{{variable}}` placeholders. HTML escaping is
//! off and unknown variables render empty. One helper is built in:
//!
//! ```text
//! {{include file="path"}}
//! ```
//!
//! `@alias/...` paths go through the alias resolver, `/...` paths are
//! absolute, anything else is relative to the including template's directory.
//! The included file is inserted verbatim after a newline.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext as HbsRenderContext,
    RenderErrorReason, Template,
};
use tracing::{debug, instrument};

use stubforge_core::{
    application::{
        ApplicationError,
        ports::{AliasResolver, Filesystem, TemplateRenderer},
    },
    domain::RenderContext,
    error::{StubforgeError, StubforgeResult},
};

const ROOT_TEMPLATE: &str = "stub";
const INCLUDE_HELPER: &str = "include";

/// First include failure, kept so it surfaces instead of a generic render error.
type IncludeFailure = Arc<Mutex<Option<StubforgeError>>>;

pub struct HandlebarsRenderer {
    filesystem: Arc<dyn Filesystem>,
    aliases: Arc<dyn AliasResolver>,
}

impl HandlebarsRenderer {
    pub fn new(filesystem: Arc<dyn Filesystem>, aliases: Arc<dyn AliasResolver>) -> Self {
        Self {
            filesystem,
            aliases,
        }
    }

    /// Render template text. `origin` anchors relative includes and names the
    /// template in errors.
    pub fn render_source(
        &self,
        origin: &Path,
        source: &str,
        context: &RenderContext,
    ) -> StubforgeResult<String> {
        let compiled =
            Template::compile(source).map_err(|e| ApplicationError::TemplateSyntaxError {
                path: origin.to_path_buf(),
                reason: e.to_string(),
            })?;

        let failure = IncludeFailure::default();
        let base_dir = origin.parent().map(Path::to_path_buf).unwrap_or_default();

        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(false);
        self.register_include(&mut registry, base_dir, Arc::clone(&failure));
        registry.register_template(ROOT_TEMPLATE, compiled);

        registry.render(ROOT_TEMPLATE, context).map_err(|e| {
            let include_err = failure.lock().ok().and_then(|mut slot| slot.take());
            include_err.unwrap_or_else(|| {
                ApplicationError::RenderingFailed {
                    reason: e.to_string(),
                }
                .into()
            })
        })
    }

    fn register_include(
        &self,
        registry: &mut Handlebars<'_>,
        base_dir: PathBuf,
        failure: IncludeFailure,
    ) {
        let filesystem = Arc::clone(&self.filesystem);
        let aliases = Arc::clone(&self.aliases);

        registry.register_helper(
            INCLUDE_HELPER,
            Box::new(
                move |h: &Helper,
                      _: &Handlebars,
                      _: &Context,
                      _: &mut HbsRenderContext,
                      out: &mut dyn Output|
                      -> HelperResult {
                    let file = h
                        .hash_get("file")
                        .and_then(|v| v.value().as_str())
                        .ok_or_else(|| {
                            RenderErrorReason::Other(
                                "include needs a file=\"...\" parameter".into(),
                            )
                        })?;

                    let fail = |err: StubforgeError| {
                        let reason = err.to_string();
                        if let Ok(mut slot) = failure.lock() {
                            slot.get_or_insert(err);
                        }
                        RenderErrorReason::Other(reason)
                    };

                    let path =
                        resolve_include(file, &base_dir, aliases.as_ref()).map_err(fail)?;

                    if !filesystem.exists(&path) {
                        let err = ApplicationError::IncludePathNotFound { path };
                        return Err(fail(err.into()).into());
                    }

                    let content = filesystem
                        .read_to_string(&path)
                        .map_err(|e| RenderErrorReason::Other(e.to_string()))?;
                    out.write("\n")?;
                    out.write(&content)?;
                    Ok(())
                },
            ),
        );
    }

    fn write_error(destination: &Path, err: StubforgeError) -> StubforgeError {
        match err {
            StubforgeError::Application(ApplicationError::WriteError { .. }) => err,
            other => ApplicationError::WriteError {
                path: destination.to_path_buf(),
                reason: other.to_string(),
            }
            .into(),
        }
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    #[instrument(skip_all, fields(template = %template.display()))]
    fn render(&self, template: &Path, context: &RenderContext) -> StubforgeResult<String> {
        if !self.filesystem.exists(template) {
            return Err(ApplicationError::TemplateNotFound {
                path: template.to_path_buf(),
            }
            .into());
        }
        let source = self.filesystem.read_to_string(template)?;
        debug!(bytes = source.len(), "template loaded");
        self.render_source(template, &source, context)
    }

    fn render_to_file(
        &self,
        template: &Path,
        context: &RenderContext,
        destination: &Path,
    ) -> StubforgeResult<()> {
        let content = self.render(template, context)?;
        self.write_raw(destination, &content)
    }

    fn write_raw(&self, destination: &Path, content: &str) -> StubforgeResult<()> {
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.filesystem
                .create_dir_all(parent)
                .map_err(|e| Self::write_error(destination, e))?;
        }
        self.filesystem
            .write_file(destination, content)
            .map_err(|e| Self::write_error(destination, e))?;
        debug!(path = %destination.display(), "file written");
        Ok(())
    }
}

/// Resolve an include path against the alias table or the template directory.
pub fn resolve_include(
    file: &str,
    base_dir: &Path,
    aliases: &dyn AliasResolver,
) -> StubforgeResult<PathBuf> {
    let file = file.trim();
    if file.starts_with('@') {
        aliases.resolve(file)
    } else if file.starts_with('/') {
        Ok(PathBuf::from(file))
    } else {
        Ok(base_dir.join(file))
    }
}

#[cfg(test)]
mod tests {
    use stubforge_core::{domain::DomainError, error::ErrorCategory};

    use super::*;
    use crate::{AliasMap, MemoryFilesystem};

    fn renderer(fs: &MemoryFilesystem) -> HandlebarsRenderer {
        HandlebarsRenderer::new(
            Arc::new(fs.clone()),
            Arc::new(AliasMap::new().with_alias("@shared", "/shared")),
        )
    }

    fn ctx() -> RenderContext {
        RenderContext::new()
            .with_variable("className", "UserController")
            .with_variable("namespace", "App\\Http\\Controller")
    }

    #[test]
    fn literal_text_is_unchanged() {
        let fs = MemoryFilesystem::new();
        let text = "<?php\n// plain & simple <tag>\n";
        let out = renderer(&fs)
            .render_source(Path::new("/tpl/x.stub"), text, &RenderContext::new())
            .unwrap();
        assert_eq!(out, text);
    }

    #[test]
    fn variables_are_not_html_escaped() {
        let fs = MemoryFilesystem::new();
        let out = renderer(&fs)
            .render_source(
                Path::new("/tpl/x.stub"),
                "namespace {{namespace}};\nclass {{className}} {}",
                &ctx(),
            )
            .unwrap();
        assert_eq!(out, "namespace App\\Http\\Controller;\nclass UserController {}");
    }

    #[test]
    fn unknown_variables_render_empty() {
        let fs = MemoryFilesystem::new();
        let out = renderer(&fs)
            .render_source(Path::new("/tpl/x.stub"), "[{{missing}}]", &ctx())
            .unwrap();
        assert_eq!(out, "[]");
    }

    #[test]
    fn rendering_is_repeatable() {
        let fs = MemoryFilesystem::new().with_file("/tpl/a.stub", "class {{className}}");
        let r = renderer(&fs);
        let first = r.render(Path::new("/tpl/a.stub"), &ctx()).unwrap();
        let second = r.render(Path::new("/tpl/a.stub"), &ctx()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_template_is_not_found() {
        let fs = MemoryFilesystem::new();
        let err = renderer(&fs)
            .render(Path::new("/tpl/none.stub"), &ctx())
            .unwrap_err();
        assert!(matches!(
            err,
            StubforgeError::Application(ApplicationError::TemplateNotFound { .. })
        ));
    }

    #[test]
    fn unbalanced_braces_are_syntax_errors() {
        let fs = MemoryFilesystem::new().with_file("/tpl/bad.stub", "{{#if x}}never closed");
        let err = renderer(&fs)
            .render(Path::new("/tpl/bad.stub"), &ctx())
            .unwrap_err();
        assert!(matches!(
            err,
            StubforgeError::Application(ApplicationError::TemplateSyntaxError { .. })
        ));
    }

    #[test]
    fn relative_include_uses_template_dir() {
        let fs = MemoryFilesystem::new()
            .with_file("/tpl/main.stub", "head{{include file=\"parts/body.txt\"}}")
            .with_file("/tpl/parts/body.txt", "{{className}} raw");
        let out = renderer(&fs)
            .render(Path::new("/tpl/main.stub"), &ctx())
            .unwrap();
        assert_eq!(out, "head\n{{className}} raw");
    }

    #[test]
    fn alias_and_absolute_includes_resolve() {
        let fs = MemoryFilesystem::new()
            .with_file(
                "/tpl/main.stub",
                "{{include file=\"@shared/a.txt\"}}{{include file=\"/abs/b.txt\"}}",
            )
            .with_file("/shared/a.txt", "A")
            .with_file("/abs/b.txt", "B");
        let out = renderer(&fs)
            .render(Path::new("/tpl/main.stub"), &ctx())
            .unwrap();
        assert_eq!(out, "\nA\nB");
    }

    #[test]
    fn missing_include_is_reported_with_path() {
        let fs = MemoryFilesystem::new().with_file("/tpl/main.stub", "{{include file=\"gone.txt\"}}");
        let err = renderer(&fs)
            .render(Path::new("/tpl/main.stub"), &ctx())
            .unwrap_err();
        assert!(matches!(
            err,
            StubforgeError::Application(ApplicationError::IncludePathNotFound { ref path })
                if path.as_path() == Path::new("/tpl/gone.txt")
        ));
    }

    #[test]
    fn unknown_include_alias_keeps_its_error() {
        let fs = MemoryFilesystem::new().with_file("/tpl/main.stub", "{{include file=\"@nope/x.stub\"}}");
        let err = renderer(&fs)
            .render(Path::new("/tpl/main.stub"), &ctx())
            .unwrap_err();
        assert!(matches!(
            err,
            StubforgeError::Domain(DomainError::UnknownAlias { ref alias, .. }) if alias == "@nope"
        ));
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn render_to_file_creates_parent_dirs() {
        let fs = MemoryFilesystem::new().with_file("/tpl/a.stub", "class {{className}}");
        renderer(&fs)
            .render_to_file(
                Path::new("/tpl/a.stub"),
                &ctx(),
                Path::new("/out/app/Http/UserController.php"),
            )
            .unwrap();
        assert_eq!(
            fs.read_file(Path::new("/out/app/Http/UserController.php"))
                .as_deref(),
            Some("class UserController")
        );
    }

    #[test]
    fn failed_write_is_write_error() {
        let fs = MemoryFilesystem::new().with_read_only("/locked");
        let err = renderer(&fs)
            .write_raw(Path::new("/locked/a.php"), "x")
            .unwrap_err();
        assert!(matches!(
            err,
            StubforgeError::Application(ApplicationError::WriteError { .. })
        ));
    }
}
