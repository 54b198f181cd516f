use std::path::{Path, PathBuf};

/// Where a template lives on disk.
///
/// An explicit `file` wins; otherwise the path is `dir/filename + ext`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLocation {
    pub file: Option<PathBuf>,
    pub dir: PathBuf,
    pub filename: String,
    pub ext: String,
}

impl TemplateLocation {
    pub fn new(dir: impl AsRef<Path>, filename: &str, ext: &str) -> Self {
        let ext = normalize_ext(ext);
        let filename = filename
            .strip_suffix(ext.as_str())
            .filter(|_| !ext.is_empty())
            .unwrap_or(filename)
            .to_owned();

        Self {
            file: None,
            dir: dir.as_ref().to_path_buf(),
            filename,
            ext,
        }
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn resolve(&self) -> PathBuf {
        match &self.file {
            Some(file) => file.clone(),
            None => self.dir.join(format!("{}{}", self.filename, self.ext)),
        }
    }
}

/// `"stub"`, `".stub"` and `"..stub"` all become `".stub"`; empty stays empty.
pub fn normalize_ext(ext: &str) -> String {
    let trimmed = ext.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(".{trimmed}")
    }
}
