//! Package location and path helpers.
//!
//! A package is one week's directory under `chapters/`. Locating it is a
//! directory probe; language detection happens once here and every checker
//! reads the profile from the located [`Package`].

use std::path::{Path, PathBuf};

use weekgate_core::{detect_language, Language, LanguageProfile, WeekId};

use crate::error::{PackError, PackResult};

/// Directory under the repository root holding every package.
pub const CHAPTERS_DIR: &str = "chapters";
/// The narrative document.
pub const NARRATIVE_FILE: &str = "CHAPTER.md";
pub const ASSIGNMENT_FILE: &str = "ASSIGNMENT.md";
pub const RUBRIC_FILE: &str = "RUBRIC.md";
/// The QA report with its blocking-items section.
pub const QA_REPORT_FILE: &str = "QA_REPORT.md";

/// A located weekly package.
#[derive(Debug, Clone)]
pub struct Package {
    pub id: WeekId,
    /// Repository root.
    pub root: PathBuf,
    /// `<root>/chapters/week_XX`.
    pub dir: PathBuf,
    pub language: Language,
}

impl Package {
    /// Find the package for `id` under `root` and detect its language.
    pub fn locate(root: &Path, id: WeekId) -> PackResult<Self> {
        let dir = root.join(CHAPTERS_DIR).join(id.as_dir_name());
        if !dir.is_dir() {
            return Err(PackError::PackageNotFound { path: dir }.relative_to(root));
        }
        let language = detect_language(&dir);
        tracing::info!(week = %id, language = language.as_str(), "located package");
        Ok(Self {
            id,
            root: root.to_path_buf(),
            dir,
            language,
        })
    }

    /// The week's canonical name, e.g. `week_03`.
    pub fn name(&self) -> String {
        self.id.as_dir_name()
    }

    pub fn profile(&self) -> &'static LanguageProfile {
        self.language.profile()
    }

    /// Path of a package-relative entry.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.join(rel)
    }

    /// Path of a repository-relative entry.
    pub fn root_path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Render `path` relative to the repository root for messages.
    pub fn display(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_existing_package() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("chapters/week_03")).unwrap();
        let pkg = Package::locate(tmp.path(), WeekId::parse("3").unwrap()).unwrap();
        assert_eq!(pkg.name(), "week_03");
        assert_eq!(pkg.language, Language::Python);
        assert_eq!(pkg.display(&pkg.path("CHAPTER.md")), "chapters/week_03/CHAPTER.md");
    }

    #[test]
    fn test_locate_missing_package() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Package::locate(tmp.path(), WeekId::parse("week_07").unwrap()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing week dir: chapters/week_07/ (create the package first)"
        );
    }

    #[test]
    fn test_file_in_place_of_package_is_missing() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("chapters")).unwrap();
        std::fs::write(tmp.path().join("chapters/week_01"), "").unwrap();
        assert!(Package::locate(tmp.path(), WeekId::parse("1").unwrap()).is_err());
    }
}
