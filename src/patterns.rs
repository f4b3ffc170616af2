/*!
 * Ignore-pattern matching
 *
 * Builds the effective ignore-pattern set for one packing run (built-in
 * defaults, repository `.gitignore` entries, caller-supplied extras) and
 * decides which filesystem paths are skipped.
 *
 * Globbing is segment-scoped: `*` and `?` never cross a `/` in the
 * relative-path form, and `**` spans segments. Patterns meant to apply at
 * any depth should target the basename (`*.log`), which is matched
 * independently of the relative path.
 */

use std::fs;
use std::path::Path;

use glob_match::glob_match;
use once_cell::sync::Lazy;

/// Default patterns to ignore
pub static DEFAULT_IGNORE: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Version control
        ".git",
        ".svn",
        ".hg",
        // Editors & IDEs
        ".vscode",
        ".idea",
        "*.swp",
        // Dependencies
        "node_modules",
        "vendor",
        // Build output
        "dist",
        "build",
        "target",
        "venv",
        ".env",
        // OS artifacts
        ".DS_Store",
        "Thumbs.db",
        // Locks & logs
        "*.lock",
        "*.log",
        // Python bytecode
        "__pycache__",
        "*.pyc",
        // Images
        "*.png",
        "*.jpg",
        "*.jpeg",
        "*.gif",
        "*.svg",
        "*.ico",
        // Archives & documents
        "*.zip",
        "*.tar",
        "*.gz",
        "*.pdf",
        // Compiled artifacts
        "*.bin",
        "*.exe",
        "*.so",
        "*.dll",
        "*.class",
    ]
});

/// The complete, ordered set of glob-style exclusion rules for one run
///
/// Constructed once per packing run and immutable afterwards.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<String>,
}

impl PatternSet {
    /// Build the effective pattern set for a run
    ///
    /// Starts from the built-in defaults, appends every non-comment,
    /// non-blank line of `<root>/.gitignore` verbatim (a missing or
    /// unreadable file is silently skipped), then appends all
    /// caller-supplied patterns unmodified.
    pub fn build(root_dir: &Path, user_patterns: &[String]) -> Self {
        let mut patterns: Vec<String> = DEFAULT_IGNORE.iter().map(|p| p.to_string()).collect();

        if let Ok(contents) = fs::read_to_string(root_dir.join(".gitignore")) {
            for line in contents.lines() {
                let line = line.trim();
                if !line.is_empty() && !line.starts_with('#') {
                    patterns.push(line.to_string());
                }
            }
        }

        patterns.extend(user_patterns.iter().cloned());

        Self { patterns }
    }

    /// Check whether a path should be skipped
    ///
    /// A path is ignored if any pattern glob-matches its basename or its
    /// root-relative path. A pattern with a trailing `/` also matches when
    /// the relative path with `/` appended matches it, so `build/` catches
    /// the directory `build`. Basename matching is what lets `*.log` apply
    /// at any depth, while `src/build` only matches that exact relative
    /// path.
    pub fn is_ignored(&self, path: &Path, root_dir: &Path) -> bool {
        let rel_path = path.strip_prefix(root_dir).unwrap_or(path);
        let rel_path = rel_path.to_string_lossy();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        for pattern in &self.patterns {
            if glob_match(pattern, &name) || glob_match(pattern, &rel_path) {
                return true;
            }
            if pattern.ends_with('/') && glob_match(pattern, &format!("{}/", rel_path)) {
                return true;
            }
        }

        false
    }

    /// The patterns in effect, in order
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;

    use tempfile::tempdir;

    use super::PatternSet;

    #[test]
    fn test_default_patterns_present() {
        let dir = tempdir().unwrap();
        let set = PatternSet::build(dir.path(), &[]);

        assert!(set.patterns().iter().any(|p| p == ".git"));
        assert!(set.patterns().iter().any(|p| p == "__pycache__"));
    }

    #[test]
    fn test_gitignore_lines_appended() {
        let dir = tempdir().unwrap();
        let mut gitignore = File::create(dir.path().join(".gitignore")).unwrap();
        writeln!(gitignore, "# comment to drop").unwrap();
        writeln!(gitignore, "*.tmp").unwrap();
        writeln!(gitignore).unwrap();
        writeln!(gitignore, "scratch/").unwrap();

        let set = PatternSet::build(dir.path(), &[]);

        assert!(set.patterns().iter().any(|p| p == "*.tmp"));
        assert!(set.patterns().iter().any(|p| p == "scratch/"));
        assert!(!set.patterns().iter().any(|p| p.starts_with('#')));
    }

    #[test]
    fn test_user_patterns_appended() {
        let dir = tempdir().unwrap();
        let set = PatternSet::build(dir.path(), &["custom_pattern".to_string()]);

        assert!(set.patterns().iter().any(|p| p == "custom_pattern"));
    }

    fn set_of(patterns: &[&str]) -> PatternSet {
        PatternSet {
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_basename_match() {
        let set = set_of(&["__pycache__"]);
        assert!(set.is_ignored(Path::new("/root/__pycache__"), Path::new("/root")));
    }

    #[test]
    fn test_glob_match() {
        let set = set_of(&["*.pyc"]);
        assert!(set.is_ignored(Path::new("/root/test.pyc"), Path::new("/root")));
    }

    #[test]
    fn test_glob_match_at_depth() {
        let set = set_of(&["*.log"]);
        assert!(set.is_ignored(Path::new("/root/deep/nested/out.log"), Path::new("/root")));
    }

    #[test]
    fn test_directory_pattern() {
        let set = set_of(&["build/"]);
        assert!(set.is_ignored(Path::new("/root/build"), Path::new("/root")));
    }

    #[test]
    fn test_relative_path_pattern() {
        let set = set_of(&["src/build"]);
        assert!(set.is_ignored(Path::new("/root/src/build"), Path::new("/root")));
        assert!(!set.is_ignored(Path::new("/root/other/build"), Path::new("/root")));
    }

    #[test]
    fn test_star_is_segment_scoped() {
        let set = set_of(&["src*.log"]);
        // `*` stays within one path segment; deeper files only match when
        // their basename does
        assert!(set.is_ignored(Path::new("/root/srcfile.log"), Path::new("/root")));
        assert!(!set.is_ignored(Path::new("/root/src/deep.log"), Path::new("/root")));
    }

    #[test]
    fn test_no_match() {
        let set = set_of(&["__pycache__"]);
        assert!(!set.is_ignored(Path::new("/root/src/main.py"), Path::new("/root")));
    }
}
