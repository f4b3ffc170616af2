/*!
 * Tree walking and XML serialization
 *
 * Visits directories depth-first in sorted order, applies the ignore-pattern
 * set to every entry, sniffs out binary files, and streams a nested XML
 * document into an append-only buffer owned by the run. Totals are computed
 * over the assembled body and a finalized header is prepended afterwards, so
 * the header carries counts that cover the whole emitted document.
 */

use std::collections::HashMap;
use std::env;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use indicatif::ProgressBar;

use crate::config::Config;
use crate::error::{PackError, Result};
use crate::patterns::PatternSet;
use crate::tokenizer::count_tokens;

/// Per-file detail collected for reporting
#[derive(Debug, Clone, Default)]
pub struct FileDetail {
    /// Number of physical lines in the file
    pub lines: usize,
    /// Approximate token count of the raw content
    pub tokens: usize,
}

/// Aggregate statistics for one packing run
#[derive(Debug, Clone, Default)]
pub struct PackStats {
    /// Number of text files emitted into the document
    pub total_files: usize,
    /// UTF-8 byte size of the emitted document
    pub total_size: usize,
    /// Approximate token count of the emitted document, markup included
    pub total_tokens: usize,
    /// Details for each emitted file, keyed by relative path
    pub file_details: HashMap<String, FileDetail>,
}

/// Packer for directory contents
///
/// Owns the output buffer and counters for exactly one run; a fresh packer
/// is needed per run.
pub struct Packer {
    /// Effective ignore patterns for this run
    patterns: PatternSet,
    /// Absolute traversal root
    root_dir: PathBuf,
    /// Absolute output path, excluded from traversal
    output_file: PathBuf,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
    /// Serialized body fragments, appended in traversal order
    body: String,
    /// Files emitted so far
    total_files: usize,
    /// Per-file detail for reporting
    file_details: HashMap<String, FileDetail>,
}

impl Packer {
    /// Create a packer for one run
    ///
    /// Resolves the root and output paths to absolute form and builds the
    /// ignore-pattern set.
    pub fn new(config: Config, progress: Arc<ProgressBar>) -> Result<Self> {
        let root_dir = fs::canonicalize(&config.target_dir).map_err(|_| {
            PackError::PathNotFound(config.target_dir.display().to_string())
        })?;
        let output_file = resolve_output_path(&config.output_file)?;
        let patterns = PatternSet::build(&root_dir, &config.ignore_patterns);

        Ok(Self {
            patterns,
            root_dir,
            output_file,
            progress,
            body: String::new(),
            total_files: 0,
            file_details: HashMap::new(),
        })
    }

    /// Walk the tree and write the finalized document to the output path
    ///
    /// Fails only when the output destination cannot be written. Unreadable
    /// files are warned about and skipped; unlistable directories are
    /// treated as empty subtrees.
    pub fn pack(&mut self) -> Result<PackStats> {
        self.progress
            .set_message(format!("Packing {}", self.root_dir.display()));

        let root = self.root_dir.clone();
        self.walk_directory(&root, 1);

        // Totals are computed over the provisional document so a second run
        // over an unchanged tree reproduces them exactly.
        let declaration = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
        let provisional_open = format!(
            "<repository root=\"{}\">\n",
            escape_attr(&self.root_dir.to_string_lossy())
        );
        let closing = "</repository>";

        let provisional_len = declaration.len()
            + provisional_open.len()
            + self.body.len()
            + closing.len();
        let mut provisional = String::with_capacity(provisional_len);
        provisional.push_str(declaration);
        provisional.push_str(&provisional_open);
        provisional.push_str(&self.body);
        provisional.push_str(closing);

        let total_size = provisional.len();
        let total_tokens = count_tokens(&provisional);

        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%S GMT").to_string();
        let open = format!(
            "<repository root=\"{}\" timestamp=\"{}\" total_files=\"{}\" total_size=\"{}\" total_tokens=\"{}\">\n",
            escape_attr(&self.root_dir.to_string_lossy()),
            timestamp,
            self.total_files,
            total_size,
            total_tokens,
        );

        let mut document =
            String::with_capacity(declaration.len() + open.len() + self.body.len() + closing.len());
        document.push_str(declaration);
        document.push_str(&open);
        document.push_str(&self.body);
        document.push_str(closing);

        fs::write(&self.output_file, &document).map_err(|source| PackError::OutputWrite {
            path: self.output_file.display().to_string(),
            source,
        })?;

        Ok(PackStats {
            total_files: self.total_files,
            total_size,
            total_tokens,
            file_details: self.file_details.clone(),
        })
    }

    /// The absolute output path for this run
    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    /// Visit one directory level, emitting entries in sorted order
    fn walk_directory(&mut self, dir: &Path, depth: usize) {
        // Listing failure (typically permissions) degrades to an empty
        // subtree rather than aborting the run.
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };

        let mut names: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.file_name()))
            .collect();
        names.sort();

        let indent = "  ".repeat(depth);

        for name in names {
            let full_path = dir.join(&name);

            if full_path == self.output_file {
                continue;
            }
            if self.patterns.is_ignored(&full_path, &self.root_dir) {
                continue;
            }

            let rel_path = full_path
                .strip_prefix(&self.root_dir)
                .unwrap_or(&full_path)
                .to_path_buf();
            let name = name.to_string_lossy().to_string();

            if full_path.is_dir() {
                self.body.push_str(&format!(
                    "{}<directory name=\"{}\" path=\"{}\" depth=\"{}\">\n",
                    indent,
                    escape_attr(&name),
                    escape_attr(&rel_path.to_string_lossy()),
                    depth,
                ));
                self.walk_directory(&full_path, depth + 1);
                self.body.push_str(&format!("{}</directory>\n", indent));
            } else if full_path.is_file() {
                // Binary skip is a filtering outcome, not a failure.
                if is_binary(&full_path) {
                    continue;
                }
                self.write_file(&full_path, &name, &rel_path, &indent, depth);
            }
        }
    }

    /// Serialize one text file with per-line metadata
    fn write_file(&mut self, path: &Path, name: &str, rel_path: &Path, indent: &str, depth: usize) {
        self.progress.inc(1);
        self.progress.set_message(format!("Current file: {}", name));

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("Warning: failed to read {}: {}", path.display(), e);
                return;
            }
        };
        // Permissive decode: invalid sequences are replaced, never fatal.
        let content = String::from_utf8_lossy(&bytes);

        let tokens = count_tokens(&content);
        let lines: Vec<&str> = content.lines().collect();
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();

        self.total_files += 1;
        self.file_details.insert(
            rel_path.to_string_lossy().to_string(),
            FileDetail {
                lines: lines.len(),
                tokens,
            },
        );

        self.body.push_str(&format!(
            "{}<file name=\"{}\" path=\"{}\" size=\"{}\" tokens=\"{}\" type=\"file\" extension=\"{}\" lines=\"{}\" depth=\"{}\">\n",
            indent,
            escape_attr(name),
            escape_attr(&rel_path.to_string_lossy()),
            bytes.len(),
            tokens,
            escape_attr(&extension),
            lines.len(),
            depth,
        ));

        for (i, line) in lines.iter().enumerate() {
            let safe_line = escape_cdata(line);
            let length = line.chars().count();
            let indentation = line.chars().take_while(|c| c.is_whitespace()).count();

            self.body.push_str(&format!(
                "{}  <line index=\"{}\" length=\"{}\" indentation=\"{}\"><![CDATA[{}]]></line>\n",
                indent,
                i + 1,
                length,
                indentation,
                safe_line,
            ));
        }

        self.body.push_str(&format!("{}</file>\n", indent));
    }
}

/// Classify a file as binary by sniffing its first 1024 bytes for a null
/// byte. Unreadable files count as binary, the fail-safe default.
pub fn is_binary(path: &Path) -> bool {
    let mut chunk = Vec::with_capacity(1024);
    match File::open(path) {
        Ok(file) => match file.take(1024).read_to_end(&mut chunk) {
            Ok(_) => chunk.contains(&0),
            Err(_) => true,
        },
        Err(_) => true,
    }
}

/// Resolve the output path to absolute form with symlinks resolved
///
/// The root is canonicalized, so the output path must be too or the
/// path-equality check that keeps the output file out of its own pack
/// fails whenever the root argument goes through a symlink. The file
/// itself may not exist yet, so the parent directory is canonicalized
/// and the file name rejoined.
fn resolve_output_path(path: &Path) -> Result<PathBuf> {
    let abs = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir().map_err(PackError::Io)?.join(path)
    };

    match (abs.parent(), abs.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            match fs::canonicalize(parent) {
                Ok(parent) => Ok(parent.join(name)),
                Err(_) => Ok(abs),
            }
        }
        _ => Ok(abs),
    }
}

/// Escape a string for use inside an XML attribute value
fn escape_attr(value: &str) -> String {
    if !value.contains(&['&', '<', '>', '"'][..]) {
        return value.to_string();
    }
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Make raw line text safe inside a CDATA section
///
/// A literal `]]>` would terminate the section early. Splitting it into
/// `]]]]><![CDATA[>` closes the section after `]]` and reopens it before
/// `>`, so concatenating the sections reassembles the original text. The
/// split handles arbitrary content, including runs of `]`.
fn escape_cdata(line: &str) -> String {
    line.replace("]]>", "]]]]><![CDATA[>")
}
