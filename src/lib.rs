/*!
 * DirPack - Pack a directory tree into a single XML snapshot for LLM context
 *
 * This library walks a directory tree, filters entries through a glob-based
 * ignore-pattern set, and emits one XML document containing per-file metadata
 * and full line-by-line content.
 */

pub mod config;
pub mod error;
pub mod packer;
pub mod patterns;
pub mod report;
pub mod tokenizer;


// Re-export main components for easier access
pub use config::Config;
pub use error::{PackError, Result};
pub use packer::{FileDetail, PackStats, Packer};
pub use patterns::PatternSet;
pub use report::{PackReport, ReportFormat, Reporter};
pub use tokenizer::count_tokens;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
