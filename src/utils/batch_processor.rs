use crate::core::extractor::{CommentSource, DocxCommentExtractor};
use crate::core::workbook::{RowWriter, XlsxWriter};
use crate::CommentRow;
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A per-file (or output) failure collected during a batch.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FileFailure {
    /// The listed input path does not exist.
    #[error("File not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// The input exists but is not a readable document.
    #[error("Error processing file {}:\n{message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// The output spreadsheet could not be written.
    #[error("Error saving output file:\n{message}")]
    Save { path: PathBuf, message: String },
}

/// Preconditions that stop a batch before any file is touched.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BatchError {
    #[error("Please select input files and an output file.")]
    MissingArguments,
}

/// Fraction of the batch's input files that have been handled.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }
}

/// Outcome of one batch run: every extracted row plus every failure.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub rows: Vec<CommentRow>,
    pub failures: Vec<FileFailure>,
    pub files_processed: usize,
    pub output: PathBuf,
    pub saved: bool,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.saved && self.failures.is_empty()
    }

    /// All failures as one message, or `None` when there were none.
    pub fn error_report(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }
        let joined = self
            .failures
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join("\n\n");
        Some(format!("The following errors occurred:\n\n{}", joined))
    }
}

/// Runs comment extraction over a list of files and writes one spreadsheet.
pub struct BatchProcessor<S = DocxCommentExtractor> {
    source: S,
    writer: XlsxWriter,
}

impl BatchProcessor {
    pub fn new() -> Self {
        Self::with_source(DocxCommentExtractor)
    }
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CommentSource> BatchProcessor<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            writer: XlsxWriter,
        }
    }

    /// Process `inputs` in order and save the rows to `output`.
    ///
    /// A missing or unreadable input is recorded and skipped; a failed save is
    /// recorded too. `progress` is called after each input.
    pub fn run<F>(&self, inputs: &[PathBuf], output: &Path, mut progress: F) -> Result<BatchReport, BatchError>
    where
        F: FnMut(Progress),
    {
        if inputs.is_empty() || output.as_os_str().is_empty() {
            return Err(BatchError::MissingArguments);
        }

        info!("Starting batch of {} files, output: {}", inputs.len(), output.display());

        let mut report = BatchReport {
            output: output.to_path_buf(),
            ..BatchReport::default()
        };
        let total = inputs.len();

        for (i, path) in inputs.iter().enumerate() {
            match self.process_file(path) {
                Ok(rows) => {
                    info!("Extracted {} comments from {}", rows.len(), path.display());
                    report.rows.extend(rows);
                    report.files_processed += 1;
                }
                Err(failure) => {
                    warn!("{}", failure);
                    report.failures.push(failure);
                }
            }
            progress(Progress {
                completed: i + 1,
                total,
            });
        }

        match self.writer.write_rows(output, &report.rows) {
            Ok(()) => report.saved = true,
            Err(e) => {
                error!("Failed to save {}: {:#}", output.display(), e);
                report.failures.push(FileFailure::Save {
                    path: output.to_path_buf(),
                    message: format!("{:#}", e),
                });
            }
        }

        info!(
            "Batch finished: {} rows, {} failures",
            report.rows.len(),
            report.failures.len()
        );
        Ok(report)
    }

    fn process_file(&self, path: &Path) -> Result<Vec<CommentRow>, FileFailure> {
        if !path.exists() {
            return Err(FileFailure::NotFound {
                path: path.to_path_buf(),
            });
        }

        let file_name = base_name(path);
        debug!("Processing file: {}", path.display());

        let comments = self.source.extract(path).map_err(|e| FileFailure::Parse {
            path: path.to_path_buf(),
            message: format!("{:#}", e),
        })?;

        Ok(comments
            .into_iter()
            .map(|c| CommentRow::new(file_name.clone(), c))
            .collect())
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse a newline-separated list of paths, ignoring blank lines.
pub fn parse_path_list(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}
