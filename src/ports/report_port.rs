//! Report generation port trait.

use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::domain::analysis::AnalysisReport;
use crate::domain::error::PutscoutError;

/// Everything a report writer needs; the timestamp comes from the caller.
pub struct ReportContext<'a> {
    pub report: &'a AnalysisReport,
    pub generated_at: NaiveDateTime,
}

/// Port for writing analysis reports.
pub trait ReportPort {
    /// Returns the paths of the files written.
    fn write(&self, ctx: &ReportContext) -> Result<Vec<PathBuf>, PutscoutError>;
}
