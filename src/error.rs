use thiserror::Error;

/// Errors raised while turning an uploaded attendance sheet into a report.
///
/// Every variant aborts the run; nothing is retried and no partial
/// report is produced. Shells render the error with [`ReportError::user_message`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    /// The upload is not a readable xlsx workbook, or it has no header row.
    #[error("{0}")]
    Parse(String),

    /// The sheet is narrower than the highest bound column position needs.
    #[error("expected at least {required} columns but the sheet has {found}")]
    ColumnResolution { required: usize, found: usize },

    /// Writing the report workbook failed.
    #[error("{0}")]
    Serialization(String),
}

impl ReportError {
    /// The single message shown to users when a run fails.
    ///
    /// # Examples
    /// ```
    /// use absentee_report::ReportError;
    ///
    /// let err = ReportError::ColumnResolution { required: 44, found: 10 };
    /// assert_eq!(
    ///     err.user_message(),
    ///     "Error processing file: expected at least 44 columns but the sheet has 10"
    /// );
    /// ```
    pub fn user_message(&self) -> String {
        format!("Error processing file: {}", self)
    }
}

impl From<calamine::XlsxError> for ReportError {
    fn from(e: calamine::XlsxError) -> Self {
        ReportError::Parse(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ReportError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        ReportError::Serialization(e.to_string())
    }
}
