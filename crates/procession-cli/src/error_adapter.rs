//! Error adapter for converting ProcessionError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Input errors are
//! rendered with a labeled snippet of the offending JSON.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use procession::ProcessionError;

/// Adapter for a JSON input error with its source text.
pub struct InputDiagnostic<'a> {
    err: &'a serde_json::Error,
    src: &'a str,
}

impl<'a> InputDiagnostic<'a> {
    pub fn new(err: &'a serde_json::Error, src: &'a str) -> Self {
        Self { err, src }
    }

    /// Byte span of the error location in the source.
    fn span(&self) -> SourceSpan {
        let offset = byte_offset(self.src, self.err.line(), self.err.column());
        let len = self.src[offset..]
            .chars()
            .next()
            .map_or(0, char::len_utf8);
        SourceSpan::new(offset.into(), len)
    }
}

impl fmt::Debug for InputDiagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputDiagnostic")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for InputDiagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid diagram input")
    }
}

impl std::error::Error for InputDiagnostic<'_> {}

impl MietteDiagnostic for InputDiagnostic<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("procession::input"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.err.classify() {
            serde_json::error::Category::Io => return None,
            serde_json::error::Category::Syntax => "the input is not valid JSON",
            serde_json::error::Category::Data => {
                "the input is valid JSON but does not match the diagram input schema"
            }
            serde_json::error::Category::Eof => "the input ends unexpectedly",
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_primary_with_span(Some(self.err.to_string()), self.span());
        Some(Box::new(std::iter::once(label)))
    }
}

/// Adapter for [`ProcessionError`] variants without source information.
pub struct ErrorAdapter<'a>(pub &'a ProcessionError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            ProcessionError::Io(_) => "procession::io",
            ProcessionError::Input { .. } => "procession::input",
            ProcessionError::Output(_) => "procession::output",
            ProcessionError::Config(_) => "procession::config",
            ProcessionError::Style(_) => "procession::style",
            ProcessionError::Solver(_) => "procession::solver",
        };
        Some(Box::new(code))
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// An input error with source location information.
    Input(InputDiagnostic<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Input(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Input(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Input(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Input(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Input(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Input(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a [`ProcessionError`] into a reportable error.
pub fn to_reportable(err: &ProcessionError) -> Reportable<'_> {
    match err {
        ProcessionError::Input { err, src } => Reportable::Input(InputDiagnostic::new(err, src)),
        _ => Reportable::Error(ErrorAdapter(err)),
    }
}

/// Converts serde_json's one-based line and byte column into a byte offset
/// into `src`.
///
/// Positions past the end of a line or of the source are clamped, and an
/// offset inside a multi-byte character moves back to its first byte.
fn byte_offset(src: &str, line: usize, column: usize) -> usize {
    let line_start = src
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum::<usize>();
    let line_len = src[line_start..].split('\n').next().map_or(0, str::len);

    let mut offset = line_start + column.saturating_sub(1).min(line_len);
    while !src.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use procession::{identifier::EdgeId, solver::SolverError};

    use super::*;

    fn input_error(src: &str) -> ProcessionError {
        let err = serde_json::from_str::<procession::model::DiagramInput>(src).unwrap_err();
        ProcessionError::new_input_error(err, src)
    }

    #[test]
    fn test_byte_offset() {
        let src = "{\n  \"a\": x\n}";
        assert_eq!(byte_offset(src, 1, 1), 0);
        assert_eq!(byte_offset(src, 2, 8), 9);
        assert_eq!(&src[byte_offset(src, 2, 8)..byte_offset(src, 2, 8) + 1], "x");
        assert_eq!(byte_offset(src, 3, 1), 11);
        assert_eq!(byte_offset(src, 9, 9), src.len());
    }

    #[test]
    fn test_byte_offset_counts_bytes_after_multibyte_chars() {
        let src = r#"{"processes": [{"id": 1, "name": "Zahlungsprüfungsübersicht", "level": 5}]}"#;
        let err = serde_json::from_str::<procession::model::DiagramInput>(src).unwrap_err();
        let offset = byte_offset(src, err.line(), err.column());
        assert!(src[offset..].starts_with("5}]}"), "label at {:?}", &src[offset..]);

        // A column landing inside `ü` steps back to its first byte.
        let inside = src.find('ü').unwrap() + 1;
        assert_eq!(byte_offset(src, 1, inside + 1), inside - 1);
    }

    #[test]
    fn test_input_error_is_labeled() {
        let src = "{\n  \"processes\": [\n    {\"id\": true}\n  ]\n}";
        let err = input_error(src);

        let reportable = to_reportable(&err);
        let Reportable::Input(diag) = &reportable else {
            panic!("Expected input diagnostic");
        };
        let labels: Vec<_> = diag.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].primary());
        // The label points into the third line.
        assert!(labels[0].offset() > src.find("{\"id\"").unwrap());
        assert_eq!(
            reportable.code().map(|c| c.to_string()).as_deref(),
            Some("procession::input")
        );
        assert!(reportable.help().is_some());
    }

    #[test]
    fn test_eof_error_span_is_in_bounds() {
        let src = "{\"processes\": [";
        let err = input_error(src);
        let Reportable::Input(diag) = to_reportable(&err) else {
            panic!("Expected input diagnostic");
        };
        let labels: Vec<_> = diag.labels().unwrap().collect();
        assert!(labels[0].offset() + labels[0].len() <= src.len());
    }

    #[test]
    fn test_non_input_error() {
        let err = ProcessionError::Solver(SolverError::UnknownEdge(
            "iml-1-2".parse::<EdgeId>().unwrap(),
        ));
        let reportable = to_reportable(&err);
        match &reportable {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "Solver error: Unknown edge `iml-1-2`");
            }
            Reportable::Input(_) => panic!("Expected Error"),
        }
        assert_eq!(
            reportable.code().map(|c| c.to_string()).as_deref(),
            Some("procession::solver")
        );
    }
}
