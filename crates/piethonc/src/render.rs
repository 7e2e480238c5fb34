use ariadne::{Color, Label, Report, ReportKind, Source};
use piethon_common::Diagnostic;

use crate::error::CliError;

/// Print one diagnostic to stderr as an ariadne report over `source`.
pub fn print_diagnostic(diag: &Diagnostic, source: &str, file_name: &str) -> Result<(), CliError> {
    let range = diag.loc().byte_range();
    let color = if diag.is_parse_error() {
        Color::Yellow
    } else {
        Color::Red
    };

    Report::build(ReportKind::Error, file_name, range.start)
        .with_message(diag.kind_label())
        .with_label(
            Label::new((file_name, range))
                .with_message(diag.to_string())
                .with_color(color),
        )
        .finish()
        .eprint((file_name, Source::from(source)))
        .map_err(CliError::Render)
}

pub fn print_diagnostics(
    diagnostics: &[Diagnostic],
    source: &str,
    file_name: &str,
) -> Result<(), CliError> {
    for diag in diagnostics {
        print_diagnostic(diag, source, file_name)?;
    }
    Ok(())
}
