use miette::IntoDiagnostic;
use std::{fs, io::Read, path::Path};

pub mod cmd;

/// Read a command's input, either from a file or from stdin when the path is `-`.
pub fn read_input(input: &Path) -> miette::Result<String> {
    let text = if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text).into_diagnostic()?;
        text
    } else {
        fs::read_to_string(input).into_diagnostic()?
    };

    tracing::debug!(input = %input.display(), bytes = text.len(), "read input");

    Ok(text)
}
