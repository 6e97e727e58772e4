use std::io::Write;

use owo_colors::OwoColorize;
use refsolve_core::ResolveError;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the banner above the rendered formats.
pub fn print_header(w: &mut dyn Write, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", "--- Output reference ---".bold())?;
    } else {
        writeln!(w, "--- Output reference ---")?;
    }
    writeln!(w)?;
    Ok(())
}

/// Print one rendered format under its name. Renderings end with a
/// newline, so the trailing `writeln!` leaves a blank separator line.
pub fn print_rendering(
    w: &mut dyn Write,
    name: &str,
    rendered: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", format!("--- {}", name).cyan())?;
    } else {
        writeln!(w, "--- {}", name)?;
    }
    writeln!(w, "{}", rendered)?;
    Ok(())
}

/// Print the failure line for a reference that could not be resolved.
pub fn print_failure(
    w: &mut dyn Write,
    reference: &str,
    error: &ResolveError,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(
            w,
            "{} could not resolve {}: {}",
            "error:".red().bold(),
            reference,
            error
        )?;
    } else {
        writeln!(w, "error: could not resolve {}: {}", reference, error)?;
    }
    Ok(())
}
