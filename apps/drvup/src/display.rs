//! Output rendering and formatting

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use drvup_ops::OperationResult;
use drvup_types::{ColorChoice, DryRunReport, ResultCode, UpdateReport};
use std::fmt::Write as _;
use std::io;

/// Terminal statement when any selected item or the service demands a restart
pub const RESTART_REQUIRED: &str = "A restart is required to complete installation.";

/// Terminal statement when nothing demands a restart
pub const NO_RESTART: &str = "No restart required.";

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Color configuration
    color_choice: ColorChoice,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool, color_choice: ColorChoice) -> Self {
        Self {
            json_output,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        if self.json_output {
            self.render_json(result)
        } else {
            self.render_table(result)
        }
    }

    /// Render as JSON
    fn render_json(&self, result: &OperationResult) -> io::Result<()> {
        println!("{}", serde_json::to_string_pretty(result).map_err(io::Error::other)?);
        Ok(())
    }

    /// Render as formatted text
    fn render_table(&self, result: &OperationResult) -> io::Result<()> {
        match result {
            OperationResult::NoUpdates => println!("No driver updates available."),
            OperationResult::DryRun(report) => print!("{}", self.dry_run_text(report)),
            OperationResult::Applied(report) => print!("{}", self.applied_text(report)),
        }
        Ok(())
    }

    /// Build the dry-run summary
    fn dry_run_text(&self, report: &DryRunReport) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Dry Run Summary");
        let _ = writeln!(out);
        let _ = writeln!(out, "Would process ({}):", report.candidates.len());
        for title in &report.candidates {
            let _ = writeln!(out, "  • {title}");
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Searched {} candidate(s).", report.searched);
        let _ = writeln!(out, "Nothing was downloaded or installed.");
        out
    }

    /// Build the applied-run summary with the per-item result table
    fn applied_text(&self, report: &UpdateReport) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Result").add_attribute(Attribute::Bold),
            Cell::new("Error").add_attribute(Attribute::Bold),
            Cell::new("Reboot").add_attribute(Attribute::Bold),
        ]);

        for item in &report.items {
            let result_cell = match item.result.code {
                ResultCode::Succeeded => {
                    Cell::new(result_code_text(item.result.code)).fg(Color::Green)
                }
                ResultCode::SucceededWithErrors => {
                    Cell::new(result_code_text(item.result.code)).fg(Color::Yellow)
                }
                ResultCode::Failed | ResultCode::Aborted => {
                    Cell::new(result_code_text(item.result.code)).fg(Color::Red)
                }
                _ => Cell::new(result_code_text(item.result.code)),
            };

            let error_text = item
                .result
                .native_code_hex()
                .unwrap_or_else(|| "-".to_string());

            let reboot_cell = if item.result.reboot_required {
                Cell::new("Yes").fg(Color::Yellow)
            } else {
                Cell::new("No")
            };

            table.add_row(vec![
                Cell::new(&item.title),
                result_cell,
                Cell::new(error_text),
                reboot_cell,
            ]);
        }

        let mut out = String::new();
        let _ = writeln!(out, "Update Summary");
        let _ = writeln!(out);
        let _ = writeln!(out, "{table}");
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Overall: {}",
            self.style_overall(&result_code_text(report.overall), report.overall)
        );
        let _ = writeln!(
            out,
            "Searched {} candidate(s) in {}ms.",
            report.searched, report.duration_ms
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", restart_statement(report.reboot_required));
        out
    }

    /// Style the overall verdict
    fn style_overall(&self, text: &str, code: ResultCode) -> String {
        if !self.supports_color() {
            return text.to_string();
        }
        let style = match code {
            ResultCode::Succeeded => Style::new().green(),
            ResultCode::SucceededWithErrors => Style::new().yellow(),
            ResultCode::Failed | ResultCode::Aborted => Style::new().red(),
            _ => Style::new(),
        };
        style.apply_to(text).to_string()
    }

    /// Check if color output is supported
    fn supports_color(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }
}

/// Human-readable text for a result code
pub fn result_code_text(code: ResultCode) -> String {
    match code {
        ResultCode::NotStarted => "Not started".to_string(),
        ResultCode::InProgress => "In progress".to_string(),
        ResultCode::Succeeded => "Succeeded".to_string(),
        ResultCode::SucceededWithErrors => "Succeeded with errors".to_string(),
        ResultCode::Failed => "Failed".to_string(),
        ResultCode::Aborted => "Aborted".to_string(),
        ResultCode::Unknown(code) => format!("Unknown ({code})"),
    }
}

/// The restart statement for a finished run
pub fn restart_statement(reboot_required: bool) -> &'static str {
    if reboot_required {
        RESTART_REQUIRED
    } else {
        NO_RESTART
    }
}

/// One-line outcome for the transcript
pub fn outcome_line(result: &OperationResult) -> String {
    match result {
        OperationResult::NoUpdates => "No driver updates available.".to_string(),
        OperationResult::DryRun(report) => format!(
            "Dry run: {} update(s) would be processed.",
            report.candidates.len()
        ),
        OperationResult::Applied(report) => format!(
            "Overall: {}. {}",
            result_code_text(report.overall),
            restart_statement(report.reboot_required)
        ),
    }
}
