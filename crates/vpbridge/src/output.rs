use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One line of command output: a record that can be printed in any format.
pub trait Record: Serialize {
    fn headers() -> Vec<&'static str>;
    fn cells(&self) -> Vec<String>;
}

/// Print `records` in the chosen format. JSON output is one object per line.
pub fn print_records<R: Record>(records: &[R], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for record in records {
                println!(
                    "{}",
                    serde_json::to_string(record).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(R::headers());
            for record in records {
                table.add_row(record.cells());
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let headers = R::headers();
            for record in records {
                let line: Vec<String> = headers
                    .iter()
                    .zip(record.cells())
                    .filter(|(_, value)| !value.is_empty())
                    .map(|(name, value)| format!("{}={}", name.to_ascii_lowercase(), value))
                    .collect();
                println!("{}", line.join(" "));
            }
        }
    }
}

pub fn print_record<R: Record>(record: &R, format: OutputFormat) {
    print_records(std::slice::from_ref(record), format);
}

/// Render an optional value as a table cell.
pub fn cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
