pub mod clusters;
pub mod fs;
pub mod jobs;
pub mod runs;
pub mod workspace;

pub use clusters::*;
pub use fs::*;
pub use jobs::*;
pub use runs::*;
pub use workspace::*;

use chrono::DateTime;
use dialoguer::{Confirm, theme::ColorfulTheme};
use serde::Serialize;

use crate::error::DatabricksError;
use crate::models::OutputFormat;

/// Print `value` in a structured format, or hand it to `text` for the text format
pub fn print_output<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce(&T),
) -> Result<(), DatabricksError> {
    match format.render(value)? {
        Some(rendered) => println!("{}", rendered.trim_end()),
        None => text(value),
    }
    Ok(())
}

/// Render epoch milliseconds as UTC, e.g. "2024-01-31 12:00:00"
pub fn format_millis(millis: Option<i64>) -> String {
    millis
        .and_then(DateTime::from_timestamp_millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Ask a yes/no question on the terminal, defaulting to no
pub fn confirm(prompt: &str) -> Result<bool, DatabricksError> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| DatabricksError::Prompt(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis(Some(0)), "1970-01-01 00:00:00");
        assert_eq!(format_millis(Some(1_706_702_400_000)), "2024-01-31 12:00:00");
        assert_eq!(format_millis(None), "-");
    }

    #[test]
    fn test_print_output_text_uses_callback() {
        let mut called = false;
        print_output(OutputFormat::Text, &42, |v| {
            assert_eq!(*v, 42);
            called = true;
        })
        .unwrap();
        assert!(called);
    }

    #[test]
    fn test_print_output_json_skips_callback() {
        print_output(OutputFormat::Json, &42, |_| panic!("text callback must not run")).unwrap();
    }
}
