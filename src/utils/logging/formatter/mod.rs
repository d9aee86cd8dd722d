//! Console event formatter: tree prefixes, optional timestamps, wrapping

pub mod filters;
pub mod levels;
pub mod styling;

use chrono::Local;
use console::style;
use std::fmt::{self as std_fmt, Debug};
use tracing::Level;
use tracing_subscriber::fmt::{format::Writer, FmtContext, FormatEvent, FormatFields};

use crate::utils::logging::text_utils;
use filters::should_show_message;
use levels::{determine_processing_level, ProcessingLevel};
use styling::{format_level, get_tree_prefix, style_message};

const MAX_LINE_WIDTH: usize = 140;

pub struct CleanFormatter {
    show_timestamps: bool,
    use_color: bool,
}

impl CleanFormatter {
    pub fn new(show_timestamps: bool, use_color: bool) -> Self {
        Self {
            show_timestamps,
            use_color,
        }
    }

    fn format_message(&self, message: &str, metadata_level: &Level) -> String {
        let level = determine_processing_level(message);
        let prefix = get_tree_prefix(level);

        let level_indicator = format_level(metadata_level, self.use_color);
        let level_indicator_width = if level_indicator.is_empty() {
            0
        } else {
            level_indicator.len() + 2
        };

        // "[HH:MM:SS] " plus the two-column tree prefix
        let timestamp_width = if self.show_timestamps { 11 } else { 0 };
        let prefix_width = 2;
        let available_width = MAX_LINE_WIDTH
            .saturating_sub(timestamp_width + prefix_width + level_indicator_width + 4);

        let formatted_content = match level {
            ProcessingLevel::Root => {
                let clean_message =
                    shorten_file_path(message).unwrap_or_else(|| message.to_string());
                style_message(&clean_message, level, self.use_color)
            }
            _ => style_message(message, level, self.use_color),
        };

        let wrapped_content = text_utils::wrap_text(&formatted_content, available_width);

        let level_prefix = if !level_indicator.is_empty() {
            format!("{} ", level_indicator)
        } else {
            String::new()
        };

        if wrapped_content.contains('\n') {
            let lines: Vec<&str> = wrapped_content.lines().collect();
            let first_line = format!("{} {}{}", prefix, level_prefix, lines[0]);

            // Continuation lines align under the message text
            let continuation_indent =
                " ".repeat(timestamp_width + prefix_width + level_indicator_width);
            let continuation_lines: Vec<String> = lines[1..]
                .iter()
                .map(|line| format!("{}{}", continuation_indent, line))
                .collect();

            if continuation_lines.is_empty() {
                first_line
            } else {
                format!("{}\n{}", first_line, continuation_lines.join("\n"))
            }
        } else {
            format!("{} {}{}", prefix, level_prefix, wrapped_content)
        }
    }
}

impl<S, N> FormatEvent<S, N> for CleanFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std_fmt::Result {
        let metadata = event.metadata();
        let message = {
            let mut visitor = MessageVisitor::default();
            event.record(&mut visitor);
            visitor.message
        };

        if !should_show_message(&message) {
            return Ok(());
        }

        let mut output = String::new();

        if self.show_timestamps {
            let now = Local::now();
            let timestamp = if self.use_color {
                style(now.format("%H:%M:%S").to_string())
                    .dim()
                    .to_string()
            } else {
                now.format("%H:%M:%S").to_string()
            };
            output.push_str(&format!("[{}] ", timestamp));
        }

        output.push_str(&self.format_message(&message, metadata.level()));

        writeln!(writer, "{}", output)
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value).trim_matches('"').to_string();
        }
    }
}

/// "Processing file: /long/path/movie.mkv" becomes "Processing file: movie.mkv"
fn shorten_file_path(message: &str) -> Option<String> {
    let (head, path) = message.split_once(": ")?;
    let name = std::path::Path::new(path.trim()).file_name()?.to_string_lossy();
    Some(format!("{}: {}", head, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_file_path() {
        assert_eq!(
            shorten_file_path("Processing file: /media/in/movie.mkv").as_deref(),
            Some("Processing file: movie.mkv")
        );
        assert!(shorten_file_path("Found 3 file(s) to process").is_none());
    }

    #[test]
    fn test_format_message_prefixes() {
        let formatter = CleanFormatter::new(false, false);
        assert!(formatter
            .format_message("Processing file: /in/a.mkv", &Level::INFO)
            .starts_with("▶ PROCESSING FILE: A.MKV"));
        assert!(formatter
            .format_message("Writing master manifest", &Level::INFO)
            .starts_with("● Writing"));
        assert!(formatter
            .format_message("Rung 1080p failed", &Level::WARN)
            .contains("WARN  Rung 1080p failed"));
    }
}
