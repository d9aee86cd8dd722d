//! Styling and formatting for log messages

use console::style;
use tracing::Level;

use super::levels::ProcessingLevel;

/// Formats a log level with appropriate styling. INFO is left unmarked.
pub fn format_level(level: &Level, use_color: bool) -> String {
    let label = match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARN ",
        Level::INFO => return String::new(),
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    };

    if !use_color {
        return label.to_string();
    }

    match *level {
        Level::ERROR => style(label).red().bold().to_string(),
        Level::WARN => style(label).yellow().to_string(),
        Level::DEBUG => style(label).blue().to_string(),
        _ => style(label).magenta().to_string(),
    }
}

/// Gets the tree prefix symbol for a given processing level
pub fn get_tree_prefix(level: ProcessingLevel) -> &'static str {
    match level {
        ProcessingLevel::Root => "▶",
        ProcessingLevel::Stage => "●",
        ProcessingLevel::Step | ProcessingLevel::Detail => " ",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Ok,
    Skipped,
    Failed,
    Neutral,
}

fn outcome_of(message: &str) -> Outcome {
    if message.contains(" failed") {
        Outcome::Failed
    } else if message.contains(" skipped") || message.starts_with("Skipping") {
        Outcome::Skipped
    } else if message.contains(" ready") {
        Outcome::Ok
    } else {
        Outcome::Neutral
    }
}

/// Applies styling to message content based on processing level; step lines
/// are coloured by the outcome they report.
pub fn style_message(message: &str, level: ProcessingLevel, use_color: bool) -> String {
    if !use_color {
        return match level {
            ProcessingLevel::Root => message.to_uppercase(),
            _ => message.to_string(),
        };
    }

    match level {
        ProcessingLevel::Root => style(message).bold().cyan().to_string(),
        ProcessingLevel::Stage => style(message).bold().green().to_string(),
        ProcessingLevel::Step => match outcome_of(message) {
            Outcome::Ok => style(message).green().to_string(),
            Outcome::Skipped => style(message).yellow().to_string(),
            Outcome::Failed => style(message).red().to_string(),
            Outcome::Neutral => style(message).cyan().to_string(),
        },
        ProcessingLevel::Detail => style(message).dim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_level_no_color() {
        assert_eq!(format_level(&Level::ERROR, false), "ERROR");
        assert_eq!(format_level(&Level::WARN, false), "WARN ");
        assert_eq!(format_level(&Level::INFO, false), "");
        assert_eq!(format_level(&Level::DEBUG, false), "DEBUG");
    }

    #[test]
    fn test_format_level_with_color() {
        assert!(format_level(&Level::ERROR, true).contains("ERROR"));
        assert_eq!(format_level(&Level::INFO, true), "");
    }

    #[test]
    fn test_get_tree_prefix() {
        assert_eq!(get_tree_prefix(ProcessingLevel::Root), "▶");
        assert_eq!(get_tree_prefix(ProcessingLevel::Stage), "●");
        assert_eq!(get_tree_prefix(ProcessingLevel::Detail), " ");
    }

    #[test]
    fn test_outcome_detection() {
        assert_eq!(outcome_of("Audio #1 ready (copy)"), Outcome::Ok);
        assert_eq!(outcome_of("Subtitle #4 skipped"), Outcome::Skipped);
        assert_eq!(outcome_of("Rung 1080p failed"), Outcome::Failed);
        assert_eq!(outcome_of("Stream analysis complete"), Outcome::Neutral);
    }

    #[test]
    fn test_style_message_no_color() {
        let msg = "Processing file: a.mkv";
        assert_eq!(
            style_message(msg, ProcessingLevel::Root, false),
            "PROCESSING FILE: A.MKV"
        );
        assert_eq!(style_message(msg, ProcessingLevel::Step, false), msg);
    }

    #[test]
    fn test_style_message_with_color() {
        let msg = "Rung 720p ready";
        assert!(style_message(msg, ProcessingLevel::Step, true).contains(msg));
        assert!(style_message(msg, ProcessingLevel::Stage, true).contains(msg));
    }
}
