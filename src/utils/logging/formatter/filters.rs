//! Message filtering to remove noisy log output

/// Encoder banner and probe chatter that carries no information for a
/// packaging run.
const NOISE_PATTERNS: &[&str] = &[
    "Invalid Block Addition value",
    "Could not find codec parameters for stream",
    "Consider increasing the value for the 'analyzeduration'",
    "Svt[info]:",
    "SVT [version]",
    "SVT [build]",
    "-------------------------------------------",
    "Last message repeated",
    "matroska,webm",
];

/// Returns true if the message should be displayed
pub fn should_show_message(message: &str) -> bool {
    !NOISE_PATTERNS
        .iter()
        .any(|pattern| message.contains(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_show_normal_message() {
        assert!(should_show_message("Processing file: movie.mkv"));
        assert!(should_show_message("Rung 720p ready (1280x720)"));
    }

    #[test]
    fn test_should_filter_encoder_banner() {
        assert!(!should_show_message("Svt[info]: SVT [version]: SVT-AV1 Encoder Lib v1.7.0"));
        assert!(!should_show_message("Svt[info]: -------------------------------------------"));
    }

    #[test]
    fn test_should_filter_probe_noise() {
        assert!(!should_show_message(
            "Could not find codec parameters for stream 2"
        ));
        assert!(should_show_message("Svt[error]: Instance 1: invalid preset"));
    }
}
