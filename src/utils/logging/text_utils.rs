//! Text wrapping for console log lines

/// Leading marker kept on the first wrapped line of an indented detail line,
/// e.g. `"  -> encoder exited with code 1"`.
fn split_marker(line: &str) -> (&str, &str) {
    let indent = line.len() - line.trim_start().len();
    let rest = &line[indent..];
    let marker = if rest.starts_with("-> ") { indent + 3 } else { indent };
    line.split_at(marker)
}

/// Wraps every line of `text` at word boundaries so no line exceeds
/// `max_width` (single words longer than the width are left intact).
pub fn wrap_text(text: &str, max_width: usize) -> String {
    let mut wrapped = Vec::new();

    for line in text.lines() {
        if line.len() <= max_width {
            wrapped.push(line.to_string());
            continue;
        }

        let (marker, content) = split_marker(line);
        let mut current = marker.to_string();
        let mut current_has_words = false;

        for word in content.split_whitespace() {
            let needed = if current_has_words { word.len() + 1 } else { word.len() };
            if current_has_words && current.len() + needed > max_width {
                wrapped.push(std::mem::take(&mut current));
                current_has_words = false;
            }
            if current_has_words {
                current.push(' ');
            }
            current.push_str(word);
            current_has_words = true;
        }

        if current_has_words {
            wrapped.push(current);
        }
    }

    wrapped.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_short_text() {
        assert_eq!(wrap_text("Rung 720p ready", 80), "Rung 720p ready");
    }

    #[test]
    fn test_wrap_long_text() {
        let text = "Audio #2 failed: encoder exited with code 1: Error while opening encoder for output stream #0:0";
        let result = wrap_text(text, 40);
        assert!(result.contains('\n'));
        for line in result.lines() {
            assert!(line.len() <= 40);
        }
    }

    #[test]
    fn test_wrap_keeps_marker_on_first_line() {
        let text = "  -> encoder exited with code 1: Unknown encoder 'libsvtav1' requested by the configuration";
        let result = wrap_text(text, 40);
        assert!(result.starts_with("  -> encoder"));
        assert!(!result.lines().nth(1).unwrap().starts_with("  ->"));
    }

    #[test]
    fn test_wrap_multiline() {
        let text = "Line one\nLine two that is very long and should be wrapped to fit within the maximum width";
        let lines: Vec<String> = wrap_text(text, 40).lines().map(String::from).collect();
        assert!(lines.len() > 2);
        assert_eq!(lines[0], "Line one");
    }
}
