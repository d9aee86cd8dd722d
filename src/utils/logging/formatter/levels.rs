/// Processing level determination for hierarchical log output

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingLevel {
    Root,   // Per-file and batch lines
    Stage,  // Pipeline stages of one input
    Step,   // Track and rung outcomes
    Detail, // Everything else
}

const ROOT_MARKERS: &[&str] = &["Processing file", "Batch complete"];

const STAGE_PREFIXES: &[&str] = &[
    "Packaging subtitle tracks",
    "Packaging audio tracks",
    "Writing master manifest",
    "Encoding video ladder",
    "Package complete",
    "Package failed",
];

const STEP_PREFIXES: &[&str] = &[
    "Stream analysis complete",
    "Subtitle #",
    "Audio #",
    "Rung ",
    "Planned ",
    "Skipping",
];

/// Determines the processing level of a log message based on its content
pub fn determine_processing_level(message: &str) -> ProcessingLevel {
    if ROOT_MARKERS.iter().any(|m| message.starts_with(m))
        || (message.starts_with("Found") && message.contains("file(s) to process"))
    {
        return ProcessingLevel::Root;
    }

    if STAGE_PREFIXES.iter().any(|p| message.starts_with(p)) {
        return ProcessingLevel::Stage;
    }

    // Indented continuation lines ("  -> reason") stay at detail level
    if !message.starts_with(' ') && STEP_PREFIXES.iter().any(|p| message.starts_with(p)) {
        return ProcessingLevel::Step;
    }

    ProcessingLevel::Detail
}
