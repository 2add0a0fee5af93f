use thiserror::Error;

/// Which kind of download the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadMode {
    /// Plain video download (yt-dlp default container)
    #[default]
    Video,
    /// Audio extraction to mp3
    Audio,
}

/// A validated, per-run download request built from the form fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Video page URL (starts with http:// or https://)
    pub url: String,
    /// Video or audio-only mode
    pub mode: DownloadMode,
    /// Destination folder handed to yt-dlp via -P
    pub destination: String,
}

/// Terminal classification of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// yt-dlp exited with code 0
    Success,
    /// yt-dlp ran but exited non-zero
    ProcessFailed,
    /// yt-dlp could not be launched (not installed / not on PATH)
    ToolNotFound,
}

/// Messages sent from the download worker to the UI loop
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadEvent {
    /// One verbatim line of yt-dlp output for the log view
    LogLine(String),
    /// Latest percentage scraped from the output (0.0 to 100.0)
    Progress(f32),
    /// The run is over; sent exactly once per run
    Finished(RunOutcome),
}

/// Pre-flight validation failures; the Display text is shown in the dialog
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a video URL.")]
    MissingInput,
    #[error("Please enter a valid URL starting with http or https.")]
    InvalidUrl,
    #[error("Please choose a download folder.")]
    MissingDestination,
}
