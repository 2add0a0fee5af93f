use std::{io::ErrorKind, process::Stdio};
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    process::Command,
    sync::mpsc::UnboundedSender,
};
use tracing::{info, warn};

use crate::model::{DownloadEvent, DownloadMode, DownloadRequest, RunOutcome};
use crate::progress::parse_progress;

/// The external tool this app shells out to; resolved on PATH
fn tool_binary() -> &'static str {
    if cfg!(target_os = "windows") { "yt-dlp.exe" } else { "yt-dlp" }
}

/// A fully constructed external invocation, ready to spawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

/// Translates a validated request into the yt-dlp invocation:
/// `yt-dlp <url> -P <destination>`, plus `-x --audio-format mp3` in audio mode.
pub fn tool_command(request: &DownloadRequest) -> ToolCommand {
    let mut args = vec![
        request.url.clone(),
        "-P".to_owned(),
        request.destination.clone(),
    ];
    if request.mode == DownloadMode::Audio {
        args.push("-x".to_owned());
        args.push("--audio-format".to_owned());
        args.push("mp3".to_owned());
    }
    ToolCommand {
        program: tool_binary().to_owned(),
        args,
    }
}

/// Runs one download to completion, streaming every output line and any
/// scraped percentage over the event channel. Sends exactly one
/// `Finished` event, whatever happens. No retries, no timeout.
pub async fn run(command: ToolCommand, events: UnboundedSender<DownloadEvent>) {
    info!(program = %command.program, "starting download run");

    let spawned = Command::new(&command.program)
        .args(&command.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();

    let mut child = match spawned {
        Ok(child) => child,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!(program = %command.program, "tool not found on PATH");
            let _ = events.send(DownloadEvent::Finished(RunOutcome::ToolNotFound));
            return;
        }
        Err(err) => {
            let _ = events.send(DownloadEvent::LogLine(format!("Failed to launch: {err}")));
            let _ = events.send(DownloadEvent::Finished(RunOutcome::ProcessFailed));
            return;
        }
    };

    // Both pipes feed the same channel, giving the UI one merged log stream
    let stdout = child.stdout.take().unwrap();
    let stderr = child.stderr.take().unwrap();
    let stderr_task = tokio::spawn(forward_lines(stderr, events.clone()));
    forward_lines(stdout, events.clone()).await;
    let _ = stderr_task.await;

    let outcome = match child.wait().await {
        Ok(status) if status.success() => RunOutcome::Success,
        Ok(status) => {
            info!(?status, "tool exited with failure");
            RunOutcome::ProcessFailed
        }
        Err(err) => {
            warn!(%err, "failed to collect tool exit status");
            RunOutcome::ProcessFailed
        }
    };
    let _ = events.send(DownloadEvent::Finished(outcome));
}

/// Reads one pipe line by line, emitting a progress sample when a line
/// carries one, then the verbatim line for the log.
async fn forward_lines<R>(reader: R, events: UnboundedSender<DownloadEvent>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if let Some(percent) = parse_progress(&line) {
            let _ = events.send(DownloadEvent::Progress(percent));
        }
        let _ = events.send(DownloadEvent::LogLine(line));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    fn request(mode: DownloadMode) -> DownloadRequest {
        DownloadRequest {
            url: "https://youtu.be/abc".to_owned(),
            mode,
            destination: "/tmp/downloads".to_owned(),
        }
    }

    #[test]
    fn video_mode_adds_no_extra_flags() {
        let command = tool_command(&request(DownloadMode::Video));
        assert_eq!(
            command.args,
            vec!["https://youtu.be/abc", "-P", "/tmp/downloads"]
        );
    }

    #[test]
    fn audio_mode_adds_exactly_the_extraction_flags() {
        let command = tool_command(&request(DownloadMode::Audio));
        assert_eq!(
            command.args,
            vec![
                "https://youtu.be/abc",
                "-P",
                "/tmp/downloads",
                "-x",
                "--audio-format",
                "mp3",
            ]
        );
    }

    /// Drains the channel until the run finishes, returning the log lines,
    /// the last progress sample, and the single terminal outcome.
    async fn collect(command: ToolCommand) -> (Vec<String>, Option<f32>, RunOutcome) {
        let (tx, mut rx) = unbounded_channel();
        run(command, tx).await;

        let mut log = Vec::new();
        let mut percent = None;
        let mut outcome = None;
        while let Some(event) = rx.recv().await {
            match event {
                DownloadEvent::LogLine(line) => log.push(line),
                DownloadEvent::Progress(p) => percent = Some(p),
                DownloadEvent::Finished(o) => {
                    assert!(outcome.is_none(), "more than one terminal outcome");
                    outcome = Some(o);
                }
            }
        }
        (log, percent, outcome.expect("run never finished"))
    }

    #[cfg(unix)]
    fn shell(script: &str) -> ToolCommand {
        ToolCommand {
            program: "sh".to_owned(),
            args: vec!["-c".to_owned(), script.to_owned()],
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_run_reports_final_percentage() {
        let script = "\
            echo '[download]  12.3% of 10MiB'; \
            echo '[download]  87.5% of 10MiB'; \
            echo '[download] 100.0% of 10MiB'";
        let (log, percent, outcome) = collect(shell(script)).await;
        assert_eq!(outcome, RunOutcome::Success);
        assert_eq!(percent, Some(100.0));
        assert_eq!(log.len(), 3);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failed_run_keeps_the_full_log_in_order() {
        let script = "echo 'first line'; echo 'second line'; exit 1";
        let (log, percent, outcome) = collect(shell(script)).await;
        assert_eq!(outcome, RunOutcome::ProcessFailed);
        assert_eq!(percent, None);
        assert_eq!(log, vec!["first line", "second line"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stderr_lines_reach_the_log_too() {
        let script = "echo 'to stderr' 1>&2";
        let (log, _, outcome) = collect(shell(script)).await;
        assert_eq!(outcome, RunOutcome::Success);
        assert_eq!(log, vec!["to stderr"]);
    }

    #[tokio::test]
    async fn missing_binary_is_tool_not_found() {
        let command = ToolCommand {
            program: "definitely-not-a-real-downloader".to_owned(),
            args: vec![],
        };
        let (log, percent, outcome) = collect(command).await;
        assert_eq!(outcome, RunOutcome::ToolNotFound);
        assert_eq!(percent, None);
        assert!(log.is_empty());
    }
}
