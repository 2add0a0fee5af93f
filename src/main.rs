//! Main application for cheUriBuddy's Video Downloader GUI

// External downloader spawning logic (yt-dlp)
mod downloader;
// Data models for requests, events, and outcomes
mod model;
// OS file-manager and browser helpers
mod platform;
// Progress parsing utilities
mod progress;
// Pre-flight input validation
mod validate;

use model::{DownloadEvent, DownloadMode, RunOutcome, ValidationError};

// eframe/egui for GUI application framework
use eframe::{App, Frame, egui};
// OnceCell for single-time runtime initialization
use once_cell::sync::OnceCell;
// FileDialog for folder selection, MessageDialog for notifications
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use std::sync::Arc;
use tokio::{
    runtime::Runtime,
    sync::mpsc::{UnboundedReceiver, error::TryRecvError, unbounded_channel},
};
use egui::Visuals;

// Global Tokio runtime stored in a OnceCell for lazy init
static RUNTIME: OnceCell<Arc<Runtime>> = OnceCell::new();

/// Opened in a browser tab after every successful download
const PROMO_URL: &str = "https://www.youtube.com/@cheUriBuddy";

/// Program entry point: initializes logging, runtime, and the GUI
fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt::init();

    // Create a new Tokio runtime and store it globally
    let rt = Arc::new(Runtime::new().unwrap());
    RUNTIME.set(rt).unwrap();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([750.0, 620.0]),
        ..Default::default()
    };
    eframe::run_native(
        "cheUriBuddy's Video Downloader",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(Visuals::dark());
            Box::new(DownloaderApp::default())
        }),
    )
}

/// Application state for the GUI
struct DownloaderApp {
    /// Input field for the video URL
    url_input: String,
    /// Selected download mode (video or audio-only)
    mode: DownloadMode,
    /// Destination folder for downloads
    destination: String,
    /// Append-only log of yt-dlp output
    log: String,
    /// Latest scraped percentage (0.0 to 100.0), last match wins
    percent: f32,
    /// True while a run is in flight; gates the form controls
    running: bool,
    /// Event channel from the current run's worker, if any
    events_rx: Option<UnboundedReceiver<DownloadEvent>>,
    /// Current theme selection
    dark_mode: bool,
}

impl Default for DownloaderApp {
    fn default() -> Self {
        Self {
            url_input: String::new(),
            mode: DownloadMode::Video,
            destination: String::new(),
            log: String::new(),
            percent: 0.0,
            running: false,
            events_rx: None,
            dark_mode: true,
        }
    }
}

impl DownloaderApp {
    /// Validates the form and, if it passes, spawns one download run
    fn start_download(&mut self) {
        self.log.clear();
        self.percent = 0.0;

        match validate::build_request(&self.url_input, self.mode, &self.destination) {
            Ok(request) => {
                self.log.push_str("Starting download...\n");
                self.running = true;
                let (tx, rx) = unbounded_channel();
                self.events_rx = Some(rx);
                let command = downloader::tool_command(&request);
                RUNTIME.get().unwrap().spawn(downloader::run(command, tx));
            }
            Err(err) => {
                // The run never started, so the controls stay operable
                let (title, level) = match err {
                    ValidationError::MissingInput => ("Missing URL", MessageLevel::Warning),
                    ValidationError::InvalidUrl => ("Invalid URL", MessageLevel::Error),
                    ValidationError::MissingDestination => ("Missing Folder", MessageLevel::Warning),
                };
                MessageDialog::new()
                    .set_level(level)
                    .set_title(title)
                    .set_description(&err.to_string())
                    .show();
            }
        }
    }

    /// Reports the terminal outcome of a finished run to the user
    fn handle_outcome(&mut self, outcome: RunOutcome) {
        match outcome {
            RunOutcome::Success => {
                self.log.push_str("\nDownload completed successfully.\n");
                let open_now = MessageDialog::new()
                    .set_level(MessageLevel::Info)
                    .set_title("Download Complete")
                    .set_description("Download completed!\n\nOpen folder now?")
                    .set_buttons(MessageButtons::YesNo)
                    .show();
                if open_now {
                    if let Err(err) = platform::open_folder(&self.destination) {
                        // Non-fatal: the download itself already succeeded
                        MessageDialog::new()
                            .set_level(MessageLevel::Error)
                            .set_title("Error")
                            .set_description(&format!("Could not open folder:\n{err}"))
                            .show();
                    }
                }
                platform::open_in_browser(PROMO_URL);
            }
            RunOutcome::ProcessFailed => {
                self.log.push_str("\nDownload failed.\n");
                MessageDialog::new()
                    .set_level(MessageLevel::Error)
                    .set_title("Failed")
                    .set_description("Download failed.")
                    .show();
            }
            RunOutcome::ToolNotFound => {
                MessageDialog::new()
                    .set_level(MessageLevel::Error)
                    .set_title("Error")
                    .set_description("yt-dlp is not installed or not in system PATH.")
                    .show();
            }
        }
    }

    /// Resets all form fields and the log view
    fn clear_fields(&mut self) {
        self.url_input.clear();
        self.destination.clear();
        self.log.clear();
        self.percent = 0.0;
    }
}

/// GUI update loop: called each frame to redraw and handle interactions
impl App for DownloaderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // 1️⃣ Drain the worker channel for this frame
        let mut finished = None;
        let mut disconnected = false;
        if let Some(rx) = &mut self.events_rx {
            loop {
                match rx.try_recv() {
                    Ok(DownloadEvent::LogLine(line)) => {
                        self.log.push_str(&line);
                        self.log.push('\n');
                    }
                    Ok(DownloadEvent::Progress(percent)) => {
                        // Last match wins; yt-dlp may reissue percentages per fragment
                        self.percent = percent;
                    }
                    Ok(DownloadEvent::Finished(outcome)) => {
                        finished = Some(outcome);
                        break;
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
        }
        // The controls are re-enabled on every path out of a run, including a
        // worker that died without reporting
        if finished.is_some() || disconnected {
            self.running = false;
            self.events_rx = None;
        }
        if let Some(outcome) = finished {
            self.handle_outcome(outcome);
        }

        // 2️⃣ Main panel: form, actions, progress, and log
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("🎬 cheUriBuddy's Video Downloader");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("🌓 Toggle Theme").clicked() {
                        self.dark_mode = !self.dark_mode;
                        ctx.set_visuals(if self.dark_mode {
                            Visuals::dark()
                        } else {
                            Visuals::light()
                        });
                    }
                });
            });
            ui.separator();

            // Everything the user can fill in is locked while a run is in flight
            ui.add_enabled_ui(!self.running, |ui| {
                ui.label("Any Video URL:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.url_input)
                        .desired_width(f32::INFINITY)
                        .hint_text("https://..."),
                );

                ui.add_space(8.0);
                ui.label("Download Format:");
                ui.horizontal(|ui| {
                    ui.radio_value(&mut self.mode, DownloadMode::Video, "Video");
                    ui.radio_value(&mut self.mode, DownloadMode::Audio, "Audio Only (mp3)");
                });

                ui.add_space(8.0);
                ui.label("Save To Folder:");
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.destination)
                            .desired_width(ui.available_width() - 90.0),
                    );
                    if ui.button("Browse").clicked() {
                        if let Some(folder) = FileDialog::new().pick_folder() {
                            self.destination = folder.display().to_string();
                        }
                    }
                });

                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    if ui.button("⬇ Download").clicked() {
                        self.start_download();
                    }
                    if ui.button("🗑 Clear").clicked() {
                        self.clear_fields();
                    }
                });
            });

            // 3️⃣ Progress bar with the latest scraped percentage
            ui.add_space(12.0);
            ui.add(
                egui::ProgressBar::new(self.percent / 100.0)
                    .text(format!("{:.1}%", self.percent)),
            );

            // 4️⃣ Scrolling log view of the tool's raw output
            ui.add_space(8.0);
            ui.label("Download Log:");
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut self.log.as_str())
                            .font(egui::TextStyle::Monospace)
                            .desired_width(f32::INFINITY)
                            .desired_rows(14),
                    );
                });
        });

        // Request periodic repaint so streamed output shows up promptly
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
