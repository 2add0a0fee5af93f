use std::io;
use std::process::Command;
use tracing::warn;

/// Reveals a folder in the host OS file manager. The spawn error is returned
/// so the caller can surface it; it never changes the run's recorded outcome.
pub fn open_folder(path: &str) -> io::Result<()> {
    #[cfg(target_os = "windows")]
    {
        Command::new("explorer").arg(path).spawn()?;
    }
    #[cfg(target_os = "macos")]
    {
        Command::new("open").arg(path).spawn()?;
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        Command::new("xdg-open").arg(path).spawn()?;
    }
    Ok(())
}

/// Opens a URL in the default browser; failure is only logged
pub fn open_in_browser(url: &str) {
    if let Err(err) = open::that(url) {
        warn!(%err, url, "could not open browser");
    }
}
