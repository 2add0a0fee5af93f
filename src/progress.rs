use once_cell::sync::Lazy;
use regex::Regex;

/// Matches yt-dlp progress lines like `[download]  42.7% of 10.00MiB ...`
static PROGRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[download\]\s+(\d{1,3}\.\d)%").unwrap());

/// Scrapes a percentage out of one line of yt-dlp output. Returns the raw
/// value (0.0 to 100.0); callers keep the latest match, with no monotonicity
/// enforcement, since multi-fragment downloads reissue percentages.
pub fn parse_progress(line: &str) -> Option<f32> {
    let captures = PROGRESS_RE.captures(line)?;
    captures.get(1)?.as_str().parse::<f32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_typical_progress_line() {
        let line = "[download]  12.3% of 10.00MiB at 1.50MiB/s ETA 00:06";
        assert_eq!(parse_progress(line), Some(12.3));
    }

    #[test]
    fn parses_full_completion() {
        assert_eq!(parse_progress("[download] 100.0% of 10.00MiB"), Some(100.0));
    }

    #[test]
    fn reparsing_the_same_line_gives_the_same_value() {
        let line = "[download]  87.5% of 10MiB";
        assert_eq!(parse_progress(line), parse_progress(line));
        assert_eq!(parse_progress(line), Some(87.5));
    }

    #[test]
    fn ignores_lines_without_the_download_tag() {
        assert_eq!(parse_progress("42.7% of something"), None);
        assert_eq!(parse_progress("[info] extracting URL"), None);
    }

    #[test]
    fn ignores_percentages_without_a_fractional_digit() {
        assert_eq!(parse_progress("[download] 50% of 10MiB"), None);
    }

    #[test]
    fn ignores_destination_lines() {
        let line = "[download] Destination: /tmp/video.mp4";
        assert_eq!(parse_progress(line), None);
    }
}
