use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Template used when the configured one is empty or whitespace.
pub const DEFAULT_TEMPLATE: &str = "{Titel} {SeasonNumber} {EpisodeNumber} - {EpisodeName}";

/// Extension used when the configured one is not three alphanumerics.
pub const DEFAULT_EXTENSION: &str = "mkv";

/// Characters that are unsafe in a file name on at least one major platform.
pub const INVALID_FILENAME_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid"));

static EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{3}$").expect("extension pattern is valid"));

/// Make an episode title usable as a file name component.
///
/// Removes every character in [`INVALID_FILENAME_CHARS`] and any leading run of dots.
/// Dots are stripped after the character filter so the result is a fixed point:
/// sanitizing it again changes nothing.
pub fn sanitize_title(title: &str) -> String {
    let filtered: String = title
        .chars()
        .filter(|c| !INVALID_FILENAME_CHARS.contains(c))
        .collect();
    filtered.trim_start_matches('.').to_string()
}

/// Normalize a user supplied extension to `.xyz`.
///
/// Accepts `mkv` or `.mkv`. Anything that is not exactly three ASCII alphanumerics falls
/// back to `default` (and to [`DEFAULT_EXTENSION`] if `default` is itself invalid).
pub fn normalize_extension(extension: &str, default: &str) -> String {
    let candidate = extension.trim().trim_start_matches('.');
    if EXTENSION.is_match(candidate) {
        return format!(".{}", candidate);
    }

    let fallback = default.trim().trim_start_matches('.');
    if EXTENSION.is_match(fallback) {
        format!(".{}", fallback)
    } else {
        format!(".{}", DEFAULT_EXTENSION)
    }
}

/// The naming template mini-language.
///
/// Recognized placeholders are `{Titel}`, `{SeasonNumber}`, `{EpisodeNumber}` and
/// `{EpisodeName}`. Settings files written by older releases used `{SNr}`, `{ENr}` and
/// `{EPName}`; those are accepted as aliases. Anything else in braces is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingTemplate {
    pattern: String,
}

impl NamingTemplate {
    pub fn new(pattern: &str) -> Self {
        let pattern = if pattern.trim().is_empty() {
            DEFAULT_TEMPLATE
        } else {
            pattern
        };
        Self {
            pattern: pattern.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Render a file stem. `episode_position` is 1-based.
    pub fn render(
        &self,
        show_title: &str,
        season: u32,
        episode_position: usize,
        episode_name: &str,
    ) -> String {
        PLACEHOLDER
            .replace_all(&self.pattern, |caps: &Captures| match &caps[1] {
                "Titel" => show_title.to_string(),
                "SeasonNumber" | "SNr" => format!("S{:02}", season),
                "EpisodeNumber" | "ENr" => format!("E{:02}", episode_position),
                "EpisodeName" | "EPName" => episode_name.to_string(),
                _ => caps[0].to_string(),
            })
            .into_owned()
    }
}

impl Default for NamingTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}
