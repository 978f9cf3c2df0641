#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Plain-text persistence for the last session and the survival leaderboard.
//!
//! Both files store `name,seconds` lines. The leaderboard keeps the ten longest
//! survival times in descending order and is truncated on every write.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use tracing::{debug, info};
use undead_survival_core::format_clock;

/// File holding the most recent session.
pub const SAVE_FILE: &str = "playerData.txt";

/// File holding the leaderboard.
pub const LEADERBOARD_FILE: &str = "leaderboard.txt";

/// Number of entries the leaderboard retains.
pub const MAX_LEADERBOARD_ENTRIES: usize = 10;

const DELIMITER: char = ',';
const EMPTY_LEADERBOARD: &str = "No scores yet!";

/// Errors raised while validating or persisting session records.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The player name was blank after trimming.
    #[error("player name is empty")]
    EmptyName,
    /// The player name contains the field delimiter.
    #[error("player name {0:?} must not contain ','")]
    DelimiterInName(String),
    /// The player name spans more than one line.
    #[error("player name {0:?} must fit on a single line")]
    LineBreakInName(String),
    /// Reading or writing a file failed.
    #[error("failed to {action} {}", .path.display())]
    Io {
        /// Operation that failed.
        action: &'static str,
        /// File or directory involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Name and survival time of a finished run.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionRecord {
    player_name: String,
    survived_seconds: f32,
}

impl SessionRecord {
    /// Validates the player name and captures the survival time.
    pub fn new(player_name: &str, survived: Duration) -> Result<Self, StorageError> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(StorageError::EmptyName);
        }
        if player_name.contains(DELIMITER) {
            return Err(StorageError::DelimiterInName(player_name.to_owned()));
        }
        if player_name.contains(['\n', '\r']) {
            return Err(StorageError::LineBreakInName(player_name.to_owned()));
        }
        Ok(Self {
            player_name: player_name.to_owned(),
            survived_seconds: survived.as_secs_f32(),
        })
    }

    /// Name the player entered.
    #[must_use]
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Survival time in seconds.
    #[must_use]
    pub fn survived_seconds(&self) -> f32 {
        self.survived_seconds
    }

    /// Survival time as a duration.
    #[must_use]
    pub fn survived(&self) -> Duration {
        Duration::try_from_secs_f32(self.survived_seconds).unwrap_or_default()
    }

    fn to_line(&self) -> String {
        format!("{}{DELIMITER}{}", self.player_name, self.survived_seconds)
    }

    fn parse_line(line: &str) -> Option<Self> {
        let (name, seconds) = line.split_once(DELIMITER)?;
        if name.trim().is_empty() || seconds.contains(DELIMITER) {
            return None;
        }
        let survived_seconds: f32 = seconds.trim().parse().ok()?;
        if !survived_seconds.is_finite() || survived_seconds < 0.0 {
            return None;
        }
        Some(Self {
            player_name: name.trim().to_owned(),
            survived_seconds,
        })
    }
}

/// Parses leaderboard text, skipping malformed lines.
///
/// The result is sorted by survival time, longest first, and truncated to
/// [`MAX_LEADERBOARD_ENTRIES`].
#[must_use]
pub fn parse_leaderboard(text: &str) -> Vec<SessionRecord> {
    let mut entries: Vec<SessionRecord> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let parsed = SessionRecord::parse_line(line);
            if parsed.is_none() {
                debug!(line, "skipping malformed leaderboard line");
            }
            parsed
        })
        .collect();
    rank(&mut entries);
    entries
}

/// Renders the leaderboard the way the game over screen shows it.
#[must_use]
pub fn render_leaderboard(entries: &[SessionRecord]) -> String {
    if entries.is_empty() {
        return EMPTY_LEADERBOARD.to_owned();
    }

    let mut text = String::from("LEADERBOARD\n----------------\n");
    for (index, entry) in entries.iter().enumerate() {
        text.push_str(&format!(
            "{}. {} - {}\n",
            index + 1,
            entry.player_name,
            format_clock(entry.survived())
        ));
    }
    text
}

fn rank(entries: &mut Vec<SessionRecord>) {
    entries.sort_by(|a, b| b.survived_seconds.total_cmp(&a.survived_seconds));
    entries.truncate(MAX_LEADERBOARD_ENTRIES);
}

/// Directory-backed store for session records.
#[derive(Clone, Debug)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    /// Creates a store rooted at `dir`. The directory is created on first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the store writes into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persists `record` as the last session and merges it into the
    /// leaderboard, returning the updated leaderboard.
    pub fn save_session(&self, record: &SessionRecord) -> Result<Vec<SessionRecord>, StorageError> {
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            action: "create",
            path: self.dir.clone(),
            source,
        })?;

        let save_path = self.dir.join(SAVE_FILE);
        write(&save_path, &record.to_line())?;

        let mut entries = self.leaderboard()?;
        entries.push(record.clone());
        rank(&mut entries);

        let mut text = entries
            .iter()
            .map(SessionRecord::to_line)
            .collect::<Vec<_>>()
            .join("\n");
        text.push('\n');
        write(&self.dir.join(LEADERBOARD_FILE), &text)?;

        info!(
            player = record.player_name.as_str(),
            survived_secs = record.survived_seconds,
            "session saved"
        );
        Ok(entries)
    }

    /// Loads the last saved session, if a readable one exists.
    pub fn load_last_session(&self) -> Result<Option<SessionRecord>, StorageError> {
        let Some(text) = read_optional(&self.dir.join(SAVE_FILE))? else {
            return Ok(None);
        };
        let record = text.lines().next().and_then(SessionRecord::parse_line);
        if record.is_none() {
            debug!("last session file is malformed");
        }
        Ok(record)
    }

    /// Loads the leaderboard; a missing file yields an empty board.
    pub fn leaderboard(&self) -> Result<Vec<SessionRecord>, StorageError> {
        Ok(read_optional(&self.dir.join(LEADERBOARD_FILE))?
            .map(|text| parse_leaderboard(&text))
            .unwrap_or_default())
    }
}

fn write(path: &Path, contents: &str) -> Result<(), StorageError> {
    fs::write(path, contents).map_err(|source| StorageError::Io {
        action: "write",
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional(path: &Path) -> Result<Option<String>, StorageError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StorageError::Io {
            action: "read",
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_validated() {
        let record = SessionRecord::new("  ghoul  ", Duration::from_secs(3)).expect("valid");
        assert_eq!(record.player_name(), "ghoul");
        assert!(matches!(
            SessionRecord::new("   ", Duration::ZERO),
            Err(StorageError::EmptyName)
        ));
        assert!(matches!(
            SessionRecord::new("a,b", Duration::ZERO),
            Err(StorageError::DelimiterInName(_))
        ));
        assert!(matches!(
            SessionRecord::new("ann\nbo", Duration::ZERO),
            Err(StorageError::LineBreakInName(_))
        ));
        assert!(matches!(
            SessionRecord::new("ann\rbo", Duration::ZERO),
            Err(StorageError::LineBreakInName(_))
        ));
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let entries = parse_leaderboard("alice,12.5\nnot a line\nbob,abc\n,4\ncarl,1,2\ndora,-3\neve,7\n");
        let names: Vec<_> = entries.iter().map(SessionRecord::player_name).collect();
        assert_eq!(names, vec!["alice", "eve"]);
    }

    #[test]
    fn rendering_lists_ranked_clock_times() {
        let entries = parse_leaderboard("slow,59.9\nfast,3725\n");
        assert_eq!(
            render_leaderboard(&entries),
            "LEADERBOARD\n----------------\n1. fast - 01:02:05\n2. slow - 00:00:59\n"
        );
        assert_eq!(render_leaderboard(&[]), "No scores yet!");
    }
}
