use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: String,
    pub title: String,
    pub description: String,
    pub track_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Length in whole seconds.
    pub duration_secs: u64,
    /// Signed, time-limited stream URL handed to the external player.
    pub playable_url: String,
}

impl Track {
    /// `title<sep>artist`, or just the title when the artist is blank.
    pub fn display(&self, sep: &str) -> String {
        let artist = self.artist.trim();
        if artist.is_empty() {
            self.title.clone()
        } else {
            format!("{}{}{}", self.title, sep, artist)
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display(" - "))
    }
}

/// Format a number of seconds as `MM:SS` (minutes keep growing past an hour).
pub fn format_mmss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
