use crate::coordinator::JobRecord;

/// Number of id characters shown in tables.
pub const SHORT_ID_LEN: usize = 8;

/// Completion state of a job, derived only from its finish time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Running,
    Done,
}

impl JobState {
    /// A finish time starting with `0` (the zero timestamp) marks a running job.
    pub fn from_finish_time(finish_time: &str) -> Self {
        if finish_time.starts_with('0') {
            JobState::Running
        } else {
            JobState::Done
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            JobState::Running => "⟳",
            JobState::Done => "✓",
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Running => write!(f, "running"),
            JobState::Done => write!(f, "done"),
        }
    }
}

/// A job as reported by one worker node.
///
/// Raw coordinator values are kept untouched; the `*_display` accessors
/// produce the table strings.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: String,
    pub worker_name: String,
    /// Elapsed seconds
    pub duration: f64,
    pub start_time: String,
    pub finish_time: String,
}

impl Job {
    pub fn from_record(record: JobRecord, worker_name: &str) -> Self {
        Self {
            id: record.id,
            worker_name: worker_name.to_string(),
            duration: record.duration,
            start_time: record.start_time,
            finish_time: record.finish_time,
        }
    }

    pub fn state(&self) -> JobState {
        JobState::from_finish_time(&self.finish_time)
    }

    pub fn is_running(&self) -> bool {
        self.state() == JobState::Running
    }

    pub fn short_id(&self) -> &str {
        char_slice(&self.id, 0, SHORT_ID_LEN)
    }

    pub fn duration_display(&self) -> String {
        format!("{:.2}", self.duration)
    }

    pub fn start_time_display(&self) -> String {
        display_timestamp(&self.start_time)
    }

    /// Empty while the job is still running.
    pub fn finish_time_display(&self) -> String {
        match self.state() {
            JobState::Running => String::new(),
            JobState::Done => display_timestamp(&self.finish_time),
        }
    }
}

/// Turn `2024-05-01T12:00:00.123Z` into `2024-05-01 12:00:00`.
///
/// Date is the first 10 characters, time is characters 11..19. Shorter input
/// yields whatever part is present.
pub fn display_timestamp(raw: &str) -> String {
    let date = char_slice(raw, 0, 10);
    let time = char_slice(raw, 11, 19);
    if time.is_empty() {
        date.to_string()
    } else {
        format!("{} {}", date, time)
    }
}

/// Substring by character positions, clamped to the string length.
fn char_slice(s: &str, start: usize, end: usize) -> &str {
    let byte_at = |n: usize| s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len());
    let from = byte_at(start);
    let to = byte_at(end).max(from);
    &s[from..to]
}
