use chrono::Local;

/// Maximum lines to keep in the log before trimming
const MAX_LOG_LINES: usize = 2000;
/// Number of oldest lines to remove when trimming
const LOG_TRIM_COUNT: usize = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    Status,
    Message,
    Error,
}

/// One line in the UI log area
#[derive(Clone, Debug)]
pub struct LogLine {
    pub timestamp: String,
    pub kind: LineKind,
    pub text: String,
}

impl LogLine {
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            kind,
            text: text.into(),
        }
    }
}

/// Append-only, bounded log shown in the main window.
#[derive(Default, Clone, Debug)]
pub struct LogBuffer {
    lines: Vec<LogLine>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: LogLine) {
        self.lines.push(line);
        if self.lines.len() > MAX_LOG_LINES {
            self.lines.drain(0..LOG_TRIM_COUNT);
        }
    }

    pub fn push_status(&mut self, text: impl Into<String>) {
        self.push(LogLine::new(LineKind::Status, text));
    }

    pub fn push_message(&mut self, text: impl Into<String>) {
        self.push(LogLine::new(LineKind::Message, text));
    }

    pub fn push_error(&mut self, text: impl Into<String>) {
        self.push(LogLine::new(LineKind::Error, text));
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Texts of all lines of one kind, oldest first.
    pub fn texts(&self, kind: LineKind) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| l.text.as_str())
            .collect()
    }
}
