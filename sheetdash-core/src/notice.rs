//! User-facing notices raised during a rendering pass

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Severity level of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Section of the dashboard a notice belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeScope {
    /// The spreadsheet as a whole
    Document,
    /// One worksheet
    Sheet(String),
    /// One dashboard view, by id
    View(String),
}

impl NoticeScope {
    pub fn sheet_name(&self) -> Option<&str> {
        match self {
            NoticeScope::Sheet(name) => Some(name),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            NoticeScope::Document => 0,
            NoticeScope::Sheet(_) => 1,
            NoticeScope::View(_) => 2,
        }
    }
}

impl PartialOrd for NoticeScope {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NoticeScope {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (NoticeScope::Sheet(a), NoticeScope::Sheet(b)) => a.cmp(b),
            (NoticeScope::View(a), NoticeScope::View(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// A non-fatal message scoped to one section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub scope: NoticeScope,
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(scope: NoticeScope, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            scope,
            message: message.into(),
            severity,
        }
    }
}

/// Notices collected in the order they were raised
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Notices(Vec<Notice>);

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        self.0.push(notice);
    }

    pub fn warn(&mut self, scope: NoticeScope, message: impl Into<String>) {
        self.push(Notice::new(scope, message, Severity::Warning));
    }

    pub fn error(&mut self, scope: NoticeScope, message: impl Into<String>) {
        self.push(Notice::new(scope, message, Severity::Error));
    }

    pub fn info(&mut self, scope: NoticeScope, message: impl Into<String>) {
        self.push(Notice::new(scope, message, Severity::Info));
    }

    pub fn extend(&mut self, other: Notices) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Notice> {
        self.0.iter()
    }

    /// Notices sorted by scope for grouped display; order within a scope is kept.
    pub fn sorted(&self) -> Vec<&Notice> {
        let mut notices: Vec<&Notice> = self.0.iter().collect();
        notices.sort_by(|a, b| a.scope.cmp(&b.scope));
        notices
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.0.iter().filter(|n| n.severity == severity).count()
    }
}

impl<'a> IntoIterator for &'a Notices {
    type Item = &'a Notice;
    type IntoIter = std::slice::Iter<'a, Notice>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
