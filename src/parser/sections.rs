use tracing::info;

use super::fragments::Fragment;
use crate::record::GradeLevel;

pub const DEFAULT_HEADER_MARKER: &str = "Questions Grades";

/// Running grade level for one document traversal.
///
/// Only a bold fragment containing the header phrase can move it, and it only
/// ever moves forward to whatever the latest header announced.
#[derive(Debug, Clone)]
pub struct SectionTracker {
    header_marker: String,
    current: Option<GradeLevel>,
}

impl SectionTracker {
    pub fn new(header_marker: impl Into<String>) -> Self {
        Self {
            header_marker: header_marker.into(),
            current: None,
        }
    }

    pub fn current(&self) -> Option<GradeLevel> {
        self.current
    }

    pub fn is_header(&self, fragment: &Fragment) -> bool {
        fragment.is_bold && fragment.text.contains(self.header_marker.as_str())
    }

    /// Feed one fragment. Returns true when it was a section header.
    pub fn observe(&mut self, fragment: &Fragment) -> bool {
        if !self.is_header(fragment) {
            return false;
        }
        if let Some(grade) = GradeLevel::ALL
            .into_iter()
            .find(|g| fragment.text.contains(g.as_str()))
        {
            if self.current != Some(grade) {
                info!(grade = %grade, header = %fragment.text, "entering grade section");
            }
            self.current = Some(grade);
        }
        true
    }
}

impl Default for SectionTracker {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_until_first_header() {
        let mut tracker = SectionTracker::default();
        assert!(!tracker.observe(&Fragment::bold("1. What is wind?")));
        assert_eq!(tracker.current(), None);
        assert!(tracker.observe(&Fragment::bold("Quizbowl Questions Grades 6-8")));
        assert_eq!(tracker.current(), Some(GradeLevel::Grades6To8));
    }

    #[test]
    fn header_must_be_bold() {
        let mut tracker = SectionTracker::default();
        assert!(!tracker.observe(&Fragment::plain("Questions Grades 4-5")));
        assert_eq!(tracker.current(), None);
    }

    #[test]
    fn later_header_reassigns() {
        let mut tracker = SectionTracker::default();
        tracker.observe(&Fragment::bold("Questions Grades 4-5"));
        tracker.observe(&Fragment::plain("Questions Grades 9-12"));
        assert_eq!(tracker.current(), Some(GradeLevel::Grades4To5));
        tracker.observe(&Fragment::bold("Questions Grades 9-12"));
        assert_eq!(tracker.current(), Some(GradeLevel::Grades9To12));
    }

    #[test]
    fn header_without_token_keeps_grade() {
        let mut tracker = SectionTracker::default();
        tracker.observe(&Fragment::bold("Questions Grades 6-8"));
        assert!(tracker.observe(&Fragment::bold("Questions Grades (continued)")));
        assert_eq!(tracker.current(), Some(GradeLevel::Grades6To8));
    }

    #[test]
    fn custom_header_phrase() {
        let mut tracker = SectionTracker::new("Grade Band");
        tracker.observe(&Fragment::bold("Grade Band 9-12"));
        assert_eq!(tracker.current(), Some(GradeLevel::Grades9To12));
    }
}
