use tracing::debug;

use super::extract::{parse_question, Rejection};
use super::fragments::{self, Fragment};
use super::sections::SectionTracker;
use crate::record::{GradeLevel, QuestionRecord};

/// A question that was found but not emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedQuestion {
    pub page: usize,
    pub grade: GradeLevel,
    pub number: String,
    pub rejection: Rejection,
}

#[derive(Debug, Default)]
pub struct PageQuestions {
    pub records: Vec<QuestionRecord>,
    pub rejected: Vec<RejectedQuestion>,
}

/// Split one page's fragments into questions.
///
/// Section headers move the tracker as they are passed, so each question gets
/// the grade announced most recently before its number marker. Markers seen
/// before any header are ignored.
pub fn extract_questions_from_page(
    fragments: &[Fragment],
    page: usize,
    sections: &mut SectionTracker,
) -> PageQuestions {
    let mut out = PageQuestions::default();
    let mut i = 0;

    while i < fragments.len() {
        let frag = &fragments[i];
        if sections.observe(frag) {
            i += 1;
            continue;
        }

        let (Some(grade), Some(number)) = (sections.current(), fragments::question_number(&frag.text))
        else {
            i += 1;
            continue;
        };

        let (result, next) = parse_question(fragments, i, grade, number, sections);
        match result {
            Ok(record) => out.records.push(record),
            Err(rejection) => {
                debug!(page, grade = %grade, number, %rejection, "question rejected");
                out.rejected.push(RejectedQuestion {
                    page,
                    grade,
                    number: number.to_string(),
                    rejection,
                });
            }
        }
        // parse_question always consumes at least the marker
        i = next.max(i + 1);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::OptionKey;

    fn question(number: u32, stem: &str, answer: char) -> Vec<Fragment> {
        let mut frags = vec![Fragment::plain(format!("{number}. {stem}"))];
        for letter in ['a', 'b', 'c', 'd'] {
            let text = format!("{letter}. option {letter}");
            frags.push(Fragment::new(text, letter == answer));
        }
        frags
    }

    fn tracker_in(grade: &str) -> SectionTracker {
        let mut tracker = SectionTracker::default();
        tracker.observe(&Fragment::bold(format!("Questions Grades {grade}")));
        tracker
    }

    #[test]
    fn consecutive_questions() {
        let mut frags = question(1, "What is wind?", 'a');
        frags.extend(question(2, "What is a volt?", 'c'));
        frags.extend(question(3, "What is coal?", 'd'));

        let page = extract_questions_from_page(&frags, 2, &mut tracker_in("4-5"));
        let ids: Vec<&str> = page.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["g45-1", "g45-2", "g45-3"]);
        assert_eq!(page.records[1].correct_answer, OptionKey::C);
        assert!(page.rejected.is_empty());
    }

    #[test]
    fn nothing_before_first_header() {
        let mut frags = question(1, "What is wind?", 'a');
        frags.push(Fragment::bold("Questions Grades 9-12"));
        frags.extend(question(1, "What is wind shear?", 'b'));

        let mut tracker = SectionTracker::default();
        let page = extract_questions_from_page(&frags, 1, &mut tracker);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].id, "g912-1");
        assert_eq!(page.records[0].question, "What is wind shear?");
        assert_eq!(tracker.current(), Some(GradeLevel::Grades9To12));
    }

    #[test]
    fn mid_page_header_switches_grade() {
        let mut frags = question(20, "What is solar power?", 'a');
        frags.push(Fragment::bold("Questions Grades 9-12"));
        frags.extend(question(1, "What is a turbine?", 'b'));

        let page = extract_questions_from_page(&frags, 4, &mut tracker_in("6-8"));
        let ids: Vec<&str> = page.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["g68-20", "g912-1"]);
        assert_eq!(page.records[0].options.d, "option d");
    }

    #[test]
    fn rejected_question_does_not_swallow_next() {
        let mut frags = question(1, "Draw an arrow to show the air flow", 'a');
        frags.extend(question(2, "What is energy?", 'b'));

        let page = extract_questions_from_page(&frags, 3, &mut tracker_in("6-8"));
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].id, "g68-2");
        assert_eq!(page.rejected.len(), 1);
        assert_eq!(page.rejected[0].number, "1");
        assert_eq!(page.rejected[0].rejection, Rejection::Skipped("draw an arrow"));
    }

    #[test]
    fn diagram_question_never_emitted() {
        let frags = question(8, "Label the diagram", 'b');
        let page = extract_questions_from_page(&frags, 3, &mut tracker_in("4-5"));
        assert!(page.records.is_empty());
        assert!(matches!(page.rejected[0].rejection, Rejection::Skipped("diagram")));
    }

    #[test]
    fn five_option_question_dropped() {
        let mut frags = question(5, "Which is renewable?", 'b');
        frags.push(Fragment::plain("e. none of the above"));
        frags.extend(question(6, "Which is a fossil fuel?", 'c'));

        let page = extract_questions_from_page(&frags, 2, &mut tracker_in("6-8"));
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].id, "g68-6");
    }

    #[test]
    fn numbers_inside_option_text_are_not_markers() {
        let frags = vec![
            Fragment::plain("4. How many blades?"),
            Fragment::plain("a. 2 blades"),
            Fragment::bold("b. 3 blades"),
            Fragment::plain("c. 4 blades"),
            Fragment::plain("d. 5 blades"),
        ];
        let page = extract_questions_from_page(&frags, 2, &mut tracker_in("4-5"));
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].options.b, "3 blades");
    }
}
