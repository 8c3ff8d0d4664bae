use std::collections::BTreeMap;
use std::fmt;

use super::classify::{detect_topic, skip_phrase};
use super::fragments::{self, Fragment};
use super::sections::SectionTracker;
use crate::record::{GradeLevel, OptionKey, Options, QuestionRecord};

/// Why a question was dropped. These are routine for a heuristic extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    EmptyStem,
    Skipped(&'static str),
    /// Collected option letters, when they are not exactly a–d.
    OptionKeys(Vec<char>),
    NoCorrectAnswer,
}

impl Rejection {
    /// Short label used for grouping in reports.
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::EmptyStem => "empty stem",
            Rejection::Skipped(_) => "skip-filtered",
            Rejection::OptionKeys(_) => "wrong option keys",
            Rejection::NoCorrectAnswer => "no correct answer",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::EmptyStem => f.write_str("empty stem"),
            Rejection::Skipped(phrase) => write!(f, "skip-filtered ({phrase:?})"),
            Rejection::OptionKeys(keys) => {
                let keys: String = keys.iter().collect();
                write!(f, "wrong option keys ({keys:?})")
            }
            Rejection::NoCorrectAnswer => f.write_str("no correct answer"),
        }
    }
}

/// Parse the question whose number marker sits at `start`.
///
/// Always returns the index of the first fragment not consumed, so the caller
/// can resume there whether or not a record came out.
pub fn parse_question(
    fragments: &[Fragment],
    start: usize,
    grade: GradeLevel,
    number: &str,
    sections: &SectionTracker,
) -> (Result<QuestionRecord, Rejection>, usize) {
    let ends_scope = |f: &Fragment| sections.is_header(f);

    // ── Stem: marker residue + everything up to the first option marker ──
    let mut stem_parts = Vec::new();
    let first = fragments::strip_question_prefix(&fragments[start].text);
    if !first.is_empty() {
        stem_parts.push(first);
    }

    let mut i = start + 1;
    while i < fragments.len() {
        let frag = &fragments[i];
        if fragments::is_option_start(&frag.text) || ends_scope(frag) {
            break;
        }
        stem_parts.push(frag.text.as_str());
        i += 1;
    }

    if stem_parts.is_empty() {
        return (Err(Rejection::EmptyStem), i);
    }
    let stem = stem_parts.join(" ").trim().to_string();

    if let Some(phrase) = skip_phrase(&stem) {
        return (Err(Rejection::Skipped(phrase)), i);
    }

    // ── Options: each letter marker plus its wrapped continuation lines ──
    let mut options: BTreeMap<char, String> = BTreeMap::new();
    let mut correct: Option<char> = None;

    while i < fragments.len() {
        let frag = &fragments[i];
        let Some(letter) = fragments::option_letter(&frag.text) else {
            // Question marker or section header: this question is over.
            break;
        };

        let mut parts = Vec::new();
        let first = fragments::strip_option_prefix(&frag.text);
        if !first.is_empty() {
            parts.push(first);
        }
        if frag.is_bold {
            correct = Some(letter);
        }

        i += 1;
        while i < fragments.len() {
            let next = &fragments[i];
            if fragments::is_option_start(&next.text)
                || fragments::is_question_start(&next.text)
                || ends_scope(next)
            {
                break;
            }
            parts.push(next.text.as_str());
            if next.is_bold {
                correct = Some(letter);
            }
            i += 1;
        }

        let text = parts.join(" ").trim().to_string();
        if !text.is_empty() {
            options.insert(letter, text);
        }
    }

    (validate(stem, options, correct, grade, number), i)
}

fn validate(
    stem: String,
    mut options: BTreeMap<char, String>,
    correct: Option<char>,
    grade: GradeLevel,
    number: &str,
) -> Result<QuestionRecord, Rejection> {
    if !options.keys().copied().eq(['a', 'b', 'c', 'd']) {
        return Err(Rejection::OptionKeys(options.into_keys().collect()));
    }
    let Some(correct_answer) = correct.and_then(OptionKey::from_letter) else {
        return Err(Rejection::NoCorrectAnswer);
    };

    let mut take = |letter: char| options.remove(&letter).unwrap_or_default();
    let options = Options {
        a: take('a'),
        b: take('b'),
        c: take('c'),
        d: take('d'),
    };

    Ok(QuestionRecord {
        id: grade.question_id(number),
        grade_level: grade,
        topic: detect_topic(&stem),
        question: stem,
        options,
        correct_answer,
    })
}
