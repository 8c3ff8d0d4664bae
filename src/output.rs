use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::ExtractError;
use crate::record::QuestionRecord;

/// Pretty JSON (2-space indent), non-ASCII written as-is.
pub fn to_json(records: &[QuestionRecord]) -> Result<String, ExtractError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Write the question array, creating parent directories as needed.
pub fn write_questions(path: &Path, records: &[QuestionRecord]) -> Result<(), ExtractError> {
    let json = to_json(records)?;
    let write_err = |source| ExtractError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, json).map_err(write_err)?;

    info!(path = %path.display(), questions = records.len(), "wrote questions");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{GradeLevel, OptionKey, Options, Topic};

    fn record() -> QuestionRecord {
        QuestionRecord {
            id: "g912-7".to_string(),
            grade_level: GradeLevel::Grades9To12,
            question: "Which gas is CO₂?".to_string(),
            options: Options {
                a: "Carbon dioxide".to_string(),
                b: "Ozone".to_string(),
                c: "Methane".to_string(),
                d: "Nitrogen".to_string(),
            },
            correct_answer: OptionKey::A,
            topic: Topic::Climate,
        }
    }

    #[test]
    fn layout_matches_app_format() {
        let json = to_json(&[record()]).unwrap();
        let expected = r#"[
  {
    "id": "g912-7",
    "gradeLevel": "9-12",
    "question": "Which gas is CO₂?",
    "options": {
      "a": "Carbon dioxide",
      "b": "Ozone",
      "c": "Methane",
      "d": "Nitrogen"
    },
    "correctAnswer": "a",
    "topic": "climate"
  }
]"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn empty_collection_is_empty_array() {
        assert_eq!(to_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("src/data/questions.json");
        write_questions(&path, &[record()]).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"g912-7\""));
    }
}
