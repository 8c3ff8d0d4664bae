use std::fmt;

use serde::Serialize;

/// Target student grade band, as announced by a section header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum GradeLevel {
    #[serde(rename = "4-5")]
    Grades4To5,
    #[serde(rename = "6-8")]
    Grades6To8,
    #[serde(rename = "9-12")]
    Grades9To12,
}

impl GradeLevel {
    /// Header tokens in the order they are checked.
    pub const ALL: [GradeLevel; 3] = [
        GradeLevel::Grades4To5,
        GradeLevel::Grades6To8,
        GradeLevel::Grades9To12,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GradeLevel::Grades4To5 => "4-5",
            GradeLevel::Grades6To8 => "6-8",
            GradeLevel::Grades9To12 => "9-12",
        }
    }

    /// Question id for this grade: `g68-14`.
    pub fn question_id(self, number: &str) -> String {
        format!("g{}-{}", self.as_str().replace('-', ""), number)
    }
}

impl fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKey {
    A,
    B,
    C,
    D,
}

impl OptionKey {
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'a' => Some(OptionKey::A),
            'b' => Some(OptionKey::B),
            'c' => Some(OptionKey::C),
            'd' => Some(OptionKey::D),
            _ => None,
        }
    }
}

/// The four answer texts of a question, serialized as `{"a": .., "d": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Options {
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Topic {
    #[serde(rename = "wind")]
    Wind,
    #[serde(rename = "solar")]
    Solar,
    #[serde(rename = "turbine")]
    Turbine,
    #[serde(rename = "electricity")]
    Electricity,
    #[serde(rename = "renewable")]
    Renewable,
    #[serde(rename = "fossil fuels")]
    FossilFuels,
    #[serde(rename = "climate")]
    Climate,
    #[serde(rename = "energy")]
    Energy,
    #[serde(rename = "general")]
    General,
}

impl Topic {
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::Wind => "wind",
            Topic::Solar => "solar",
            Topic::Turbine => "turbine",
            Topic::Electricity => "electricity",
            Topic::Renewable => "renewable",
            Topic::FossilFuels => "fossil fuels",
            Topic::Climate => "climate",
            Topic::Energy => "energy",
            Topic::General => "general",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One extracted multiple-choice question, as consumed by the quiz app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: String,
    pub grade_level: GradeLevel,
    pub question: String,
    pub options: Options,
    pub correct_answer: OptionKey,
    pub topic: Topic,
}
