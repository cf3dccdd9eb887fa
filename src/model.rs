use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Student identifier as it appears in the roster CSV.
///
/// Integer cells are kept as JSON numbers so `students.json` reads
/// `{"id": 1, ...}`; anything else is stored verbatim as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StudentId {
    Number(i64),
    Text(String),
}

impl StudentId {
    pub fn parse(raw: &str) -> Option<Self> {
        let t = raw.trim();
        if t.is_empty() {
            return None;
        }
        Some(match t.parse::<i64>() {
            Ok(n) => StudentId::Number(n),
            Err(_) => StudentId::Text(t.to_string()),
        })
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudentId::Number(n) => write!(f, "{n}"),
            StudentId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Student {
    pub fn new(id: StudentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            extra: Map::new(),
        }
    }
}

/// Per-exam scoring category. The numeric fields start as placeholders and
/// are corrected by hand in the persisted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDefinition {
    pub name: String,
    pub total_questions: u32,
    pub negative_marking: bool,
    pub cutoff: Number,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionScore {
    pub correct: i64,
    pub wrong: i64,
    pub not_attempted: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Correct,
    Wrong,
    NotAttempted,
}

impl Metric {
    pub fn from_column_suffix(s: &str) -> Option<Self> {
        match s {
            "correct" => Some(Metric::Correct),
            "wrong" => Some(Metric::Wrong),
            "notAttempted" => Some(Metric::NotAttempted),
            _ => None,
        }
    }
}

impl SectionScore {
    pub fn set(&mut self, metric: Metric, value: i64) {
        match metric {
            Metric::Correct => self.correct = value,
            Metric::Wrong => self.wrong = value,
            Metric::NotAttempted => self.not_attempted = value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    pub student_id: StudentId,
    pub sections: IndexMap<String, SectionScore>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamDocument {
    pub exam_name: String,
    pub sections: Vec<SectionDefinition>,
    pub results: Vec<ExamResult>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExamDocument {
    pub fn new(exam_name: impl Into<String>, sections: Vec<SectionDefinition>) -> Self {
        Self {
            exam_name: exam_name.into(),
            sections,
            results: Vec::new(),
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn student_id_keeps_integers_numeric() {
        assert_eq!(StudentId::parse(" 17 "), Some(StudentId::Number(17)));
        assert_eq!(
            StudentId::parse("S-001"),
            Some(StudentId::Text("S-001".into()))
        );
        assert_eq!(StudentId::parse("  "), None);

        let s = Student::new(StudentId::Number(1), "A");
        assert_eq!(
            serde_json::to_value(&s).expect("encode"),
            json!({"id": 1, "name": "A"})
        );
    }

    #[test]
    fn result_serializes_camel_case_in_order() {
        let mut sections = IndexMap::new();
        sections.insert(
            "Math".to_string(),
            SectionScore {
                correct: 8,
                wrong: 2,
                not_attempted: 0,
                ..SectionScore::default()
            },
        );
        let r = ExamResult {
            student_id: StudentId::Number(1),
            sections,
            extra: Map::new(),
        };
        let text = serde_json::to_string(&r).expect("encode");
        assert_eq!(
            text,
            r#"{"studentId":1,"sections":{"Math":{"correct":8,"wrong":2,"notAttempted":0}}}"#
        );
    }

    #[test]
    fn hand_edited_keys_survive_roundtrip() {
        let raw = json!({
            "name": "Math",
            "totalQuestions": 30,
            "negativeMarking": false,
            "cutoff": 37.5,
            "note": "set by coordinator"
        });
        let def: SectionDefinition = serde_json::from_value(raw.clone()).expect("decode");
        assert_eq!(def.total_questions, 30);
        assert_eq!(def.extra.get("note"), Some(&json!("set by coordinator")));
        assert_eq!(serde_json::to_value(&def).expect("encode"), raw);
    }
}
