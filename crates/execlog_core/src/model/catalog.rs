//! Reference entities that execution records point at.
//!
//! # Responsibility
//! - Define student, language and task rows.
//! - Provide insert-side shapes used before identity is assigned.
//!
//! # Invariants
//! - Students and languages are lookup-only for record use-cases.
//! - Tasks may be created from inline request data during record creation.
//! - Serialized field names are camelCase, matching the record views.

use serde::{Deserialize, Serialize};

/// Store-assigned student identifier.
pub type StudentId = i64;
/// Store-assigned language identifier.
pub type LanguageId = i64;
/// Task identifier. Usually store-assigned, may be caller-chosen on inline create.
pub type TaskId = i64;

/// Student who submitted executions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Student fields before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Programming language an execution ran in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub id: LanguageId,
    pub name: String,
}

/// Programming task an execution solved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub description: String,
}

/// Task fields supplied inline by callers, or before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub name: String,
    pub description: String,
}

impl NewTask {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Attaches an identity, producing the persisted shape.
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            name: self.name,
            description: self.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NewStudent, Student};

    #[test]
    fn students_serialize_with_camel_case_names() {
        let student = Student {
            id: 3,
            first_name: "Jan".to_string(),
            last_name: "Kowalski".to_string(),
            email: "jan@example.com".to_string(),
        };
        let value = serde_json::to_value(&student).unwrap();
        assert_eq!(value["firstName"], "Jan");
        assert_eq!(value["lastName"], "Kowalski");
        assert!(value.get("first_name").is_none());

        let parsed: NewStudent = serde_json::from_str(
            r#"{"firstName":"Anna","lastName":"Nowak","email":"anna@example.com"}"#,
        )
        .unwrap();
        assert_eq!(parsed.last_name, "Nowak");
    }
}
