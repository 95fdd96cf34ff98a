use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// A person that can be picked. `email` is the identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub email: String,
}

impl Person {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// A chip in the selection row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedPerson {
    pub person: Person,
    pub armed: bool, // Marked by a first Backspace, removed by the second
}

impl From<Person> for SelectedPerson {
    fn from(person: Person) -> Self {
        Self { person, armed: false }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CandidateError {
    #[error("candidate list is empty")]
    Empty,
    #[error("duplicate candidate email: {0}")]
    DuplicateEmail(String),
    #[error("candidate #{0} has a blank name or email")]
    BlankField(usize),
}

/// The people offered in the dropdown, fixed for the selector's lifetime
pub fn default_candidates() -> Vec<Person> {
    vec![
        Person::new("Nick Giannopoulos", "nick@example.com"),
        Person::new("John Doe", "john@example.com"),
        Person::new("Jane Doe", "jane@example.com"),
        Person::new("Alice Smith", "alice@example.com"),
        Person::new("Bob Johnson", "bob@example.com"),
    ]
}

/// Check a candidate list before handing it to a selector.
/// Emails are compared case-insensitively.
pub fn validate_candidates(candidates: &[Person]) -> Result<(), CandidateError> {
    if candidates.is_empty() {
        return Err(CandidateError::Empty);
    }

    let mut seen = HashSet::new();
    for (i, person) in candidates.iter().enumerate() {
        if person.name.trim().is_empty() || person.email.trim().is_empty() {
            return Err(CandidateError::BlankField(i + 1));
        }
        if !seen.insert(person.email.to_lowercase()) {
            return Err(CandidateError::DuplicateEmail(person.email.clone()));
        }
    }
    Ok(())
}
