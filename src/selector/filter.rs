//! Candidate filtering.

use super::person::{Person, SelectedPerson};

/// Case-insensitive substring match on name or email. Empty query matches all.
pub fn matches(person: &Person, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    person.name.to_lowercase().contains(&query) || person.email.to_lowercase().contains(&query)
}

/// Unselected candidates matching `query`, in candidate order
pub fn filter_candidates(candidates: &[Person], selection: &[SelectedPerson], query: &str) -> Vec<Person> {
    candidates
        .iter()
        .filter(|c| !selection.iter().any(|s| s.person.email == c.email))
        .filter(|c| matches(c, query))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::person::default_candidates;

    fn names(people: &[Person]) -> Vec<&str> {
        people.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_john_matches_name_and_email() {
        let result = filter_candidates(&default_candidates(), &[], "john");
        // "Bob Johnson" contains "john" in the name
        assert_eq!(names(&result), vec!["John Doe", "Bob Johnson"]);

        let result = filter_candidates(&default_candidates(), &[], "john@");
        assert_eq!(result, vec![Person::new("John Doe", "john@example.com")]);
    }

    #[test]
    fn test_case_insensitive() {
        let upper = filter_candidates(&default_candidates(), &[], "ALICE");
        let mixed = filter_candidates(&default_candidates(), &[], "aLiCe@EXAMPLE");
        assert_eq!(names(&upper), vec!["Alice Smith"]);
        assert_eq!(upper, mixed);
    }

    #[test]
    fn test_empty_query_excludes_selection() {
        let selection = vec![SelectedPerson::from(Person::new("Nick Giannopoulos", "nick@example.com"))];
        let result = filter_candidates(&default_candidates(), &selection, "");
        assert_eq!(names(&result), vec!["John Doe", "Jane Doe", "Alice Smith", "Bob Johnson"]);
    }

    #[test]
    fn test_selected_never_returned() {
        let candidates = default_candidates();
        let selection: Vec<SelectedPerson> = candidates[1..3].iter().cloned().map(Into::into).collect();
        for query in ["", "doe", "example", "j", "@", "zzz"] {
            let result = filter_candidates(&candidates, &selection, query);
            assert!(result.iter().all(|p| !selection.iter().any(|s| s.person.email == p.email)));
        }
    }

    #[test]
    fn test_no_match() {
        assert!(filter_candidates(&default_candidates(), &[], "zzz").is_empty());
    }
}
