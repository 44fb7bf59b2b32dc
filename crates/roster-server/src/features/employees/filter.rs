//! Dynamic filter-predicate construction for employee listing
//!
//! Translates optional, named filter criteria into a parameterized SQL
//! predicate. User input is always bound as a positional parameter, never
//! interpolated into the query text.

use serde::{Deserialize, Serialize};

/// Optional filter criteria for listing employees.
///
/// Each present, non-empty field means "case-insensitive substring match"
/// on the corresponding column. An absent or empty field contributes no
/// constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

impl EmployeeFilter {
    /// Build the ordered predicate for this filter.
    ///
    /// Clause order and parameter positions follow field declaration order:
    /// name, email, department, position.
    pub fn predicate(&self) -> FilterPredicate {
        let mut predicate = FilterPredicate::default();

        for (column, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("department", &self.department),
            ("position", &self.position),
        ] {
            if let Some(fragment) = value {
                if !fragment.is_empty() {
                    predicate.push_contains(column, fragment);
                }
            }
        }

        predicate
    }
}

/// An ordered list of `(clause, parameter)` pairs.
///
/// Placeholders are rendered from the parameter list length at append time,
/// so conditionally-present fields cannot shift each other's indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPredicate {
    clauses: Vec<String>,
    params: Vec<String>,
}

impl FilterPredicate {
    /// Append a case-insensitive substring-match clause on `column`.
    fn push_contains(&mut self, column: &str, fragment: &str) {
        self.params.push(format!("%{}%", fragment));
        self.clauses.push(format!("{} ILIKE ${}", column, self.params.len()));
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Predicate clauses, in append order.
    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }

    /// Bound parameter values, positionally matching the clauses.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Render the clauses as a SQL `WHERE` fragment, or an empty string when
    /// no constraints are present.
    pub fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_produces_no_clauses() {
        let filter = EmployeeFilter::default();
        let predicate = filter.predicate();
        assert!(predicate.is_empty());
        assert_eq!(predicate.clauses(), &[] as &[String]);
        assert_eq!(predicate.params(), &[] as &[String]);
        assert_eq!(predicate.where_sql(), "");
    }

    #[test]
    fn test_empty_string_field_contributes_no_clause() {
        let filter = EmployeeFilter {
            department: Some("Eng".to_string()),
            position: Some(String::new()),
            ..Default::default()
        };

        let predicate = filter.predicate();
        assert_eq!(predicate.clauses(), &["department ILIKE $1".to_string()]);
        assert_eq!(predicate.params(), &["%Eng%".to_string()]);
    }

    #[test]
    fn test_all_fields_in_declaration_order() {
        let filter = EmployeeFilter {
            name: Some("ada".to_string()),
            email: Some("example.com".to_string()),
            department: Some("r&d".to_string()),
            position: Some("engineer".to_string()),
        };

        let predicate = filter.predicate();
        assert_eq!(
            predicate.clauses(),
            &[
                "name ILIKE $1".to_string(),
                "email ILIKE $2".to_string(),
                "department ILIKE $3".to_string(),
                "position ILIKE $4".to_string(),
            ]
        );
        assert_eq!(
            predicate.params(),
            &[
                "%ada%".to_string(),
                "%example.com%".to_string(),
                "%r&d%".to_string(),
                "%engineer%".to_string(),
            ]
        );
    }

    #[test]
    fn test_parameter_indices_stay_contiguous_with_gaps() {
        // name absent, email present: email binds $1, not $2.
        let filter = EmployeeFilter {
            email: Some("ada".to_string()),
            position: Some("lead".to_string()),
            ..Default::default()
        };

        let predicate = filter.predicate();
        assert_eq!(
            predicate.clauses(),
            &["email ILIKE $1".to_string(), "position ILIKE $2".to_string()]
        );
    }

    #[test]
    fn test_where_sql_joins_with_and() {
        let filter = EmployeeFilter {
            name: Some("a".to_string()),
            department: Some("b".to_string()),
            ..Default::default()
        };

        assert_eq!(
            filter.predicate().where_sql(),
            " WHERE name ILIKE $1 AND department ILIKE $2"
        );
    }

    #[test]
    fn test_filter_deserializes_from_query_params() {
        let filter: EmployeeFilter =
            serde_json::from_value(serde_json::json!({"department": "Eng"})).unwrap();
        assert_eq!(filter.department.as_deref(), Some("Eng"));
        assert_eq!(filter.name, None);
    }
}
