use sqlx::{postgres::PgArguments, query::QueryAs, Postgres};

use crate::DatabaseError;

pub mod point;
pub mod polygon;

pub(crate) fn convert_error(why: sqlx::Error) -> DatabaseError {
    match why {
        sqlx::Error::RowNotFound => DatabaseError::NotFound,
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            DatabaseError::UniqueViolation
        }
        _ => DatabaseError::Other(Box::new(why)),
    }
}

#[derive(Debug, PartialEq)]
pub(crate) enum UpdateParam {
    Text(String),
    Double(f64),
}

impl From<String> for UpdateParam {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for UpdateParam {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for UpdateParam {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

/// Collects the `SET` assignments of a partial update as one ordered list,
/// so the rendered clause and the bound parameter sequence cannot drift
/// apart.
pub(crate) struct UpdateBuilder {
    assignments: Vec<String>,
    params: Vec<UpdateParam>,
}

impl UpdateBuilder {
    pub(crate) fn new() -> Self {
        Self {
            assignments: Vec::new(),
            params: Vec::new(),
        }
    }

    pub(crate) fn set(&mut self, column: &str, value: impl Into<UpdateParam>) {
        self.params.push(value.into());
        self.assignments
            .push(format!("{} = ${}", column, self.params.len()));
    }

    /// An assignment whose placeholder is wrapped in an SQL function call,
    /// e.g. `location = ST_GeomFromText($2)`.
    pub(crate) fn set_wrapped(
        &mut self,
        column: &str,
        function: &str,
        value: impl Into<UpdateParam>,
    ) {
        self.params.push(value.into());
        self.assignments
            .push(format!("{} = {}(${})", column, function, self.params.len()));
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub(crate) fn clause(&self) -> String {
        self.assignments.join(", ")
    }

    /// Placeholder index for the first bind after the collected assignments.
    pub(crate) fn next_placeholder(&self) -> usize {
        self.params.len() + 1
    }

    pub(crate) fn bind_to<'q, O>(
        self,
        mut query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        for param in self.params {
            query = match param {
                UpdateParam::Text(value) => query.bind(value),
                UpdateParam::Double(value) => query.bind(value),
            };
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clause_and_parameters_share_one_order() {
        let mut builder = UpdateBuilder::new();
        builder.set("name", "rome");
        builder.set_wrapped("location", "ST_GeomFromText", "SRID=4326;POINT(12.5 41.9)");
        builder.set("population_density", 2232.7);

        assert_eq!(
            builder.clause(),
            "name = $1, location = ST_GeomFromText($2), population_density = $3"
        );
        assert_eq!(builder.next_placeholder(), 4);
        assert_eq!(
            builder.params,
            vec![
                UpdateParam::Text("rome".to_string()),
                UpdateParam::Text("SRID=4326;POINT(12.5 41.9)".to_string()),
                UpdateParam::Double(2232.7),
            ]
        );
    }

    #[test]
    fn empty_builder_is_detected() {
        let builder = UpdateBuilder::new();
        assert!(builder.is_empty());
        assert_eq!(builder.next_placeholder(), 1);
    }

    #[test]
    fn row_not_found_converts_to_not_found() {
        assert!(matches!(
            convert_error(sqlx::Error::RowNotFound),
            DatabaseError::NotFound
        ));
    }

    #[test]
    fn unrelated_errors_convert_to_other() {
        assert!(matches!(
            convert_error(sqlx::Error::ColumnNotFound("location".to_string())),
            DatabaseError::Other(_)
        ));
    }
}
