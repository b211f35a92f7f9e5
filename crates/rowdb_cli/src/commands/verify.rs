//! Verify command implementation.

use super::TableDir;
use crate::error::{CliError, CliResult};
use rowdb_codec::TableDocument;
use rowdb_core::{EntityMetadata, TableState};

/// Verification result for one table.
#[derive(Debug)]
pub struct VerifyResult {
    /// Table base name.
    pub name: String,
    /// Number of rows checked.
    pub rows_checked: usize,
    /// Violations found.
    pub errors: Vec<String>,
}

impl VerifyResult {
    fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks a decoded document against the table invariants:
/// every row carries a unique non-negative integer identifier as its first
/// key, and the generator is larger than every identifier.
pub fn check_document(name: &str, id_field: &str, doc: &TableDocument) -> VerifyResult {
    let mut errors = Vec::new();

    for (index, row) in doc.rows.iter().enumerate() {
        if row.keys().next().map(String::as_str) != Some(id_field) {
            errors.push(format!("row {index}: {id_field:?} is not the first key"));
        }
    }

    let meta = EntityMetadata::new(name).id_field(id_field);
    match TableState::from_document(name, &meta, doc.clone()) {
        Ok(state) => {
            if let Some(max_id) = state.rows.max_id() {
                if doc.id_generator <= max_id {
                    errors.push(format!(
                        "idGenerator {} is not greater than max id {max_id}",
                        doc.id_generator
                    ));
                }
            }
        }
        Err(e) => errors.push(e.to_string()),
    }

    VerifyResult {
        name: name.to_string(),
        rows_checked: doc.rows.len(),
        errors,
    }
}

/// Runs the verify command.
pub fn run(dir: &TableDir, only: Option<&str>) -> CliResult<()> {
    let names = match only {
        Some(name) => vec![name.to_string()],
        None => dir.table_names()?,
    };

    let mut failed = 0;
    for name in &names {
        let result = match dir.load(name) {
            Ok(doc) => check_document(name, dir.id_field(), &doc),
            Err(e @ CliError::TableNotFound(_)) => return Err(e),
            Err(e) => VerifyResult {
                name: name.clone(),
                rows_checked: 0,
                errors: vec![e.to_string()],
            },
        };
        print_result(&result);
        if !result.is_ok() {
            failed += 1;
        }
    }

    println!();
    if failed == 0 {
        println!("✓ Verification passed ({} table(s))", names.len());
        Ok(())
    } else {
        println!("✗ Verification failed");
        Err(CliError::VerificationFailed(failed))
    }
}

fn print_result(result: &VerifyResult) {
    let status = if result.is_ok() { "OK" } else { "FAILED" };
    println!("{}: {} ({} rows)", result.name, status, result.rows_checked);
    for error in &result.errors {
        println!("  - {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testutil::*;
    use rowdb_codec::decode_document;

    fn check(raw: &str) -> VerifyResult {
        check_document("User", "id", &decode_document(raw.as_bytes()).unwrap())
    }

    #[test]
    fn valid_table_passes() {
        let result = check(USER_FILE);
        assert!(result.is_ok(), "{:?}", result.errors);
        assert_eq!(result.rows_checked, 2);
    }

    #[test]
    fn stale_generator_reported() {
        let result = check(r#"{"idGenerator": 2, "rows": [{"id": 1}, {"id": 2}]}"#);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("idGenerator 2"));
    }

    #[test]
    fn duplicate_and_misplaced_ids_reported() {
        let result = check(r#"{"idGenerator": 5, "rows": [{"id": 1}, {"name": "x", "id": 1}]}"#);
        assert_eq!(result.errors.len(), 2, "{:?}", result.errors);
    }

    #[test]
    fn missing_id_reported() {
        let result = check(r#"{"idGenerator": 5, "rows": [{"name": "x"}]}"#);
        assert!(!result.is_ok());
    }

    #[test]
    fn run_fails_on_bad_table() {
        let (_temp, dir) = table_dir(&[
            ("User.json", USER_FILE),
            ("Order.json", r#"{"idGenerator": 1, "rows": [{"id": 4}]}"#),
        ]);
        assert!(matches!(run(&dir, None), Err(CliError::VerificationFailed(1))));
        assert!(run(&dir, Some("User")).is_ok());
        assert!(matches!(run(&dir, Some("Nope")), Err(CliError::TableNotFound(_))));
    }
}
