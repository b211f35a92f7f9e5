//! Dump command implementation.

use super::TableDir;
use crate::error::CliResult;
use rowdb_codec::Value;

/// Runs the dump command.
pub fn run(dir: &TableDir, name: &str, limit: Option<usize>) -> CliResult<()> {
    let doc = dir.load(name)?;
    let limit = limit.unwrap_or(usize::MAX);

    for row in doc.rows.into_iter().take(limit) {
        println!("{}", serde_json::to_string_pretty(&Value::Object(row))?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testutil::*;
    use crate::error::CliError;

    #[test]
    fn dump_with_limit() {
        let (_temp, dir) = table_dir(&[("User.json", USER_FILE)]);
        assert!(run(&dir, "User", Some(1)).is_ok());
        assert!(run(&dir, "User", None).is_ok());
    }

    #[test]
    fn dump_missing_table() {
        let (_temp, dir) = table_dir(&[]);
        assert!(matches!(run(&dir, "User", None), Err(CliError::TableNotFound(_))));
    }
}
