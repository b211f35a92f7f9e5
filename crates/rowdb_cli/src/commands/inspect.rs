//! Inspect command implementation.

use super::TableDir;
use crate::error::{CliError, CliResult};
use rowdb_codec::TableDocument;
use serde::Serialize;

/// Summary of one table file.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    /// Table base name.
    pub name: String,
    /// File name on disk.
    pub file: String,
    /// Persisted generator value.
    pub id_generator: u64,
    /// Number of rows.
    pub rows: usize,
    /// Smallest stored identifier.
    pub min_id: Option<u64>,
    /// Largest stored identifier.
    pub max_id: Option<u64>,
    /// Every key seen across rows, in first-seen order.
    pub fields: Vec<String>,
}

impl TableSummary {
    /// Summarizes a decoded document.
    pub fn of(dir: &TableDir, name: &str, doc: &TableDocument) -> Self {
        let ids: Vec<u64> = doc
            .rows
            .iter()
            .filter_map(|row| row.get(dir.id_field()).and_then(|v| v.as_u64()))
            .collect();

        let mut fields: Vec<String> = Vec::new();
        for row in &doc.rows {
            for key in row.keys() {
                if !fields.contains(key) {
                    fields.push(key.clone());
                }
            }
        }

        Self {
            name: name.to_string(),
            file: dir.file_name(name),
            id_generator: doc.id_generator,
            rows: doc.rows.len(),
            min_id: ids.iter().copied().min(),
            max_id: ids.iter().copied().max(),
            fields,
        }
    }
}

/// Runs the inspect command.
pub fn run(dir: &TableDir, name: &str, format: &str) -> CliResult<()> {
    let doc = dir.load(name)?;
    let summary = TableSummary::of(dir, name, &doc);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        "text" => {
            println!("Table:        {}", summary.name);
            println!("File:         {}", summary.file);
            println!("idGenerator:  {}", summary.id_generator);
            println!("Rows:         {}", summary.rows);
            if let (Some(min), Some(max)) = (summary.min_id, summary.max_id) {
                println!("Id range:     {min}..={max}");
            }
            println!("Fields:       {}", summary.fields.join(", "));
        }
        other => return Err(CliError::UnknownFormat(other.to_string())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testutil::*;

    #[test]
    fn summary_of_user_table() {
        let (_temp, dir) = table_dir(&[("User.json", USER_FILE)]);
        let doc = dir.load("User").unwrap();

        let summary = TableSummary::of(&dir, "User", &doc);
        assert_eq!(
            summary,
            TableSummary {
                name: "User".into(),
                file: "User.json".into(),
                id_generator: 3,
                rows: 2,
                min_id: Some(1),
                max_id: Some(2),
                fields: vec!["id".into(), "username".into(), "age".into()],
            }
        );
    }

    #[test]
    fn unknown_format_rejected() {
        let (_temp, dir) = table_dir(&[("User.json", USER_FILE)]);
        assert!(matches!(
            run(&dir, "User", "yaml"),
            Err(CliError::UnknownFormat(_))
        ));
    }
}
