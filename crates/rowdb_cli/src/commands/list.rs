//! List command implementation.

use super::TableDir;
use crate::error::CliResult;

/// Runs the list command.
pub fn run(dir: &TableDir) -> CliResult<()> {
    let names = dir.table_names()?;
    if names.is_empty() {
        println!("No table files found");
        return Ok(());
    }

    println!("{:<24} {:>12} {:>8}", "TABLE", "ID_GENERATOR", "ROWS");
    for name in names {
        match dir.load(&name) {
            Ok(doc) => println!("{:<24} {:>12} {:>8}", name, doc.id_generator, doc.rows.len()),
            Err(e) => println!("{name:<24} unreadable: {e}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testutil::*;

    #[test]
    fn lists_readable_and_broken_tables() {
        let (_temp, dir) = table_dir(&[("User.json", USER_FILE), ("Order.json", "{")]);
        assert!(run(&dir).is_ok());
    }

    #[test]
    fn empty_directory() {
        let (_temp, dir) = table_dir(&[]);
        assert!(run(&dir).is_ok());
    }
}
