//! Golden text assertions for table files.
//!
//! Table files are compared byte for byte; on mismatch the first differing
//! line is reported along with both full texts.

/// Asserts that `actual` equals `expected`, reporting the first differing line.
///
/// # Panics
///
/// Panics if the texts differ.
pub fn assert_text_eq(actual: &str, expected: &str) {
    if actual == expected {
        return;
    }

    let line = first_difference(actual, expected);
    panic!(
        "text mismatch at line {line}\n--- expected ---\n{expected}\n--- actual ---\n{actual}\n"
    );
}

/// Returns the 1-based number of the first line where the texts differ.
///
/// Returns `None` if they are equal.
pub fn first_difference_line(actual: &str, expected: &str) -> Option<usize> {
    (actual != expected).then(|| first_difference(actual, expected))
}

fn first_difference(actual: &str, expected: &str) -> usize {
    let mut a = actual.split('\n');
    let mut e = expected.split('\n');
    let mut line = 1;
    loop {
        match (a.next(), e.next()) {
            (Some(x), Some(y)) if x == y => line += 1,
            _ => return line,
        }
    }
}

/// Renders the expected `User.json` text for the given generator and rows.
pub fn render_user_table(id_generator: u64, rows: &[(u64, &str, i64)]) -> String {
    if rows.is_empty() {
        return format!("{{\n  \"idGenerator\": {id_generator},\n  \"rows\": []\n}}");
    }

    let body: Vec<String> = rows
        .iter()
        .map(|(id, username, age)| {
            format!(
                "    {{\n      \"id\": {id},\n      \"username\": \"{username}\",\n      \"age\": {age}\n    }}"
            )
        })
        .collect();

    format!(
        "{{\n  \"idGenerator\": {id_generator},\n  \"rows\": [\n{}\n  ]\n}}",
        body.join(",\n")
    )
}
