//! SQL utility functions
//!
//! `simulate_sql_query` renders a parameterized statement with its values
//! inlined, for debug logs only. The output is never executed.

use crate::data::value::Scalar;

/// Escape SQL LIKE metacharacters (%, _, \) in user input
///
/// Conditions using `LIKE` compile with `ESCAPE '\'`, so the escaped text
/// only matches itself.
///
/// # Example
///
/// ```
/// use kotodo_server::utils::sql::escape_like_pattern;
///
/// let pattern = format!("%{}%", escape_like_pattern("100% match_test"));
/// assert_eq!(pattern, "%100\\% match\\_test%");
/// ```
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Render a scalar as a SQL literal
///
/// Text is single-quoted with embedded quotes doubled, booleans become 1/0.
pub fn format_value(value: &Scalar) -> String {
    match value {
        Scalar::Null => "NULL".to_string(),
        Scalar::Bool(v) => if *v { "1" } else { "0" }.to_string(),
        Scalar::Integer(v) => v.to_string(),
        Scalar::Float(v) => v.to_string(),
        Scalar::Text(v) => format!("'{}'", v.replace('\'', "''")),
    }
}

/// Inline bound values into statement text
///
/// Understands `?` and `$n` placeholders. Placeholders without a matching
/// value are left as they are.
pub fn simulate_sql_query(text: &str, values: &[Scalar]) -> String {
    let mut out = String::with_capacity(text.len() + values.len() * 8);
    let mut next = 0usize;
    let mut chars = text.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        match c {
            '?' => {
                match values.get(next) {
                    Some(value) => out.push_str(&format_value(value)),
                    None => out.push('?'),
                }
                next += 1;
            }
            '$' if chars.peek().is_some_and(|(_, d)| d.is_ascii_digit()) => {
                let mut digits = String::new();
                while let Some((_, d)) = chars.peek().copied()
                    && d.is_ascii_digit()
                {
                    digits.push(d);
                    chars.next();
                }
                let value = digits
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| index.checked_sub(1))
                    .and_then(|index| values.get(index));
                match value {
                    Some(value) => out.push_str(&format_value(value)),
                    None => {
                        out.push('$');
                        out.push_str(&digits);
                    }
                }
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_pattern_no_special_chars() {
        assert_eq!(escape_like_pattern("hello"), "hello");
    }

    #[test]
    fn test_escape_like_pattern_metacharacters() {
        assert_eq!(escape_like_pattern("100%"), "100\\%");
        assert_eq!(escape_like_pattern("foo_bar"), "foo\\_bar");
        assert_eq!(escape_like_pattern("path\\file"), "path\\\\file");
        assert_eq!(escape_like_pattern("100%_\\test"), "100\\%\\_\\\\test");
        assert_eq!(escape_like_pattern(""), "");
    }

    #[test]
    fn test_format_value_kinds() {
        assert_eq!(format_value(&Scalar::Null), "NULL");
        assert_eq!(format_value(&Scalar::Bool(true)), "1");
        assert_eq!(format_value(&Scalar::Bool(false)), "0");
        assert_eq!(format_value(&Scalar::Integer(-4)), "-4");
        assert_eq!(format_value(&Scalar::Float(2.5)), "2.5");
        assert_eq!(format_value(&Scalar::from("it's")), "'it''s'");
    }

    #[test]
    fn test_simulate_question_marks() {
        let sql = simulate_sql_query(
            "UPDATE todos SET title = ? WHERE id = ?",
            &[Scalar::from("x"), Scalar::Integer(5)],
        );
        assert_eq!(sql, "UPDATE todos SET title = 'x' WHERE id = 5");
    }

    #[test]
    fn test_simulate_numbered() {
        let sql = simulate_sql_query(
            "a = $2 AND b = $1 AND c = $10",
            &[Scalar::Integer(1), Scalar::Bool(true)],
        );
        assert_eq!(sql, "a = 1 AND b = 1 AND c = $10");
    }

    #[test]
    fn test_simulate_missing_values_left_alone() {
        assert_eq!(simulate_sql_query("a = ? AND b = ?", &[Scalar::Null]), "a = NULL AND b = ?");
        assert_eq!(simulate_sql_query("cost > $", &[]), "cost > $");
    }
}
