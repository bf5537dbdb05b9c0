//! CLI output helpers.

use std::io::{self, Write};

/// Returns terminal width from COLUMNS, or 80 if unset/invalid.
pub fn terminal_width() -> usize {
    width_from(std::env::var("COLUMNS").ok().as_deref())
}

fn width_from(columns: Option<&str>) -> usize {
    columns
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 20)
        .unwrap_or(80)
}

/// Writes rendered lines followed by newlines.
pub fn write_lines(out: &mut impl Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_from_columns() {
        assert_eq!(width_from(Some("120")), 120);
        assert_eq!(width_from(Some("5")), 80, "too narrow falls back");
        assert_eq!(width_from(Some("wide")), 80);
        assert_eq!(width_from(None), 80);
    }

    #[test]
    fn test_write_lines() {
        let mut buf = Vec::new();
        write_lines(&mut buf, &["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a\nb\n");
    }
}
