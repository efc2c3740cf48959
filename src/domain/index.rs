//! User-facing task numbers
//!
//! Tasks are addressed by their 1-based position in the list. Text input is
//! turned into a number by [`parse_number`] and bounds-checked by
//! [`check_index`], so remove, edit and toggle report bad input the same way.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("Enter a valid number (got '{0}')")]
    NotANumber(String),

    #[error("Invalid task number {index}: expected 1-{len}")]
    OutOfRange { index: i64, len: usize },

    #[error("Invalid task number {index}: the list is empty")]
    Empty { index: i64 },
}

/// Parses a task number typed by the user
pub fn parse_number(input: &str) -> Result<i64, IndexError> {
    let input = input.trim();
    input
        .parse()
        .map_err(|_| IndexError::NotANumber(input.to_string()))
}

/// Bounds-checks a 1-based task number, returning the 0-based position
pub fn check_index(index: i64, len: usize) -> Result<usize, IndexError> {
    if len == 0 {
        return Err(IndexError::Empty { index });
    }

    match usize::try_from(index) {
        Ok(n) if (1..=len).contains(&n) => Ok(n - 1),
        _ => Err(IndexError::OutOfRange { index, len }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_index(input: &str, len: usize) -> Result<usize, IndexError> {
        check_index(parse_number(input)?, len)
    }

    #[test]
    fn parses_valid_numbers() {
        assert_eq!(parse_index("1", 3), Ok(0));
        assert_eq!(parse_index(" 3 ", 3), Ok(2));
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            parse_index("0", 3),
            Err(IndexError::OutOfRange { index: 0, len: 3 })
        );
        assert_eq!(
            parse_index("4", 3),
            Err(IndexError::OutOfRange { index: 4, len: 3 })
        );
        assert_eq!(
            parse_index("-2", 3),
            Err(IndexError::OutOfRange { index: -2, len: 3 })
        );
    }

    #[test]
    fn rejects_non_numeric() {
        assert_eq!(
            parse_index("two", 3),
            Err(IndexError::NotANumber("two".to_string()))
        );
        assert_eq!(parse_index("", 3), Err(IndexError::NotANumber(String::new())));
        assert_eq!(
            parse_index("1.5", 3),
            Err(IndexError::NotANumber("1.5".to_string()))
        );
    }

    #[test]
    fn empty_list_rejects_everything() {
        assert_eq!(parse_index("1", 0), Err(IndexError::Empty { index: 1 }));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            IndexError::OutOfRange { index: 9, len: 2 }.to_string(),
            "Invalid task number 9: expected 1-2"
        );
        assert!(IndexError::NotANumber("x".into())
            .to_string()
            .starts_with("Enter a valid number"));
    }
}
