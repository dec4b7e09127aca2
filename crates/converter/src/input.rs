use std::fs;
use std::path::Path;

use super::error::Error;
use converter_core::graph::FIRST_PAIR_LINE;

/// Reads `path` into lines, with `\n` / `\r\n` terminators stripped.
///
/// Blank lines are kept and counted as pair records.
pub fn read_lines(path: &Path) -> Result<Vec<String>, Error> {
    let content = fs::read_to_string(path)?;
    Ok(content.lines().map(String::from).collect())
}

/// Checks the declared pair count on line 1 against the lines that follow it.
///
/// # Errors
/// - `TooFewLines` if the request or the count line is missing.
/// - `InvalidPairCount` if line 1 is not a non-negative integer.
/// - `PairCountMismatch` if the count disagrees with the number of pair lines.
pub fn validate_pair_count<S: AsRef<str>>(lines: &[S]) -> Result<usize, Error> {
    if lines.len() < FIRST_PAIR_LINE {
        return Err(Error::TooFewLines(lines.len()));
    }

    let count_line = lines[1].as_ref();
    let declared: usize = count_line
        .trim()
        .parse()
        .map_err(|_| Error::InvalidPairCount(count_line.to_string()))?;

    let actual = lines.len() - FIRST_PAIR_LINE;
    if declared != actual {
        return Err(Error::PairCountMismatch { declared, actual });
    }

    Ok(declared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn read_lines_strips_terminators() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        temp_file
            .write_all(b"EUR;550;JPY\r\n1\nEUR;JPY;130.1\n")
            .expect("Failed to write mock content");

        let lines = read_lines(temp_file.path()).expect("file should be readable");
        assert_eq!(lines, ["EUR;550;JPY", "1", "EUR;JPY;130.1"]);
    }

    #[test]
    fn read_lines_file_not_found() {
        let result = read_lines(Path::new("non_existent_file.txt"));

        if let Err(Error::IoError(e)) = result {
            assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
        } else {
            panic!("Expected IoError, got: {:?}", result);
        }
    }

    #[test]
    fn pair_count_matches() {
        assert_eq!(
            validate_pair_count(&["EUR;1;USD", "1", "EUR;USD;1.1"]).unwrap(),
            1
        );
        assert_eq!(validate_pair_count(&["EUR;1;EUR", "0"]).unwrap(), 0);
        assert_eq!(
            validate_pair_count(&["EUR;1;USD", " 1 ", "EUR;USD;1.1"]).unwrap(),
            1
        );
    }

    #[test]
    fn pair_count_mismatch() {
        let result = validate_pair_count(&["EUR;1;USD", "3", "EUR;USD;1.1"]);
        assert!(matches!(
            result,
            Err(Error::PairCountMismatch {
                declared: 3,
                actual: 1
            })
        ));
    }

    #[test]
    fn pair_count_not_a_number() {
        for bad in ["six", "-1", "1.5", ""] {
            let result = validate_pair_count(&["EUR;1;USD", bad]);
            assert!(
                matches!(&result, Err(Error::InvalidPairCount(s)) if s == bad),
                "unexpected result for {:?}: {:?}",
                bad,
                result
            );
        }
    }

    #[test]
    fn too_few_lines() {
        assert!(matches!(
            validate_pair_count(&["EUR;1;USD"]),
            Err(Error::TooFewLines(1))
        ));
        let empty: [&str; 0] = [];
        assert!(matches!(
            validate_pair_count(&empty),
            Err(Error::TooFewLines(0))
        ));
    }
}
