//! Strips comments, splits the source into its DATA/CODE sections, and
//! normalizes whitespace in code lines before parsing.

use crate::errors::AssemblyError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedSource {
    pub data_lines: Vec<(String, usize)>,
    pub code_lines: Vec<(String, usize)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Data,
    Code,
}

/// Removes `/* ... */` block comments, greedily spanning newlines. An
/// unterminated block comment consumes the rest of the source.
fn strip_block_comments(source: &str) -> String {
    let mut result = String::new();
    let mut rest = source;
    while let Some(start) = rest.find("/*") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("*/") {
            Some(end) => rest = &after[end + 2..],
            None => return result,
        }
    }
    result.push_str(rest);
    result
}

/// Collapses internal whitespace runs to single spaces, ensures exactly one
/// space follows each comma, and trims spaces just inside parentheses.
fn normalize_code_line(line: &str) -> String {
    let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
    let no_space_before_comma = collapsed.replace(" ,", ",");

    let mut result = String::new();
    let mut chars = no_space_before_comma.chars().peekable();
    while let Some(c) = chars.next() {
        result.push(c);
        if c == ',' {
            while chars.peek() == Some(&' ') {
                chars.next();
            }
            result.push(' ');
        }
    }

    result.replace("( ", "(").replace(" )", ")")
}

pub fn process(source: &str) -> Result<ProcessedSource, AssemblyError> {
    let stripped = strip_block_comments(source);

    let mut data_lines = Vec::new();
    let mut code_lines = Vec::new();
    let mut section = Section::Preamble;
    let mut seen_data = false;
    let mut seen_code = false;
    let mut last_line = 0;

    for (idx, raw_line) in stripped.lines().enumerate() {
        let line_no = idx + 1;
        last_line = line_no;

        let without_comment = match raw_line.find("//") {
            Some(pos) => &raw_line[..pos],
            None => raw_line,
        };
        let trimmed = without_comment.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed == "DATA:" {
            if seen_code {
                return Err(AssemblyError::SyntaxError {
                    line: line_no,
                    reason: "a DATA: section cannot follow a CODE: section".to_string(),
                });
            }
            if seen_data {
                return Err(AssemblyError::SyntaxError {
                    line: line_no,
                    reason: "duplicate DATA: section marker".to_string(),
                });
            }
            seen_data = true;
            section = Section::Data;
            continue;
        }

        if trimmed == "CODE:" {
            if seen_code {
                return Err(AssemblyError::SyntaxError {
                    line: line_no,
                    reason: "duplicate CODE: section marker".to_string(),
                });
            }
            seen_code = true;
            section = Section::Code;
            continue;
        }

        match section {
            Section::Preamble => {
                return Err(AssemblyError::SyntaxError {
                    line: line_no,
                    reason: format!("line '{trimmed}' appears outside of any section"),
                });
            }
            Section::Data => data_lines.push((trimmed.to_string(), line_no)),
            Section::Code => code_lines.push((normalize_code_line(trimmed), line_no)),
        }
    }

    if !seen_code {
        return Err(AssemblyError::SyntaxError {
            line: last_line,
            reason: "source has no CODE: section".to_string(),
        });
    }

    Ok(ProcessedSource { data_lines, code_lines })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_line_and_block_comments() {
        let source = "DATA:\n// nothing here\nCODE:\n/* skip\nthis */NOP // trailing\n";
        let result = process(source).unwrap();
        assert_eq!(result.code_lines, vec![("NOP".to_string(), 5)]);
    }

    #[test]
    fn normalizes_operand_spacing() {
        let source = "CODE:\nMOV   A ,   ( B )\n";
        let result = process(source).unwrap();
        assert_eq!(result.code_lines[0].0, "MOV A, (B)");
    }

    #[test]
    fn data_after_code_is_an_error() {
        let source = "CODE:\nNOP\nDATA:\nx 1\n";
        let err = process(source).unwrap_err();
        assert!(matches!(err, AssemblyError::SyntaxError { line: 3, .. }));
    }

    #[test]
    fn missing_code_section_is_an_error() {
        let source = "DATA:\nx 1\n";
        assert!(process(source).is_err());
    }

    #[test]
    fn line_outside_section_is_an_error() {
        let source = "NOP\nCODE:\nNOP\n";
        let err = process(source).unwrap_err();
        assert!(matches!(err, AssemblyError::SyntaxError { line: 1, .. }));
    }
}
