//! Comma-delimited row codec used by the listing cache.
//!
//! Fields containing a comma, a double quote or a line break are wrapped in
//! double quotes with embedded quotes doubled. The reader accepts both `\n`
//! and `\r\n` row terminators and skips blank lines.

use std::io::{self, Write};

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Write one row followed by `\n`.
pub(crate) fn write_row<W: Write>(out: &mut W, fields: &[&str]) -> io::Result<()> {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.write_all(b",")?;
        }
        write_field(out, field)?;
    }
    out.write_all(b"\n")
}

fn write_field<W: Write>(out: &mut W, field: &str) -> io::Result<()> {
    if !field.contains([',', '"', '\n', '\r']) {
        return out.write_all(field.as_bytes());
    }
    out.write_all(b"\"")?;
    out.write_all(field.replace('"', "\"\"").as_bytes())?;
    out.write_all(b"\"")
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// A decoded row and the line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Row {
    /// 1-based line number of the first character of the row.
    pub line: usize,
    pub fields: Vec<String>,
}

/// A syntax error in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RowError {
    pub line: usize,
    pub message: String,
}

/// Iterator over the rows of a comma-delimited document.
///
/// Stops after the first error.
#[derive(Debug)]
pub(crate) struct Rows<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Rows<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
        }
    }

    fn next_row(&mut self) -> Result<Row, RowError> {
        let line = self.line;
        let mut fields = Vec::new();
        loop {
            let (field, more) = self.next_field(line)?;
            fields.push(field);
            if !more {
                return Ok(Row { line, fields });
            }
        }
    }

    /// Decode one field. The flag is true when another field follows on the
    /// same row.
    fn next_field(&mut self, row_line: usize) -> Result<(String, bool), RowError> {
        let rest = &self.input[self.pos..];

        let Some(quoted) = rest.strip_prefix('"') else {
            let end = rest.find([',', '\n']).unwrap_or(rest.len());
            let raw = &rest[..end];
            // `\r` is part of the terminator only at the end of a row.
            let value = if rest[end..].starts_with(',') {
                raw
            } else {
                raw.strip_suffix('\r').unwrap_or(raw)
            };
            let value = value.to_owned();
            self.pos += end;
            let more = self.end_of_field(row_line)?;
            return Ok((value, more));
        };

        let mut value = String::new();
        let mut chars = quoted.char_indices();
        let close = loop {
            match chars.next() {
                None => {
                    return Err(RowError {
                        line: row_line,
                        message: "unterminated quoted field".to_owned(),
                    });
                }
                Some((i, '"')) => {
                    if quoted[i + 1..].starts_with('"') {
                        value.push('"');
                        chars.next();
                    } else {
                        break i;
                    }
                }
                Some((_, c)) => {
                    if c == '\n' {
                        self.line += 1;
                    }
                    value.push(c);
                }
            }
        };

        // opening quote + body + closing quote
        self.pos += close + 2;
        let more = self.end_of_field(row_line)?;
        Ok((value, more))
    }

    fn end_of_field(&mut self, row_line: usize) -> Result<bool, RowError> {
        let rest = &self.input[self.pos..];
        if rest.starts_with(',') {
            self.pos += 1;
            Ok(true)
        } else if rest.starts_with("\r\n") {
            self.pos += 2;
            self.line += 1;
            Ok(false)
        } else if rest.starts_with('\n') {
            self.pos += 1;
            self.line += 1;
            Ok(false)
        } else if rest.is_empty() {
            Ok(false)
        } else {
            Err(RowError {
                line: row_line,
                message: "unexpected character after closing quote".to_owned(),
            })
        }
    }
}

impl Iterator for Rows<'_> {
    type Item = Result<Row, RowError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let rest = &self.input[self.pos..];
            if rest.is_empty() {
                return None;
            }
            if rest.starts_with('\n') {
                self.pos += 1;
            } else if rest.starts_with("\r\n") {
                self.pos += 2;
            } else {
                break;
            }
            self.line += 1;
        }

        let result = self.next_row();
        if result.is_err() {
            self.pos = self.input.len();
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(fields: &[&str]) -> String {
        let mut buf = Vec::new();
        write_row(&mut buf, fields).expect("write to vec");
        String::from_utf8(buf).expect("utf8")
    }

    fn decode(input: &str) -> Vec<Vec<String>> {
        Rows::new(input)
            .map(|r| r.expect("valid row").fields)
            .collect()
    }

    #[test]
    fn test_should_write_plain_fields_unquoted() {
        assert_eq!(encode(&["b", "dir/a.txt", "10", "STANDARD"]), "b,dir/a.txt,10,STANDARD\n");
    }

    #[test]
    fn test_should_quote_fields_with_separators() {
        assert_eq!(encode(&["b", "a,b", "say \"hi\""]), "b,\"a,b\",\"say \"\"hi\"\"\"\n");
    }

    #[test]
    fn test_should_read_crlf_rows() {
        let rows = decode("b,k1,1,STANDARD\r\nb,k2,2,GLACIER\r\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["b", "k2", "2", "GLACIER"]);
    }

    #[test]
    fn test_should_keep_carriage_return_inside_row() {
        assert_eq!(decode("a\r,b\r\n"), vec![vec!["a\r", "b"]]);
        assert_eq!(decode("a,b\r"), vec![vec!["a", "b"]]);
    }

    #[test]
    fn test_should_read_quoted_field_spanning_lines() {
        let input = "b,\"multi\nline\",3,STANDARD\nb,next,4,STANDARD\n";
        let rows: Vec<Row> = Rows::new(input).map(|r| r.expect("row")).collect();
        assert_eq!(rows[0].fields[1], "multi\nline");
        assert_eq!(rows[0].line, 1);
        assert_eq!(rows[1].line, 3);
    }

    #[test]
    fn test_should_skip_blank_lines_and_missing_final_newline() {
        let rows = decode("\nb,k,1,STANDARD\n\nb,j,2,STANDARD");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][1], "j");
    }

    #[test]
    fn test_should_keep_empty_fields() {
        assert_eq!(decode("a,,c\n"), vec![vec!["a", "", "c"]]);
        assert_eq!(decode("\"\",x\n"), vec![vec!["", "x"]]);
    }

    #[test]
    fn test_should_reject_unterminated_quote() {
        let mut rows = Rows::new("ok,1\n\"broken,2\n");
        assert!(rows.next().expect("first").is_ok());
        let err = rows.next().expect("second").expect_err("unterminated");
        assert_eq!(err.line, 2);
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_should_reject_garbage_after_closing_quote() {
        let err = Rows::new("\"a\"b,c\n")
            .next()
            .expect("row")
            .expect_err("garbage");
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_should_decode_what_it_encodes() {
        let fields = ["bucket", "k,e\"y\r\nx", "", "GLACIER"];
        let encoded = encode(&fields);
        assert_eq!(decode(&encoded), vec![fields.to_vec()]);
    }
}
