use std::io::{self, BufRead, Write};

/// Reads one line without its terminator; `None` at end of input.
pub fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

pub fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    text: &str,
) -> io::Result<Option<String>> {
    write!(output, "{}: ", text)?;
    output.flush()?;
    read_line(input)
}

/// Lines up to the first blank line or end of input.
pub fn read_block<R: BufRead>(input: &mut R) -> io::Result<Vec<String>> {
    let mut lines = Vec::new();
    while let Some(line) = read_line(input)? {
        if line.trim().is_empty() {
            break;
        }
        lines.push(line);
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_line_strips_terminators() {
        let mut input = Cursor::new("first\r\nsecond");
        assert_eq!(read_line(&mut input).unwrap().as_deref(), Some("first"));
        assert_eq!(read_line(&mut input).unwrap().as_deref(), Some("second"));
        assert_eq!(read_line(&mut input).unwrap(), None);
    }

    #[test]
    fn read_block_stops_at_blank_line() {
        let mut input = Cursor::new("a\nb\n\nc\n");
        assert_eq!(read_block(&mut input).unwrap(), vec!["a", "b"]);
        assert_eq!(read_line(&mut input).unwrap().as_deref(), Some("c"));
    }
}
