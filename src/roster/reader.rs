/// One delimited record and the source line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Splits text into records. A double quote opening a field groups it (the
/// field may then contain the delimiter or newlines) and `""` inside quotes is
/// a literal quote. A quote anywhere else in a field is an ordinary character.
/// Lines with no characters at all produce no record.
pub fn read_records(text: &str, delimiter: char) -> Vec<Record> {
    let mut out: Vec<Record> = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut buf = String::new();
    let mut in_quotes = false;
    let mut started = false;
    let mut field_started = false;
    let mut line = 1usize;
    let mut start_line = 1usize;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    buf.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => {
                    buf.push('\n');
                    line += 1;
                }
                _ => buf.push(ch),
            }
            continue;
        }

        match ch {
            '"' if !field_started => {
                in_quotes = true;
                started = true;
                field_started = true;
            }
            '\r' | '\n' => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                if started || !buf.is_empty() {
                    fields.push(std::mem::take(&mut buf));
                    out.push(Record {
                        line: start_line,
                        fields: std::mem::take(&mut fields),
                    });
                }
                started = false;
                field_started = false;
                line += 1;
                start_line = line;
            }
            c if c == delimiter => {
                fields.push(std::mem::take(&mut buf));
                started = true;
                field_started = false;
            }
            _ => {
                buf.push(ch);
                started = true;
                field_started = true;
            }
        }
    }
    if started || !buf.is_empty() {
        fields.push(buf);
        out.push(Record {
            line: start_line,
            fields,
        });
    }
    out
}
