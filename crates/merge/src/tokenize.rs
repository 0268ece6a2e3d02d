//! Quote-aware CSV tokenizer.
//!
//! Single forward scan, no backtracking. Unquoted field values are trimmed;
//! quoted content is preserved verbatim. Physical lines containing only
//! whitespace are dropped, except inside an open quote span where newlines
//! belong to the field value.

/// Split raw CSV text into rows of field values.
///
/// Fields are comma-separated. A field whose first non-whitespace character
/// is `"` is quoted: `""` inside the span is an escaped literal quote, and
/// a `\n` or `\r\n` inside the span is part of the value, so one logical
/// record can span several physical lines. An unterminated span runs to the
/// end of the input rather than erroring.
pub fn tokenize(text: &str) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut buf = String::new();
    let mut in_quotes = false;
    let mut quoted = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    buf.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                buf.push(c);
            }
            continue;
        }
        match c {
            '"' if !quoted && buf.trim().is_empty() => {
                // Opening quote; whitespace before it is not field content.
                buf.clear();
                in_quotes = true;
                quoted = true;
            }
            ',' => {
                fields.push(take_field(&mut buf, &mut quoted));
            }
            '\r' if chars.peek() == Some(&'\n') => {
                // CR of a CRLF pair; the LF ends the row.
            }
            '\n' => {
                if fields.is_empty() && !quoted && buf.trim().is_empty() {
                    // Whitespace-only physical line.
                    buf.clear();
                } else {
                    fields.push(take_field(&mut buf, &mut quoted));
                    rows.push(std::mem::take(&mut fields));
                }
            }
            _ => buf.push(c),
        }
    }

    if !(fields.is_empty() && !quoted && buf.trim().is_empty()) {
        fields.push(take_field(&mut buf, &mut quoted));
        rows.push(fields);
    }

    rows
}

fn take_field(buf: &mut String, quoted: &mut bool) -> String {
    let value = if *quoted {
        std::mem::take(buf)
    } else {
        let trimmed = buf.trim().to_string();
        buf.clear();
        trimmed
    };
    *quoted = false;
    value
}
