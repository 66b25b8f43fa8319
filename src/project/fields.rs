/// Characters that separate fields outside a quoted span.
pub fn is_field_break(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Quotes REAPER wraps a name in when the name itself contains `"`.
const ALT_QUOTES: [char; 2] = ['\'', '`'];

/// Split a `MARKER` line into whitespace-separated fields.
///
/// Whitespace between an odd `"` and the next one does not split, so
/// `"Song With Spaces"` stays a single field. A field opening with `'` or
/// `` ` `` runs to the matching closing quote, as REAPER writes names that
/// contain `"`. Quote characters are kept in the returned slices.
pub fn split_fields(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut in_quotes = false;
    let mut start: Option<usize> = None;
    let mut pos = 0;

    while let Some(c) = line[pos..].chars().next() {
        if start.is_none() && ALT_QUOTES.contains(&c) {
            if let Some(end) = closing_quote(line, pos, c) {
                fields.push(&line[pos..end]);
                pos = end;
                continue;
            }
        }

        match c {
            '"' => {
                in_quotes = !in_quotes;
                if start.is_none() {
                    start = Some(pos);
                }
            }
            c if !in_quotes && is_field_break(c) => {
                if let Some(s) = start.take() {
                    fields.push(&line[s..pos]);
                }
            }
            _ => {
                if start.is_none() {
                    start = Some(pos);
                }
            }
        }
        pos += c.len_utf8();
    }

    if let Some(s) = start {
        fields.push(&line[s..]);
    }

    fields
}

/// End (exclusive) of a span opened by `quote` at `open`: the next `quote`
/// followed by a field break or the end of the line.
fn closing_quote(line: &str, open: usize, quote: char) -> Option<usize> {
    let body = open + quote.len_utf8();
    line[body..].char_indices().find_map(|(j, c)| {
        let end = body + j + c.len_utf8();
        let at_break = line[end..].chars().next().is_none_or(is_field_break);
        (c == quote && at_break).then_some(end)
    })
}

/// Remove every `"` from a field.
pub fn strip_quotes(field: &str) -> String {
    field.replace('"', "")
}

/// Text of a name field: the inside of a `'...'` or `` `...` `` span,
/// otherwise the field with `"` removed.
pub fn unquote_name(field: &str) -> String {
    for q in ALT_QUOTES {
        if field.len() >= 2 && field.starts_with(q) && field.ends_with(q) {
            return field[q.len_utf8()..field.len() - q.len_utf8()].to_string();
        }
    }
    strip_quotes(field)
}

/// Remove GUID braces from a field.
pub fn strip_braces(field: &str) -> String {
    field.replace(['{', '}'], "")
}
