//! Lexical helpers for source path text.

/// Comment introducer.  A backslash immediately before it escapes it.
const COMMENT: char = '\'';

/// Split a path line into its code part and its trailing comment.
///
/// The comment is the text after the first unescaped `'`; `None` when the
/// line has no comment.  Escaped quotes are returned unescaped in the code.
pub fn split_comment(line: &str) -> (String, Option<&str>) {
    let mut code = String::with_capacity(line.len());
    let mut chars = line.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' if chars.peek().is_some_and(|&(_, n)| n == COMMENT) => {
                code.push(COMMENT);
                chars.next();
            }
            COMMENT => return (code, Some(&line[i + COMMENT.len_utf8()..])),
            _ => code.push(c),
        }
    }
    (code, None)
}
