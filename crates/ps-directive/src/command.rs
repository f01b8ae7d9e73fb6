//! Lexical scan of directive commands in a comment string.
//!
//! ```text
//! command    = "!" name [ positional ] { key "=" value }
//! name       = 1*( letter | digit | "_" )
//! ```
//!
//! A command's body runs from the end of its name to the next `!`, quote
//! character, or end of text.  Inside the body each `key=` (a word directly
//! preceded by whitespace, `,` or `(`) starts a named argument whose value
//! runs to the next `key=`.  Text before the first key is the positional
//! argument.  Both layouts below scan to the same command:
//!
//! ```text
//! !waiton A/1/1 <Drill> delay=4h mode=x
//! !waiton A/1/1 <Drill>(delay=4h, mode=x)
//! ```
//!
//! Scanning never fails: a `!` with no name, or a body whose positional part
//! holds a stray `=`, produces no command and scanning resumes after it.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

static KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[\s,(])([A-Za-z_][A-Za-z0-9_]*)\s*=").expect("static key pattern compiles")
});

/// Characters that end a command body.
const TERMINATORS: [char; 3] = ['!', '"', '\''];

/// One directive occurrence.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Command {
    /// The command word as written.  Compare with [`Command::is`].
    pub name:       String,
    pub positional: Option<String>,
    /// Named arguments keyed by lower-cased key.
    pub named:      BTreeMap<String, String>,
}

impl Command {
    /// Case-insensitive name comparison.
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Named argument `key` (case-insensitive), if present.
    pub fn arg(&self, key: &str) -> Option<&str> {
        self.named.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    /// Named argument `key`, falling back to the positional argument.
    pub fn arg_or_positional(&self, key: &str) -> Option<&str> {
        self.arg(key).or(self.positional.as_deref())
    }
}

impl fmt::Display for Command {
    /// Canonical form: `!name positional(key=value, key=value)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "!{}", self.name)?;
        if let Some(p) = &self.positional {
            write!(f, " {p}")?;
        }
        if !self.named.is_empty() {
            let args: Vec<String> = self.named.iter().map(|(k, v)| format!("{k}={v}")).collect();
            write!(f, "({})", args.join(", "))?;
        }
        Ok(())
    }
}

// ── Scanner ───────────────────────────────────────────────────────────────────

/// Scan `comment` for commands, left to right.
///
/// The returned iterator is lazy and cheap to clone; cloning it (or calling
/// `tokenize` again) restarts the scan.
pub fn tokenize(comment: &str) -> Commands<'_> {
    Commands { text: comment, pos: 0 }
}

#[derive(Clone, Debug)]
pub struct Commands<'a> {
    text: &'a str,
    pos:  usize,
}

impl Iterator for Commands<'_> {
    type Item = Command;

    fn next(&mut self) -> Option<Command> {
        loop {
            let bang = self.pos + self.text[self.pos..].find('!')?;
            let name_start = bang + 1;
            let name_len = self.text[name_start..]
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(self.text.len() - name_start);
            let body_start = name_start + name_len;
            let body_end = self.text[body_start..]
                .find(TERMINATORS)
                .map_or(self.text.len(), |i| body_start + i);
            self.pos = body_end;
            if name_len == 0 {
                self.pos = name_start;
                continue;
            }
            let name = &self.text[name_start..body_start];
            if let Some(command) = parse_body(name, &self.text[body_start..body_end]) {
                return Some(command);
            }
        }
    }
}

fn parse_body(name: &str, body: &str) -> Option<Command> {
    let keys: Vec<(usize, usize, String)> = KEY
        .captures_iter(body)
        .filter_map(|c| {
            let key = c.get(1)?;
            let whole = c.get(0)?;
            Some((key.start(), whole.end(), key.as_str().to_ascii_lowercase()))
        })
        .collect();

    let positional_end = keys.first().map_or(body.len(), |&(start, _, _)| start);
    let positional = body[..positional_end].trim();
    let positional = positional.strip_suffix('(').unwrap_or(positional).trim_end();
    if positional.contains('=') {
        return None;
    }

    let mut named = BTreeMap::new();
    for (i, (_, value_start, key)) in keys.iter().enumerate() {
        let value_end = keys.get(i + 1).map_or(body.len(), |&(start, _, _)| start);
        let _ = named.insert(key.clone(), clean_value(&body[*value_start..value_end]));
    }

    Some(Command {
        name:       name.to_string(),
        positional: (!positional.is_empty()).then(|| positional.to_string()),
        named,
    })
}

/// Trim separators left over from the `(key=value, ...)` layout.
fn clean_value(raw: &str) -> String {
    let mut value = raw.trim().trim_end_matches(',').trim_end();
    let opens = value.matches('(').count();
    let closes = value.matches(')').count();
    if closes > opens {
        value = value.strip_suffix(')').unwrap_or(value).trim_end();
    }
    value.trim_end_matches(',').trim_end().to_string()
}
