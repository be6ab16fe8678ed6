// ABOUTME: Minimal netrc parser for locally stored API credentials.
// ABOUTME: Supports machine/default entries, macdef blocks and # comments.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetrcError {
    #[error("line {line}: '{keyword}' is missing its value")]
    MissingValue { line: usize, keyword: String },

    #[error("line {line}: '{token}' appears outside a machine entry")]
    OutsideEntry { line: usize, token: String },

    #[error("line {line}: unknown token '{token}'")]
    UnknownToken { line: usize, token: String },
}

/// Credentials for one host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Machine {
    pub login: Option<String>,
    pub password: Option<String>,
    pub account: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Netrc {
    machines: Vec<(String, Machine)>,
    default: Option<Machine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    None,
    Host(usize),
    Default,
}

impl Netrc {
    pub fn parse(content: &str) -> Result<Self, NetrcError> {
        let mut netrc = Netrc::default();
        let mut target = Target::None;
        let mut tokens = tokenize(content);

        while let Some((line, token)) = tokens.next() {
            match token {
                "machine" => {
                    let host = value(&mut tokens, line, token)?;
                    netrc.machines.push((host.to_string(), Machine::default()));
                    target = Target::Host(netrc.machines.len() - 1);
                }
                "default" => {
                    netrc.default = Some(Machine::default());
                    target = Target::Default;
                }
                "login" | "password" | "account" => {
                    let v = value(&mut tokens, line, token)?.to_string();
                    let machine = match target {
                        Target::Host(i) => &mut netrc.machines[i].1,
                        Target::Default => netrc.default.get_or_insert_with(Machine::default),
                        Target::None => {
                            return Err(NetrcError::OutsideEntry {
                                line,
                                token: token.to_string(),
                            });
                        }
                    };
                    match token {
                        "login" => machine.login = Some(v),
                        "password" => machine.password = Some(v),
                        _ => machine.account = Some(v),
                    }
                }
                "macdef" => {
                    value(&mut tokens, line, token)?;
                    tokens.skip_macro(line);
                }
                other => {
                    return Err(NetrcError::UnknownToken {
                        line,
                        token: other.to_string(),
                    });
                }
            }
        }

        Ok(netrc)
    }

    /// Entry for `host`, falling back to the `default` entry.
    pub fn machine(&self, host: &str) -> Option<&Machine> {
        self.machines
            .iter()
            .find(|(name, _)| name == host)
            .map(|(_, m)| m)
            .or(self.default.as_ref())
    }
}

/// The token after `keyword`. A leading `#` is part of the value here.
fn value<'a>(tokens: &mut Tokens<'a>, line: usize, keyword: &str) -> Result<&'a str, NetrcError> {
    tokens
        .advance(false)
        .map(|(_, v)| v)
        .ok_or_else(|| NetrcError::MissingValue {
            line,
            keyword: keyword.to_string(),
        })
}

fn tokenize(content: &str) -> Tokens<'_> {
    Tokens {
        lines: content.lines().enumerate(),
        current: None,
    }
}

/// Whitespace tokenizer that tracks 1-based line numbers.
struct Tokens<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    current: Option<(usize, std::str::SplitWhitespace<'a>)>,
}

impl<'a> Tokens<'a> {
    /// Skip the rest of a macdef: the current line, then everything up to a blank line.
    fn skip_macro(&mut self, line: usize) {
        if matches!(self.current, Some((current, _)) if current == line) {
            self.current = None;
        }
        for (_, text) in self.lines.by_ref() {
            if text.trim().is_empty() {
                break;
            }
        }
    }

    /// Next token. With `comments`, a `#` word ends the line.
    fn advance(&mut self, comments: bool) -> Option<(usize, &'a str)> {
        loop {
            if let Some((line, words)) = self.current.as_mut() {
                if let Some(word) = words.next() {
                    if comments && word.starts_with('#') {
                        self.current = None;
                        continue;
                    }
                    return Some((*line, word));
                }
            }

            let (index, text) = self.lines.next()?;
            self.current = Some((index + 1, text.split_whitespace()));
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.advance(true)
    }
}
