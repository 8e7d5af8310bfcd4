use super::{token::LexToken, Column, Error};
use crate::error;
use crate::tok::table;

type Result<T> = std::result::Result<T, Error>;

/// Scan one line of source text into lexical tokens.
///
/// The first token is a `LineNumber` when the line starts with a digit run.
/// A lexical error aborts the whole line; no partial stream comes back.
pub fn lex(s: &str) -> Result<Vec<(Column, LexToken)>> {
    BasicLexer::lex(s)
}

fn is_basic_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_basic_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_basic_alphabetic(c: char) -> bool {
    c.is_ascii_alphabetic()
}

struct BasicLexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    col: usize,
}

impl<'a> BasicLexer<'a> {
    fn lex(s: &str) -> Result<Vec<(Column, LexToken)>> {
        let mut lexer = BasicLexer {
            chars: s.trim_end().chars().peekable(),
            col: 0,
        };
        let mut tokens: Vec<(Column, LexToken)> = vec![];
        lexer.skip_whitespace();
        if let Some(c) = lexer.peek() {
            if is_basic_digit(c) {
                tokens.push(lexer.line_number()?);
            }
        }
        loop {
            lexer.skip_whitespace();
            let c = match lexer.peek() {
                Some(c) => c,
                None => break,
            };
            let token = if c == '"' {
                lexer.string()?
            } else if is_basic_digit(c) {
                lexer.number()
            } else if c == '.' {
                match lexer.peek2() {
                    Some(d) if is_basic_digit(d) => lexer.number(),
                    _ => {
                        let start = lexer.col;
                        lexer.bump();
                        lexer.remark(start)
                    }
                }
            } else if c == '$' {
                match lexer.peek2() {
                    Some(d) if d.is_ascii_hexdigit() => lexer.hex_number(),
                    _ => {
                        let col = lexer.col..lexer.col + 1;
                        return Err(error!(SyntaxError, ..&col; "INVALID CHARACTER"));
                    }
                }
            } else if is_basic_alphabetic(c) {
                lexer.word()
            } else if c == '?' {
                let start = lexer.col;
                lexer.bump();
                (start..lexer.col, LexToken::Keyword("?".to_string()))
            } else {
                lexer.minutia()?
            };
            tokens.push(token);
        }
        BasicLexer::collapse_go(&mut tokens);
        tokens.push((lexer.col..lexer.col, LexToken::EndOfLine));
        Ok(tokens)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek2(&mut self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c.is_some() {
            self.col += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !is_basic_whitespace(c) {
                break;
            }
            self.bump();
        }
    }

    fn line_number(&mut self) -> Result<(Column, LexToken)> {
        let start = self.col;
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if !is_basic_digit(c) {
                break;
            }
            s.push(c);
            self.bump();
        }
        match s.parse::<u16>() {
            Ok(n) => Ok((start..self.col, LexToken::LineNumber(n))),
            Err(_) => {
                let col = start..self.col;
                Err(error!(NumberTooLarge, ..&col; "BAD LINE NUMBER"))
            }
        }
    }

    fn number(&mut self) -> (Column, LexToken) {
        let start = self.col;
        let mut s = String::new();
        let mut decimal = false;
        let mut exp = false;
        loop {
            let mut ch = match self.bump() {
                Some(c) => c,
                None => break,
            };
            if ch == 'e' {
                ch = 'E'
            }
            s.push(ch);
            if ch == '.' {
                decimal = true;
            }
            if ch == 'E' {
                exp = true;
                if let Some(pk) = self.peek() {
                    if pk == '+' || pk == '-' {
                        continue;
                    }
                }
            }
            match self.peek() {
                Some(pk) if is_basic_digit(pk) => continue,
                Some('.') if !decimal && !exp => continue,
                Some('E') | Some('e') if !exp => continue,
                _ => break,
            }
        }
        (start..self.col, LexToken::Number(s))
    }

    fn hex_number(&mut self) -> (Column, LexToken) {
        let start = self.col;
        let mut s = String::new();
        if let Some(c) = self.bump() {
            s.push(c);
        }
        while let Some(c) = self.peek() {
            if !c.is_ascii_hexdigit() {
                break;
            }
            s.push(c.to_ascii_uppercase());
            self.bump();
        }
        (start..self.col, LexToken::Number(s))
    }

    fn string(&mut self) -> Result<(Column, LexToken)> {
        let start = self.col;
        self.bump();
        let mut s = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok((start..self.col, LexToken::StringLit(s))),
                Some(c) => s.push(c),
                None => {
                    let col = start..start + 1;
                    return Err(error!(SyntaxError, ..&col; "UNTERMINATED STRING"));
                }
            }
        }
    }

    // Words crunch the way the interpreter does it: the longest keyword
    // at the front of the run wins, so `forI=1to10` holds FOR, TO, and
    // two variables, while NOTE is never mistaken for NOT. A `$` right
    // after the run can complete a function name like STR$.
    fn word(&mut self) -> (Column, LexToken) {
        let start = self.col;
        let mut run = String::new();
        let mut suffix = None;
        let mut ahead = self.chars.clone();
        loop {
            match ahead.next() {
                Some(c) if is_basic_alphabetic(c) || (!run.is_empty() && is_basic_digit(c)) => {
                    run.push(c.to_ascii_uppercase())
                }
                other => {
                    suffix = other;
                    break;
                }
            }
        }
        let probe = match suffix {
            Some('$') => format!("{}$", run),
            _ => run.clone(),
        };
        for len in (1..=probe.len()).rev() {
            let keyword = match table::exact_keyword(&probe[..len]) {
                Some(keyword) => keyword,
                None => continue,
            };
            for _ in 0..len {
                self.bump();
            }
            // a dot straight after the full word is its own abbreviation
            if len == probe.len() {
                if let Some('.') = self.peek() {
                    self.bump();
                }
            }
            if keyword == "REM" {
                return self.remark(start);
            }
            return (start..self.col, LexToken::Keyword(keyword.to_string()));
        }
        for _ in 0..run.len() {
            self.bump();
        }
        match self.peek() {
            Some('.') => {
                self.bump();
                match table::abbreviated_keyword(&run) {
                    Some(keyword) => {
                        if keyword == "REM" {
                            return self.remark(start);
                        }
                        (start..self.col, LexToken::Keyword(keyword.to_string()))
                    }
                    None => {
                        run.push('.');
                        (start..self.col, LexToken::Identifier(run))
                    }
                }
            }
            Some('$') => {
                self.bump();
                run.push('$');
                (start..self.col, LexToken::Identifier(run))
            }
            _ => (start..self.col, LexToken::Identifier(run)),
        }
    }

    /// The rest of the line is comment text, kept verbatim.
    fn remark(&mut self, start: usize) -> (Column, LexToken) {
        if let Some(' ') = self.peek() {
            self.bump();
        }
        let s: String = self.chars.by_ref().collect();
        self.col += s.chars().count();
        (start..self.col, LexToken::Comment(s))
    }

    fn minutia(&mut self) -> Result<(Column, LexToken)> {
        let start = self.col;
        let c = match self.bump() {
            Some(c) => c,
            None => {
                let col = start..start + 1;
                return Err(error!(SyntaxError, ..&col; "INVALID CHARACTER"));
            }
        };
        let token = match c {
            '<' | '>' | '=' => {
                let two = match (c, self.peek()) {
                    ('<', Some('=')) => Some("<="),
                    ('<', Some('>')) => Some("<>"),
                    ('>', Some('=')) => Some(">="),
                    _ => None,
                };
                match two {
                    Some(op) => {
                        self.bump();
                        LexToken::OperatorSymbol(op.to_string())
                    }
                    None => LexToken::OperatorSymbol(c.to_string()),
                }
            }
            '+' | '-' | '*' | '/' | '^' => LexToken::OperatorSymbol(c.to_string()),
            ',' | ';' | ':' | '#' | '(' | ')' => LexToken::Punctuation(c),
            _ => {
                let col = start..start + 1;
                return Err(error!(SyntaxError, ..&col; "INVALID CHARACTER"));
            }
        };
        Ok((start..self.col, token))
    }

    // "GO TO" is the one two-word keyword; the words arrive separately.
    fn collapse_go(tokens: &mut Vec<(Column, LexToken)>) {
        let mut locs: Vec<usize> = vec![];
        for (index, tt) in tokens.windows(2).enumerate() {
            if let (_, LexToken::Identifier(go)) = &tt[0] {
                if go == "GO" {
                    if let (_, LexToken::Keyword(to)) = &tt[1] {
                        if to == "TO" {
                            locs.push(index);
                        }
                    }
                }
            }
        }
        while let Some(index) = locs.pop() {
            let start = tokens[index].0.start;
            let end = tokens[index + 1].0.end;
            tokens.splice(
                index..index + 2,
                Some((start..end, LexToken::Keyword("GO TO".to_string()))),
            );
        }
    }
}
