use super::bcd::BcdFloat;
use super::table::{
    self, Function, Operator, Statement, EOL, NUMBER_PREFIX, SMALL_INT_PREFIX, STATEMENT_SEP,
    STRING_PREFIX,
};
use super::var::{VarName, VarTable, MAX_VARIABLES};
use super::{HEADER_LEN, MAX_LINE_LEN};
use crate::error;
use crate::lang::{lex, Column, Error, LexToken, LineNumber, MaxValue};

type Result<T> = std::result::Result<T, Error>;

/// One tokenized program line, ready to merge into program memory.
/// Variables first seen on this line ride along in `new_variables`;
/// the caller's table is never touched.

#[derive(Debug, PartialEq)]
pub struct TokenizedLine {
    pub line_number: u16,
    pub bytes: Vec<u8>,
    pub new_variables: Vec<VarName>,
}

pub fn tokenize(source: &str, vars: &VarTable) -> Result<TokenizedLine> {
    let tokens = lex(source)?;
    let line_number = match tokens.first() {
        Some((_, LexToken::LineNumber(n))) if *n >= 1 && *n <= LineNumber::max_value() => *n,
        Some((col, LexToken::LineNumber(_))) => {
            return Err(error!(ValueError, ..col; "BAD LINE NUMBER"))
        }
        Some((col, _)) => {
            return Err(error!(SyntaxError, ..col; "MUST START WITH A LINE NUMBER"))
        }
        None => return Err(error!(SyntaxError; "MUST START WITH A LINE NUMBER")),
    };
    match Tokenizer::encode(&tokens[1..], vars) {
        Ok((content, new_variables)) => {
            let total = content.len() + HEADER_LEN;
            if total > MAX_LINE_LEN {
                return Err(error!(LineTooLong, Some(line_number)));
            }
            let mut bytes = Vec::with_capacity(total);
            bytes.extend_from_slice(&line_number.to_le_bytes());
            bytes.push(total as u8);
            bytes.extend_from_slice(&content);
            Ok(TokenizedLine {
                line_number,
                bytes,
                new_variables,
            })
        }
        Err(error) => Err(error.in_line_number(Some(line_number))),
    }
}

struct Tokenizer<'a> {
    tokens: &'a [(Column, LexToken)],
    index: usize,
    vars: &'a VarTable,
    new_vars: Vec<VarName>,
    content: Vec<u8>,
    at_statement_start: bool,
    in_assignment: bool,
    then_statement: bool,
    sep_fixups: Vec<usize>,
}

impl<'a> Tokenizer<'a> {
    fn encode(
        tokens: &'a [(Column, LexToken)],
        vars: &'a VarTable,
    ) -> Result<(Vec<u8>, Vec<VarName>)> {
        let mut t = Tokenizer {
            tokens,
            index: 0,
            vars,
            new_vars: vec![],
            content: vec![],
            at_statement_start: true,
            in_assignment: false,
            then_statement: false,
            sep_fixups: vec![],
        };
        loop {
            let (col, token) = match t.tokens.get(t.index) {
                Some(pair) => pair,
                None => break,
            };
            t.index += 1;
            match token {
                LexToken::EndOfLine => break,
                LexToken::Keyword(word) => t.keyword(word, col)?,
                LexToken::Identifier(name) => t.identifier(name, col)?,
                LexToken::Number(text) => t.number(text, col)?,
                LexToken::StringLit(s) => t.string(s, col)?,
                LexToken::OperatorSymbol(op) => t.operator(op, col)?,
                LexToken::Punctuation(c) => t.punctuation(*c, col)?,
                LexToken::Comment(text) => t.comment(text, col)?,
                LexToken::LineNumber(_) => {
                    return Err(error!(SyntaxError, ..col));
                }
            }
        }
        t.content.push(EOL);
        t.patch_offsets();
        Ok((t.content, t.new_vars))
    }

    fn peek(&self) -> Option<&'a LexToken> {
        self.tokens.get(self.index).map(|(_, t)| t)
    }

    fn peek2(&self) -> Option<&'a LexToken> {
        self.tokens.get(self.index + 1).map(|(_, t)| t)
    }

    fn keyword(&mut self, word: &str, col: &Column) -> Result<()> {
        if self.at_statement_start {
            let statement = match Statement::from_name(word) {
                Some(statement) => statement,
                None => return Err(error!(SyntaxError, ..col; "EXPECTED STATEMENT")),
            };
            let byte = statement.byte();
            // TRAP and BYE share their bytes with the numeric-constant
            // prefixes, which is the one place the THEN context peek
            // cannot tell them apart on the way back out.
            if self.then_statement && (byte == SMALL_INT_PREFIX || byte == NUMBER_PREFIX) {
                return Err(error!(SyntaxError, ..col; "CANNOT FOLLOW THEN"));
            }
            self.content.push(byte);
            self.at_statement_start = false;
            self.then_statement = false;
            self.in_assignment = matches!(statement, Statement::Let | Statement::For);
            return Ok(());
        }
        if let Some(function) = Function::from_name(word) {
            self.content.push(function.byte());
            return Ok(());
        }
        match Operator::from_name(word) {
            Some(operator) if operator.is_reserved_word() => {
                self.content.push(operator.byte());
                if operator == Operator::Then {
                    self.after_then();
                }
                Ok(())
            }
            _ => Err(error!(SyntaxError, ..col; "KEYWORD OUT OF PLACE")),
        }
    }

    // THEN takes a jump target expression or a fresh statement; which one
    // decides how the next byte must be read back.
    fn after_then(&mut self) {
        match self.peek() {
            Some(LexToken::Number(_)) => {}
            Some(LexToken::Identifier(_)) => {
                if self.starts_assignment() {
                    self.at_statement_start = true;
                    self.then_statement = true;
                }
            }
            Some(LexToken::EndOfLine) | None => {}
            _ => {
                self.at_statement_start = true;
                self.then_statement = true;
            }
        }
    }

    fn starts_assignment(&self) -> bool {
        match self.peek2() {
            Some(LexToken::OperatorSymbol(op)) => op == "=",
            Some(LexToken::Punctuation(c)) => *c == '(',
            _ => false,
        }
    }

    fn identifier(&mut self, name: &str, col: &Column) -> Result<()> {
        // The lexer only promotes exact words; one more look in case a
        // keyword arrived dressed as an identifier.
        if table::match_keyword(name).is_some() {
            return self.keyword(name, col);
        }
        if name.contains('.') {
            return Err(self.unknown_keyword(name.trim_end_matches('.'), col));
        }
        let array = matches!(self.peek(), Some(LexToken::Punctuation('(')));
        if self.at_statement_start {
            let assigns = array
                || matches!(self.peek(), Some(LexToken::OperatorSymbol(op)) if op == "=");
            if !assigns {
                return Err(self.unknown_keyword(name, col));
            }
            self.content.push(Statement::ILet.byte());
            self.at_statement_start = false;
            self.then_statement = false;
            self.in_assignment = true;
        }
        let var = match VarName::from_identifier(name, array) {
            Ok(var) => var,
            Err(error) => return Err(error.in_column(col)),
        };
        let index = self.resolve(var, col)?;
        self.content.push(VarTable::reference_byte(index));
        Ok(())
    }

    fn unknown_keyword(&self, word: &str, col: &Column) -> Error {
        let error = error!(SyntaxError, ..col; "UNKNOWN KEYWORD");
        match table::suggest_keyword(word) {
            Some(keyword) => error.suggest(keyword),
            None => error,
        }
    }

    fn resolve(&mut self, var: VarName, col: &Column) -> Result<usize> {
        if let Some(index) = self.vars.index_of(&var) {
            return Ok(index);
        }
        if let Some(position) = self.new_vars.iter().position(|v| *v == var) {
            return Ok(self.vars.len() + position);
        }
        let index = self.vars.len() + self.new_vars.len();
        if index >= MAX_VARIABLES {
            return Err(error!(TooManyVariables, ..col));
        }
        self.new_vars.push(var);
        Ok(index)
    }

    fn number(&mut self, text: &str, col: &Column) -> Result<()> {
        if self.at_statement_start {
            return Err(error!(SyntaxError, ..col; "EXPECTED STATEMENT"));
        }
        // A malformed literal becomes zero; the line itself is kept.
        let value = BcdFloat::parse(text).unwrap_or(BcdFloat::ZERO);
        self.content.push(NUMBER_PREFIX);
        self.content.extend_from_slice(value.bytes());
        Ok(())
    }

    fn string(&mut self, s: &str, col: &Column) -> Result<()> {
        if self.at_statement_start {
            return Err(error!(SyntaxError, ..col; "EXPECTED STATEMENT"));
        }
        let bytes: Vec<u8> = s
            .chars()
            .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
            .collect();
        if bytes.len() > 255 {
            return Err(error!(StringLengthError, ..col));
        }
        self.content.push(STRING_PREFIX);
        self.content.push(bytes.len() as u8);
        self.content.extend_from_slice(&bytes);
        Ok(())
    }

    fn operator(&mut self, op: &str, col: &Column) -> Result<()> {
        if self.at_statement_start {
            return Err(error!(SyntaxError, ..col; "EXPECTED STATEMENT"));
        }
        if op == "=" && self.in_assignment {
            self.in_assignment = false;
            self.content.push(Operator::Assign.byte());
            return Ok(());
        }
        match Operator::from_name(op) {
            Some(operator) => {
                self.content.push(operator.byte());
                Ok(())
            }
            None => Err(error!(SyntaxError, ..col)),
        }
    }

    fn punctuation(&mut self, c: char, col: &Column) -> Result<()> {
        if c == ':' {
            // An empty statement leaves no bytes behind.
            if !self.at_statement_start {
                self.content.push(STATEMENT_SEP);
                self.content.push(0);
                self.sep_fixups.push(self.content.len() - 1);
            }
            self.at_statement_start = true;
            self.in_assignment = false;
            self.then_statement = false;
            return Ok(());
        }
        if self.at_statement_start {
            return Err(error!(SyntaxError, ..col; "EXPECTED STATEMENT"));
        }
        match Operator::from_name(&c.to_string()) {
            Some(operator) => {
                self.content.push(operator.byte());
                Ok(())
            }
            None => Err(error!(SyntaxError, ..col)),
        }
    }

    fn comment(&mut self, text: &str, col: &Column) -> Result<()> {
        if !self.at_statement_start {
            return Err(error!(SyntaxError, ..col; "EXPECTED END OF STATEMENT"));
        }
        self.content.push(Statement::Rem.byte());
        for c in text.chars() {
            self.content.push(if c.is_ascii() { c as u8 } else { b'?' });
        }
        self.at_statement_start = false;
        self.then_statement = false;
        Ok(())
    }

    // Each separator carries the line-relative offset one past the
    // statement it introduces; the last statement's offset lands on the
    // total line length.
    fn patch_offsets(&mut self) {
        for k in 0..self.sep_fixups.len() {
            let placeholder = self.sep_fixups[k];
            let end = match self.sep_fixups.get(k + 1) {
                Some(&next) => next + 1,
                None => self.content.len(),
            };
            self.content[placeholder] = (end + HEADER_LEN) as u8;
        }
    }
}
