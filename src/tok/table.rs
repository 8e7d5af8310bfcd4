use std::collections::HashMap;

// Bytes that structure a tokenized line but belong to no keyword family.
pub const SMALL_INT_PREFIX: u8 = 0x0D;
pub const NUMBER_PREFIX: u8 = 0x0E;
pub const STRING_PREFIX: u8 = 0x0F;
pub const STATEMENT_SEP: u8 = 0x14;
pub const EOL: u8 = 0x16;
pub const VARIABLE_BASE: u8 = 0x80;

/// ## Statement tokens
///
/// The byte that begins every statement. The range overlaps the operator
/// tokens; which table applies is decided by parse position alone.

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Statement {
    Rem,
    Data,
    Input,
    Color,
    List,
    Enter,
    Let,
    If,
    For,
    Next,
    Goto1,
    Goto2,
    Gosub,
    Trap,
    Bye,
    Cont,
    Com,
    Close,
    Clr,
    Deg,
    Dim,
    End,
    New,
    Open,
    Load,
    Save,
    Status,
    Note,
    Point,
    Xio,
    On,
    Poke,
    Print1,
    Rad,
    Read,
    Restore,
    Return,
    Run,
    Stop,
    Pop,
    Print2,
    Get,
    Put,
    Graphics,
    Plot,
    Position,
    Dos,
    Drawto,
    Setcolor,
    Locate,
    Sound,
    Lprint,
    Csave,
    Cload,
    ILet,
}

const STATEMENTS: [(u8, &str, Statement); 55] = [
    (0x00, "REM", Statement::Rem),
    (0x01, "DATA", Statement::Data),
    (0x02, "INPUT", Statement::Input),
    (0x03, "COLOR", Statement::Color),
    (0x04, "LIST", Statement::List),
    (0x05, "ENTER", Statement::Enter),
    (0x06, "LET", Statement::Let),
    (0x07, "IF", Statement::If),
    (0x08, "FOR", Statement::For),
    (0x09, "NEXT", Statement::Next),
    (0x0A, "GOTO", Statement::Goto1),
    (0x0B, "GO TO", Statement::Goto2),
    (0x0C, "GOSUB", Statement::Gosub),
    (0x0D, "TRAP", Statement::Trap),
    (0x0E, "BYE", Statement::Bye),
    (0x0F, "CONT", Statement::Cont),
    (0x10, "COM", Statement::Com),
    (0x11, "CLOSE", Statement::Close),
    (0x12, "CLR", Statement::Clr),
    (0x13, "DEG", Statement::Deg),
    (0x14, "DIM", Statement::Dim),
    (0x15, "END", Statement::End),
    (0x16, "NEW", Statement::New),
    (0x17, "OPEN", Statement::Open),
    (0x18, "LOAD", Statement::Load),
    (0x19, "SAVE", Statement::Save),
    (0x1A, "STATUS", Statement::Status),
    (0x1B, "NOTE", Statement::Note),
    (0x1C, "POINT", Statement::Point),
    (0x1D, "XIO", Statement::Xio),
    (0x1E, "ON", Statement::On),
    (0x1F, "POKE", Statement::Poke),
    (0x20, "PRINT", Statement::Print1),
    (0x21, "RAD", Statement::Rad),
    (0x22, "READ", Statement::Read),
    (0x23, "RESTORE", Statement::Restore),
    (0x24, "RETURN", Statement::Return),
    (0x25, "RUN", Statement::Run),
    (0x26, "STOP", Statement::Stop),
    (0x27, "POP", Statement::Pop),
    (0x28, "?", Statement::Print2),
    (0x29, "GET", Statement::Get),
    (0x2A, "PUT", Statement::Put),
    (0x2B, "GRAPHICS", Statement::Graphics),
    (0x2C, "PLOT", Statement::Plot),
    (0x2D, "POSITION", Statement::Position),
    (0x2E, "DOS", Statement::Dos),
    (0x2F, "DRAWTO", Statement::Drawto),
    (0x30, "SETCOLOR", Statement::Setcolor),
    (0x31, "LOCATE", Statement::Locate),
    (0x32, "SOUND", Statement::Sound),
    (0x33, "LPRINT", Statement::Lprint),
    (0x34, "CSAVE", Statement::Csave),
    (0x35, "CLOAD", Statement::Cload),
    (0x36, "", Statement::ILet),
];

thread_local!(
    static NAME_TO_STATEMENT: HashMap<&'static str, Statement> = STATEMENTS
        .iter()
        .filter(|(_, name, _)| !name.is_empty())
        .map(|(_, name, token)| (*name, *token))
        .collect();
);

impl Statement {
    pub fn entries() -> &'static [(u8, &'static str, Statement)] {
        &STATEMENTS
    }

    pub fn from_byte(byte: u8) -> Option<Statement> {
        STATEMENTS
            .iter()
            .find(|(b, _, _)| *b == byte)
            .map(|(_, _, token)| *token)
    }

    pub fn from_name(name: &str) -> Option<Statement> {
        NAME_TO_STATEMENT.with(|map| map.get(name).copied())
    }

    pub fn from_abbreviation(prefix: &str) -> Option<Statement> {
        from_abbreviation(&STATEMENTS, prefix)
    }

    pub fn byte(self) -> u8 {
        entry_for(&STATEMENTS, self).0
    }

    pub fn name(self) -> &'static str {
        entry_for(&STATEMENTS, self).1
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// ## Operator tokens
///
/// The expression space. Byte values $12..$2D collide with statement
/// tokens on purpose; the real format reuses them by position.

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Operator {
    Comma,
    Colon,
    Semicolon,
    Goto,
    Gosub,
    To,
    Step,
    Then,
    Channel,
    LessEqual,
    NotEqual,
    GreaterEqual,
    Less,
    Greater,
    Equal,
    Caret,
    Multiply,
    Plus,
    Minus,
    Divide,
    Not,
    Or,
    And,
    LParen,
    RParen,
    Assign,
}

const OPERATORS: [(u8, &str, Operator); 26] = [
    (0x12, ",", Operator::Comma),
    (0x14, ":", Operator::Colon),
    (0x15, ";", Operator::Semicolon),
    (0x17, "GOTO", Operator::Goto),
    (0x18, "GOSUB", Operator::Gosub),
    (0x19, "TO", Operator::To),
    (0x1A, "STEP", Operator::Step),
    (0x1B, "THEN", Operator::Then),
    (0x1C, "#", Operator::Channel),
    (0x1D, "<=", Operator::LessEqual),
    (0x1E, "<>", Operator::NotEqual),
    (0x1F, ">=", Operator::GreaterEqual),
    (0x20, "<", Operator::Less),
    (0x21, ">", Operator::Greater),
    (0x22, "=", Operator::Equal),
    (0x23, "^", Operator::Caret),
    (0x24, "*", Operator::Multiply),
    (0x25, "+", Operator::Plus),
    (0x26, "-", Operator::Minus),
    (0x27, "/", Operator::Divide),
    (0x28, "NOT", Operator::Not),
    (0x29, "OR", Operator::Or),
    (0x2A, "AND", Operator::And),
    (0x2B, "(", Operator::LParen),
    (0x2C, ")", Operator::RParen),
    (0x2D, "=", Operator::Assign),
];

thread_local!(
    static NAME_TO_OPERATOR: HashMap<&'static str, Operator> = OPERATORS
        .iter()
        .rev()
        .map(|(_, name, token)| (*name, *token))
        .collect();
);

impl Operator {
    pub fn entries() -> &'static [(u8, &'static str, Operator)] {
        &OPERATORS
    }

    pub fn from_byte(byte: u8) -> Option<Operator> {
        OPERATORS
            .iter()
            .find(|(b, _, _)| *b == byte)
            .map(|(_, _, token)| *token)
    }

    // "=" resolves to the comparison token; assignment is positional.
    pub fn from_name(name: &str) -> Option<Operator> {
        NAME_TO_OPERATOR.with(|map| map.get(name).copied())
    }

    pub fn from_abbreviation(prefix: &str) -> Option<Operator> {
        from_abbreviation(&OPERATORS, prefix)
    }

    pub fn byte(self) -> u8 {
        entry_for(&OPERATORS, self).0
    }

    pub fn name(self) -> &'static str {
        entry_for(&OPERATORS, self).1
    }

    pub fn is_reserved_word(self) -> bool {
        use Operator::*;
        match self {
            Goto | Gosub | To | Step | Then | Not | Or | And => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// ## Function tokens
///
/// Disjoint from both other families; these bytes mean the same thing
/// everywhere an expression is legal.

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Function {
    Str,
    Chr,
    Usr,
    Asc,
    Val,
    Len,
    Adr,
    Atn,
    Cos,
    Peek,
    Sin,
    Rnd,
    Fre,
    Exp,
    Log,
    Clog,
    Sqr,
    Sgn,
    Abs,
    Int,
    Paddle,
    Stick,
    Ptrig,
    Strig,
}

const FUNCTIONS: [(u8, &str, Function); 24] = [
    (0x3D, "STR$", Function::Str),
    (0x3E, "CHR$", Function::Chr),
    (0x3F, "USR", Function::Usr),
    (0x40, "ASC", Function::Asc),
    (0x41, "VAL", Function::Val),
    (0x42, "LEN", Function::Len),
    (0x43, "ADR", Function::Adr),
    (0x44, "ATN", Function::Atn),
    (0x45, "COS", Function::Cos),
    (0x46, "PEEK", Function::Peek),
    (0x47, "SIN", Function::Sin),
    (0x48, "RND", Function::Rnd),
    (0x49, "FRE", Function::Fre),
    (0x4A, "EXP", Function::Exp),
    (0x4B, "LOG", Function::Log),
    (0x4C, "CLOG", Function::Clog),
    (0x4D, "SQR", Function::Sqr),
    (0x4E, "SGN", Function::Sgn),
    (0x4F, "ABS", Function::Abs),
    (0x50, "INT", Function::Int),
    (0x51, "PADDLE", Function::Paddle),
    (0x52, "STICK", Function::Stick),
    (0x53, "PTRIG", Function::Ptrig),
    (0x54, "STRIG", Function::Strig),
];

thread_local!(
    static NAME_TO_FUNCTION: HashMap<&'static str, Function> = FUNCTIONS
        .iter()
        .map(|(_, name, token)| (*name, *token))
        .collect();
);

impl Function {
    pub fn entries() -> &'static [(u8, &'static str, Function)] {
        &FUNCTIONS
    }

    pub fn from_byte(byte: u8) -> Option<Function> {
        FUNCTIONS
            .iter()
            .find(|(b, _, _)| *b == byte)
            .map(|(_, _, token)| *token)
    }

    pub fn from_name(name: &str) -> Option<Function> {
        NAME_TO_FUNCTION.with(|map| map.get(name).copied())
    }

    pub fn from_abbreviation(prefix: &str) -> Option<Function> {
        from_abbreviation(&FUNCTIONS, prefix)
    }

    pub fn byte(self) -> u8 {
        entry_for(&FUNCTIONS, self).0
    }

    pub fn name(self) -> &'static str {
        entry_for(&FUNCTIONS, self).1
    }
}

impl std::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn entry_for<T: PartialEq + Copy>(
    entries: &'static [(u8, &'static str, T)],
    token: T,
) -> (u8, &'static str) {
    for (byte, name, t) in entries {
        if *t == token {
            return (*byte, name);
        }
    }
    // Every variant is listed in its table.
    (0, "")
}

// A period abbreviation resolves to the first entry, in byte order,
// whose keyword starts with the prefix. A lone "." is REM.
fn from_abbreviation<T: Copy>(entries: &'static [(u8, &'static str, T)], prefix: &str) -> Option<T> {
    entries
        .iter()
        .find(|(_, name, _)| !name.is_empty() && name.starts_with(prefix))
        .map(|(_, _, token)| *token)
}

/// Full-keyword lookup. Statements win over functions, functions over
/// operators.
pub fn exact_keyword(word: &str) -> Option<&'static str> {
    Statement::from_name(word)
        .map(|t| t.name())
        .or_else(|| Function::from_name(word).map(|t| t.name()))
        .or_else(|| Operator::from_name(word).map(|t| t.name()))
}

/// Period-abbreviation lookup, same family order as `exact_keyword`.
pub fn abbreviated_keyword(prefix: &str) -> Option<&'static str> {
    Statement::from_abbreviation(prefix)
        .map(|t| t.name())
        .or_else(|| Function::from_abbreviation(prefix).map(|t| t.name()))
        .or_else(|| Operator::from_abbreviation(prefix).map(|t| t.name()))
}

/// Resolve a lexed word to its canonical keyword, expanding a trailing
/// period through the abbreviation tables.
pub fn match_keyword(word: &str) -> Option<&'static str> {
    if let Some(prefix) = word.strip_suffix('.') {
        if prefix.contains('.') {
            return None;
        }
        return abbreviated_keyword(prefix);
    }
    exact_keyword(word)
}

/// Closest keyword by edit distance, if within distance 2.
pub fn suggest_keyword(word: &str) -> Option<&'static str> {
    let mut best: Option<(usize, &'static str)> = None;
    let candidates = STATEMENTS
        .iter()
        .map(|(_, name, _)| *name)
        .chain(FUNCTIONS.iter().map(|(_, name, _)| *name))
        .chain(OPERATORS.iter().map(|(_, name, _)| *name));
    for name in candidates {
        if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            continue;
        }
        let distance = levenshtein(word, name);
        if best.map_or(true, |(b, _)| distance < b) {
            best = Some((distance, name));
        }
    }
    match best {
        Some((distance, name)) if distance <= 2 => Some(name),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut next: Vec<usize> = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        next[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitute = prev[j] + if ca == cb { 0 } else { 1 };
            next[j + 1] = substitute.min(prev[j + 1] + 1).min(next[j] + 1);
        }
        std::mem::swap(&mut prev, &mut next);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_overlap_is_positional() {
        assert_eq!(Statement::from_byte(0x2D), Some(Statement::Position));
        assert_eq!(Operator::from_byte(0x2D), Some(Operator::Assign));
        assert_eq!(Statement::from_byte(0x20), Some(Statement::Print1));
        assert_eq!(Operator::from_byte(0x20), Some(Operator::Less));
    }

    #[test]
    fn test_round_trip_tables() {
        for (byte, _, token) in Statement::entries() {
            assert_eq!(Statement::from_byte(*byte), Some(*token));
            assert_eq!(token.byte(), *byte);
        }
        for (byte, _, token) in Operator::entries() {
            assert_eq!(token.byte(), *byte);
        }
        for (byte, _, token) in Function::entries() {
            assert_eq!(Function::from_byte(*byte), Some(*token));
            assert_eq!(token.byte(), *byte);
        }
    }

    #[test]
    fn test_abbreviations() {
        assert_eq!(match_keyword("PR."), Some("PRINT"));
        assert_eq!(match_keyword("G."), Some("GOTO"));
        assert_eq!(match_keyword("GOS."), Some("GOSUB"));
        assert_eq!(match_keyword("L."), Some("LIST"));
        assert_eq!(match_keyword("R."), Some("REM"));
        assert_eq!(match_keyword("PE."), Some("PEEK"));
    }

    #[test]
    fn test_exact_match_priority() {
        assert_eq!(match_keyword("PRINT"), Some("PRINT"));
        assert_eq!(match_keyword("SIN"), Some("SIN"));
        assert_eq!(match_keyword("AND"), Some("AND"));
        assert_eq!(match_keyword("PICKLES"), None);
    }

    #[test]
    fn test_suggest() {
        assert_eq!(suggest_keyword("PRANT"), Some("PRINT"));
        assert_eq!(suggest_keyword("GOTTO"), Some("GOTO"));
        assert_eq!(suggest_keyword("ZZZZZZ"), None);
    }

    #[test]
    fn test_equal_prefers_comparison() {
        assert_eq!(Operator::from_name("="), Some(Operator::Equal));
    }
}
