use super::{Column, LineNumber};

pub struct Error {
    code: u16,
    line_number: LineNumber,
    column: Column,
    message: String,
    suggestion: Option<String>,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, ..$col:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_column($col)
    };
    ($err:ident, $line:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_line_number($line)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, ..$col:expr;  $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_column($col)
            .message($msg)
    };
    ($err:ident, $line:expr, ..$col:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line_number($line)
            .in_column($col)
    };
    ($err:ident, $line:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line_number($line)
            .message($msg)
    };
    ($err:ident, $line:expr, ..$col:expr;  $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line_number($line)
            .in_column($col)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code: code as u16,
            line_number: None,
            column: 0..0,
            message: String::new(),
            suggestion: None,
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn is_direct(&self) -> bool {
        self.line_number.is_none()
    }

    pub fn line_number(&self) -> LineNumber {
        self.line_number
    }

    pub fn column(&self) -> Column {
        self.column.clone()
    }

    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    pub fn in_line_number(self, line: LineNumber) -> Error {
        debug_assert!(self.line_number.is_none());
        Error {
            line_number: line,
            ..self
        }
    }

    pub fn in_column(self, column: &Column) -> Error {
        debug_assert_eq!(self.column, 0..0);
        Error {
            column: column.clone(),
            ..self
        }
    }

    pub fn message(self, message: &str) -> Error {
        debug_assert!(self.message.is_empty());
        Error {
            message: message.to_string(),
            ..self
        }
    }

    pub fn suggest(self, word: &str) -> Error {
        debug_assert!(self.suggestion.is_none());
        Error {
            suggestion: Some(word.to_string()),
            ..self
        }
    }
}

pub enum ErrorCode {
    ValueError = 3,
    TooManyVariables = 4,
    StringLengthError = 5,
    NumberTooLarge = 7,
    LineNotFound = 12,
    LineTooLong = 14,
    SyntaxError = 17,
    LoadFileError = 21,
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let code_str = match self.code {
            2 => "MEMORY INSUFFICIENT",
            3 => "VALUE ERROR",
            4 => "TOO MANY VARIABLES",
            5 => "STRING LENGTH ERROR",
            6 => "OUT OF DATA",
            7 => "NUMBER TOO LARGE",
            8 => "INPUT STATEMENT ERROR",
            9 => "ARRAY OR STRING DIM ERROR",
            11 => "FLOATING POINT OVERFLOW",
            12 => "LINE NOT FOUND",
            13 => "NEXT WITHOUT FOR",
            14 => "LINE TOO LONG",
            15 => "GOSUB OR FOR LINE DELETED",
            16 => "RETURN ERROR",
            17 => "SYNTAX ERROR",
            19 => "LOAD PROGRAM TOO LONG",
            21 => "LOAD FILE ERROR",
            _ => "",
        };
        let mut suffix = String::new();
        if let Some(line_number) = self.line_number {
            suffix.push_str(&format!(" {}", line_number));
        }
        if (0..0) != self.column {
            suffix.push_str(&format!(" ({}..{})", self.column.start, self.column.end));
        }
        if !self.message.is_empty() {
            suffix.push_str(&format!("; {}", self.message));
        }
        if let Some(word) = &self.suggestion {
            suffix.push_str(&format!("; TRY {}", word));
        }
        if code_str.is_empty() {
            if suffix.is_empty() {
                write!(f, "PROGRAM ERROR {}", self.code)
            } else {
                write!(f, "PROGRAM ERROR {} IN{}", self.code, suffix)
            }
        } else if suffix.is_empty() {
            write!(f, "{}", code_str)
        } else {
            write!(f, "{} IN{}", code_str, suffix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let error = Error::new(ErrorCode::SyntaxError)
            .in_line_number(Some(10))
            .in_column(&(3..8));
        assert_eq!(error.to_string(), "SYNTAX ERROR IN 10 (3..8)");
    }

    #[test]
    fn test_suggestion() {
        let error = Error::new(ErrorCode::SyntaxError)
            .message("UNKNOWN KEYWORD")
            .suggest("PRINT");
        assert_eq!(error.suggestion(), Some("PRINT"));
        assert_eq!(error.to_string(), "SYNTAX ERROR IN; UNKNOWN KEYWORD; TRY PRINT");
    }
}
