/*!
# Language Module

This Rust module provides lexical analysis of Atari BASIC source text.

*/

#[macro_use]
mod error;
mod lex;
mod token;

pub use error::Error;
pub use error::ErrorCode;
pub use lex::lex;
pub use token::LexToken;

pub type LineNumber = Option<u16>;
pub type Column = std::ops::Range<usize>;

pub trait MaxValue {
    fn max_value() -> u16;
}

impl MaxValue for LineNumber {
    fn max_value() -> u16 {
        32767
    }
}
