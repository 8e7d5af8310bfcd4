/*!
## Tokenized Program Module

This Rust module converts between BASIC source text and the tokenized
byte form the 8-bit interpreter keeps in memory, in both directions.

*/

mod bcd;
mod decode;
mod encode;
mod program;
pub mod table;
mod var;

#[cfg(test)]
mod tests;

pub use bcd::BcdFloat;
pub use decode::detokenize_line;
pub use decode::detokenize_program;
pub use decode::DetokenizedLine;
pub use decode::LineRange;
pub use decode::TextMode;
pub use encode::tokenize;
pub use encode::TokenizedLine;
pub use program::Program;
pub use var::VarName;
pub use var::VarTable;
pub use var::VarType;

/// Two line-number bytes plus the total-length byte.
pub const HEADER_LEN: usize = 3;

/// A whole line, header and end marker included, must fit this.
pub const MAX_LINE_LEN: usize = 255;

/// Line numbers at or above this mark the immediate-mode line; listings
/// leave them out. Line number 0 terminates a program image.
pub const IMMEDIATE_LINE: u16 = 0x8000;
