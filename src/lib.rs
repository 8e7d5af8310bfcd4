//! # Atari BASIC Tokenizer
//!
//! A bidirectional codec between BASIC source text and the compact
//! tokenized form the 8-bit interpreter keeps in memory: keyword byte
//! tables, the 6-byte BCD numeric constants, a crunching lexer, and a
//! position-aware detokenizer that knows a statement byte from the
//! operator byte it happens to share a value with.
//!
//! Tokenize one line against a variable table, get back its bytes and
//! any variables it introduced:
//!
//! ```
//! use atbasic::tok::{tokenize, detokenize_line, TextMode, VarTable};
//!
//! let mut vars = VarTable::new();
//! let line = tokenize("10 X=5", &vars).unwrap();
//! vars.merge(&line.new_variables).unwrap();
//! let listed = detokenize_line(&line.bytes, &vars, TextMode::Plain).unwrap();
//! assert_eq!(listed.text, "10 X=5");
//! ```
//!
//! The `atbasic` binary wraps this in a line-at-a-time workbench with
//! LIST, SAVE, and LOAD.

pub mod lang;
pub mod term;
pub mod tok;
