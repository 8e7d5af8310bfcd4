//! # BASIC
//!
//! Line-at-a-time workbench over the Atari BASIC tokenizer.
//!

fn main() {
    atbasic::term::main()
}
