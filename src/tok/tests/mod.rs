use super::{detokenize_line, tokenize, TextMode, VarTable};

mod round_trip_test;

/// Tokenize one line and list it straight back.
fn list(source: &str, vars: &mut VarTable) -> String {
    let line = match tokenize(source, vars) {
        Ok(line) => line,
        Err(error) => panic!("{} : {:?}", source, error),
    };
    vars.merge(&line.new_variables).unwrap();
    detokenize_line(&line.bytes, vars, TextMode::Plain)
        .unwrap()
        .text
}

/// The canonical listing of a canonical line is itself.
fn round_trips(source: &str) {
    let mut vars = VarTable::new();
    assert_eq!(list(source, &mut vars), source);
}
