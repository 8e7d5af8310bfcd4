use super::super::{detokenize_program, LineRange, Program, TextMode, VarTable};
use super::{list, round_trips};

#[test]
fn test_canonical_lines_round_trip() {
    round_trips("10 PRINT \"HELLO\"");
    round_trips("10 X=5");
    round_trips("10 LET X=5");
    round_trips("20 FOR I=1 TO 10 STEP 2");
    round_trips("30 NEXT I");
    round_trips("40 IF X<=10 THEN GOTO 100");
    round_trips("50 IF A=1 THEN 100");
    round_trips("60 GOSUB 1000:RETURN");
    round_trips("70 REM WIDGETS GO HERE");
    round_trips("80 DIM A(10)");
    round_trips("90 PRINT A;B,C");
    round_trips("100 ON X GOTO 110,120");
    round_trips("110 POKE 710,0");
    round_trips("120 PRINT CHR$(125)");
    round_trips("130 A$=\"YES\"");
    round_trips("140 IF A$=\"YES\" THEN PRINT \"OK\"");
    round_trips("150 X=PEEK(712)+RND(0)*8");
    round_trips("160 PRINT \"SUM\";X+Y-Z/2*3^2");
    round_trips("170 TRAP 200:OPEN #1,4,0,\"D:DATA\"");
    round_trips("180 GET #1,X:CLOSE #1");
    round_trips("190 SOUND 0,121,10,8");
    round_trips("200 GRAPHICS 0:POSITION 10,5:? \"AT\"");
    round_trips("210 IF NOT A AND B OR C THEN 10");
    round_trips("220 GO TO 50");
    round_trips("230 X=-5");
    round_trips("240 A=1:");
    round_trips("250 IF A THEN B");
    round_trips("260 IF A THEN X=1:Y=2");
    round_trips("270 IF A THEN REM SKIPPED");
    round_trips("280 REM");
}

#[test]
fn test_ambiguous_statement_after_then() {
    let vars = VarTable::new();
    assert_eq!(
        super::super::tokenize("10 IF A THEN TRAP 100", &vars)
            .unwrap_err()
            .code(),
        17
    );
    assert_eq!(
        super::super::tokenize("10 IF A THEN BYE", &vars)
            .unwrap_err()
            .code(),
        17
    );
    // the same statements are fine behind a separator
    round_trips("10 IF A THEN X=1:TRAP 100");
}

#[test]
fn test_spacing_normalizes() {
    let mut vars = VarTable::new();
    assert_eq!(list("10 print   x  ,  y", &mut vars), "10 PRINT X,Y");
    let mut vars = VarTable::new();
    assert_eq!(list("20 forI=1to10", &mut vars), "20 FOR I=1 TO 10");
    let mut vars = VarTable::new();
    assert_eq!(list("30 ifa=1then40", &mut vars), "30 IF A=1 THEN 40");
}

#[test]
fn test_abbreviations_expand() {
    let mut vars = VarTable::new();
    assert_eq!(list("10 PR. \"HI\"", &mut vars), "10 PRINT \"HI\"");
    let mut vars = VarTable::new();
    assert_eq!(list("10 G. 100", &mut vars), "10 GOTO 100");
    let mut vars = VarTable::new();
    assert_eq!(list("10 . SO IT GOES", &mut vars), "10 REM SO IT GOES");
    let mut vars = VarTable::new();
    assert_eq!(list("10 GOS. 500", &mut vars), "10 GOSUB 500");
}

#[test]
fn test_abbreviation_bytes_match_full_keyword() {
    let vars = VarTable::new();
    let full = super::super::tokenize("10 PRINT \"X\"", &vars).unwrap();
    let abbreviated = super::super::tokenize("10 PR. \"X\"", &vars).unwrap();
    assert_eq!(full.bytes, abbreviated.bytes);
}

#[test]
fn test_numbers_survive() {
    round_trips("10 X=0.5");
    round_trips("10 X=0.0015");
    round_trips("10 X=3.14159265");
    round_trips("20 X=1500");
    round_trips("30 X=3.14159265");
    round_trips("40 X=1E20");
    let mut vars = VarTable::new();
    assert_eq!(list("50 X=$FF", &mut vars), "50 X=255");
    let mut vars = VarTable::new();
    assert_eq!(list("60 X=1.50", &mut vars), "60 X=1.5");
}

#[test]
fn test_program_walks_and_filters() {
    let mut program = Program::new();
    program.enter("10 PRINT 1").unwrap();
    program.enter("20 PRINT 2").unwrap();
    program.enter("30 PRINT 3").unwrap();
    let image = program.to_bytes();
    let all = detokenize_program(&image, program.vars(), &LineRange::all(), TextMode::Plain);
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].text, "10 PRINT 1");
    let filtered = detokenize_program(
        &image,
        program.vars(),
        &LineRange {
            start: Some(15),
            end: Some(25),
        },
        TextMode::Plain,
    );
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].text, "20 PRINT 2");
}

#[test]
fn test_truncated_program_stops_cleanly() {
    let mut program = Program::new();
    program.enter("10 PRINT \"FIRST\"").unwrap();
    program.enter("20 PRINT \"SECOND\"").unwrap();
    let image = program.to_bytes();
    for cut in 0..image.len() {
        let lines = detokenize_program(
            &image[..cut],
            program.vars(),
            &LineRange::all(),
            TextMode::Plain,
        );
        assert!(lines.len() <= 2);
    }
    let missing_tail = &image[..image.len() - 10];
    let lines = detokenize_program(
        missing_tail,
        program.vars(),
        &LineRange::all(),
        TextMode::Plain,
    );
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].text, "10 PRINT \"FIRST\"");
}

#[test]
fn test_immediate_line_left_out() {
    let mut program = Program::new();
    program.enter("10 PRINT 1").unwrap();
    let mut image = vec![];
    for (_, line) in program.lines() {
        image.extend_from_slice(line);
    }
    // an immediate-mode line between program lines and the terminator
    let direct = super::super::tokenize("20 PRINT 2", program.vars()).unwrap();
    let mut direct_bytes = direct.bytes;
    direct_bytes[0] = 0x00;
    direct_bytes[1] = 0x80;
    image.extend_from_slice(&direct_bytes);
    image.extend_from_slice(&[0x00, 0x00, 0x04, 0x16]);
    let lines = detokenize_program(&image, program.vars(), &LineRange::all(), TextMode::Plain);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].line_number, 10);
}
