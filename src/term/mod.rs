/*!
## Terminal Module

Interactive front-end: numbered lines go into the tokenized program,
bare words drive it. Ctrl-C stops a listing the way BREAK did.

*/

extern crate ansi_term;
extern crate ctrlc;
extern crate linefeed;
use crate::error;
use crate::lang::{Error, LineNumber, MaxValue};
use crate::tok::{LineRange, Program, TextMode, VarTable, VarType};
use ansi_term::Style;
use linefeed::{Completer, Completion, Interface, Prompter, ReadResult, Signal, Terminal};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub fn main() {
    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");
    if let Err(error) = main_loop(interrupted) {
        eprintln!("{}", error);
    }
}

enum Command {
    Enter(String),
    List(LineRange),
    New,
    Vars,
    Save(String),
    Load(String),
    Export(String),
    Import(String),
    Bye,
}

fn main_loop(interrupted: Arc<AtomicBool>) -> std::io::Result<()> {
    let mut program = Program::new();
    let command = Interface::new("BASIC")?;
    command.set_report_signal(Signal::Interrupt, true);
    command.write_fmt(format_args!("READY.\n"))?;
    loop {
        interrupted.store(false, Ordering::SeqCst);
        let saved_completer = command.completer();
        command.set_completer(Arc::new(LineCompleter::new(program.clone())));
        let string = match command.read_line()? {
            ReadResult::Input(string) => string,
            ReadResult::Signal(Signal::Interrupt) => {
                command.set_buffer("")?;
                continue;
            }
            ReadResult::Signal(_) | ReadResult::Eof => break,
        };
        command.set_completer(saved_completer);
        let input = string.trim();
        if input.is_empty() {
            continue;
        }
        let parsed = match parse_command(input) {
            Ok(parsed) => parsed,
            Err(error) => {
                report(&command, &error)?;
                continue;
            }
        };
        match parsed {
            Command::Bye => break,
            Command::Enter(line) => match program.enter(&line) {
                Ok(_) => {
                    command.add_history_unique(string);
                }
                Err(error) => report(&command, &error)?,
            },
            Command::List(range) => {
                for line in program.list(&range, TextMode::Rich) {
                    if interrupted.load(Ordering::SeqCst) {
                        command.write_fmt(format_args!("STOPPED\n"))?;
                        break;
                    }
                    command.write_fmt(format_args!("{}\n", line.text))?;
                }
            }
            Command::New => program.clear(),
            Command::Vars => {
                for (index, var) in program.vars().iter().enumerate() {
                    let marker = match var.var_type() {
                        VarType::Array => "(",
                        _ => "",
                    };
                    command.write_fmt(format_args!("{:3} {}{}\n", index, var, marker))?;
                }
            }
            Command::Save(filename) => {
                if let Err(error) = save(&program, &filename) {
                    report(&command, &error)?;
                }
            }
            Command::Load(filename) => match load(&filename) {
                Ok(loaded) => program = loaded,
                Err(error) => report(&command, &error)?,
            },
            Command::Export(filename) => {
                if let Err(error) = export(&program, &filename) {
                    report(&command, &error)?;
                }
            }
            Command::Import(filename) => match import(&filename) {
                Ok(loaded) => program = loaded,
                Err(error) => report(&command, &error)?,
            },
        }
    }
    Ok(())
}

fn report<T: Terminal>(command: &Interface<T>, error: &Error) -> std::io::Result<()> {
    command.write_fmt(format_args!(
        "{}\n",
        Style::new().bold().paint(error.to_string())
    ))
}

fn parse_command(input: &str) -> Result<Command, Error> {
    if input.starts_with(|c: char| c.is_ascii_digit()) {
        return Ok(Command::Enter(input.to_string()));
    }
    let (word, rest) = match input.find(' ') {
        Some(at) => (&input[..at], input[at..].trim()),
        None => (input, ""),
    };
    match word.to_ascii_uppercase().as_str() {
        "LIST" => Ok(Command::List(parse_range(rest)?)),
        "NEW" => Ok(Command::New),
        "VARS" => Ok(Command::Vars),
        "SAVE" => Ok(Command::Save(filename(rest)?)),
        "LOAD" => Ok(Command::Load(filename(rest)?)),
        "EXPORT" => Ok(Command::Export(filename(rest)?)),
        "IMPORT" => Ok(Command::Import(filename(rest)?)),
        "BYE" => Ok(Command::Bye),
        _ => Err(error!(SyntaxError)),
    }
}

fn parse_range(s: &str) -> Result<LineRange, Error> {
    fn bound(t: &str) -> Result<Option<u16>, Error> {
        if t.is_empty() {
            return Ok(None);
        }
        match t.parse::<u16>() {
            Ok(n) if n <= LineNumber::max_value() => Ok(Some(n)),
            _ => Err(error!(ValueError; "BAD LINE RANGE")),
        }
    }
    let s = s.trim();
    if s.is_empty() {
        return Ok(LineRange::all());
    }
    match s.find('-') {
        Some(at) => Ok(LineRange {
            start: bound(s[..at].trim())?,
            end: bound(s[at + 1..].trim())?,
        }),
        None => {
            let number = bound(s)?;
            Ok(LineRange {
                start: number,
                end: number,
            })
        }
    }
}

fn filename(s: &str) -> Result<String, Error> {
    let s = s.trim().trim_matches('"');
    if s.is_empty() {
        return Err(error!(ValueError; "EXPECTED FILENAME"));
    }
    Ok(s.to_string())
}

// Tokenized image: the variable table block, the program lines, the
// zero-line terminator.
fn save(program: &Program, filename: &str) -> Result<(), Error> {
    let mut file = match File::create(filename) {
        Ok(file) => file,
        Err(error) => return Err(error!(LoadFileError; &error.to_string())),
    };
    let mut bytes = program.vars().to_bytes();
    bytes.extend_from_slice(&program.to_bytes());
    match file.write_all(&bytes) {
        Ok(_) => Ok(()),
        Err(error) => Err(error!(LoadFileError; &error.to_string())),
    }
}

fn load(filename: &str) -> Result<Program, Error> {
    let mut bytes = vec![];
    match File::open(filename) {
        Ok(mut file) => {
            if let Err(error) = file.read_to_end(&mut bytes) {
                return Err(error!(LoadFileError; &error.to_string()));
            }
        }
        Err(error) => match error.kind() {
            ErrorKind::NotFound => return Err(error!(LoadFileError; "FILE NOT FOUND")),
            _ => return Err(error!(LoadFileError; &error.to_string())),
        },
    }
    let (vars, rest) = VarTable::from_bytes(&bytes)?;
    Ok(Program::from_bytes(rest, vars))
}

fn export(program: &Program, filename: &str) -> Result<(), Error> {
    if program.is_empty() {
        return Err(error!(LoadFileError; "NOTHING TO SAVE"));
    }
    let mut file = match File::create(filename) {
        Ok(file) => file,
        Err(error) => return Err(error!(LoadFileError; &error.to_string())),
    };
    for line in program.list(&LineRange::all(), TextMode::Plain) {
        if let Err(error) = writeln!(file, "{}", line.text) {
            return Err(error!(LoadFileError; &error.to_string()));
        }
    }
    Ok(())
}

fn import(filename: &str) -> Result<Program, Error> {
    let reader = match File::open(filename) {
        Ok(file) => BufReader::new(file),
        Err(error) => match error.kind() {
            ErrorKind::NotFound => return Err(error!(LoadFileError; "FILE NOT FOUND")),
            _ => return Err(error!(LoadFileError; &error.to_string())),
        },
    };
    let mut program = Program::new();
    for (index, line) in reader.lines().enumerate() {
        match line {
            Err(error) => return Err(error!(LoadFileError; &error.to_string())),
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                if let Err(error) = program.enter(&line) {
                    // report against the file position, not a BASIC line
                    return Err(
                        error!(LoadFileError; &format!("FILE LINE {}; {}", index + 1, error)),
                    );
                }
            }
        }
    }
    Ok(program)
}

struct LineCompleter {
    program: Program,
}

impl LineCompleter {
    fn new(program: Program) -> LineCompleter {
        LineCompleter { program }
    }
}

impl<Term: Terminal> Completer<Term> for LineCompleter {
    fn complete(
        &self,
        _word: &str,
        prompter: &Prompter<Term>,
        _start: usize,
        _end: usize,
    ) -> Option<Vec<Completion>> {
        if let Ok(number) = prompter.buffer().parse::<u16>() {
            if let Some(line) = self.program.line(number, TextMode::Plain) {
                let mut comp = Completion::simple(line.text);
                comp.suffix = linefeed::complete::Suffix::None;
                return Some(vec![comp]);
            }
        }
        None
    }
}
