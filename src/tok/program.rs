use super::decode::{detokenize_line, DetokenizedLine, LineRange, TextMode};
use super::encode::tokenize;
use super::var::VarTable;
use super::{HEADER_LEN, IMMEDIATE_LINE};
use crate::lang::Error;
use std::collections::BTreeMap;

type Result<T> = std::result::Result<T, Error>;

/// ## Program memory
///
/// Tokenized lines keyed by line number, plus the variable table they
/// reference. The table only ever grows; deleting a line leaves its
/// variables in place because other lines hold the same index bytes.

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Program {
    lines: BTreeMap<u16, Vec<u8>>,
    vars: VarTable,
}

impl Program {
    pub fn new() -> Program {
        Program::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.vars.clear();
    }

    pub fn vars(&self) -> &VarTable {
        &self.vars
    }

    pub fn lines(&self) -> impl Iterator<Item = (&u16, &Vec<u8>)> {
        self.lines.iter()
    }

    /// Tokenize one source line into the program. A bare line number
    /// deletes that line. Returns the line number entered or removed.
    pub fn enter(&mut self, source: &str) -> Result<u16> {
        let tokenized = tokenize(source, &self.vars)?;
        if tokenized.bytes.len() == HEADER_LEN + 1 {
            self.lines.remove(&tokenized.line_number);
            return Ok(tokenized.line_number);
        }
        self.vars.merge(&tokenized.new_variables)?;
        self.lines.insert(tokenized.line_number, tokenized.bytes);
        Ok(tokenized.line_number)
    }

    pub fn remove(&mut self, line_number: u16) -> bool {
        self.lines.remove(&line_number).is_some()
    }

    /// The text of one stored line.
    pub fn line(&self, line_number: u16, mode: TextMode) -> Option<DetokenizedLine> {
        let bytes = self.lines.get(&line_number)?;
        detokenize_line(bytes, &self.vars, mode)
    }

    pub fn list(&self, range: &LineRange, mode: TextMode) -> Vec<DetokenizedLine> {
        self.lines
            .iter()
            .filter(|(number, _)| range.contains(**number))
            .filter_map(|(_, bytes)| detokenize_line(bytes, &self.vars, mode))
            .collect()
    }

    /// The in-memory image: concatenated lines in number order, closed
    /// by a zero-numbered terminator line.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![];
        for line in self.lines.values() {
            bytes.extend_from_slice(line);
        }
        bytes.extend_from_slice(&[0x00, 0x00, 0x04, super::table::EOL]);
        bytes
    }

    /// Rebuild from an image and the variable table that travels with
    /// it. Stops cleanly at the terminator or a truncation; immediate-
    /// mode lines are stepped over, never stored.
    pub fn from_bytes(bytes: &[u8], vars: VarTable) -> Program {
        let mut program = Program {
            lines: BTreeMap::new(),
            vars,
        };
        let mut pos = 0;
        while pos + HEADER_LEN <= bytes.len() {
            let line_number = u16::from_le_bytes([bytes[pos], bytes[pos + 1]]);
            if line_number == 0 {
                break;
            }
            let total = bytes[pos + 2] as usize;
            if total <= HEADER_LEN || pos + total > bytes.len() {
                break;
            }
            if line_number < IMMEDIATE_LINE {
                program
                    .lines
                    .insert(line_number, bytes[pos..pos + total].to_vec());
            }
            pos += total;
        }
        program
    }

    /// Re-enter every stored line against a fresh variable table. Used
    /// after loads that supply no table of their own.
    pub fn rebuild_vars(&mut self) -> Result<()> {
        let sources: Vec<String> = self
            .list(&LineRange::all(), TextMode::Plain)
            .drain(..)
            .map(|line| line.text)
            .collect();
        let mut rebuilt = Program::new();
        for source in sources {
            rebuilt.enter(&source)?;
        }
        *self = rebuilt;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_and_delete() {
        let mut program = Program::new();
        program.enter("10 PRINT \"HI\"").unwrap();
        program.enter("20 END").unwrap();
        assert_eq!(program.list(&LineRange::all(), TextMode::Plain).len(), 2);
        program.enter("10").unwrap();
        let listing = program.list(&LineRange::all(), TextMode::Plain);
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].text, "20 END");
    }

    #[test]
    fn test_replace_keeps_variable_indices() {
        let mut program = Program::new();
        program.enter("10 X=1").unwrap();
        program.enter("20 Y=2").unwrap();
        program.enter("10 Z=3").unwrap();
        // X stays at index 0 even though no line mentions it now
        assert_eq!(program.vars().len(), 3);
        assert_eq!(program.vars().get(0).unwrap().to_string(), "X");
        assert_eq!(
            program.line(10, TextMode::Plain).unwrap().text,
            "10 Z=3"
        );
    }

    #[test]
    fn test_image_round_trip() {
        let mut program = Program::new();
        program.enter("10 FOR I=1 TO 10").unwrap();
        program.enter("20 PRINT I").unwrap();
        program.enter("30 NEXT I").unwrap();
        let image = program.to_bytes();
        let loaded = Program::from_bytes(&image, program.vars().clone());
        assert_eq!(loaded, program);
    }

    #[test]
    fn test_truncated_image() {
        let mut program = Program::new();
        program.enter("10 PRINT 1").unwrap();
        program.enter("20 PRINT 2").unwrap();
        let image = program.to_bytes();
        let cut = &image[..image.len() - 8];
        let loaded = Program::from_bytes(cut, VarTable::new());
        assert_eq!(loaded.lines.len(), 1);
        assert!(loaded.lines.contains_key(&10));
    }
}
