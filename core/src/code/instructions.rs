use core::{fmt, ops::Deref};

use serde::{Deserialize, Serialize};

use crate::code::{CodeError, Definition, Opcode, Operands, lookup, read_operands};
use crate::{String, Vec, format};

/// An immutable buffer of encoded instructions.
///
/// Addresses into the buffer are byte offsets, not instruction indices.
/// `Display` renders the disassembly, one instruction per line.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Instructions(Vec<u8>);

/// One decoded instruction, as yielded by [`Instructions::iter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub offset: usize,
    pub opcode: Opcode,
    pub operands: Operands,
}

impl Decoded {
    /// Byte length of the encoded instruction.
    pub fn encoded_len(&self) -> usize {
        self.opcode.definition().instruction_len()
    }
}

impl Instructions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Append an encoded instruction, returning the offset it starts at.
    pub fn push(&mut self, instruction: &[u8]) -> usize {
        let offset = self.0.len();
        self.0.extend_from_slice(instruction);
        offset
    }

    /// Decode the buffer front to back.
    ///
    /// An undefined opcode yields an error and the scan resumes at the next
    /// byte. A truncated trailing instruction yields an error and ends the scan.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            bytes: &self.0,
            offset: 0,
        }
    }
}

impl Deref for Instructions {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Instructions {
    fn from(bytes: Vec<u8>) -> Self {
        Instructions(bytes)
    }
}

impl FromIterator<Vec<u8>> for Instructions {
    fn from_iter<I: IntoIterator<Item = Vec<u8>>>(iter: I) -> Self {
        Instructions(iter.into_iter().flatten().collect())
    }
}

impl<'a> IntoIterator for &'a Instructions {
    type Item = Result<Decoded, CodeError>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

pub struct Iter<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl Iterator for Iter<'_> {
    type Item = Result<Decoded, CodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.offset;
        let byte = *self.bytes.get(offset)?;

        let def = match lookup(byte) {
            Ok(def) => def,
            Err(err) => {
                self.offset += 1;
                return Some(Err(err));
            }
        };

        match read_operands(def, &self.bytes[offset + 1..]) {
            Ok((operands, read)) => {
                self.offset += 1 + read;
                Some(Ok(Decoded {
                    offset,
                    opcode: def.opcode,
                    operands,
                }))
            }
            Err(err) => {
                self.offset = self.bytes.len();
                Some(Err(err))
            }
        }
    }
}

impl core::iter::FusedIterator for Iter<'_> {}

fn fmt_instruction(def: &Definition, operands: &[usize]) -> String {
    let operand_count = def.operand_widths.len();
    if operands.len() != operand_count {
        let err = CodeError::OperandArityMismatch {
            opcode: def.opcode,
            expected: operand_count,
            got: operands.len(),
        };
        return format!("ERROR: {}", err);
    }

    let mut out = String::from(def.name);
    for operand in operands {
        out.push_str(&format!(" {}", operand));
    }
    out
}

impl fmt::Display for Instructions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for decoded in self.iter() {
            match decoded {
                Ok(ins) => writeln!(
                    f,
                    "{:04} {}",
                    ins.offset,
                    fmt_instruction(ins.opcode.definition(), &ins.operands)
                )?,
                Err(err) => writeln!(f, "ERROR: {}", err)?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Instructions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Instructions {{")?;
        for line in format!("{}", self).lines() {
            writeln!(f, "    {}", line)?;
        }
        write!(f, "}}")
    }
}
