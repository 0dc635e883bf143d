//! The compiler/VM contract: instructions plus their constant pool.
//!
//! A [`Bytecode`] can be written to and read back from a compact binary image:
//!
//! ```text
//! ┌──────────┬─────────┬──────────────────────────────┐
//! │  "MNKY"  │ version │ postcard(instructions, pool) │
//! │ 4 bytes  │ 1 byte  │                              │
//! └──────────┴─────────┴──────────────────────────────┘
//! ```
//!
//! The opcode table must be identical on both sides, so the version byte is
//! bumped whenever it changes.

use alloc::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    String, Vec,
    code::Instructions,
    values::{CompiledFunction, Value},
};

const MAGIC: [u8; 4] = *b"MNKY";
pub const FORMAT_VERSION: u8 = 1;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bytecode {
    pub instructions: Instructions,
    pub constants: Vec<Value>,
}

#[derive(Debug, Error)]
pub enum BytecodeError {
    #[error("not a bytecode image")]
    BadHeader,

    #[error("unsupported bytecode version {found} (expected {})", FORMAT_VERSION)]
    UnsupportedVersion { found: u8 },

    #[error("constant {index} of type {type_name} cannot be serialized")]
    UnserializableConstant {
        index: usize,
        type_name: &'static str,
    },

    #[error("encoding error: {0}")]
    Encoding(postcard::Error),
}

/// Serialized form of a constant. Only what a compiler can emit.
#[derive(Serialize, Deserialize)]
enum Constant {
    Integer(i64),
    Str(String),
    Function {
        instructions: Instructions,
        num_locals: u32,
        num_parameters: u32,
    },
}

#[derive(Serialize, Deserialize)]
struct Image {
    instructions: Instructions,
    constants: Vec<Constant>,
}

impl Bytecode {
    pub fn new(instructions: Instructions, constants: Vec<Value>) -> Self {
        Bytecode {
            instructions,
            constants,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, BytecodeError> {
        let constants = self
            .constants
            .iter()
            .enumerate()
            .map(|(index, value)| to_constant(index, value))
            .collect::<Result<Vec<_>, _>>()?;
        let image = Image {
            instructions: self.instructions.clone(),
            constants,
        };

        let mut bytes = Vec::from(MAGIC);
        bytes.push(FORMAT_VERSION);
        let payload = postcard::to_allocvec(&image).map_err(BytecodeError::Encoding)?;
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BytecodeError> {
        let (magic, rest) = bytes
            .split_first_chunk::<4>()
            .ok_or(BytecodeError::BadHeader)?;
        if *magic != MAGIC {
            return Err(BytecodeError::BadHeader);
        }
        let (&version, payload) = rest.split_first().ok_or(BytecodeError::BadHeader)?;
        if version != FORMAT_VERSION {
            return Err(BytecodeError::UnsupportedVersion { found: version });
        }

        let image: Image = postcard::from_bytes(payload).map_err(BytecodeError::Encoding)?;
        Ok(Bytecode {
            instructions: image.instructions,
            constants: image.constants.into_iter().map(from_constant).collect(),
        })
    }
}

fn to_constant(index: usize, value: &Value) -> Result<Constant, BytecodeError> {
    let unserializable = || BytecodeError::UnserializableConstant {
        index,
        type_name: value.type_name(),
    };
    match value {
        Value::Integer(i) => Ok(Constant::Integer(*i)),
        Value::Str(s) => Ok(Constant::Str(s.as_str().into())),
        Value::CompiledFunction(func) => Ok(Constant::Function {
            instructions: func.instructions.clone(),
            num_locals: u32::try_from(func.num_locals).map_err(|_| unserializable())?,
            num_parameters: u32::try_from(func.num_parameters).map_err(|_| unserializable())?,
        }),
        _ => Err(unserializable()),
    }
}

fn from_constant(constant: Constant) -> Value {
    match constant {
        Constant::Integer(i) => Value::Integer(i),
        Constant::Str(s) => Value::string(s.as_str()),
        Constant::Function {
            instructions,
            num_locals,
            num_parameters,
        } => Value::CompiledFunction(Rc::new(CompiledFunction::new(
            instructions,
            num_locals as usize,
            num_parameters as usize,
        ))),
    }
}
