use std::io;

use thiserror::Error;

/// Conditions that stop the instruction stream.
///
/// A fault leaves the interpreter halted; the only way out is loading a program again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("unknown opcode {opcode:#06X} at {pc:#05X}")]
    UnknownOpcode { opcode: u16, pc: u16 },

    #[error("stack overflow: call at {pc:#05X} exceeds the stack depth")]
    StackOverflow { pc: u16 },

    #[error("stack underflow: return at {pc:#05X} with an empty stack")]
    StackUnderflow { pc: u16 },
}

#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("program is too large ({size} bytes), max size is {max} bytes")]
    CapacityExceeded { size: usize, max: usize },

    #[error("unable to read program")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Fault(#[from] Fault),

    #[error("interpreter halted after: {0}")]
    Halted(Fault),
}

pub type Result<T, E = Chip8Error> = std::result::Result<T, E>;
