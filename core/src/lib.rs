pub use chip8::{Chip8, Step};
pub use constants::CLOCK_SPEED;
pub use display::FrameBuffer;
pub use error::{Chip8Error, Fault, Result};
pub use instruction::Instruction;
pub use keymap::keymap;
pub use quirks::Quirks;

mod chip8;
pub mod constants;
mod display;
mod error;
mod instruction;
pub mod keypad;
mod keymap;
pub mod memory;
mod opcode;
mod operations;
mod quirks;
pub mod stack;
pub mod state;
pub mod timers;
