use crate::constants::PROGRAM_START;
use crate::display::FrameBuffer;
use crate::memory::Memory;
use crate::stack::CallStack;
use crate::timers::Timers;

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the flag register, overwritten by arithmetic, shifts and draws
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter, always kept within the 12-bit address space
///
/// Timers
/// - 2 8-bit timers (delay & sound), decremented once per cycle
///
/// ## Memory
/// - a 16 slot call stack
/// - 4096 bytes of addressable memory
/// - 64x32 frame buffer
///     - `draw_flag` is raised whenever its contents change
///
/// Instructions never mutate a State in place; they produce the next one, so a
/// failing instruction leaves the previous state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub stack: CallStack,
    pub timers: Timers,
    pub memory: Memory,
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
}

impl State {
    pub fn new() -> Self {
        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            stack: CallStack::new(),
            timers: Timers::new(),
            memory: Memory::new(),
            frame_buffer: FrameBuffer::new(),
            draw_flag: false,
        }
    }

    /// Gets the opcode currently pointed at by the pc.
    pub fn current_op(&self) -> u16 {
        self.memory.read_word(self.pc)
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
