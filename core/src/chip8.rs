use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::MAX_PROGRAM_SIZE;
use crate::display::FrameBuffer;
use crate::error::{Chip8Error, Fault, Result};
use crate::instruction::Instruction;
use crate::keypad::Keypad;
use crate::operations::{execute, Context};
use crate::quirks::Quirks;
use crate::state::State;

/// What a single step changed that a driver may want to react to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Step {
    /// The frame buffer was cleared or drawn to
    pub display_changed: bool,
    /// The sound timer just ran out
    pub tone_stopped: bool,
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `pressed_keys` with public interfaces for manipulating them
///  - the random source used by `CXNN`
///  - the fault that halted it, if any
///
/// Supplies interfaces for:
/// - loading programs
/// - pressing and releasing keys
/// - advancing the CPU and its timers one cycle at a time
/// - inspecting its frame buffer for rendering by some display
///
/// Pacing is left to the caller; `step` never blocks or sleeps.
pub struct Chip8 {
    state: State,
    pressed_keys: Keypad,
    quirks: Quirks,
    rng: StdRng,
    halted: Option<Fault>,
}

impl Chip8 {
    pub fn new() -> Self {
        Chip8 {
            state: State::new(),
            pressed_keys: Keypad::new(),
            quirks: Quirks::default(),
            rng: StdRng::from_entropy(),
            halted: None,
        }
    }

    /// Uses a fixed seed for `CXNN` so runs are reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    /// Restores the power-on state: zeroed memory and registers, sprite sheet in place,
    /// pc at the start of the program area and no pressed keys.
    pub fn reset(&mut self) {
        self.state = State::new();
        self.pressed_keys.release_all();
        self.halted = None;
    }

    /// Resets the machine and loads a program.
    ///
    /// If the program doesn't fit the machine is left freshly reset.
    ///
    /// # Arguments
    /// * `program` raw machine code, loaded at 0x200
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        self.reset();
        self.state.memory.load_program(program)?;
        debug!("loaded {} byte program", program.len());
        Ok(())
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a file reader that contains a ROM
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<()> {
        self.reset();
        self.read_program(reader)
    }

    /// Load a rom from the filesystem
    pub fn load_rom_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        debug!("loading rom from {}", path.display());
        self.reset();
        let mut file = File::open(path)?;
        self.read_program(&mut file)
    }

    /// Reads at most one byte past the program area so oversized sources are
    /// rejected without being drained.
    fn read_program(&mut self, reader: &mut dyn Read) -> Result<()> {
        let mut program = Vec::with_capacity(MAX_PROGRAM_SIZE);
        reader
            .take(MAX_PROGRAM_SIZE as u64 + 1)
            .read_to_end(&mut program)?;
        self.state.memory.load_program(&program)?;
        debug!("loaded {} byte program", program.len());
        Ok(())
    }

    /// Returns the FrameBuffer if it changed since it was last taken, and marks it as seen.
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn keypad(&self) -> &Keypad {
        &self.pressed_keys
    }

    /// Whether a tone should currently be playing
    pub fn sound_active(&self) -> bool {
        self.state.timers.sound_active()
    }

    /// The fault that stopped the interpreter, if any
    pub fn halted(&self) -> Option<Fault> {
        self.halted
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) {
        self.pressed_keys.press(key);
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) {
        self.pressed_keys.release(key);
    }

    /// Advances the CPU by a single cycle
    /// - gets, decodes and executes the opcode at the pc
    /// - decrements the timers
    ///
    /// Unknown opcodes and stack misuse halt the interpreter: the faulting step leaves the
    /// state untouched and every later step fails with `Chip8Error::Halted`.
    pub fn step(&mut self) -> Result<Step> {
        if let Some(fault) = self.halted {
            return Err(Chip8Error::Halted(fault));
        }

        match self.execute_next() {
            Ok((instruction, next)) => {
                let display_changed =
                    matches!(instruction, Instruction::Cls | Instruction::Draw { .. });
                self.state = next;
                let tone_stopped = self.state.timers.tick();
                if tone_stopped {
                    debug!("sound timer expired");
                }
                Ok(Step {
                    display_changed,
                    tone_stopped,
                })
            }
            Err(fault) => {
                warn!("halting: {}", fault);
                self.halted = Some(fault);
                Err(fault.into())
            }
        }
    }

    fn execute_next(&mut self) -> Result<(Instruction, State), Fault> {
        let op = self.state.current_op();
        let pc = self.state.pc;
        let instruction =
            Instruction::decode(op).ok_or(Fault::UnknownOpcode { opcode: op, pc })?;
        trace!(
            "{:03X}: {:04X} {:<16} v{:02X?} i{:04X}",
            pc,
            op,
            instruction.to_string(),
            self.state.v,
            self.state.i
        );

        let mut ctx = Context {
            keypad: &self.pressed_keys,
            rng: &mut self.rng,
            quirks: self.quirks,
        };
        let next = execute(instruction, &self.state, &mut ctx)?;
        Ok((instruction, next))
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chip8_with(program: &[u8]) -> Chip8 {
        let mut chip8 = Chip8::new().with_seed(0);
        chip8.load_program(program).unwrap();
        chip8
    }

    #[test]
    fn test_chip8_gets_op() {
        let chip8 = chip8_with(&[0xAA, 0xBB]);
        assert_eq!(chip8.state.current_op(), 0xAABB);
    }

    #[test]
    fn test_step_advances_pc() {
        let mut chip8 = chip8_with(&[0x00, 0xE0]);
        let starting_pc = chip8.state.pc;
        let step = chip8.step().unwrap();
        assert_eq!(chip8.state.pc, starting_pc + 0x2);
        assert!(step.display_changed);
    }

    #[test]
    fn test_take_frame_clears_draw_flag() {
        let mut chip8 = chip8_with(&[0x00, 0xE0, 0x60, 0x01]);
        assert!(chip8.take_frame().is_none());
        chip8.step().unwrap();
        assert!(chip8.take_frame().is_some());
        assert!(chip8.take_frame().is_none());
        let step = chip8.step().unwrap();
        assert!(!step.display_changed);
        assert!(chip8.take_frame().is_none());
    }

    #[test]
    fn test_doesnt_advance_while_waiting_for_key() {
        // LD V1, K
        let mut chip8 = chip8_with(&[0xF1, 0x0A]);
        chip8.step().unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.state.pc, 0x200);

        chip8.key_press(0xE);
        chip8.step().unwrap();
        assert_eq!(chip8.state.v[0x1], 0xE);
        assert_eq!(chip8.state.pc, 0x202);
    }

    #[test]
    fn test_timers_tick_once_per_step() {
        // LD V0, 3; LD DT, V0; LD ST, V0; then spin on JP 0x206
        let mut chip8 = chip8_with(&[0x60, 0x03, 0xF0, 0x15, 0xF0, 0x18, 0x12, 0x06]);
        chip8.step().unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.state.timers.delay, 2);
        chip8.step().unwrap();
        assert_eq!(chip8.state.timers.delay, 1);
        assert_eq!(chip8.state.timers.sound, 2);
        assert!(chip8.sound_active());

        assert!(!chip8.step().unwrap().tone_stopped);
        assert_eq!(chip8.state.timers.delay, 0);
        assert!(chip8.step().unwrap().tone_stopped);
        assert!(!chip8.sound_active());
        assert!(!chip8.step().unwrap().tone_stopped);
        assert_eq!(chip8.state.timers.delay, 0);
    }

    #[test]
    fn test_unknown_opcode_halts() {
        let mut chip8 = chip8_with(&[0x60, 0x01, 0xFF, 0xFF]);
        chip8.step().unwrap();
        let before = chip8.state;

        let err = chip8.step().unwrap_err();
        assert!(matches!(
            err,
            Chip8Error::Fault(Fault::UnknownOpcode {
                opcode: 0xFFFF,
                pc: 0x202
            })
        ));
        assert_eq!(chip8.state, before);
        assert!(matches!(chip8.step(), Err(Chip8Error::Halted(_))));
        assert!(chip8.halted().is_some());
    }

    #[test]
    fn test_loading_clears_halt() {
        let mut chip8 = chip8_with(&[0x00, 0xEE]);
        assert!(chip8.step().is_err());
        chip8.load_program(&[0x00, 0xE0]).unwrap();
        assert!(chip8.halted().is_none());
        assert!(chip8.step().is_ok());
    }

    #[test]
    fn test_load_resets_state() {
        let mut chip8 = chip8_with(&[0x60, 0x42]);
        chip8.step().unwrap();
        chip8.key_press(0x1);
        chip8.load_program(&[0x00, 0xE0]).unwrap();
        assert_eq!(chip8.state.v[0x0], 0x0);
        assert_eq!(chip8.state.pc, 0x200);
        assert_eq!(chip8.keypad().first_pressed(), None);
    }

    #[test]
    fn test_load_rom_from_reader() {
        let mut chip8 = Chip8::new();
        let mut rom: &[u8] = &[0x00, 0xE0];
        chip8.load_rom(&mut rom).unwrap();
        assert_eq!(chip8.state.current_op(), 0x00E0);
    }

    #[test]
    fn test_load_rom_too_large_stays_reset() {
        let mut chip8 = chip8_with(&[0x12, 0x34]);
        let big = vec![0xAA; MAX_PROGRAM_SIZE + 1];
        let err = chip8.load_rom(&mut big.as_slice()).unwrap_err();
        assert!(matches!(err, Chip8Error::CapacityExceeded { .. }));
        assert_eq!(chip8.state, State::new());
    }

    /// Serves `remaining` bytes of 0x12 and counts what was handed out
    struct EndlessRom {
        remaining: usize,
        served: usize,
    }

    impl Read for EndlessRom {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = buf.len().min(self.remaining);
            buf[..n].iter_mut().for_each(|b| *b = 0x12);
            self.remaining -= n;
            self.served += n;
            Ok(n)
        }
    }

    #[test]
    fn test_load_rom_stops_reading_past_capacity() {
        let mut chip8 = chip8_with(&[0x12, 0x34]);
        let mut rom = EndlessRom {
            remaining: 64 * 1024 * 1024,
            served: 0,
        };
        let err = chip8.load_rom(&mut rom).unwrap_err();
        assert!(matches!(
            err,
            Chip8Error::CapacityExceeded {
                size: 3585,
                max: 3584
            }
        ));
        assert!(rom.served <= MAX_PROGRAM_SIZE + 1);
        assert_eq!(chip8.state, State::new());
    }

    struct BrokenRom;

    impl Read for BrokenRom {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "bad sector"))
        }
    }

    #[test]
    fn test_load_rom_read_error_stays_reset() {
        let mut chip8 = chip8_with(&[0x60, 0x42]);
        chip8.step().unwrap();
        chip8.key_press(0x3);
        let err = chip8.load_rom(&mut BrokenRom).unwrap_err();
        assert!(matches!(err, Chip8Error::Io(_)));
        assert_eq!(chip8.state, State::new());
        assert_eq!(chip8.keypad().first_pressed(), None);
    }

    #[test]
    fn test_timers_tick_while_waiting_for_key() {
        // LD V0, 5; LD DT, V0; LD V1, K
        let mut chip8 = chip8_with(&[0x60, 0x05, 0xF0, 0x15, 0xF1, 0x0A]);
        chip8.step().unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.state.timers.delay, 4);
        assert_eq!(chip8.state.pc, 0x204);

        for expected in (0..4).rev() {
            chip8.step().unwrap();
            assert_eq!(chip8.state.timers.delay, expected);
            assert_eq!(chip8.state.pc, 0x204);
        }
    }

    #[test]
    fn test_load_missing_file() {
        let mut chip8 = Chip8::new();
        let err = chip8
            .load_rom_file("this/rom/does/not/exist.ch8")
            .unwrap_err();
        assert!(matches!(err, Chip8Error::Io(_)));
    }

    #[test]
    fn test_seeded_rand_is_reproducible() {
        let program = [0xC0, 0xFF, 0xC1, 0xFF];
        let mut a = chip8_with(&program);
        let mut b = chip8_with(&program);
        for _ in 0..2 {
            a.step().unwrap();
            b.step().unwrap();
        }
        assert_eq!(a.state.v, b.state.v);
    }
}
