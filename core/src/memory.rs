use crate::constants::{ADDRESS_MASK, MAX_PROGRAM_SIZE, MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET};
use crate::error::{Chip8Error, Result};

/// # Memory
/// 4096 bytes of flat, byte addressable memory.
///
/// ```text
/// 0x000..0x050  sprite sheet
/// 0x050..0x200  reserved (held the interpreter on real hardware)
/// 0x200..0x1000 program and data
/// ```
///
/// Every address is masked to 12 bits before use so no access can land outside of memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Memory {
    cells: [u8; MEMORY_SIZE],
}

impl Memory {
    /// Zeroed memory with the sprite sheet in place
    pub fn new() -> Self {
        let mut memory = Memory {
            cells: [0; MEMORY_SIZE],
        };
        memory.reset();
        memory
    }

    /// Zeroes every cell and re-seeds the sprite sheet
    pub fn reset(&mut self) {
        self.cells = [0; MEMORY_SIZE];
        self.cells[..SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
    }

    /// Copies a program into memory starting at `PROGRAM_START`.
    ///
    /// Memory is left untouched if the program doesn't fit.
    ///
    /// # Arguments
    /// * `program` raw machine code
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Chip8Error::CapacityExceeded {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.cells[start..start + program.len()].copy_from_slice(program);
        Ok(())
    }

    pub fn read_byte(&self, addr: u16) -> u8 {
        self.cells[(addr & ADDRESS_MASK) as usize]
    }

    pub fn write_byte(&mut self, addr: u16, value: u8) {
        self.cells[(addr & ADDRESS_MASK) as usize] = value;
    }

    /// Reads two subsequent bytes as a big endian word.
    /// The second byte wraps to 0x000 when `addr` is the last cell.
    pub fn read_word(&self, addr: u16) -> u16 {
        let high = u16::from(self.read_byte(addr));
        let low = u16::from(self.read_byte(addr.wrapping_add(1)));
        high << 8 | low
    }

    /// All of memory, e.g. for a debugger's hex view
    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_zeroed_after_sprite_sheet() {
        let memory = Memory::new();
        assert_eq!(memory.cells[..80], SPRITE_SHEET[..]);
        assert!(memory.cells[80..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_reset_clears_program() {
        let mut memory = Memory::new();
        memory.write_byte(0x300, 0xAB);
        memory.write_byte(0x000, 0x00);
        memory.reset();
        assert_eq!(memory, Memory::new());
    }

    #[test]
    fn test_read_write_byte() {
        let mut memory = Memory::new();
        memory.write_byte(0x0244, 12);
        assert_eq!(memory.read_byte(0x0244), 12);
    }

    #[test]
    fn test_addresses_are_masked() {
        let mut memory = Memory::new();
        memory.write_byte(0x1ABC, 0x42);
        assert_eq!(memory.read_byte(0x0ABC), 0x42);
    }

    #[test]
    fn test_read_word_is_big_endian() {
        let mut memory = Memory::new();
        memory.write_byte(0x200, 0xAA);
        memory.write_byte(0x201, 0xBB);
        assert_eq!(memory.read_word(0x200), 0xAABB);
    }

    #[test]
    fn test_read_word_wraps_at_end() {
        let mut memory = Memory::new();
        memory.write_byte(0xFFF, 0x12);
        // 0x000 holds the first byte of the "0" glyph
        assert_eq!(memory.read_word(0xFFF), 0x12F0);
    }

    #[test]
    fn test_load_program() {
        let mut memory = Memory::new();
        memory.load_program(&[0x00, 0xE0]).unwrap();
        assert_eq!(memory.cells[0x200..0x202], [0x00, 0xE0]);
    }

    #[test]
    fn test_load_program_fills_memory() {
        let mut memory = Memory::new();
        memory.load_program(&[0xFF; MAX_PROGRAM_SIZE]).unwrap();
        assert_eq!(memory.read_byte(0xFFF), 0xFF);
    }

    #[test]
    fn test_load_program_too_large() {
        let mut memory = Memory::new();
        let result = memory.load_program(&[0xFF; MAX_PROGRAM_SIZE + 1]);
        assert!(matches!(
            result,
            Err(Chip8Error::CapacityExceeded { size: 3585, max: 3584 })
        ));
        assert_eq!(memory, Memory::new());
    }
}
