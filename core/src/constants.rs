/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 4096;

/// Addresses are 12 bits wide
pub const ADDRESS_MASK: u16 = 0x0FFF;

/// Where programs are loaded and where execution starts
pub const PROGRAM_START: u16 = 0x200;

/// The largest program that fits between `PROGRAM_START` and the end of memory
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

pub const STACK_DEPTH: usize = 16;

/// Index of the flag register VF
pub const FLAG: usize = 0xF;

/// Nanoseconds per CPU cycle, roughly 500Hz
pub const CLOCK_SPEED: u64 = 2_000_000;

/// Every glyph in the sprite sheet is 5 bytes tall
pub const GLYPH_SIZE: u16 = 5;

/// # Sprite sheet
/// The hexadecimal digits 0..F, each drawn as a 4x5 sprite.
/// Lives at the very start of memory in the region that used to hold the interpreter.
///
/// ```text
/// 0xF0 1111 ....
/// 0x90 1..1 ....
/// 0x90 1..1 ....
/// 0x90 1..1 ....
/// 0xF0 1111 ....
/// ```
#[rustfmt::skip]
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
