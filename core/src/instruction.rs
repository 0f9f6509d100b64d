use std::fmt;

use crate::opcode::Opcode;

/// A decoded instruction with its operands.
///
/// `x` and `y` are register indices, `nn` a byte, `addr` a 12-bit address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    Cls,
    /// 00EE
    Rts,
    /// 1NNN
    Jump { addr: u16 },
    /// 2NNN
    Call { addr: u16 },
    /// 3XNN
    Ske { x: u8, nn: u8 },
    /// 4XNN
    Skne { x: u8, nn: u8 },
    /// 5XY0
    Skre { x: u8, y: u8 },
    /// 6XNN
    Load { x: u8, nn: u8 },
    /// 7XNN
    Add { x: u8, nn: u8 },
    /// 8XY0
    Move { x: u8, y: u8 },
    /// 8XY1
    Or { x: u8, y: u8 },
    /// 8XY2
    And { x: u8, y: u8 },
    /// 8XY3
    Xor { x: u8, y: u8 },
    /// 8XY4
    AddReg { x: u8, y: u8 },
    /// 8XY5
    Sub { x: u8, y: u8 },
    /// 8XY6
    Shr { x: u8, y: u8 },
    /// 8XY7
    Subn { x: u8, y: u8 },
    /// 8XYE
    Shl { x: u8, y: u8 },
    /// 9XY0
    Skrne { x: u8, y: u8 },
    /// ANNN
    LoadI { addr: u16 },
    /// BNNN
    JumpV0 { addr: u16 },
    /// CXNN
    Rand { x: u8, nn: u8 },
    /// DXYN
    Draw { x: u8, y: u8, n: u8 },
    /// EX9E
    Skpr { x: u8 },
    /// EXA1
    Skup { x: u8 },
    /// FX07
    MoveDelay { x: u8 },
    /// FX0A
    WaitKey { x: u8 },
    /// FX15
    LoadDelay { x: u8 },
    /// FX18
    LoadSound { x: u8 },
    /// FX1E
    AddI { x: u8 },
    /// FX29
    LoadSprite { x: u8 },
    /// FX33
    Bcd { x: u8 },
    /// FX55
    Store { x: u8 },
    /// FX65
    Read { x: u8 },
}

impl Instruction {
    /// Selects the Instruction for a given Opcode.
    /// Returns `None` for words that aren't part of the instruction set.
    pub fn decode(op: u16) -> Option<Self> {
        let (x, y, n, nn, addr) = (op.x(), op.y(), op.n(), op.nn(), op.nnn());
        let instruction = match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Instruction::Cls,
            (0x0, 0x0, 0xE, 0xE) => Instruction::Rts,
            (0x1, ..) => Instruction::Jump { addr },
            (0x2, ..) => Instruction::Call { addr },
            (0x3, ..) => Instruction::Ske { x, nn },
            (0x4, ..) => Instruction::Skne { x, nn },
            (0x5, .., 0x0) => Instruction::Skre { x, y },
            (0x6, ..) => Instruction::Load { x, nn },
            (0x7, ..) => Instruction::Add { x, nn },
            (0x8, .., 0x0) => Instruction::Move { x, y },
            (0x8, .., 0x1) => Instruction::Or { x, y },
            (0x8, .., 0x2) => Instruction::And { x, y },
            (0x8, .., 0x3) => Instruction::Xor { x, y },
            (0x8, .., 0x4) => Instruction::AddReg { x, y },
            (0x8, .., 0x5) => Instruction::Sub { x, y },
            (0x8, .., 0x6) => Instruction::Shr { x, y },
            (0x8, .., 0x7) => Instruction::Subn { x, y },
            (0x8, .., 0xE) => Instruction::Shl { x, y },
            (0x9, .., 0x0) => Instruction::Skrne { x, y },
            (0xA, ..) => Instruction::LoadI { addr },
            (0xB, ..) => Instruction::JumpV0 { addr },
            (0xC, ..) => Instruction::Rand { x, nn },
            (0xD, ..) => Instruction::Draw { x, y, n },
            (0xE, .., 0x9, 0xE) => Instruction::Skpr { x },
            (0xE, .., 0xA, 0x1) => Instruction::Skup { x },
            (0xF, .., 0x0, 0x7) => Instruction::MoveDelay { x },
            (0xF, .., 0x0, 0xA) => Instruction::WaitKey { x },
            (0xF, .., 0x1, 0x5) => Instruction::LoadDelay { x },
            (0xF, .., 0x1, 0x8) => Instruction::LoadSound { x },
            (0xF, .., 0x1, 0xE) => Instruction::AddI { x },
            (0xF, .., 0x2, 0x9) => Instruction::LoadSprite { x },
            (0xF, .., 0x3, 0x3) => Instruction::Bcd { x },
            (0xF, .., 0x5, 0x5) => Instruction::Store { x },
            (0xF, .., 0x6, 0x5) => Instruction::Read { x },
            _ => return None,
        };
        Some(instruction)
    }
}

/// Conventional assembler mnemonics
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match *self {
            Cls => write!(f, "CLS"),
            Rts => write!(f, "RET"),
            Jump { addr } => write!(f, "JP {:#05X}", addr),
            Call { addr } => write!(f, "CALL {:#05X}", addr),
            Ske { x, nn } => write!(f, "SE V{:X}, {:#04X}", x, nn),
            Skne { x, nn } => write!(f, "SNE V{:X}, {:#04X}", x, nn),
            Skre { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Load { x, nn } => write!(f, "LD V{:X}, {:#04X}", x, nn),
            Add { x, nn } => write!(f, "ADD V{:X}, {:#04X}", x, nn),
            Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Shr { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            Subn { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Shl { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            Skrne { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadI { addr } => write!(f, "LD I, {:#05X}", addr),
            JumpV0 { addr } => write!(f, "JP V0, {:#05X}", addr),
            Rand { x, nn } => write!(f, "RND V{:X}, {:#04X}", x, nn),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            Skpr { x } => write!(f, "SKP V{:X}", x),
            Skup { x } => write!(f, "SKNP V{:X}", x),
            MoveDelay { x } => write!(f, "LD V{:X}, DT", x),
            WaitKey { x } => write!(f, "LD V{:X}, K", x),
            LoadDelay { x } => write!(f, "LD DT, V{:X}", x),
            LoadSound { x } => write!(f, "LD ST, V{:X}", x),
            AddI { x } => write!(f, "ADD I, V{:X}", x),
            LoadSprite { x } => write!(f, "LD F, V{:X}", x),
            Bcd { x } => write!(f, "LD B, V{:X}", x),
            Store { x } => write!(f, "LD [I], V{:X}", x),
            Read { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

#[cfg(test)]
mod test_instruction {
    use super::*;

    #[test]
    fn test_decodes_fixed_opcodes() {
        assert_eq!(Instruction::decode(0x00E0), Some(Instruction::Cls));
        assert_eq!(Instruction::decode(0x00EE), Some(Instruction::Rts));
    }

    #[test]
    fn test_decodes_addresses() {
        assert_eq!(
            Instruction::decode(0x1ABC),
            Some(Instruction::Jump { addr: 0xABC })
        );
        assert_eq!(
            Instruction::decode(0x2123),
            Some(Instruction::Call { addr: 0x123 })
        );
        assert_eq!(
            Instruction::decode(0xB300),
            Some(Instruction::JumpV0 { addr: 0x300 })
        );
    }

    #[test]
    fn test_decodes_register_operands() {
        assert_eq!(
            Instruction::decode(0x8125),
            Some(Instruction::Sub { x: 0x1, y: 0x2 })
        );
        assert_eq!(
            Instruction::decode(0xD01F),
            Some(Instruction::Draw {
                x: 0x0,
                y: 0x1,
                n: 0xF
            })
        );
        assert_eq!(
            Instruction::decode(0xFA65),
            Some(Instruction::Read { x: 0xA })
        );
    }

    #[test]
    fn test_decodes_every_family() {
        let ops = [
            0x00E0, 0x00EE, 0x1000, 0x2000, 0x3000, 0x4000, 0x5000, 0x6000, 0x7000, 0x8000,
            0x8001, 0x8002, 0x8003, 0x8004, 0x8005, 0x8006, 0x8007, 0x800E, 0x9000, 0xA000,
            0xB000, 0xC000, 0xD000, 0xE09E, 0xE0A1, 0xF007, 0xF00A, 0xF015, 0xF018, 0xF01E,
            0xF029, 0xF033, 0xF055, 0xF065,
        ];
        let mut decoded: Vec<Instruction> = ops
            .iter()
            .map(|&op| Instruction::decode(op).unwrap())
            .collect();
        decoded.dedup();
        assert_eq!(decoded.len(), ops.len());
    }

    #[test]
    fn test_rejects_unknown_opcodes() {
        for &op in &[
            0x0000, 0x00E1, 0x0123, 0x5121, 0x8008, 0x800F, 0x9121, 0xE000, 0xE19F, 0xF000,
            0xF156, 0xFFFF,
        ] {
            assert_eq!(Instruction::decode(op), None, "{:04X}", op);
        }
    }

    #[test]
    fn test_disassembles() {
        let text = |op: u16| Instruction::decode(op).unwrap().to_string();
        assert_eq!(text(0x00E0), "CLS");
        assert_eq!(text(0x1ABC), "JP 0xABC");
        assert_eq!(text(0x6A2F), "LD VA, 0x2F");
        assert_eq!(text(0x8124), "ADD V1, V2");
        assert_eq!(text(0xD125), "DRW V1, V2, 5");
        assert_eq!(text(0xF355), "LD [I], V3");
    }
}
