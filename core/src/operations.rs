use rand::{Rng, RngCore};

use crate::constants::{ADDRESS_MASK, FLAG, GLYPH_SIZE};
use crate::error::Fault;
use crate::instruction::Instruction;
use crate::keypad::Keypad;
use crate::quirks::Quirks;
use crate::state::State;

/// Everything an instruction may consult besides the machine state
pub struct Context<'a> {
    pub keypad: &'a Keypad,
    pub rng: &'a mut dyn RngCore,
    pub quirks: Quirks,
}

/// Executes a decoded instruction against `state`, producing the next state.
pub fn execute(
    instruction: Instruction,
    state: &State,
    ctx: &mut Context<'_>,
) -> Result<State, Fault> {
    use Instruction::*;
    let next = match instruction {
        Cls => clr(state),
        Rts => rts(state)?,
        Jump { addr } => jump(state, addr),
        Call { addr } => call(state, addr)?,
        Ske { x, nn } => skip_if(state, state.v[x as usize] == nn),
        Skne { x, nn } => skip_if(state, state.v[x as usize] != nn),
        Skre { x, y } => skip_if(state, state.v[x as usize] == state.v[y as usize]),
        Load { x, nn } => load(state, x, nn),
        Add { x, nn } => add(state, x, nn),
        Move { x, y } => alu(state, x, y, |_, vy| vy),
        Or { x, y } => alu(state, x, y, |vx, vy| vx | vy),
        And { x, y } => alu(state, x, y, |vx, vy| vx & vy),
        Xor { x, y } => alu(state, x, y, |vx, vy| vx ^ vy),
        AddReg { x, y } => addr(state, x, y),
        Sub { x, y } => sub(state, x, y),
        Shr { x, y } => shr(state, x, y, ctx.quirks),
        Subn { x, y } => subn(state, x, y),
        Shl { x, y } => shl(state, x, y, ctx.quirks),
        Skrne { x, y } => skip_if(state, state.v[x as usize] != state.v[y as usize]),
        LoadI { addr } => loadi(state, addr),
        JumpV0 { addr } => jumpi(state, addr),
        Rand { x, nn } => rand(state, x, nn, &mut *ctx.rng),
        Draw { x, y, n } => draw(state, x, y, n),
        Skpr { x } => skip_if(state, ctx.keypad.is_pressed(state.v[x as usize])),
        Skup { x } => skip_if(state, !ctx.keypad.is_pressed(state.v[x as usize])),
        MoveDelay { x } => load(state, x, state.timers.delay),
        WaitKey { x } => keyd(state, x, ctx.keypad),
        LoadDelay { x } => loads(state, x),
        LoadSound { x } => ld(state, x),
        AddI { x } => addi(state, x),
        LoadSprite { x } => ldspr(state, x),
        Bcd { x } => bcd(state, x),
        Store { x } => stor(state, x, ctx.quirks),
        Read { x } => read(state, x, ctx.quirks),
    };
    Ok(next)
}

/// The pc `offset` bytes past the current one, kept within the address space
fn advance(state: &State, offset: u16) -> u16 {
    state.pc.wrapping_add(offset) & ADDRESS_MASK
}

/// clear
fn clr(state: &State) -> State {
    let mut frame_buffer = state.frame_buffer;
    frame_buffer.clear();
    State {
        pc: advance(state, 0x2),
        frame_buffer,
        draw_flag: true,
        ..*state
    }
}

/// PC = STACK.pop() + 2
fn rts(state: &State) -> Result<State, Fault> {
    let mut stack = state.stack;
    let addr = stack
        .pop()
        .ok_or(Fault::StackUnderflow { pc: state.pc })?;
    Ok(State {
        pc: (addr + 0x2) & ADDRESS_MASK,
        stack,
        ..*state
    })
}

/// PC = addr
fn jump(state: &State, addr: u16) -> State {
    State {
        pc: addr & ADDRESS_MASK,
        ..*state
    }
}

/// STACK.push(PC); PC = addr
fn call(state: &State, addr: u16) -> Result<State, Fault> {
    let mut stack = state.stack;
    stack
        .push(state.pc)
        .ok_or(Fault::StackOverflow { pc: state.pc })?;
    Ok(State {
        pc: addr & ADDRESS_MASK,
        stack,
        ..*state
    })
}

/// if condition then pc += 4 else pc += 2
fn skip_if(state: &State, condition: bool) -> State {
    let pc = if condition {
        advance(state, 0x4)
    } else {
        advance(state, 0x2)
    };
    State { pc, ..*state }
}

/// Vx = nn
fn load(state: &State, x: u8, nn: u8) -> State {
    let mut v = state.v;
    v[x as usize] = nn;
    State {
        pc: advance(state, 0x2),
        v,
        ..*state
    }
}

/// Vx += nn
/// Wraps on overflow without touching VF
fn add(state: &State, x: u8, nn: u8) -> State {
    let mut v = state.v;
    v[x as usize] = v[x as usize].wrapping_add(nn);
    State {
        pc: advance(state, 0x2),
        v,
        ..*state
    }
}

/// Vx = f(Vx, Vy)
fn alu(state: &State, x: u8, y: u8, f: impl Fn(u8, u8) -> u8) -> State {
    let mut v = state.v;
    v[x as usize] = f(v[x as usize], v[y as usize]);
    State {
        pc: advance(state, 0x2),
        v,
        ..*state
    }
}

/// Vx = result; VF = flag
/// VF is written last so it wins when x is F
fn with_flag(state: &State, x: u8, result: u8, flag: bool) -> State {
    let mut v = state.v;
    v[x as usize] = result;
    v[FLAG] = flag as u8;
    State {
        pc: advance(state, 0x2),
        v,
        ..*state
    }
}

/// Vx += Vy; VF = overflow
fn addr(state: &State, x: u8, y: u8) -> State {
    let (res, over) = state.v[x as usize].overflowing_add(state.v[y as usize]);
    with_flag(state, x, res, over)
}

/// Vx -= Vy; VF = !underflow
fn sub(state: &State, x: u8, y: u8) -> State {
    let (res, under) = state.v[x as usize].overflowing_sub(state.v[y as usize]);
    with_flag(state, x, res, !under)
}

/// Vx = Vy - Vx; VF = !underflow
fn subn(state: &State, x: u8, y: u8) -> State {
    let (res, under) = state.v[y as usize].overflowing_sub(state.v[x as usize]);
    with_flag(state, x, res, !under)
}

/// Vx >>= 1; VF = shifted out bit
fn shr(state: &State, x: u8, y: u8, quirks: Quirks) -> State {
    let src = if quirks.shift_uses_vy { y } else { x };
    let value = state.v[src as usize];
    with_flag(state, x, value >> 1, value & 0x1 == 1)
}

/// Vx <<= 1; VF = shifted out bit
fn shl(state: &State, x: u8, y: u8, quirks: Quirks) -> State {
    let src = if quirks.shift_uses_vy { y } else { x };
    let value = state.v[src as usize];
    with_flag(state, x, value << 1, value >> 7 == 1)
}

/// I = addr
fn loadi(state: &State, addr: u16) -> State {
    State {
        pc: advance(state, 0x2),
        i: addr,
        ..*state
    }
}

/// PC = V0 + addr
fn jumpi(state: &State, addr: u16) -> State {
    jump(state, u16::from(state.v[0x0]) + addr)
}

/// Vx = rand_byte & nn
fn rand<R: RngCore + ?Sized>(state: &State, x: u8, nn: u8, rng: &mut R) -> State {
    let rand_byte: u8 = rng.gen();
    load(state, x, rand_byte & nn)
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer.
/// Sets VF if any pixels were erased
fn draw(state: &State, x: u8, y: u8, n: u8) -> State {
    let mut sprite = [0; 0xF];
    let rows = n as usize;
    for (row, byte) in sprite.iter_mut().enumerate().take(rows) {
        *byte = state.memory.read_byte(state.i.wrapping_add(row as u16));
    }

    let mut frame_buffer = state.frame_buffer;
    let collision =
        frame_buffer.draw_sprite(state.v[x as usize], state.v[y as usize], &sprite[..rows]);

    let mut v = state.v;
    v[FLAG] = collision as u8;
    State {
        pc: advance(state, 0x2),
        draw_flag: true,
        v,
        frame_buffer,
        ..*state
    }
}

/// await keypress for Vx
/// Leaves the state as is (pc included) until some key is held; the lowest held key wins
fn keyd(state: &State, x: u8, keypad: &Keypad) -> State {
    match keypad.first_pressed() {
        Some(key) => load(state, x, key),
        None => *state,
    }
}

/// DT = Vx
fn loads(state: &State, x: u8) -> State {
    let mut timers = state.timers;
    timers.delay = state.v[x as usize];
    State {
        pc: advance(state, 0x2),
        timers,
        ..*state
    }
}

/// ST = Vx
fn ld(state: &State, x: u8) -> State {
    let mut timers = state.timers;
    timers.sound = state.v[x as usize];
    State {
        pc: advance(state, 0x2),
        timers,
        ..*state
    }
}

/// I += Vx; VF = I overflowed the address space
fn addi(state: &State, x: u8) -> State {
    let i = state.i.wrapping_add(u16::from(state.v[x as usize]));
    let mut v = state.v;
    v[FLAG] = (u32::from(state.i) + u32::from(state.v[x as usize]) > 0xFFF) as u8;
    State {
        pc: advance(state, 0x2),
        i,
        v,
        ..*state
    }
}

/// I = Vx * 5
/// Set I to the memory address of the sprite for Vx
/// See constants::SPRITE_SHEET for more details
fn ldspr(state: &State, x: u8) -> State {
    State {
        pc: advance(state, 0x2),
        i: u16::from(state.v[x as usize]) * GLYPH_SIZE,
        ..*state
    }
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
fn bcd(state: &State, x: u8) -> State {
    let vx = state.v[x as usize];
    let mut memory = state.memory;
    for (offset, digit) in [vx / 100, vx / 10 % 10, vx % 10].iter().enumerate() {
        memory.write_byte(state.i.wrapping_add(offset as u16), *digit);
    }
    State {
        pc: advance(state, 0x2),
        memory,
        ..*state
    }
}

/// The value of I after transferring V0..=Vx
fn index_after_transfer(state: &State, x: u8, quirks: Quirks) -> u16 {
    if quirks.load_store_increments_i {
        state.i.wrapping_add(u16::from(x) + 1)
    } else {
        state.i
    }
}

/// mem[I..=I+x] = V0..=Vx
fn stor(state: &State, x: u8, quirks: Quirks) -> State {
    let mut memory = state.memory;
    for (offset, value) in state.v.iter().enumerate().take(x as usize + 1) {
        memory.write_byte(state.i.wrapping_add(offset as u16), *value);
    }
    State {
        pc: advance(state, 0x2),
        i: index_after_transfer(state, x, quirks),
        memory,
        ..*state
    }
}

/// V0..=Vx = mem[I..=I+x]
fn read(state: &State, x: u8, quirks: Quirks) -> State {
    let mut v = state.v;
    for (offset, register) in v.iter_mut().enumerate().take(x as usize + 1) {
        *register = state.memory.read_byte(state.i.wrapping_add(offset as u16));
    }
    State {
        pc: advance(state, 0x2),
        i: index_after_transfer(state, x, quirks),
        v,
        ..*state
    }
}
