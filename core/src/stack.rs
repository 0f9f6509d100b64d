use crate::constants::STACK_DEPTH;

/// # Call stack
/// Return addresses for subroutine calls.
///
/// `sp` is the number of occupied slots, so it always points at the next free one:
/// - push writes at `sp` then increments it
/// - pop decrements `sp` then reads
///
/// Both return `None` rather than leaving the stack's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallStack {
    slots: [u16; STACK_DEPTH],
    sp: u8,
}

impl CallStack {
    pub fn new() -> Self {
        CallStack {
            slots: [0; STACK_DEPTH],
            sp: 0,
        }
    }

    /// Returns `None` if the stack is already full
    pub fn push(&mut self, addr: u16) -> Option<()> {
        let slot = self.slots.get_mut(self.sp as usize)?;
        *slot = addr;
        self.sp += 1;
        Some(())
    }

    /// Returns `None` if the stack is empty
    pub fn pop(&mut self) -> Option<u16> {
        self.sp = self.sp.checked_sub(1)?;
        Some(self.slots[self.sp as usize])
    }

    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// Occupied slots, oldest first
    pub fn frames(&self) -> &[u16] {
        &self.slots[..self.sp as usize]
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new()
    }
}
