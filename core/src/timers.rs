/// # Timers
/// Two 8-bit countdown timers, decremented once per CPU cycle while above 0.
/// - `delay` is readable by programs for timing
/// - `sound` sounds a tone while it is above 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Timers { delay: 0, sound: 0 }
    }

    /// Decrements both timers without going below 0.
    ///
    /// Returns true when the sound timer just went from 1 to 0, i.e. the tone should stop.
    pub fn tick(&mut self) -> bool {
        self.delay = self.delay.saturating_sub(1);
        let tone_stopped = self.sound == 1;
        self.sound = self.sound.saturating_sub(1);
        tone_stopped
    }

    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }
}
