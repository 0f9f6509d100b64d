/// # Quirks
/// Interpreters disagree on a couple of instructions. The defaults follow the
/// original COSMAC VIP behaviour that most programs expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quirks {
    /// 8XY6/8XYE shift Vy into Vx (and take VF from Vy) instead of shifting Vx in place
    pub shift_uses_vy: bool,
    /// FX55/FX65 leave I pointing just past the last register transferred
    pub load_store_increments_i: bool,
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks {
            shift_uses_vy: false,
            load_store_increments_i: true,
        }
    }
}
