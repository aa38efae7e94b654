use rand::Rng;

pub const WHEEL_SLOTS: u8 = 37;

/// Client-side wheel stop drawn purely for the spin animation. It is
/// independent of the settlement outcome and never authoritative; the
/// settlement event alone decides what was won.
pub fn cosmetic_stop() -> u8 {
    rand::rng().random_range(0..WHEEL_SLOTS)
}
