// Logistic Functions -------------------------------------------------------------------------------------------------- Logistic Functions

const SQUASH_T: [i32; 33] = [
    1,2,3,6,10,16,27,45,73,120,194,310,488,747,1101,
    1546,2047,2549,2994,3348,3607,3785,3901,3975,4022,
    4050,4068,4079,4085,4089,4092,4093,4094];

/// Returns p = 1/(1 + exp(-d)) (Inverse of stretch)
/// d = (-2047..2047), p = (0..4095)
pub const fn squash(d: i32) -> i32 {
    if d >  2047 { return 4095; }
    if d < -2047 { return 0;    }
    let i_w = d & 127;
    let d = ((d >> 7) + 16) as usize;
    (SQUASH_T[d] * (128 - i_w) + SQUASH_T[d + 1] * i_w + 64) >> 7
}

// Invert squash() by sweeping it over its domain and filling in the
// preimage of each 12 bit probability.
const fn stretch_table() -> [i16; 4096] {
    let mut t = [0i16; 4096];
    let mut pi = 0usize;
    let mut x = -2047i32;
    while x <= 2047 {
        let i = squash(x) as usize;
        let mut j = pi;
        while j <= i {
            t[j] = x as i16;
            j += 1;
        }
        pi = i + 1;
        x += 1;
    }
    t[4095] = 2047;
    t
}

static STRETCH_T: [i16; 4096] = stretch_table();

/// Returns d = ln(p/(1-p)) (Inverse of squash)
/// p = (0..4095), d = (-2047..2047)
pub fn stretch(p: i32) -> i32 {
    STRETCH_T[p as usize] as i32
}

// ----------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squash_saturates() {
        assert_eq!(squash(-2047), 0);
        assert_eq!(squash(-3000), 0);
        assert_eq!(squash(2047), 4094);
        assert_eq!(squash(2048), 4095);
        assert_eq!(squash(0), 2047);
    }

    #[test]
    fn squash_monotone() {
        let mut prev = squash(-2047);
        for d in -2046..=2047 {
            let p = squash(d);
            assert!(p >= prev, "squash not monotone at d={}", d);
            prev = p;
        }
    }

    #[test]
    fn stretch_monotone() {
        let mut prev = stretch(0);
        for p in 1..4096 {
            let d = stretch(p);
            assert!(d >= prev, "stretch not monotone at p={}", p);
            prev = d;
        }
        assert_eq!(stretch(4095), 2047);
    }

    #[test]
    fn stretch_inverts_squash() {
        // Exact on the image of squash; off-image probabilities round up
        // by at most the local squash step.
        for d in -2047..=2047 {
            let p = squash(d);
            assert_eq!(squash(stretch(p)), p);
            assert!(stretch(p) <= d);
        }
        for p in 0..4096 {
            let q = squash(stretch(p));
            assert!(q >= p && q - p <= 4, "p={} q={}", p, q);
        }
    }
}
