use crate::{
    context::Context,
    tables::nex,
};

// State Map ---------------------------------------------------------------------------------------------------------------- State Map

/// A StateMap maps a bit history state (0-255) to a probability. After
/// each mapping the entry for the previous state is nudged toward the
/// observed bit by `(sm_add_y - p) >> sm_shft`; the shift and target are
/// annealed by the global context as the stream grows.
///
/// Initially each entry is the stationary estimate 64K*(n1+1)/(n0+n1+2)
/// for the counts implied by the state, with the nonzero count scaled by
/// 128 when the other is zero.
#[derive(Clone)]
pub struct StateMap {
    cxt:  usize,     // State of last prediction
    t:    [u16; 256],
}
impl StateMap {
    pub fn new() -> StateMap {
        let mut t = [0u16; 256];
        for (i, v) in t.iter_mut().enumerate() {
            let mut n0 = nex(i as u8, 2) as u32;
            let mut n1 = nex(i as u8, 3) as u32;
            if n0 == 0 { n1 *= 128; }
            if n1 == 0 { n0 *= 128; }
            *v = (65536 * (n1 + 1) / (n0 + n1 + 2)) as u16;
        }
        StateMap {
            cxt: 0,
            t,
        }
    }

    /// Train the entry for the previous state with the current bit, then
    /// map state cx to a 12 bit probability.
    pub fn p(&mut self, ctx: &Context, cx: usize) -> i32 {
        let q = self.t[self.cxt] as i32;
        self.t[self.cxt] = (q + ((ctx.sm_add_y - q) >> ctx.sm_shft)) as u16;
        self.cxt = cx;
        (self.t[cx] >> 4) as i32
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_estimates() {
        let sm = StateMap::new();
        for i in 0..256u32 {
            let mut n0 = nex(i as u8, 2) as u32;
            let mut n1 = nex(i as u8, 3) as u32;
            if n0 == 0 { n1 *= 128; }
            if n1 == 0 { n0 *= 128; }
            assert_eq!(sm.t[i as usize] as u32, 65536 * (n1 + 1) / (n0 + n1 + 2));
        }
        // no bits seen -> 1/2
        assert_eq!(sm.t[0], 32768);
    }

    #[test]
    fn trains_toward_observed_bit() {
        let mut ctx = Context::new(1 << 12);
        let mut sm = StateMap::new();
        let p0 = sm.p(&ctx, 2); // state 2: one 1 seen
        ctx.update(1);
        let p1 = sm.p(&ctx, 2);
        assert!(p1 > p0, "p did not move toward 1: {} -> {}", p0, p1);
        ctx.update(0);
        let p2 = sm.p(&ctx, 2);
        assert!(p2 < p1, "p did not move toward 0: {} -> {}", p1, p2);
    }
}
