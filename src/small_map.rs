use crate::{
    context::Context,
    logistic::stretch,
    mixer::Mixer,
};

// Small Stationary Context Map -------------------------------------------------------------------------- Small Stationary Context Map

/// A direct-lookup map of small contexts to 16 bit probabilities,
/// adjusted toward each observed bit at a fixed rate (halved after the
/// first 4 MB). The context is looked up directly: cx must be below
/// m/512, high bits are discarded by the mask.
pub struct SmallStationaryContextMap {
    t:     Vec<u16>,
    cxt:   usize,
    cp:    usize,
    mulc:  i32,
}
impl SmallStationaryContextMap {
    pub fn new(m: usize, c: i32) -> SmallStationaryContextMap {
        assert!((m / 2).is_power_of_two());
        SmallStationaryContextMap {
            t:     vec![32768; m / 2],
            cxt:   0,
            cp:    0,
            mulc:  c,
        }
    }
    pub fn set(&mut self, cx: u32) {
        self.cxt = (cx as usize).wrapping_mul(256) & (self.t.len() - 256);
    }
    pub fn mix(&mut self, ctx: &Context, m: &mut Mixer) {
        let v = self.t[self.cp] as i32;
        self.t[self.cp] = if ctx.pos < 4_000_000 {
            (v + (((ctx.y << 16) - v + (1 << 8)) >> 9)) as u16
        }
        else {
            (v + (((ctx.y << 16) - v + (1 << 9)) >> 10)) as u16
        };
        self.cp = self.cxt + ctx.c0 as usize;
        m.add(stretch((self.t[self.cp] >> 4) as i32) * self.mulc / 32);
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapts_toward_observed_bits() {
        let mut ctx = Context::new(1 << 12);
        let mut scm = SmallStationaryContextMap::new(0x2000, 12);
        let mut m = Mixer::new(8, 1, 1, 0);
        scm.set(3);
        ctx.c0 = 5;
        scm.mix(&ctx, &mut m); // anchor cp at (3, 5)
        m.update(ctx.y);
        let before = scm.t[scm.cp];
        ctx.y = 1;
        for _ in 0..32 {
            scm.mix(&ctx, &mut m);
            m.update(ctx.y);
        }
        assert!(scm.t[scm.cp] > before);
        ctx.y = 0;
        let high = scm.t[scm.cp];
        for _ in 0..32 {
            scm.mix(&ctx, &mut m);
            m.update(ctx.y);
        }
        assert!(scm.t[scm.cp] < high);
    }
}
