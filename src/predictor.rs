use crate::{
    apm::Apm,
    context::Context,
    context_model::ContextModel,
    hash::{hash2, hash3},
    tables::{TRI, TRJ},
};

// Predictor -------------------------------------------------------------------------------------------------------------------- Predictor

/// A Predictor estimates the probability that the next bit of input is
/// a 1. `p()` returns P(1) as a 12 bit number; `update(y)` trains the
/// predictor with the actual bit. Every call mutates the owned context,
/// so a compressor and decompressor driving identical bit sequences
/// stay in perfect sync.
///
/// The context model's output runs through a cascade of six adaptive
/// probability maps keyed by the partial byte, recent bytes, and two
/// windows of recent mispredictions, then the branches are blended with
/// weights picked by the short misprediction window.
pub struct Predictor {
    ctx:     Context,
    models:  ContextModel,
    a1:      Apm,
    a2:      Apm,
    a3:      Apm,
    a4:      Apm,
    a5:      Apm,
    a6:      Apm,
    pr:      i32, // next prediction
}
impl Predictor {
    /// level selects memory use: every table is sized from
    /// MEM = 0x10000 << level, and the input buffer holds MEM*8 bytes.
    pub fn new(level: u32) -> Predictor {
        assert!(level <= 9);
        let mem = 0x10000usize << level;
        Predictor {
            ctx:     Context::new(mem * 8),
            models:  ContextModel::new(mem, level),
            a1:      Apm::new(256),
            a2:      Apm::new(0x8000),
            a3:      Apm::new(0x8000),
            a4:      Apm::new(0x20000),
            a5:      Apm::new(0x10000),
            a6:      Apm::new(0x10000),
            pr:      2048,
        }
    }

    /// P(next bit is 1) scaled to 0..4095.
    pub fn p(&self) -> i32 {
        debug_assert!(self.pr >= 0 && self.pr < 4096);
        self.pr
    }

    /// P(next bit is 1) in (0,1), the form byte-level wrappers consume.
    pub fn predict(&self) -> f64 {
        (1 + self.p()) as f64 / 4097.0
    }

    /// Current match model length, in bytes.
    pub fn match_len(&self) -> usize {
        self.models.match_len()
    }

    /// The live global context (read-only).
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Absorb bit y and compute the next prediction.
    pub fn update(&mut self, y: i32) {
        assert!(y == 0 || y == 1);
        self.ctx.update(y);

        // Shift the misprediction windows. The previous prediction is
        // folded so that a high value always means "got it wrong".
        if self.ctx.fails & 0x80 != 0 { self.ctx.failcount -= 1; }
        self.ctx.fails = self.ctx.fails.wrapping_mul(2);
        self.ctx.failz = self.ctx.failz.wrapping_mul(2);
        if y != 0 { self.pr ^= 4095; }
        if self.pr >= 1820 { self.ctx.fails += 1; self.ctx.failcount += 1; }
        if self.pr >=  848 { self.ctx.failz += 1; }

        let pr = self.models.mix(&mut self.ctx);

        let ctx = &mut self.ctx;
        let rate = 6 + (ctx.pos > 14 * 256 * 1024) as i32 + (ctx.pos > 28 * 512 * 1024) as i32;

        let mut pu = (self.a1.p(y, pr, ctx.c0, 3) + 7 * pr + 4) >> 3;
        let mut pz = ctx.failcount as i32 + 1;
        pz += TRI[((ctx.fails >> 5) & 3) as usize] as i32;
        pz += TRJ[((ctx.fails >> 3) & 3) as usize] as i32;
        pz += TRJ[((ctx.fails >> 1) & 3) as usize] as i32;
        if ctx.fails & 1 != 0 { pz += 8; }
        pz /= 2;

        pu = self.a4.p(y, pu,
            (ctx.c0 * 2) ^ (hash3(ctx.b1, (ctx.x5 >> 8) & 255, (ctx.x5 >> 16) & 0x80FF) & 0x1FFFF),
            rate);
        let mut pv = self.a2.p(y, pr,
            (ctx.c0 * 8) ^ (hash2(29, ctx.failz & 2047) & 0x7FFF),
            rate + 1);
        pv = self.a5.p(y, pv,
            hash2(ctx.c0, ctx.w5 & 0xFFFFF) & 0xFFFF,
            rate);
        let pt = self.a3.p(y, pr,
            (ctx.c0 * 32) ^ (hash2(19, ctx.x5 & 0x80FFFF) & 0x7FFF),
            rate);
        let pz = self.a6.p(y, pu,
            (ctx.c0 * 4) ^ (hash2(pz.min(9) as u32, ctx.x5 & 0x80FF) & 0xFFFF),
            rate);

        self.pr = if ctx.fails & 255 != 0 {
            (pt * 6 + pu     + pv * 11 + pz * 14 + 16) >> 5
        }
        else {
            (pt * 4 + pu * 5 + pv * 12 + pz * 11 + 16) >> 5
        };
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_stays_in_range() {
        let mut p = Predictor::new(0);
        assert_eq!(p.p(), 2048);
        for (i, &byte) in b"abracadabra abracadabra".iter().enumerate() {
            for j in (0..8).rev() {
                let pr = p.p();
                assert!(pr >= 0 && pr < 4096, "byte {} bit {}: {}", i, j, pr);
                p.update(((byte >> j) & 1) as i32);
            }
        }
    }

    #[test]
    fn byte_boundary_state() {
        let mut p = Predictor::new(0);
        for j in (0..8).rev() {
            p.update((0x74 >> j) & 1);
        }
        assert_eq!(p.context().bpos, 0);
        assert_eq!(p.context().c0, 1);
        assert_eq!(p.context().pos, 1);
        assert_eq!(p.context().b1, 0x74);
    }

    #[test]
    fn predict_is_open_unit_interval() {
        let mut p = Predictor::new(0);
        for j in (0..8).rev() {
            let f = p.predict();
            assert!(f > 0.0 && f <= 1.0);
            p.update((0x00 >> j) & 1);
        }
    }
}
