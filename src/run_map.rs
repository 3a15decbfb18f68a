use crate::{
    context::Context,
    hash_table::RunTable,
    ilog::ilog,
    mixer::Mixer,
};

// Run Context Map ------------------------------------------------------------------------------------------------------ Run Context Map

/// Maps a context to the next byte and a repeat count. The prediction
/// is the matching bit of the recorded byte, scaled by the log of the
/// run length and the per-map weight, while the bits seen so far still
/// agree with that byte.
pub struct RunContextMap {
    t:     RunTable,
    cp:    usize, // count/byte of the current context
    mulc:  i32,
}
impl RunContextMap {
    /// m = memory in bytes (a power of 2), c = prediction weight.
    pub fn new(m: usize, c: i32) -> RunContextMap {
        let mut t = RunTable::new(m / 4);
        let cp = t.get(0) + 2;
        RunContextMap {
            t,
            cp,
            mulc: c,
        }
    }

    /// Update the count for the outgoing context, then switch to cx.
    pub fn set(&mut self, cx: u32, b1: u32) {
        if self.t.byte(self.cp) == 0 || self.t.byte(self.cp + 1) != b1 as u8 {
            self.t.set_byte(self.cp, 1);
            self.t.set_byte(self.cp + 1, b1 as u8);
        }
        else if self.t.byte(self.cp) < 255 {
            self.t.set_byte(self.cp, self.t.byte(self.cp) + 1);
        }
        self.cp = self.t.get(cx) + 2;
    }

    /// Predict the next bit.
    pub fn p(&self, ctx: &Context) -> i32 {
        let b = self.t.byte(self.cp + 1) as u32;
        if (b + 256) >> (8 - ctx.bpos) as u32 == ctx.c0 {
            let sgn = (((b >> (7 - ctx.bpos) as u32) & 1) * 2) as i32 - 1;
            sgn * ilog(self.t.byte(self.cp) as u32 + 1) * self.mulc
        }
        else {
            0
        }
    }

    /// Returns 1 if a run is recorded for the current context.
    pub fn mix(&mut self, ctx: &Context, m: &mut Mixer) -> i32 {
        m.add(self.p(ctx));
        (self.t.byte(self.cp) != 0) as i32
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------
