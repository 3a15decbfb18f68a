use crate::{
    context::Context,
    ilog::ilog,
    mixer::Mixer,
};

// Match Model ---------------------------------------------------------------------------------------------------------------- Match Model

const MAX_LEN: i32 = 2047; // longest allowed match + 1

/// Finds the longest context match in the input buffer via a rolling
/// hash over recent bytes, and predicts the next bit of the matched
/// byte with confidence scaled by the match length.
pub struct MatchModel {
    t:       Vec<i32>, // hash -> last position seen
    h:       u32,      // rolling hash of recent bytes
    ptr:     i32,      // next byte of the match, if any
    len:     i32,      // length of match, or 0
    result:  i32,      // length at the last byte boundary
}
impl MatchModel {
    pub fn new(mem: usize) -> MatchModel {
        assert!(mem.is_power_of_two());
        MatchModel {
            t:       vec![0; mem],
            h:       0,
            ptr:     0,
            len:     0,
            result:  0,
        }
    }

    /// Match length in bytes.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Update the match at byte boundaries and emit two predictions.
    /// Returns the match length.
    pub fn mix(&mut self, ctx: &Context, m: &mut Mixer) -> i32 {
        if ctx.bpos == 0 {
            self.h = self.h.wrapping_mul(887 * 8).wrapping_add(ctx.b1 + 1)
                & (self.t.len() as u32 - 1);
            if self.len != 0 {
                self.len += 1;
                self.ptr += 1;
            }
            else { // find a match
                self.ptr = self.t[self.h as usize];
                if self.ptr != 0 && ctx.pos - self.ptr < ctx.buf.size() as i32 {
                    while ctx.back(self.len + 1) == ctx.buf[self.ptr - self.len - 1]
                        && self.len < MAX_LEN {
                        self.len += 1;
                    }
                }
            }
            self.t[self.h as usize] = ctx.pos;
            self.result = self.len;
        }

        if self.len > MAX_LEN {
            self.len = MAX_LEN;
        }
        let sgn;
        if self.len != 0
            && ctx.b1 == ctx.buf[self.ptr - 1] as u32
            && ctx.c0 == (ctx.buf[self.ptr] as u32 + 256) >> (8 - ctx.bpos) as u32 {
            if (ctx.buf[self.ptr] >> (7 - ctx.bpos) as u32) & 1 != 0 { sgn = 8; }
            else { sgn = -8; }
        }
        else {
            sgn = 0;
            self.len = 0;
        }
        m.add(sgn * ilog(self.len as u32));
        m.add(sgn * 8 * self.len.min(32));
        self.result
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_on_repeated_data() {
        let mut ctx = Context::new(1 << 16);
        let mut mm = MatchModel::new(1 << 16);
        let mut m = Mixer::new(8, 1, 1, 0);
        let data: Vec<u8> = b"the quick brown fox. ".iter().cycle().take(210).cloned().collect();
        for &byte in data.iter() {
            for i in (0..8).rev() {
                ctx.update(((byte >> i) & 1) as i32);
                mm.mix(&ctx, &mut m);
                m.update(ctx.y);
            }
        }
        // By the tenth repetition the rolling hash has anchored and the
        // match has been extending for at least a full phrase.
        assert!(mm.len() >= 3, "match length {}", mm.len());
    }
}
