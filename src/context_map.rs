use crate::{
    context::Context,
    hash_table::{BucketTable, STATES},
    ilog::ilog,
    logistic::stretch,
    mixer::Mixer,
    statemap::StateMap,
    tables::nex,
};

// Context Map ---------------------------------------------------------------------------------------------------------------- Context Map

// Predict to mixer m from bit history state s, using sm to map s to a
// probability. Emits 5 stretched features, or a thinner 4 when the
// cxtfl gate is cleared (the record model clears it for its order 1-2
// maps). Returns 1 iff the history is non-empty.
fn mix2(m: &mut Mixer, s: u8, sm: &mut StateMap, ctx: &Context) -> i32 {
    let p1 = sm.p(ctx, s as usize);
    let n0 = -((nex(s, 2) == 0) as i32);
    let n1 = -((nex(s, 3) == 0) as i32);
    let st = stretch(p1);
    if ctx.cxtfl != 0 {
        m.add(st / 4);
        let p0 = 4095 - p1;
        m.add((p1 - p0) * 3 / 64);
        m.add(st * (n1 - n0) * 3 / 16);
        m.add(((p1 & n0) - (p0 & n1)) / 16);
        m.add(((p0 & n0) - (p1 & n1)) * 7 / 64);
        return (s > 0) as i32;
    }
    m.add(st * 9 / 32);
    m.add(st * (n1 - n0) * 3 / 16);
    let p0 = 4095 - p1;
    m.add(((p1 & n0) - (p0 & n1)) / 16);
    m.add(((p0 & n0) - (p1 & n1)) * 7 / 64);
    (s > 0) as i32
}

/// A ContextMap maps whole-byte contexts to bit histories and a run
/// record, and emits predictions for both into a Mixer.
///
/// ContextMap::new(m, c) creates a map using m bytes of memory for c
/// contexts. Each byte boundary, `set` is called c times with the new
/// contexts; `mix` is called every bit:
///
///     if bpos == 0 { for cx in cxts { cm.set(cx); } }
///     cm.mix(ctx, m);
///
/// Bit histories live in a BucketTable. A bucket element covers 3 bits
/// of a byte as a 1-2-4 tree of states, so each byte costs three bucket
/// lookups per context (at bits 0, 2 and 5); the other bits walk within
/// the cached element. Elements fetched at bit 0 use their last 4 bytes
/// as a run record <count*2+d, byte, b2, b3> instead of states: d=0
/// means <byte> repeated count times and nothing else seen. The states
/// for bits 2-7 of a byte seen only once are not materialized until the
/// context recurs (count reaches 2), which halves the table pressure of
/// novel contexts.
pub struct ContextMap {
    t:     BucketTable,
    cp:    Vec<Option<usize>>, // current bit history, absent when the context is too new
    cp0:   Vec<usize>,         // element holding cp for the current byte
    cxt:   Vec<u32>,           // whole byte context hashes
    runp:  Vec<usize>,         // run record of the current byte-aligned element
    sm:    Vec<StateMap>,
    cn:    usize,              // next context to set
}
impl ContextMap {
    pub fn new(m: usize, c: usize) -> ContextMap {
        assert!(m >= 64);
        ContextMap {
            t:     BucketTable::new(m),
            cp:    vec![Some(STATES); c],
            cp0:   vec![STATES; c],
            cxt:   vec![0; c],
            runp:  vec![STATES + 3; c],
            sm:    vec![StateMap::new(); c],
            cn:    0,
        }
    }

    /// Set the next whole byte context. cx is permuted, not hashed, to
    /// spread the distribution before indexing.
    pub fn set(&mut self, cx: u32) {
        let i = self.cn;
        self.cn += 1;
        debug_assert!(i < self.cxt.len());
        let cx = cx.wrapping_mul(123456791).wrapping_add(i as u32);
        let cx = cx << 16 | cx >> 16;
        self.cxt[i] = cx.wrapping_mul(987654323).wrapping_add(i as u32);
    }

    /// Update the model with bit y and predict the next bit to mixer m.
    /// Returns the number of contexts with a non-empty history.
    pub fn mix(&mut self, ctx: &mut Context, m: &mut Mixer) -> i32 {
        let cc = ctx.c0;
        let c1 = ctx.b1;
        let mut result = 0;
        for i in 0..self.cn {
            // Extend the bit history with y. Near saturation the
            // advance is attenuated by a PRNG draw; the decrement keeps
            // the state's n0/n1 ratio.
            if let Some(off) = self.cp[i] {
                let mut ns = nex(self.t.byte(off), ctx.y as usize) as i32;
                if ns >= 204 && (ctx.rnd.next() << ((452 - ns) >> 3)) != 0 {
                    ns -= 4;
                }
                self.t.set_byte(off, ns as u8);
            }

            // Reposition within the element's state tree, or fetch a
            // new element at bits 0, 2 and 5.
            let cpi: Option<usize>;
            if ctx.bpos > 1 && self.t.byte(self.runp[i]) == 0 {
                cpi = None; // context seen once, histories not materialized
            }
            else if ctx.bpos == 1 || ctx.bpos == 3 || ctx.bpos == 6 {
                cpi = Some(self.cp0[i] + 1 + (cc & 1) as usize);
            }
            else if ctx.bpos == 4 || ctx.bpos == 7 {
                cpi = Some(self.cp0[i] + 3 + (cc & 3) as usize);
            }
            else {
                let chk = (self.cxt[i] >> 16) as u16;
                let off = self.t.get(self.cxt[i].wrapping_add(cc) & self.t.mask(), chk, i);
                self.cp0[i] = off;
                cpi = Some(off);
                if ctx.bpos == 0 {
                    // The context has recurred: materialize the pending
                    // bit 2-7 histories of the byte recorded in the run
                    // record.
                    if self.t.byte(off + 3) == 2 {
                        let c = self.t.byte(off + 4) as u32 + 256;
                        let p = self.t.get(self.cxt[i].wrapping_add(c >> 6) & self.t.mask(), chk, i);
                        self.t.set_byte(p, (1 + ((c >> 5) & 1)) as u8);
                        let s0 = self.t.byte(p) as usize;
                        self.t.set_byte(p + s0, (1 + ((c >> 4) & 1)) as u8);
                        self.t.set_byte(p + 3 + ((c >> 4) & 3) as usize, (1 + ((c >> 3) & 1)) as u8);
                        let p = self.t.get(self.cxt[i].wrapping_add(c >> 3) & self.t.mask(), chk, i);
                        self.t.set_byte(p, (1 + ((c >> 2) & 1)) as u8);
                        let s0 = self.t.byte(p) as usize;
                        self.t.set_byte(p + s0, (1 + ((c >> 1) & 1)) as u8);
                        self.t.set_byte(p + 3 + ((c >> 1) & 3) as usize, (1 + (c & 1)) as u8);
                        self.t.set_byte(off + 6, 0);
                    }

                    // Update the run count of the previous context.
                    let rp = self.runp[i];
                    let rc = self.t.byte(rp);
                    if rc == 0 { // new context
                        self.t.set_byte(rp, 2);
                        self.t.set_byte(rp + 1, c1 as u8);
                    }
                    else if self.t.byte(rp + 1) != c1 as u8 { // different byte in context
                        self.t.set_byte(rp, 1);
                        self.t.set_byte(rp + 1, c1 as u8);
                    }
                    else if rc < 254 { // same byte in context
                        self.t.set_byte(rp, rc + 2);
                    }
                    self.runp[i] = off + 3;
                }
            }

            // Predict from the last byte seen in this context, if the
            // bits so far agree with it.
            let rc = self.t.byte(self.runp[i]) as i32;
            let rb = self.t.byte(self.runp[i] + 1) as u32;
            if (rb + 256) >> (8 - ctx.bpos) as u32 == cc {
                let b = (((rb >> (7 - ctx.bpos) as u32) & 1) * 2) as i32 - 1;
                let mut c = ilog(rc as u32 + 1);
                if rc & 1 == 1 { c = c * 15 / 4; }
                else           { c *= 13; }
                m.add(b * c);
            }
            else {
                m.add(0);
            }

            // Predict from the bit history.
            let s = match cpi {
                Some(off) => self.t.byte(off),
                None => 0,
            };
            result += mix2(m, s, &mut self.sm[i], ctx);
            self.cp[i] = cpi;
        }
        if ctx.bpos == 7 {
            self.cn = 0;
        }
        result
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(cm: &mut ContextMap, ctx: &mut Context, m: &mut Mixer, byte: u8, cx: u32) {
        for i in (0..8).rev() {
            if ctx.bpos == 0 {
                cm.set(cx);
            }
            ctx.update(((byte >> i) & 1) as i32);
            cm.mix(ctx, m);
            m.update(ctx.y);
        }
    }

    #[test]
    fn repeated_context_builds_history() {
        let mut cm = ContextMap::new(1 << 16, 1);
        let mut ctx = Context::new(1 << 16);
        let mut m = Mixer::new(8, 1, 1, 0);
        let mut hits = 0;
        for _ in 0..16 {
            for i in (0..8).rev() {
                if ctx.bpos == 0 {
                    cm.set(0x12345678);
                }
                ctx.update((0x61 >> i) & 1);
                hits += cm.mix(&mut ctx, &mut m);
                m.update(ctx.y);
            }
        }
        // After the first repeat the history is materialized and every
        // bit of the byte finds a state.
        assert!(hits > 8 * 8, "history never formed: {} hits", hits);
    }

    #[test]
    fn run_record_tracks_repeats() {
        let mut cm = ContextMap::new(1 << 16, 1);
        let mut ctx = Context::new(1 << 16);
        let mut m = Mixer::new(8, 1, 1, 0);
        for _ in 0..8 {
            drive(&mut cm, &mut ctx, &mut m, b'a', 7);
        }
        // count*2 with the repeat flag clear, capped below 255
        let rc = cm.t.byte(cm.runp[0]);
        assert!(rc >= 2 && rc & 1 == 0, "run count {}", rc);
        assert_eq!(cm.t.byte(cm.runp[0] + 1), b'a');
    }

    #[test]
    fn new_context_has_no_prediction() {
        let mut cm = ContextMap::new(1 << 16, 2);
        let mut ctx = Context::new(1 << 16);
        let mut m = Mixer::new(16, 1, 1, 0);
        cm.set(1);
        cm.set(2);
        ctx.update(0);
        let r = cm.mix(&mut ctx, &mut m);
        assert_eq!(r, 0, "fresh contexts have empty histories");
    }
}
