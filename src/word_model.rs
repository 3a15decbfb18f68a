use crate::{
    context::Context,
    context_map::ContextMap,
    mixer::Mixer,
};

// Word Model ------------------------------------------------------------------------------------------------------------------ Word Model

/// Models English-like text: a chain of five hashed word registers,
/// column position within the current line, the first character of the
/// line, and windows of recent space/word flags. Emits 46 contexts into
/// a dedicated ContextMap each byte.
pub struct WordModel {
    word0:  u32, // hashes of the current and 4 previous words
    word1:  u32,
    word2:  u32,
    word3:  u32,
    word4:  u32,
    nl1:    i32, // previous, current newline position
    nl:     i32,
    t1:     Vec<u32>, // byte -> following bytes, for order 1-2 successor contexts
    t2:     Vec<u16>, // digram -> following bytes
    cm:     ContextMap,
}
impl WordModel {
    pub fn new(mem: usize) -> WordModel {
        WordModel {
            word0: 0, word1: 0, word2: 0, word3: 0, word4: 0,
            nl1:   -3,
            nl:    -2,
            t1:    vec![0; 256],
            t2:    vec![0; 0x10000],
            cm:    ContextMap::new(mem * 31, 46),
        }
    }

    pub fn mix(&mut self, ctx: &mut Context, m: &mut Mixer) {
        if ctx.bpos == 0 {
            let c = ctx.b1;
            let mut f = 0u32;

            if ctx.spaces & 0x80000000 != 0 { ctx.spacecount -= 1; }
            if ctx.words  & 0x80000000 != 0 { ctx.wordcount  -= 1; }
            ctx.spaces = ctx.spaces.wrapping_mul(2);
            ctx.words  = ctx.words.wrapping_mul(2);

            // Letters, a few control codes and high bytes extend the
            // current word; everything else pushes the register chain.
            if c.wrapping_sub('a' as u32) <= ('z' as u32 - 'a' as u32)
                || c == 8 || c == 6 || (c > 127 && ctx.b2 != 12) {
                ctx.words += 1;
                ctx.wordcount += 1;
                self.word0 = self.word0.wrapping_mul(263 * 8).wrapping_add(c);
            }
            else {
                if c == 32 || c == 10 {
                    ctx.spaces += 1;
                    ctx.spacecount += 1;
                    if c == 10 {
                        self.nl1 = self.nl;
                        self.nl = ctx.pos - 1;
                    }
                }
                if self.word0 != 0 {
                    self.word4 = self.word3.wrapping_mul(43);
                    self.word3 = self.word2.wrapping_mul(47);
                    self.word2 = self.word1.wrapping_mul(53);
                    self.word1 = self.word0.wrapping_mul(83);
                    self.word0 = 0;
                    if c == b'.' as u32 || c == b'O' as u32 || c == b'R' as u32 {
                        f = 1;
                        ctx.spafdo = 0;
                    }
                    else {
                        ctx.spafdo = (ctx.spafdo + 1).min(63);
                    }
                }
            }

            let h = self.word0.wrapping_mul(271).wrapping_add(c);
            self.cm.set(self.word0);
            self.cm.set(h.wrapping_add(self.word1));
            self.cm.set(self.word0.wrapping_mul(91).wrapping_add(self.word1.wrapping_mul(89)));
            self.cm.set(h.wrapping_add(self.word1.wrapping_mul(79)).wrapping_add(self.word2.wrapping_mul(71)));
            self.cm.set(h.wrapping_add(self.word2));
            self.cm.set(h.wrapping_add(self.word3));
            self.cm.set(h.wrapping_add(self.word4));
            self.cm.set(h.wrapping_add(self.word1.wrapping_mul(73)).wrapping_add(self.word3.wrapping_mul(61)));
            self.cm.set(h.wrapping_add(self.word2.wrapping_mul(67)).wrapping_add(self.word3.wrapping_mul(59)));

            if f != 0 { // sentence boundary restarts the chain from '.'
                self.word4 = self.word3.wrapping_mul(31);
                self.word3 = self.word2.wrapping_mul(37);
                self.word2 = self.word1.wrapping_mul(41);
                self.word1 = b'.' as u32;
            }

            self.cm.set(ctx.b3 | ctx.b4 << 8);
            self.cm.set(ctx.spafdo.wrapping_mul(8) * (((ctx.w4 & 3) == 1) as u32));

            ctx.col = ((ctx.pos - self.nl) as u32).min(31);
            if ctx.col <= 2 {
                ctx.frstchar = if ctx.col == 2 { c.min(96) } else { 0 };
            }
            if ctx.frstchar == b'[' as u32 && c == 32 {
                if ctx.b3 == b']' as u32 || ctx.b4 == b']' as u32 {
                    ctx.frstchar = 96;
                }
            }
            self.cm.set(ctx.frstchar << 11 | c);

            let above = ctx.buf[self.nl1 + ctx.col as i32] as u32; // same column, previous line
            self.cm.set(ctx.col << 16 | c << 8 | above);
            self.cm.set(ctx.col << 8 | c);
            self.cm.set(ctx.col * (c == 32) as u32);

            let h = ctx.wordcount.wrapping_mul(64).wrapping_add(ctx.spacecount);
            self.cm.set(ctx.spaces & 0x7FFF);
            self.cm.set(ctx.frstchar << 7);
            self.cm.set(ctx.spaces & 0xFF);
            self.cm.set(c.wrapping_mul(64).wrapping_add(ctx.spacecount / 2));
            self.cm.set((c << 13).wrapping_add(h));
            self.cm.set(h);

            let d = ctx.c4 & 0xFFFF;
            let mut h = ctx.w4 << 6;
            self.cm.set(c.wrapping_add(h & 0xFFFFFF00));
            self.cm.set(c.wrapping_add(h & 0x00FFFF00));
            self.cm.set(c.wrapping_add(h & 0x0000FF00));
            h <<= 6;
            self.cm.set(d.wrapping_add(h & 0xFFFF0000));
            self.cm.set(d.wrapping_add(h & 0x00FF0000));
            h <<= 6;
            let f = ctx.c4 & 0xFFFFFF;
            self.cm.set(f.wrapping_add(h & 0xFF000000));

            self.t2[(f >> 8) as usize] = self.t2[(f >> 8) as usize] << 8 | c as u16;
            self.t1[(d >> 8) as usize] = self.t1[(d >> 8) as usize] << 8 | c;
            let t = c | self.t1[c as usize] << 8;
            self.cm.set(t & 0xFFFF);
            self.cm.set(t & 0xFFFFFF);
            self.cm.set(t);
            self.cm.set(t & 0xFF00);
            let t = d | (self.t2[d as usize] as u32) << 16;
            self.cm.set(t & 0xFFFFFF);
            self.cm.set(t);

            self.cm.set(ctx.x4 & 0x00FF00FF);
            self.cm.set(ctx.x4 & 0xFF0000FF);
            self.cm.set(ctx.x4 & 0x00FFFF00);
            self.cm.set(ctx.c4 & 0xFF00FF00);
            self.cm.set(c.wrapping_add(ctx.b5.wrapping_mul(256)).wrapping_add(1 << 17));
            self.cm.set(c.wrapping_add(ctx.b6.wrapping_mul(256)).wrapping_add(2 << 17));
            self.cm.set(ctx.b4.wrapping_add(ctx.b8.wrapping_mul(256)).wrapping_add(4 << 17));

            self.cm.set(d);
            self.cm.set(ctx.w4 & 15);
            self.cm.set(ctx.f4);
            self.cm.set((ctx.w4 & 63).wrapping_mul(128).wrapping_add(5 << 17));
            self.cm.set(d << 9 | ctx.frstchar);
            self.cm.set((ctx.f4 & 0xFFFF) << 11 | ctx.frstchar);
        }
        self.cm.mix(ctx, m);
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------
