use crate::{
    context::Context,
    context_map::ContextMap,
    ilog::llog,
    mixer::Mixer,
};

// Record Model -------------------------------------------------------------------------------------------------------------- Record Model

/// Models 2-D data with fixed record length through the distance to the
/// last occurrence of each byte and each digram, plus order 1-2 maps.
/// The order 1-2 maps emit the thinner feature set (cxtfl cleared).
pub struct RecordModel {
    cpos1:  Vec<i32>, // byte -> last position
    wpos1:  Vec<i32>, // digram -> last position
    cm:     ContextMap,
    cn:     ContextMap,
    co:     ContextMap,
    cp:     ContextMap,
    cq:     ContextMap,
}
impl RecordModel {
    pub fn new() -> RecordModel {
        RecordModel {
            cpos1:  vec![0; 256],
            wpos1:  vec![0; 0x10000],
            cm:     ContextMap::new(32768 / 4, 2),
            cn:     ContextMap::new(32768 / 2, 5),
            co:     ContextMap::new(32768, 4),
            cp:     ContextMap::new(32768 * 2, 3),
            cq:     ContextMap::new(32768 * 4, 3),
        }
    }

    pub fn mix(&mut self, ctx: &mut Context, m: &mut Mixer) {
        if ctx.bpos == 0 {
            let c = ctx.b1;
            let w = (ctx.b2 << 8) + c;
            let d = w & 0xF0FF;
            let e = ctx.c4 & 0xFFFFFF;

            self.cm.set(c << 8 | ((ctx.pos - self.cpos1[c as usize]).min(255) / 4) as u32);
            self.cm.set(w << 9 | (llog((ctx.pos - self.wpos1[w as usize]) as u32) >> 2) as u32);

            self.cn.set(w);
            self.cn.set(d << 8);
            self.cn.set(c << 16);
            self.cn.set((ctx.f4 & 0xFFFF) << 3);
            self.cn.set((ctx.pos & 3) as u32 | 2 << 12);

            self.co.set(c);
            self.co.set(w << 8);
            self.co.set(ctx.w5 & 0x3FFFF);
            self.co.set(e << 3);

            self.cp.set(d);
            self.cp.set(c << 8);
            self.cp.set(w << 16);

            self.cq.set(w << 3);
            self.cq.set(c << 19);
            self.cq.set(e);

            self.cpos1[c as usize] = ctx.pos;
            self.wpos1[w as usize] = ctx.pos;
        }
        self.co.mix(ctx, m);
        self.cp.mix(ctx, m);
        ctx.cxtfl = 0;
        self.cm.mix(ctx, m);
        self.cn.mix(ctx, m);
        self.cq.mix(ctx, m);
        ctx.cxtfl = 3;
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------
