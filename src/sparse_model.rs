use crate::{
    context::Context,
    context_map::ContextMap,
    mixer::Mixer,
    small_map::SmallStationaryContextMap,
};

// Sparse Model -------------------------------------------------------------------------------------------------------------- Sparse Model

/// Models order 1-2 contexts with gaps: masked nibble windows into a
/// shared ContextMap, and individual trailing bytes and text counters
/// into small stationary maps.
pub struct SparseModel {
    cn:    ContextMap,
    scm1:  SmallStationaryContextMap,
    scm2:  SmallStationaryContextMap,
    scm3:  SmallStationaryContextMap,
    scm4:  SmallStationaryContextMap,
    scm5:  SmallStationaryContextMap,
    scm6:  SmallStationaryContextMap,
    scm7:  SmallStationaryContextMap,
    scm8:  SmallStationaryContextMap,
    scm9:  SmallStationaryContextMap,
    scma:  SmallStationaryContextMap,
}
impl SparseModel {
    pub fn new(mem: usize) -> SparseModel {
        SparseModel {
            cn:    ContextMap::new(mem * 2, 5),
            scm1:  SmallStationaryContextMap::new(0x20000, 17),
            scm2:  SmallStationaryContextMap::new(0x20000, 12),
            scm3:  SmallStationaryContextMap::new(0x20000, 12),
            scm4:  SmallStationaryContextMap::new(0x20000, 13),
            scm5:  SmallStationaryContextMap::new(0x10000, 12),
            scm6:  SmallStationaryContextMap::new(0x20000, 12),
            scm7:  SmallStationaryContextMap::new(0x2000,  12),
            scm8:  SmallStationaryContextMap::new(0x8000,  13),
            scm9:  SmallStationaryContextMap::new(0x1000,  12),
            scma:  SmallStationaryContextMap::new(0x10000, 16),
        }
    }

    pub fn mix(&mut self, ctx: &mut Context, m: &mut Mixer) {
        if ctx.bpos == 0 {
            self.cn.set(ctx.words & 0x1FFFF);
            self.cn.set((ctx.f4 & 0x000FFFFF).wrapping_mul(7));
            self.cn.set((ctx.x4 & 0xF8F8F8F8).wrapping_add(3));
            self.cn.set((ctx.tt & 0x00000FFF).wrapping_mul(9));
            self.cn.set((ctx.x4 & 0x80F0F0FF).wrapping_add(6));
            self.scm1.set(ctx.b1);
            self.scm2.set(ctx.b2);
            self.scm3.set(ctx.b3);
            self.scm4.set(ctx.b4);
            self.scm5.set(ctx.words & 127);
            self.scm6.set((ctx.words & 12) * 16 + (ctx.w4 & 12) * 4 + (ctx.b1 >> 4));
            self.scm7.set(ctx.w4 & 15);
            self.scm8.set(ctx.spafdo * (((ctx.w4 & 3) == 1) as u32));
            self.scm9.set(ctx.col * ((ctx.b1 == 32) as u32));
            self.scma.set(ctx.frstchar);
        }
        self.cn.mix(ctx, m);
        self.scm1.mix(ctx, m);
        self.scm2.mix(ctx, m);
        self.scm3.mix(ctx, m);
        self.scm4.mix(ctx, m);
        self.scm5.mix(ctx, m);
        self.scm6.mix(ctx, m);
        self.scm7.mix(ctx, m);
        self.scm8.mix(ctx, m);
        self.scm9.mix(ctx, m);
        self.scma.mix(ctx, m);
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------
