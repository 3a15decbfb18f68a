use crate::{
    context::Context,
    context_map::ContextMap,
    match_model::MatchModel,
    mixer::Mixer,
    record_model::RecordModel,
    run_map::RunContextMap,
    sparse_model::SparseModel,
    tables::PRIMES,
    word_model::WordModel,
};

// Context Model ------------------------------------------------------------------------------------------------------------ Context Model

/// Combines all of the context models with a gated two-layer Mixer.
///
/// Per byte it refreshes a chain of rolling prime-product context
/// hashes; per bit it drives the match model, the run maps, the main
/// order-N ContextMap, and (above level 3) the word, sparse and record
/// models, then selects 6 mixer weight sets from coarse stream state.
pub struct ContextModel {
    cm:     ContextMap,
    rcm7:   RunContextMap,
    rcm9:   RunContextMap,
    rcm10:  RunContextMap,
    m:      Mixer,
    mm:     MatchModel,
    word:   Option<WordModel>,
    sparse: Option<SparseModel>,
    record: Option<RecordModel>,
    cxt:    [u32; 16], // rolling order 0-13 context hashes
    size:   i32,       // bytes remaining in the current block
}
impl ContextModel {
    pub fn new(mem: usize, level: u32) -> ContextModel {
        ContextModel {
            cm:     ContextMap::new(mem * 31, 7),
            rcm7:   RunContextMap::new(mem / 4, 14),
            rcm9:   RunContextMap::new(mem / 4, 18),
            rcm10:  RunContextMap::new(mem / 2, 20),
            m:      Mixer::new(456, 128 * (16 + 14 + 14 + 12 + 14 + 16), 6, 512),
            mm:     MatchModel::new(mem),
            word:   if level >= 4 { Some(WordModel::new(mem)) } else { None },
            sparse: if level >= 4 { Some(SparseModel::new(mem)) } else { None },
            record: if level >= 4 { Some(RecordModel::new()) } else { None },
            cxt:    [0; 16],
            size:   0,
        }
    }

    pub fn match_len(&self) -> usize {
        self.mm.len()
    }

    /// Predict the next bit from all models. Called once per bit, after
    /// the global context has absorbed it.
    pub fn mix(&mut self, ctx: &mut Context) -> i32 {
        if ctx.bpos == 0 {
            // Vestigial block framing: track bytes remaining so a block
            // length in the stream reseeds the counter.
            self.size -= 1;
            if self.size == -5 {
                self.size = ctx.c4 as i32;
            }
        }

        self.m.update(ctx.y);
        self.m.add(64);

        self.mm.mix(ctx, &mut self.m);

        if ctx.bpos == 0 {
            let mut i = 0usize;
            let f2 = ctx.back(2) as u32;
            // A sentence terminal two bytes back folds into the high
            // order hashes so the model straddles the boundary.
            if matches!(f2 as u8, b'.' | b'O' | b'M' | b'!' | b')' | b'R')
                && ctx.b1 != f2 && ctx.back(3) as u32 != f2 {
                i = 13;
                ctx.x4 = ctx.x4.wrapping_mul(256).wrapping_add(f2);
            }
            while i > 0 {
                self.cxt[i] = self.cxt[i - 1].wrapping_mul(PRIMES[i]);
                i -= 1;
            }
            for i in (1..=13).rev() {
                self.cxt[i] = self.cxt[i - 1].wrapping_mul(PRIMES[i]).wrapping_add(ctx.b1);
            }

            self.cm.set(self.cxt[3]);
            self.cm.set(self.cxt[4]);
            self.cm.set(self.cxt[5]);
            self.cm.set(self.cxt[6]);
            self.cm.set(self.cxt[8]);
            self.cm.set(self.cxt[13]);
            self.cm.set(0);

            self.rcm7.set(self.cxt[7], ctx.b1);
            self.rcm9.set(self.cxt[9], ctx.b1);
            self.rcm10.set(self.cxt[11], ctx.b1);

            ctx.x4 = ctx.x4.wrapping_mul(256).wrapping_add(ctx.b1);
        }
        self.rcm7.mix(ctx, &mut self.m);
        self.rcm9.mix(ctx, &mut self.m);
        self.rcm10.mix(ctx, &mut self.m);

        let qq = self.m.nx;
        ctx.order = self.cm.mix(ctx, &mut self.m) - 1;
        if ctx.order < 0 {
            ctx.order = 0;
        }
        // Rescale the bit-history features against the raw state-map
        // outputs: rewind over the tail and boost what remains.
        let zz = (self.m.nx - qq) / 7;
        self.m.nx = qq + zz * 3;
        for _ in 0..zz * 2 { self.m.mul(5); }
        for _ in 0..zz     { self.m.mul(6); }
        for _ in 0..zz     { self.m.mul(9); }

        if let Some(word) = self.word.as_mut() {
            word.mix(ctx, &mut self.m);
        }
        if let Some(sparse) = self.sparse.as_mut() {
            sparse.mix(ctx, &mut self.m);
        }
        if let Some(record) = self.record.as_mut() {
            record.mix(ctx, &mut self.m);
        }

        // Select mixer weight sets from order, word/space class, bit
        // position and the trailing type windows.
        let mut c1 = ctx.b1;
        let mut c2 = ctx.b2;
        if c1 == 9 || c1 == 10 || c1 == 32 { c1 = 16; }
        if c2 == 9 || c2 == 10 || c2 == 32 { c2 = 16; }

        self.m.set(256 * ctx.order + ((ctx.w4 & 240) + (c2 >> 4)) as i32, 256 * 7);

        let c = (ctx.words >> 1) & 63;
        self.m.set(((ctx.w4 & 3) * 64 + c) as i32 + ctx.order * 256, 256 * 7);

        let c = (ctx.w4 & 255) + 256 * ctx.bpos as u32;
        self.m.set(c as i32, 256 * 8);

        let c = if ctx.bpos != 0 {
            let mut c = ctx.c0 << (8 - ctx.bpos) as u32;
            if ctx.bpos == 1 { c += ctx.b3 / 2; }
            (ctx.bpos.min(5) as u32) * 256 + (ctx.tt & 63) + (c & 192)
        }
        else {
            (ctx.words & 12) * 16 + (ctx.tt & 63)
        };
        self.m.set(c as i32, 1536);

        let c = ctx.bpos as u32;
        let c2 = (ctx.c0 << (8 - ctx.bpos) as u32) | (c1 >> ctx.bpos as u32);
        self.m.set(ctx.order * 256 + (c + (c2 & 248)) as i32, 256 * 7);

        let c = c * 256 + ((ctx.c0 << (8 - ctx.bpos) as u32) & 255);
        let c1 = (ctx.words << ctx.bpos as u32) & 255;
        self.m.set((c + (c1 >> ctx.bpos as u32)) as i32, 2048);

        self.m.p(ctx.y)
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------
