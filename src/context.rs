use crate::{
    buffer::Buf,
    rnd::Random,
    tables::{WRT_MPW, WRT_MTT},
};

// Global Context -------------------------------------------------------------------------------------------------------- Global Context

/// The live set of registers every model reads. The canonical design
/// keeps these process-global; owning them in one struct keeps predictor
/// instances independent.
///
/// Invariant: whenever `bpos == 0`, `c0 == 1` and `b1` is the byte just
/// appended to `buf` at `pos - 1`.
pub struct Context {
    pub buf:   Buf,  // Rotating input queue
    pub pos:   i32,  // Number of input bytes in buf (not wrapped)
    pub y:     i32,  // Last bit, 0 or 1
    pub c0:    u32,  // Last 0-7 bits of the partial byte with a leading 1 bit (1-255)
    pub bpos:  i32,  // Bits in c0 (0 to 7)

    // Trailing byte/nibble windows, packed. Last byte is bits 0-7.
    pub c4:  u32,
    pub x4:  u32,
    pub x5:  u32,
    pub w4:  u32,
    pub w5:  u32,
    pub f4:  u32,
    pub tt:  u32,

    // Last 8 whole bytes, b1 most recent.
    pub b1: u32, pub b2: u32, pub b3: u32, pub b4: u32,
    pub b5: u32, pub b6: u32, pub b7: u32, pub b8: u32,

    pub order:  i32,  // Number of order-N contexts matched this bit
    pub cxtfl:  i32,  // Feature emission gate for ContextMap::mix

    // StateMap learning rate, annealed at 512K and 1M bytes.
    pub sm_shft:   i32,
    pub sm_add:    i32,
    pub sm_add_y:  i32,

    // Text statistics shared by the word and sparse models.
    pub words:       u32,
    pub wordcount:   u32,
    pub spaces:      u32,
    pub spacecount:  u32,
    pub spafdo:      u32,
    pub frstchar:    u32,
    pub col:         u32,

    // Recent misprediction windows, fed to the APM cascade.
    pub fails:      u32,
    pub failz:      u32,
    pub failcount:  u32,

    pub rnd: Random, // Shared by all ContextMaps
}
impl Context {
    pub fn new(buf_size: usize) -> Context {
        Context {
            buf:   Buf::new(buf_size),
            pos:   0,
            y:     0,
            c0:    1,
            bpos:  0,
            c4: 0, x4: 0, x5: 0, w4: 0, w5: 0, f4: 0, tt: 0,
            b1: 0, b2: 0, b3: 0, b4: 0, b5: 0, b6: 0, b7: 0, b8: 0,
            order:  0,
            cxtfl:  3,
            sm_shft:   7,
            sm_add:    65535 + 127,
            sm_add_y:  0,
            words: 0, wordcount: 0, spaces: 0, spacecount: 0,
            spafdo: 0, frstchar: 0, col: 0,
            fails: 0, failz: 0, failcount: 0,
            rnd: Random::new(),
        }
    }

    /// The byte `i` positions back from `pos` (i > 0).
    pub fn back(&self, i: i32) -> u8 {
        debug_assert!(i > 0);
        self.buf[self.pos - i]
    }

    /// Absorb bit y. On completing a byte, append it to the buffer and
    /// run the whole-byte register updates.
    pub fn update(&mut self, y: i32) {
        self.y = y;
        self.sm_add_y = self.sm_add & -y;
        self.c0 = self.c0 * 2 + y as u32;
        if self.c0 >= 256 {
            self.buf[self.pos] = self.c0 as u8;
            self.pos += 1;
            self.c0 -= 256;
            if self.pos <= 1024 * 1024 {
                if self.pos == 1024 * 1024 { self.sm_shft = 9; self.sm_add = 65535 + 511; }
                if self.pos ==  512 * 1024 { self.sm_shft = 8; self.sm_add = 65535 + 255; }
                self.sm_add_y = self.sm_add & -y;
            }
            let mut i = WRT_MPW[(self.c0 >> 4) as usize];
            self.w4 = self.w4.wrapping_mul(4).wrapping_add(i);
            if self.b1 == 12 { i = 2; }
            self.w5 = self.w5.wrapping_mul(4).wrapping_add(i);
            self.b8 = self.b7; self.b7 = self.b6; self.b6 = self.b5; self.b5 = self.b4;
            self.b4 = self.b3; self.b3 = self.b2; self.b2 = self.b1; self.b1 = self.c0;
            // Sentence-terminal bytes in dictionary-transformed text
            if matches!(self.c0 as u8, b'.' | b'O' | b'M' | b'!' | b')' | b'R') {
                self.w5 = (self.w5 << 8) | 0x3FF;
                self.x5 = (self.x5 << 8) + self.c0;
                self.f4 = (self.f4 & 0xFFFF_FFF0) + 2;
                if self.c0 != b'!' as u32 && self.c0 != b'O' as u32 { self.w4 |= 12; }
                if self.c0 != b'!' as u32 {
                    self.b2 = b'.' as u32;
                    self.tt = (self.tt & 0xFFFF_FFF8) + 1;
                }
            }
            self.c4 = (self.c4 << 8) + self.c0;
            self.x5 = (self.x5 << 8) + self.c0;
            if self.c0 == 32 { self.c0 -= 1; } // space shares nibble features with 31
            self.f4 = self.f4.wrapping_mul(16).wrapping_add(self.c0 >> 4);
            self.tt = self.tt.wrapping_mul(8).wrapping_add(WRT_MTT[(self.c0 >> 4) as usize]);
            self.c0 = 1;
        }
        self.bpos = (self.bpos + 1) & 7;
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn drive_byte(ctx: &mut Context, byte: u8) {
        for i in (0..8).rev() {
            ctx.update(((byte >> i) & 1) as i32);
        }
    }

    #[test]
    fn byte_boundary_invariant() {
        let mut ctx = Context::new(1 << 16);
        drive_byte(&mut ctx, 0x74);
        assert_eq!(ctx.bpos, 0);
        assert_eq!(ctx.c0, 1);
        assert_eq!(ctx.pos, 1);
        assert_eq!(ctx.b1, 0x74);
        assert_eq!(ctx.back(1), 0x74);
        drive_byte(&mut ctx, 0x68);
        assert_eq!(ctx.pos, 2);
        assert_eq!(ctx.b1, 0x68);
        assert_eq!(ctx.b2, 0x74);
        assert_eq!(ctx.c4, 0x7468);
    }

    #[test]
    fn window_registers() {
        let mut ctx = Context::new(1 << 16);
        for b in [0x74, 0x68, 0x65, 0x20] {
            drive_byte(&mut ctx, b);
        }
        assert_eq!(ctx.c4, 0x74686520);
        assert_eq!(ctx.x5, 0x74686520);
        // space is folded to 31 for the nibble features
        assert_eq!(ctx.f4 & 15, 31 >> 4);
        assert_eq!(ctx.tt & 7, WRT_MTT[1]);
    }

    #[test]
    fn statemap_rate_anneals_on_exact_boundary() {
        let mut ctx = Context::new(1 << 16);
        for n in 0..1024 * 1024 {
            assert_eq!(
                ctx.sm_shft,
                if n < 512 * 1024 { 7 } else { 8 },
                "at pos {}", n
            );
            drive_byte(&mut ctx, (n & 0xFF) as u8);
        }
        assert_eq!(ctx.sm_shft, 9);
        assert_eq!(ctx.sm_add, 65535 + 511);
    }
}
