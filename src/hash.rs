// Hash ----------------------------------------------------------------------------------------------------------------------------- Hash

/// Hash 3 ints. All arithmetic is wraparound 32 bit so the result is
/// identical on every platform.
pub fn hash3(a: u32, b: u32, c: u32) -> u32 {
    let h = a.wrapping_mul(110002499)
        .wrapping_add(b.wrapping_mul(30005491))
        .wrapping_add(c.wrapping_mul(50004239));
    h ^ h >> 9 ^ a >> 3 ^ b >> 3 ^ c >> 4
}

/// Hash 2 ints.
pub fn hash2(a: u32, b: u32) -> u32 {
    hash3(a, b, 0xFFFF_FFFF)
}

// ----------------------------------------------------------------------------------------------------------------------------------------
