// FarmHash fingerprint for byte strings
//
// This is the 64-bit `farmhash::Fingerprint64` (the `na` variant of
// `Hash64`), which is also what BigQuery exposes as `FARM_FINGERPRINT`.
// Every read is little-endian and every arithmetic step wraps, so the
// output is identical on any host.

/// Some primes between 2^63 and 2^64 for various uses.
pub const K0: u64 = 0xc3a5c85c97cb3127;
pub const K1: u64 = 0xb492b66fbe98f273;
pub const K2: u64 = 0x9ae16a3b2f90404f;

/// Multiplier used by `hash128_to_64`
pub const KMUL: u64 = 0x9ddfea08eb382d69;

/// Read a little-endian 64-bit word at `offset`
#[inline(always)]
fn fetch64(buf: &[u8], offset: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&buf[offset..offset + 8]);
    u64::from_le_bytes(word)
}

/// Read a little-endian 32-bit word at `offset`
#[inline(always)]
fn fetch32(buf: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(word)
}

/// Rotate right; the shift is taken modulo 64 and a zero shift is a no-op
#[inline(always)]
pub fn rotate_right(value: u64, shift: u32) -> u64 {
    let shift = shift & 63;
    if shift == 0 {
        return value;
    }
    (value >> shift) | (value << (64 - shift))
}

#[inline(always)]
pub fn shift_mix(value: u64) -> u64 {
    value ^ (value >> 47)
}

/// Combine two words into one with the given multiplier
#[inline(always)]
pub fn hash_len16(u: u64, v: u64, mul: u64) -> u64 {
    let mut a = (u ^ v).wrapping_mul(mul);
    a ^= a >> 47;
    let mut b = (v ^ a).wrapping_mul(mul);
    b ^= b >> 47;
    b.wrapping_mul(mul)
}

/// Combine a 128-bit value, given as two words, into 64 bits
pub fn hash128_to_64(u: u64, v: u64) -> u64 {
    hash_len16(u, v, KMUL)
}

fn hash_len_0_to_16(buf: &[u8]) -> u64 {
    let len = buf.len();
    if len >= 8 {
        let mul = K2.wrapping_add(len as u64 * 2);
        let a = fetch64(buf, 0).wrapping_add(K2);
        let b = fetch64(buf, len - 8);
        let c = rotate_right(b, 37).wrapping_mul(mul).wrapping_add(a);
        let d = rotate_right(a, 25).wrapping_add(b).wrapping_mul(mul);
        return hash_len16(c, d, mul);
    }
    if len >= 4 {
        let mul = K2.wrapping_add(len as u64 * 2);
        let a = fetch32(buf, 0) as u64;
        let b = fetch32(buf, len - 4) as u64;
        return hash_len16((len as u64).wrapping_add(a << 3), b, mul);
    }
    if len > 0 {
        let a = buf[0] as u32;
        let b = buf[len >> 1] as u32;
        let c = buf[len - 1] as u32;
        let y = a + (b << 8);
        let z = len as u32 + (c << 2);
        return shift_mix((y as u64).wrapping_mul(K2) ^ (z as u64).wrapping_mul(K0))
            .wrapping_mul(K2);
    }
    K2
}

fn hash_len_17_to_32(buf: &[u8]) -> u64 {
    let len = buf.len();
    let mul = K2.wrapping_add(len as u64 * 2);
    let a = fetch64(buf, 0).wrapping_mul(K1);
    let b = fetch64(buf, 8);
    let c = fetch64(buf, len - 8).wrapping_mul(mul);
    let d = fetch64(buf, len - 16).wrapping_mul(K2);
    hash_len16(
        rotate_right(a.wrapping_add(b), 43)
            .wrapping_add(rotate_right(c, 30))
            .wrapping_add(d),
        a.wrapping_add(rotate_right(b.wrapping_add(K2), 18))
            .wrapping_add(c),
        mul,
    )
}

fn hash_len_33_to_64(buf: &[u8]) -> u64 {
    let len = buf.len();
    let mul = K2.wrapping_add(len as u64 * 2);
    let a = fetch64(buf, 0).wrapping_mul(K2);
    let b = fetch64(buf, 8);
    let c = fetch64(buf, len - 8).wrapping_mul(mul);
    let d = fetch64(buf, len - 16).wrapping_mul(K2);
    let y = rotate_right(a.wrapping_add(b), 43)
        .wrapping_add(rotate_right(c, 30))
        .wrapping_add(d);
    let z = hash_len16(
        y,
        a.wrapping_add(rotate_right(b.wrapping_add(K2), 18))
            .wrapping_add(c),
        mul,
    );
    let e = fetch64(buf, 16).wrapping_mul(mul);
    let f = fetch64(buf, 24);
    let g = y.wrapping_add(fetch64(buf, len - 32)).wrapping_mul(mul);
    let h = z.wrapping_add(fetch64(buf, len - 24)).wrapping_mul(mul);
    hash_len16(
        rotate_right(e.wrapping_add(f), 43)
            .wrapping_add(rotate_right(g, 30))
            .wrapping_add(h),
        e.wrapping_add(rotate_right(f.wrapping_add(a), 18))
            .wrapping_add(g),
        mul,
    )
}

/// Mix 32 bytes at `offset` into the seed pair `(a, b)`
#[inline(always)]
fn weak_hash_len32_with_seeds(buf: &[u8], offset: usize, a: u64, b: u64) -> (u64, u64) {
    let w = fetch64(buf, offset);
    let x = fetch64(buf, offset + 8);
    let y = fetch64(buf, offset + 16);
    let z = fetch64(buf, offset + 24);

    let mut a = a.wrapping_add(w);
    let mut b = rotate_right(b.wrapping_add(a).wrapping_add(z), 21);
    let c = a;
    a = a.wrapping_add(x).wrapping_add(y);
    b = b.wrapping_add(rotate_right(a, 44));
    (a.wrapping_add(z), b.wrapping_add(c))
}

/// Running state of the long-input kernel
#[derive(Debug, Clone, Copy)]
struct KernelState {
    x: u64,
    y: u64,
    z: u64,
    v: (u64, u64),
    w: (u64, u64),
}

impl KernelState {
    const SEED: u64 = 81;

    fn new(buf: &[u8]) -> Self {
        let y = Self::SEED.wrapping_mul(K1).wrapping_add(113);
        let z = shift_mix(y.wrapping_mul(K2).wrapping_add(113)).wrapping_mul(K2);
        let x = Self::SEED.wrapping_mul(K2).wrapping_add(fetch64(buf, 0));
        Self {
            x,
            y,
            z,
            v: (0, 0),
            w: (0, 0),
        }
    }

    /// One 64-byte stride. The loop uses `factor == 1`, the tail uses 9.
    #[inline(always)]
    fn stride(&mut self, buf: &[u8], offset: usize, mul: u64, factor: u64) {
        self.x = rotate_right(
            self.x
                .wrapping_add(self.y)
                .wrapping_add(self.v.0)
                .wrapping_add(fetch64(buf, offset + 8)),
            37,
        )
        .wrapping_mul(mul);
        self.y = rotate_right(
            self.y
                .wrapping_add(self.v.1)
                .wrapping_add(fetch64(buf, offset + 48)),
            42,
        )
        .wrapping_mul(mul);
        self.x ^= self.w.1.wrapping_mul(factor);
        self.y = self
            .y
            .wrapping_add(self.v.0.wrapping_mul(factor))
            .wrapping_add(fetch64(buf, offset + 40));
        self.z = rotate_right(self.z.wrapping_add(self.w.0), 33).wrapping_mul(mul);
        self.v = weak_hash_len32_with_seeds(
            buf,
            offset,
            self.v.1.wrapping_mul(mul),
            self.x.wrapping_add(self.w.0),
        );
        self.w = weak_hash_len32_with_seeds(
            buf,
            offset + 32,
            self.z.wrapping_add(self.w.1),
            self.y.wrapping_add(fetch64(buf, offset + 16)),
        );
        std::mem::swap(&mut self.x, &mut self.z);
    }
}

fn hash_len_65_plus(buf: &[u8]) -> u64 {
    let len = buf.len();
    let mut state = KernelState::new(buf);

    // Every full block except the last, which the tail pass re-reads
    let end = ((len - 1) / 64) * 64;
    for offset in (0..end).step_by(64) {
        state.stride(buf, offset, K1, 1);
    }

    let mul = K1.wrapping_add((state.z & 0xff) << 1);
    state.w.0 = state.w.0.wrapping_add(((len - 1) & 63) as u64);
    state.v.0 = state.v.0.wrapping_add(state.w.0);
    state.w.0 = state.w.0.wrapping_add(state.v.0);
    state.stride(buf, len - 64, mul, 9);

    hash_len16(
        hash_len16(state.v.0, state.w.0, mul)
            .wrapping_add(shift_mix(state.y).wrapping_mul(K0))
            .wrapping_add(state.z),
        hash_len16(state.v.1, state.w.1, mul).wrapping_add(state.x),
        mul,
    )
}

/// FarmHash `Fingerprint64` of a byte buffer
///
/// Dispatches on length: `[0,16]`, `[17,32]`, `[33,64]` and anything longer.
pub fn fingerprint64(buf: &[u8]) -> u64 {
    match buf.len() {
        0..=16 => hash_len_0_to_16(buf),
        17..=32 => hash_len_17_to_32(buf),
        33..=64 => hash_len_33_to_64(buf),
        _ => hash_len_65_plus(buf),
    }
}

/// `fingerprint64` of a string's UTF-8 bytes
pub fn hash_string(s: &str) -> u64 {
    fingerprint64(s.as_bytes())
}
