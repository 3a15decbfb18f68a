use paqhp::{Decoder, Encoder, Predictor};

fn drive(p: &mut Predictor, data: &[u8]) -> Vec<i32> {
    let mut prs = Vec::with_capacity(data.len() * 8);
    for &byte in data {
        for i in (0..8).rev() {
            prs.push(p.p());
            p.update(((byte >> i) & 1) as i32);
        }
    }
    prs
}

// Simple xorshift generator so test inputs are reproducible without
// pulling in a dependency.
fn pseudo_random_bytes(n: usize, mut seed: u32) -> Vec<u8> {
    (0..n).map(|_| {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        (seed >> 24) as u8
    }).collect()
}

fn sample_text(n: usize) -> Vec<u8> {
    b"the cat sat on the mat. the quick brown fox jumps over the lazy dog. "
        .iter().cycle().take(n).cloned().collect()
}

#[test]
fn predictions_are_deterministic() {
    let data = sample_text(2048);
    let a = drive(&mut Predictor::new(1), &data);
    let b = drive(&mut Predictor::new(1), &data);
    assert_eq!(a, b);
}

#[test]
fn predictions_stay_in_range() {
    let data = pseudo_random_bytes(1024, 0xDEADBEEF);
    for pr in drive(&mut Predictor::new(0), &data) {
        assert!(pr >= 0 && pr < 4096);
    }
}

#[test]
fn contexts_agree_across_instances() {
    let data = sample_text(512);
    let mut a = Predictor::new(2);
    let mut b = Predictor::new(2);
    for &byte in data.iter() {
        for i in (0..8).rev() {
            let bit = ((byte >> i) & 1) as i32;
            a.update(bit);
            b.update(bit);
        }
        let (ca, cb) = (a.context(), b.context());
        assert_eq!(ca.c4, cb.c4);
        assert_eq!(ca.x4, cb.x4);
        assert_eq!(ca.x5, cb.x5);
        assert_eq!(ca.w4, cb.w4);
        assert_eq!(ca.w5, cb.w5);
        assert_eq!(ca.f4, cb.f4);
        assert_eq!(ca.tt, cb.tt);
        assert_eq!(
            [ca.b1, ca.b2, ca.b3, ca.b4, ca.b5, ca.b6, ca.b7, ca.b8],
            [cb.b1, cb.b2, cb.b3, cb.b4, cb.b5, cb.b6, cb.b7, cb.b8],
        );
    }
}

#[test]
fn levels_change_predictions_but_stay_reproducible() {
    let data = sample_text(1024);
    let mut runs = Vec::new();
    for level in 0..=4 {
        let a = drive(&mut Predictor::new(level), &data);
        let b = drive(&mut Predictor::new(level), &data);
        assert_eq!(a, b, "level {} not reproducible", level);
        runs.push(a);
    }
    for i in 1..runs.len() {
        assert_ne!(runs[i - 1], runs[i], "levels {} and {} predict identically", i - 1, i);
    }
}

#[test]
fn strong_expectation_on_repeated_byte() {
    // 256 repeats of 'a': well before the end the predictor should be
    // near-certain of every bit of the next 'a'.
    let data = vec![0x61u8; 256];
    let mut p = Predictor::new(1);
    let mut bitpos = 0;
    for &byte in data.iter() {
        for i in (0..8).rev() {
            let bit = ((byte >> i) & 1) as i32;
            let pr = p.p();
            let confidence = if bit == 1 { pr } else { 4095 - pr };
            if bitpos >= 1000 {
                assert!(confidence > 3800, "bit {}: confidence {}", bitpos, confidence);
            }
            p.update(bit);
            bitpos += 1;
        }
    }
}

#[test]
fn match_model_anchors_on_repeated_phrase() {
    let data = sample_text(280); // four repetitions
    let mut p = Predictor::new(1);
    for &byte in data.iter() {
        for i in (0..8).rev() {
            p.update(((byte >> i) & 1) as i32);
        }
    }
    assert!(p.match_len() >= 3, "match len {}", p.match_len());
}

fn cross_entropy_bits_per_byte(p: &mut Predictor, data: &[u8]) -> f64 {
    let mut bits = 0.0f64;
    for &byte in data {
        for i in (0..8).rev() {
            let bit = (byte >> i) & 1;
            let pr = (1 + p.p()) as f64 / 4097.0;
            let q = if bit == 1 { pr } else { 1.0 - pr };
            bits -= q.log2();
            p.update(bit as i32);
        }
    }
    bits / data.len() as f64
}

#[test]
fn text_codes_well_below_eight_bits() {
    let data = sample_text(4096);
    let bpb = cross_entropy_bits_per_byte(&mut Predictor::new(4), &data);
    assert!(bpb < 4.0, "cross entropy {} bits/byte", bpb);
}

#[test]
fn random_data_codes_near_eight_bits() {
    // A calibrated predictor cannot beat entropy on random input, but it
    // must not fall apart on it either.
    let data = pseudo_random_bytes(16384, 0x2545F491);
    let bpb = cross_entropy_bits_per_byte(&mut Predictor::new(1), &data);
    assert!(bpb < 8.25, "cross entropy {} bits/byte", bpb);
    assert!(bpb > 7.5, "implausibly good on random data: {} bits/byte", bpb);
}

#[test]
fn roundtrip_text() {
    let data = sample_text(2048);
    let stream = Encoder::new(2).encode(&data);
    assert!(stream.len() < data.len(), "text did not compress");
    assert_eq!(Decoder::new(stream).unwrap().decode(), data);
}

#[test]
fn roundtrip_random() {
    let data = pseudo_random_bytes(4096, 0xB5297A4D);
    let stream = Encoder::new(1).encode(&data);
    assert_eq!(Decoder::new(stream).unwrap().decode(), data);
}

#[test]
fn roundtrip_edge_cases() {
    for data in [vec![], vec![0u8], vec![255u8; 3], b"a".repeat(512)] {
        let stream = Encoder::new(0).encode(&data);
        let dec = Decoder::new(stream).unwrap();
        assert_eq!(dec.len(), data.len());
        assert_eq!(dec.decode(), data, "len {}", data.len());
    }
}

#[test]
fn roundtrip_across_levels() {
    // The frame records the level, so extraction needs only the stream.
    let data = sample_text(768);
    for level in 0..=4 {
        let stream = Encoder::new(level).encode(&data);
        assert_eq!(Decoder::new(stream).unwrap().decode(), data, "level {}", level);
    }
}
