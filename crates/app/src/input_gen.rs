//! Sample data for `encode` and `transfer` runs without `--in`.
//!
//! Generated data alternates between sections with different bit
//! statistics, since the channel corrupts bits regardless of content but the
//! damage reads very differently:
//! - Text sections (sentences from a small vocabulary), where a wrong byte
//!   is easy to spot in a diff
//! - Sparse sections (mostly zero bytes), where every flipped bit stands out
//! - Random sections, balanced ones and zeros

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::io::Write;
use std::path::Path;

const WORDS: &[&str] = &[
    "parity", "burst", "channel", "codeword", "syndrome", "message", "bit", "block", "error",
    "noise", "signal", "state", "good", "bad", "flip", "frame",
];

/// Longest run generated for a single section.
const SECTION_BYTES: usize = 4096;

/// Generate `size_bytes` of sample data deterministically from `seed`.
pub fn generate_sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let section = (size_bytes - data.len()).min(rng.gen_range(256..=SECTION_BYTES));
        match rng.gen_range(0..10u8) {
            0..=4 => push_text(&mut rng, &mut data, section),
            5..=6 => push_sparse(&mut rng, &mut data, section),
            _ => data.extend((0..section).map(|_| rng.gen::<u8>())),
        }
    }

    data.truncate(size_bytes);
    data
}

/// Sentences of vocabulary words ending in a newline.
fn push_text(rng: &mut ChaCha8Rng, data: &mut Vec<u8>, len: usize) {
    let end = data.len() + len;
    while data.len() < end {
        let words = rng.gen_range(3..=9);
        for i in 0..words {
            if i > 0 {
                data.push(b' ');
            }
            data.extend_from_slice(WORDS[rng.gen_range(0..WORDS.len())].as_bytes());
        }
        data.extend_from_slice(b".\n");
    }
    data.truncate(end);
}

/// Zero bytes with an occasional single set bit.
fn push_sparse(rng: &mut ChaCha8Rng, data: &mut Vec<u8>, len: usize) {
    data.extend((0..len).map(|_| {
        if rng.gen_bool(0.05) {
            1u8 << rng.gen_range(0..8)
        } else {
            0
        }
    }));
}

/// Write generated data to a file.
pub fn write_sample_file(path: &Path, seed: u64, size_bytes: usize) -> std::io::Result<()> {
    let data = generate_sample_data(seed, size_bytes);
    let mut file = std::fs::File::create(path)?;
    file.write_all(&data)?;
    Ok(())
}
