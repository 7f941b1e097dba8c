//! Block interleaving across codewords.
//!
//! A block is a `depth × width` grid, one codeword per row. Encoding writes
//! bits row-major and reads them column-major, so consecutive transmitted
//! bits belong to different codewords. A channel burst of up to `depth` bits
//! therefore lands as at most one flipped bit per codeword once the block is
//! de-interleaved.
//!
//! # Partial Blocks
//!
//! A block may carry fewer than `depth * width` bits (the tail of a stream).
//! Only the first `len` cells in row-major order are occupied, and both
//! traversals skip the empty cells. The inverse call must be given the same
//! logical length, which [`InterleavedBlock`] carries explicitly.
//!
//! ```text
//! depth=2, width=3, input 101 110
//!
//!   row-major write     column-major read
//!   1 0 1               1 1 | 0 1 | 1 0
//!   1 1 0               -> 110110
//! ```

use crate::error::{InterleaveError, Result};

/// Interleaved bits tagged with their logical length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterleavedBlock {
    /// Bits in transmission order
    pub bits: Vec<bool>,

    /// Number of grid cells in use (equals `bits.len()` when built here)
    pub logical_len: usize,
}

/// Row/column permutation over a `depth × width` grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interleaver {
    depth: usize,
    width: usize,
    capacity: usize,
}

impl Interleaver {
    /// Create an interleaver with `depth` rows of `width` bits.
    ///
    /// # Errors
    /// `InterleaveError::InvalidDimensions` if either dimension is zero or
    /// the grid size overflows `usize`.
    pub fn new(depth: usize, width: usize) -> Result<Self> {
        let capacity = depth
            .checked_mul(width)
            .filter(|&cells| cells > 0)
            .ok_or(InterleaveError::InvalidDimensions { depth, width })?;
        Ok(Self {
            depth,
            width,
            capacity,
        })
    }

    /// Number of rows (codewords per block).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of columns (codeword length).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Bits in a full block.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Reorder bits from codeword order to transmission order.
    ///
    /// # Errors
    /// `InterleaveError::BlockOverflow` if `bits` exceeds the grid.
    pub fn encode(&self, bits: &[bool]) -> Result<Vec<bool>> {
        self.check_len(bits.len())?;
        let mut out = Vec::with_capacity(bits.len());
        for cell in self.column_major_cells(bits.len()) {
            out.push(bits[cell]);
        }
        Ok(out)
    }

    /// Restore codeword order from transmission order.
    ///
    /// # Errors
    /// `InterleaveError::BlockOverflow` if `bits` exceeds the grid.
    pub fn decode(&self, bits: &[bool]) -> Result<Vec<bool>> {
        self.check_len(bits.len())?;
        let mut out = vec![false; bits.len()];
        for (&bit, cell) in bits.iter().zip(self.column_major_cells(bits.len())) {
            out[cell] = bit;
        }
        Ok(out)
    }

    /// Interleave one block and tag it with its logical length.
    ///
    /// # Errors
    /// `InterleaveError::BlockOverflow` if `bits` exceeds the grid.
    pub fn encode_block(&self, bits: &[bool]) -> Result<InterleavedBlock> {
        Ok(InterleavedBlock {
            bits: self.encode(bits)?,
            logical_len: bits.len(),
        })
    }

    /// De-interleave a tagged block, reading back exactly `logical_len` bits.
    ///
    /// # Errors
    /// `InterleaveError::BlockOverflow` if the tag exceeds the grid or the
    /// bits supplied.
    pub fn decode_block(&self, block: &InterleavedBlock) -> Result<Vec<bool>> {
        if block.logical_len > block.bits.len() {
            return Err(InterleaveError::BlockOverflow {
                len: block.logical_len,
                capacity: block.bits.len(),
            }
            .into());
        }
        self.decode(&block.bits[..block.logical_len])
    }

    /// Interleave a stream of any length block by block.
    ///
    /// Every block is full except possibly the last, whose logical length is
    /// recorded in its tag.
    pub fn encode_stream(&self, bits: &[bool]) -> Result<Vec<InterleavedBlock>> {
        bits.chunks(self.capacity())
            .map(|chunk| self.encode_block(chunk))
            .collect()
    }

    /// Inverse of [`encode_stream`](Self::encode_stream).
    pub fn decode_stream(&self, blocks: &[InterleavedBlock]) -> Result<Vec<bool>> {
        let mut out = Vec::with_capacity(blocks.iter().map(|b| b.logical_len).sum());
        for block in blocks {
            out.extend(self.decode_block(block)?);
        }
        Ok(out)
    }

    /// Split a received stream back into the tagged blocks
    /// [`encode_stream`](Self::encode_stream) produced for the same length.
    pub fn split_stream(&self, bits: &[bool]) -> Vec<InterleavedBlock> {
        bits.chunks(self.capacity())
            .map(|chunk| InterleavedBlock {
                bits: chunk.to_vec(),
                logical_len: chunk.len(),
            })
            .collect()
    }

    fn check_len(&self, len: usize) -> Result<()> {
        if len > self.capacity() {
            return Err(InterleaveError::BlockOverflow {
                len,
                capacity: self.capacity(),
            }
            .into());
        }
        Ok(())
    }

    /// Row-major indices of the occupied cells, visited column by column.
    fn column_major_cells(&self, len: usize) -> impl Iterator<Item = usize> {
        let width = self.width;
        let rows = len.div_ceil(width).min(self.depth);
        (0..width)
            .flat_map(move |col| (0..rows).map(move |row| row * width + col))
            .filter(move |&cell| cell < len)
    }
}

/// Interleave `bits` through a `depth × width` grid.
pub fn interleave(bits: &[bool], depth: usize, width: usize) -> Result<Vec<bool>> {
    Interleaver::new(depth, width)?.encode(bits)
}

/// Undo [`interleave`] for the same grid and the same number of bits.
pub fn deinterleave(bits: &[bool], depth: usize, width: usize) -> Result<Vec<bool>> {
    Interleaver::new(depth, width)?.decode(bits)
}
