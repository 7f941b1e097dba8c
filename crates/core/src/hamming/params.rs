//! Code geometry derived from the order parameter.
//!
//! For order `r` the code has length `n = 2^r - 1` and dimension
//! `k = n - r`. Codeword positions are 1-indexed. Position `p` holds a
//! parity bit iff `p` is a power of two; every other position holds a data
//! bit, and data bits are numbered `0..k` in ascending position order.
//!
//! # Coverage
//!
//! The parity bit at position `2^m` covers every position whose binary
//! representation has bit `m` set. Folding the positions of all set bits
//! together with XOR therefore yields, in bit `m`, the parity over the
//! positions covered by parity bit `m`. Encoding and decoding both use this
//! fold (see [`PositionRoleTable::position_fold`]).

use crate::error::{CodeError, Result};
use std::fmt;
use std::sync::Arc;

/// Smallest supported order (the (3, 1) repetition code).
pub const MIN_ORDER: u32 = 2;

/// Largest supported order; codewords are 2^24 - 1 bits long.
pub const MAX_ORDER: u32 = 24;

/// Role of a single codeword position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionRole {
    /// Parity bit at position `2^bit`
    Parity { bit: u32 },
    /// The `index`-th data bit
    Data { index: usize },
}

/// Role of every position of an `n`-bit codeword.
///
/// Built once per [`CodeParameters`] and shared by every encoder and decoder
/// that uses those parameters.
#[derive(Debug, PartialEq, Eq)]
pub struct PositionRoleTable {
    /// Role of position `p`, stored at `p - 1`
    roles: Vec<PositionRole>,

    /// 1-indexed positions of the data bits, ascending
    data_positions: Vec<usize>,

    /// 1-indexed positions of the parity bits, ascending
    parity_positions: Vec<usize>,
}

impl PositionRoleTable {
    fn build(order: u32, length: usize) -> Self {
        let mut roles = Vec::with_capacity(length);
        let mut data_positions = Vec::with_capacity(length - order as usize);
        let mut parity_positions = Vec::with_capacity(order as usize);

        for position in 1..=length {
            if position.is_power_of_two() {
                roles.push(PositionRole::Parity {
                    bit: position.trailing_zeros(),
                });
                parity_positions.push(position);
            } else {
                roles.push(PositionRole::Data {
                    index: data_positions.len(),
                });
                data_positions.push(position);
            }
        }

        Self {
            roles,
            data_positions,
            parity_positions,
        }
    }

    /// Role of the 1-indexed `position`, or `None` outside `[1, n]`.
    pub fn role(&self, position: usize) -> Option<PositionRole> {
        position
            .checked_sub(1)
            .and_then(|i| self.roles.get(i).copied())
    }

    /// 1-indexed data positions in ascending order.
    pub fn data_positions(&self) -> &[usize] {
        &self.data_positions
    }

    /// 1-indexed parity positions (`1, 2, 4, ...`).
    pub fn parity_positions(&self) -> &[usize] {
        &self.parity_positions
    }

    /// XOR of the 1-indexed positions of every set bit in `bits`.
    ///
    /// Bit `m` of the result is the parity of all bits at positions whose
    /// index has bit `m` set. Over a received codeword this is the syndrome;
    /// over a codeword with zeroed parity bits it gives the parity values.
    pub fn position_fold(bits: &[bool]) -> usize {
        bits.iter()
            .enumerate()
            .filter(|&(_, &bit)| bit)
            .fold(0, |acc, (i, _)| acc ^ (i + 1))
    }

    /// Positions covered by the parity bit at `2^bit`, including itself.
    pub fn coverage(&self, bit: u32) -> impl Iterator<Item = usize> + '_ {
        (1..=self.roles.len()).filter(move |&p| (p >> bit) & 1 == 1)
    }
}

/// Geometry of a Hamming code of a given order.
///
/// Cloning is cheap: the position table is shared.
#[derive(Clone)]
pub struct CodeParameters {
    order: u32,
    length: usize,
    dimension: usize,
    roles: Arc<PositionRoleTable>,
}

impl CodeParameters {
    /// Build the parameters for order `r`.
    ///
    /// # Errors
    /// `CodeError::InvalidOrder` if `r` is outside `[MIN_ORDER, MAX_ORDER]`.
    pub fn new(order: u32) -> Result<Self> {
        if !(MIN_ORDER..=MAX_ORDER).contains(&order) {
            return Err(CodeError::InvalidOrder {
                order,
                min: MIN_ORDER,
                max: MAX_ORDER,
            }
            .into());
        }

        let length = (1usize << order) - 1;
        let dimension = length - order as usize;

        Ok(Self {
            order,
            length,
            dimension,
            roles: Arc::new(PositionRoleTable::build(order, length)),
        })
    }

    /// The order `r`.
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Codeword length `n = 2^r - 1`.
    pub fn codeword_len(&self) -> usize {
        self.length
    }

    /// Message length `k = n - r`.
    pub fn message_len(&self) -> usize {
        self.dimension
    }

    /// Code rate `k / n`.
    pub fn rate(&self) -> f64 {
        self.dimension as f64 / self.length as f64
    }

    /// Shared position role table.
    pub fn roles(&self) -> &PositionRoleTable {
        &self.roles
    }

    pub(crate) fn check_message_len(&self, actual: usize) -> Result<()> {
        check_len(self.dimension, actual)
    }

    pub(crate) fn check_codeword_len(&self, actual: usize) -> Result<()> {
        check_len(self.length, actual)
    }

    #[cfg(test)]
    pub(crate) fn shares_table_with(&self, other: &CodeParameters) -> bool {
        Arc::ptr_eq(&self.roles, &other.roles)
    }
}

fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(CodeError::LengthMismatch { expected, actual }.into());
    }
    Ok(())
}

impl PartialEq for CodeParameters {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl Eq for CodeParameters {}

impl fmt::Debug for CodeParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeParameters")
            .field("order", &self.order)
            .field("n", &self.length)
            .field("k", &self.dimension)
            .finish()
    }
}

impl fmt::Display for CodeParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hamming({}, {})", self.length, self.dimension)
    }
}
