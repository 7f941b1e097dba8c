//! Encoded stream container serialization and parsing.
//!
//! A container packages an interleaved, Hamming-encoded bit stream together
//! with everything the receiver needs to decode it. The decoder never has to
//! guess parameters from a file name.
//!
//! # Container Format
//!
//! ```text
//! +-------------------+
//! | Magic (4 bytes)   |  0x48 0x4D 0x4E 0x47 ("HMNG")
//! +-------------------+
//! | version (1)       |  currently 1
//! +-------------------+
//! | order (1)         |  Hamming order r
//! +-------------------+
//! | depth (4)         |  u32 codewords per interleaving block
//! +-------------------+
//! | data_len (8)      |  u64 original data length in bytes
//! +-------------------+
//! | payload_bits (8)  |  u64 encoded stream length in bits
//! +-------------------+
//! | crc32 (4)         |  u32 checksum of the header fields
//! +-------------------+
//! | payload           |  stream bits packed MSB-first,
//! | (variable)        |  ceil(payload_bits / 8) bytes
//! +-------------------+
//! ```
//!
//! # CRC Coverage
//!
//! The CRC32 covers version, order, depth, data_len and payload_bits. The
//! payload is not covered: it carries channel errors on purpose and is
//! protected by the code itself.

use crate::bits::{bits_to_bytes, BitReader};
use crate::error::{ContainerError, Error, Result};
use crate::hamming::CodeParameters;

/// Magic number for containers: "HMNG"
const MAGIC: [u8; 4] = [0x48, 0x4D, 0x4E, 0x47];

/// Current container version
const VERSION: u8 = 1;

/// Size of the container header in bytes
pub const HEADER_SIZE: usize = 30;

/// Parameters stored in a container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Hamming order `r`
    pub order: u8,

    /// Codewords per interleaving block
    pub depth: u32,

    /// Original data length in bytes
    pub data_len: u64,

    /// Encoded stream length in bits
    pub payload_bits: u64,
}

impl ContainerHeader {
    /// Build the header for `data_len` bytes encoded with `params`.
    ///
    /// # Errors
    /// `ContainerError::Inconsistent` if the order or the stream length does
    /// not fit the header fields.
    pub fn for_data(params: &CodeParameters, depth: u32, data_len: u64) -> Result<Self> {
        let order = u8::try_from(params.order())
            .map_err(|_| ContainerError::Inconsistent(format!("order {} too large", params.order())))?;
        let payload_bits = payload_bits_for(params, data_len).ok_or_else(|| {
            ContainerError::Inconsistent(format!("{data_len} bytes overflow the stream length"))
        })?;

        Ok(Self {
            order,
            depth,
            data_len,
            payload_bits,
        })
    }

    /// Check the header against the code it names.
    ///
    /// # Errors
    /// - `CodeError::InvalidOrder` for an unsupported order
    /// - `ContainerError::Inconsistent` for zero depth or a stream length that
    ///   does not match `data_len`
    pub fn validate(&self) -> Result<CodeParameters> {
        let params = CodeParameters::new(u32::from(self.order))?;
        if self.depth == 0 {
            return Err(ContainerError::Inconsistent("depth is zero".to_string()).into());
        }

        let expected = payload_bits_for(&params, self.data_len);
        if expected != Some(self.payload_bits) {
            return Err(ContainerError::Inconsistent(format!(
                "{} payload bits do not match {} data bytes for {}",
                self.payload_bits, self.data_len, params
            ))
            .into());
        }
        Ok(params)
    }

    /// Payload size in bytes.
    pub fn payload_bytes(&self) -> usize {
        (self.payload_bits as usize).div_ceil(8)
    }
}

/// A parsed container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    /// Validated header
    pub header: ContainerHeader,

    /// Encoded stream, exactly `header.payload_bits` long
    pub payload: Vec<bool>,
}

/// Length in bits of the encoded stream for `data_len` bytes.
///
/// The data is cut into `k`-bit messages (the last one zero-padded) and each
/// becomes an `n`-bit codeword. Returns `None` on overflow.
pub fn payload_bits_for(params: &CodeParameters, data_len: u64) -> Option<u64> {
    let data_bits = data_len.checked_mul(8)?;
    let messages = data_bits.div_ceil(params.message_len() as u64);
    messages.checked_mul(params.codeword_len() as u64)
}

/// Serialize a header and its encoded stream.
///
/// # Errors
/// `ContainerError::PayloadLengthMismatch` if `payload` is not exactly
/// `header.payload_bits` long.
pub fn serialize_container(header: &ContainerHeader, payload: &[bool]) -> Result<Vec<u8>> {
    if payload.len() as u64 != header.payload_bits {
        return Err(ContainerError::PayloadLengthMismatch {
            expected: header.payload_bits as usize,
            actual: payload.len(),
        }
        .into());
    }

    let crc32 = compute_crc(header);
    let packed = bits_to_bytes(payload);

    let mut bytes = Vec::with_capacity(HEADER_SIZE + packed.len());
    bytes.extend_from_slice(&MAGIC);
    bytes.push(VERSION);
    bytes.push(header.order);
    bytes.extend_from_slice(&header.depth.to_le_bytes());
    bytes.extend_from_slice(&header.data_len.to_le_bytes());
    bytes.extend_from_slice(&header.payload_bits.to_le_bytes());
    bytes.extend_from_slice(&crc32.to_le_bytes());
    bytes.extend_from_slice(&packed);

    Ok(bytes)
}

/// Parse a container from bytes.
///
/// # Errors
/// - `ContainerError::TooShort` if the buffer cannot hold a header
/// - `ContainerError::InvalidMagic` / `UnsupportedVersion` for foreign data
/// - `Error::Crc` if the header checksum does not match
/// - `ContainerError::PayloadLengthMismatch` if the payload size is wrong
/// - Header validation errors from [`ContainerHeader::validate`]
pub fn parse_container(bytes: &[u8]) -> Result<Container> {
    if bytes.len() < HEADER_SIZE {
        return Err(ContainerError::TooShort {
            required: HEADER_SIZE,
            actual: bytes.len(),
        }
        .into());
    }

    let magic: [u8; 4] = read_array(bytes, 0);
    if magic != MAGIC {
        return Err(ContainerError::InvalidMagic {
            expected: MAGIC,
            actual: magic,
        }
        .into());
    }

    let version = bytes[4];
    if version != VERSION {
        return Err(ContainerError::UnsupportedVersion(version).into());
    }

    let header = ContainerHeader {
        order: bytes[5],
        depth: u32::from_le_bytes(read_array(bytes, 6)),
        data_len: u64::from_le_bytes(read_array(bytes, 10)),
        payload_bits: u64::from_le_bytes(read_array(bytes, 18)),
    };
    let crc32 = u32::from_le_bytes(read_array(bytes, 26));

    let computed_crc = compute_crc(&header);
    if computed_crc != crc32 {
        return Err(Error::Crc {
            expected: crc32,
            actual: computed_crc,
        });
    }

    header.validate()?;

    let payload_bytes = &bytes[HEADER_SIZE..];
    if payload_bytes.len() != header.payload_bytes() {
        return Err(ContainerError::PayloadLengthMismatch {
            expected: header.payload_bytes(),
            actual: payload_bytes.len(),
        }
        .into());
    }

    let mut reader = BitReader::new(payload_bytes);
    let payload = reader.read_slice(header.payload_bits as usize)?;

    Ok(Container { header, payload })
}

/// Compute CRC32 over the header fields.
fn compute_crc(header: &ContainerHeader) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&[VERSION, header.order]);
    hasher.update(&header.depth.to_le_bytes());
    hasher.update(&header.data_len.to_le_bytes());
    hasher.update(&header.payload_bits.to_le_bytes());
    hasher.finalize()
}

/// Copy `N` bytes starting at `at`. Callers check the length first.
fn read_array<const N: usize>(bytes: &[u8], at: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[at..at + N]);
    out
}
