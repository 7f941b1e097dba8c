//! Whole-buffer transfer of arbitrary byte data.
//!
//! Data is cut into `k`-bit messages, encoded, interleaved across the whole
//! stream in blocks of `depth` codewords (the final block may be partial),
//! sent through a channel and decoded back to bytes. [`encode_to_container`]
//! and [`decode_from_container`] split the two halves so the encoded stream
//! can be stored between them.

use crate::bits::{bits_to_bytes, bytes_to_bits, hamming_distance};
use crate::channel::BitChannel;
use crate::container::{parse_container, serialize_container, ContainerHeader};
use crate::error::{Error, Result};
use crate::hamming::{CodeParameters, Decoded, HammingDecoder, HammingEncoder};
use crate::interleaver::Interleaver;
use crate::metrics::{BurstTracker, Metrics};
use crate::result::CodewordOutcome;
use crate::source::{ByteSource, MessageSource};
use tracing::debug;

/// Encoder and decoder for whole byte buffers.
#[derive(Debug)]
pub struct TransferCodec {
    encoder: HammingEncoder,
    decoder: HammingDecoder,
    interleaver: Interleaver,
}

/// Result of decoding a stream back into bytes.
#[derive(Debug, Clone)]
pub struct DecodedPayload {
    /// Recovered bytes (exactly the original length)
    pub data: Vec<u8>,

    /// Decoder output per codeword
    pub decoded: Vec<Decoded>,
}

impl DecodedPayload {
    /// Codewords in which an error was detected and a bit flipped back.
    pub fn corrections(&self) -> usize {
        self.decoded.iter().filter(|d| d.error_detected).count()
    }
}

impl TransferCodec {
    /// Create a codec for order `order` and `depth` codewords per block.
    pub fn new(order: u32, depth: usize) -> Result<Self> {
        let params = CodeParameters::new(order)?;
        let interleaver = Interleaver::new(depth, params.codeword_len())?;
        Ok(Self {
            encoder: HammingEncoder::new(params.clone()),
            decoder: HammingDecoder::new(params),
            interleaver,
        })
    }

    /// Code parameters in use.
    pub fn params(&self) -> &CodeParameters {
        self.encoder.params()
    }

    /// Codewords per interleaving block.
    pub fn depth(&self) -> usize {
        self.interleaver.depth()
    }

    /// Encode and interleave `data`, returning the stream in transmission order.
    pub fn encode(&mut self, data: &[u8]) -> Result<Vec<bool>> {
        let k = self.params().message_len();
        let mut source = ByteSource::new(data);
        let mut codewords = Vec::new();
        while let Some(message) = source.next_message(k) {
            codewords.extend_from_slice(self.encoder.encode(&message)?.bits());
        }

        let stream: Vec<bool> = self
            .interleaver
            .encode_stream(&codewords)?
            .into_iter()
            .flat_map(|block| block.bits)
            .collect();

        debug!(
            bytes = data.len(),
            stream_bits = stream.len(),
            padding_bits = source.padding_bits(),
            "data encoded"
        );
        Ok(stream)
    }

    /// Decode a received stream back into `data_len` bytes.
    ///
    /// # Errors
    /// `Error::Config` if the stream is not a whole number of codewords or is
    /// too short for `data_len` bytes.
    pub fn decode(&mut self, stream: &[bool], data_len: usize) -> Result<DecodedPayload> {
        let data_bits = data_len
            .checked_mul(8)
            .ok_or_else(|| Error::Config(format!("data length {data_len} bytes is too large")))?;
        let n = self.params().codeword_len();
        if stream.len() % n != 0 {
            return Err(Error::Config(format!(
                "stream of {} bits is not a multiple of the codeword length {n}",
                stream.len()
            )));
        }

        let blocks = self.interleaver.split_stream(stream);
        let codewords = self.interleaver.decode_stream(&blocks)?;

        let mut decoded = Vec::with_capacity(codewords.len() / n);
        let mut bits = Vec::with_capacity(codewords.len());
        for word in codewords.chunks(n) {
            let d = self.decoder.decode(word)?;
            bits.extend_from_slice(d.message.bits());
            decoded.push(d);
        }

        if bits.len() < data_bits {
            return Err(Error::Config(format!(
                "stream holds {} data bits, {data_bits} required",
                bits.len()
            )));
        }
        bits.truncate(data_bits);

        Ok(DecodedPayload {
            data: bits_to_bytes(&bits),
            decoded,
        })
    }
}

/// Encode `data`, send it through `channel` and wrap the received stream in a
/// container.
pub fn encode_to_container<C: BitChannel>(
    data: &[u8],
    order: u32,
    depth: usize,
    channel: &mut C,
) -> Result<Vec<u8>> {
    let mut codec = TransferCodec::new(order, depth)?;
    let depth_field = u32::try_from(depth)
        .map_err(|_| Error::Config(format!("depth {depth} does not fit the container")))?;
    let header = ContainerHeader::for_data(codec.params(), depth_field, data.len() as u64)?;

    let stream = codec.encode(data)?;
    let received = channel.transmit(&stream);
    serialize_container(&header, &received)
}

/// Parse a container and decode its stream with the parameters it carries.
pub fn decode_from_container(bytes: &[u8]) -> Result<DecodedPayload> {
    let container = parse_container(bytes)?;
    let header = container.header;
    debug!(
        order = header.order,
        depth = header.depth,
        data_len = header.data_len,
        "container parsed"
    );

    let mut codec = TransferCodec::new(u32::from(header.order), header.depth as usize)?;
    codec.decode(&container.payload, header.data_len as usize)
}

/// Outcome of an in-memory transfer.
#[derive(Debug, Clone)]
pub struct TransferReport {
    /// Bytes recovered by the receiver
    pub received: Vec<u8>,

    /// Counters for the transfer (accuracy counts original data bits only)
    pub metrics: Metrics,

    /// Original bytes that arrived altered
    pub byte_errors: usize,
}

impl TransferReport {
    /// Whether the data arrived unchanged.
    pub fn is_exact(&self) -> bool {
        self.byte_errors == 0 && self.metrics.bit_errors == 0
    }
}

/// Encode `data`, send it through `channel` and decode it, measuring accuracy.
pub fn transfer<C: BitChannel>(
    data: &[u8],
    order: u32,
    depth: usize,
    channel: &mut C,
) -> Result<TransferReport> {
    let mut codec = TransferCodec::new(order, depth)?;
    let mut metrics = Metrics::new();
    let mut bursts = BurstTracker::new();

    let stream = codec.encode(data)?;
    let received = channel.transmit(&stream);
    metrics.record_channel(&stream, &received, &mut bursts);

    let payload = codec.decode(&received, data.len())?;

    let k = codec.params().message_len();
    let mut original = bytes_to_bits(data);
    original.resize(payload.decoded.len() * k, false);
    for (message, d) in original.chunks(k).zip(&payload.decoded) {
        metrics.record_codeword(CodewordOutcome::classify(message, d));
    }

    let data_bits = data.len() * 8;
    let bit_errors = hamming_distance(&original[..data_bits], &bytes_to_bits(&payload.data));
    metrics.record_accuracy(data_bits as u64, bit_errors as u64);
    metrics.blocks = stream.len().div_ceil(codec.interleaver.capacity()) as u64;
    metrics.complete();

    let byte_errors = data
        .iter()
        .zip(&payload.data)
        .filter(|(a, b)| a != b)
        .count();

    Ok(TransferReport {
        received: payload.data,
        metrics,
        byte_errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{BurstChannelConfig, BurstErrorChannel, ChannelStats};

    /// Flips every `period`-th transmitted bit.
    struct PeriodicChannel {
        period: u64,
        sent: u64,
    }

    impl BitChannel for PeriodicChannel {
        fn step(&mut self, bit: bool) -> bool {
            self.sent += 1;
            if self.sent % self.period == 0 {
                !bit
            } else {
                bit
            }
        }

        fn stats(&self) -> ChannelStats {
            ChannelStats {
                bits_sent: self.sent,
                bits_flipped: self.sent / self.period,
                bits_in_bad: 0,
            }
        }
    }

    #[test]
    fn test_codec_roundtrip() {
        let data = b"hamming codes correct single bit errors";
        for order in 2..=6 {
            for depth in [1, 3, 8] {
                let mut codec = TransferCodec::new(order, depth).unwrap();
                let stream = codec.encode(data).unwrap();
                let decoded = codec.decode(&stream, data.len()).unwrap();
                assert_eq!(decoded.data, data, "order {order} depth {depth}");
                assert_eq!(decoded.corrections(), 0);
            }
        }
    }

    #[test]
    fn test_empty_data() {
        let mut codec = TransferCodec::new(3, 4).unwrap();
        let stream = codec.encode(&[]).unwrap();
        assert!(stream.is_empty());
        assert!(codec.decode(&stream, 0).unwrap().data.is_empty());
    }

    #[test]
    fn test_perfect_transfer_is_exact() {
        let data: Vec<u8> = (0..=255).collect();
        let mut channel = BurstErrorChannel::new(BurstChannelConfig::perfect(1)).unwrap();
        let report = transfer(&data, 4, 5, &mut channel).unwrap();

        assert!(report.is_exact());
        assert_eq!(report.received, data);
        assert_eq!(report.metrics.bits_transferred, 256 * 8);
        assert_eq!(report.metrics.success_rate_percent(), 100.0);
    }

    #[test]
    fn test_sparse_errors_corrected() {
        // n = 7, so one flip per 7 bits lands in a different codeword each time
        let data = b"sparse errors";
        let mut channel = PeriodicChannel { period: 7, sent: 0 };
        let report = transfer(data, 3, 1, &mut channel).unwrap();

        assert!(report.is_exact());
        assert!(report.metrics.codewords_corrected > 0);
        assert_eq!(report.metrics.codewords_failed(), 0);
    }

    #[test]
    fn test_container_roundtrip_through_channel() {
        // 36 bytes -> 27 codewords of 15 bits -> 9 blocks of 45 bits,
        // one flip per block
        let data = b"container carries its own parameters";
        let mut channel = PeriodicChannel { period: 45, sent: 0 };
        let bytes = encode_to_container(data, 4, 3, &mut channel).unwrap();

        let decoded = decode_from_container(&bytes).unwrap();
        assert_eq!(decoded.data, data);
        assert!(decoded.corrections() > 0);
    }

    #[test]
    fn test_decode_rejects_ragged_stream() {
        let mut codec = TransferCodec::new(3, 2).unwrap();
        assert!(matches!(
            codec.decode(&[false; 10], 1),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_decode_rejects_oversized_length() {
        let mut codec = TransferCodec::new(3, 2).unwrap();
        assert!(matches!(
            codec.decode(&[], usize::MAX),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            codec.decode(&[false; 14], usize::MAX / 8 + 1),
            Err(Error::Config(_))
        ));
        assert!(codec.decode(&[], 0).unwrap().data.is_empty());
    }
}
