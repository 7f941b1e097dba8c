//! Per-block diagnostic bundles.
//!
//! These are produced by the simulator for every interleaving block and are
//! never modified afterwards. Rendering helpers return strings; printing is
//! left to the caller.

use crate::bits::format_bits;
use crate::hamming::{Codeword, Decoded};

/// Outcome of one codeword compared against the message that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodewordOutcome {
    /// No error detected, message intact
    Clean,
    /// A single error was corrected, message intact
    Corrected,
    /// A correction was applied but the message is wrong (two or more flips)
    Miscorrected,
    /// Syndrome was zero but the message is wrong (flips formed a codeword)
    Undetected,
}

impl CodewordOutcome {
    /// Classify a decode result against the original message.
    pub fn classify(original: &[bool], decoded: &Decoded) -> Self {
        let intact = decoded.message.bits() == original;
        match (decoded.error_detected, intact) {
            (false, true) => CodewordOutcome::Clean,
            (true, true) => CodewordOutcome::Corrected,
            (true, false) => CodewordOutcome::Miscorrected,
            (false, false) => CodewordOutcome::Undetected,
        }
    }

    /// Whether the message arrived intact.
    pub fn is_success(self) -> bool {
        matches!(self, CodewordOutcome::Clean | CodewordOutcome::Corrected)
    }
}

/// Everything produced on the sending side for one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingResult {
    /// Original messages, one per row
    pub messages: Vec<Vec<bool>>,

    /// Codewords, one per message
    pub codewords: Vec<Codeword>,

    /// Codeword bits in transmission order
    pub interleaved: Vec<bool>,
}

impl EncodingResult {
    /// All message bits concatenated.
    pub fn input_stream(&self) -> Vec<bool> {
        self.messages.concat()
    }

    /// `message => codeword` lines.
    pub fn conversion_lines(&self) -> Vec<String> {
        self.messages
            .iter()
            .zip(&self.codewords)
            .map(|(message, codeword)| format!("{} => {}", format_bits(message), codeword))
            .collect()
    }

    /// Transmitted stream cut into rows of `width` bits.
    pub fn interleaved_rows(&self, width: usize) -> Vec<String> {
        rows(&self.interleaved, width)
    }
}

/// Everything produced on the receiving side for one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodingResult {
    /// Bits as they came off the channel
    pub received: Vec<bool>,

    /// Received words after de-interleaving, before correction
    pub deinterleaved: Vec<Vec<bool>>,

    /// Decoder output per word
    pub decoded: Vec<Decoded>,
}

impl DecodingResult {
    /// All decoded message bits concatenated.
    pub fn result_stream(&self) -> Vec<bool> {
        self.decoded
            .iter()
            .flat_map(|d| d.message.iter().copied())
            .collect()
    }

    /// Corrected position of each word (`None` where the syndrome was zero).
    pub fn corrected_positions(&self) -> Vec<Option<usize>> {
        self.decoded.iter().map(|d| d.corrected_position).collect()
    }

    /// Number of words in which an error was detected.
    pub fn error_count(&self) -> usize {
        self.decoded.iter().filter(|d| d.error_detected).count()
    }

    /// `received => corrected => message` lines.
    pub fn conversion_lines(&self) -> Vec<String> {
        self.deinterleaved
            .iter()
            .zip(&self.decoded)
            .map(|(received, d)| {
                format!("{} => {} => {}", format_bits(received), d.codeword, d.message)
            })
            .collect()
    }

    /// Received stream cut into rows of `width` bits.
    pub fn received_rows(&self, width: usize) -> Vec<String> {
        rows(&self.received, width)
    }
}

fn rows(bits: &[bool], width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    bits.chunks(width).map(format_bits).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::parse_bits;
    use crate::hamming::{CodeParameters, HammingDecoder, HammingEncoder};

    #[test]
    fn test_classify() {
        let params = CodeParameters::new(3).unwrap();
        let mut enc = HammingEncoder::new(params.clone());
        let mut dec = HammingDecoder::new(params);

        let message = parse_bits("1011").unwrap();
        let clean = enc.encode(&message).unwrap().to_vec();

        let decoded = dec.decode(&clean).unwrap();
        assert_eq!(CodewordOutcome::classify(&message, &decoded), CodewordOutcome::Clean);

        let mut one = clean.clone();
        one[2] = !one[2];
        let decoded = dec.decode(&one).unwrap();
        assert_eq!(
            CodewordOutcome::classify(&message, &decoded),
            CodewordOutcome::Corrected
        );

        let mut two = clean.clone();
        two[0] = !two[0];
        two[1] = !two[1];
        let decoded = dec.decode(&two).unwrap();
        let outcome = CodewordOutcome::classify(&message, &decoded);
        assert_eq!(outcome, CodewordOutcome::Miscorrected);
        assert!(!outcome.is_success());

        // flipping 1, 2 and 3 turns the word into another codeword
        let mut three = two;
        three[2] = !three[2];
        let decoded = dec.decode(&three).unwrap();
        assert_eq!(
            CodewordOutcome::classify(&message, &decoded),
            CodewordOutcome::Undetected
        );
    }

    #[test]
    fn test_rendering() {
        let params = CodeParameters::new(3).unwrap();
        let mut enc = HammingEncoder::new(params);
        let message = parse_bits("1011").unwrap();
        let codeword = enc.encode(&message).unwrap();

        let result = EncodingResult {
            messages: vec![message],
            interleaved: codeword.to_vec(),
            codewords: vec![codeword],
        };
        assert_eq!(result.conversion_lines(), vec!["1011 => 0110011"]);
        assert_eq!(result.interleaved_rows(4), vec!["0110", "011"]);
        assert_eq!(result.input_stream(), parse_bits("1011").unwrap());
    }
}
