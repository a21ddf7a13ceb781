/// ASCII code of the lowest quality symbol, `!`.
pub const OFFSET: u8 = 33;

/// Highest Phred score representable in the printable-ASCII alphabet (`~`).
pub const MAX_SCORE: u8 = b'~' - OFFSET;

/// Decodes a single Phred+33 quality symbol, returning `None` for anything outside `!`..=`~`.
#[inline(always)]
pub fn decode(symbol: u8) -> Option<u8> {
    match symbol {
        b'!'..=b'~' => Some(symbol - OFFSET),
        _ => None,
    }
}

/// Encodes a Phred score back into its Phred+33 symbol.
///
/// # Panics
///
/// Panics if `score` is greater than [`MAX_SCORE`]. Scores produced by [`decode`] are always in
/// range.
#[inline(always)]
pub fn encode(score: u8) -> u8 {
    assert!(
        score <= MAX_SCORE,
        "Phred score {score} cannot be represented in Phred+33"
    );
    score + OFFSET
}

/// Decodes a full quality line. On failure, returns the 0-based position and value of the first
/// offending byte.
pub fn decode_all(quals: &[u8]) -> Result<Vec<u8>, (usize, u8)> {
    quals
        .iter()
        .enumerate()
        .map(|(i, &q)| decode(q).ok_or((i, q)))
        .collect()
}

/// Re-encodes a slice of Phred scores into a quality line.
pub fn encode_all(scores: &[u8]) -> Vec<u8> {
    scores.iter().map(|&s| encode(s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_bounds() {
        assert_eq!(decode(b'!'), Some(0));
        assert_eq!(decode(b'I'), Some(40));
        assert_eq!(decode(b'~'), Some(93));
        assert_eq!(MAX_SCORE, 93);
    }

    #[test]
    fn rejects_outside_alphabet() {
        assert_eq!(decode(b' '), None);
        assert_eq!(decode(0x7f), None);
        assert_eq!(decode_all(b"II II"), Err((2, b' ')));
    }

    #[test]
    fn full_alphabet_round_trips() {
        let alphabet: Vec<u8> = (b'!'..=b'~').collect();
        assert_eq!(alphabet.len(), 94);

        let scores = decode_all(&alphabet).unwrap();
        assert_eq!(scores, (0..=93).collect::<Vec<u8>>());
        assert_eq!(encode_all(&scores), alphabet);
    }

    #[test]
    #[should_panic]
    fn encode_out_of_range() {
        encode(94);
    }
}
