//! Byte-signature scanning over an undelimited asset blob.
//!
//! `.preinstanced` files carry no container index; mesh chunks are found by
//! scanning for a fixed header signature, some bytes of which vary per file.

/// A fixed-length signature where `None` positions match any byte.
pub type Signature = [Option<u8>];

/// Signature of a mesh chunk header: `33 EA 00 00 ?? ?? ?? ?? 2D 00 02 1C`.
pub const MESH_CHUNK_SIGNATURE: [Option<u8>; 12] = [
    Some(0x33),
    Some(0xEA),
    Some(0x00),
    Some(0x00),
    None,
    None,
    None,
    None,
    Some(0x2D),
    Some(0x00),
    Some(0x02),
    Some(0x1C),
];

/// Find every occurrence of `signature` in `haystack`, left to right and
/// non-overlapping (the scan resumes at the end of each match). Yields the
/// offset one past each match, lazily.
pub fn find_all<'a>(
    haystack: &'a [u8],
    signature: &'a Signature,
) -> impl Iterator<Item = usize> + 'a {
    let sig_len = signature.len();
    let mut pos = 0usize;
    std::iter::from_fn(move || {
        if sig_len == 0 {
            return None;
        }
        while pos + sig_len <= haystack.len() {
            let matched = haystack[pos..pos + sig_len]
                .iter()
                .zip(signature)
                .all(|(&byte, expected)| expected.is_none_or(|want| byte == want));
            if matched {
                pos += sig_len;
                return Some(pos);
            }
            pos += 1;
        }
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIG: [Option<u8>; 4] = [Some(0xAA), None, Some(0xBB), Some(0xCC)];

    #[test]
    fn wildcards_match_any_byte() {
        let data = [0x00, 0xAA, 0x42, 0xBB, 0xCC, 0x00];
        let ends: Vec<_> = find_all(&data, &SIG).collect();
        assert_eq!(ends, vec![5]);
    }

    #[test]
    fn no_match_is_empty() {
        let data = [0xAA, 0x42, 0xBB, 0xBB];
        assert_eq!(find_all(&data, &SIG).count(), 0);
        assert_eq!(find_all(&[], &SIG).count(), 0);
    }

    #[test]
    fn matches_are_non_overlapping() {
        // Back-to-back occurrences, plus one straddling candidate that must
        // not be re-examined once the first match consumes its bytes.
        let data = [0xAA, 0x01, 0xBB, 0xCC, 0xAA, 0x02, 0xBB, 0xCC];
        let ends: Vec<_> = find_all(&data, &SIG).collect();
        assert_eq!(ends, vec![4, 8]);
    }

    #[test]
    fn exact_bytes_must_match() {
        let data = [0xAA, 0x01, 0xBB, 0xCD];
        assert_eq!(find_all(&data, &SIG).count(), 0);
    }

    #[test]
    fn chunk_signature_matches_real_header_bytes() {
        let mut data = vec![0u8; 3];
        data.extend_from_slice(&[
            0x33, 0xEA, 0x00, 0x00, 0xDE, 0xAD, 0xBE, 0xEF, 0x2D, 0x00, 0x02, 0x1C,
        ]);
        let ends: Vec<_> = find_all(&data, &MESH_CHUNK_SIGNATURE).collect();
        assert_eq!(ends, vec![15]);
    }
}
