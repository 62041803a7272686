//! Mixed-radix candidate generator
//!
//! Every candidate is the base-`alphabet.len()` representation of its index,
//! most significant digit first, so index order matches the depth-first order
//! of the recursive generator.

use super::Alphabet;
use crate::cancel::CancelToken;

/// Write the candidate for `index` into `buffer`
#[inline]
pub fn fill_candidate(alphabet: &Alphabet, index: u64, buffer: &mut [u8]) {
    let symbols = alphabet.symbols();
    let base = symbols.len() as u64;
    let mut n = index;

    for slot in buffer.iter_mut().rev() {
        *slot = symbols[(n % base) as usize];
        n /= base;
    }
}

/// Candidate at a specific index, or `None` past the end of the search space
pub fn candidate_at(alphabet: &Alphabet, length: usize, index: u64) -> Option<Vec<u8>> {
    let total = alphabet.total_combinations(length)?;
    if index >= total {
        return None;
    }

    let mut buffer = vec![0u8; length];
    fill_candidate(alphabet, index, &mut buffer);
    Some(buffer)
}

/// Walk indices `0..base^len` and stop at the first candidate `check` accepts.
///
/// The cancel token is polled once per index. Callers validate the search
/// space size first (see [`Alphabet::search_space`]); an oversized space is
/// logged and treated as nothing to search.
pub fn search<F>(alphabet: &Alphabet, buffer: &mut [u8], check: &mut F, cancel: &CancelToken) -> bool
where
    F: FnMut(&[u8]) -> bool,
{
    let Some(total) = alphabet.total_combinations(buffer.len()) else {
        tracing::warn!(
            base = %alphabet.len(),
            length = %buffer.len(),
            "Search space does not fit in 64 bits, skipping"
        );
        return false;
    };

    for index in 0..total {
        if cancel.is_halted() {
            return false;
        }

        fill_candidate(alphabet, index, buffer);
        if check(buffer) {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_at() {
        let digits = Alphabet::digits();
        assert_eq!(candidate_at(&digits, 4, 0), Some(b"0000".to_vec()));
        assert_eq!(candidate_at(&digits, 4, 1), Some(b"0001".to_vec()));
        assert_eq!(candidate_at(&digits, 4, 10), Some(b"0010".to_vec()));
        assert_eq!(candidate_at(&digits, 4, 9_999), Some(b"9999".to_vec()));
        assert_eq!(candidate_at(&digits, 4, 10_000), None);

        let letters = Alphabet::new(b"ab".to_vec()).unwrap();
        assert_eq!(candidate_at(&letters, 3, 6), Some(b"bba".to_vec()));
    }

    #[test]
    fn test_boundary_candidates_present() {
        // 10^L must be exact: the first and last index are both generated once
        let digits = Alphabet::digits();
        let mut buffer = [0u8; 5];
        let mut first = None;
        let mut last = None;
        let mut count = 0u64;

        let found = search(
            &digits,
            &mut buffer,
            &mut |candidate: &[u8]| {
                if first.is_none() {
                    first = Some(candidate.to_vec());
                }
                last = Some(candidate.to_vec());
                count += 1;
                false
            },
            &CancelToken::new(),
        );

        assert!(!found);
        assert_eq!(count, 100_000);
        assert_eq!(first, Some(b"00000".to_vec()));
        assert_eq!(last, Some(b"99999".to_vec()));
    }

    #[test]
    fn test_finds_target() {
        let mut buffer = [0u8; 6];
        let mut checked = 0u64;

        let found = search(
            &Alphabet::digits(),
            &mut buffer,
            &mut |candidate: &[u8]| {
                checked += 1;
                candidate == b"123456"
            },
            &CancelToken::new(),
        );

        assert!(found);
        assert_eq!(&buffer, b"123456");
        assert_eq!(checked, 123_457);
    }

    #[test]
    fn test_halt_checked_per_index() {
        let token = CancelToken::new();
        let mut buffer = [0u8; 4];
        let mut checked = 0u64;

        let found = search(
            &Alphabet::digits(),
            &mut buffer,
            &mut |_: &[u8]| {
                checked += 1;
                if checked == 25 {
                    token.expire();
                }
                false
            },
            &token,
        );

        assert!(!found);
        assert_eq!(checked, 25);
        // The buffer still holds a whole candidate
        assert_eq!(&buffer, b"0024");
    }
}
