//! Depth-first candidate generator

use super::Alphabet;
use crate::cancel::CancelToken;

/// Fill `buffer[position..]` with every combination of `alphabet` symbols.
///
/// Symbols are tried in alphabet order at each position and `check` only sees
/// complete candidates. The first `true` from `check` unwinds the whole call
/// stack with the match left in `buffer`.
///
/// The cancel token is polled once per call, so a halt observed at any depth
/// drops that entire subtree.
///
/// `buffer` must be non-empty and `position` inside it; [`super::search`]
/// checks both before the first call.
pub(crate) fn search<F>(
    alphabet: &Alphabet,
    buffer: &mut [u8],
    position: usize,
    check: &mut F,
    cancel: &CancelToken,
) -> bool
where
    F: FnMut(&[u8]) -> bool,
{
    if cancel.is_halted() {
        return false;
    }

    debug_assert!(position < buffer.len(), "position {} outside buffer", position);
    let last = buffer.len() - 1;
    for &symbol in alphabet.symbols() {
        buffer[position] = symbol;

        if position == last {
            if check(buffer) {
                return true;
            }
        } else if search(alphabet, buffer, position + 1, check, cancel) {
            return true;
        }
    }

    false
}
