//! The keyed stream cipher underlying header obfuscation.
//!
//! A classic keyed permutation stream: a 256-byte state table swapped
//! during key schedule, then two running indices that advance by
//! exactly one per output byte. State is owned by one direction of one
//! connection and mutated in place; there is no rewind.

use zeroize::Zeroize;

/// One direction's cipher state.
pub(crate) struct KeyedStream {
    state: [u8; 256],
    i: u8,
    j: u8,
}

impl std::fmt::Debug for KeyedStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeyedStream")
    }
}

impl Drop for KeyedStream {
    fn drop(&mut self) {
        self.state.zeroize();
    }
}

impl KeyedStream {
    /// Run the key schedule and discard the warm-up keystream.
    pub(crate) fn new(key: &[u8], discard: usize) -> Self {
        debug_assert!(!key.is_empty());

        let mut state = [0u8; 256];
        for (i, byte) in state.iter_mut().enumerate() {
            *byte = i as u8;
        }
        let mut j: u8 = 0;
        for i in 0..256 {
            j = j
                .wrapping_add(state[i])
                .wrapping_add(key[i % key.len()]);
            state.swap(i, j as usize);
        }

        let mut stream = Self { state, i: 0, j: 0 };
        for _ in 0..discard {
            stream.next_byte();
        }
        stream
    }

    fn next_byte(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        self.j = self.j.wrapping_add(self.state[self.i as usize]);
        self.state.swap(self.i as usize, self.j as usize);
        let index = self.state[self.i as usize].wrapping_add(self.state[self.j as usize]);
        self.state[index as usize]
    }

    /// XOR the keystream over `data`, advancing by `data.len()` bytes.
    pub(crate) fn apply(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            *byte ^= self.next_byte();
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn identical_keys_produce_identical_keystreams() {
        let mut a = KeyedStream::new(&[1, 2, 3, 4], 0);
        let mut b = KeyedStream::new(&[1, 2, 3, 4], 0);

        let mut data_a = [0u8; 32];
        let mut data_b = [0u8; 32];
        a.apply(&mut data_a);
        b.apply(&mut data_b);
        assert_eq!(data_a, data_b);
        assert_ne!(data_a, [0u8; 32]);
    }

    #[test]
    fn different_keys_diverge() {
        let mut a = KeyedStream::new(&[1, 2, 3, 4], 0);
        let mut b = KeyedStream::new(&[1, 2, 3, 5], 0);

        let mut data_a = [0u8; 32];
        let mut data_b = [0u8; 32];
        a.apply(&mut data_a);
        b.apply(&mut data_b);
        assert_ne!(data_a, data_b);
    }

    #[test]
    fn discard_offsets_the_keystream() {
        let mut warm = KeyedStream::new(&[9u8; 20], 16);
        let mut cold = KeyedStream::new(&[9u8; 20], 0);

        let mut skipped = [0u8; 16];
        cold.apply(&mut skipped);

        let mut from_warm = [0u8; 8];
        let mut from_cold = [0u8; 8];
        warm.apply(&mut from_warm);
        cold.apply(&mut from_cold);
        assert_eq!(from_warm, from_cold);
    }

    #[test]
    fn state_advances_across_calls() {
        let mut stream = KeyedStream::new(&[7u8; 20], 0);
        let mut first = [0u8; 4];
        let mut second = [0u8; 4];
        stream.apply(&mut first);
        stream.apply(&mut second);
        assert_ne!(first, second);

        // A fresh stream reproduces the first block, not the second.
        let mut fresh = KeyedStream::new(&[7u8; 20], 0);
        let mut replay = [0u8; 4];
        fresh.apply(&mut replay);
        assert_eq!(replay, first);
    }
}
