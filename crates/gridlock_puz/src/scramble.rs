//! The four-digit solution lock
//!
//! The transform works on the *formatted solution*: the non-black letters
//! taken column by column, top to bottom. Locking runs four rounds of
//! per-digit letter shifts, a rotation and an interleave; unlocking runs
//! the inverse rounds in reverse order and then checks the result against
//! the checksum stored at `0x1E`.

use thiserror::Error;

use crate::{BLACK_CELL, Puzzle, region_checksum};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LockError {
    #[error("the solution is not scrambled")]
    NotScrambled,

    #[error("the solution is already scrambled")]
    AlreadyScrambled,

    #[error("key {0} is out of range or contains a zero digit")]
    BadKey(u16),

    #[error("key {0} does not unscramble this solution")]
    WrongKey(u16),

    #[error("no key in 1111..=9999 unscrambles this solution")]
    KeyNotFound,
}

/// Split a key into its four digits, rejecting anything outside
/// 1111..=9999 or containing a zero
fn key_digits(code: u16) -> Result<[u8; 4], LockError> {
    let digits = [
        (code / 1000) % 10,
        (code / 100) % 10,
        (code / 10) % 10,
        code % 10,
    ];

    if code > 9999 || digits.contains(&0) {
        return Err(LockError::BadKey(code));
    }

    Ok(digits.map(|digit| digit as u8))
}

/// One interleave round: the front half of the input lands on the even
/// output positions, the back half on the odd ones
fn interleave(input: &[u8], output: &mut [u8]) {
    let break_at = input.len() / 2;

    for (k, slot) in output.iter_mut().enumerate() {
        *slot = match k % 2 {
            0 => input[break_at + k / 2],
            _ => input[k / 2],
        };
    }
}

/// The inverse round: even positions go back to the front half, odd ones
/// to the back
fn deinterleave(input: &[u8], output: &mut [u8]) {
    let break_at = input.len() / 2;

    for (k, &byte) in input.iter().enumerate() {
        let index = match k % 2 {
            0 => break_at + k / 2,
            _ => k / 2,
        };

        output[index] = byte;
    }
}

/// Move the first `shift` bytes to the tail
fn rotate_left(input: &[u8], shift: usize, output: &mut [u8]) {
    let shift = match input.len() {
        0 => return,
        len => shift % len,
    };

    output[..input.len() - shift].copy_from_slice(&input[shift..]);
    output[input.len() - shift..].copy_from_slice(&input[..shift]);
}

/// Undo [`rotate_left`]: move the last `shift` bytes back to the front
fn rotate_right(input: &[u8], shift: usize, output: &mut [u8]) {
    let shift = match input.len() {
        0 => return,
        len => shift % len,
    };

    output[shift..].copy_from_slice(&input[..input.len() - shift]);
    output[..shift].copy_from_slice(&input[input.len() - shift..]);
}

/// Shift every letter up by its digit, wrapping inside A..=Z
///
/// Corrupt input can put bytes outside A..=Z here; the arithmetic wraps
/// and the round ends in a checksum mismatch.
fn add_digits(letters: &mut [u8], digits: [u8; 4]) {
    for (j, letter) in letters.iter_mut().enumerate() {
        *letter = letter.wrapping_add(digits[j % 4]);
        if *letter > b'Z' {
            *letter -= 26;
        }
    }
}

/// Undo [`add_digits`]
fn subtract_digits(letters: &mut [u8], digits: [u8; 4]) {
    for (j, letter) in letters.iter_mut().enumerate() {
        *letter = letter.wrapping_sub(digits[j % 4]);
        if *letter < b'A' {
            *letter = letter.wrapping_add(26);
        }
    }
}

/// Run the four forward rounds over the formatted solution
fn scramble(letters: &[u8], digits: [u8; 4]) -> Vec<u8> {
    let mut current = letters.to_vec();
    let mut workspace = vec![0; letters.len()];

    for &digit in &digits {
        add_digits(&mut current, digits);
        rotate_left(&current, usize::from(digit), &mut workspace);
        interleave(&workspace, &mut current);
    }

    current
}

/// Run the four inverse rounds in reverse order
fn unscramble(letters: &[u8], digits: [u8; 4]) -> Vec<u8> {
    let mut current = letters.to_vec();
    let mut workspace = vec![0; letters.len()];

    for &digit in digits.iter().rev() {
        deinterleave(&current, &mut workspace);
        rotate_right(&workspace, usize::from(digit), &mut current);
        subtract_digits(&mut current, digits);
    }

    current
}

impl Puzzle {
    /// The non-black solution letters in column-major order, the form the
    /// lock transform works on
    pub(crate) fn formatted_solution(&self) -> Vec<u8> {
        let solution = &self.grids().solution;
        let mut letters = Vec::with_capacity(solution.area());

        for col in 0..solution.width() {
            for row in 0..solution.height() {
                match solution.get(row, col) {
                    Some(BLACK_CELL) | None => {}
                    Some(letter) => letters.push(letter),
                }
            }
        }

        letters
    }

    /// Write formatted letters back into the solution grid, column by
    /// column
    fn unformat_solution(&mut self, letters: &[u8]) {
        let solution = &mut self.grids_mut().solution;
        let mut next = letters.iter();

        for col in 0..solution.width() {
            for row in 0..solution.height() {
                if solution.get(row, col) != Some(BLACK_CELL)
                    && let Some(&letter) = next.next()
                {
                    solution.set(row, col, letter);
                }
            }
        }
    }

    /// Scramble the solution with a four-digit key
    ///
    /// Stores the checksum of the original letters at `0x1E` and sets the
    /// lock tag, so that [`unlock_with_key`](Self::unlock_with_key) can
    /// later recognise the right key.
    pub fn lock_with_key(&mut self, code: u16) -> Result<(), LockError> {
        if self.header().is_locked() {
            return Err(LockError::AlreadyScrambled);
        }

        let digits = key_digits(code)?;

        let letters = self.formatted_solution();
        let cksum = region_checksum(&letters, 0);

        let scrambled = scramble(&letters, digits);
        self.unformat_solution(&scrambled);

        self.lock_set(cksum);
        Ok(())
    }

    /// Unscramble the solution with a four-digit key
    ///
    /// The candidate is only accepted when its checksum matches the one
    /// stored at lock time; a wrong key leaves the puzzle untouched.
    pub fn unlock_with_key(&mut self, code: u16) -> Result<(), LockError> {
        if !self.header().is_locked() {
            return Err(LockError::NotScrambled);
        }

        let digits = key_digits(code)?;

        let letters = self.formatted_solution();
        let candidate = unscramble(&letters, digits);

        if region_checksum(&candidate, 0) != self.header().scrambled_cksum {
            return Err(LockError::WrongKey(code));
        }

        self.unformat_solution(&candidate);
        self.lock_set(0);

        Ok(())
    }

    /// Try every key in ascending order and return the one that verifies
    pub fn brute_force_unlock(&mut self) -> Result<u16, LockError> {
        if !self.header().is_locked() {
            return Err(LockError::NotScrambled);
        }

        for code in 1111..=9999 {
            match self.unlock_with_key(code) {
                Ok(()) => return Ok(code),
                Err(LockError::BadKey(_) | LockError::WrongKey(_)) => continue,
                Err(err) => return Err(err),
            }
        }

        Err(LockError::KeyNotFound)
    }

    /// Mark the solution locked under the given checksum of its real
    /// letters, or unlocked when the checksum is zero
    ///
    /// This only touches the lock metadata; the grid itself is left alone.
    pub fn lock_set(&mut self, cksum: u16) {
        let header = self.header_mut();

        match cksum {
            0 => {
                header.scrambled_tag = 0;
                header.scrambled_cksum = 0;
            }
            cksum => {
                header.scrambled_tag = 4;
                header.scrambled_cksum = cksum;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// 5x2 grid whose column-major letters read HELLOWORLD
    fn hello_world() -> Puzzle {
        let mut puzzle = Puzzle::new();

        puzzle.set_dimensions(5, 2);
        puzzle.set_solution(b"HLOOLELWRD").unwrap();

        puzzle
    }

    #[rstest]
    #[case(1234, [1, 2, 3, 4])]
    #[case(9999, [9, 9, 9, 9])]
    fn keys_split_into_digits(#[case] code: u16, #[case] expected: [u8; 4]) {
        assert_eq!(key_digits(code), Ok(expected));
    }

    #[rstest]
    #[case(1204)]
    #[case(111)]
    #[case(10000)]
    fn zero_digit_keys_are_rejected(#[case] code: u16) {
        assert_eq!(key_digits(code), Err(LockError::BadKey(code)));
    }

    #[test]
    fn interleave_inverts_deinterleave() {
        let input = b"ABCDEFGHIJK";
        let mut scrambled = vec![0; input.len()];
        let mut restored = vec![0; input.len()];

        interleave(input, &mut scrambled);
        deinterleave(&scrambled, &mut restored);

        assert_eq!(restored, input);
    }

    #[test]
    fn rotation_round_trips() {
        let input = b"ABCDEFG";
        let mut rotated = vec![0; input.len()];
        let mut restored = vec![0; input.len()];

        rotate_left(input, 3, &mut rotated);
        assert_eq!(rotated, b"DEFGABC");

        rotate_right(&rotated, 3, &mut restored);
        assert_eq!(restored, input);
    }

    #[test]
    fn rounds_invert_each_other() {
        let digits = [1, 2, 3, 4];
        let letters = b"HELLOWORLD";

        let scrambled = scramble(letters, digits);
        assert_ne!(scrambled.as_slice(), letters);
        assert_eq!(unscramble(&scrambled, digits), letters);
    }

    #[test]
    fn formatted_solution_reads_column_major() {
        let mut puzzle = Puzzle::new();
        puzzle.set_dimensions(3, 3);
        puzzle.set_solution(b"ABC.D.EFG").unwrap();

        // Column 0: A . E, column 1: B D F, column 2: C . G
        assert_eq!(puzzle.formatted_solution(), b"AEBDFCG");

        puzzle.unformat_solution(b"ZYXWVUT");
        assert_eq!(puzzle.solution(), b"ZXU.W.YVT");
    }

    #[test]
    fn lock_then_unlock_restores_the_solution() {
        let mut puzzle = hello_world();

        puzzle.lock_with_key(1234).unwrap();
        assert!(puzzle.is_locked());
        assert_ne!(puzzle.solution(), b"HLOOLELWRD");
        assert_eq!(puzzle.lock_with_key(1234), Err(LockError::AlreadyScrambled));

        assert_eq!(puzzle.unlock_with_key(4321), Err(LockError::WrongKey(4321)));
        assert_eq!(puzzle.unlock_with_key(1204), Err(LockError::BadKey(1204)));

        puzzle.unlock_with_key(1234).unwrap();
        assert_eq!(puzzle.solution(), b"HLOOLELWRD");
        assert!(!puzzle.is_locked());
        assert_eq!(puzzle.locked_cksum(), 0);
    }

    #[test]
    fn unlocking_an_open_puzzle_fails() {
        let mut puzzle = hello_world();

        assert_eq!(puzzle.unlock_with_key(1234), Err(LockError::NotScrambled));
        assert_eq!(puzzle.brute_force_unlock(), Err(LockError::NotScrambled));
    }

    #[test]
    fn brute_force_recovers_the_key() {
        let mut puzzle = hello_world();

        puzzle.lock_with_key(1234).unwrap();
        assert_eq!(puzzle.brute_force_unlock(), Ok(1234));
        assert_eq!(puzzle.solution(), b"HLOOLELWRD");
    }
}
