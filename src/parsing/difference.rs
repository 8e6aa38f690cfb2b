//! Difference strings (`cs:Z:` tags) attached to GAF lines.
//!
//! Supported operations: `=ACGT` (matching sequence), `:12` (match length),
//! `*ag` (mismatch, target base then query base), `+ac` (insertion into the
//! target), `-ac` (deletion from the target).

use std::ops::Range;

/// One operation of a difference string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Difference {
    /// A match of the given length
    Match(usize),
    /// Mismatch, represented as the query base
    Mismatch(u8),
    /// Insertion to the target, represented as the inserted sequence
    Insertion(Vec<u8>),
    /// Deletion from the target, represented as the deletion length
    Deletion(usize),
}

impl Difference {
    const OPS: &'static [u8] = b"=:*+-";

    /// Parse a difference string into operations.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid operation.
    pub fn parse(difference_string: &str) -> Result<Vec<Self>, String> {
        let bytes = difference_string.as_bytes();
        let mut result = Vec::new();
        if bytes.is_empty() {
            return Ok(result);
        }
        if !Self::OPS.contains(&bytes[0]) {
            return Err(format!("Invalid operation: {}", bytes[0] as char));
        }

        let mut start = 0;
        while start < bytes.len() {
            let mut end = start + 1;
            while end < bytes.len() && !Self::OPS.contains(&bytes[end]) {
                end += 1;
            }
            let value = &bytes[start + 1..end];
            let op = match bytes[start] {
                b'=' => Some(Self::Match(value.len())),
                b':' => std::str::from_utf8(value)
                    .ok()
                    .and_then(|len| len.parse().ok())
                    .map(Self::Match),
                b'*' if value.len() == 2 => Some(Self::Mismatch(value[1].to_ascii_uppercase())),
                b'+' => Some(Self::Insertion(value.to_ascii_uppercase())),
                b'-' => Some(Self::Deletion(value.len())),
                _ => None,
            }
            .ok_or_else(|| format!("Invalid field: {}", &difference_string[start..end]))?;
            result.push(op);
            start = end;
        }

        Ok(result)
    }

    /// Number of target bases consumed by the operation
    pub fn target_len(&self) -> usize {
        match self {
            Self::Match(len) | Self::Deletion(len) => *len,
            Self::Mismatch(_) => 1,
            Self::Insertion(_) => 0,
        }
    }

    /// Target bases covered by a whole difference string; `None` on overflow
    pub fn target_length(operations: &[Self]) -> Option<usize> {
        operations
            .iter()
            .try_fold(0usize, |total, operation| total.checked_add(operation.target_len()))
    }

    /// Does this operation, starting at target offset `at`, disagree with the
    /// target inside `interval`?
    ///
    /// Insertions only count when they fall strictly inside the interval.
    pub fn conflicts_with(&self, at: usize, interval: &Range<usize>) -> bool {
        match self {
            Self::Match(_) => false,
            Self::Mismatch(_) | Self::Deletion(_) => {
                let end = at.saturating_add(self.target_len());
                at < interval.end && interval.start < end
            }
            Self::Insertion(_) => interval.start < at && at < interval.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_operations() {
        let ops = Difference::parse(":10*ag=CT+tt-g").unwrap();
        assert_eq!(
            ops,
            vec![
                Difference::Match(10),
                Difference::Mismatch(b'G'),
                Difference::Match(2),
                Difference::Insertion(b"TT".to_vec()),
                Difference::Deletion(1),
            ]
        );
        assert_eq!(Difference::target_length(&ops), Some(14));
    }

    #[test]
    fn test_target_length_overflow() {
        let ops = Difference::parse(":18446744073709551615:1").unwrap();
        assert_eq!(Difference::target_length(&ops), None);
        assert_eq!(Difference::target_length(&[]), Some(0));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Difference::parse("10").is_err());
        assert!(Difference::parse(":x").is_err());
        assert!(Difference::parse("*a").is_err());
        assert!(Difference::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_conflicts_with_interval() {
        let interval = 5..10;
        assert!(!Difference::Match(20).conflicts_with(0, &interval));
        assert!(Difference::Mismatch(b'A').conflicts_with(5, &interval));
        assert!(!Difference::Mismatch(b'A').conflicts_with(10, &interval));
        assert!(Difference::Deletion(3).conflicts_with(3, &interval));
        assert!(!Difference::Deletion(3).conflicts_with(2, &interval));
        // Insertion at the interval boundary sits between the anchor and its flank
        assert!(!Difference::Insertion(b"A".to_vec()).conflicts_with(5, &interval));
        assert!(Difference::Insertion(b"A".to_vec()).conflicts_with(6, &interval));
    }
}
