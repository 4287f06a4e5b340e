//! List/mask helpers used by the loaders' input validation.

use crate::error::{Error, Result};

/// For each value, whether it occurs in `base`.
///
/// The result has the same length and order as `values`.
pub fn membership_mask<T: PartialEq>(values: &[T], base: &[T]) -> Vec<bool> {
    values.iter().map(|v| base.contains(v)).collect()
}

/// Keep the values whose mask entry is true.
///
/// # Errors
///
/// Returns [`Error::MaskLengthMismatch`] when the mask and list lengths
/// differ.
///
/// # Example
///
/// ```
/// use barsed::list::apply_mask;
///
/// let kept = apply_mask(&["a", "b", "c"], &[true, false, true])?;
/// assert_eq!(kept, vec!["a", "c"]);
/// # Ok::<(), barsed::Error>(())
/// ```
pub fn apply_mask<T: Clone>(values: &[T], mask: &[bool]) -> Result<Vec<T>> {
    if values.len() != mask.len() {
        return Err(Error::MaskLengthMismatch {
            mask_len: mask.len(),
            list_len: values.len(),
        });
    }

    Ok(values
        .iter()
        .zip(mask.iter())
        .filter(|(_, &keep)| keep)
        .map(|(v, _)| v.clone())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_mask() {
        let kept = apply_mask(&["a", "b", "c"], &[true, false, true]).unwrap();
        assert_eq!(kept, vec!["a", "c"]);
    }

    #[test]
    fn test_apply_mask_length_mismatch() {
        let err = apply_mask(&["a", "b", "c"], &[true, false]).unwrap_err();
        assert!(matches!(err, Error::MaskLengthMismatch { mask_len: 2, list_len: 3 }));
    }

    #[test]
    fn test_membership_mask() {
        let mask = membership_mask(&["u", "bogus", "w"], &["u", "v", "w"]);
        assert_eq!(mask, vec![true, false, true]);
    }
}
