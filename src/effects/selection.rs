//! Selection checks for continuation inputs.
//!
//! The engine already guarantees the option set of an answer is the one it
//! offered. These checks cover the player's part: bounds and membership.

use std::fmt::Debug;

use crate::error::{ensure, GameResult};

/// Validate a multi-select against its options.
///
/// Options are a multiset: an option offered twice may be selected twice.
pub fn validate_selection<T: PartialEq + Debug>(
    options: &[T],
    selected: &[T],
    min: usize,
    max: usize,
) -> GameResult<()> {
    ensure!(selected.len() >= min, "Please select at least {min}");
    ensure!(selected.len() <= max, "Please select up to {max}");
    for item in selected {
        let offered = options.iter().filter(|o| *o == item).count();
        let taken = selected.iter().filter(|s| *s == item).count();
        ensure!(taken <= offered, "Selected option {item:?} is not one of the choices");
    }
    Ok(())
}

/// Validate a single choice. `None` is allowed only when not mandatory.
pub fn validate_choice<T: PartialEq + Clone + Debug>(
    options: &[T],
    selected: Option<&T>,
    mandatory: bool,
) -> GameResult<Option<T>> {
    match selected {
        None => {
            ensure!(!mandatory, "Please make a selection");
            Ok(None)
        }
        Some(choice) => {
            ensure!(options.contains(choice), "Selected option {choice:?} is not one of the choices");
            Ok(Some(choice.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let options = [1, 2, 3];
        assert!(validate_selection(&options, &[1], 1, 2).is_ok());
        assert!(validate_selection(&options, &[], 1, 2).unwrap_err().reason().contains("at least 1"));
        assert!(validate_selection(&options, &[1, 2, 3], 0, 2).unwrap_err().reason().contains("up to 2"));
    }

    #[test]
    fn test_multiset_membership() {
        let options = ["Farm", "Farm", "Mine"];
        assert!(validate_selection(&options, &["Farm", "Farm"], 0, 3).is_ok());
        assert!(validate_selection(&options, &["Mine", "Mine"], 0, 3).is_err());
        assert!(validate_selection(&options, &["Inn"], 0, 3).is_err());
    }

    #[test]
    fn test_choice() {
        assert_eq!(validate_choice(&[1, 2], Some(&2), true), Ok(Some(2)));
        assert_eq!(validate_choice::<i32>(&[1, 2], None, false), Ok(None));
        assert!(validate_choice::<i32>(&[1, 2], None, true).is_err());
        assert!(validate_choice(&[1, 2], Some(&5), false).is_err());
    }
}
