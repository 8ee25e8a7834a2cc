//! Longest-common-subsequence alignment.
//!
//! Builds the full `(N+1) x (M+1)` LCS length table, backtracks from the
//! bottom-right corner, and collapses positional Delete+Insert pairs into
//! `Change` records. Memory is O(N*M), so callers should bound their inputs
//! (see `cell_count`).

use super::types::Edit;

/// Number of DP cells needed to align sequences of these lengths.
pub fn cell_count(old_len: usize, new_len: usize) -> usize {
    old_len.saturating_mul(new_len)
}

/// Compute the edit script turning `old` into `new`.
///
/// On ties between moving left (insert) and up (delete) the backtrack
/// prefers the insert direction, so the output is deterministic for inputs
/// with several minimal scripts.
pub fn align<T: PartialEq + Clone>(old: &[T], new: &[T]) -> Vec<Edit<T>> {
    let n = old.len();
    let m = new.len();

    // dp[i][j] = length of LCS of old[..i] and new[..j]
    let mut dp = vec![vec![0usize; m + 1]; n + 1];
    for i in 1..=n {
        for j in 1..=m {
            dp[i][j] = if old[i - 1] == new[j - 1] {
                dp[i - 1][j - 1] + 1
            } else {
                dp[i - 1][j].max(dp[i][j - 1])
            };
        }
    }

    let mut script = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && old[i - 1] == new[j - 1] {
            script.push(Edit::Equal {
                old_index: i,
                new_index: j,
                value: old[i - 1].clone(),
            });
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || dp[i][j - 1] >= dp[i - 1][j]) {
            script.push(Edit::Insert {
                new_index: j,
                value: new[j - 1].clone(),
            });
            j -= 1;
        } else {
            script.push(Edit::Delete {
                old_index: i,
                value: old[i - 1].clone(),
            });
            i -= 1;
        }
    }
    script.reverse();

    merge_changes(script)
}

/// Collapse every Delete that is immediately followed by an Insert into a
/// single Change. Pairing is purely positional; the texts are not compared.
fn merge_changes<T>(script: Vec<Edit<T>>) -> Vec<Edit<T>> {
    let mut merged = Vec::with_capacity(script.len());
    let mut iter = script.into_iter().peekable();

    while let Some(record) = iter.next() {
        if let Edit::Delete { old_index, value } = record {
            if let Some(Edit::Insert {
                new_index,
                value: new,
            }) = iter.next_if(|next| matches!(next, Edit::Insert { .. }))
            {
                merged.push(Edit::Change {
                    old_index,
                    new_index,
                    old: value,
                    new,
                });
                continue;
            }
            merged.push(Edit::Delete { old_index, value });
        } else {
            merged.push(record);
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::types::EditRecord;
    use pretty_assertions::assert_eq;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn equal(o: usize, n: usize, v: &str) -> EditRecord {
        Edit::Equal {
            old_index: o,
            new_index: n,
            value: v.to_string(),
        }
    }

    fn insert(n: usize, v: &str) -> EditRecord {
        Edit::Insert {
            new_index: n,
            value: v.to_string(),
        }
    }

    fn delete(o: usize, v: &str) -> EditRecord {
        Edit::Delete {
            old_index: o,
            value: v.to_string(),
        }
    }

    fn change(o: usize, n: usize, old: &str, new: &str) -> EditRecord {
        Edit::Change {
            old_index: o,
            new_index: n,
            old: old.to_string(),
            new: new.to_string(),
        }
    }

    #[test]
    fn test_both_empty() {
        let empty: Vec<String> = Vec::new();
        assert!(align(&empty, &empty).is_empty());
    }

    #[test]
    fn test_empty_old_is_all_inserts() {
        let new = lines(&["a", "b", "c"]);
        assert_eq!(
            align(&[], &new),
            vec![insert(1, "a"), insert(2, "b"), insert(3, "c")]
        );
    }

    #[test]
    fn test_empty_new_is_all_deletes() {
        let old = lines(&["a", "b"]);
        assert_eq!(align(&old, &[]), vec![delete(1, "a"), delete(2, "b")]);
    }

    #[test]
    fn test_identical_is_all_equal() {
        let text = lines(&["# Title", "", "body"]);
        assert_eq!(
            align(&text, &text),
            vec![equal(1, 1, "# Title"), equal(2, 2, ""), equal(3, 3, "body")]
        );
    }

    #[test]
    fn test_swap_prefers_insert_on_ties() {
        let old = lines(&["a", "b"]);
        let new = lines(&["b", "a"]);
        assert_eq!(
            align(&old, &new),
            vec![delete(1, "a"), equal(2, 1, "b"), insert(2, "a")]
        );
    }

    #[test]
    fn test_single_replacement_is_one_change() {
        let old = lines(&["x"]);
        let new = lines(&["y"]);
        assert_eq!(align(&old, &new), vec![change(1, 1, "x", "y")]);
    }

    #[test]
    fn test_scenario_edit_and_append() {
        let old = lines(&["alpha", "beta", "gamma"]);
        let new = lines(&["alpha", "BETA", "gamma", "delta"]);
        assert_eq!(
            align(&old, &new),
            vec![
                equal(1, 1, "alpha"),
                change(2, 2, "beta", "BETA"),
                equal(3, 3, "gamma"),
                insert(4, "delta"),
            ]
        );
    }

    #[test]
    fn test_unrelated_lines_still_pair_positionally() {
        let old = lines(&["keep", "first removed", "second removed"]);
        let new = lines(&["keep", "totally new"]);
        // Backtrack emits Delete, Delete, Insert; only the last Delete is
        // adjacent to the Insert.
        assert_eq!(
            align(&old, &new),
            vec![
                equal(1, 1, "keep"),
                delete(2, "first removed"),
                change(3, 2, "second removed", "totally new"),
            ]
        );
    }

    #[test]
    fn test_no_whitespace_or_case_normalization() {
        let old = lines(&["Line", "trailing "]);
        let new = lines(&["line", "trailing"]);
        let script = align(&old, &new);
        assert!(script.iter().all(|r| !r.is_equal()));
    }

    #[test]
    fn test_char_level_reuse() {
        let old: Vec<char> = "cat".chars().collect();
        let new: Vec<char> = "cart".chars().collect();
        assert_eq!(
            align(&old, &new),
            vec![
                Edit::Equal {
                    old_index: 1,
                    new_index: 1,
                    value: 'c'
                },
                Edit::Equal {
                    old_index: 2,
                    new_index: 2,
                    value: 'a'
                },
                Edit::Insert {
                    new_index: 3,
                    value: 'r'
                },
                Edit::Equal {
                    old_index: 3,
                    new_index: 4,
                    value: 't'
                },
            ]
        );
    }

    #[test]
    fn test_cell_count_saturates() {
        assert_eq!(cell_count(3, 4), 12);
        assert_eq!(cell_count(usize::MAX, 2), usize::MAX);
    }
}
