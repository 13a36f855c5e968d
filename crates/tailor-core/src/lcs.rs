//! Longest common subsequence table and edit-script backtracking

use serde::{Deserialize, Serialize};

/// Dynamic-programming table over two sequences.
///
/// Cell `(i, j)` holds the LCS length of `a[..i]` and `b[..j]`. The grid is
/// stored row-major in a single vector of `(a.len() + 1) * (b.len() + 1)` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcsTable {
    rows: usize,
    cols: usize,
    cells: Vec<usize>,
}

impl LcsTable {
    /// Fill the table for `a` and `b` under the equality predicate `eq`
    pub fn build<T, F>(a: &[T], b: &[T], eq: F) -> Self
    where
        F: Fn(&T, &T) -> bool,
    {
        let rows = a.len() + 1;
        let cols = b.len() + 1;
        let mut cells = vec![0usize; rows * cols];

        for i in 1..rows {
            for j in 1..cols {
                let value = if eq(&a[i - 1], &b[j - 1]) {
                    cells[(i - 1) * cols + (j - 1)] + 1
                } else {
                    cells[(i - 1) * cols + j].max(cells[i * cols + (j - 1)])
                };
                cells[i * cols + j] = value;
            }
        }

        Self { rows, cols, cells }
    }

    /// LCS length of the first `i` elements of A and the first `j` of B
    pub fn get(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.cols + j]
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Length of the longest common subsequence of the full inputs
    pub fn lcs_len(&self) -> usize {
        self.get(self.rows - 1, self.cols - 1)
    }
}

/// A single index-based edit produced by backtracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edit {
    /// `a[old]` matches `b[new]`
    Equal { old: usize, new: usize },
    /// `a[old]` is removed
    Delete { old: usize },
    /// `b[new]` is added
    Insert { new: usize },
}

/// Walk the table from `(m, n)` back to `(0, 0)` and return the edits in
/// left-to-right order.
///
/// When both neighbours hold the same LCS length the walk steps left, so that
/// within any changed region the deletions come before the insertions once the
/// list is reversed. The merger relies on that order to pair them up.
pub fn backtrack<T, F>(a: &[T], b: &[T], table: &LcsTable, eq: F) -> Vec<Edit>
where
    F: Fn(&T, &T) -> bool,
{
    let mut edits = Vec::with_capacity(a.len() + b.len());
    let mut i = a.len();
    let mut j = b.len();

    while i > 0 && j > 0 {
        if eq(&a[i - 1], &b[j - 1]) {
            edits.push(Edit::Equal {
                old: i - 1,
                new: j - 1,
            });
            i -= 1;
            j -= 1;
        } else if table.get(i - 1, j) > table.get(i, j - 1) {
            edits.push(Edit::Delete { old: i - 1 });
            i -= 1;
        } else {
            edits.push(Edit::Insert { new: j - 1 });
            j -= 1;
        }
    }
    while i > 0 {
        edits.push(Edit::Delete { old: i - 1 });
        i -= 1;
    }
    while j > 0 {
        edits.push(Edit::Insert { new: j - 1 });
        j -= 1;
    }

    edits.reverse();
    edits
}

/// Build the table and backtrack it in one step
pub fn diff_slices<T, F>(a: &[T], b: &[T], eq: F) -> Vec<Edit>
where
    F: Fn(&T, &T) -> bool,
{
    let table = LcsTable::build(a, b, &eq);
    backtrack(a, b, &table, &eq)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_table_borders_are_zero() {
        let a = chars("abc");
        let b = chars("xbz");
        let table = LcsTable::build(&a, &b, |x, y| x == y);

        assert_eq!(table.rows(), 4);
        assert_eq!(table.cols(), 4);
        for i in 0..table.rows() {
            assert_eq!(table.get(i, 0), 0);
        }
        for j in 0..table.cols() {
            assert_eq!(table.get(0, j), 0);
        }
        assert_eq!(table.lcs_len(), 1);
    }

    #[test]
    fn test_table_recurrence() {
        let a = chars("ABCBDAB");
        let b = chars("BDCABA");
        let table = LcsTable::build(&a, &b, |x, y| x == y);

        assert_eq!(table.lcs_len(), 4);
        for i in 1..table.rows() {
            for j in 1..table.cols() {
                let expected = if a[i - 1] == b[j - 1] {
                    table.get(i - 1, j - 1) + 1
                } else {
                    table.get(i - 1, j).max(table.get(i, j - 1))
                };
                assert_eq!(table.get(i, j), expected);
            }
        }
    }

    #[test]
    fn test_empty_inputs() {
        let empty: Vec<char> = Vec::new();
        let table = LcsTable::build(&empty, &empty, |x, y| x == y);
        assert_eq!(table.lcs_len(), 0);
        assert!(backtrack(&empty, &empty, &table, |x, y| x == y).is_empty());
    }

    #[test]
    fn test_one_side_empty_drains() {
        let empty: Vec<char> = Vec::new();
        let word = chars("ab");

        assert_eq!(
            diff_slices(&word, &empty, |x, y| x == y),
            vec![Edit::Delete { old: 0 }, Edit::Delete { old: 1 }]
        );
        assert_eq!(
            diff_slices(&empty, &word, |x, y| x == y),
            vec![Edit::Insert { new: 0 }, Edit::Insert { new: 1 }]
        );
    }

    #[test]
    fn test_substitution_puts_delete_before_insert() {
        let a = chars("cat");
        let b = chars("car");
        let edits = diff_slices(&a, &b, |x, y| x == y);

        assert_eq!(
            edits,
            vec![
                Edit::Equal { old: 0, new: 0 },
                Edit::Equal { old: 1, new: 1 },
                Edit::Delete { old: 2 },
                Edit::Insert { new: 2 },
            ]
        );
    }

    #[test]
    fn test_tie_break_is_stable() {
        let a = chars("xy");
        let b = chars("yx");
        let first = diff_slices(&a, &b, |x, y| x == y);
        let second = diff_slices(&a, &b, |x, y| x == y);

        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![
                Edit::Delete { old: 0 },
                Edit::Equal { old: 1, new: 0 },
                Edit::Insert { new: 1 },
            ]
        );
    }

    #[test]
    fn test_custom_predicate() {
        let a = vec!["Hello", "World"];
        let b = vec!["hello", "world"];
        let table = LcsTable::build(&a, &b, |x, y| x.eq_ignore_ascii_case(y));
        assert_eq!(table.lcs_len(), 2);
    }
}
