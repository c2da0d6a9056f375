/// Option indices a user ticked for one question.
///
/// Always sorted ascending and free of duplicates, so two selections compare
/// equal whenever they tick the same boxes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Selection(Vec<usize>);

impl Selection {
    /// An explicit empty submission.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.0.binary_search(&index).is_ok()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Largest selected index, if any.
    #[must_use]
    pub fn max_index(&self) -> Option<usize> {
        self.0.last().copied()
    }
}

impl FromIterator<usize> for Selection {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut indices: Vec<usize> = iter.into_iter().collect();
        indices.sort_unstable();
        indices.dedup();
        Self(indices)
    }
}

impl From<Vec<usize>> for Selection {
    fn from(value: Vec<usize>) -> Self {
        value.into_iter().collect()
    }
}

impl<const N: usize> From<[usize; N]> for Selection {
    fn from(value: [usize; N]) -> Self {
        value.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_is_sorted_and_deduplicated() {
        let selection = Selection::from(vec![3, 1, 3, 0]);
        assert_eq!(selection.as_slice(), &[0, 1, 3]);
        assert_eq!(selection.max_index(), Some(3));
        assert!(selection.contains(1));
        assert!(!selection.contains(2));
    }

    #[test]
    fn empty_selection() {
        let selection = Selection::empty();
        assert!(selection.is_empty());
        assert_eq!(selection.max_index(), None);
    }
}
