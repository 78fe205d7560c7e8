use crate::error::{Error, Result};

/// A context of fixed length together with the element which follows it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window<'a, T> {
    /// Offset of the first context element in the underlying sequence
    pub start: usize,
    pub context: &'a [T],
    pub next: &'a T,
}

/// Slides a window of `len` elements over a sequence, advancing `step` elements at a time. Every
/// window is followed by at least one element, which becomes its target.
#[derive(Debug, Clone)]
pub struct SlidingWindows<'a, T> {
    seq: &'a [T],
    len: usize,
    step: usize,
    pos: usize,
}

pub fn sliding_windows<T>(seq: &[T], len: usize, step: usize) -> Result<SlidingWindows<'_, T>> {
    if len == 0 || step == 0 {
        return Err(Error::InvalidWindow { len, step });
    }
    Ok(SlidingWindows {
        seq,
        len,
        step,
        pos: 0,
    })
}

impl<T> SlidingWindows<'_, T> {
    /// End of the context at the current position, if it is followed by a target
    fn context_end(&self) -> Option<usize> {
        self.pos
            .checked_add(self.len)
            .filter(|&end| end < self.seq.len())
    }
}

impl<'a, T> Iterator for SlidingWindows<'a, T> {
    type Item = Window<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.pos;
        let end = self.context_end()?;
        // Saturates at usize::MAX, which never fits a window, so iteration ends
        self.pos = self.pos.saturating_add(self.step);
        Some(Window {
            start,
            context: &self.seq[start..end],
            next: &self.seq[end],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.context_end() {
            Some(end) => (self.seq.len() - 1 - end) / self.step + 1,
            None => 0,
        };
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for SlidingWindows<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(text: &str, len: usize, step: usize) -> Vec<(String, char)> {
        let chars: Vec<char> = text.chars().collect();
        sliding_windows(&chars, len, step)
            .unwrap()
            .map(|w| (w.context.iter().collect(), *w.next))
            .collect()
    }

    #[test]
    fn the_cat_sat() {
        let expected = vec![
            ("the ".to_string(), 'c'),
            ("e ca".to_string(), 't'),
            ("cat ".to_string(), 's'),
            ("t sa".to_string(), 't'),
        ];
        assert_eq!(expected, pairs("the cat sat", 4, 2));
    }

    #[test]
    fn start_offsets_advance_by_step() {
        let seq: Vec<u32> = (0..10).collect();
        let starts: Vec<usize> = sliding_windows(&seq, 3, 3)
            .unwrap()
            .map(|w| w.start)
            .collect();
        assert_eq!(vec![0, 3, 6], starts);
    }

    #[test]
    fn size_hint_is_exact() {
        let seq: Vec<u32> = (0..100).collect();
        for (len, step) in [(1, 1), (4, 2), (40, 3), (99, 1), (7, 50)] {
            let windows = sliding_windows(&seq, len, step).unwrap();
            let expected = windows.len();
            assert_eq!(expected, windows.count(), "len {len}, step {step}");
        }
    }

    #[test]
    fn sequence_too_short_yields_nothing() {
        assert!(pairs("abcd", 4, 1).is_empty());
        assert_eq!(vec![("abcd".to_string(), 'e')], pairs("abcde", 4, 1));
    }

    #[test]
    fn huge_step_or_length_ends_iteration() {
        let seq = [1, 2, 3];

        let windows = sliding_windows(&seq, 1, usize::MAX).unwrap();
        assert_eq!(1, windows.len());
        assert_eq!(1, windows.count());

        let windows = sliding_windows(&seq, usize::MAX, 1).unwrap();
        assert_eq!(0, windows.len());
        assert_eq!(0, windows.count());
    }

    #[test]
    fn zero_length_or_step_is_rejected() {
        let seq = [1, 2, 3];
        assert!(matches!(
            sliding_windows(&seq, 0, 1),
            Err(Error::InvalidWindow { len: 0, step: 1 })
        ));
        assert!(sliding_windows(&seq, 1, 0).is_err());
    }
}
