//----------------------------------------
// Mixed-radix counter over `digits` positions, each in 0..base
//----------------------------------------

/// Yields every digit vector exactly once, first position fastest, without
/// materializing the full product.
#[derive(Debug, Clone)]
pub(crate) struct Odometer {
    base: usize,
    current: Vec<usize>,
    remaining: usize,
}

impl Odometer {
    /// `count` must equal `base^digits`; callers compute it with overflow checks.
    pub(crate) fn new(base: usize, digits: usize, count: usize) -> Self {
        Odometer {
            base,
            current: vec![0; digits],
            remaining: count,
        }
    }

    /// Digit vector at position `n` of the enumeration order
    pub(crate) fn digits_at(base: usize, digits: usize, mut n: usize) -> Vec<usize> {
        (0..digits)
            .map(|_| {
                let d = n % base;
                n /= base;
                d
            })
            .collect()
    }

    fn advance(&mut self) {
        for digit in self.current.iter_mut() {
            *digit += 1;
            if *digit < self.base {
                return;
            }
            *digit = 0;
        }
    }
}

impl Iterator for Odometer {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.remaining == 0 {
            return None;
        }
        let out = self.current.clone();
        self.remaining -= 1;
        if self.remaining > 0 {
            self.advance();
        }
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Odometer {}
