//! Largest rectangle in a histogram.

/// A maximal rectangle under a histogram: columns `left..=right`, all at least `height` tall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bar {
    pub left: usize,
    pub right: usize,
    pub height: usize,
}

impl Bar {
    pub const fn width(&self) -> usize {
        self.right - self.left + 1
    }

    pub const fn area(&self) -> usize {
        self.width() * self.height
    }
}

/// Every maximal rectangle under `heights`, one per distinct (extent, height) pair.
///
/// Classic monotonic-stack sweep, O(n). A bar is emitted when a lower column closes it,
/// so the output is ordered by right edge. Zero-height columns never produce bars.
pub fn maximal_rectangles(heights: &[usize]) -> Vec<Bar> {
    let mut bars = Vec::new();
    // (left edge, height), heights strictly increasing bottom to top
    let mut stack: Vec<(usize, usize)> = Vec::with_capacity(heights.len());

    for (i, &h) in heights.iter().chain(std::iter::once(&0)).enumerate() {
        let mut left = i;
        while let Some(&(start, top)) = stack.last() {
            if top < h {
                break;
            }
            stack.pop();
            if top > h {
                bars.push(Bar {
                    left: start,
                    right: i - 1,
                    height: top,
                });
            }
            left = start;
        }
        if h > 0 {
            stack.push((left, h));
        }
    }

    bars
}

/// Area of the largest rectangle under `heights`
pub fn largest_rectangle(heights: &[usize]) -> Option<Bar> {
    maximal_rectangles(heights)
        .into_iter()
        .max_by(|a, b| a.area().cmp(&b.area()).then(b.left.cmp(&a.left)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(left: usize, right: usize, height: usize) -> Bar {
        Bar {
            left,
            right,
            height,
        }
    }

    #[test]
    fn textbook_histogram() {
        let heights = [2, 1, 5, 6, 2, 3];
        let best = largest_rectangle(&heights).unwrap();
        assert_eq!(best, bar(2, 3, 5));
        assert_eq!(best.area(), 10);
    }

    #[test]
    fn enumerates_each_maximal_bar_once() {
        let bars = maximal_rectangles(&[2, 1, 5, 6, 2, 3]);
        assert_eq!(
            bars,
            vec![
                bar(0, 0, 2),
                bar(3, 3, 6),
                bar(2, 3, 5),
                bar(5, 5, 3),
                bar(2, 5, 2),
                bar(0, 5, 1),
            ]
        );
    }

    #[test]
    fn equal_heights_merge_into_one_bar() {
        assert_eq!(maximal_rectangles(&[3, 3, 3]), vec![bar(0, 2, 3)]);
    }

    #[test]
    fn zero_columns_split_bars() {
        assert_eq!(
            maximal_rectangles(&[1, 0, 2, 2, 0]),
            vec![bar(0, 0, 1), bar(2, 3, 2)]
        );
        assert!(maximal_rectangles(&[0, 0]).is_empty());
        assert!(maximal_rectangles(&[]).is_empty());
        assert_eq!(largest_rectangle(&[]), None);
    }
}
