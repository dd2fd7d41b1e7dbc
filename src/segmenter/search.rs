//! Branch-and-bound placement of break positions for one template.
//!
//! String ends are enumerated in ascending cost order, which makes both outer
//! loops prunable: once an end alone reaches the best total, no later end can
//! beat it. Interior breaks are placed greedily around evenly spaced guesses.
use super::costs::{AppearanceCosts, BreakKind};
use crate::profile::argsort;

/// Break positions with their total cost.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub breaks: Vec<usize>,
    pub cost: f64,
}

/// Per-stage costs driving [`branch_and_bound`].
pub trait BreakCosts {
    /// Number of columns that may hold a break.
    fn width(&self) -> usize;
    /// Number of breaks in the template, both ends included.
    fn break_count(&self) -> usize;
    /// Cost of each column as the left end of the string.
    fn left_end(&self) -> &[f64];
    /// Cost of each column as the right end of the string.
    fn right_end(&self) -> &[f64];
    /// Prior cost of a string spanning `span` columns.
    fn span_cost(&self, span: usize) -> f64;
    /// Best column for interior break `index` near `guess`, with its cost.
    fn place(&self, index: usize, guess: usize) -> Option<(usize, f64)>;
}

/// Search break positions whose total cost is strictly below `best`.
///
/// Returns `None` when no placement improves on `best`. Pairs of ends closer
/// than a third of the width are never considered.
pub fn branch_and_bound<C: BreakCosts + ?Sized>(costs: &C, mut best: f64) -> Option<Candidate> {
    let n = costs.break_count();
    assert!(n >= 2, "a template needs at least two breaks");
    let width = costs.width();
    let min_span = width / 3;
    let left_cost = costs.left_end();
    let right_cost = costs.right_end();
    let lefts = argsort(left_cost);
    let rights = argsort(right_cost);

    let mut found: Option<Candidate> = None;
    let mut current = vec![0usize; n];
    for &left in &lefts {
        let base = left_cost[left];
        if base >= best {
            break;
        }
        current[0] = left;
        'pairs: for &right in &rights {
            let mut total = base + right_cost[right];
            if total >= best {
                break;
            }
            if right < left || right - left < min_span {
                continue;
            }
            let span = right - left;
            total += costs.span_cost(span);
            if total >= best {
                continue;
            }
            current[n - 1] = right;

            let pitch = span as f64 / (n - 1) as f64;
            for p in 1..n - 1 {
                let guess = left + (pitch * p as f64).round() as usize;
                let Some((pos, c)) = costs.place(p, guess) else {
                    continue 'pairs;
                };
                total += c;
                if total >= best {
                    continue 'pairs;
                }
                current[p] = pos;
            }
            best = total;
            found = Some(Candidate {
                breaks: current.clone(),
                cost: total,
            });
        }
    }
    found
}

/// Lowest-cost column in the window around `guess`.
///
/// The window is `[guess - half + 1, guess + half)` clipped to
/// `[0, width - 1)`, where `half = reg.len()`; each column costs
/// `app[x] + reg[|x - guess|]`. Ties keep the leftmost column.
pub fn min_cost_position(app: &[f64], reg: &[f64], guess: usize) -> Option<(usize, f64)> {
    let half = reg.len();
    if half == 0 || app.is_empty() {
        return None;
    }
    let begin = (guess + 1).saturating_sub(half);
    let end = (guess + half).min(app.len() - 1);
    let mut best: Option<(usize, f64)> = None;
    for x in begin..end {
        let c = app[x] + reg[x.abs_diff(guess)];
        if best.map_or(true, |(_, b)| c < b) {
            best = Some((x, c));
        }
    }
    best
}

/// Appearance and regularization tables bound to one template.
pub struct TemplateCosts<'a> {
    pub appearance: &'a AppearanceCosts,
    pub regularization: &'a [f64],
    pub kinds: &'a [BreakKind],
    /// Expected string length in columns.
    pub expected_span: f64,
    /// Standard deviation of the string length.
    pub span_sigma: f64,
}

impl BreakCosts for TemplateCosts<'_> {
    fn width(&self) -> usize {
        self.appearance.width()
    }

    fn break_count(&self) -> usize {
        self.kinds.len()
    }

    fn left_end(&self) -> &[f64] {
        self.appearance.get(self.kinds[0])
    }

    fn right_end(&self) -> &[f64] {
        self.appearance.get(self.kinds[self.kinds.len() - 1])
    }

    fn span_cost(&self, span: usize) -> f64 {
        let d = (self.expected_span - span as f64) / self.span_sigma;
        d * d / 2.0
    }

    fn place(&self, index: usize, guess: usize) -> Option<(usize, f64)> {
        min_cost_position(
            self.appearance.get(self.kinds[index]),
            self.regularization,
            guess,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Three-break toy problem with explicit tables.
    struct Toy {
        left: Vec<f64>,
        right: Vec<f64>,
        middle: Vec<f64>,
    }

    impl BreakCosts for Toy {
        fn width(&self) -> usize {
            self.left.len()
        }
        fn break_count(&self) -> usize {
            3
        }
        fn left_end(&self) -> &[f64] {
            &self.left
        }
        fn right_end(&self) -> &[f64] {
            &self.right
        }
        fn span_cost(&self, _span: usize) -> f64 {
            0.0
        }
        fn place(&self, _index: usize, guess: usize) -> Option<(usize, f64)> {
            min_cost_position(&self.middle, &[0.0, 0.5, 2.0], guess)
        }
    }

    fn toy() -> Toy {
        let mut left = vec![3.0; 30];
        let mut right = vec![3.0; 30];
        let mut middle = vec![1.0; 30];
        left[4] = 0.0;
        left[20] = 0.1;
        right[24] = 0.0;
        middle[15] = 0.0;
        Toy {
            left,
            right,
            middle,
        }
    }

    #[test]
    fn finds_cheapest_placement() {
        let found = branch_and_bound(&toy(), 100.0).expect("placement");
        assert_eq!(found.breaks, vec![4, 15, 24]);
        // Guess is 14, so the middle break pays one step of regularization.
        assert!((found.cost - 0.5).abs() < 1e-12);
    }

    #[test]
    fn cutoff_blocks_worse_results() {
        assert!(branch_and_bound(&toy(), 0.5).is_none());
        assert!(branch_and_bound(&toy(), 0.0).is_none());
    }

    #[test]
    fn narrow_spans_are_rejected() {
        let mut t = toy();
        t.left = (0..30).map(|x| if x < 5 { 0.0 } else { 50.0 }).collect();
        t.right = vec![50.0; 30];
        t.right[12] = 0.0;
        // Spans from left ends 0..5 to column 12 are 8..=12; only some reach 10.
        let found = branch_and_bound(&t, 40.0).expect("span >= 10 exists");
        assert!(found.breaks[2] - found.breaks[0] >= 10);

        t.right[12] = 50.0;
        t.right[6] = 0.0;
        assert!(branch_and_bound(&t, 40.0).is_none());
    }

    #[test]
    fn window_is_clipped_and_prefers_leftmost() {
        let app = [0.0, 0.0, 0.0, 0.0];
        let reg = [0.0, 0.0, 0.0];
        assert_eq!(min_cost_position(&app, &reg, 0), Some((0, 0.0)));
        // End clips to width - 1, so column 3 is never chosen.
        let app = [5.0, 5.0, 5.0, 0.0];
        assert_eq!(min_cost_position(&app, &reg, 3), Some((1, 5.0)));
        assert_eq!(min_cost_position(&[], &reg, 0), None);
    }
}
