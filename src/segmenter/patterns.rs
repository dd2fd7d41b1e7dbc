//! Digit-grouping templates of payment-card numbers.
use super::costs::BreakKind;
use serde::{Deserialize, Serialize};

use BreakKind::{Blank as B, CharLeft as L, CharRight as R, StringLeft as SL, StringRight as SR};

/// Grouping layout of the digit string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreditPattern {
    /// 16 digits as 4-4-4-4.
    Type4444,
    /// 15 digits as 4-6-5.
    Type465,
    /// 14 digits as 4-6-4.
    Type464,
}

/// Static description of one template.
#[derive(Debug)]
pub struct PatternLayout {
    pub pattern: CreditPattern,
    /// Kind of every break from the left end of the string to the right end.
    pub breaks: &'static [BreakKind],
    pub digits: usize,
    /// Half-open break index ranges, one per digit group. Digit `i` of a group
    /// spans `breaks[i]..breaks[i + 1]`.
    pub groups: &'static [(usize, usize)],
}

const BREAKS_4444: [BreakKind; 20] = [
    SL, B, B, B, R, L, B, B, B, R, L, B, B, B, R, L, B, B, B, SR,
];
const BREAKS_465: [BreakKind; 18] = [
    SL, B, B, B, R, L, B, B, B, B, B, R, L, B, B, B, B, SR,
];
const BREAKS_464: [BreakKind; 17] = [
    SL, B, B, B, R, L, B, B, B, B, B, R, L, B, B, B, SR,
];

/// Templates in search order.
pub static PATTERNS: [PatternLayout; 3] = [
    PatternLayout {
        pattern: CreditPattern::Type4444,
        breaks: &BREAKS_4444,
        digits: 16,
        groups: &[(0, 4), (5, 9), (10, 14), (15, 19)],
    },
    PatternLayout {
        pattern: CreditPattern::Type465,
        breaks: &BREAKS_465,
        digits: 15,
        groups: &[(0, 4), (5, 11), (12, 17)],
    },
    PatternLayout {
        pattern: CreditPattern::Type464,
        breaks: &BREAKS_464,
        digits: 14,
        groups: &[(0, 4), (5, 11), (12, 16)],
    },
];

impl CreditPattern {
    pub fn layout(self) -> &'static PatternLayout {
        match self {
            CreditPattern::Type4444 => &PATTERNS[0],
            CreditPattern::Type465 => &PATTERNS[1],
            CreditPattern::Type464 => &PATTERNS[2],
        }
    }

    pub fn digit_count(self) -> usize {
        self.layout().digits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_cover_digit_count() {
        for layout in &PATTERNS {
            let total: usize = layout.groups.iter().map(|(b, e)| e - b).sum();
            assert_eq!(total, layout.digits, "{:?}", layout.pattern);
            assert_eq!(layout.pattern.layout().pattern, layout.pattern);
        }
    }

    #[test]
    fn sequences_are_well_formed() {
        for layout in &PATTERNS {
            let seq = layout.breaks;
            assert_eq!(seq.first(), Some(&BreakKind::StringLeft));
            assert_eq!(seq.last(), Some(&BreakKind::StringRight));
            let (_, last) = layout.groups[layout.groups.len() - 1];
            assert_eq!(last, seq.len() - 1);
            // Every group gap is a right edge immediately followed by a left edge.
            for w in layout.groups.windows(2) {
                let (_, end) = w[0];
                let (begin, _) = w[1];
                assert_eq!(begin, end + 1);
                assert_eq!(seq[end], BreakKind::CharRight);
                assert_eq!(seq[begin], BreakKind::CharLeft);
            }
        }
    }
}
