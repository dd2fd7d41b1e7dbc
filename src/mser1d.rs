//! One-dimensional maximally stable extremal regions.
//!
//! A 1D signal is thresholded at increasing levels; every maximal run of
//! samples at or above the level becomes a node of a region tree whose children
//! are the runs found inside it at the next level. Chains of single-child links
//! describe one blob persisting across thresholds, and the stablest member of
//! each chain (smallest relative length change over `±delta` levels) is
//! reported.
//!
//! The tree is stored in an append-only arena and built with an explicit work
//! stack, so deep signals cannot exhaust the call stack. Node ids follow the
//! depth-first creation order, which makes the nodes of a chain consecutive.
use serde::{Deserialize, Serialize};

/// Offset below the global minimum used for the root threshold.
const ROOT_EPSILON: f64 = 1e-6;

/// A node of the region tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub start: usize,
    pub len: usize,
    pub threshold: f64,
    /// Arena ids of the runs found inside this one at the next level.
    pub children: Vec<usize>,
}

/// Selected stable span `[start, start + len)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

/// Arena of regions for one signal.
#[derive(Clone, Debug, Default)]
pub struct RegionTree {
    pub regions: Vec<Region>,
}

struct ScanFrame {
    parent: Option<usize>,
    cursor: usize,
    end: usize,
    level: usize,
}

impl RegionTree {
    /// Build the nested-run tree of `signal`, raising the threshold by `step`
    /// at each level.
    ///
    /// Level thresholds are `base + level · step` so that depth stays bounded
    /// by `(max − min) / step` even where `step` is below the float spacing of
    /// the signal.
    pub fn build(signal: &[f64], step: f64) -> Self {
        assert!(step > 0.0, "threshold step must be positive, got {step}");
        let mut regions: Vec<Region> = Vec::new();
        let Some(min) = signal.iter().copied().reduce(f64::min) else {
            return Self { regions };
        };

        let base = min - ROOT_EPSILON;
        let mut stack = vec![ScanFrame {
            parent: None,
            cursor: 0,
            end: signal.len(),
            level: 0,
        }];
        while let Some(mut frame) = stack.pop() {
            let th = base + frame.level as f64 * step;
            let mut i = frame.cursor;
            while i < frame.end && !(signal[i] >= th) {
                i += 1;
            }
            if i >= frame.end {
                continue;
            }
            let start = i;
            while i < frame.end && signal[i] >= th {
                i += 1;
            }

            let id = regions.len();
            regions.push(Region {
                start,
                len: i - start,
                threshold: th,
                children: Vec::new(),
            });
            if let Some(parent) = frame.parent {
                regions[parent].children.push(id);
            }

            // Resume the current scan after this run, but descend first.
            let level = frame.level + 1;
            frame.cursor = i;
            stack.push(frame);
            stack.push(ScanFrame {
                parent: Some(id),
                cursor: start,
                end: i,
                level,
            });
        }
        Self { regions }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Decompose the tree into maximal single-child chains, ordered by the id
    /// of their first node.
    pub fn chains(&self) -> Vec<Vec<usize>> {
        let mut visited = vec![false; self.regions.len()];
        let mut chains = Vec::new();
        for i in 0..self.regions.len() {
            if visited[i] {
                continue;
            }
            visited[i] = true;
            let mut chain = vec![i];
            let mut j = i;
            while let [only] = self.regions[j].children[..] {
                j = only;
                visited[j] = true;
                chain.push(j);
            }
            chains.push(chain);
        }
        chains
    }

    /// Relative length change across `±delta` chain positions.
    ///
    /// Returns an empty vector when the chain is too short or its extreme
    /// regions fall outside `[min_area, max_area]`; otherwise one entry per
    /// chain node, `-1` for the `delta` nodes at either end.
    pub fn stability(
        &self,
        chain: &[usize],
        delta: usize,
        min_area: usize,
        max_area: usize,
    ) -> Vec<f64> {
        let (Some(&first), Some(&last)) = (chain.first(), chain.last()) else {
            return Vec::new();
        };
        if chain.len() < 2 * delta + 1
            || self.regions[first].len < min_area
            || self.regions[last].len > max_area
        {
            return Vec::new();
        }
        let len_at = |pos: usize| self.regions[chain[pos]].len as f64;
        (0..chain.len())
            .map(|i| {
                if i < delta || i + delta >= chain.len() {
                    -1.0
                } else {
                    (len_at(i - delta) - len_at(i + delta)) / len_at(i)
                }
            })
            .collect()
    }
}

/// Replace masked-out samples (`false`) by the global minimum of `signal`.
pub fn apply_mask(signal: &[f64], mask: Option<&[bool]>) -> Vec<f64> {
    let Some(mask) = mask else {
        return signal.to_vec();
    };
    assert_eq!(
        mask.len(),
        signal.len(),
        "mask length must match signal length"
    );
    let Some(min) = signal.iter().copied().reduce(f64::min) else {
        return Vec::new();
    };
    signal
        .iter()
        .zip(mask)
        .map(|(&v, &keep)| if keep { v } else { min })
        .collect()
}

/// Index of the smallest nonnegative score; the first one wins ties.
fn most_stable(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &s) in scores.iter().enumerate() {
        if s < 0.0 {
            continue;
        }
        match best {
            Some((_, b)) if b <= s => {}
            _ => best = Some((i, s)),
        }
    }
    best.map(|(i, _)| i)
}

/// 1D MSER detector settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mser1d {
    /// Threshold increment between tree levels.
    pub step: f64,
    /// Stability window, in threshold units.
    pub delta: f64,
    /// Smallest admissible length of a chain's first (widest) region.
    pub min_area: usize,
    /// Largest admissible length of a chain's last (narrowest) region;
    /// 0 means the signal length.
    pub max_area: usize,
}

impl Default for Mser1d {
    fn default() -> Self {
        Self {
            step: 1.0,
            delta: 1.0,
            min_area: 1,
            max_area: 0,
        }
    }
}

impl Mser1d {
    pub fn new(step: f64, delta: f64, min_area: usize, max_area: usize) -> Self {
        Self {
            step,
            delta,
            min_area,
            max_area,
        }
    }

    /// Stability window in tree levels: `round(delta / step)`.
    pub fn delta_levels(&self) -> usize {
        (self.delta / self.step + 0.5).max(0.0) as usize
    }

    /// Stable spans of `signal`, one per qualifying chain in chain order.
    pub fn detect(&self, signal: &[f64], mask: Option<&[bool]>) -> Vec<Span> {
        let masked = apply_mask(signal, mask);
        if masked.is_empty() {
            return Vec::new();
        }
        let tree = RegionTree::build(&masked, self.step);
        let delta = self.delta_levels();
        let max_area = if self.max_area < 1 {
            masked.len()
        } else {
            self.max_area
        };

        tree.chains()
            .iter()
            .filter_map(|chain| {
                let scores = tree.stability(chain, delta, self.min_area, max_area);
                most_stable(&scores).map(|pos| {
                    let r = &tree.regions[chain[pos]];
                    Span {
                        start: r.start,
                        len: r.len,
                    }
                })
            })
            .collect()
    }
}
