/// Overlap of the closed ranges `[a,b]` and `[c,d]`, `None` if they
/// are disjoint. Identical ranges count as zero overlap.
///
/// ```
/// use scaffolder::distance::overlap;
///
/// assert_eq!(overlap(0, 10, 8, 20), Some(2));
/// assert_eq!(overlap(0, 10, 12, 20), None);
/// ```
#[inline]
pub fn overlap(a: i64, b: i64, c: i64, d: i64) -> Option<i64> {
    let r = if a == c && b == d {
        0
    } else {
        b.min(d) - a.max(c)
    };
    if r >= 0 {
        Some(r)
    } else {
        None
    }
}

/// Signed distance between the ranges `[a,b]` and `[c,d]`,
/// independent of which one comes first. Overlaps are reported as
/// the negated overlap length, gaps as a positive length.
#[inline]
pub fn distance(a: i64, b: i64, c: i64, d: i64) -> i64 {
    if let Some(o) = overlap(a, b, c, d) {
        return -o;
    }
    let fwd = (a.max(b) - c.min(d)).abs();
    let bwd = (c.max(d) - a.min(b)).abs();
    fwd.min(bwd)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RANGES: [(i64, i64); 8] = [
        (0, 100),
        (150, 250),
        (90, 120),
        (0, 100),
        (100, 200),
        (-50, -10),
        (40, 60),
        (300, 300),
    ];

    #[test]
    fn gap_between_ranges() {
        assert_eq!(distance(0, 100, 150, 250), 50);
        assert_eq!(distance(150, 250, 0, 100), 50);
        assert_eq!(distance(0, 100, 90, 120), -10);
        // abutting and identical ranges
        assert_eq!(distance(0, 100, 100, 200), 0);
        assert_eq!(distance(0, 100, 0, 100), 0);
        // containment
        assert_eq!(distance(0, 100, 40, 60), -20);
    }

    #[test]
    fn distance_is_symmetric() {
        for &(a, b) in RANGES.iter() {
            for &(c, d) in RANGES.iter() {
                assert_eq!(distance(a, b, c, d), distance(c, d, a, b));
            }
        }
    }

    #[test]
    fn overlap_implies_negated_distance() {
        for &(a, b) in RANGES.iter() {
            for &(c, d) in RANGES.iter() {
                if let Some(v) = overlap(a, b, c, d) {
                    assert!(v >= 0);
                    assert_eq!(distance(a, b, c, d), -v);
                }
            }
        }
    }
}
