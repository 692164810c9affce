//! Range conversions and ordered selection helpers.

/// Scale a unit-range value into `to`.
pub fn scale(unit_x: f64, to: (f64, f64)) -> f64 {
    unit_x * (to.1 - to.0) + to.0
}

/// Map `x` from `bounds` into the unit range. Identity for `(0, 1)`.
pub fn normalize(x: f64, bounds: (f64, f64)) -> f64 {
    if bounds == (0.0, 1.0) {
        return x;
    }
    (x - bounds.0) / (bounds.1 - bounds.0)
}

/// Map `x` from the range `frm` into the range `to`.
pub fn rescale(x: f64, frm: (f64, f64), to: (f64, f64)) -> f64 {
    if frm == to {
        return x;
    }
    scale(normalize(x, frm), to)
}

/// The first `n` entries of an ordered mapping.
pub fn first_n<K, V, I>(n: usize, items: I) -> Vec<(K, V)>
where
    I: IntoIterator<Item = (K, V)>,
{
    items.into_iter().take(n).collect()
}

/// The first `n` entries of a round-robin over two ordered mappings.
pub fn mix_n<K, V, A, B>(n: usize, a: A, b: B) -> Vec<(K, V)>
where
    A: IntoIterator<Item = (K, V)>,
    B: IntoIterator<Item = (K, V)>,
{
    let mut a = a.into_iter();
    let mut b = b.into_iter();
    let mut out = Vec::with_capacity(n);
    let (mut a_done, mut b_done) = (false, false);

    while out.len() < n && !(a_done && b_done) {
        if !a_done {
            match a.next() {
                Some(item) => out.push(item),
                None => a_done = true,
            }
        }
        if out.len() >= n {
            break;
        }
        if !b_done {
            match b.next() {
                Some(item) => out.push(item),
                None => b_done = true,
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn scale_from_unit() {
        assert_eq!(scale(0.0, (0.0, 10.0)), 0.0);
        assert_eq!(scale(0.5, (0.0, 10.0)), 5.0);
        assert_eq!(scale(1.0, (0.0, 10.0)), 10.0);
    }

    #[test]
    fn normalize_to_unit() {
        assert_eq!(normalize(5.0, (0.0, 10.0)), 0.5);
        assert_eq!(normalize(0.3, (0.0, 1.0)), 0.3);
    }

    #[test]
    fn rescale_same_range_is_identity() {
        for x in [-3.5, 0.0, 0.123, 42.0, 1e6] {
            assert_eq!(rescale(x, (-1.0, 7.0), (-1.0, 7.0)), x);
        }
    }

    #[test]
    fn rescale_round_trips() {
        let frm = (-32.768, 32.768);
        let to = (0.0, 100.0);
        for x in [-32.768, -10.0, 0.0, 3.3, 32.768] {
            assert_abs_diff_eq!(rescale(rescale(x, frm, to), to, frm), x, epsilon = 1e-9);
        }
        assert_abs_diff_eq!(rescale(10.0, (0.0, 100.0), (0.0, 10.0)), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn scale_inverts_normalize() {
        let bounds = (2.0, 12.0);
        for x in [2.0, 4.5, 7.0, 12.0, 15.0] {
            assert_abs_diff_eq!(scale(normalize(x, bounds), bounds), x, epsilon = 1e-12);
        }
    }

    #[test]
    fn mix_n_alternates_then_drains() {
        let metrics = vec![("m1", 1), ("m2", 2), ("m3", 3)];
        let costs = vec![("c1", 10)];
        let mixed = mix_n(4, metrics.clone(), costs.clone());
        assert_eq!(mixed, vec![("m1", 1), ("c1", 10), ("m2", 2), ("m3", 3)]);

        assert_eq!(mix_n(2, metrics.clone(), costs).len(), 2);
        assert_eq!(first_n(2, metrics), vec![("m1", 1), ("m2", 2)]);
    }
}
