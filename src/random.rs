//! Uniform sampling helpers shared by every effect.
//!
//! Purely cosmetic variance: there is no seeding or determinism requirement, so
//! everything goes through `fastrand`'s thread-local generator.

/// Float in `[min, max)`.
pub fn uniform_float(min: f64, max: f64) -> f64 {
    min + fastrand::f64() * (max - min)
}

/// Integer in `[min, max)`, taken as the floor of [`uniform_float`].
pub fn uniform_int(min: i64, max: i64) -> i64 {
    uniform_float(min as f64, max as f64).floor() as i64
}

/// Uniform pick from a non-empty palette.
///
/// # Panics
/// If `items` is empty. Use [`pick_or`] for caller-supplied palettes.
pub fn pick<T: Copy>(items: &[T]) -> T {
    items[fastrand::usize(..items.len())]
}

/// Uniform pick, or `fallback` when `items` is empty.
pub fn pick_or<T: Copy>(items: &[T], fallback: T) -> T {
    if items.is_empty() {
        fallback
    } else {
        pick(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_float_bounds() {
        for _ in 0..10_000 {
            let v = uniform_float(-1.5, 1.5);
            assert!((-1.5..1.5).contains(&v), "{v} out of range");
        }
    }

    #[test]
    fn test_uniform_int_bounds_and_coverage() {
        let mut seen = [false; 4];
        for _ in 0..10_000 {
            let v = uniform_int(0, 4);
            assert!((0..4).contains(&v));
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|s| *s), "every bucket should be hit: {seen:?}");
    }

    #[test]
    fn test_pick_stays_in_palette() {
        let palette = ['a', 'b', 'c'];
        for _ in 0..1_000 {
            assert!(palette.contains(&pick(&palette)));
        }
    }

    #[test]
    fn test_pick_or_falls_back_on_empty() {
        let empty: [u8; 0] = [];
        assert_eq!(pick_or(&empty, 7), 7);
        assert_eq!(pick_or(&[3], 7), 3);
    }
}
