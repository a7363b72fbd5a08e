//! Row-parallel buffer construction.
//!
//! Every filter writes into a fresh output buffer while reading an immutable
//! source, so rows can be produced independently. Small images stay on the
//! calling thread to avoid pool overhead.

use rayon::prelude::*;

/// Minimum number of output samples before work is spread across threads.
pub(crate) const PARALLEL_THRESHOLD: usize = 64 * 1024;

/// Build a `row_len * height` buffer by filling each row with `fill(y, row)`.
pub(crate) fn build_rows<T, F>(row_len: usize, height: usize, fill: F) -> Vec<T>
where
    T: Default + Clone + Send,
    F: Fn(usize, &mut [T]) + Sync,
{
    build_bands(row_len, height, 1, fill)
}

/// Like [`build_rows`], but hands out bands of up to `band_rows` rows.
///
/// `fill(first_row, band)` receives the index of the band's first row; the
/// last band may be shorter. Used by filters that share scratch buffers
/// across neighboring rows.
pub(crate) fn build_bands<T, F>(
    row_len: usize,
    height: usize,
    band_rows: usize,
    fill: F,
) -> Vec<T>
where
    T: Default + Clone + Send,
    F: Fn(usize, &mut [T]) + Sync,
{
    let mut out = vec![T::default(); row_len * height];
    if row_len == 0 || height == 0 {
        return out;
    }
    let band_rows = band_rows.max(1);
    let chunk = row_len * band_rows;

    if out.len() >= PARALLEL_THRESHOLD {
        out.par_chunks_mut(chunk)
            .enumerate()
            .for_each(|(i, band)| fill(i * band_rows, band));
    } else {
        for (i, band) in out.chunks_mut(chunk).enumerate() {
            fill(i * band_rows, band);
        }
    }
    out
}

/// Map every element of `src` through `f` into a new vector.
pub(crate) fn map_samples<S, T, F>(src: &[S], f: F) -> Vec<T>
where
    S: Sync,
    T: Send,
    F: Fn(&S) -> T + Sync + Send,
{
    if src.len() >= PARALLEL_THRESHOLD {
        src.par_iter().map(f).collect()
    } else {
        src.iter().map(f).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rows_small_and_large_agree() {
        let small: Vec<u32> = build_rows(4, 3, |y, row| {
            for (x, v) in row.iter_mut().enumerate() {
                *v = (y * 10 + x) as u32;
            }
        });
        assert_eq!(small, vec![0, 1, 2, 3, 10, 11, 12, 13, 20, 21, 22, 23]);

        let width = 512;
        let height = 256;
        let large: Vec<u32> = build_rows(width, height, |y, row| {
            for (x, v) in row.iter_mut().enumerate() {
                *v = (y * width + x) as u32;
            }
        });
        assert!(large.iter().enumerate().all(|(i, &v)| v == i as u32));
    }

    #[test]
    fn test_build_bands_covers_every_row_once() {
        let rows: Vec<usize> = build_bands(3, 10, 4, |y0, band| {
            for (r, chunk) in band.chunks_mut(3).enumerate() {
                chunk.fill(y0 + r);
            }
        });
        let expected: Vec<usize> = (0..10).flat_map(|y| [y; 3]).collect();
        assert_eq!(rows, expected);
    }

    #[test]
    fn test_map_samples() {
        let src = vec![1u8, 2, 3];
        let out: Vec<u16> = map_samples(&src, |&v| v as u16 * 2);
        assert_eq!(out, vec![2, 4, 6]);
    }

    #[test]
    fn test_map_samples_large_input_uses_lookup_table() {
        let table: Vec<u16> = (0..256u16).map(|v| 255 - v).collect();
        let src: Vec<u8> = (0..PARALLEL_THRESHOLD * 2).map(|i| i as u8).collect();

        let out = map_samples(&src, |&v| table[v as usize]);

        assert_eq!(out.len(), src.len());
        assert!(out.iter().zip(&src).all(|(&o, &s)| o == 255 - s as u16));
    }
}
