//! Box-average downsampling of raw rasters.
//!
//! Each destination pixel `(x, y)` is computed from the source pixels whose
//! integer coordinates lie in `[s*x, s*x + s/2) x [s*y, s*y + s/2)`, where
//! `s` is the ratio of source width to destination width.  Note that the
//! box spans only half of the source cell in each direction; pixels in the
//! other three quarters of the cell do not contribute.

use crate::error::Result;

//===========================================================================//

/// A half-open rectangle in source pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleBox {
    /// Inclusive left edge.
    pub left: f64,
    /// Inclusive top edge.
    pub top: f64,
    /// Exclusive right edge.
    pub right: f64,
    /// Exclusive bottom edge.
    pub bottom: f64,
}

impl SampleBox {
    /// Returns the box sampled for destination pixel `(x, y)` at the given
    /// scale.
    pub fn for_pixel(x: u32, y: u32, scale: f64) -> SampleBox {
        let left = scale * (x as f64);
        let top = scale * (y as f64);
        SampleBox {
            left,
            top,
            right: left + scale / 2.0,
            bottom: top + scale / 2.0,
        }
    }
}

//===========================================================================//

/// Gathers every pixel of `raster` (a `width` by `height` image with
/// `bytes_per_pixel` bytes per pixel) whose integer coordinates fall inside
/// `sample_box`.  Coordinates outside the image are skipped.
pub fn pixels_in_box<'a>(
    raster: &'a [u8],
    sample_box: &SampleBox,
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
) -> Vec<&'a [u8]> {
    let mut pixels = Vec::new();
    let first_row = sample_box.top.ceil().max(0.0) as u64;
    let first_col = sample_box.left.ceil().max(0.0) as u64;
    let mut y = first_row;
    while (y as f64) < sample_box.bottom && y < (height as u64) {
        let mut x = first_col;
        while (x as f64) < sample_box.right && x < (width as u64) {
            let pixel = pixel_range(width, x, y, bytes_per_pixel)
                .and_then(|(start, end)| raster.get(start..end));
            if let Some(pixel) = pixel {
                pixels.push(pixel);
            }
            x += 1;
        }
        y += 1;
    }
    pixels
}

/// Downsamples `raster` from `src_width` by `src_height` pixels to
/// `dst_width` by `dst_height` pixels, averaging each channel of the sampled
/// pixels with equal weight.  A destination pixel whose box contains no
/// source pixels is left as zeroes.  Fails if the destination raster would
/// not fit in memory.
pub fn resize_raster(
    raster: &[u8],
    src_width: u32,
    src_height: u32,
    dst_width: u32,
    dst_height: u32,
    bytes_per_pixel: usize,
) -> Result<Vec<u8>> {
    let dst_len = (dst_width as usize)
        .checked_mul(dst_height as usize)
        .and_then(|pixels| pixels.checked_mul(bytes_per_pixel));
    let mut output = match dst_len {
        Some(len) => vec![0u8; len],
        None => invalid_input!(
            "Image dimensions too large (was {}x{})",
            dst_width,
            dst_height
        ),
    };
    if dst_width == 0 {
        return Ok(output);
    }
    let scale = (src_width as f64) / (dst_width as f64);
    let mut sums = vec![0u64; bytes_per_pixel];
    for y in 0..dst_height {
        for x in 0..dst_width {
            let sample_box = SampleBox::for_pixel(x, y, scale);
            let pixels = pixels_in_box(
                raster,
                &sample_box,
                src_width,
                src_height,
                bytes_per_pixel,
            );
            if pixels.is_empty() {
                continue;
            }
            for sum in sums.iter_mut() {
                *sum = 0;
            }
            for pixel in pixels.iter() {
                for (sum, &value) in sums.iter_mut().zip(pixel.iter()) {
                    *sum += value as u64;
                }
            }
            let count = pixels.len() as u64;
            let index = (dst_width as usize) * (y as usize) + (x as usize);
            let start = bytes_per_pixel * index;
            for (channel, &sum) in sums.iter().enumerate() {
                // Round half up.
                output[start + channel] = ((sum + count / 2) / count) as u8;
            }
        }
    }
    Ok(output)
}

fn pixel_range(
    width: u32,
    x: u64,
    y: u64,
    bytes_per_pixel: usize,
) -> Option<(usize, usize)> {
    let index = (width as u64).checked_mul(y)?.checked_add(x)?;
    let start = usize::try_from(index).ok()?.checked_mul(bytes_per_pixel)?;
    Some((start, start.checked_add(bytes_per_pixel)?))
}

//===========================================================================//


//===========================================================================//
