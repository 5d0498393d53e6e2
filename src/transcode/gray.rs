//! Packed BGR to single-channel intensity conversion.

// Fixed-point BT.601 luma weights, scaled by 2^14.
const R_WEIGHT: u32 = 4899;
const G_WEIGHT: u32 = 9617;
const B_WEIGHT: u32 = 1868;
const SHIFT: u32 = 14;
const ROUND: u32 = 1 << (SHIFT - 1);

#[inline]
pub fn luma(b: u8, g: u8, r: u8) -> u8 {
    ((B_WEIGHT * b as u32 + G_WEIGHT * g as u32 + R_WEIGHT * r as u32 + ROUND) >> SHIFT) as u8
}

/// Converts one packed BGR frame into one intensity byte per pixel.
pub fn gray_frame(bgr: &[u8], gray: &mut [u8]) {
    debug_assert_eq!(bgr.len(), gray.len() * 3);
    for (px, out) in bgr.chunks_exact(3).zip(gray.iter_mut()) {
        *out = luma(px[0], px[1], px[2]);
    }
}
