//! Blitting one `PixelBuffer` onto another
//!
//! Every routine clips silently: source pixels whose destination falls outside
//! `dst` are skipped, so sprites can drift off screen freely. Destination
//! alpha is never modified by the blending routines.

use crate::display::{PixelBuffer, Rect};

/// Straight-alpha blend of one channel, truncating
#[inline]
fn blend_channel(src: u8, dst: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((src as u32 * a + dst as u32 * (255 - a)) / 255) as u8
}

/// Overlap of a `src_len` span placed at `offset` with `[0, dst_len)`.
/// Returns (first source index, first destination index, length).
#[inline]
fn clip_span(offset: i32, src_len: u32, dst_len: u32) -> Option<(usize, usize, usize)> {
    let start = i64::from(offset).max(0);
    let end = (i64::from(offset) + i64::from(src_len)).min(i64::from(dst_len));
    if start >= end {
        return None;
    }
    let src_start = (start - i64::from(offset)) as usize;
    Some((src_start, start as usize, (end - start) as usize))
}

/// Visit every overlapping row pair as (src row bytes, dst row bytes)
fn for_each_row<F>(dst: &mut PixelBuffer, src: &PixelBuffer, x: i32, y: i32, mut f: F)
where
    F: FnMut(&[u8], &mut [u8]),
{
    let Some((sx, dx, w)) = clip_span(x, src.width(), dst.width()) else {
        return;
    };
    let Some((sy, dy, h)) = clip_span(y, src.height(), dst.height()) else {
        return;
    };

    for row in 0..h {
        let src_row = &src.row((sy + row) as u32)[sx * 4..(sx + w) * 4];
        let dst_row = &mut dst.row_mut((dy + row) as u32)[dx * 4..(dx + w) * 4];
        f(src_row, dst_row);
    }
}

/// Copy `src` onto `dst` at (x, y), all four channels verbatim
pub fn blit_opaque(dst: &mut PixelBuffer, src: &PixelBuffer, x: i32, y: i32) {
    for_each_row(dst, src, x, y, |s, d| d.copy_from_slice(s));
}

/// Composite straight (non-premultiplied) RGBA `src` over `dst` at (x, y)
/// using the source alpha channel
pub fn blit_alpha(dst: &mut PixelBuffer, src: &PixelBuffer, x: i32, y: i32) {
    for_each_row(dst, src, x, y, |s, d| {
        for (sp, dp) in s.chunks_exact(4).zip(d.chunks_exact_mut(4)) {
            let a = sp[3];
            match a {
                0 => {},
                255 => dp[..3].copy_from_slice(&sp[..3]),
                _ => {
                    dp[0] = blend_channel(sp[0], dp[0], a);
                    dp[1] = blend_channel(sp[1], dp[1], a);
                    dp[2] = blend_channel(sp[2], dp[2], a);
                },
            }
        }
    });
}

/// Nearest-neighbour scale `src_rect` of `src` into `dst_rect` of `dst`,
/// blending with the source alpha. Parts of either rectangle outside their
/// buffer are skipped.
pub fn blit_alpha_scaled(dst: &mut PixelBuffer, src: &PixelBuffer, src_rect: Rect, dst_rect: Rect) {
    if src_rect.w == 0 || src_rect.h == 0 {
        return;
    }
    let Some((_, dx0, w)) = clip_span(dst_rect.x, dst_rect.w, dst.width()) else {
        return;
    };
    let Some((_, dy0, h)) = clip_span(dst_rect.y, dst_rect.h, dst.height()) else {
        return;
    };

    for dy in dy0..dy0 + h {
        let ty = (dy as i64 - i64::from(dst_rect.y)) * i64::from(src_rect.h) / i64::from(dst_rect.h);
        let sy = i64::from(src_rect.y) + ty;
        for dx in dx0..dx0 + w {
            let tx =
                (dx as i64 - i64::from(dst_rect.x)) * i64::from(src_rect.w) / i64::from(dst_rect.w);
            let sx = i64::from(src_rect.x) + tx;
            let Some((r, g, b, a)) = src.get_pixel_rgba(sx as i32, sy as i32) else {
                continue;
            };
            if a == 0 {
                continue;
            }
            let di = dst.pixel_index(dx as u32, dy as u32);
            let px = &mut dst.as_bytes_mut()[di..di + 4];
            px[0] = blend_channel(r, px[0], a);
            px[1] = blend_channel(g, px[1], a);
            px[2] = blend_channel(b, px[2], a);
        }
    }
}
