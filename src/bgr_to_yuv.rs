/*
 * Copyright (c) Radzivon Bartoshyk, 11/2024. All rights reserved.
 *
 * Redistribution and use in source and binary forms, with or without modification,
 * are permitted provided that the following conditions are met:
 *
 * 1.  Redistributions of source code must retain the above copyright notice, this
 * list of conditions and the following disclaimer.
 *
 * 2.  Redistributions in binary form must reproduce the above copyright notice,
 * this list of conditions and the following disclaimer in the documentation
 * and/or other materials provided with the distribution.
 *
 * 3.  Neither the name of the copyright holder nor the names of its
 * contributors may be used to endorse or promote products derived from
 * this software without specific prior written permission.
 *
 * THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
use crate::dispatch::{run_bytes, simd_isa, SimdIsa};
use crate::lanes::{BgrToYuv420Rows, BgrToYuvRow};
use crate::numerics::{avg2, avg4, bgr_to_u, bgr_to_v, bgr_to_y};
use crate::yuv_error::{check_a8_channel, check_rgba_destination};
use crate::yuv_support::{BgrToYuvParams, YuvChromaSubsampling, YuvSourceChannels, YuvStandard};
use crate::{YuvError, YuvPlanarImageMut};

#[inline(always)]
fn load_pixel(src: &[u8], x: usize, chans: YuvSourceChannels) -> (i32, i32, i32) {
    let px = &src[x * chans.get_channels_count()..];
    (
        px[chans.get_b_channel_offset()] as i32,
        px[chans.get_g_channel_offset()] as i32,
        px[chans.get_r_channel_offset()] as i32,
    )
}

#[inline(always)]
fn encode_chroma(params: &BgrToYuvParams, (b, g, r): (i32, i32, i32)) -> (u8, u8) {
    (bgr_to_u(params, b, g, r), bgr_to_v(params, b, g, r))
}

pub(crate) fn bgrx_to_yuv_with_isa<const SOURCE_CHANNELS: u8, const SAMPLING: u8>(
    planar_image: &mut YuvPlanarImageMut<u8>,
    bgra: &[u8],
    bgra_stride: u32,
    standard: YuvStandard,
    isa: SimdIsa,
) -> Result<(), YuvError> {
    let chroma_subsampling: YuvChromaSubsampling = SAMPLING.into();
    let src_chans: YuvSourceChannels = SOURCE_CHANNELS.into();
    let channels = src_chans.get_channels_count();

    planar_image.check_constraints(chroma_subsampling)?;
    check_rgba_destination(
        bgra,
        bgra_stride,
        planar_image.width,
        planar_image.height,
        channels,
    )?;

    let params = standard.encoding();
    let width = planar_image.width as usize;
    let chroma_width = chroma_subsampling.chroma_width(width);
    let bgra_stride = bgra_stride as usize;
    let y_stride = planar_image.y_stride as usize;
    let u_stride = planar_image.u_stride as usize;
    let v_stride = planar_image.v_stride as usize;

    let y_plane = planar_image.y_plane.borrow_mut();
    let u_plane = planar_image.u_plane.borrow_mut();
    let v_plane = planar_image.v_plane.borrow_mut();

    if chroma_subsampling == YuvChromaSubsampling::Yuv420 {
        let iter = bgra
            .chunks_exact(bgra_stride * 2)
            .zip(y_plane.chunks_exact_mut(y_stride * 2))
            .zip(u_plane.chunks_exact_mut(u_stride))
            .zip(v_plane.chunks_exact_mut(v_stride));
        for (((bgra, y_plane), u_plane), v_plane) in iter {
            let (bgra0, bgra1) = bgra.split_at(bgra_stride);
            let (y_plane0, y_plane1) = y_plane.split_at_mut(y_stride);
            let (y_plane0, y_plane1) = (&mut y_plane0[..width], &mut y_plane1[..width]);
            let (u_plane, v_plane) = (&mut u_plane[..chroma_width], &mut v_plane[..chroma_width]);

            let processed = run_bytes(
                isa,
                BgrToYuv420Rows::<SOURCE_CHANNELS> {
                    params: &params,
                    bgra0,
                    bgra1,
                    y_plane0: &mut *y_plane0,
                    y_plane1: &mut *y_plane1,
                    u_plane: &mut *u_plane,
                    v_plane: &mut *v_plane,
                    width,
                },
            );

            for cx in (processed.cx..width).step_by(2) {
                let p00 = load_pixel(bgra0, cx, src_chans);
                let p01 = load_pixel(bgra0, cx + 1, src_chans);
                let p10 = load_pixel(bgra1, cx, src_chans);
                let p11 = load_pixel(bgra1, cx + 1, src_chans);
                y_plane0[cx] = bgr_to_y(&params, p00.0, p00.1, p00.2);
                y_plane0[cx + 1] = bgr_to_y(&params, p01.0, p01.1, p01.2);
                y_plane1[cx] = bgr_to_y(&params, p10.0, p10.1, p10.2);
                y_plane1[cx + 1] = bgr_to_y(&params, p11.0, p11.1, p11.2);

                let avg = |a: i32, b: i32, c: i32, d: i32| {
                    avg4(a as u8, b as u8, c as u8, d as u8) as i32
                };
                let (u, v) = encode_chroma(
                    &params,
                    (
                        avg(p00.0, p01.0, p10.0, p11.0),
                        avg(p00.1, p01.1, p10.1, p11.1),
                        avg(p00.2, p01.2, p10.2, p11.2),
                    ),
                );
                u_plane[cx / 2] = u;
                v_plane[cx / 2] = v;
            }
        }
    } else {
        let iter = bgra
            .chunks_exact(bgra_stride)
            .zip(y_plane.chunks_exact_mut(y_stride))
            .zip(u_plane.chunks_exact_mut(u_stride))
            .zip(v_plane.chunks_exact_mut(v_stride));
        for (((bgra, y_plane), u_plane), v_plane) in iter {
            let y_plane = &mut y_plane[..width];
            let (u_plane, v_plane) = (&mut u_plane[..chroma_width], &mut v_plane[..chroma_width]);

            let processed = run_bytes(
                isa,
                BgrToYuvRow::<SOURCE_CHANNELS, SAMPLING> {
                    params: &params,
                    bgra,
                    y_plane: &mut *y_plane,
                    u_plane: &mut *u_plane,
                    v_plane: &mut *v_plane,
                    width,
                },
            );

            if chroma_subsampling == YuvChromaSubsampling::Yuv444 {
                for cx in processed.cx..width {
                    let (b, g, r) = load_pixel(bgra, cx, src_chans);
                    y_plane[cx] = bgr_to_y(&params, b, g, r);
                    (u_plane[cx], v_plane[cx]) = encode_chroma(&params, (b, g, r));
                }
            } else {
                for cx in (processed.cx..width).step_by(2) {
                    let p0 = load_pixel(bgra, cx, src_chans);
                    let p1 = load_pixel(bgra, cx + 1, src_chans);
                    y_plane[cx] = bgr_to_y(&params, p0.0, p0.1, p0.2);
                    y_plane[cx + 1] = bgr_to_y(&params, p1.0, p1.1, p1.2);
                    let avg = |a: i32, b: i32| avg2(a as u8, b as u8) as i32;
                    (u_plane[cx / 2], v_plane[cx / 2]) = encode_chroma(
                        &params,
                        (avg(p0.0, p1.0), avg(p0.1, p1.1), avg(p0.2, p1.2)),
                    );
                }
            }
        }
    }

    Ok(())
}

fn bgrx_to_yuv<const SOURCE_CHANNELS: u8, const SAMPLING: u8>(
    planar_image: &mut YuvPlanarImageMut<u8>,
    bgra: &[u8],
    bgra_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    bgrx_to_yuv_with_isa::<SOURCE_CHANNELS, SAMPLING>(
        planar_image,
        bgra,
        bgra_stride,
        standard,
        simd_isa(),
    )
}

fn bgra_to_yuva<const SAMPLING: u8>(
    planar_image: &mut YuvPlanarImageMut<u8>,
    a_plane: &mut [u8],
    a_stride: u32,
    bgra: &[u8],
    bgra_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    planar_image.check_constraints(SAMPLING.into())?;
    check_a8_channel(a_plane, a_stride, planar_image.width, planar_image.height)?;
    check_rgba_destination(
        bgra,
        bgra_stride,
        planar_image.width,
        planar_image.height,
        4,
    )?;

    bgrx_to_yuv::<{ YuvSourceChannels::Bgra as u8 }, SAMPLING>(
        planar_image,
        bgra,
        bgra_stride,
        standard,
    )?;

    let width = planar_image.width as usize;
    for (a_dst, bgra) in a_plane
        .chunks_exact_mut(a_stride as usize)
        .zip(bgra.chunks_exact(bgra_stride as usize))
    {
        for (a_dst, px) in a_dst[..width].iter_mut().zip(bgra.chunks_exact(4)) {
            *a_dst = px[YuvSourceChannels::Bgra.get_a_channel_offset()];
        }
    }
    Ok(())
}

/// Convert BGR image data to YUV 420 planar format.
///
/// This function performs BGR to YUV conversion and stores the result in YUV420 planar format,
/// with separate planes for Y (luminance), U (chrominance), and V (chrominance) components.
/// Chroma is computed from the rounded average of each 2x2 block.
///
/// # Arguments
///
/// * `planar_image` - Target planar image, width and height must be even.
/// * `bgr` - The input BGR image data slice.
/// * `bgr_stride` - Elements per row of the BGR image data.
/// * `standard` - The YUV standard matrix, it also selects the range.
///
/// # Errors
///
/// Returns an error before writing anything if plane sizes, strides or the image shape are not valid.
///
pub fn bgr_to_yuv420(
    planar_image: &mut YuvPlanarImageMut<u8>,
    bgr: &[u8],
    bgr_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    bgrx_to_yuv::<{ YuvSourceChannels::Bgr as u8 }, { YuvChromaSubsampling::Yuv420 as u8 }>(
        planar_image,
        bgr,
        bgr_stride,
        standard,
    )
}

/// Convert BGRA image data to YUV 420 planar format, alpha is ignored.
pub fn bgra_to_yuv420(
    planar_image: &mut YuvPlanarImageMut<u8>,
    bgra: &[u8],
    bgra_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    bgrx_to_yuv::<{ YuvSourceChannels::Bgra as u8 }, { YuvChromaSubsampling::Yuv420 as u8 }>(
        planar_image,
        bgra,
        bgra_stride,
        standard,
    )
}

/// Convert RGB image data to YUV 420 planar format.
pub fn rgb_to_yuv420(
    planar_image: &mut YuvPlanarImageMut<u8>,
    rgb: &[u8],
    rgb_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    bgrx_to_yuv::<{ YuvSourceChannels::Rgb as u8 }, { YuvChromaSubsampling::Yuv420 as u8 }>(
        planar_image,
        rgb,
        rgb_stride,
        standard,
    )
}

/// Convert RGBA image data to YUV 420 planar format, alpha is ignored.
pub fn rgba_to_yuv420(
    planar_image: &mut YuvPlanarImageMut<u8>,
    rgba: &[u8],
    rgba_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    bgrx_to_yuv::<{ YuvSourceChannels::Rgba as u8 }, { YuvChromaSubsampling::Yuv420 as u8 }>(
        planar_image,
        rgba,
        rgba_stride,
        standard,
    )
}

/// Convert BGR image data to YUV 422 planar format.
///
/// Chroma is computed from the rounded average of each horizontal pixel pair.
///
/// # Arguments
///
/// * `planar_image` - Target planar image, width must be even.
/// * `bgr` - The input BGR image data slice.
/// * `bgr_stride` - Elements per row of the BGR image data.
/// * `standard` - The YUV standard matrix.
///
pub fn bgr_to_yuv422(
    planar_image: &mut YuvPlanarImageMut<u8>,
    bgr: &[u8],
    bgr_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    bgrx_to_yuv::<{ YuvSourceChannels::Bgr as u8 }, { YuvChromaSubsampling::Yuv422 as u8 }>(
        planar_image,
        bgr,
        bgr_stride,
        standard,
    )
}

pub fn bgra_to_yuv422(
    planar_image: &mut YuvPlanarImageMut<u8>,
    bgra: &[u8],
    bgra_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    bgrx_to_yuv::<{ YuvSourceChannels::Bgra as u8 }, { YuvChromaSubsampling::Yuv422 as u8 }>(
        planar_image,
        bgra,
        bgra_stride,
        standard,
    )
}

pub fn rgb_to_yuv422(
    planar_image: &mut YuvPlanarImageMut<u8>,
    rgb: &[u8],
    rgb_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    bgrx_to_yuv::<{ YuvSourceChannels::Rgb as u8 }, { YuvChromaSubsampling::Yuv422 as u8 }>(
        planar_image,
        rgb,
        rgb_stride,
        standard,
    )
}

pub fn rgba_to_yuv422(
    planar_image: &mut YuvPlanarImageMut<u8>,
    rgba: &[u8],
    rgba_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    bgrx_to_yuv::<{ YuvSourceChannels::Rgba as u8 }, { YuvChromaSubsampling::Yuv422 as u8 }>(
        planar_image,
        rgba,
        rgba_stride,
        standard,
    )
}

/// Convert BGR image data to YUV 444 planar format.
///
/// # Arguments
///
/// * `planar_image` - Target planar image.
/// * `bgr` - The input BGR image data slice.
/// * `bgr_stride` - Elements per row of the BGR image data.
/// * `standard` - The YUV standard matrix.
///
pub fn bgr_to_yuv444(
    planar_image: &mut YuvPlanarImageMut<u8>,
    bgr: &[u8],
    bgr_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    bgrx_to_yuv::<{ YuvSourceChannels::Bgr as u8 }, { YuvChromaSubsampling::Yuv444 as u8 }>(
        planar_image,
        bgr,
        bgr_stride,
        standard,
    )
}

pub fn bgra_to_yuv444(
    planar_image: &mut YuvPlanarImageMut<u8>,
    bgra: &[u8],
    bgra_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    bgrx_to_yuv::<{ YuvSourceChannels::Bgra as u8 }, { YuvChromaSubsampling::Yuv444 as u8 }>(
        planar_image,
        bgra,
        bgra_stride,
        standard,
    )
}

pub fn rgb_to_yuv444(
    planar_image: &mut YuvPlanarImageMut<u8>,
    rgb: &[u8],
    rgb_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    bgrx_to_yuv::<{ YuvSourceChannels::Rgb as u8 }, { YuvChromaSubsampling::Yuv444 as u8 }>(
        planar_image,
        rgb,
        rgb_stride,
        standard,
    )
}

pub fn rgba_to_yuv444(
    planar_image: &mut YuvPlanarImageMut<u8>,
    rgba: &[u8],
    rgba_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    bgrx_to_yuv::<{ YuvSourceChannels::Rgba as u8 }, { YuvChromaSubsampling::Yuv444 as u8 }>(
        planar_image,
        rgba,
        rgba_stride,
        standard,
    )
}

/// Convert BGRA image data to YUV 420 planar format and a full resolution alpha plane.
///
/// # Arguments
///
/// * `planar_image` - Target planar image, width and height must be even.
/// * `a_plane` - Target alpha plane.
/// * `a_stride` - Elements per row of the alpha plane.
/// * `bgra` - The input BGRA image data slice.
/// * `bgra_stride` - Elements per row of the BGRA image data.
/// * `standard` - The YUV standard matrix.
///
pub fn bgra_to_yuva420(
    planar_image: &mut YuvPlanarImageMut<u8>,
    a_plane: &mut [u8],
    a_stride: u32,
    bgra: &[u8],
    bgra_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    bgra_to_yuva::<{ YuvChromaSubsampling::Yuv420 as u8 }>(
        planar_image,
        a_plane,
        a_stride,
        bgra,
        bgra_stride,
        standard,
    )
}

/// Convert BGRA image data to YUV 422 planar format and a full resolution alpha plane.
pub fn bgra_to_yuva422(
    planar_image: &mut YuvPlanarImageMut<u8>,
    a_plane: &mut [u8],
    a_stride: u32,
    bgra: &[u8],
    bgra_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    bgra_to_yuva::<{ YuvChromaSubsampling::Yuv422 as u8 }>(
        planar_image,
        a_plane,
        a_stride,
        bgra,
        bgra_stride,
        standard,
    )
}

/// Convert BGRA image data to YUV 444 planar format and a full resolution alpha plane.
pub fn bgra_to_yuva444(
    planar_image: &mut YuvPlanarImageMut<u8>,
    a_plane: &mut [u8],
    a_stride: u32,
    bgra: &[u8],
    bgra_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    bgra_to_yuva::<{ YuvChromaSubsampling::Yuv444 as u8 }>(
        planar_image,
        a_plane,
        a_stride,
        bgra,
        bgra_stride,
        standard,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yuv_to_bgr::yuv420_to_bgr;
    use rand::Rng;

    fn random_image(len: usize) -> Vec<u8> {
        let mut rng = rand::rng();
        (0..len).map(|_| rng.random_range(0..=255u8)).collect()
    }

    fn encode_with<const CN: u8, const SAMPLING: u8>(
        bgra: &[u8],
        width: u32,
        height: u32,
        standard: YuvStandard,
        isa: SimdIsa,
    ) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
        let channels = YuvSourceChannels::from(CN).get_channels_count() as u32;
        let mut planar_image = YuvPlanarImageMut::alloc(width, height, SAMPLING.into());
        bgrx_to_yuv_with_isa::<CN, SAMPLING>(
            &mut planar_image,
            bgra,
            width * channels,
            standard,
            isa,
        )
        .unwrap();
        (
            planar_image.y_plane.borrow().to_vec(),
            planar_image.u_plane.borrow().to_vec(),
            planar_image.v_plane.borrow().to_vec(),
        )
    }

    fn check_all_isas<const CN: u8, const SAMPLING: u8>() {
        let subsampling: YuvChromaSubsampling = SAMPLING.into();
        let channels = YuvSourceChannels::from(CN).get_channels_count();
        for isa in SimdIsa::available() {
            let lanes = isa.byte_lanes().max(2);
            for width in [lanes - 1, lanes, lanes + 1, 3 * lanes + 5] {
                let width = if subsampling == YuvChromaSubsampling::Yuv444 {
                    width
                } else {
                    (width + 1) & !1
                };
                for height in [2u32, 4] {
                    let bgra = random_image(width * channels * height as usize);
                    for standard in YuvStandard::ALL {
                        let reference = encode_with::<CN, SAMPLING>(
                            &bgra,
                            width as u32,
                            height,
                            standard,
                            SimdIsa::Scalar,
                        );
                        let vector =
                            encode_with::<CN, SAMPLING>(&bgra, width as u32, height, standard, isa);
                        assert_eq!(reference, vector, "{isa:?} width {width} {standard:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn all_isas_match_scalar() {
        check_all_isas::<{ YuvSourceChannels::Bgr as u8 }, { YuvChromaSubsampling::Yuv420 as u8 }>(
        );
        check_all_isas::<{ YuvSourceChannels::Rgba as u8 }, { YuvChromaSubsampling::Yuv420 as u8 }>(
        );
        check_all_isas::<{ YuvSourceChannels::Bgra as u8 }, { YuvChromaSubsampling::Yuv422 as u8 }>(
        );
        check_all_isas::<{ YuvSourceChannels::Rgb as u8 }, { YuvChromaSubsampling::Yuv444 as u8 }>(
        );
    }

    #[test]
    fn black_and_white_hit_range_limits() {
        let mut planar_image = YuvPlanarImageMut::alloc(4, 2, YuvChromaSubsampling::Yuv420);
        let mut bgr = vec![0u8; 4 * 3 * 2];
        bgr_to_yuv420(&mut planar_image, &bgr, 12, YuvStandard::Bt709).unwrap();
        assert!(planar_image.y_plane.borrow().iter().all(|&v| v == 16));
        assert!(planar_image.u_plane.borrow().iter().all(|&v| v == 128));
        assert!(planar_image.v_plane.borrow().iter().all(|&v| v == 128));

        bgr.fill(255);
        bgr_to_yuv420(&mut planar_image, &bgr, 12, YuvStandard::Bt709).unwrap();
        assert!(planar_image.y_plane.borrow().iter().all(|&v| v == 235));

        bgr_to_yuv420(&mut planar_image, &bgr, 12, YuvStandard::Trect871).unwrap();
        assert!(planar_image.y_plane.borrow().iter().all(|&v| v == 255));
    }

    #[test]
    fn chroma_422_averages_pixel_pairs() {
        let mut planar_image = YuvPlanarImageMut::alloc(2, 1, YuvChromaSubsampling::Yuv422);
        let bgr = [0u8, 0, 0, 255, 255, 255];
        bgr_to_yuv422(&mut planar_image, &bgr, 6, YuvStandard::Bt601).unwrap();
        assert_eq!(planar_image.y_plane.borrow(), &[16, 235]);
        assert_eq!(planar_image.u_plane.borrow(), &[128]);
        assert_eq!(planar_image.v_plane.borrow(), &[128]);
    }

    #[test]
    fn rgb_source_matches_swapped_bgr_source() {
        let bgr = random_image(10 * 3 * 4);
        let rgb: Vec<u8> = bgr
            .chunks_exact(3)
            .flat_map(|px| [px[2], px[1], px[0]])
            .collect();
        let mut from_bgr = YuvPlanarImageMut::alloc(10, 4, YuvChromaSubsampling::Yuv420);
        let mut from_rgb = YuvPlanarImageMut::alloc(10, 4, YuvChromaSubsampling::Yuv420);
        bgr_to_yuv420(&mut from_bgr, &bgr, 30, YuvStandard::Smpte240).unwrap();
        rgb_to_yuv420(&mut from_rgb, &rgb, 30, YuvStandard::Smpte240).unwrap();
        assert_eq!(from_bgr.y_plane.borrow(), from_rgb.y_plane.borrow());
        assert_eq!(from_bgr.u_plane.borrow(), from_rgb.u_plane.borrow());
        assert_eq!(from_bgr.v_plane.borrow(), from_rgb.v_plane.borrow());
    }

    #[test]
    fn yuv420_round_trip_stays_close() {
        let (width, height) = (38usize, 6usize);
        let mut rng = rand::rng();
        let mut bgr = vec![0u8; width * 3 * height];
        // Flat 2x2 blocks, so chroma subsampling itself loses nothing
        for by in 0..height / 2 {
            for bx in 0..width / 2 {
                let color = [
                    rng.random_range(0..=255u8),
                    rng.random_range(0..=255u8),
                    rng.random_range(0..=255u8),
                ];
                for dy in 0..2 {
                    for dx in 0..2 {
                        let offset = ((by * 2 + dy) * width + bx * 2 + dx) * 3;
                        bgr[offset..offset + 3].copy_from_slice(&color);
                    }
                }
            }
        }
        for standard in YuvStandard::ALL {
            let mut planar_image =
                YuvPlanarImageMut::alloc(width as u32, height as u32, YuvChromaSubsampling::Yuv420);
            bgr_to_yuv420(&mut planar_image, &bgr, width as u32 * 3, standard).unwrap();
            let mut decoded = vec![0u8; bgr.len()];
            yuv420_to_bgr(
                &planar_image.to_fixed(),
                &mut decoded,
                width as u32 * 3,
                standard,
            )
            .unwrap();
            for (&a, &b) in bgr.iter().zip(decoded.iter()) {
                assert!((a as i32 - b as i32).abs() <= 3, "{standard:?}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn alpha_plane_receives_source_alpha() {
        let (width, height) = (6u32, 2u32);
        let bgra = random_image(width as usize * 4 * height as usize);
        let mut planar_image =
            YuvPlanarImageMut::alloc(width, height, YuvChromaSubsampling::Yuv444);
        let mut a_plane = vec![0u8; (width * height) as usize];
        bgra_to_yuva444(
            &mut planar_image,
            &mut a_plane,
            width,
            &bgra,
            width * 4,
            YuvStandard::Bt601,
        )
        .unwrap();
        for (&a, px) in a_plane.iter().zip(bgra.chunks_exact(4)) {
            assert_eq!(a, px[3]);
        }

        let mut without_alpha =
            YuvPlanarImageMut::alloc(width, height, YuvChromaSubsampling::Yuv444);
        bgra_to_yuv444(&mut without_alpha, &bgra, width * 4, YuvStandard::Bt601).unwrap();
        assert_eq!(without_alpha.y_plane.borrow(), planar_image.y_plane.borrow());

        let mut short_alpha = vec![0u8; (width * height) as usize - 1];
        let mut untouched = YuvPlanarImageMut::alloc(width, height, YuvChromaSubsampling::Yuv444);
        assert!(matches!(
            bgra_to_yuva444(
                &mut untouched,
                &mut short_alpha,
                width,
                &bgra,
                width * 4,
                YuvStandard::Bt601,
            ),
            Err(YuvError::AlphaPlaneSizeMismatch(_))
        ));
        assert!(untouched.y_plane.borrow().iter().all(|&v| v == 0));
    }

    #[test]
    fn odd_width_is_rejected() {
        let mut planar_image = YuvPlanarImageMut::<u8>::alloc(5, 2, YuvChromaSubsampling::Yuv444);
        let bgr = vec![0u8; 5 * 3 * 2];
        assert!(matches!(
            bgr_to_yuv420(&mut planar_image, &bgr, 15, YuvStandard::Bt601),
            Err(YuvError::OddWidth { width: 5, .. })
        ));
        assert!(planar_image.y_plane.borrow().iter().all(|&v| v == 0));
    }
}
