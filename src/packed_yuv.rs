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
use crate::lanes::{PackedToBgrRow, PackedToYuv420Rows};
use crate::numerics::{avg2, yuv_to_blue, yuv_to_green, yuv_to_red};
use crate::yuv_error::check_rgba_destination;
use crate::yuv_support::{PackedYuvLayout, YuvChromaSubsampling, YuvSourceChannels, YuvStandard};
use crate::{YuvError, YuvPackedImage, YuvPlanarImageMut};

pub(crate) fn packed_to_bgrx_with_isa<const DESTINATION_CHANNELS: u8, const LAYOUT: u8>(
    packed_image: &YuvPackedImage<u8>,
    bgra: &mut [u8],
    bgra_stride: u32,
    alpha: u8,
    standard: YuvStandard,
    isa: SimdIsa,
) -> Result<(), YuvError> {
    let dst_chans: YuvSourceChannels = DESTINATION_CHANNELS.into();
    let channels = dst_chans.get_channels_count();
    let layout: PackedYuvLayout = LAYOUT.into();

    packed_image.check_constraints()?;
    check_rgba_destination(
        bgra,
        bgra_stride,
        packed_image.width,
        packed_image.height,
        channels,
    )?;

    let params = standard.decoding();
    let width = packed_image.width as usize;

    for (yuy, bgra) in packed_image
        .yuy
        .chunks_exact(packed_image.yuy_stride as usize)
        .zip(bgra.chunks_exact_mut(bgra_stride as usize))
    {
        let yuy = &yuy[..width * 2];
        let processed = run_bytes(
            isa,
            PackedToBgrRow::<DESTINATION_CHANNELS, LAYOUT> {
                params: &params,
                yuy,
                bgra: &mut *bgra,
                alpha,
                width,
            },
        );

        for (quad, pair) in yuy[processed.cx * 2..]
            .chunks_exact(4)
            .zip(bgra[processed.cx * channels..width * channels].chunks_exact_mut(channels * 2))
        {
            let u_value = quad[layout.get_u_position()] as i32;
            let v_value = quad[layout.get_v_position()] as i32;
            let luma = [
                quad[layout.get_first_y_position()] as i32,
                quad[layout.get_second_y_position()] as i32,
            ];
            for (px, y_value) in pair.chunks_exact_mut(channels).zip(luma) {
                px[dst_chans.get_b_channel_offset()] = yuv_to_blue(&params, y_value, u_value);
                px[dst_chans.get_g_channel_offset()] =
                    yuv_to_green(&params, y_value, u_value, v_value);
                px[dst_chans.get_r_channel_offset()] = yuv_to_red(&params, y_value, v_value);
                if dst_chans.has_alpha() {
                    px[dst_chans.get_a_channel_offset()] = alpha;
                }
            }
        }
    }

    Ok(())
}

pub(crate) fn packed_to_yuv420_with_isa<const LAYOUT: u8>(
    packed_image: &YuvPackedImage<u8>,
    planar_image: &mut YuvPlanarImageMut<u8>,
    isa: SimdIsa,
) -> Result<(), YuvError> {
    let layout: PackedYuvLayout = LAYOUT.into();
    packed_image.check_constraints()?;
    planar_image.check_constraints(YuvChromaSubsampling::Yuv420)?;
    if packed_image.width != planar_image.width || packed_image.height != planar_image.height {
        return Err(YuvError::ImagesSizesNotMatch);
    }

    let width = packed_image.width as usize;
    let chroma_width = width / 2;
    let yuy_stride = packed_image.yuy_stride as usize;
    let y_stride = planar_image.y_stride as usize;
    let u_stride = planar_image.u_stride as usize;
    let v_stride = planar_image.v_stride as usize;

    let y_plane = planar_image.y_plane.borrow_mut();
    let u_plane = planar_image.u_plane.borrow_mut();
    let v_plane = planar_image.v_plane.borrow_mut();

    let iter = packed_image
        .yuy
        .chunks_exact(yuy_stride * 2)
        .zip(y_plane.chunks_exact_mut(y_stride * 2))
        .zip(u_plane.chunks_exact_mut(u_stride))
        .zip(v_plane.chunks_exact_mut(v_stride));

    for (((yuy, y_plane), u_plane), v_plane) in iter {
        let (yuy0, yuy1) = yuy.split_at(yuy_stride);
        let (yuy0, yuy1) = (&yuy0[..width * 2], &yuy1[..width * 2]);
        let (y_plane0, y_plane1) = y_plane.split_at_mut(y_stride);
        let (y_plane0, y_plane1) = (&mut y_plane0[..width], &mut y_plane1[..width]);
        let (u_plane, v_plane) = (&mut u_plane[..chroma_width], &mut v_plane[..chroma_width]);

        let processed = run_bytes(
            isa,
            PackedToYuv420Rows::<LAYOUT> {
                yuy0,
                yuy1,
                y_plane0: &mut *y_plane0,
                y_plane1: &mut *y_plane1,
                u_plane: &mut *u_plane,
                v_plane: &mut *v_plane,
                width,
            },
        );

        for ux in processed.ux..chroma_width {
            let q0 = &yuy0[ux * 4..ux * 4 + 4];
            let q1 = &yuy1[ux * 4..ux * 4 + 4];
            y_plane0[ux * 2] = q0[layout.get_first_y_position()];
            y_plane0[ux * 2 + 1] = q0[layout.get_second_y_position()];
            y_plane1[ux * 2] = q1[layout.get_first_y_position()];
            y_plane1[ux * 2 + 1] = q1[layout.get_second_y_position()];
            u_plane[ux] = avg2(q0[layout.get_u_position()], q1[layout.get_u_position()]);
            v_plane[ux] = avg2(q0[layout.get_v_position()], q1[layout.get_v_position()]);
        }
    }

    Ok(())
}

fn packed_to_bgrx<const DESTINATION_CHANNELS: u8, const LAYOUT: u8>(
    packed_image: &YuvPackedImage<u8>,
    bgra: &mut [u8],
    bgra_stride: u32,
    alpha: u8,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    packed_to_bgrx_with_isa::<DESTINATION_CHANNELS, LAYOUT>(
        packed_image,
        bgra,
        bgra_stride,
        alpha,
        standard,
        simd_isa(),
    )
}

/// Convert packed UYVY 4:2:2 to BGR format.
///
/// Every four bytes `U Y0 V Y1` produce two pixels sharing one chroma pair.
///
/// # Arguments
///
/// * `packed_image` - Source packed image, width must be even.
/// * `dst` - A mutable slice to store the converted BGR data.
/// * `dst_stride` - Elements per row of the destination.
/// * `standard` - The YUV standard matrix.
///
pub fn uyvy422_to_bgr(
    packed_image: &YuvPackedImage<u8>,
    dst: &mut [u8],
    dst_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    packed_to_bgrx::<{ YuvSourceChannels::Bgr as u8 }, { PackedYuvLayout::Uyvy as u8 }>(
        packed_image,
        dst,
        dst_stride,
        255,
        standard,
    )
}

pub fn uyvy422_to_rgb(
    packed_image: &YuvPackedImage<u8>,
    dst: &mut [u8],
    dst_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    packed_to_bgrx::<{ YuvSourceChannels::Rgb as u8 }, { PackedYuvLayout::Uyvy as u8 }>(
        packed_image,
        dst,
        dst_stride,
        255,
        standard,
    )
}

/// Convert packed UYVY 4:2:2 to BGRA format, alpha is filled with `alpha`.
pub fn uyvy422_to_bgra(
    packed_image: &YuvPackedImage<u8>,
    dst: &mut [u8],
    dst_stride: u32,
    alpha: u8,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    packed_to_bgrx::<{ YuvSourceChannels::Bgra as u8 }, { PackedYuvLayout::Uyvy as u8 }>(
        packed_image,
        dst,
        dst_stride,
        alpha,
        standard,
    )
}

pub fn uyvy422_to_rgba(
    packed_image: &YuvPackedImage<u8>,
    dst: &mut [u8],
    dst_stride: u32,
    alpha: u8,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    packed_to_bgrx::<{ YuvSourceChannels::Rgba as u8 }, { PackedYuvLayout::Uyvy as u8 }>(
        packed_image,
        dst,
        dst_stride,
        alpha,
        standard,
    )
}

/// Convert packed YUYV 4:2:2 (`Y0 U Y1 V`) to BGR format.
pub fn yuyv422_to_bgr(
    packed_image: &YuvPackedImage<u8>,
    dst: &mut [u8],
    dst_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    packed_to_bgrx::<{ YuvSourceChannels::Bgr as u8 }, { PackedYuvLayout::Yuyv as u8 }>(
        packed_image,
        dst,
        dst_stride,
        255,
        standard,
    )
}

pub fn yuyv422_to_rgb(
    packed_image: &YuvPackedImage<u8>,
    dst: &mut [u8],
    dst_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    packed_to_bgrx::<{ YuvSourceChannels::Rgb as u8 }, { PackedYuvLayout::Yuyv as u8 }>(
        packed_image,
        dst,
        dst_stride,
        255,
        standard,
    )
}

pub fn yuyv422_to_bgra(
    packed_image: &YuvPackedImage<u8>,
    dst: &mut [u8],
    dst_stride: u32,
    alpha: u8,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    packed_to_bgrx::<{ YuvSourceChannels::Bgra as u8 }, { PackedYuvLayout::Yuyv as u8 }>(
        packed_image,
        dst,
        dst_stride,
        alpha,
        standard,
    )
}

pub fn yuyv422_to_rgba(
    packed_image: &YuvPackedImage<u8>,
    dst: &mut [u8],
    dst_stride: u32,
    alpha: u8,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    packed_to_bgrx::<{ YuvSourceChannels::Rgba as u8 }, { PackedYuvLayout::Yuyv as u8 }>(
        packed_image,
        dst,
        dst_stride,
        alpha,
        standard,
    )
}

/// Convert packed UYVY 4:2:2 into planar YUV 4:2:0.
///
/// Luma is copied, chroma of each row pair is averaged with rounding.
/// Both images must have the same even width and height.
pub fn uyvy422_to_yuv420(
    packed_image: &YuvPackedImage<u8>,
    planar_image: &mut YuvPlanarImageMut<u8>,
) -> Result<(), YuvError> {
    packed_to_yuv420_with_isa::<{ PackedYuvLayout::Uyvy as u8 }>(
        packed_image,
        planar_image,
        simd_isa(),
    )
}

/// Convert packed YUYV 4:2:2 into planar YUV 4:2:0.
pub fn yuyv422_to_yuv420(
    packed_image: &YuvPackedImage<u8>,
    planar_image: &mut YuvPlanarImageMut<u8>,
) -> Result<(), YuvError> {
    packed_to_yuv420_with_isa::<{ PackedYuvLayout::Yuyv as u8 }>(
        packed_image,
        planar_image,
        simd_isa(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yuv_to_bgr::yuv422_to_bgra;
    use crate::YuvPlanarImage;
    use rand::Rng;

    fn random_bytes(len: usize) -> Vec<u8> {
        let mut rng = rand::rng();
        (0..len).map(|_| rng.random_range(0..=255u8)).collect()
    }

    fn decode_with<const CN: u8, const LAYOUT: u8>(
        packed_image: &YuvPackedImage<u8>,
        isa: SimdIsa,
    ) -> Vec<u8> {
        let channels = YuvSourceChannels::from(CN).get_channels_count();
        let stride = packed_image.width as usize * channels + 3;
        let mut dst = vec![0u8; stride * packed_image.height as usize];
        packed_to_bgrx_with_isa::<CN, LAYOUT>(
            packed_image,
            &mut dst,
            stride as u32,
            77,
            YuvStandard::Bt709,
            isa,
        )
        .unwrap();
        dst
    }

    #[test]
    fn packed_decoding_matches_scalar_on_every_isa() {
        for isa in SimdIsa::available() {
            let lanes = isa.byte_lanes().max(2);
            for width in [lanes, lanes + 2, 2 * lanes + 6] {
                for height in 1..=3u32 {
                    let yuy = random_bytes(width * 2 * height as usize);
                    let packed_image = YuvPackedImage {
                        yuy: &yuy,
                        yuy_stride: width as u32 * 2,
                        width: width as u32,
                        height,
                    };
                    assert_eq!(
                        decode_with::<
                            { YuvSourceChannels::Bgra as u8 },
                            { PackedYuvLayout::Uyvy as u8 },
                        >(&packed_image, SimdIsa::Scalar),
                        decode_with::<
                            { YuvSourceChannels::Bgra as u8 },
                            { PackedYuvLayout::Uyvy as u8 },
                        >(&packed_image, isa),
                        "{isa:?} width {width}"
                    );
                    assert_eq!(
                        decode_with::<
                            { YuvSourceChannels::Rgb as u8 },
                            { PackedYuvLayout::Yuyv as u8 },
                        >(&packed_image, SimdIsa::Scalar),
                        decode_with::<
                            { YuvSourceChannels::Rgb as u8 },
                            { PackedYuvLayout::Yuyv as u8 },
                        >(&packed_image, isa),
                        "{isa:?} width {width}"
                    );
                }
            }
        }
    }

    #[test]
    fn uyvy_matches_equivalent_planar_422() {
        let (width, height) = (10usize, 3usize);
        let y_plane = random_bytes(width * height);
        let u_plane = random_bytes(width / 2 * height);
        let v_plane = random_bytes(width / 2 * height);
        let mut yuy = vec![0u8; width * 2 * height];
        for (i, quad) in yuy.chunks_exact_mut(4).enumerate() {
            quad.copy_from_slice(&[u_plane[i], y_plane[i * 2], v_plane[i], y_plane[i * 2 + 1]]);
        }
        let planar_image = YuvPlanarImage {
            y_plane: &y_plane,
            y_stride: width as u32,
            u_plane: &u_plane,
            u_stride: width as u32 / 2,
            v_plane: &v_plane,
            v_stride: width as u32 / 2,
            width: width as u32,
            height: height as u32,
        };
        let mut from_planar = vec![0u8; width * 4 * height];
        yuv422_to_bgra(
            &planar_image,
            &mut from_planar,
            width as u32 * 4,
            255,
            YuvStandard::Bt601,
        )
        .unwrap();

        let packed_image = YuvPackedImage {
            yuy: &yuy,
            yuy_stride: width as u32 * 2,
            width: width as u32,
            height: height as u32,
        };
        let mut from_packed = vec![0u8; width * 4 * height];
        uyvy422_to_bgra(
            &packed_image,
            &mut from_packed,
            width as u32 * 4,
            255,
            YuvStandard::Bt601,
        )
        .unwrap();
        assert_eq!(from_planar, from_packed);
    }

    #[test]
    fn yuyv_and_uyvy_differ_only_in_byte_order() {
        let uyvy = random_bytes(8 * 2 * 2);
        let yuyv: Vec<u8> = uyvy
            .chunks_exact(4)
            .flat_map(|q| [q[1], q[0], q[3], q[2]])
            .collect();
        let mut a = vec![0u8; 8 * 3 * 2];
        let mut b = vec![0u8; 8 * 3 * 2];
        fn image(yuy: &[u8]) -> YuvPackedImage<'_, u8> {
            YuvPackedImage {
                yuy,
                yuy_stride: 16,
                width: 8,
                height: 2,
            }
        }
        uyvy422_to_rgb(&image(&uyvy), &mut a, 24, YuvStandard::Bt2020).unwrap();
        yuyv422_to_rgb(&image(&yuyv), &mut b, 24, YuvStandard::Bt2020).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn uyvy_to_yuv420_averages_chroma_rows() {
        let yuy = [
            10u8, 1, 20, 2, 30, 3, 40, 4, //
            11, 5, 23, 6, 30, 7, 41, 8,
        ];
        let packed_image = YuvPackedImage {
            yuy: &yuy,
            yuy_stride: 8,
            width: 4,
            height: 2,
        };
        let mut planar_image = YuvPlanarImageMut::alloc(4, 2, YuvChromaSubsampling::Yuv420);
        uyvy422_to_yuv420(&packed_image, &mut planar_image).unwrap();
        assert_eq!(planar_image.y_plane.borrow(), &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(planar_image.u_plane.borrow(), &[11, 30]);
        assert_eq!(planar_image.v_plane.borrow(), &[22, 41]);
    }

    #[test]
    fn packed_to_yuv420_matches_scalar_on_every_isa() {
        for isa in SimdIsa::available() {
            let width = isa.byte_lanes().max(2) * 2 + 4;
            let yuy = random_bytes(width * 2 * 4);
            let packed_image = YuvPackedImage {
                yuy: &yuy,
                yuy_stride: width as u32 * 2,
                width: width as u32,
                height: 4,
            };
            let mut reference =
                YuvPlanarImageMut::alloc(width as u32, 4, YuvChromaSubsampling::Yuv420);
            let mut vector =
                YuvPlanarImageMut::alloc(width as u32, 4, YuvChromaSubsampling::Yuv420);
            packed_to_yuv420_with_isa::<{ PackedYuvLayout::Yuyv as u8 }>(
                &packed_image,
                &mut reference,
                SimdIsa::Scalar,
            )
            .unwrap();
            packed_to_yuv420_with_isa::<{ PackedYuvLayout::Yuyv as u8 }>(
                &packed_image,
                &mut vector,
                isa,
            )
            .unwrap();
            assert_eq!(reference.y_plane.borrow(), vector.y_plane.borrow());
            assert_eq!(reference.u_plane.borrow(), vector.u_plane.borrow());
            assert_eq!(reference.v_plane.borrow(), vector.v_plane.borrow());
        }
    }

    #[test]
    fn odd_width_and_mismatched_images_are_rejected() {
        let yuy = [0u8; 6];
        let packed_image = YuvPackedImage {
            yuy: &yuy,
            yuy_stride: 6,
            width: 3,
            height: 1,
        };
        let mut dst = [0u8; 9];
        assert!(matches!(
            uyvy422_to_bgr(&packed_image, &mut dst, 9, YuvStandard::Bt601),
            Err(YuvError::OddWidth { .. })
        ));

        let yuy = [0u8; 16];
        let packed_image = YuvPackedImage {
            yuy: &yuy,
            yuy_stride: 8,
            width: 4,
            height: 2,
        };
        let mut planar_image = YuvPlanarImageMut::alloc(6, 2, YuvChromaSubsampling::Yuv420);
        assert_eq!(
            uyvy422_to_yuv420(&packed_image, &mut planar_image),
            Err(YuvError::ImagesSizesNotMatch)
        );
    }
}
