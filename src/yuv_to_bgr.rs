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
use crate::lanes::{AlphaSource, YuvToBgrRow};
use crate::numerics::{yuv_to_blue, yuv_to_green, yuv_to_red};
#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
use crate::sse::sse_yuv_to_bgr_row;
use crate::yuv_error::check_rgba_destination;
use crate::yuv_support::{YuvChromaSubsampling, YuvSourceChannels, YuvStandard};
use crate::{YuvError, YuvPlanarImage, YuvPlanarImageWithAlpha};

/// Alpha for the whole image, resolved to [AlphaSource] row by row.
#[derive(Debug, Copy, Clone)]
pub(crate) enum AlphaInput<'a> {
    Constant(u8),
    Plane { a_plane: &'a [u8], a_stride: usize },
}

pub(crate) fn yuv_to_bgrx_with_isa<const DESTINATION_CHANNELS: u8, const SAMPLING: u8>(
    planar_image: &YuvPlanarImage<u8>,
    alpha: AlphaInput,
    bgra: &mut [u8],
    bgra_stride: u32,
    standard: YuvStandard,
    isa: SimdIsa,
) -> Result<(), YuvError> {
    let chroma_subsampling: YuvChromaSubsampling = SAMPLING.into();
    let dst_chans: YuvSourceChannels = DESTINATION_CHANNELS.into();
    let channels = dst_chans.get_channels_count();

    planar_image.check_constraints(chroma_subsampling)?;
    check_rgba_destination(
        bgra,
        bgra_stride,
        planar_image.width,
        planar_image.height,
        channels,
    )?;

    let params = standard.decoding();
    let width = planar_image.width as usize;
    let chroma_width = chroma_subsampling.chroma_width(width);
    let chroma_shift = match chroma_subsampling {
        YuvChromaSubsampling::Yuv444 => 0,
        YuvChromaSubsampling::Yuv420 | YuvChromaSubsampling::Yuv422 => 1,
    };

    for (y, bgra) in bgra.chunks_exact_mut(bgra_stride as usize).enumerate() {
        let chroma_y = if chroma_subsampling == YuvChromaSubsampling::Yuv420 {
            y >> 1
        } else {
            y
        };
        let y_plane = &planar_image.y_plane[y * planar_image.y_stride as usize..][..width];
        let u_plane =
            &planar_image.u_plane[chroma_y * planar_image.u_stride as usize..][..chroma_width];
        let v_plane =
            &planar_image.v_plane[chroma_y * planar_image.v_stride as usize..][..chroma_width];
        let alpha = match alpha {
            AlphaInput::Constant(value) => AlphaSource::Constant(value),
            AlphaInput::Plane { a_plane, a_stride } => {
                AlphaSource::Plane(&a_plane[y * a_stride..][..width])
            }
        };

        let processed = match isa {
            #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
            SimdIsa::Sse41 if isa.is_available() => unsafe {
                sse_yuv_to_bgr_row::<DESTINATION_CHANNELS, SAMPLING>(
                    &params,
                    y_plane,
                    u_plane,
                    v_plane,
                    alpha,
                    &mut *bgra,
                    width,
                )
            },
            _ => run_bytes(
                isa,
                YuvToBgrRow::<DESTINATION_CHANNELS, SAMPLING> {
                    params: &params,
                    y_plane,
                    u_plane,
                    v_plane,
                    alpha,
                    bgra: &mut *bgra,
                    width,
                },
            ),
        };

        for (x, (rgba, &y_src)) in bgra[..width * channels]
            .chunks_exact_mut(channels)
            .zip(y_plane.iter())
            .enumerate()
            .skip(processed.cx)
        {
            let y_value = y_src as i32;
            let u_value = u_plane[x >> chroma_shift] as i32;
            let v_value = v_plane[x >> chroma_shift] as i32;

            rgba[dst_chans.get_b_channel_offset()] = yuv_to_blue(&params, y_value, u_value);
            rgba[dst_chans.get_g_channel_offset()] =
                yuv_to_green(&params, y_value, u_value, v_value);
            rgba[dst_chans.get_r_channel_offset()] = yuv_to_red(&params, y_value, v_value);
            if dst_chans.has_alpha() {
                rgba[dst_chans.get_a_channel_offset()] = alpha.get(x);
            }
        }
    }

    Ok(())
}

fn yuv_to_bgrx<const DESTINATION_CHANNELS: u8, const SAMPLING: u8>(
    planar_image: &YuvPlanarImage<u8>,
    alpha: u8,
    bgra: &mut [u8],
    bgra_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuv_to_bgrx_with_isa::<DESTINATION_CHANNELS, SAMPLING>(
        planar_image,
        AlphaInput::Constant(alpha),
        bgra,
        bgra_stride,
        standard,
        simd_isa(),
    )
}

fn yuva_to_bgrx<const DESTINATION_CHANNELS: u8, const SAMPLING: u8>(
    planar_image_with_alpha: &YuvPlanarImageWithAlpha<u8>,
    bgra: &mut [u8],
    bgra_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    planar_image_with_alpha.check_constraints(SAMPLING.into())?;
    yuv_to_bgrx_with_isa::<DESTINATION_CHANNELS, SAMPLING>(
        &planar_image_with_alpha.color_planes(),
        AlphaInput::Plane {
            a_plane: planar_image_with_alpha.a_plane,
            a_stride: planar_image_with_alpha.a_stride as usize,
        },
        bgra,
        bgra_stride,
        standard,
        simd_isa(),
    )
}

/// Convert YUV 420 planar format to BGR format.
///
/// This function takes YUV 420 planar format data with 8-bit precision,
/// and converts it to BGR format with 8-bit per channel precision.
/// Each chroma sample is replicated to its 2x2 luma block.
///
/// # Arguments
///
/// * `planar_image` - Source planar image, width and height must be even.
/// * `bgr` - A mutable slice to store the converted BGR data.
/// * `bgr_stride` - Elements per row of the BGR image data.
/// * `standard` - The YUV standard matrix (BT.601, BT.709, BT.2020, SMPTE 240M, T.871), it also selects the range.
///
/// # Errors
///
/// Returns an error before writing anything if plane sizes, strides or the image shape are not valid.
///
pub fn yuv420_to_bgr(
    planar_image: &YuvPlanarImage<u8>,
    bgr: &mut [u8],
    bgr_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuv_to_bgrx::<{ YuvSourceChannels::Bgr as u8 }, { YuvChromaSubsampling::Yuv420 as u8 }>(
        planar_image,
        255,
        bgr,
        bgr_stride,
        standard,
    )
}

/// Convert YUV 420 planar format to RGB format.
///
/// Same as [yuv420_to_bgr] with red and blue swapped in the destination.
pub fn yuv420_to_rgb(
    planar_image: &YuvPlanarImage<u8>,
    rgb: &mut [u8],
    rgb_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuv_to_bgrx::<{ YuvSourceChannels::Rgb as u8 }, { YuvChromaSubsampling::Yuv420 as u8 }>(
        planar_image,
        255,
        rgb,
        rgb_stride,
        standard,
    )
}

/// Convert YUV 420 planar format to BGRA format.
///
/// # Arguments
///
/// * `planar_image` - Source planar image, width and height must be even.
/// * `bgra` - A mutable slice to store the converted BGRA data.
/// * `bgra_stride` - Elements per row of the BGRA image data.
/// * `alpha` - Value written to every alpha sample.
/// * `standard` - The YUV standard matrix.
///
pub fn yuv420_to_bgra(
    planar_image: &YuvPlanarImage<u8>,
    bgra: &mut [u8],
    bgra_stride: u32,
    alpha: u8,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuv_to_bgrx::<{ YuvSourceChannels::Bgra as u8 }, { YuvChromaSubsampling::Yuv420 as u8 }>(
        planar_image,
        alpha,
        bgra,
        bgra_stride,
        standard,
    )
}

/// Convert YUV 420 planar format to RGBA format, see [yuv420_to_bgra].
pub fn yuv420_to_rgba(
    planar_image: &YuvPlanarImage<u8>,
    rgba: &mut [u8],
    rgba_stride: u32,
    alpha: u8,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuv_to_bgrx::<{ YuvSourceChannels::Rgba as u8 }, { YuvChromaSubsampling::Yuv420 as u8 }>(
        planar_image,
        alpha,
        rgba,
        rgba_stride,
        standard,
    )
}

/// Convert YUV 422 planar format to BGR format.
///
/// This function takes YUV 422 planar format data with 8-bit precision,
/// and converts it to BGR format with 8-bit per channel precision.
/// Each chroma sample is replicated to its horizontal luma pair.
///
/// # Arguments
///
/// * `planar_image` - Source planar image, width must be even.
/// * `bgr` - A mutable slice to store the converted BGR data.
/// * `bgr_stride` - Elements per row of the BGR image data.
/// * `standard` - The YUV standard matrix.
///
/// # Errors
///
/// Returns an error before writing anything if plane sizes, strides or the image shape are not valid.
///
pub fn yuv422_to_bgr(
    planar_image: &YuvPlanarImage<u8>,
    bgr: &mut [u8],
    bgr_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuv_to_bgrx::<{ YuvSourceChannels::Bgr as u8 }, { YuvChromaSubsampling::Yuv422 as u8 }>(
        planar_image,
        255,
        bgr,
        bgr_stride,
        standard,
    )
}

/// Convert YUV 422 planar format to RGB format.
pub fn yuv422_to_rgb(
    planar_image: &YuvPlanarImage<u8>,
    rgb: &mut [u8],
    rgb_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuv_to_bgrx::<{ YuvSourceChannels::Rgb as u8 }, { YuvChromaSubsampling::Yuv422 as u8 }>(
        planar_image,
        255,
        rgb,
        rgb_stride,
        standard,
    )
}

/// Convert YUV 422 planar format to BGRA format with a constant `alpha`.
pub fn yuv422_to_bgra(
    planar_image: &YuvPlanarImage<u8>,
    bgra: &mut [u8],
    bgra_stride: u32,
    alpha: u8,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuv_to_bgrx::<{ YuvSourceChannels::Bgra as u8 }, { YuvChromaSubsampling::Yuv422 as u8 }>(
        planar_image,
        alpha,
        bgra,
        bgra_stride,
        standard,
    )
}

/// Convert YUV 422 planar format to RGBA format with a constant `alpha`.
pub fn yuv422_to_rgba(
    planar_image: &YuvPlanarImage<u8>,
    rgba: &mut [u8],
    rgba_stride: u32,
    alpha: u8,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuv_to_bgrx::<{ YuvSourceChannels::Rgba as u8 }, { YuvChromaSubsampling::Yuv422 as u8 }>(
        planar_image,
        alpha,
        rgba,
        rgba_stride,
        standard,
    )
}

/// Convert YUV 444 planar format to BGR format.
///
/// # Arguments
///
/// * `planar_image` - Source planar image, any non zero size.
/// * `bgr` - A mutable slice to store the converted BGR data.
/// * `bgr_stride` - Elements per row of the BGR image data.
/// * `standard` - The YUV standard matrix.
///
pub fn yuv444_to_bgr(
    planar_image: &YuvPlanarImage<u8>,
    bgr: &mut [u8],
    bgr_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuv_to_bgrx::<{ YuvSourceChannels::Bgr as u8 }, { YuvChromaSubsampling::Yuv444 as u8 }>(
        planar_image,
        255,
        bgr,
        bgr_stride,
        standard,
    )
}

pub fn yuv444_to_rgb(
    planar_image: &YuvPlanarImage<u8>,
    rgb: &mut [u8],
    rgb_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuv_to_bgrx::<{ YuvSourceChannels::Rgb as u8 }, { YuvChromaSubsampling::Yuv444 as u8 }>(
        planar_image,
        255,
        rgb,
        rgb_stride,
        standard,
    )
}

/// Convert YUV 444 planar format to BGRA format with a constant `alpha`.
pub fn yuv444_to_bgra(
    planar_image: &YuvPlanarImage<u8>,
    bgra: &mut [u8],
    bgra_stride: u32,
    alpha: u8,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuv_to_bgrx::<{ YuvSourceChannels::Bgra as u8 }, { YuvChromaSubsampling::Yuv444 as u8 }>(
        planar_image,
        alpha,
        bgra,
        bgra_stride,
        standard,
    )
}

pub fn yuv444_to_rgba(
    planar_image: &YuvPlanarImage<u8>,
    rgba: &mut [u8],
    rgba_stride: u32,
    alpha: u8,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuv_to_bgrx::<{ YuvSourceChannels::Rgba as u8 }, { YuvChromaSubsampling::Yuv444 as u8 }>(
        planar_image,
        alpha,
        rgba,
        rgba_stride,
        standard,
    )
}

/// Convert YUV 420 planar format with alpha plane to BGRA format.
///
/// Alpha is copied unchanged from the full resolution alpha plane.
///
/// # Arguments
///
/// * `planar_image_with_alpha` - Source planar image with alpha, width and height must be even.
/// * `bgra` - A mutable slice to store the converted BGRA data.
/// * `bgra_stride` - Elements per row of the BGRA image data.
/// * `standard` - The YUV standard matrix.
///
pub fn yuva420_to_bgra(
    planar_image_with_alpha: &YuvPlanarImageWithAlpha<u8>,
    bgra: &mut [u8],
    bgra_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuva_to_bgrx::<{ YuvSourceChannels::Bgra as u8 }, { YuvChromaSubsampling::Yuv420 as u8 }>(
        planar_image_with_alpha,
        bgra,
        bgra_stride,
        standard,
    )
}

/// Convert YUV 420 planar format with alpha plane to RGBA format.
pub fn yuva420_to_rgba(
    planar_image_with_alpha: &YuvPlanarImageWithAlpha<u8>,
    rgba: &mut [u8],
    rgba_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuva_to_bgrx::<{ YuvSourceChannels::Rgba as u8 }, { YuvChromaSubsampling::Yuv420 as u8 }>(
        planar_image_with_alpha,
        rgba,
        rgba_stride,
        standard,
    )
}

/// Convert YUV 422 planar format with alpha plane to BGRA format.
pub fn yuva422_to_bgra(
    planar_image_with_alpha: &YuvPlanarImageWithAlpha<u8>,
    bgra: &mut [u8],
    bgra_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuva_to_bgrx::<{ YuvSourceChannels::Bgra as u8 }, { YuvChromaSubsampling::Yuv422 as u8 }>(
        planar_image_with_alpha,
        bgra,
        bgra_stride,
        standard,
    )
}

/// Convert YUV 422 planar format with alpha plane to RGBA format.
pub fn yuva422_to_rgba(
    planar_image_with_alpha: &YuvPlanarImageWithAlpha<u8>,
    rgba: &mut [u8],
    rgba_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuva_to_bgrx::<{ YuvSourceChannels::Rgba as u8 }, { YuvChromaSubsampling::Yuv422 as u8 }>(
        planar_image_with_alpha,
        rgba,
        rgba_stride,
        standard,
    )
}

/// Convert YUV 444 planar format with alpha plane to BGRA format.
pub fn yuva444_to_bgra(
    planar_image_with_alpha: &YuvPlanarImageWithAlpha<u8>,
    bgra: &mut [u8],
    bgra_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuva_to_bgrx::<{ YuvSourceChannels::Bgra as u8 }, { YuvChromaSubsampling::Yuv444 as u8 }>(
        planar_image_with_alpha,
        bgra,
        bgra_stride,
        standard,
    )
}

/// Convert YUV 444 planar format with alpha plane to RGBA format.
pub fn yuva444_to_rgba(
    planar_image_with_alpha: &YuvPlanarImageWithAlpha<u8>,
    rgba: &mut [u8],
    rgba_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuva_to_bgrx::<{ YuvSourceChannels::Rgba as u8 }, { YuvChromaSubsampling::Yuv444 as u8 }>(
        planar_image_with_alpha,
        rgba,
        rgba_stride,
        standard,
    )
}
