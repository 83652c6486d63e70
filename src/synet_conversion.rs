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
use crate::dispatch::{run_bytes, select_scale, simd_isa, SimdIsa};
use crate::lanes::{BgrToGrayRow, SetInputRow, SetInputTarget};
use crate::numerics::bgr_to_gray_value;
use crate::synet_error::{check_buffer, check_channel_param, tensor_volume};
use crate::synet_scale::{scale_forward_with_kind, TensorShape};
use crate::tensor::{scale_value, PixelFormat, SynetCompatibility, TensorElement, TensorFormat};
use crate::yuv_error::{check_rgba_destination, check_y8_channel};
use crate::yuv_support::YuvSourceChannels;
use crate::{SynetError, YuvError};

#[inline]
fn check_plain_format(format: TensorFormat) -> Result<(), SynetError> {
    match format {
        TensorFormat::Nchw | TensorFormat::Nhwc => Ok(()),
        _ => Err(SynetError::UnsupportedFormat(format)),
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn convert_with_isa<S: TensorElement, D: TensorElement>(
    src: &[S],
    shape: TensorShape,
    scale: &[f32],
    shift: &[f32],
    dst: &mut [D],
    upper: f32,
    fused: bool,
    isa: SimdIsa,
) -> Result<(), SynetError> {
    check_plain_format(shape.format)?;
    let len = shape.buffer_len()?;
    check_channel_param("scale", scale, shape.channels)?;
    check_channel_param("shift", shift, shape.channels)?;
    check_buffer("src", src, len)?;
    check_buffer("dst", dst, len)?;

    let kind = select_scale(shape.format, shape.channels, shape.spatial);
    log::trace!("convert: {:?} via {:?}, fused {}", kind, isa, fused);
    if fused {
        scale_forward_with_kind::<S, D, true>(
            src,
            scale,
            Some(shift),
            shape,
            dst,
            upper,
            kind,
            isa,
        );
    } else {
        scale_forward_with_kind::<S, D, false>(
            src,
            scale,
            Some(shift),
            shape,
            dst,
            upper,
            kind,
            isa,
        );
    }
    Ok(())
}

/// Quantizes a float tensor: `dst = saturate(round(src * scale[c] + shift[c]))`.
///
/// Rounding is half to even, saturation is to `0..=U` where `U` comes from
/// `compatibility.quantization`. `compatibility.fma` selects fused or split multiply-add.
///
/// # Errors
///
/// Returns an error before writing anything for blocked formats, parameters without
/// `channels` values or buffers not holding exactly the tensor.
#[allow(clippy::too_many_arguments)]
pub fn synet_convert_32f_to_8u(
    src: &[f32],
    batch: usize,
    channels: usize,
    height: usize,
    width: usize,
    format: TensorFormat,
    scale: &[f32],
    shift: &[f32],
    dst: &mut [u8],
    compatibility: SynetCompatibility,
) -> Result<(), SynetError> {
    let spatial = tensor_volume(&[height, width])?;
    convert_with_isa(
        src,
        TensorShape {
            batch,
            channels,
            spatial,
            format,
        },
        scale,
        shift,
        dst,
        compatibility.quantization.upper_bound() as f32,
        compatibility.fma.fused(),
        simd_isa(),
    )
}

/// Widens an 8-bit tensor: `dst = src * scale[c] + shift[c]`.
#[allow(clippy::too_many_arguments)]
pub fn synet_convert_8u_to_32f(
    src: &[u8],
    batch: usize,
    channels: usize,
    height: usize,
    width: usize,
    format: TensorFormat,
    scale: &[f32],
    shift: &[f32],
    dst: &mut [f32],
) -> Result<(), SynetError> {
    let spatial = tensor_volume(&[height, width])?;
    convert_with_isa(
        src,
        TensorShape {
            batch,
            channels,
            spatial,
            format,
        },
        scale,
        shift,
        dst,
        0.,
        false,
        simd_isa(),
    )
}

/// Pixel image handed to [synet_set_input].
#[derive(Debug, Copy, Clone)]
pub(crate) struct PixelImage<'a> {
    pub(crate) src: &'a [u8],
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) stride: usize,
    pub(crate) format: PixelFormat,
}

fn set_input_rows<const FORMAT: u8>(
    image: PixelImage,
    scale: [f32; 3],
    shift: [f32; 3],
    channels: usize,
    dst: &mut [f32],
    dst_format: TensorFormat,
    isa: SimdIsa,
) {
    let format: PixelFormat = FORMAT.into();
    let step = format.pixel_size();
    let (width, height) = (image.width, image.height);
    let plane = width * height;
    let value = |px: &[u8], c: usize| -> f32 {
        let v = if channels == 1 {
            format.to_gray(px)
        } else {
            format.to_bgr(px, c)
        };
        scale_value::<u8, f32, false>(v, scale[c], Some(shift[c]), 0.)
    };

    if channels == 1 {
        for (src, dst) in image
            .src
            .chunks(image.stride)
            .zip(dst.chunks_exact_mut(width))
        {
            let src = &src[..width * step];
            let processed = run_bytes(
                isa,
                SetInputRow::<FORMAT> {
                    src,
                    scale,
                    shift,
                    target: SetInputTarget::Gray(&mut *dst),
                    width,
                },
            );
            for (dst, px) in dst[processed..]
                .iter_mut()
                .zip(src[processed * step..].chunks_exact(step))
            {
                *dst = value(px, 0);
            }
        }
    } else if dst_format == TensorFormat::Nchw {
        let (dst0, rest) = dst.split_at_mut(plane);
        let (dst1, dst2) = rest.split_at_mut(plane);
        let rows = image
            .src
            .chunks(image.stride)
            .zip(dst0.chunks_exact_mut(width))
            .zip(dst1.chunks_exact_mut(width))
            .zip(dst2.chunks_exact_mut(width));
        for (((src, dst0), dst1), dst2) in rows {
            let src = &src[..width * step];
            let processed = run_bytes(
                isa,
                SetInputRow::<FORMAT> {
                    src,
                    scale,
                    shift,
                    target: SetInputTarget::Planar(&mut *dst0, &mut *dst1, &mut *dst2),
                    width,
                },
            );
            for (x, px) in src.chunks_exact(step).enumerate().skip(processed) {
                dst0[x] = value(px, 0);
                dst1[x] = value(px, 1);
                dst2[x] = value(px, 2);
            }
        }
    } else {
        for (src, dst) in image
            .src
            .chunks(image.stride)
            .zip(dst.chunks_exact_mut(width * 3))
        {
            let src = &src[..width * step];
            let processed = run_bytes(
                isa,
                SetInputRow::<FORMAT> {
                    src,
                    scale,
                    shift,
                    target: SetInputTarget::Interleaved(&mut *dst),
                    width,
                },
            );
            for (dst, px) in dst[processed * 3..]
                .chunks_exact_mut(3)
                .zip(src[processed * step..].chunks_exact(step))
            {
                for (c, dst) in dst.iter_mut().enumerate() {
                    *dst = value(px, c);
                }
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn set_input_with_isa(
    image: PixelImage,
    lower: &[f32],
    upper: &[f32],
    dst: &mut [f32],
    channels: usize,
    dst_format: TensorFormat,
    isa: SimdIsa,
) -> Result<(), SynetError> {
    if channels != 1 && channels != 3 {
        return Err(SynetError::UnsupportedChannels(channels));
    }
    check_plain_format(dst_format)?;
    check_channel_param("lower", lower, channels)?;
    check_channel_param("upper", upper, channels)?;
    let plane = tensor_volume(&[image.width, image.height])?;
    let row = image
        .width
        .checked_mul(image.format.pixel_size())
        .ok_or(SynetError::ShapeOverflow)?;
    if image.stride < row {
        return Err(SynetError::BufferSizeMismatch {
            name: "stride",
            expected: row,
            received: image.stride,
        });
    }
    let src_len = image
        .stride
        .checked_mul(image.height - 1)
        .and_then(|v| v.checked_add(row))
        .ok_or(SynetError::ShapeOverflow)?;
    if image.src.len() < src_len {
        return Err(SynetError::BufferSizeMismatch {
            name: "src",
            expected: src_len,
            received: image.src.len(),
        });
    }
    check_buffer("dst", dst, tensor_volume(&[plane, channels])?)?;

    let mut scale = [0f32; 3];
    let mut shift = [0f32; 3];
    for (((scale, shift), &lower), &upper) in scale
        .iter_mut()
        .zip(shift.iter_mut())
        .zip(lower.iter())
        .zip(upper.iter())
    {
        *scale = (upper - lower) / 255.;
        *shift = lower;
    }

    let image = PixelImage {
        src: &image.src[..src_len],
        ..image
    };
    log::trace!(
        "set input: {:?} into {} channels {:?} via {:?}",
        image.format,
        channels,
        dst_format,
        isa
    );
    match image.format {
        PixelFormat::Gray8 => set_input_rows::<{ PixelFormat::Gray8 as u8 }>(
            image, scale, shift, channels, dst, dst_format, isa,
        ),
        PixelFormat::Bgr24 => set_input_rows::<{ PixelFormat::Bgr24 as u8 }>(
            image, scale, shift, channels, dst, dst_format, isa,
        ),
        PixelFormat::Bgra32 => set_input_rows::<{ PixelFormat::Bgra32 as u8 }>(
            image, scale, shift, channels, dst, dst_format, isa,
        ),
        PixelFormat::Rgb24 => set_input_rows::<{ PixelFormat::Rgb24 as u8 }>(
            image, scale, shift, channels, dst, dst_format, isa,
        ),
    }
    Ok(())
}

/// Fills a network input tensor from an 8-bit image.
///
/// Each channel is mapped linearly from `0..=255` onto `lower[c]..=upper[c]`.
/// One channel takes the gray value of the pixel, three channels are written in B, G, R
/// order (gray pixels are replicated) either as planes (`Nchw`) or as triples (`Nhwc`).
///
/// # Arguments
///
/// * `src` - Pixel rows, `stride` bytes apart.
/// * `pixel_format` - Layout of one source pixel.
/// * `lower`, `upper` - Output range per channel.
/// * `dst` - Target tensor of `channels x height x width` values.
///
/// # Errors
///
/// Returns an error before writing anything for channel counts other than 1 or 3,
/// blocked formats or buffers that are too small.
#[allow(clippy::too_many_arguments)]
pub fn synet_set_input(
    src: &[u8],
    width: usize,
    height: usize,
    stride: usize,
    pixel_format: PixelFormat,
    lower: &[f32],
    upper: &[f32],
    dst: &mut [f32],
    channels: usize,
    dst_format: TensorFormat,
) -> Result<(), SynetError> {
    set_input_with_isa(
        PixelImage {
            src,
            width,
            height,
            stride,
            format: pixel_format,
        },
        lower,
        upper,
        dst,
        channels,
        dst_format,
        simd_isa(),
    )
}

#[inline(always)]
fn tensor_offset(
    format: TensorFormat,
    channels: usize,
    spatial: usize,
    b: usize,
    c: usize,
    s: usize,
) -> usize {
    match format {
        TensorFormat::Nchw => (b * channels + c) * spatial + s,
        TensorFormat::Nhwc => (b * spatial + s) * channels + c,
        TensorFormat::Nchw4c | TensorFormat::Nchw8c | TensorFormat::Nchw16c => {
            let block = format.block_size();
            let blocks = channels.div_ceil(block);
            ((b * blocks + c / block) * spatial + s) * block + c % block
        }
    }
}

/// Copies a tensor between memory layouts.
///
/// Blocked layouts round channels up to the block size, padding channels written to
/// `dst` are zero.
pub fn synet_reorder_image<T: Copy + Default>(
    batch: usize,
    channels: usize,
    spatial: usize,
    src: &[T],
    src_format: TensorFormat,
    dst: &mut [T],
    dst_format: TensorFormat,
) -> Result<(), SynetError> {
    tensor_volume(&[batch, channels, spatial])?;
    let src_len = TensorShape {
        batch,
        channels,
        spatial,
        format: src_format,
    }
    .buffer_len()?;
    let dst_len = TensorShape {
        batch,
        channels,
        spatial,
        format: dst_format,
    }
    .buffer_len()?;
    check_buffer("src", src, src_len)?;
    check_buffer("dst", dst, dst_len)?;

    if src_format == dst_format {
        dst.copy_from_slice(src);
        return Ok(());
    }
    if dst_format.is_blocked() && channels % dst_format.block_size() != 0 {
        dst.fill(T::default());
    }
    for b in 0..batch {
        for c in 0..channels {
            for s in 0..spatial {
                dst[tensor_offset(dst_format, channels, spatial, b, c, s)] =
                    src[tensor_offset(src_format, channels, spatial, b, c, s)];
            }
        }
    }
    Ok(())
}

pub(crate) fn bgrx_to_gray_with_isa<const SOURCE_CHANNELS: u8>(
    bgra: &[u8],
    bgra_stride: u32,
    width: u32,
    height: u32,
    gray: &mut [u8],
    gray_stride: u32,
    isa: SimdIsa,
) -> Result<(), YuvError> {
    let src_chans: YuvSourceChannels = SOURCE_CHANNELS.into();
    let channels = src_chans.get_channels_count();
    if width == 0 || height == 0 {
        return Err(YuvError::ZeroBaseSize);
    }
    check_rgba_destination(bgra, bgra_stride, width, height, channels)?;
    check_y8_channel(gray, gray_stride, width, height)?;

    let width = width as usize;
    for (bgra, gray) in bgra
        .chunks_exact(bgra_stride as usize)
        .zip(gray.chunks_exact_mut(gray_stride as usize))
    {
        let gray = &mut gray[..width];
        let processed = run_bytes(
            isa,
            BgrToGrayRow::<SOURCE_CHANNELS> {
                bgra,
                gray: &mut *gray,
                width,
            },
        );
        for (dst, px) in gray[processed..]
            .iter_mut()
            .zip(bgra[processed * channels..width * channels].chunks_exact(channels))
        {
            *dst = bgr_to_gray_value(
                px[src_chans.get_b_channel_offset()] as i32,
                px[src_chans.get_g_channel_offset()] as i32,
                px[src_chans.get_r_channel_offset()] as i32,
            );
        }
    }
    Ok(())
}

/// Convert BGR image data to a gray plane.
///
/// `gray = (1868 * b + 9617 * g + 4899 * r + 8192) >> 14`
///
/// # Arguments
///
/// * `bgr` - Source rows, `bgr_stride` elements apart.
/// * `gray` - Target plane, `gray_stride` elements per row.
///
pub fn bgr_to_gray(
    bgr: &[u8],
    bgr_stride: u32,
    width: u32,
    height: u32,
    gray: &mut [u8],
    gray_stride: u32,
) -> Result<(), YuvError> {
    bgrx_to_gray_with_isa::<{ YuvSourceChannels::Bgr as u8 }>(
        bgr,
        bgr_stride,
        width,
        height,
        gray,
        gray_stride,
        simd_isa(),
    )
}

/// Convert BGRA image data to a gray plane, alpha is ignored.
pub fn bgra_to_gray(
    bgra: &[u8],
    bgra_stride: u32,
    width: u32,
    height: u32,
    gray: &mut [u8],
    gray_stride: u32,
) -> Result<(), YuvError> {
    bgrx_to_gray_with_isa::<{ YuvSourceChannels::Bgra as u8 }>(
        bgra,
        bgra_stride,
        width,
        height,
        gray,
        gray_stride,
        simd_isa(),
    )
}

pub fn rgb_to_gray(
    rgb: &[u8],
    rgb_stride: u32,
    width: u32,
    height: u32,
    gray: &mut [u8],
    gray_stride: u32,
) -> Result<(), YuvError> {
    bgrx_to_gray_with_isa::<{ YuvSourceChannels::Rgb as u8 }>(
        rgb,
        rgb_stride,
        width,
        height,
        gray,
        gray_stride,
        simd_isa(),
    )
}

pub fn rgba_to_gray(
    rgba: &[u8],
    rgba_stride: u32,
    width: u32,
    height: u32,
    gray: &mut [u8],
    gray_stride: u32,
) -> Result<(), YuvError> {
    bgrx_to_gray_with_isa::<{ YuvSourceChannels::Rgba as u8 }>(
        rgba,
        rgba_stride,
        width,
        height,
        gray,
        gray_stride,
        simd_isa(),
    )
}
