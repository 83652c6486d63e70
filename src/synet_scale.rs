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
use crate::dispatch::{run_floats, select_scale, simd_isa, ScaleKind, SimdIsa};
use crate::lanes::{ScaleNhwc3, ScalePixel, ScalePlane};
use crate::synet_error::{check_buffer, check_channel_param, tensor_volume};
use crate::tensor::{scale_value, SynetCompatibility, TensorElement, TensorFormat};
use crate::SynetError;

/// `batch x channels x spatial` tensor in some [TensorFormat].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct TensorShape {
    pub(crate) batch: usize,
    pub(crate) channels: usize,
    pub(crate) spatial: usize,
    pub(crate) format: TensorFormat,
}

impl TensorShape {
    /// Checks extents for overflow and returns the element count in `format`.
    pub(crate) fn buffer_len(&self) -> Result<usize, SynetError> {
        tensor_volume(&[
            self.batch,
            self.format.stored_channels(self.channels),
            self.spatial,
        ])
    }
}

#[inline(always)]
fn scale_tail<S: TensorElement, D: TensorElement, const FMA: bool>(
    src: &[S],
    dst: &mut [D],
    scale: f32,
    bias: Option<f32>,
    upper: f32,
) {
    for (dst, &src) in dst.iter_mut().zip(src.iter()) {
        *dst = scale_value::<S, D, FMA>(src, scale, bias, upper);
    }
}

fn scale_pixel<S: TensorElement, D: TensorElement, const FMA: bool>(
    src: &[S],
    dst: &mut [D],
    scale: &[f32],
    bias: Option<&[f32]>,
    upper: f32,
    isa: SimdIsa,
) {
    let processed = run_floats(
        isa,
        ScalePixel::<S, D, FMA> {
            src,
            dst: &mut *dst,
            scale,
            bias,
            upper,
        },
    );
    for (c, (dst, &src)) in dst
        .iter_mut()
        .zip(src.iter())
        .enumerate()
        .skip(processed)
    {
        *dst = scale_value::<S, D, FMA>(src, scale[c], bias.map(|b| b[c]), upper);
    }
}

/// Per-channel affine transform shared by the scale layer, type conversions and the
/// quantized scale layer. Buffers and parameters must be validated by the caller.
#[allow(clippy::too_many_arguments)]
pub(crate) fn scale_forward_with_kind<S: TensorElement, D: TensorElement, const FMA: bool>(
    src: &[S],
    scale: &[f32],
    bias: Option<&[f32]>,
    shape: TensorShape,
    dst: &mut [D],
    upper: f32,
    kind: ScaleKind,
    isa: SimdIsa,
) {
    let TensorShape {
        channels, spatial, ..
    } = shape;
    match kind {
        ScaleKind::Nchw => {
            let planes = src.chunks_exact(spatial).zip(dst.chunks_exact_mut(spatial));
            for (i, (src, dst)) in planes.enumerate() {
                let c = i % channels;
                let (scale, bias) = (scale[c], bias.map(|b| b[c]));
                let processed = run_floats(
                    isa,
                    ScalePlane::<S, D, FMA> {
                        src,
                        dst: &mut *dst,
                        scale,
                        bias,
                        upper,
                    },
                );
                scale_tail::<S, D, FMA>(
                    &src[processed..],
                    &mut dst[processed..],
                    scale,
                    bias,
                    upper,
                );
            }
        }
        ScaleKind::Nhwc3 => {
            let scale3 = [scale[0], scale[1], scale[2]];
            let bias3 = bias.map(|b| [b[0], b[1], b[2]]);
            for (src, dst) in src
                .chunks_exact(spatial * 3)
                .zip(dst.chunks_exact_mut(spatial * 3))
            {
                let processed = run_floats(
                    isa,
                    ScaleNhwc3::<S, D, FMA> {
                        src,
                        dst: &mut *dst,
                        scale: scale3,
                        bias: bias3,
                        upper,
                    },
                );
                for (i, (dst, &src)) in dst
                    .iter_mut()
                    .zip(src.iter())
                    .enumerate()
                    .skip(processed)
                {
                    let c = i % 3;
                    *dst = scale_value::<S, D, FMA>(src, scale3[c], bias3.map(|b| b[c]), upper);
                }
            }
        }
        ScaleKind::Nhwc => {
            for (src, dst) in src
                .chunks_exact(channels)
                .zip(dst.chunks_exact_mut(channels))
            {
                scale_pixel::<S, D, FMA>(src, dst, scale, bias, upper, isa);
            }
        }
        ScaleKind::Blocked(block) => {
            let blocks = channels.div_ceil(block);
            let runs = src
                .chunks_exact(spatial * block)
                .zip(dst.chunks_exact_mut(spatial * block));
            for (i, (src, dst)) in runs.enumerate() {
                let first = (i % blocks) * block;
                let real = block.min(channels - first);
                let scale = &scale[first..first + real];
                let bias = bias.map(|b| &b[first..first + real]);
                for (src, dst) in src.chunks_exact(block).zip(dst.chunks_exact_mut(block)) {
                    let (dst, padding) = dst.split_at_mut(real);
                    scale_pixel::<S, D, FMA>(&src[..real], dst, scale, bias, upper, isa);
                    padding.fill(D::default());
                }
            }
        }
    }
}

pub(crate) fn scale_layer_with_isa(
    src: &[f32],
    scale: &[f32],
    bias: Option<&[f32]>,
    shape: TensorShape,
    dst: &mut [f32],
    compatibility: SynetCompatibility,
    isa: SimdIsa,
) -> Result<(), SynetError> {
    let len = shape.buffer_len()?;
    check_channel_param("scale", scale, shape.channels)?;
    if let Some(bias) = bias {
        check_channel_param("bias", bias, shape.channels)?;
    }
    check_buffer("src", src, len)?;
    check_buffer("dst", dst, len)?;

    let kind = select_scale(shape.format, shape.channels, shape.spatial);
    log::trace!("scale layer: {:?} via {:?}", kind, isa);
    if compatibility.fma.fused() {
        scale_forward_with_kind::<f32, f32, true>(src, scale, bias, shape, dst, 0., kind, isa);
    } else {
        scale_forward_with_kind::<f32, f32, false>(src, scale, bias, shape, dst, 0., kind, isa);
    }
    Ok(())
}

/// Scale layer: `dst = src * scale[c] + bias[c]` for every element of channel `c`.
///
/// Blocked layouts hold channels rounded up to the block size, the padding channels of
/// `dst` are written as zero.
///
/// # Arguments
///
/// * `src` - Source tensor of `channels x height x width` in `format`.
/// * `scale` - One factor per channel.
/// * `bias` - Optional per channel term, `None` skips the addition.
/// * `dst` - Target tensor, same size as `src`.
/// * `compatibility` - Selects fused or split multiply-add.
///
/// # Errors
///
/// Returns an error before writing anything if a parameter does not have `channels` values
/// or a buffer does not match the tensor size.
#[allow(clippy::too_many_arguments)]
pub fn synet_scale_layer_forward(
    src: &[f32],
    scale: &[f32],
    bias: Option<&[f32]>,
    channels: usize,
    height: usize,
    width: usize,
    dst: &mut [f32],
    format: TensorFormat,
    compatibility: SynetCompatibility,
) -> Result<(), SynetError> {
    let spatial = tensor_volume(&[height, width])?;
    scale_layer_with_isa(
        src,
        scale,
        bias,
        TensorShape {
            batch: 1,
            channels,
            spatial,
            format,
        },
        dst,
        compatibility,
        simd_isa(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::FmaMode;
    use rand::Rng;

    fn random_f32(len: usize) -> Vec<f32> {
        let mut rng = rand::rng();
        (0..len).map(|_| rng.random_range(-10f32..10f32)).collect()
    }

    #[test]
    fn doubles_a_single_channel() {
        let src = [1f32, 2., 3.];
        let mut dst = [0f32; 3];
        synet_scale_layer_forward(
            &src,
            &[2.],
            Some(&[0.]),
            1,
            1,
            3,
            &mut dst,
            TensorFormat::Nchw,
            SynetCompatibility::default(),
        )
        .unwrap();
        assert_eq!(dst, [2., 4., 6.]);
    }

    #[test]
    fn nhwc_applies_channel_parameters_per_pixel() {
        let src = [1f32, 1., 1., 1., 2., 2., 2., 2.];
        let mut dst = [0f32; 8];
        synet_scale_layer_forward(
            &src,
            &[1., 2., 3., 4.],
            Some(&[0.5, 0., -1., 0.]),
            4,
            1,
            2,
            &mut dst,
            TensorFormat::Nhwc,
            SynetCompatibility::default(),
        )
        .unwrap();
        assert_eq!(dst, [1.5, 2., 2., 4., 2.5, 4., 5., 8.]);
    }

    #[test]
    fn blocked_padding_channels_are_zero() {
        // 3 channels in NCHW4c, 2 pixels
        let src = [1f32, 1., 1., 9., 2., 2., 2., 9.];
        let mut dst = [7f32; 8];
        synet_scale_layer_forward(
            &src,
            &[1., 10., 100.],
            None,
            3,
            1,
            2,
            &mut dst,
            TensorFormat::Nchw4c,
            SynetCompatibility::default(),
        )
        .unwrap();
        assert_eq!(dst, [1., 10., 100., 0., 2., 20., 200., 0.]);
    }

    #[test]
    fn all_isas_match_scalar_for_every_layout() {
        for format in TensorFormat::ALL {
            for channels in [1usize, 3, 5, 17] {
                for spatial in [1usize, 7, 33] {
                    let shape = TensorShape {
                        batch: 2,
                        channels,
                        spatial,
                        format,
                    };
                    let len = shape.buffer_len().unwrap();
                    let src = random_f32(len);
                    let scale = random_f32(channels);
                    let bias = random_f32(channels);
                    for fma in [FmaMode::Use, FmaMode::Avoid] {
                        let compatibility = SynetCompatibility {
                            fma,
                            ..Default::default()
                        };
                        let mut reference = vec![0f32; len];
                        scale_layer_with_isa(
                            &src,
                            &scale,
                            Some(&bias),
                            shape,
                            &mut reference,
                            compatibility,
                            SimdIsa::Scalar,
                        )
                        .unwrap();
                        for isa in SimdIsa::available() {
                            let mut dst = vec![0f32; len];
                            scale_layer_with_isa(
                                &src,
                                &scale,
                                Some(&bias),
                                shape,
                                &mut dst,
                                compatibility,
                                isa,
                            )
                            .unwrap();
                            assert_eq!(reference, dst, "{isa:?} {shape:?}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn fma_mode_selects_fusion() {
        let x = 1.0000001f32;
        let s = 1.0000001f32;
        let b = -1.0000002f32;
        let mut fused = [0f32];
        let mut split = [0f32];
        for (fma, dst) in [(FmaMode::NoTail, &mut fused), (FmaMode::Avoid, &mut split)] {
            synet_scale_layer_forward(
                &[x],
                &[s],
                Some(&[b]),
                1,
                1,
                1,
                dst,
                TensorFormat::Nchw,
                SynetCompatibility {
                    fma,
                    ..Default::default()
                },
            )
            .unwrap();
        }
        assert_eq!(fused[0], x.mul_add(s, b));
        assert_eq!(split[0], x * s + b);
    }

    #[test]
    fn mismatched_parameters_are_rejected() {
        let mut dst = [0f32; 6];
        assert_eq!(
            synet_scale_layer_forward(
                &[0f32; 6],
                &[1., 1.],
                None,
                3,
                1,
                2,
                &mut dst,
                TensorFormat::Nchw,
                SynetCompatibility::default(),
            ),
            Err(SynetError::ChannelParamMismatch {
                name: "scale",
                expected: 3,
                received: 2
            })
        );
        assert!(matches!(
            synet_scale_layer_forward(
                &[0f32; 6],
                &[1.; 3],
                None,
                3,
                1,
                2,
                &mut dst,
                TensorFormat::Nchw8c,
                SynetCompatibility::default(),
            ),
            Err(SynetError::BufferSizeMismatch { name: "src", .. })
        ));
    }
}
