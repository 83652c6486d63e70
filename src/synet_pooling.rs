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
use crate::dispatch::{
    run_elements, run_floats, select_pooling_average, select_pooling_max, simd_isa,
    PoolingAverageKind, PoolingMaxKind, SimdIsa,
};
use crate::lanes::{AddRows, ChannelReduce, MaxRows, MulRow, PoolMaxHorizontal, PoolValue};
use crate::synet_error::{check_buffer, tensor_volume};
use crate::tensor::TensorFormat;
use crate::SynetError;

/// Output extent of a pooling window sliding over `src` padded with `pad_begin` and `pad_end`.
///
/// Returns `0` for a zero stride or when the kernel does not fit into the padded input.
pub const fn pooling_output_size(
    src: usize,
    kernel: usize,
    pad_begin: usize,
    pad_end: usize,
    stride: usize,
) -> usize {
    let padded = src + pad_begin + pad_end;
    if stride == 0 || kernel == 0 || padded < kernel {
        return 0;
    }
    (padded - kernel) / stride + 1
}

/// Geometry of a pooling window along one axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PoolingAxis {
    pub src: usize,
    pub dst: usize,
    pub kernel: usize,
    pub stride: usize,
    pub pad_begin: usize,
    pub pad_end: usize,
}

impl PoolingAxis {
    /// Axis left as is, kernel 1 and stride 1.
    pub const fn identity(size: usize) -> Self {
        Self {
            src: size,
            dst: size,
            kernel: 1,
            stride: 1,
            pad_begin: 0,
            pad_end: 0,
        }
    }

    /// Axis with `dst` derived from [pooling_output_size].
    pub const fn new(
        src: usize,
        kernel: usize,
        stride: usize,
        pad_begin: usize,
        pad_end: usize,
    ) -> Self {
        Self {
            src,
            dst: pooling_output_size(src, kernel, pad_begin, pad_end, stride),
            kernel,
            stride,
            pad_begin,
            pad_end,
        }
    }

    #[inline]
    const fn is_identity(&self) -> bool {
        self.kernel == 1
            && self.stride == 1
            && self.pad_begin == 0
            && self.pad_end == 0
            && self.src == self.dst
    }

    /// Source range of output position `d`, clipped to `0..src`.
    #[inline(always)]
    pub(crate) fn window(&self, d: usize) -> (usize, usize) {
        let origin = d * self.stride;
        let start = origin.saturating_sub(self.pad_begin);
        let end = (origin + self.kernel - self.pad_begin).min(self.src);
        (start, end)
    }

    fn validate(&self, axis: &'static str) -> Result<(), SynetError> {
        if self.kernel == 0 {
            return Err(SynetError::InvalidPoolingParams("kernel must be at least 1"));
        }
        if self.stride == 0 {
            return Err(SynetError::InvalidPoolingParams("stride must be at least 1"));
        }
        if self.pad_begin >= self.kernel || self.pad_end >= self.kernel {
            return Err(SynetError::InvalidPoolingParams(
                "padding must be smaller than the kernel",
            ));
        }
        if self.src == 0 {
            return Err(SynetError::ZeroSizedTensor);
        }
        if self.src + self.pad_begin + self.pad_end < self.kernel {
            return Err(SynetError::InvalidPoolingParams(
                "kernel does not fit into the padded input",
            ));
        }
        let expected = pooling_output_size(
            self.src,
            self.kernel,
            self.pad_begin,
            self.pad_end,
            self.stride,
        );
        if self.dst != expected {
            return Err(SynetError::PoolingShapeMismatch {
                axis,
                expected,
                received: self.dst,
            });
        }
        Ok(())
    }
}

/// Pooling geometry of a `channels x height x width` tensor.
///
/// A channel axis other than [PoolingAxis::identity] pools across channel groups as well.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PoolingParams {
    pub channel: PoolingAxis,
    pub y: PoolingAxis,
    pub x: PoolingAxis,
    pub format: TensorFormat,
}

impl PoolingParams {
    pub fn new_2d(channels: usize, y: PoolingAxis, x: PoolingAxis, format: TensorFormat) -> Self {
        Self {
            channel: PoolingAxis::identity(channels),
            y,
            x,
            format,
        }
    }

    /// Channel count is preserved.
    #[inline]
    pub const fn is_2d(&self) -> bool {
        self.channel.is_identity()
    }

    fn validate<T>(&self, src: &[T], dst: &[T]) -> Result<(), SynetError> {
        if !matches!(self.format, TensorFormat::Nchw | TensorFormat::Nhwc) {
            return Err(SynetError::UnsupportedFormat(self.format));
        }
        self.channel.validate("channel")?;
        self.y.validate("height")?;
        self.x.validate("width")?;
        check_buffer(
            "src",
            src,
            tensor_volume(&[self.channel.src, self.y.src, self.x.src])?,
        )?;
        check_buffer(
            "dst",
            dst,
            tensor_volume(&[self.channel.dst, self.y.dst, self.x.dst])?,
        )?;
        Ok(())
    }
}

/// Element offsets of a `channels x height x width` tensor in NCHW or NHWC.
#[derive(Debug, Copy, Clone)]
struct Strides {
    channel: usize,
    row: usize,
    pixel: usize,
}

impl Strides {
    #[inline]
    fn new(channels: usize, height: usize, width: usize, format: TensorFormat) -> Self {
        if format == TensorFormat::Nhwc {
            Strides {
                channel: 1,
                row: width * channels,
                pixel: channels,
            }
        } else {
            Strides {
                channel: height * width,
                row: width,
                pixel: 1,
            }
        }
    }

    #[inline(always)]
    fn offset(&self, c: usize, y: usize, x: usize) -> usize {
        c * self.channel + y * self.row + x * self.pixel
    }
}

fn strides(params: &PoolingParams) -> (Strides, Strides) {
    (
        Strides::new(params.channel.src, params.y.src, params.x.src, params.format),
        Strides::new(params.channel.dst, params.y.dst, params.x.dst, params.format),
    )
}

fn pooling_max_generic<T: PoolValue>(src: &[T], params: &PoolingParams, dst: &mut [T]) {
    let (src_strides, dst_strides) = strides(params);
    for dc in 0..params.channel.dst {
        let (cs, ce) = params.channel.window(dc);
        for dy in 0..params.y.dst {
            let (ys, ye) = params.y.window(dy);
            for dx in 0..params.x.dst {
                let (xs, xe) = params.x.window(dx);
                let mut max = T::min_value();
                for sc in cs..ce {
                    for sy in ys..ye {
                        for sx in xs..xe {
                            max = max.pool_max(src[src_strides.offset(sc, sy, sx)]);
                        }
                    }
                }
                dst[dst_strides.offset(dc, dy, dx)] = max;
            }
        }
    }
}

#[inline]
fn max_rows<T: PoolValue>(acc: &mut [T], src: &[T], isa: SimdIsa) {
    let processed = run_elements::<T, _>(
        isa,
        MaxRows {
            acc: &mut *acc,
            src,
        },
    );
    for (acc, &src) in acc[processed..].iter_mut().zip(src[processed..].iter()) {
        *acc = acc.pool_max(src);
    }
}

/// Square NCHW window: vertical max into one row, then the horizontal window over that row.
fn pooling_max_nchw_separable<T: PoolValue, const KERNEL: usize, const STRIDE: usize>(
    src: &[T],
    params: &PoolingParams,
    dst: &mut [T],
    isa: SimdIsa,
) {
    let (y, x) = (&params.y, &params.x);
    let first = x.pad_begin.div_ceil(STRIDE);
    let last = x
        .dst
        .min((x.src + x.pad_begin).saturating_sub(KERNEL) / STRIDE + 1)
        .max(first);
    let mut acc = vec![T::min_value(); x.src];

    for (src, dst) in src
        .chunks_exact(y.src * x.src)
        .zip(dst.chunks_exact_mut(y.dst * x.dst))
    {
        for (dy, dst) in dst.chunks_exact_mut(x.dst).enumerate() {
            let (ys, ye) = y.window(dy);
            acc.fill(T::min_value());
            for src in src[ys * x.src..ye * x.src].chunks_exact(x.src) {
                max_rows(&mut acc, src, isa);
            }

            let processed = if first < x.dst {
                run_elements::<T, _>(
                    isa,
                    PoolMaxHorizontal::<T, KERNEL, STRIDE> {
                        src: &acc,
                        dst: &mut *dst,
                        pad: x.pad_begin,
                        first,
                        last,
                    },
                )
            } else {
                0
            };

            for dx in (0..first.min(x.dst)).chain(first + processed..x.dst) {
                let (xs, xe) = x.window(dx);
                dst[dx] = acc[xs..xe]
                    .iter()
                    .fold(T::min_value(), |max, &v| max.pool_max(v));
            }
        }
    }
}

fn pooling_max_nhwc<T: PoolValue>(src: &[T], params: &PoolingParams, dst: &mut [T], isa: SimdIsa) {
    let (y, x) = (&params.y, &params.x);
    let channels = params.channel.src;
    let (src_strides, dst_strides) = strides(params);
    for dy in 0..y.dst {
        let (ys, ye) = y.window(dy);
        for dx in 0..x.dst {
            let (xs, xe) = x.window(dx);
            let offset = dst_strides.offset(0, dy, dx);
            let acc = &mut dst[offset..offset + channels];
            acc.fill(T::min_value());
            for sy in ys..ye {
                for sx in xs..xe {
                    let offset = src_strides.offset(0, sy, sx);
                    max_rows(acc, &src[offset..offset + channels], isa);
                }
            }
        }
    }
}

fn pooling_max_channel_reduce<T: PoolValue, const K: usize>(
    src: &[T],
    params: &PoolingParams,
    dst: &mut [T],
    isa: SimdIsa,
) {
    let (y, x) = (&params.y, &params.x);
    let (src_c, dst_c) = (params.channel.src, params.channel.dst);
    let (src_strides, dst_strides) = strides(params);
    let mut acc = vec![T::min_value(); src_c];
    for dy in 0..y.dst {
        let (ys, ye) = y.window(dy);
        for dx in 0..x.dst {
            let (xs, xe) = x.window(dx);
            acc.fill(T::min_value());
            for sy in ys..ye {
                for sx in xs..xe {
                    let offset = src_strides.offset(0, sy, sx);
                    max_rows(&mut acc, &src[offset..offset + src_c], isa);
                }
            }

            let offset = dst_strides.offset(0, dy, dx);
            let dst = &mut dst[offset..offset + dst_c];
            let processed = run_elements::<T, _>(
                isa,
                ChannelReduce::<T, K> {
                    src: &acc,
                    dst: &mut *dst,
                },
            );
            for (dst, group) in dst[processed..]
                .iter_mut()
                .zip(acc[processed * K..].chunks_exact(K))
            {
                *dst = group
                    .iter()
                    .fold(T::min_value(), |max, &v| max.pool_max(v));
            }
        }
    }
}

pub(crate) fn pooling_max_with_isa<T: PoolValue>(
    src: &[T],
    params: &PoolingParams,
    dst: &mut [T],
    isa: SimdIsa,
) -> Result<(), SynetError> {
    params.validate(src, dst)?;
    let kind = select_pooling_max::<T>(params, isa);
    log::trace!("pooling max: {:?} via {:?}", kind, isa);
    match kind {
        PoolingMaxKind::Nchw2x2 => pooling_max_nchw_separable::<T, 2, 2>(src, params, dst, isa),
        PoolingMaxKind::Nchw3x3 => pooling_max_nchw_separable::<T, 3, 1>(src, params, dst, isa),
        PoolingMaxKind::Nchw3x3Stride2 => {
            pooling_max_nchw_separable::<T, 3, 2>(src, params, dst, isa)
        }
        PoolingMaxKind::NhwcVector => pooling_max_nhwc(src, params, dst, isa),
        PoolingMaxKind::ChannelReduce2 => {
            pooling_max_channel_reduce::<T, 2>(src, params, dst, isa)
        }
        PoolingMaxKind::ChannelReduce4 => {
            pooling_max_channel_reduce::<T, 4>(src, params, dst, isa)
        }
        PoolingMaxKind::Generic2d | PoolingMaxKind::Generic3d => {
            pooling_max_generic(src, params, dst)
        }
    }
    Ok(())
}

/// Max pooling of a float tensor.
///
/// Window positions falling into padding are skipped, so every output is the maximum of real
/// input values only. With a non identity channel axis, channel groups are pooled as well.
///
/// # Arguments
///
/// * `src` - Source tensor, `channel.src x y.src x x.src` elements in `params.format`.
/// * `params` - Window geometry, every `dst` extent must match [pooling_output_size].
/// * `dst` - Target tensor, `channel.dst x y.dst x x.dst` elements in `params.format`.
///
/// # Errors
///
/// Returns an error before writing anything if the geometry, the format or a buffer
/// size is not valid.
pub fn synet_pooling_max_32f(
    src: &[f32],
    params: &PoolingParams,
    dst: &mut [f32],
) -> Result<(), SynetError> {
    pooling_max_with_isa(src, params, dst, simd_isa())
}

/// Max pooling of an 8-bit tensor, see [synet_pooling_max_32f].
pub fn synet_pooling_max_8u(
    src: &[u8],
    params: &PoolingParams,
    dst: &mut [u8],
) -> Result<(), SynetError> {
    pooling_max_with_isa(src, params, dst, simd_isa())
}

#[inline]
fn average_norm(params: &PoolingParams, exclude_pad: bool, area: usize) -> f32 {
    if exclude_pad {
        1. / area as f32
    } else {
        1. / (params.y.kernel * params.x.kernel) as f32
    }
}

fn pooling_average_generic(
    src: &[f32],
    params: &PoolingParams,
    exclude_pad: bool,
    dst: &mut [f32],
) {
    let (src_strides, dst_strides) = strides(params);
    for c in 0..params.channel.dst {
        for dy in 0..params.y.dst {
            let (ys, ye) = params.y.window(dy);
            for dx in 0..params.x.dst {
                let (xs, xe) = params.x.window(dx);
                let mut sum = 0f32;
                for sy in ys..ye {
                    for sx in xs..xe {
                        sum += src[src_strides.offset(c, sy, sx)];
                    }
                }
                let norm = average_norm(params, exclude_pad, (ye - ys) * (xe - xs));
                dst[dst_strides.offset(c, dy, dx)] = sum * norm;
            }
        }
    }
}

fn pooling_average_nhwc(
    src: &[f32],
    params: &PoolingParams,
    exclude_pad: bool,
    dst: &mut [f32],
    isa: SimdIsa,
) {
    let channels = params.channel.src;
    let (src_strides, dst_strides) = strides(params);
    for dy in 0..params.y.dst {
        let (ys, ye) = params.y.window(dy);
        for dx in 0..params.x.dst {
            let (xs, xe) = params.x.window(dx);
            let offset = dst_strides.offset(0, dy, dx);
            let acc = &mut dst[offset..offset + channels];
            acc.fill(0.);
            for sy in ys..ye {
                for sx in xs..xe {
                    let offset = src_strides.offset(0, sy, sx);
                    let src = &src[offset..offset + channels];
                    let processed = run_floats(
                        isa,
                        AddRows {
                            acc: &mut *acc,
                            src,
                        },
                    );
                    for (acc, &src) in acc[processed..].iter_mut().zip(src[processed..].iter()) {
                        *acc += src;
                    }
                }
            }

            let k = average_norm(params, exclude_pad, (ye - ys) * (xe - xs));
            let processed = run_floats(isa, MulRow { dst: &mut *acc, k });
            for v in acc[processed..].iter_mut() {
                *v *= k;
            }
        }
    }
}

pub(crate) fn pooling_average_with_isa(
    src: &[f32],
    params: &PoolingParams,
    exclude_pad: bool,
    dst: &mut [f32],
    isa: SimdIsa,
) -> Result<(), SynetError> {
    if !params.is_2d() {
        return Err(SynetError::InvalidPoolingParams(
            "average pooling keeps the channel count",
        ));
    }
    params.validate(src, dst)?;
    let kind = select_pooling_average(params, isa);
    log::trace!("pooling average: {:?} via {:?}", kind, isa);
    match kind {
        PoolingAverageKind::NhwcVector => pooling_average_nhwc(src, params, exclude_pad, dst, isa),
        PoolingAverageKind::Generic => pooling_average_generic(src, params, exclude_pad, dst),
    }
    Ok(())
}

/// Average pooling of a float tensor, channels are preserved.
///
/// Windows are clipped to the input. With `exclude_pad` the sum is divided by the clipped
/// window area, otherwise by `kernel_y * kernel_x`.
pub fn synet_pooling_average_32f(
    src: &[f32],
    params: &PoolingParams,
    exclude_pad: bool,
    dst: &mut [f32],
) -> Result<(), SynetError> {
    pooling_average_with_isa(src, params, exclude_pad, dst, simd_isa())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn random_f32(len: usize) -> Vec<f32> {
        let mut rng = rand::rng();
        (0..len).map(|_| rng.random_range(-100f32..100f32)).collect()
    }

    fn random_u8(len: usize) -> Vec<u8> {
        let mut rng = rand::rng();
        (0..len).map(|_| rng.random_range(0..=255u8)).collect()
    }

    fn volume(params: &PoolingParams) -> (usize, usize) {
        (
            params.channel.src * params.y.src * params.x.src,
            params.channel.dst * params.y.dst * params.x.dst,
        )
    }

    fn shapes() -> Vec<PoolingParams> {
        let mut shapes = Vec::new();
        for width in [3usize, 15, 16, 17, 33, 70] {
            for format in [TensorFormat::Nchw, TensorFormat::Nhwc] {
                for channels in [1usize, 3, 17, 66] {
                    shapes.push(PoolingParams::new_2d(
                        channels,
                        PoolingAxis::new(6, 2, 2, 0, 0),
                        PoolingAxis::new(width + width % 2, 2, 2, 0, 0),
                        format,
                    ));
                    shapes.push(PoolingParams::new_2d(
                        channels,
                        PoolingAxis::new(5, 3, 1, 1, 1),
                        PoolingAxis::new(width, 3, 1, 1, 1),
                        format,
                    ));
                    shapes.push(PoolingParams::new_2d(
                        channels,
                        PoolingAxis::new(7, 3, 2, 0, 0),
                        PoolingAxis::new(width + 2, 3, 2, 0, 0),
                        format,
                    ));
                    shapes.push(PoolingParams::new_2d(
                        channels,
                        PoolingAxis::new(4, 2, 1, 1, 0),
                        PoolingAxis::new(width, 3, 2, 2, 1),
                        format,
                    ));
                }
            }
            for k in [2usize, 4] {
                for channels in [8usize, 16, 64, 68] {
                    shapes.push(PoolingParams {
                        channel: PoolingAxis::new(channels, k, k, 0, 0),
                        y: PoolingAxis::new(3, 2, 1, 1, 0),
                        x: PoolingAxis::new(width, 2, 2, 0, 1),
                        format: TensorFormat::Nhwc,
                    });
                }
            }
            shapes.push(PoolingParams {
                channel: PoolingAxis::new(9, 3, 2, 1, 1),
                y: PoolingAxis::identity(2),
                x: PoolingAxis::new(width, 2, 2, 1, 0),
                format: TensorFormat::Nchw,
            });
        }
        shapes
    }

    #[test]
    fn padding_never_wins_the_maximum() {
        let params = PoolingParams::new_2d(
            1,
            PoolingAxis::new(1, 3, 1, 1, 1),
            PoolingAxis::new(1, 3, 1, 1, 1),
            TensorFormat::Nchw,
        );
        let mut dst = [0f32; 1];
        synet_pooling_max_32f(&[-3.5], &params, &mut dst).unwrap();
        assert_eq!(dst, [-3.5]);

        let mut dst = [9u8; 1];
        synet_pooling_max_8u(&[7], &params, &mut dst).unwrap();
        assert_eq!(dst, [7]);
    }

    #[test]
    fn max_2x2_of_known_plane() {
        let src = [
            1f32, 2., 5., 0., //
            3., 4., -1., 6., //
            -7., -8., 9., 9., //
            -6., -5., 10., 2.,
        ];
        let params = PoolingParams::new_2d(
            1,
            PoolingAxis::new(4, 2, 2, 0, 0),
            PoolingAxis::new(4, 2, 2, 0, 0),
            TensorFormat::Nchw,
        );
        let mut dst = [0f32; 4];
        synet_pooling_max_32f(&src, &params, &mut dst).unwrap();
        assert_eq!(dst, [4., 6., -5., 10.]);
    }

    #[test]
    fn max_pooling_matches_scalar_on_every_isa() {
        for params in shapes() {
            let (src_len, dst_len) = volume(&params);
            let src = random_f32(src_len);
            let mut reference = vec![0f32; dst_len];
            pooling_max_with_isa(&src, &params, &mut reference, SimdIsa::Scalar).unwrap();

            let src8 = random_u8(src_len);
            let mut reference8 = vec![0u8; dst_len];
            pooling_max_with_isa(&src8, &params, &mut reference8, SimdIsa::Scalar).unwrap();

            for isa in SimdIsa::available() {
                let mut dst = vec![0f32; dst_len];
                pooling_max_with_isa(&src, &params, &mut dst, isa).unwrap();
                assert_eq!(reference, dst, "{isa:?} {params:?}");

                let mut dst8 = vec![0u8; dst_len];
                pooling_max_with_isa(&src8, &params, &mut dst8, isa).unwrap();
                assert_eq!(reference8, dst8, "{isa:?} {params:?}");
            }
        }
    }

    #[test]
    fn channel_pooling_reduces_groups() {
        // NHWC, one pixel, 8 channels pooled by 4
        let src = [1f32, 9., 3., 2., -4., -1., -3., -2.];
        let params = PoolingParams {
            channel: PoolingAxis::new(8, 4, 4, 0, 0),
            y: PoolingAxis::identity(1),
            x: PoolingAxis::identity(1),
            format: TensorFormat::Nhwc,
        };
        let mut dst = [0f32; 2];
        synet_pooling_max_32f(&src, &params, &mut dst).unwrap();
        assert_eq!(dst, [9., -1.]);
    }

    #[test]
    fn average_divisor_depends_on_exclude_pad() {
        let src = [1f32; 4];
        let params = PoolingParams::new_2d(
            1,
            PoolingAxis::new(2, 3, 1, 1, 1),
            PoolingAxis::new(2, 3, 1, 1, 1),
            TensorFormat::Nchw,
        );
        let mut dst = [0f32; 4];
        synet_pooling_average_32f(&src, &params, true, &mut dst).unwrap();
        assert_eq!(dst, [1f32; 4]);

        synet_pooling_average_32f(&src, &params, false, &mut dst).unwrap();
        for v in dst {
            assert!((v - 4. / 9.).abs() < 1e-6);
        }
    }

    #[test]
    fn average_pooling_matches_scalar_on_every_isa() {
        for params in shapes().into_iter().filter(|p| p.is_2d()) {
            let (src_len, dst_len) = volume(&params);
            let src = random_f32(src_len);
            for exclude_pad in [false, true] {
                let mut reference = vec![0f32; dst_len];
                pooling_average_with_isa(
                    &src,
                    &params,
                    exclude_pad,
                    &mut reference,
                    SimdIsa::Scalar,
                )
                .unwrap();
                for isa in SimdIsa::available() {
                    let mut dst = vec![0f32; dst_len];
                    pooling_average_with_isa(&src, &params, exclude_pad, &mut dst, isa).unwrap();
                    assert_eq!(reference, dst, "{isa:?} {params:?}");
                }
            }
        }
    }

    #[test]
    fn invalid_geometry_is_rejected_untouched() {
        let src = [0f32; 16];
        let mut params = PoolingParams::new_2d(
            1,
            PoolingAxis::new(4, 2, 2, 0, 0),
            PoolingAxis::new(4, 2, 2, 0, 0),
            TensorFormat::Nchw,
        );
        params.x.dst = 3;
        let mut dst = [5f32; 6];
        assert_eq!(
            synet_pooling_max_32f(&src, &params, &mut dst),
            Err(SynetError::PoolingShapeMismatch {
                axis: "width",
                expected: 2,
                received: 3
            })
        );
        assert_eq!(dst, [5f32; 6]);

        let padded = PoolingParams::new_2d(
            1,
            PoolingAxis::new(4, 2, 2, 2, 0),
            PoolingAxis::new(4, 2, 2, 0, 0),
            TensorFormat::Nchw,
        );
        assert!(matches!(
            synet_pooling_max_32f(&src, &padded, &mut dst),
            Err(SynetError::InvalidPoolingParams(_))
        ));

        let blocked = PoolingParams {
            format: TensorFormat::Nchw8c,
            ..PoolingParams::new_2d(
                1,
                PoolingAxis::new(4, 2, 2, 0, 0),
                PoolingAxis::new(4, 2, 2, 0, 0),
                TensorFormat::Nchw,
            )
        };
        let mut dst = [0f32; 4];
        assert_eq!(
            synet_pooling_max_32f(&src, &blocked, &mut dst),
            Err(SynetError::UnsupportedFormat(TensorFormat::Nchw8c))
        );

        let reducing = PoolingParams {
            channel: PoolingAxis::new(2, 2, 2, 0, 0),
            y: PoolingAxis::identity(2),
            x: PoolingAxis::identity(4),
            format: TensorFormat::Nchw,
        };
        let mut dst = [0f32; 8];
        assert!(matches!(
            synet_pooling_average_32f(&src, &reducing, false, &mut dst),
            Err(SynetError::InvalidPoolingParams(_))
        ));
    }

    #[test]
    fn output_size_formula() {
        assert_eq!(pooling_output_size(7, 3, 0, 0, 2), 3);
        assert_eq!(pooling_output_size(5, 3, 1, 1, 1), 5);
        assert_eq!(pooling_output_size(1, 3, 0, 0, 1), 0);
        assert_eq!(pooling_output_size(4, 2, 0, 0, 0), 0);
    }
}
