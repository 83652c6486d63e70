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
//! Quantized scale layer.
//!
//! 8-bit tensors carry per-channel statistics, a quantized value `q` stands for
//! `q * (max - min) / U + min` where `U` is the upper bound of the quantization mode.
//! Dequantization, scale, bias and requantization fold into one affine transform per channel,
//! so every combination runs through the same kernels as the float scale layer.
use crate::dispatch::{select_scale8i, simd_isa, Scale8iKind, ScaleKind, SimdIsa};
use crate::synet_error::{check_buffer, check_channel_param};
use crate::synet_scale::{scale_forward_with_kind, TensorShape};
use crate::tensor::{SynetCompatibility, TensorElement, TensorFormat, TensorType};
use crate::SynetError;

/// Observed value range of one channel.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct ChannelStats {
    pub min: f32,
    pub max: f32,
}

impl ChannelStats {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Scale8iParams {
    pub batch: usize,
    pub channels: usize,
    pub spatial: usize,
    pub src_type: TensorType,
    pub dst_type: TensorType,
    /// [TensorFormat::Nchw] or [TensorFormat::Nhwc]
    pub format: TensorFormat,
    pub compatibility: SynetCompatibility,
}

/// `(multiplier, offset)` mapping a stored value to its real value.
#[inline]
fn dequantization(ty: TensorType, stats: Option<&ChannelStats>, upper: f32) -> (f32, f32) {
    match (ty, stats) {
        (TensorType::U8, Some(stats)) => ((stats.max - stats.min) / upper, stats.min),
        _ => (1., 0.),
    }
}

/// `(multiplier, offset)` mapping a real value to its stored value.
#[inline]
fn quantization(ty: TensorType, stats: Option<&ChannelStats>, upper: f32) -> (f32, f32) {
    match (ty, stats) {
        (TensorType::U8, Some(stats)) => {
            let a = upper / (stats.max - stats.min);
            (a, -stats.min * a)
        }
        _ => (1., 0.),
    }
}

fn check_stats(
    name: &'static str,
    ty: TensorType,
    stats: &[ChannelStats],
    channels: usize,
) -> Result<(), SynetError> {
    if ty != TensorType::U8 {
        return Ok(());
    }
    if stats.is_empty() {
        return Err(SynetError::MissingStatistics);
    }
    check_channel_param(name, stats, channels)?;
    // Empty or inverted ranges can not be quantized into
    if stats.iter().any(|s| !(s.max > s.min)) {
        return Err(SynetError::MissingStatistics);
    }
    Ok(())
}

/// Quantized scale layer context.
///
/// Created once per tensor shape, configured with [SynetScale8i::set_params], then run with
/// the `forward_*` method matching its source and destination types.
#[derive(Debug, Clone)]
pub struct SynetScale8i {
    params: Scale8iParams,
    /// Fused per channel multiplier and offset, empty until configured
    scale: Vec<f32>,
    shift: Vec<f32>,
    isa: SimdIsa,
}

impl SynetScale8i {
    pub fn new(params: Scale8iParams) -> Result<Self, SynetError> {
        Self::with_isa(params, simd_isa())
    }

    pub(crate) fn with_isa(params: Scale8iParams, isa: SimdIsa) -> Result<Self, SynetError> {
        if !matches!(params.format, TensorFormat::Nchw | TensorFormat::Nhwc) {
            return Err(SynetError::UnsupportedFormat(params.format));
        }
        TensorShape {
            batch: params.batch,
            channels: params.channels,
            spatial: params.spatial,
            format: params.format,
        }
        .buffer_len()?;
        Ok(Self {
            params,
            scale: Vec::new(),
            shift: Vec::new(),
            isa,
        })
    }

    pub fn params(&self) -> &Scale8iParams {
        &self.params
    }

    /// Sets the layer parameters.
    ///
    /// # Arguments
    ///
    /// * `scale` - One factor per channel.
    /// * `bias` - Optional per channel term.
    /// * `src_stats` - Per channel range of the source, required when the source is 8-bit.
    /// * `dst_stats` - Per channel range of the destination, required when it is 8-bit.
    ///
    /// Statistics for a float side are ignored and may be empty.
    pub fn set_params(
        &mut self,
        scale: &[f32],
        bias: Option<&[f32]>,
        src_stats: &[ChannelStats],
        dst_stats: &[ChannelStats],
    ) -> Result<(), SynetError> {
        let p = &self.params;
        check_channel_param("scale", scale, p.channels)?;
        if let Some(bias) = bias {
            check_channel_param("bias", bias, p.channels)?;
        }
        check_stats("src_stats", p.src_type, src_stats, p.channels)?;
        check_stats("dst_stats", p.dst_type, dst_stats, p.channels)?;

        let upper = p.compatibility.quantization.upper_bound() as f32;
        let mut fused_scale = Vec::with_capacity(p.channels);
        let mut fused_shift = Vec::with_capacity(p.channels);
        for (c, &s) in scale.iter().enumerate() {
            let (a_in, b_in) = dequantization(p.src_type, src_stats.get(c), upper);
            let (a_out, b_out) = quantization(p.dst_type, dst_stats.get(c), upper);
            let b = bias.map_or(0., |bias| bias[c]);
            fused_scale.push(a_in * s * a_out);
            fused_shift.push((b_in * s + b) * a_out + b_out);
        }
        self.scale = fused_scale;
        self.shift = fused_shift;
        Ok(())
    }

    fn forward<S: TensorElement, D: TensorElement>(
        &self,
        src: &[S],
        src_type: TensorType,
        dst: &mut [D],
        dst_type: TensorType,
    ) -> Result<(), SynetError> {
        let p = &self.params;
        if p.src_type != src_type || p.dst_type != dst_type {
            return Err(SynetError::UnsupportedTensorType);
        }
        if self.scale.is_empty() {
            return Err(SynetError::MissingStatistics);
        }
        let shape = TensorShape {
            batch: p.batch,
            channels: p.channels,
            spatial: p.spatial,
            format: p.format,
        };
        let len = shape.buffer_len()?;
        check_buffer("src", src, len)?;
        check_buffer("dst", dst, len)?;

        let selected = select_scale8i(p.format, p.channels, p.spatial, self.isa);
        log::trace!("scale 8i: {:?} via {:?}", selected, self.isa);
        let (kind, isa) = match selected {
            Scale8iKind::Nchw => (ScaleKind::Nchw, self.isa),
            Scale8iKind::Nhwc3 => (ScaleKind::Nhwc3, self.isa),
            Scale8iKind::Nhwc => (ScaleKind::Nhwc, self.isa),
            Scale8iKind::Scalar if p.format == TensorFormat::Nhwc => {
                (ScaleKind::Nhwc, SimdIsa::Scalar)
            }
            Scale8iKind::Scalar => (ScaleKind::Nchw, SimdIsa::Scalar),
        };

        let upper = p.compatibility.quantization.upper_bound() as f32;
        let shift = Some(self.shift.as_slice());
        if p.compatibility.fma.fused() {
            scale_forward_with_kind::<S, D, true>(
                src,
                &self.scale,
                shift,
                shape,
                dst,
                upper,
                kind,
                isa,
            );
        } else {
            scale_forward_with_kind::<S, D, false>(
                src,
                &self.scale,
                shift,
                shape,
                dst,
                upper,
                kind,
                isa,
            );
        }
        Ok(())
    }

    pub fn forward_u8_to_u8(&self, src: &[u8], dst: &mut [u8]) -> Result<(), SynetError> {
        self.forward(src, TensorType::U8, dst, TensorType::U8)
    }

    pub fn forward_u8_to_f32(&self, src: &[u8], dst: &mut [f32]) -> Result<(), SynetError> {
        self.forward(src, TensorType::U8, dst, TensorType::F32)
    }

    pub fn forward_f32_to_u8(&self, src: &[f32], dst: &mut [u8]) -> Result<(), SynetError> {
        self.forward(src, TensorType::F32, dst, TensorType::U8)
    }

    pub fn forward_f32_to_f32(&self, src: &[f32], dst: &mut [f32]) -> Result<(), SynetError> {
        self.forward(src, TensorType::F32, dst, TensorType::F32)
    }
}
