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
use std::fmt::Debug;

/// Memory layout of a `(batch, channels, height, width)` tensor.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum TensorFormat {
    #[default]
    Nchw = 0,
    Nhwc = 1,
    /// Channels grouped by 4, each group stored as `spatial x 4`
    Nchw4c = 2,
    Nchw8c = 3,
    Nchw16c = 4,
}

impl TensorFormat {
    pub const ALL: [TensorFormat; 5] = [
        TensorFormat::Nchw,
        TensorFormat::Nhwc,
        TensorFormat::Nchw4c,
        TensorFormat::Nchw8c,
        TensorFormat::Nchw16c,
    ];

    /// Channels per block, 1 for the plain layouts.
    #[inline]
    pub const fn block_size(self) -> usize {
        match self {
            TensorFormat::Nchw | TensorFormat::Nhwc => 1,
            TensorFormat::Nchw4c => 4,
            TensorFormat::Nchw8c => 8,
            TensorFormat::Nchw16c => 16,
        }
    }

    #[inline]
    pub const fn is_blocked(self) -> bool {
        self.block_size() > 1
    }

    /// Channel count as stored, blocked layouts round it up to the block size.
    #[inline]
    pub const fn stored_channels(self, channels: usize) -> usize {
        channels.div_ceil(self.block_size()) * self.block_size()
    }

    /// Elements needed to hold a `batch x channels x spatial` tensor in this layout.
    #[inline]
    pub const fn buffer_len(self, batch: usize, channels: usize, spatial: usize) -> usize {
        batch * self.stored_channels(channels) * spatial
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TensorType {
    F32,
    U8,
}

/// How multiply-add pairs are evaluated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum FmaMode {
    #[default]
    Use,
    /// Fused everywhere as well, kept apart for integer paths that skip tails upstream
    NoTail,
    /// Separate multiply and add
    Avoid,
}

impl FmaMode {
    #[inline]
    pub const fn fused(self) -> bool {
        match self {
            FmaMode::Use | FmaMode::NoTail => true,
            FmaMode::Avoid => false,
        }
    }
}

/// Upper saturation bound for 8-bit outputs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum QuantizationMode {
    #[default]
    Precise,
    Overflow,
    Narrowed,
}

impl QuantizationMode {
    #[inline]
    pub const fn upper_bound(self) -> u8 {
        match self {
            QuantizationMode::Precise | QuantizationMode::Overflow => 255,
            QuantizationMode::Narrowed => 180,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct SynetCompatibility {
    pub fma: FmaMode,
    pub quantization: QuantizationMode,
}

impl SynetCompatibility {
    pub const fn new(fma: FmaMode, quantization: QuantizationMode) -> Self {
        Self { fma, quantization }
    }
}

/// Interleaved 8-bit source pixels for network input.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Gray8 = 0,
    Bgr24 = 1,
    Bgra32 = 2,
    Rgb24 = 3,
}

impl From<u8> for PixelFormat {
    #[inline(always)]
    fn from(value: u8) -> Self {
        match value {
            0 => PixelFormat::Gray8,
            1 => PixelFormat::Bgr24,
            2 => PixelFormat::Bgra32,
            3 => PixelFormat::Rgb24,
            _ => unreachable!("Unknown value {value} for PixelFormat"),
        }
    }
}

impl PixelFormat {
    #[inline(always)]
    pub const fn pixel_size(self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Bgr24 | PixelFormat::Rgb24 => 3,
            PixelFormat::Bgra32 => 4,
        }
    }

    #[inline(always)]
    pub(crate) fn to_gray(self, px: &[u8]) -> u8 {
        match self {
            PixelFormat::Gray8 => px[0],
            PixelFormat::Bgr24 | PixelFormat::Bgra32 => {
                crate::numerics::bgr_to_gray_value(px[0] as i32, px[1] as i32, px[2] as i32)
            }
            PixelFormat::Rgb24 => {
                crate::numerics::bgr_to_gray_value(px[2] as i32, px[1] as i32, px[0] as i32)
            }
        }
    }

    /// Channel `channel` in B, G, R order.
    #[inline(always)]
    pub(crate) fn to_bgr(self, px: &[u8], channel: usize) -> u8 {
        match self {
            PixelFormat::Gray8 => px[0],
            PixelFormat::Bgr24 | PixelFormat::Bgra32 => px[channel],
            PixelFormat::Rgb24 => px[2 - channel],
        }
    }
}

/// Element types the scale kernels read and write.
pub(crate) trait TensorElement: Copy + Default + Debug {
    fn to_f32(self) -> f32;

    /// `upper` only matters for quantized outputs.
    fn from_f32(value: f32, upper: f32) -> Self;
}

impl TensorElement for f32 {
    #[inline(always)]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline(always)]
    fn from_f32(value: f32, _: f32) -> Self {
        value
    }
}

impl TensorElement for u8 {
    #[inline(always)]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline(always)]
    fn from_f32(value: f32, upper: f32) -> Self {
        value.round_ties_even().clamp(0., upper) as u8
    }
}

#[inline(always)]
pub(crate) fn scale_value<S: TensorElement, D: TensorElement, const FMA: bool>(
    src: S,
    scale: f32,
    bias: Option<f32>,
    upper: f32,
) -> D {
    let x = src.to_f32();
    let value = match bias {
        Some(bias) => {
            if FMA {
                x.mul_add(scale, bias)
            } else {
                x * scale + bias
            }
        }
        None => x * scale,
    };
    D::from_f32(value, upper)
}

#[inline]
pub(crate) fn nchw_compatible(format: TensorFormat, channels: usize, _spatial: usize) -> bool {
    format == TensorFormat::Nchw || (format == TensorFormat::Nhwc && channels == 1)
}

#[inline]
pub(crate) fn nhwc_compatible(format: TensorFormat, _channels: usize, spatial: usize) -> bool {
    format == TensorFormat::Nhwc || (format == TensorFormat::Nchw && spatial == 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocked_layouts_round_channels_up() {
        assert_eq!(TensorFormat::Nchw.buffer_len(2, 3, 5), 30);
        assert_eq!(TensorFormat::Nchw4c.buffer_len(1, 3, 5), 20);
        assert_eq!(TensorFormat::Nchw8c.buffer_len(1, 9, 2), 32);
        assert_eq!(TensorFormat::Nchw16c.stored_channels(16), 16);
        assert!(!TensorFormat::Nhwc.is_blocked());
    }

    #[test]
    fn quantization_rounds_half_to_even_and_saturates() {
        assert_eq!(u8::from_f32(2.5, 255.), 2);
        assert_eq!(u8::from_f32(3.5, 255.), 4);
        assert_eq!(u8::from_f32(-7., 255.), 0);
        assert_eq!(u8::from_f32(300., 255.), 255);
        assert_eq!(u8::from_f32(200., 180.), 180);
        assert_eq!(u8::from_f32(f32::NAN, 255.), 0);
    }

    #[test]
    fn fma_modes_only_differ_in_fusion() {
        let x = 1.0000001f32;
        let s = 1.0000001f32;
        let b = -1.0000002f32;
        let fused: f32 = scale_value::<f32, f32, true>(x, s, Some(b), 0.);
        let split: f32 = scale_value::<f32, f32, false>(x, s, Some(b), 0.);
        assert_eq!(fused, x.mul_add(s, b));
        assert_eq!(split, x * s + b);
        assert!(FmaMode::NoTail.fused());
        assert!(!FmaMode::Avoid.fused());
    }

    #[test]
    fn layout_predicates() {
        assert!(nchw_compatible(TensorFormat::Nchw, 8, 1));
        assert!(nchw_compatible(TensorFormat::Nhwc, 1, 64));
        assert!(!nchw_compatible(TensorFormat::Nhwc, 3, 64));
        assert!(nhwc_compatible(TensorFormat::Nchw, 8, 1));
        assert!(!nhwc_compatible(TensorFormat::Nchw, 8, 2));
        assert!(!nchw_compatible(TensorFormat::Nchw4c, 8, 4));
        assert!(!nhwc_compatible(TensorFormat::Nchw4c, 8, 4));
    }

    #[test]
    fn rgb_pixels_are_read_in_bgr_order() {
        let px = [10u8, 20, 30];
        assert_eq!(PixelFormat::Rgb24.to_bgr(&px, 0), 30);
        assert_eq!(PixelFormat::Bgr24.to_bgr(&px, 0), 10);
        assert_eq!(PixelFormat::Gray8.to_bgr(&px, 2), 10);
        assert_eq!(
            PixelFormat::Rgb24.to_gray(&px),
            PixelFormat::Bgr24.to_gray(&[30, 20, 10])
        );
    }
}
