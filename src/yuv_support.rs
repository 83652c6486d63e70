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

/// Fixed point precision of YUV to BGR decoding.
pub(crate) const YUV_TO_BGR_SHIFT: i32 = 13;
/// Fixed point precision of BGR to YUV encoding.
pub(crate) const BGR_TO_YUV_SHIFT: i32 = 14;
/// Fixed point precision of BGR to gray.
pub(crate) const BGR_TO_GRAY_SHIFT: i32 = 14;

pub(crate) const BLUE_TO_GRAY_WEIGHT: i32 = 1868;
pub(crate) const GREEN_TO_GRAY_WEIGHT: i32 = 9617;
pub(crate) const RED_TO_GRAY_WEIGHT: i32 = 4899;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
pub struct CbCrInverseTransform<T> {
    pub y_coef: T,
    pub cr_coef: T,
    pub cb_coef: T,
    pub g_coeff_1: T,
    pub g_coeff_2: T,
}

impl<T> CbCrInverseTransform<T> {
    pub fn new(
        y_coef: T,
        cr_coef: T,
        cb_coef: T,
        g_coeff_1: T,
        g_coeff_2: T,
    ) -> CbCrInverseTransform<T> {
        CbCrInverseTransform {
            y_coef,
            cr_coef,
            cb_coef,
            g_coeff_1,
            g_coeff_2,
        }
    }
}

impl CbCrInverseTransform<f32> {
    /// Integral transformation, each coefficient is rounded to nearest
    pub fn to_integers(&self, precision: u32) -> CbCrInverseTransform<i32> {
        let scale = (1i32 << precision) as f32;
        CbCrInverseTransform::<i32> {
            y_coef: (self.y_coef * scale).round() as i32,
            cr_coef: (self.cr_coef * scale).round() as i32,
            cb_coef: (self.cb_coef * scale).round() as i32,
            g_coeff_1: (self.g_coeff_1 * scale).round() as i32,
            g_coeff_2: (self.g_coeff_2 * scale).round() as i32,
        }
    }
}

/// Transformation YUV to BGR with coefficients as specified in [ITU-R](https://www.itu.int/rec/T-REC-H.273/en)
///
/// `g_coeff_1` is the magnitude of V contribution to green, `g_coeff_2` of U,
/// both are subtracted.
pub fn get_inverse_transform(
    range_bgra: u32,
    range_y: u32,
    range_uv: u32,
    kr: f32,
    kb: f32,
) -> CbCrInverseTransform<f32> {
    let range_uv = range_bgra as f32 / range_uv as f32;
    let y_coef = range_bgra as f32 / range_y as f32;
    let cr_coeff = (2f32 * (1f32 - kr)) * range_uv;
    let cb_coeff = (2f32 * (1f32 - kb)) * range_uv;
    let kg = 1.0f32 - kr - kb;
    let g_coeff_1 = (2f32 * ((1f32 - kr) * kr / kg)) * range_uv;
    let g_coeff_2 = (2f32 * ((1f32 - kb) * kb / kg)) * range_uv;
    CbCrInverseTransform::new(y_coef, cr_coeff, cb_coeff, g_coeff_1, g_coeff_2)
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
pub struct CbCrForwardTransform<T> {
    pub yr: T,
    pub yg: T,
    pub yb: T,
    pub cb_r: T,
    pub cb_g: T,
    pub cb_b: T,
    pub cr_r: T,
    pub cr_g: T,
    pub cr_b: T,
}

pub trait ToIntegerTransform {
    fn to_integers(&self, precision: u32) -> CbCrForwardTransform<i32>;
}

impl ToIntegerTransform for CbCrForwardTransform<f32> {
    fn to_integers(&self, precision: u32) -> CbCrForwardTransform<i32> {
        let scale = (1 << precision) as f32;
        CbCrForwardTransform::<i32> {
            yr: (self.yr * scale).round() as i32,
            yg: (self.yg * scale).round() as i32,
            yb: (self.yb * scale).round() as i32,
            cb_r: (self.cb_r * scale).round() as i32,
            cb_g: (self.cb_g * scale).round() as i32,
            cb_b: (self.cb_b * scale).round() as i32,
            cr_r: (self.cr_r * scale).round() as i32,
            cr_g: (self.cr_g * scale).round() as i32,
            cr_b: (self.cr_b * scale).round() as i32,
        }
    }
}

/// Transformation BGR to YUV with coefficients as specified in [ITU-R](https://www.itu.int/rec/T-REC-H.273/en)
pub fn get_forward_transform(
    range_rgba: u32,
    range_y: u32,
    range_uv: u32,
    kr: f32,
    kb: f32,
) -> CbCrForwardTransform<f32> {
    let kg = 1.0f32 - kr - kb;
    let y_scale = range_y as f32 / range_rgba as f32;
    let uv_scale = range_uv as f32 / range_rgba as f32;

    CbCrForwardTransform {
        yr: kr * y_scale,
        yg: kg * y_scale,
        yb: kb * y_scale,
        cb_r: -0.5f32 * kr / (1f32 - kb) * uv_scale,
        cb_g: -0.5f32 * kg / (1f32 - kb) * uv_scale,
        cb_b: 0.5f32 * uv_scale,
        cr_r: 0.5f32 * uv_scale,
        cr_g: -0.5f32 * kg / (1f32 - kr) * uv_scale,
        cr_b: -0.5f32 * kb / (1f32 - kr) * uv_scale,
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Eq, Hash)]
/// Declares YUV range TV (limited) or Full
pub enum YuvRange {
    /// Limited range Y ∈ [16, 235], UV ∈ [16, 240]
    Limited,
    /// Full range Y, U, V ∈ [0, 255]
    Full,
}

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
pub struct YuvChromaRange {
    pub bias_y: u32,
    pub bias_uv: u32,
    pub range_y: u32,
    pub range_uv: u32,
    pub range: YuvRange,
}

impl YuvChromaRange {
    #[inline]
    pub const fn y_min(&self) -> i32 {
        self.bias_y as i32
    }

    #[inline]
    pub const fn y_max(&self) -> i32 {
        (self.bias_y + self.range_y) as i32
    }

    #[inline]
    pub const fn uv_min(&self) -> i32 {
        match self.range {
            YuvRange::Limited => 16,
            YuvRange::Full => 0,
        }
    }

    #[inline]
    pub const fn uv_max(&self) -> i32 {
        match self.range {
            YuvRange::Limited => 240,
            YuvRange::Full => 255,
        }
    }
}

pub const fn get_yuv_range(range: YuvRange) -> YuvChromaRange {
    match range {
        YuvRange::Limited => YuvChromaRange {
            bias_y: 16,
            bias_uv: 128,
            range_y: 219,
            range_uv: 224,
            range,
        },
        YuvRange::Full => YuvChromaRange {
            bias_y: 0,
            bias_uv: 128,
            range_y: 255,
            range_uv: 255,
            range,
        },
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Eq, Hash, Default)]
/// Declares standard YUV conversion matrices, check [ITU-R](https://www.itu.int/rec/T-REC-H.273/en) information for more info
pub enum YuvStandard {
    /// Kr=0.299, Kb=0.114, limited range
    #[default]
    Bt601,
    /// Kr=0.2126, Kb=0.0722, limited range
    Bt709,
    /// Kr=0.2627, Kb=0.0593, limited range
    Bt2020,
    /// SMPTE 240M, Kr=0.212, Kb=0.087, limited range
    Smpte240,
    /// T-REC-T.871 (JPEG), Kr=0.299, Kb=0.114, full range
    Trect871,
}

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
pub struct YuvBias {
    pub kr: f32,
    pub kb: f32,
}

impl YuvStandard {
    pub const ALL: [YuvStandard; 5] = [
        YuvStandard::Bt601,
        YuvStandard::Bt709,
        YuvStandard::Bt2020,
        YuvStandard::Smpte240,
        YuvStandard::Trect871,
    ];

    pub const fn get_kr_kb(self) -> YuvBias {
        match self {
            YuvStandard::Bt601 | YuvStandard::Trect871 => YuvBias {
                kr: 0.299f32,
                kb: 0.114f32,
            },
            YuvStandard::Bt709 => YuvBias {
                kr: 0.2126f32,
                kb: 0.0722f32,
            },
            YuvStandard::Bt2020 => YuvBias {
                kr: 0.2627f32,
                kb: 0.0593f32,
            },
            YuvStandard::Smpte240 => YuvBias {
                kr: 0.212f32,
                kb: 0.087f32,
            },
        }
    }

    pub const fn range(self) -> YuvRange {
        match self {
            YuvStandard::Trect871 => YuvRange::Full,
            _ => YuvRange::Limited,
        }
    }

    /// Integer coefficients for decoding at [YUV_TO_BGR_SHIFT] precision.
    pub(crate) fn decoding(self) -> YuvToBgrParams {
        let range = get_yuv_range(self.range());
        let kr_kb = self.get_kr_kb();
        let transform = get_inverse_transform(
            255,
            range.range_y,
            range.range_uv,
            kr_kb.kr,
            kr_kb.kb,
        )
        .to_integers(YUV_TO_BGR_SHIFT as u32);
        YuvToBgrParams {
            y_weight: transform.y_coef,
            u_to_blue: transform.cb_coef,
            u_to_green: -transform.g_coeff_2,
            v_to_green: -transform.g_coeff_1,
            v_to_red: transform.cr_coef,
            bias_y: range.bias_y as i32,
            bias_uv: range.bias_uv as i32,
        }
    }

    /// Integer coefficients for encoding at [BGR_TO_YUV_SHIFT] precision.
    pub(crate) fn encoding(self) -> BgrToYuvParams {
        let range = get_yuv_range(self.range());
        let kr_kb = self.get_kr_kb();
        let transform = get_forward_transform(
            255,
            range.range_y,
            range.range_uv,
            kr_kb.kr,
            kr_kb.kb,
        )
        .to_integers(BGR_TO_YUV_SHIFT as u32);
        BgrToYuvParams {
            y_b: transform.yb,
            y_g: transform.yg,
            y_r: transform.yr,
            u_b: transform.cb_b,
            u_g: transform.cb_g,
            u_r: transform.cb_r,
            v_b: transform.cr_b,
            v_g: transform.cr_g,
            v_r: transform.cr_r,
            bias_y: range.bias_y as i32,
            bias_uv: range.bias_uv as i32,
            y_min: range.y_min(),
            y_max: range.y_max(),
            uv_min: range.uv_min(),
            uv_max: range.uv_max(),
        }
    }
}

/// Signed integer weights consumed by decoding kernels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct YuvToBgrParams {
    pub(crate) y_weight: i32,
    pub(crate) u_to_blue: i32,
    pub(crate) u_to_green: i32,
    pub(crate) v_to_green: i32,
    pub(crate) v_to_red: i32,
    pub(crate) bias_y: i32,
    pub(crate) bias_uv: i32,
}

/// Signed integer weights consumed by encoding kernels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct BgrToYuvParams {
    pub(crate) y_b: i32,
    pub(crate) y_g: i32,
    pub(crate) y_r: i32,
    pub(crate) u_b: i32,
    pub(crate) u_g: i32,
    pub(crate) u_r: i32,
    pub(crate) v_b: i32,
    pub(crate) v_g: i32,
    pub(crate) v_r: i32,
    pub(crate) bias_y: i32,
    pub(crate) bias_uv: i32,
    pub(crate) y_min: i32,
    pub(crate) y_max: i32,
    pub(crate) uv_min: i32,
    pub(crate) uv_max: i32,
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum YuvChromaSubsampling {
    Yuv420 = 0,
    Yuv422 = 1,
    Yuv444 = 2,
}

impl From<u8> for YuvChromaSubsampling {
    #[inline(always)]
    fn from(value: u8) -> Self {
        match value {
            0 => YuvChromaSubsampling::Yuv420,
            1 => YuvChromaSubsampling::Yuv422,
            2 => YuvChromaSubsampling::Yuv444,
            _ => {
                unreachable!("Unknown chroma subsampling {value}")
            }
        }
    }
}

impl YuvChromaSubsampling {
    #[inline]
    pub const fn chroma_width(self, width: usize) -> usize {
        match self {
            YuvChromaSubsampling::Yuv420 | YuvChromaSubsampling::Yuv422 => width.div_ceil(2),
            YuvChromaSubsampling::Yuv444 => width,
        }
    }

    #[inline]
    pub const fn chroma_height(self, height: usize) -> usize {
        match self {
            YuvChromaSubsampling::Yuv420 => height.div_ceil(2),
            YuvChromaSubsampling::Yuv422 | YuvChromaSubsampling::Yuv444 => height,
        }
    }
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum YuvSourceChannels {
    Rgb = 0,
    Rgba = 1,
    Bgra = 2,
    Bgr = 3,
}

impl From<u8> for YuvSourceChannels {
    #[inline(always)]
    fn from(value: u8) -> Self {
        match value {
            0 => YuvSourceChannels::Rgb,
            1 => YuvSourceChannels::Rgba,
            2 => YuvSourceChannels::Bgra,
            3 => YuvSourceChannels::Bgr,
            _ => {
                unreachable!("Unknown channels layout {value}")
            }
        }
    }
}

impl YuvSourceChannels {
    #[inline(always)]
    pub const fn get_channels_count(&self) -> usize {
        match self {
            YuvSourceChannels::Rgb | YuvSourceChannels::Bgr => 3,
            YuvSourceChannels::Rgba | YuvSourceChannels::Bgra => 4,
        }
    }

    #[inline(always)]
    pub const fn has_alpha(&self) -> bool {
        match self {
            YuvSourceChannels::Rgb | YuvSourceChannels::Bgr => false,
            YuvSourceChannels::Rgba | YuvSourceChannels::Bgra => true,
        }
    }

    #[inline(always)]
    pub const fn get_r_channel_offset(&self) -> usize {
        match self {
            YuvSourceChannels::Rgb | YuvSourceChannels::Rgba => 0,
            YuvSourceChannels::Bgra | YuvSourceChannels::Bgr => 2,
        }
    }

    #[inline(always)]
    pub const fn get_g_channel_offset(&self) -> usize {
        1
    }

    #[inline(always)]
    pub const fn get_b_channel_offset(&self) -> usize {
        match self {
            YuvSourceChannels::Rgb | YuvSourceChannels::Rgba => 2,
            YuvSourceChannels::Bgra | YuvSourceChannels::Bgr => 0,
        }
    }

    #[inline(always)]
    pub const fn get_a_channel_offset(&self) -> usize {
        match self {
            YuvSourceChannels::Rgb | YuvSourceChannels::Bgr => 0,
            YuvSourceChannels::Rgba | YuvSourceChannels::Bgra => 3,
        }
    }
}

/// Byte order of 4:2:2 packed YUV, two pixels per four bytes.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PackedYuvLayout {
    /// U Y0 V Y1
    Uyvy = 0,
    /// Y0 U Y1 V
    Yuyv = 1,
}

impl From<u8> for PackedYuvLayout {
    #[inline(always)]
    fn from(value: u8) -> Self {
        match value {
            0 => PackedYuvLayout::Uyvy,
            1 => PackedYuvLayout::Yuyv,
            _ => {
                unreachable!("Unknown packed layout {value}")
            }
        }
    }
}

impl PackedYuvLayout {
    #[inline(always)]
    pub(crate) const fn get_u_position(&self) -> usize {
        match self {
            PackedYuvLayout::Uyvy => 0,
            PackedYuvLayout::Yuyv => 1,
        }
    }

    #[inline(always)]
    pub(crate) const fn get_v_position(&self) -> usize {
        match self {
            PackedYuvLayout::Uyvy => 2,
            PackedYuvLayout::Yuyv => 3,
        }
    }

    #[inline(always)]
    pub(crate) const fn get_first_y_position(&self) -> usize {
        match self {
            PackedYuvLayout::Uyvy => 1,
            PackedYuvLayout::Yuyv => 0,
        }
    }

    #[inline(always)]
    pub(crate) const fn get_second_y_position(&self) -> usize {
        match self {
            PackedYuvLayout::Uyvy => 3,
            PackedYuvLayout::Yuyv => 2,
        }
    }
}
