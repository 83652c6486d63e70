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
#![forbid(unsafe_code)]
use crate::yuv_support::{
    BgrToYuvParams, YuvToBgrParams, BGR_TO_GRAY_SHIFT, BGR_TO_YUV_SHIFT, BLUE_TO_GRAY_WEIGHT,
    GREEN_TO_GRAY_WEIGHT, RED_TO_GRAY_WEIGHT, YUV_TO_BGR_SHIFT,
};

#[inline(always)]
/// Saturating rounding shift right into [0, 255]
pub(crate) fn qrshr<const PRECISION: i32>(val: i32) -> i32 {
    let rounding: i32 = 1 << (PRECISION - 1);
    ((val + rounding) >> PRECISION).clamp(0, 255)
}

#[inline(always)]
/// Rounding shift right, result is not saturated
pub(crate) fn rshr<const PRECISION: i32>(val: i32) -> i32 {
    let rounding: i32 = 1 << (PRECISION - 1);
    (val + rounding) >> PRECISION
}

#[inline(always)]
pub(crate) fn avg2(a: u8, b: u8) -> u8 {
    ((a as u16 + b as u16 + 1) >> 1) as u8
}

#[inline(always)]
pub(crate) fn avg4(a: u8, b: u8, c: u8, d: u8) -> u8 {
    ((a as u16 + b as u16 + c as u16 + d as u16 + 2) >> 2) as u8
}

#[inline(always)]
pub(crate) fn yuv_to_blue(params: &YuvToBgrParams, y: i32, u: i32) -> u8 {
    qrshr::<YUV_TO_BGR_SHIFT>(
        params.y_weight * (y - params.bias_y) + params.u_to_blue * (u - params.bias_uv),
    ) as u8
}

#[inline(always)]
pub(crate) fn yuv_to_green(params: &YuvToBgrParams, y: i32, u: i32, v: i32) -> u8 {
    qrshr::<YUV_TO_BGR_SHIFT>(
        params.y_weight * (y - params.bias_y)
            + params.u_to_green * (u - params.bias_uv)
            + params.v_to_green * (v - params.bias_uv),
    ) as u8
}

#[inline(always)]
pub(crate) fn yuv_to_red(params: &YuvToBgrParams, y: i32, v: i32) -> u8 {
    qrshr::<YUV_TO_BGR_SHIFT>(
        params.y_weight * (y - params.bias_y) + params.v_to_red * (v - params.bias_uv),
    ) as u8
}

#[inline(always)]
pub(crate) fn bgr_to_y(params: &BgrToYuvParams, b: i32, g: i32, r: i32) -> u8 {
    (rshr::<BGR_TO_YUV_SHIFT>(params.y_b * b + params.y_g * g + params.y_r * r) + params.bias_y)
        .clamp(params.y_min, params.y_max) as u8
}

#[inline(always)]
pub(crate) fn bgr_to_u(params: &BgrToYuvParams, b: i32, g: i32, r: i32) -> u8 {
    (rshr::<BGR_TO_YUV_SHIFT>(params.u_b * b + params.u_g * g + params.u_r * r) + params.bias_uv)
        .clamp(params.uv_min, params.uv_max) as u8
}

#[inline(always)]
pub(crate) fn bgr_to_v(params: &BgrToYuvParams, b: i32, g: i32, r: i32) -> u8 {
    (rshr::<BGR_TO_YUV_SHIFT>(params.v_b * b + params.v_g * g + params.v_r * r) + params.bias_uv)
        .clamp(params.uv_min, params.uv_max) as u8
}

#[inline(always)]
pub(crate) fn bgr_to_gray_value(b: i32, g: i32, r: i32) -> u8 {
    rshr::<BGR_TO_GRAY_SHIFT>(
        BLUE_TO_GRAY_WEIGHT * b + GREEN_TO_GRAY_WEIGHT * g + RED_TO_GRAY_WEIGHT * r,
    ) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yuv_support::YuvStandard;

    #[test]
    fn qrshr_saturates_both_sides() {
        assert_eq!(qrshr::<13>(-100_000), 0);
        assert_eq!(qrshr::<13>(300 << 13), 255);
        assert_eq!(qrshr::<13>((7 << 13) + (1 << 12)), 8);
        assert_eq!(qrshr::<13>((7 << 13) + (1 << 12) - 1), 7);
    }

    #[test]
    fn rshr_floors_negative_sums() {
        assert_eq!(rshr::<14>(-(1 << 14)), -1);
        assert_eq!(rshr::<14>(-(1 << 13) - 1), -1);
        assert_eq!(rshr::<14>(-(1 << 13)), 0);
    }

    #[test]
    fn averages_round_half_up() {
        assert_eq!(avg2(1, 2), 2);
        assert_eq!(avg2(255, 255), 255);
        assert_eq!(avg4(0, 0, 1, 1), 1);
        assert_eq!(avg4(0, 0, 0, 1), 0);
        assert_eq!(avg4(255, 255, 255, 255), 255);
    }

    #[test]
    fn bt601_gray_decodes_to_gray() {
        let params = YuvStandard::Bt601.decoding();
        assert_eq!(yuv_to_blue(&params, 126, 128), 128);
        assert_eq!(yuv_to_green(&params, 126, 128, 128), 128);
        assert_eq!(yuv_to_red(&params, 126, 128), 128);
        assert_eq!(yuv_to_blue(&params, 16, 128), 0);
        assert_eq!(yuv_to_red(&params, 235, 128), 255);
    }

    #[test]
    fn bt601_encodes_extremes_to_limited_range() {
        let params = YuvStandard::Bt601.encoding();
        assert_eq!(bgr_to_y(&params, 0, 0, 0), 16);
        assert_eq!(bgr_to_y(&params, 255, 255, 255), 235);
        assert_eq!(bgr_to_u(&params, 128, 128, 128), 128);
        assert_eq!(bgr_to_v(&params, 128, 128, 128), 128);
        assert_eq!(bgr_to_u(&params, 255, 0, 0), 240);
        assert_eq!(bgr_to_v(&params, 0, 0, 255), 240);
    }

    #[test]
    fn gray_of_uniform_color_is_the_color() {
        for v in [0, 1, 77, 128, 254, 255] {
            assert_eq!(bgr_to_gray_value(v, v, v), v as u8);
        }
    }
}
