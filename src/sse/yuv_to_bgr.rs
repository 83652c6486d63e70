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
use crate::internals::ProcessedOffset;
use crate::lanes::AlphaSource;
use crate::sse::sse_support::{
    sse_pack_i32_to_u8, sse_store_quads, sse_store_triples, sse_widen_u8_to_i32,
};
use crate::yuv_support::{YuvChromaSubsampling, YuvSourceChannels, YuvToBgrParams, YUV_TO_BGR_SHIFT};
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Decodes one row 16 pixels at a time with exact 32-bit products.
#[target_feature(enable = "sse4.1")]
pub(crate) unsafe fn sse_yuv_to_bgr_row<const DESTINATION_CHANNELS: u8, const SAMPLING: u8>(
    params: &YuvToBgrParams,
    y_plane: &[u8],
    u_plane: &[u8],
    v_plane: &[u8],
    alpha: AlphaSource,
    bgra: &mut [u8],
    width: usize,
) -> ProcessedOffset {
    let chroma_subsampling: YuvChromaSubsampling = SAMPLING.into();
    let destination_channels: YuvSourceChannels = DESTINATION_CHANNELS.into();
    let channels = destination_channels.get_channels_count();

    let mut cx = 0usize;
    let mut uv_x = 0usize;

    let y_ptr = y_plane.as_ptr();
    let u_ptr = u_plane.as_ptr();
    let v_ptr = v_plane.as_ptr();
    let rgba_ptr = bgra.as_mut_ptr();

    let y_corr = _mm_set1_epi32(params.bias_y);
    let uv_corr = _mm_set1_epi32(params.bias_uv);
    let v_luma_coeff = _mm_set1_epi32(params.y_weight);
    let v_cr_coeff = _mm_set1_epi32(params.v_to_red);
    let v_cb_coeff = _mm_set1_epi32(params.u_to_blue);
    let v_g_coeff_1 = _mm_set1_epi32(params.v_to_green);
    let v_g_coeff_2 = _mm_set1_epi32(params.u_to_green);
    let rounding_const = _mm_set1_epi32(1 << (YUV_TO_BGR_SHIFT - 1));

    while cx + 16 <= width {
        let y_values = _mm_loadu_si128(y_ptr.add(cx) as *const __m128i);
        let (u_values, v_values) = match chroma_subsampling {
            YuvChromaSubsampling::Yuv420 | YuvChromaSubsampling::Yuv422 => {
                let u_values = _mm_loadl_epi64(u_ptr.add(uv_x) as *const __m128i);
                let v_values = _mm_loadl_epi64(v_ptr.add(uv_x) as *const __m128i);
                (
                    _mm_unpacklo_epi8(u_values, u_values),
                    _mm_unpacklo_epi8(v_values, v_values),
                )
            }
            YuvChromaSubsampling::Yuv444 => (
                _mm_loadu_si128(u_ptr.add(uv_x) as *const __m128i),
                _mm_loadu_si128(v_ptr.add(uv_x) as *const __m128i),
            ),
        };

        let y_wide = sse_widen_u8_to_i32(y_values);
        let u_wide = sse_widen_u8_to_i32(u_values);
        let v_wide = sse_widen_u8_to_i32(v_values);

        let mut r_wide = [_mm_setzero_si128(); 4];
        let mut g_wide = [_mm_setzero_si128(); 4];
        let mut b_wide = [_mm_setzero_si128(); 4];
        for i in 0..4 {
            let y_value = _mm_mullo_epi32(_mm_sub_epi32(y_wide[i], y_corr), v_luma_coeff);
            let u_value = _mm_sub_epi32(u_wide[i], uv_corr);
            let v_value = _mm_sub_epi32(v_wide[i], uv_corr);

            r_wide[i] = _mm_srai_epi32::<YUV_TO_BGR_SHIFT>(_mm_add_epi32(
                _mm_add_epi32(y_value, _mm_mullo_epi32(v_value, v_cr_coeff)),
                rounding_const,
            ));
            b_wide[i] = _mm_srai_epi32::<YUV_TO_BGR_SHIFT>(_mm_add_epi32(
                _mm_add_epi32(y_value, _mm_mullo_epi32(u_value, v_cb_coeff)),
                rounding_const,
            ));
            g_wide[i] = _mm_srai_epi32::<YUV_TO_BGR_SHIFT>(_mm_add_epi32(
                _mm_add_epi32(
                    y_value,
                    _mm_add_epi32(
                        _mm_mullo_epi32(v_value, v_g_coeff_1),
                        _mm_mullo_epi32(u_value, v_g_coeff_2),
                    ),
                ),
                rounding_const,
            ));
        }

        let r_values = sse_pack_i32_to_u8(r_wide);
        let g_values = sse_pack_i32_to_u8(g_wide);
        let b_values = sse_pack_i32_to_u8(b_wide);

        let dst_ptr = rgba_ptr.add(cx * channels);
        let (first, third) = match destination_channels {
            YuvSourceChannels::Rgb | YuvSourceChannels::Rgba => (r_values, b_values),
            YuvSourceChannels::Bgr | YuvSourceChannels::Bgra => (b_values, r_values),
        };
        if destination_channels.has_alpha() {
            let a_values = match alpha {
                AlphaSource::Constant(value) => _mm_set1_epi8(value as i8),
                AlphaSource::Plane(a_plane) => {
                    _mm_loadu_si128(a_plane.as_ptr().add(cx) as *const __m128i)
                }
            };
            sse_store_quads(dst_ptr, first, g_values, third, a_values);
        } else {
            sse_store_triples(dst_ptr, first, g_values, third);
        }

        cx += 16;
        uv_x += match chroma_subsampling {
            YuvChromaSubsampling::Yuv420 | YuvChromaSubsampling::Yuv422 => 8,
            YuvChromaSubsampling::Yuv444 => 16,
        };
    }

    ProcessedOffset { cx, ux: uv_x }
}
