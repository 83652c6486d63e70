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
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Stores 16 pixels of four planes as interleaved quads, 64 bytes at `ptr`.
#[inline(always)]
pub(crate) unsafe fn sse_store_quads(
    ptr: *mut u8,
    c0: __m128i,
    c1: __m128i,
    c2: __m128i,
    c3: __m128i,
) {
    let lo01 = _mm_unpacklo_epi8(c0, c1);
    let hi01 = _mm_unpackhi_epi8(c0, c1);
    let lo23 = _mm_unpacklo_epi8(c2, c3);
    let hi23 = _mm_unpackhi_epi8(c2, c3);
    _mm_storeu_si128(ptr as *mut __m128i, _mm_unpacklo_epi16(lo01, lo23));
    _mm_storeu_si128(ptr.add(16) as *mut __m128i, _mm_unpackhi_epi16(lo01, lo23));
    _mm_storeu_si128(ptr.add(32) as *mut __m128i, _mm_unpacklo_epi16(hi01, hi23));
    _mm_storeu_si128(ptr.add(48) as *mut __m128i, _mm_unpackhi_epi16(hi01, hi23));
}

/// Stores 16 pixels of three planes as interleaved triples, exactly 48 bytes at `ptr`.
#[inline(always)]
pub(crate) unsafe fn sse_store_triples(ptr: *mut u8, c0: __m128i, c1: __m128i, c2: __m128i) {
    let zeros = _mm_setzero_si128();
    let lo01 = _mm_unpacklo_epi8(c0, c1);
    let hi01 = _mm_unpackhi_epi8(c0, c1);
    let lo2 = _mm_unpacklo_epi8(c2, zeros);
    let hi2 = _mm_unpackhi_epi8(c2, zeros);
    // Drops every fourth byte, the upper four bytes become zero
    let pack = _mm_setr_epi8(0, 1, 2, 4, 5, 6, 8, 9, 10, 12, 13, 14, -1, -1, -1, -1);
    let q0 = _mm_shuffle_epi8(_mm_unpacklo_epi16(lo01, lo2), pack);
    let q1 = _mm_shuffle_epi8(_mm_unpackhi_epi16(lo01, lo2), pack);
    let q2 = _mm_shuffle_epi8(_mm_unpacklo_epi16(hi01, hi2), pack);
    let q3 = _mm_shuffle_epi8(_mm_unpackhi_epi16(hi01, hi2), pack);
    let v0 = _mm_or_si128(q0, _mm_slli_si128::<12>(q1));
    let v1 = _mm_or_si128(_mm_srli_si128::<4>(q1), _mm_slli_si128::<8>(q2));
    let v2 = _mm_or_si128(_mm_srli_si128::<8>(q2), _mm_slli_si128::<4>(q3));
    _mm_storeu_si128(ptr as *mut __m128i, v0);
    _mm_storeu_si128(ptr.add(16) as *mut __m128i, v1);
    _mm_storeu_si128(ptr.add(32) as *mut __m128i, v2);
}

/// Widens 16 bytes into four vectors of i32.
#[inline(always)]
pub(crate) unsafe fn sse_widen_u8_to_i32(v: __m128i) -> [__m128i; 4] {
    let zeros = _mm_setzero_si128();
    let lo = _mm_unpacklo_epi8(v, zeros);
    let hi = _mm_unpackhi_epi8(v, zeros);
    [
        _mm_cvtepu16_epi32(lo),
        _mm_unpackhi_epi16(lo, zeros),
        _mm_cvtepu16_epi32(hi),
        _mm_unpackhi_epi16(hi, zeros),
    ]
}

/// Narrows four i32 vectors into 16 bytes saturating to `0..=255`.
#[inline(always)]
pub(crate) unsafe fn sse_pack_i32_to_u8(v: [__m128i; 4]) -> __m128i {
    _mm_packus_epi16(_mm_packs_epi32(v[0], v[1]), _mm_packs_epi32(v[2], v[3]))
}
