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
use rug::float::Round;
use rug::Float;
use yuv_synet::{
    get_forward_transform, get_inverse_transform, get_yuv_range, CbCrForwardTransform,
    CbCrInverseTransform, ToIntegerTransform, YuvStandard,
};

const BITS: u32 = 150;
/// Matches the fixed point precision of 8-bit decoding.
const DECODE_PRECISION: u32 = 13;
/// Matches the fixed point precision of 8-bit encoding.
const ENCODE_PRECISION: u32 = 14;

fn f(v: f32) -> Float {
    Float::with_val(BITS, v)
}

fn to_fixed(v: Float, precision: u32) -> i32 {
    (v * Float::with_val(BITS, (1u32 << precision) as f32))
        .to_i32_saturating_round(Round::Nearest)
        .unwrap()
}

fn forward_exact(standard: YuvStandard) -> CbCrForwardTransform<i32> {
    let bias = standard.get_kr_kb();
    let range = get_yuv_range(standard.range());
    let (kr, kb) = (f(bias.kr), f(bias.kb));
    let kg = || f(1.) - f(bias.kr) - f(bias.kb);
    let y_scale = || f(range.range_y as f32) / f(255.);
    let uv_scale = || f(range.range_uv as f32) / f(255.);

    let p = ENCODE_PRECISION;
    CbCrForwardTransform {
        yr: to_fixed(kr.clone() * y_scale(), p),
        yg: to_fixed(kg() * y_scale(), p),
        yb: to_fixed(kb.clone() * y_scale(), p),
        cb_r: to_fixed(f(-0.5) * kr.clone() / (f(1.) - kb.clone()) * uv_scale(), p),
        cb_g: to_fixed(f(-0.5) * kg() / (f(1.) - kb.clone()) * uv_scale(), p),
        cb_b: to_fixed(f(0.5) * uv_scale(), p),
        cr_r: to_fixed(f(0.5) * uv_scale(), p),
        cr_g: to_fixed(f(-0.5) * kg() / (f(1.) - kr.clone()) * uv_scale(), p),
        cr_b: to_fixed(f(-0.5) * kb / (f(1.) - kr) * uv_scale(), p),
    }
}

fn inverse_exact(standard: YuvStandard) -> CbCrInverseTransform<i32> {
    let bias = standard.get_kr_kb();
    let range = get_yuv_range(standard.range());
    let (kr, kb) = (f(bias.kr), f(bias.kb));
    let kg = f(1.) - f(bias.kr) - f(bias.kb);
    let range_uv = || f(255.) / f(range.range_uv as f32);

    let p = DECODE_PRECISION;
    CbCrInverseTransform::new(
        to_fixed(f(255.) / f(range.range_y as f32), p),
        to_fixed(f(2.) * (f(1.) - kr.clone()) * range_uv(), p),
        to_fixed(f(2.) * (f(1.) - kb.clone()) * range_uv(), p),
        to_fixed(
            f(2.) * ((f(1.) - kr.clone()) * kr / kg.clone()) * range_uv(),
            p,
        ),
        to_fixed(f(2.) * ((f(1.) - kb.clone()) * kb / kg) * range_uv(), p),
    )
}

fn main() {
    let mut mismatches = 0usize;
    for standard in YuvStandard::ALL {
        let bias = standard.get_kr_kb();
        let range = get_yuv_range(standard.range());

        let exact_inverse = inverse_exact(standard);
        let crate_inverse =
            get_inverse_transform(255, range.range_y, range.range_uv, bias.kr, bias.kb)
                .to_integers(DECODE_PRECISION);
        println!("{:?} {:?} decode: {:?}", standard, range.range, exact_inverse);
        if exact_inverse != crate_inverse {
            mismatches += 1;
            println!("  single precision gives {:?}", crate_inverse);
        }

        let exact_forward = forward_exact(standard);
        let crate_forward =
            get_forward_transform(255, range.range_y, range.range_uv, bias.kr, bias.kb)
                .to_integers(ENCODE_PRECISION);
        println!("{:?} {:?} encode: {:?}", standard, range.range, exact_forward);
        if exact_forward != crate_forward {
            mismatches += 1;
            println!("  single precision gives {:?}", crate_forward);
        }
    }
    println!("{mismatches} coefficient sets differ from the exact values");
}
