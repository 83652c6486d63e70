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
use crate::dispatch::{run_floats, select_softmax, simd_isa, SimdIsa, SoftmaxKind};
use crate::lanes::{AddRows, DivRows, ExpSubRows, MaxRows, MulRow, SoftmaxExpRow};
use crate::synet_error::{check_buffer, tensor_volume};
use crate::SynetError;

#[inline]
fn row_max(src: &[f32]) -> f32 {
    src.iter().fold(f32::MIN, |max, &v| max.max(v))
}

fn softmax_pair(src: &[f32], dst: &mut [f32]) {
    for (src, dst) in src.chunks_exact(2).zip(dst.chunks_exact_mut(2)) {
        let max = src[0].max(src[1]);
        let e0 = (src[0] - max).exp();
        let e1 = (src[1] - max).exp();
        let k = 1. / (e0 + e1);
        dst[0] = e0 * k;
        dst[1] = e1 * k;
    }
}

fn softmax_triple(src: &[f32], dst: &mut [f32]) {
    for (src, dst) in src.chunks_exact(3).zip(dst.chunks_exact_mut(3)) {
        let max = src[0].max(src[1]).max(src[2]);
        let e0 = (src[0] - max).exp();
        let e1 = (src[1] - max).exp();
        let e2 = (src[2] - max).exp();
        let k = 1. / (e0 + e1 + e2);
        dst[0] = e0 * k;
        dst[1] = e1 * k;
        dst[2] = e2 * k;
    }
}

fn softmax_rows(src: &[f32], count: usize, dst: &mut [f32], isa: SimdIsa) {
    for (src, dst) in src.chunks_exact(count).zip(dst.chunks_exact_mut(count)) {
        let max = row_max(src);
        let processed = run_floats(
            isa,
            SoftmaxExpRow {
                src,
                dst: &mut *dst,
                max,
            },
        );
        for (dst, &src) in dst[processed..].iter_mut().zip(src[processed..].iter()) {
            *dst = (src - max).exp();
        }

        let sum = dst.iter().fold(0f32, |sum, &v| sum + v);
        let k = 1. / sum;
        let processed = run_floats(isa, MulRow { dst: &mut *dst, k });
        for v in dst[processed..].iter_mut() {
            *v *= k;
        }
    }
}

fn softmax_strided(src: &[f32], count: usize, inner: usize, dst: &mut [f32], isa: SimdIsa) {
    let mut max = vec![0f32; inner];
    let mut sum = vec![0f32; inner];
    for (src, dst) in src
        .chunks_exact(count * inner)
        .zip(dst.chunks_exact_mut(count * inner))
    {
        max.copy_from_slice(&src[..inner]);
        for row in src[inner..].chunks_exact(inner) {
            let processed = run_floats(
                isa,
                MaxRows {
                    acc: &mut max[..],
                    src: row,
                },
            );
            for (m, &v) in max[processed..].iter_mut().zip(row[processed..].iter()) {
                *m = m.max(v);
            }
        }

        sum.fill(0.);
        for (src, dst) in src.chunks_exact(inner).zip(dst.chunks_exact_mut(inner)) {
            let processed = run_floats(
                isa,
                ExpSubRows {
                    src,
                    max: &max,
                    dst: &mut *dst,
                },
            );
            for ((dst, &src), &max) in dst[processed..]
                .iter_mut()
                .zip(src[processed..].iter())
                .zip(max[processed..].iter())
            {
                *dst = (src - max).exp();
            }

            let processed = run_floats(
                isa,
                AddRows {
                    acc: &mut sum[..],
                    src: &*dst,
                },
            );
            for (sum, &v) in sum[processed..].iter_mut().zip(dst[processed..].iter()) {
                *sum += v;
            }
        }

        for dst in dst.chunks_exact_mut(inner) {
            let processed = run_floats(
                isa,
                DivRows {
                    dst: &mut *dst,
                    den: &sum,
                },
            );
            for (dst, &den) in dst[processed..].iter_mut().zip(sum[processed..].iter()) {
                *dst /= den;
            }
        }
    }
}

fn softmax_with_kind(
    src: &[f32],
    count: usize,
    inner: usize,
    dst: &mut [f32],
    kind: SoftmaxKind,
    isa: SimdIsa,
) {
    match kind {
        SoftmaxKind::Pair => softmax_pair(src, dst),
        SoftmaxKind::Triple => softmax_triple(src, dst),
        SoftmaxKind::Row => softmax_rows(src, count, dst, isa),
        SoftmaxKind::Strided => softmax_strided(src, count, inner, dst, isa),
    }
}

pub(crate) fn softmax_with_isa(
    src: &[f32],
    outer: usize,
    count: usize,
    inner: usize,
    dst: &mut [f32],
    isa: SimdIsa,
) -> Result<(), SynetError> {
    let volume = tensor_volume(&[outer, count, inner])?;
    check_buffer("src", src, volume)?;
    check_buffer("dst", dst, volume)?;
    let kind = select_softmax(count, inner);
    log::trace!("softmax: {:?} via {:?}", kind, isa);
    softmax_with_kind(src, count, inner, dst, kind, isa);
    Ok(())
}

/// Softmax over the middle axis of an `outer x count x inner` tensor.
///
/// Every `(outer, inner)` position is normalized independently:
/// `dst[o][c][i] = exp(src[o][c][i] - max) / sum(exp(src[o][..][i] - max))`.
///
/// # Errors
///
/// Returns an error if an extent is zero, or if `src` or `dst` do not hold exactly
/// `outer * count * inner` values.
pub fn synet_softmax_layer_forward(
    src: &[f32],
    outer: usize,
    count: usize,
    inner: usize,
    dst: &mut [f32],
) -> Result<(), SynetError> {
    softmax_with_isa(src, outer, count, inner, dst, simd_isa())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn random_f32(len: usize) -> Vec<f32> {
        let mut rng = rand::rng();
        (0..len).map(|_| rng.random_range(-20f32..20f32)).collect()
    }

    #[test]
    fn distributions_sum_to_one() {
        for (outer, count, inner) in [(3usize, 2usize, 1usize), (2, 3, 1), (4, 37, 1), (2, 5, 19)] {
            let src = random_f32(outer * count * inner);
            let mut dst = vec![0f32; src.len()];
            synet_softmax_layer_forward(&src, outer, count, inner, &mut dst).unwrap();
            for o in 0..outer {
                for i in 0..inner {
                    let sum: f32 = (0..count)
                        .map(|c| dst[(o * count + c) * inner + i])
                        .sum();
                    assert!((sum - 1.).abs() < 1e-5, "sum {sum}");
                }
            }
            assert!(dst.iter().all(|&v| (0f32..=1.).contains(&v)));
        }
    }

    #[test]
    fn uniform_input_gives_uniform_output() {
        let src = [2.5f32; 4];
        let mut dst = [0f32; 4];
        synet_softmax_layer_forward(&src, 1, 4, 1, &mut dst).unwrap();
        assert_eq!(dst, [0.25f32; 4]);
    }

    #[test]
    fn large_inputs_do_not_overflow() {
        let src = [1000f32, 1001., 999.];
        let mut dst = [0f32; 3];
        synet_softmax_layer_forward(&src, 1, 3, 1, &mut dst).unwrap();
        assert!(dst.iter().all(|v| v.is_finite()));
        assert!(dst[1] > dst[0] && dst[0] > dst[2]);
    }

    #[test]
    fn shift_invariance() {
        let src = random_f32(7 * 11);
        let shifted: Vec<f32> = src.iter().map(|&v| v + 4.).collect();
        let mut a = vec![0f32; src.len()];
        let mut b = vec![0f32; src.len()];
        synet_softmax_layer_forward(&src, 7, 11, 1, &mut a).unwrap();
        synet_softmax_layer_forward(&shifted, 7, 11, 1, &mut b).unwrap();
        for (a, b) in a.iter().zip(b.iter()) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn unrolled_kernels_match_row_kernel() {
        for count in [2usize, 3] {
            let src = random_f32(count * 9);
            let mut unrolled = vec![0f32; src.len()];
            let mut row = vec![0f32; src.len()];
            softmax_with_kind(
                &src,
                count,
                1,
                &mut unrolled,
                select_softmax(count, 1),
                simd_isa(),
            );
            softmax_with_kind(&src, count, 1, &mut row, SoftmaxKind::Row, SimdIsa::Scalar);
            assert_eq!(unrolled, row, "count {count}");
        }
    }

    #[test]
    fn all_isas_match_scalar() {
        for (outer, count, inner) in [
            (2usize, 33usize, 1usize),
            (1, 65, 1),
            (2, 4, 17),
            (3, 3, 64),
        ] {
            let src = random_f32(outer * count * inner);
            let mut reference = vec![0f32; src.len()];
            softmax_with_isa(&src, outer, count, inner, &mut reference, SimdIsa::Scalar).unwrap();
            for isa in SimdIsa::available() {
                let mut dst = vec![0f32; src.len()];
                softmax_with_isa(&src, outer, count, inner, &mut dst, isa).unwrap();
                assert_eq!(reference, dst, "{isa:?}");
            }
        }
    }

    #[test]
    fn shape_errors() {
        let mut dst = [0f32; 6];
        assert_eq!(
            synet_softmax_layer_forward(&[0f32; 6], 0, 3, 2, &mut dst),
            Err(SynetError::ZeroSizedTensor)
        );
        assert!(matches!(
            synet_softmax_layer_forward(&[0f32; 5], 1, 3, 2, &mut dst),
            Err(SynetError::BufferSizeMismatch { name: "src", .. })
        ));
    }
}
