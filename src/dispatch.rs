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
//! Instruction set detection and kernel selection.
//!
//! Detection runs once per process. Selection functions are pure: the same shape, layout and
//! instruction set always resolve to the same kernel.
#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "avx"))]
use crate::avx2::{avx2_run_bytes, avx2_run_floats};
#[cfg(all(
    any(target_arch = "x86", target_arch = "x86_64"),
    feature = "nightly_avx512"
))]
use crate::avx512bw::{avx512_run_bytes, avx512_run_floats};
use crate::lanes::LaneKernel;
#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
use crate::neon::{neon_run_bytes, neon_run_floats};
#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
use crate::sse::{sse_run_bytes, sse_run_floats};
use crate::synet_pooling::PoolingParams;
use crate::tensor::{nchw_compatible, nhwc_compatible, TensorFormat};
use std::sync::OnceLock;

/// Setting this variable to anything but `0` before the first call pins every kernel to
/// [SimdIsa::Scalar].
pub const FORCE_SCALAR_ENV: &str = "YUV_SYNET_FORCE_SCALAR";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SimdIsa {
    Scalar,
    Sse41,
    Avx2,
    Avx512bw,
    Neon,
}

#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
fn has_sse41() -> bool {
    std::arch::is_x86_feature_detected!("sse4.1")
}

#[cfg(not(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse")))]
fn has_sse41() -> bool {
    false
}

#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "avx"))]
fn has_avx2() -> bool {
    std::arch::is_x86_feature_detected!("avx2") && std::arch::is_x86_feature_detected!("fma")
}

#[cfg(not(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "avx")))]
fn has_avx2() -> bool {
    false
}

#[cfg(all(
    any(target_arch = "x86", target_arch = "x86_64"),
    feature = "nightly_avx512"
))]
fn has_avx512bw() -> bool {
    std::arch::is_x86_feature_detected!("avx512bw")
        && std::arch::is_x86_feature_detected!("avx512f")
        && std::arch::is_x86_feature_detected!("fma")
}

#[cfg(not(all(
    any(target_arch = "x86", target_arch = "x86_64"),
    feature = "nightly_avx512"
)))]
fn has_avx512bw() -> bool {
    false
}

impl SimdIsa {
    pub const ALL: [SimdIsa; 5] = [
        SimdIsa::Scalar,
        SimdIsa::Sse41,
        SimdIsa::Avx2,
        SimdIsa::Avx512bw,
        SimdIsa::Neon,
    ];

    /// Whether this build carries the paths and the running CPU executes them.
    pub fn is_available(self) -> bool {
        match self {
            SimdIsa::Scalar => true,
            SimdIsa::Sse41 => has_sse41(),
            SimdIsa::Avx2 => has_avx2(),
            SimdIsa::Avx512bw => has_avx512bw(),
            SimdIsa::Neon => cfg!(all(target_arch = "aarch64", target_feature = "neon")),
        }
    }

    /// Every usable instruction set, [SimdIsa::Scalar] first.
    pub fn available() -> Vec<SimdIsa> {
        SimdIsa::ALL
            .iter()
            .copied()
            .filter(|isa| isa.is_available())
            .collect()
    }

    /// Pixels per block in the 8-bit kernels.
    pub const fn byte_lanes(self) -> usize {
        match self {
            SimdIsa::Scalar => 1,
            SimdIsa::Sse41 | SimdIsa::Neon => 16,
            SimdIsa::Avx2 => 32,
            SimdIsa::Avx512bw => 64,
        }
    }

    /// `F`, elements per block in the f32 kernels.
    pub const fn float_lanes(self) -> usize {
        match self {
            SimdIsa::Scalar => 1,
            SimdIsa::Sse41 | SimdIsa::Neon => 4,
            SimdIsa::Avx2 => 8,
            SimdIsa::Avx512bw => 16,
        }
    }

    /// Elements of `T` per block, byte lanes for 8-bit types and float lanes otherwise.
    pub(crate) const fn lanes_of<T>(self) -> usize {
        if std::mem::size_of::<T>() == 1 {
            self.byte_lanes()
        } else {
            self.float_lanes()
        }
    }
}

fn detect() -> SimdIsa {
    let forced = std::env::var_os(FORCE_SCALAR_ENV).is_some_and(|v| !v.is_empty() && v != "0");
    let isa = if forced {
        SimdIsa::Scalar
    } else {
        [
            SimdIsa::Avx512bw,
            SimdIsa::Avx2,
            SimdIsa::Sse41,
            SimdIsa::Neon,
        ]
        .into_iter()
        .find(|isa| isa.is_available())
        .unwrap_or(SimdIsa::Scalar)
    };
    log::debug!(
        "yuv-synet kernels: {:?}{}",
        isa,
        if forced { " (forced)" } else { "" }
    );
    isa
}

/// Widest instruction set in use for this process.
pub fn simd_isa() -> SimdIsa {
    static ISA: OnceLock<SimdIsa> = OnceLock::new();
    *ISA.get_or_init(detect)
}

/// Runs an 8-bit kernel at the byte lane width of `isa`.
///
/// Scalar, or an instruction set not usable here, processes nothing and leaves the whole
/// extent to the caller's tail loop.
#[inline]
pub(crate) fn run_bytes<K: LaneKernel>(isa: SimdIsa, kernel: K) -> K::Output {
    if !isa.is_available() {
        return K::Output::default();
    }
    match isa {
        #[cfg(all(
            any(target_arch = "x86", target_arch = "x86_64"),
            feature = "nightly_avx512"
        ))]
        SimdIsa::Avx512bw => unsafe { avx512_run_bytes(kernel) },
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "avx"))]
        SimdIsa::Avx2 => unsafe { avx2_run_bytes(kernel) },
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
        SimdIsa::Sse41 => unsafe { sse_run_bytes(kernel) },
        #[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
        SimdIsa::Neon => unsafe { neon_run_bytes(kernel) },
        _ => K::Output::default(),
    }
}

/// Runs an f32 kernel at the float lane width of `isa`, see [run_bytes].
#[inline]
pub(crate) fn run_floats<K: LaneKernel>(isa: SimdIsa, kernel: K) -> K::Output {
    if !isa.is_available() {
        return K::Output::default();
    }
    match isa {
        #[cfg(all(
            any(target_arch = "x86", target_arch = "x86_64"),
            feature = "nightly_avx512"
        ))]
        SimdIsa::Avx512bw => unsafe { avx512_run_floats(kernel) },
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "avx"))]
        SimdIsa::Avx2 => unsafe { avx2_run_floats(kernel) },
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
        SimdIsa::Sse41 => unsafe { sse_run_floats(kernel) },
        #[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
        SimdIsa::Neon => unsafe { neon_run_floats(kernel) },
        _ => K::Output::default(),
    }
}

/// Runs a kernel over elements of `T`, bytes through [run_bytes] and floats through [run_floats].
#[inline]
pub(crate) fn run_elements<T, K: LaneKernel>(isa: SimdIsa, kernel: K) -> K::Output {
    if std::mem::size_of::<T>() == 1 {
        run_bytes(isa, kernel)
    } else {
        run_floats(isa, kernel)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum ScaleKind {
    Nchw,
    Nhwc3,
    Nhwc,
    /// Channel block size
    Blocked(usize),
}

pub(crate) fn select_scale(format: TensorFormat, channels: usize, spatial: usize) -> ScaleKind {
    if nchw_compatible(format, channels, spatial) {
        ScaleKind::Nchw
    } else if nhwc_compatible(format, channels, spatial) {
        if channels == 3 {
            ScaleKind::Nhwc3
        } else {
            ScaleKind::Nhwc
        }
    } else {
        ScaleKind::Blocked(format.block_size())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Scale8iKind {
    Nchw,
    Nhwc3,
    Nhwc,
    Scalar,
}

pub(crate) fn select_scale8i(
    format: TensorFormat,
    channels: usize,
    spatial: usize,
    isa: SimdIsa,
) -> Scale8iKind {
    let f = isa.float_lanes();
    if isa == SimdIsa::Scalar {
        Scale8iKind::Scalar
    } else if format == TensorFormat::Nchw && spatial >= f {
        Scale8iKind::Nchw
    } else if format == TensorFormat::Nhwc && channels == 3 && spatial >= f {
        Scale8iKind::Nhwc3
    } else if format == TensorFormat::Nhwc && channels >= f {
        Scale8iKind::Nhwc
    } else {
        Scale8iKind::Scalar
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum SoftmaxKind {
    Pair,
    Triple,
    Row,
    Strided,
}

pub(crate) fn select_softmax(count: usize, inner: usize) -> SoftmaxKind {
    match (inner, count) {
        (1, 2) => SoftmaxKind::Pair,
        (1, 3) => SoftmaxKind::Triple,
        (1, _) => SoftmaxKind::Row,
        _ => SoftmaxKind::Strided,
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum PoolingMaxKind {
    Nchw2x2,
    Nchw3x3,
    Nchw3x3Stride2,
    NhwcVector,
    ChannelReduce2,
    ChannelReduce4,
    Generic2d,
    Generic3d,
}

pub(crate) fn select_pooling_max<T>(params: &PoolingParams, isa: SimdIsa) -> PoolingMaxKind {
    let f = isa.lanes_of::<T>();
    let (y, x, c) = (&params.y, &params.x, &params.channel);
    if params.is_2d() {
        if isa == SimdIsa::Scalar {
            return PoolingMaxKind::Generic2d;
        }
        match params.format {
            TensorFormat::Nchw => {
                let square = |k: usize, s: usize| {
                    y.kernel == k && x.kernel == k && y.stride == s && x.stride == s
                };
                let no_pad = y.pad_begin == 0 && x.pad_begin == 0;
                if square(2, 2) && no_pad && x.dst >= f {
                    PoolingMaxKind::Nchw2x2
                } else if square(3, 1)
                    && y.pad_begin == 1
                    && x.pad_begin == 1
                    && y.src == y.dst
                    && x.src == x.dst
                    && x.dst > f
                {
                    PoolingMaxKind::Nchw3x3
                } else if square(3, 2) && no_pad && x.dst > f {
                    PoolingMaxKind::Nchw3x3Stride2
                } else {
                    PoolingMaxKind::Generic2d
                }
            }
            TensorFormat::Nhwc if c.src >= f => PoolingMaxKind::NhwcVector,
            _ => PoolingMaxKind::Generic2d,
        }
    } else {
        let reducible = isa != SimdIsa::Scalar
            && params.format == TensorFormat::Nhwc
            && c.src >= f
            && c.kernel == c.stride
            && c.pad_begin == 0
            && c.pad_end == 0
            && c.src == c.dst * c.kernel;
        match (reducible, c.kernel) {
            (true, 2) => PoolingMaxKind::ChannelReduce2,
            (true, 4) => PoolingMaxKind::ChannelReduce4,
            _ => PoolingMaxKind::Generic3d,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum PoolingAverageKind {
    NhwcVector,
    Generic,
}

pub(crate) fn select_pooling_average(params: &PoolingParams, isa: SimdIsa) -> PoolingAverageKind {
    if isa != SimdIsa::Scalar
        && params.format == TensorFormat::Nhwc
        && params.channel.src >= isa.float_lanes()
    {
        PoolingAverageKind::NhwcVector
    } else {
        PoolingAverageKind::Generic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synet_pooling::PoolingAxis;

    fn params_2d(
        format: TensorFormat,
        channels: usize,
        y: PoolingAxis,
        x: PoolingAxis,
    ) -> PoolingParams {
        PoolingParams {
            channel: PoolingAxis::identity(channels),
            y,
            x,
            format,
        }
    }

    #[test]
    fn detection_is_stable_and_available() {
        let isa = simd_isa();
        assert_eq!(isa, simd_isa());
        assert!(isa.is_available());
        let available = SimdIsa::available();
        assert_eq!(available[0], SimdIsa::Scalar);
        assert!(available.contains(&isa));
    }

    #[test]
    fn unavailable_isa_processes_nothing() {
        for isa in SimdIsa::ALL.iter().filter(|isa| !isa.is_available()) {
            let mut acc = vec![0f32; 64];
            let src = vec![1f32; 64];
            let processed = run_floats(
                *isa,
                crate::lanes::AddRows {
                    acc: &mut acc,
                    src: &src,
                },
            );
            assert_eq!(processed, 0);
        }
        let mut acc = vec![0f32; 64];
        let src = vec![1f32; 64];
        let processed = run_floats(
            SimdIsa::Scalar,
            crate::lanes::AddRows {
                acc: &mut acc,
                src: &src,
            },
        );
        assert_eq!(processed, 0);
    }

    #[test]
    fn scale_selection_covers_every_format() {
        for format in TensorFormat::ALL {
            for channels in [1usize, 2, 3, 4, 17] {
                for spatial in [1usize, 2, 64] {
                    let kind = select_scale(format, channels, spatial);
                    let expected = match format {
                        TensorFormat::Nchw => ScaleKind::Nchw,
                        TensorFormat::Nhwc if channels == 1 => ScaleKind::Nchw,
                        TensorFormat::Nhwc if channels == 3 => ScaleKind::Nhwc3,
                        TensorFormat::Nhwc => ScaleKind::Nhwc,
                        TensorFormat::Nchw4c => ScaleKind::Blocked(4),
                        TensorFormat::Nchw8c => ScaleKind::Blocked(8),
                        TensorFormat::Nchw16c => ScaleKind::Blocked(16),
                    };
                    assert_eq!(kind, expected, "{format:?} c={channels} s={spatial}");
                }
            }
        }
    }

    #[test]
    fn scale8i_selection_table() {
        let isa = SimdIsa::Avx2;
        assert_eq!(
            select_scale8i(TensorFormat::Nchw, 5, 8, isa),
            Scale8iKind::Nchw
        );
        assert_eq!(
            select_scale8i(TensorFormat::Nchw, 5, 7, isa),
            Scale8iKind::Scalar
        );
        assert_eq!(
            select_scale8i(TensorFormat::Nhwc, 3, 8, isa),
            Scale8iKind::Nhwc3
        );
        assert_eq!(
            select_scale8i(TensorFormat::Nhwc, 3, 7, isa),
            Scale8iKind::Scalar
        );
        assert_eq!(
            select_scale8i(TensorFormat::Nhwc, 8, 1, isa),
            Scale8iKind::Nhwc
        );
        assert_eq!(
            select_scale8i(TensorFormat::Nhwc, 7, 100, isa),
            Scale8iKind::Scalar
        );
        for format in TensorFormat::ALL {
            assert_eq!(
                select_scale8i(format, 64, 64, SimdIsa::Scalar),
                Scale8iKind::Scalar
            );
        }
    }

    #[test]
    fn softmax_selection_table() {
        assert_eq!(select_softmax(2, 1), SoftmaxKind::Pair);
        assert_eq!(select_softmax(3, 1), SoftmaxKind::Triple);
        assert_eq!(select_softmax(1, 1), SoftmaxKind::Row);
        assert_eq!(select_softmax(10, 1), SoftmaxKind::Row);
        assert_eq!(select_softmax(2, 4), SoftmaxKind::Strided);
        assert_eq!(select_softmax(3, 2), SoftmaxKind::Strided);
    }

    #[test]
    fn pooling_fast_paths_follow_guards() {
        let isa = SimdIsa::Sse41;
        let f = isa.float_lanes();

        let p = params_2d(
            TensorFormat::Nchw,
            3,
            PoolingAxis::new(8, 2, 2, 0, 0),
            PoolingAxis::new(2 * f, 2, 2, 0, 0),
        );
        assert_eq!(select_pooling_max::<f32>(&p, isa), PoolingMaxKind::Nchw2x2);
        assert_eq!(select_pooling_max::<f32>(&p, SimdIsa::Scalar), PoolingMaxKind::Generic2d);

        let narrow = params_2d(
            TensorFormat::Nchw,
            3,
            PoolingAxis::new(8, 2, 2, 0, 0),
            PoolingAxis::new(2 * f - 2, 2, 2, 0, 0),
        );
        assert_eq!(select_pooling_max::<f32>(&narrow, isa), PoolingMaxKind::Generic2d);

        let same = params_2d(
            TensorFormat::Nchw,
            3,
            PoolingAxis::new(6, 3, 1, 1, 1),
            PoolingAxis::new(f + 1, 3, 1, 1, 1),
        );
        assert_eq!(select_pooling_max::<f32>(&same, isa), PoolingMaxKind::Nchw3x3);
        let same_exact = params_2d(
            TensorFormat::Nchw,
            3,
            PoolingAxis::new(6, 3, 1, 1, 1),
            PoolingAxis::new(f, 3, 1, 1, 1),
        );
        assert_eq!(select_pooling_max::<f32>(&same_exact, isa), PoolingMaxKind::Generic2d);
        let shifted = params_2d(
            TensorFormat::Nchw,
            3,
            PoolingAxis::new(6, 3, 1, 0, 2),
            PoolingAxis::new(f + 1, 3, 1, 0, 2),
        );
        assert_eq!(select_pooling_max::<f32>(&shifted, isa), PoolingMaxKind::Generic2d);

        let s2 = params_2d(
            TensorFormat::Nchw,
            3,
            PoolingAxis::new(9, 3, 2, 0, 0),
            PoolingAxis::new(4 * f, 3, 2, 0, 0),
        );
        assert_eq!(select_pooling_max::<f32>(&s2, isa), PoolingMaxKind::Nchw3x3Stride2);

        let nhwc = params_2d(
            TensorFormat::Nhwc,
            f,
            PoolingAxis::new(5, 3, 2, 1, 1),
            PoolingAxis::new(5, 3, 2, 1, 1),
        );
        assert_eq!(select_pooling_max::<f32>(&nhwc, isa), PoolingMaxKind::NhwcVector);
        let thin = params_2d(
            TensorFormat::Nhwc,
            f - 1,
            PoolingAxis::new(5, 3, 2, 1, 1),
            PoolingAxis::new(5, 3, 2, 1, 1),
        );
        assert_eq!(select_pooling_max::<f32>(&thin, isa), PoolingMaxKind::Generic2d);
        let blocked = params_2d(
            TensorFormat::Nchw4c,
            16,
            PoolingAxis::new(8, 2, 2, 0, 0),
            PoolingAxis::new(64, 2, 2, 0, 0),
        );
        assert_eq!(select_pooling_max::<f32>(&blocked, isa), PoolingMaxKind::Generic2d);
    }

    #[test]
    fn byte_pooling_uses_byte_lanes() {
        let isa = SimdIsa::Sse41;
        let a = isa.byte_lanes();
        let nhwc = |channels: usize| {
            params_2d(
                TensorFormat::Nhwc,
                channels,
                PoolingAxis::new(5, 3, 2, 1, 1),
                PoolingAxis::new(5, 3, 2, 1, 1),
            )
        };
        let four = nhwc(isa.float_lanes());
        assert_eq!(select_pooling_max::<f32>(&four, isa), PoolingMaxKind::NhwcVector);
        assert_eq!(select_pooling_max::<u8>(&four, isa), PoolingMaxKind::Generic2d);
        assert_eq!(select_pooling_max::<u8>(&nhwc(a), isa), PoolingMaxKind::NhwcVector);

        let rows = |width: usize| {
            params_2d(
                TensorFormat::Nchw,
                3,
                PoolingAxis::new(8, 2, 2, 0, 0),
                PoolingAxis::new(width, 2, 2, 0, 0),
            )
        };
        assert_eq!(select_pooling_max::<u8>(&rows(2 * a - 2), isa), PoolingMaxKind::Generic2d);
        assert_eq!(select_pooling_max::<u8>(&rows(2 * a), isa), PoolingMaxKind::Nchw2x2);

        let reduce = PoolingParams {
            channel: PoolingAxis::new(a / 2, 2, 2, 0, 0),
            y: PoolingAxis::identity(3),
            x: PoolingAxis::identity(3),
            format: TensorFormat::Nhwc,
        };
        assert_eq!(select_pooling_max::<f32>(&reduce, isa), PoolingMaxKind::ChannelReduce2);
        assert_eq!(select_pooling_max::<u8>(&reduce, isa), PoolingMaxKind::Generic3d);
    }

    #[test]
    fn channel_reduction_needs_nhwc_and_wide_channels() {
        let isa = SimdIsa::Sse41;
        let f = isa.float_lanes();
        for (k, expected) in [
            (2usize, PoolingMaxKind::ChannelReduce2),
            (4, PoolingMaxKind::ChannelReduce4),
        ] {
            let mut p = PoolingParams {
                channel: PoolingAxis::new(4 * f, k, k, 0, 0),
                y: PoolingAxis::identity(3),
                x: PoolingAxis::identity(3),
                format: TensorFormat::Nhwc,
            };
            assert!(!p.is_2d());
            assert_eq!(select_pooling_max::<f32>(&p, isa), expected);
            assert_eq!(select_pooling_max::<f32>(&p, SimdIsa::Scalar), PoolingMaxKind::Generic3d);
            p.format = TensorFormat::Nchw;
            assert_eq!(select_pooling_max::<f32>(&p, isa), PoolingMaxKind::Generic3d);
        }
        let odd = PoolingParams {
            channel: PoolingAxis::new(4 * f, 3, 3, 0, 0),
            y: PoolingAxis::identity(3),
            x: PoolingAxis::identity(3),
            format: TensorFormat::Nhwc,
        };
        assert_eq!(select_pooling_max::<f32>(&odd, isa), PoolingMaxKind::Generic3d);
        let overlapping = PoolingParams {
            channel: PoolingAxis::new(4 * f, 2, 1, 0, 0),
            y: PoolingAxis::identity(3),
            x: PoolingAxis::identity(3),
            format: TensorFormat::Nhwc,
        };
        assert_eq!(select_pooling_max::<f32>(&overlapping, isa), PoolingMaxKind::Generic3d);
    }

    #[test]
    fn average_pooling_selection() {
        let isa = SimdIsa::Avx2;
        let p = params_2d(
            TensorFormat::Nhwc,
            8,
            PoolingAxis::new(4, 2, 2, 0, 0),
            PoolingAxis::new(4, 2, 2, 0, 0),
        );
        assert_eq!(select_pooling_average(&p, isa), PoolingAverageKind::NhwcVector);
        assert_eq!(
            select_pooling_average(&p, SimdIsa::Scalar),
            PoolingAverageKind::Generic
        );
        let nchw = PoolingParams {
            format: TensorFormat::Nchw,
            ..p
        };
        assert_eq!(select_pooling_average(&nchw, isa), PoolingAverageKind::Generic);
    }
}
