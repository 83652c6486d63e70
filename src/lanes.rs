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
//! Row kernels written once over a compile-time lane count.
//!
//! Every kernel walks its extent in blocks of `LANES` elements and reports how far it got,
//! the caller finishes the remainder with the same per-element function. Instantiated from
//! a `#[target_feature]` context the block loops lower to that instruction set.
use crate::internals::ProcessedOffset;
use crate::numerics::{
    avg2, avg4, bgr_to_gray_value, bgr_to_u, bgr_to_v, bgr_to_y, yuv_to_blue, yuv_to_green,
    yuv_to_red,
};
use crate::tensor::{scale_value, PixelFormat, TensorElement};
use crate::yuv_support::{
    BgrToYuvParams, PackedYuvLayout, YuvChromaSubsampling, YuvSourceChannels, YuvToBgrParams,
};
use num_traits::Bounded;
use std::fmt::Debug;

pub(crate) trait LaneKernel {
    type Output: Default;

    fn run<const LANES: usize>(self) -> Self::Output;
}

/// Values pooling is able to take maximum of, seeded with [Bounded::min_value].
pub(crate) trait PoolValue: Copy + Bounded + Default + Debug {
    fn pool_max(self, other: Self) -> Self;
}

impl PoolValue for f32 {
    #[inline(always)]
    fn pool_max(self, other: Self) -> Self {
        self.max(other)
    }
}

impl PoolValue for u8 {
    #[inline(always)]
    fn pool_max(self, other: Self) -> Self {
        Ord::max(self, other)
    }
}

#[inline(always)]
const fn chroma_shift(sampling: YuvChromaSubsampling) -> usize {
    match sampling {
        YuvChromaSubsampling::Yuv444 => 0,
        YuvChromaSubsampling::Yuv420 | YuvChromaSubsampling::Yuv422 => 1,
    }
}

/// Alpha written by decoders with an alpha channel.
#[derive(Debug, Copy, Clone)]
pub(crate) enum AlphaSource<'a> {
    Constant(u8),
    /// Full resolution row
    Plane(&'a [u8]),
}

impl AlphaSource<'_> {
    #[inline(always)]
    pub(crate) fn get(&self, x: usize) -> u8 {
        match self {
            AlphaSource::Constant(alpha) => *alpha,
            AlphaSource::Plane(a_plane) => a_plane[x],
        }
    }
}

/// One row of planar YUV into interleaved BGR(A)/RGB(A).
pub(crate) struct YuvToBgrRow<'a, const DESTINATION_CHANNELS: u8, const SAMPLING: u8> {
    pub(crate) params: &'a YuvToBgrParams,
    pub(crate) y_plane: &'a [u8],
    pub(crate) u_plane: &'a [u8],
    pub(crate) v_plane: &'a [u8],
    pub(crate) alpha: AlphaSource<'a>,
    pub(crate) bgra: &'a mut [u8],
    pub(crate) width: usize,
}

impl<const DESTINATION_CHANNELS: u8, const SAMPLING: u8> LaneKernel
    for YuvToBgrRow<'_, DESTINATION_CHANNELS, SAMPLING>
{
    type Output = ProcessedOffset;

    #[inline(always)]
    fn run<const LANES: usize>(self) -> ProcessedOffset {
        let dst_chans: YuvSourceChannels = DESTINATION_CHANNELS.into();
        let channels = dst_chans.get_channels_count();
        let shift = chroma_shift(SAMPLING.into());
        let Self {
            params,
            y_plane,
            u_plane,
            v_plane,
            alpha,
            bgra,
            width,
        } = self;

        let mut cx = 0usize;
        let mut ux = 0usize;

        while cx + LANES <= width {
            let y_src = &y_plane[cx..cx + LANES];
            let u_src = &u_plane[ux..ux + (LANES >> shift)];
            let v_src = &v_plane[ux..ux + (LANES >> shift)];

            let mut b = [0u8; LANES];
            let mut g = [0u8; LANES];
            let mut r = [0u8; LANES];
            for (i, &y_value) in y_src.iter().enumerate() {
                let y_value = y_value as i32;
                let u_value = u_src[i >> shift] as i32;
                let v_value = v_src[i >> shift] as i32;
                b[i] = yuv_to_blue(params, y_value, u_value);
                g[i] = yuv_to_green(params, y_value, u_value, v_value);
                r[i] = yuv_to_red(params, y_value, v_value);
            }

            let dst = &mut bgra[cx * channels..(cx + LANES) * channels];
            for (i, px) in dst.chunks_exact_mut(channels).enumerate() {
                px[dst_chans.get_b_channel_offset()] = b[i];
                px[dst_chans.get_g_channel_offset()] = g[i];
                px[dst_chans.get_r_channel_offset()] = r[i];
                if dst_chans.has_alpha() {
                    px[dst_chans.get_a_channel_offset()] = alpha.get(cx + i);
                }
            }

            cx += LANES;
            ux += LANES >> shift;
        }

        ProcessedOffset { cx, ux }
    }
}

/// One row of interleaved BGR(A)/RGB(A) into 4:4:4 or 4:2:2 planes.
pub(crate) struct BgrToYuvRow<'a, const SOURCE_CHANNELS: u8, const SAMPLING: u8> {
    pub(crate) params: &'a BgrToYuvParams,
    pub(crate) bgra: &'a [u8],
    pub(crate) y_plane: &'a mut [u8],
    pub(crate) u_plane: &'a mut [u8],
    pub(crate) v_plane: &'a mut [u8],
    pub(crate) width: usize,
}

impl<const SOURCE_CHANNELS: u8, const SAMPLING: u8> LaneKernel
    for BgrToYuvRow<'_, SOURCE_CHANNELS, SAMPLING>
{
    type Output = ProcessedOffset;

    #[inline(always)]
    fn run<const LANES: usize>(self) -> ProcessedOffset {
        let src_chans: YuvSourceChannels = SOURCE_CHANNELS.into();
        let channels = src_chans.get_channels_count();
        let sampling: YuvChromaSubsampling = SAMPLING.into();
        let Self {
            params,
            bgra,
            y_plane,
            u_plane,
            v_plane,
            width,
        } = self;

        let mut cx = 0usize;
        let mut ux = 0usize;

        while cx + LANES <= width {
            let mut b = [0u8; LANES];
            let mut g = [0u8; LANES];
            let mut r = [0u8; LANES];
            let src = &bgra[cx * channels..(cx + LANES) * channels];
            for (i, px) in src.chunks_exact(channels).enumerate() {
                b[i] = px[src_chans.get_b_channel_offset()];
                g[i] = px[src_chans.get_g_channel_offset()];
                r[i] = px[src_chans.get_r_channel_offset()];
            }

            for (i, dst) in y_plane[cx..cx + LANES].iter_mut().enumerate() {
                *dst = bgr_to_y(params, b[i] as i32, g[i] as i32, r[i] as i32);
            }

            if sampling == YuvChromaSubsampling::Yuv444 {
                let u_dst = &mut u_plane[ux..ux + LANES];
                let v_dst = &mut v_plane[ux..ux + LANES];
                for (i, (u_dst, v_dst)) in u_dst.iter_mut().zip(v_dst.iter_mut()).enumerate() {
                    let (b, g, r) = (b[i] as i32, g[i] as i32, r[i] as i32);
                    *u_dst = bgr_to_u(params, b, g, r);
                    *v_dst = bgr_to_v(params, b, g, r);
                }
                ux += LANES;
            } else {
                let u_dst = &mut u_plane[ux..ux + LANES / 2];
                let v_dst = &mut v_plane[ux..ux + LANES / 2];
                for (i, (u_dst, v_dst)) in u_dst.iter_mut().zip(v_dst.iter_mut()).enumerate() {
                    let b = avg2(b[2 * i], b[2 * i + 1]) as i32;
                    let g = avg2(g[2 * i], g[2 * i + 1]) as i32;
                    let r = avg2(r[2 * i], r[2 * i + 1]) as i32;
                    *u_dst = bgr_to_u(params, b, g, r);
                    *v_dst = bgr_to_v(params, b, g, r);
                }
                ux += LANES / 2;
            }

            cx += LANES;
        }

        ProcessedOffset { cx, ux }
    }
}

/// Two rows of interleaved BGR(A)/RGB(A) into two luma rows and one 4:2:0 chroma row.
pub(crate) struct BgrToYuv420Rows<'a, const SOURCE_CHANNELS: u8> {
    pub(crate) params: &'a BgrToYuvParams,
    pub(crate) bgra0: &'a [u8],
    pub(crate) bgra1: &'a [u8],
    pub(crate) y_plane0: &'a mut [u8],
    pub(crate) y_plane1: &'a mut [u8],
    pub(crate) u_plane: &'a mut [u8],
    pub(crate) v_plane: &'a mut [u8],
    pub(crate) width: usize,
}

#[inline(always)]
fn load_bgr<const LANES: usize>(
    src: &[u8],
    src_chans: YuvSourceChannels,
) -> ([u8; LANES], [u8; LANES], [u8; LANES]) {
    let mut b = [0u8; LANES];
    let mut g = [0u8; LANES];
    let mut r = [0u8; LANES];
    for (i, px) in src
        .chunks_exact(src_chans.get_channels_count())
        .take(LANES)
        .enumerate()
    {
        b[i] = px[src_chans.get_b_channel_offset()];
        g[i] = px[src_chans.get_g_channel_offset()];
        r[i] = px[src_chans.get_r_channel_offset()];
    }
    (b, g, r)
}

impl<const SOURCE_CHANNELS: u8> LaneKernel for BgrToYuv420Rows<'_, SOURCE_CHANNELS> {
    type Output = ProcessedOffset;

    #[inline(always)]
    fn run<const LANES: usize>(self) -> ProcessedOffset {
        let src_chans: YuvSourceChannels = SOURCE_CHANNELS.into();
        let channels = src_chans.get_channels_count();
        let Self {
            params,
            bgra0,
            bgra1,
            y_plane0,
            y_plane1,
            u_plane,
            v_plane,
            width,
        } = self;

        let mut cx = 0usize;
        let mut ux = 0usize;

        while cx + LANES <= width {
            let (b0, g0, r0) =
                load_bgr::<LANES>(&bgra0[cx * channels..(cx + LANES) * channels], src_chans);
            let (b1, g1, r1) =
                load_bgr::<LANES>(&bgra1[cx * channels..(cx + LANES) * channels], src_chans);

            for (i, (y0, y1)) in y_plane0[cx..cx + LANES]
                .iter_mut()
                .zip(y_plane1[cx..cx + LANES].iter_mut())
                .enumerate()
            {
                *y0 = bgr_to_y(params, b0[i] as i32, g0[i] as i32, r0[i] as i32);
                *y1 = bgr_to_y(params, b1[i] as i32, g1[i] as i32, r1[i] as i32);
            }

            let u_dst = &mut u_plane[ux..ux + LANES / 2];
            let v_dst = &mut v_plane[ux..ux + LANES / 2];
            for (i, (u_dst, v_dst)) in u_dst.iter_mut().zip(v_dst.iter_mut()).enumerate() {
                let (l, h) = (2 * i, 2 * i + 1);
                let b = avg4(b0[l], b0[h], b1[l], b1[h]) as i32;
                let g = avg4(g0[l], g0[h], g1[l], g1[h]) as i32;
                let r = avg4(r0[l], r0[h], r1[l], r1[h]) as i32;
                *u_dst = bgr_to_u(params, b, g, r);
                *v_dst = bgr_to_v(params, b, g, r);
            }

            cx += LANES;
            ux += LANES / 2;
        }

        ProcessedOffset { cx, ux }
    }
}

/// One row of packed 4:2:2 (UYVY/YUYV) into interleaved BGR(A)/RGB(A).
pub(crate) struct PackedToBgrRow<'a, const DESTINATION_CHANNELS: u8, const LAYOUT: u8> {
    pub(crate) params: &'a YuvToBgrParams,
    pub(crate) yuy: &'a [u8],
    pub(crate) bgra: &'a mut [u8],
    pub(crate) alpha: u8,
    pub(crate) width: usize,
}

impl<const DESTINATION_CHANNELS: u8, const LAYOUT: u8> LaneKernel
    for PackedToBgrRow<'_, DESTINATION_CHANNELS, LAYOUT>
{
    type Output = ProcessedOffset;

    #[inline(always)]
    fn run<const LANES: usize>(self) -> ProcessedOffset {
        let dst_chans: YuvSourceChannels = DESTINATION_CHANNELS.into();
        let channels = dst_chans.get_channels_count();
        let layout: PackedYuvLayout = LAYOUT.into();
        let Self {
            params,
            yuy,
            bgra,
            alpha,
            width,
        } = self;

        let mut cx = 0usize;

        while cx + LANES <= width {
            let mut y = [0i32; LANES];
            let mut u = [0i32; LANES];
            let mut v = [0i32; LANES];
            for (i, quad) in yuy[cx * 2..(cx + LANES) * 2].chunks_exact(4).enumerate() {
                y[2 * i] = quad[layout.get_first_y_position()] as i32;
                y[2 * i + 1] = quad[layout.get_second_y_position()] as i32;
                u[2 * i] = quad[layout.get_u_position()] as i32;
                u[2 * i + 1] = u[2 * i];
                v[2 * i] = quad[layout.get_v_position()] as i32;
                v[2 * i + 1] = v[2 * i];
            }

            let dst = &mut bgra[cx * channels..(cx + LANES) * channels];
            for (i, px) in dst.chunks_exact_mut(channels).enumerate() {
                px[dst_chans.get_b_channel_offset()] = yuv_to_blue(params, y[i], u[i]);
                px[dst_chans.get_g_channel_offset()] = yuv_to_green(params, y[i], u[i], v[i]);
                px[dst_chans.get_r_channel_offset()] = yuv_to_red(params, y[i], v[i]);
                if dst_chans.has_alpha() {
                    px[dst_chans.get_a_channel_offset()] = alpha;
                }
            }

            cx += LANES;
        }

        ProcessedOffset { cx, ux: cx / 2 }
    }
}

/// Two rows of packed 4:2:2 into two luma rows and one 4:2:0 chroma row.
pub(crate) struct PackedToYuv420Rows<'a, const LAYOUT: u8> {
    pub(crate) yuy0: &'a [u8],
    pub(crate) yuy1: &'a [u8],
    pub(crate) y_plane0: &'a mut [u8],
    pub(crate) y_plane1: &'a mut [u8],
    pub(crate) u_plane: &'a mut [u8],
    pub(crate) v_plane: &'a mut [u8],
    pub(crate) width: usize,
}

impl<const LAYOUT: u8> LaneKernel for PackedToYuv420Rows<'_, LAYOUT> {
    type Output = ProcessedOffset;

    #[inline(always)]
    fn run<const LANES: usize>(self) -> ProcessedOffset {
        let layout: PackedYuvLayout = LAYOUT.into();
        let Self {
            yuy0,
            yuy1,
            y_plane0,
            y_plane1,
            u_plane,
            v_plane,
            width,
        } = self;

        let mut cx = 0usize;
        let mut ux = 0usize;

        while cx + LANES <= width {
            let src0 = yuy0[cx * 2..(cx + LANES) * 2].chunks_exact(4);
            let src1 = yuy1[cx * 2..(cx + LANES) * 2].chunks_exact(4);
            let y_dst0 = y_plane0[cx..cx + LANES].chunks_exact_mut(2);
            let y_dst1 = y_plane1[cx..cx + LANES].chunks_exact_mut(2);
            let u_dst = u_plane[ux..ux + LANES / 2].iter_mut();
            let v_dst = v_plane[ux..ux + LANES / 2].iter_mut();

            for (((((q0, q1), y0), y1), u_dst), v_dst) in
                src0.zip(src1).zip(y_dst0).zip(y_dst1).zip(u_dst).zip(v_dst)
            {
                y0[0] = q0[layout.get_first_y_position()];
                y0[1] = q0[layout.get_second_y_position()];
                y1[0] = q1[layout.get_first_y_position()];
                y1[1] = q1[layout.get_second_y_position()];
                *u_dst = avg2(q0[layout.get_u_position()], q1[layout.get_u_position()]);
                *v_dst = avg2(q0[layout.get_v_position()], q1[layout.get_v_position()]);
            }

            cx += LANES;
            ux += LANES / 2;
        }

        ProcessedOffset { cx, ux }
    }
}

pub(crate) struct BgrToGrayRow<'a, const SOURCE_CHANNELS: u8> {
    pub(crate) bgra: &'a [u8],
    pub(crate) gray: &'a mut [u8],
    pub(crate) width: usize,
}

impl<const SOURCE_CHANNELS: u8> LaneKernel for BgrToGrayRow<'_, SOURCE_CHANNELS> {
    type Output = usize;

    #[inline(always)]
    fn run<const LANES: usize>(self) -> usize {
        let src_chans: YuvSourceChannels = SOURCE_CHANNELS.into();
        let channels = src_chans.get_channels_count();
        let full = self.width / LANES * LANES;
        for (dst, src) in self.gray[..full]
            .chunks_exact_mut(LANES)
            .zip(self.bgra[..full * channels].chunks_exact(LANES * channels))
        {
            let (b, g, r) = load_bgr::<LANES>(src, src_chans);
            for (i, dst) in dst.iter_mut().enumerate() {
                *dst = bgr_to_gray_value(b[i] as i32, g[i] as i32, r[i] as i32);
            }
        }
        full
    }
}

/// Where [SetInputRow] writes normalized values.
pub(crate) enum SetInputTarget<'a> {
    Gray(&'a mut [f32]),
    Planar(&'a mut [f32], &'a mut [f32], &'a mut [f32]),
    Interleaved(&'a mut [f32]),
}

/// One pixel row into one row of a normalized float tensor.
pub(crate) struct SetInputRow<'a, const FORMAT: u8> {
    pub(crate) src: &'a [u8],
    pub(crate) scale: [f32; 3],
    pub(crate) shift: [f32; 3],
    pub(crate) target: SetInputTarget<'a>,
    pub(crate) width: usize,
}

impl<const FORMAT: u8> LaneKernel for SetInputRow<'_, FORMAT> {
    type Output = usize;

    #[inline(always)]
    fn run<const LANES: usize>(self) -> usize {
        let format: PixelFormat = FORMAT.into();
        let step = format.pixel_size();
        let full = self.width / LANES * LANES;
        let src = &self.src[..full * step];
        let (scale, shift) = (self.scale, self.shift);

        match self.target {
            SetInputTarget::Gray(dst) => {
                for (dst, src) in dst[..full]
                    .chunks_exact_mut(LANES)
                    .zip(src.chunks_exact(LANES * step))
                {
                    for (dst, px) in dst.iter_mut().zip(src.chunks_exact(step)) {
                        *dst = scale_value::<u8, f32, false>(
                            format.to_gray(px),
                            scale[0],
                            Some(shift[0]),
                            0.,
                        );
                    }
                }
            }
            SetInputTarget::Planar(dst0, dst1, dst2) => {
                for (((dst0, dst1), dst2), src) in dst0[..full]
                    .chunks_exact_mut(LANES)
                    .zip(dst1[..full].chunks_exact_mut(LANES))
                    .zip(dst2[..full].chunks_exact_mut(LANES))
                    .zip(src.chunks_exact(LANES * step))
                {
                    for (i, px) in src.chunks_exact(step).enumerate() {
                        dst0[i] = scale_value::<u8, f32, false>(
                            format.to_bgr(px, 0),
                            scale[0],
                            Some(shift[0]),
                            0.,
                        );
                        dst1[i] = scale_value::<u8, f32, false>(
                            format.to_bgr(px, 1),
                            scale[1],
                            Some(shift[1]),
                            0.,
                        );
                        dst2[i] = scale_value::<u8, f32, false>(
                            format.to_bgr(px, 2),
                            scale[2],
                            Some(shift[2]),
                            0.,
                        );
                    }
                }
            }
            SetInputTarget::Interleaved(dst) => {
                for (dst, src) in dst[..full * 3]
                    .chunks_exact_mut(LANES * 3)
                    .zip(src.chunks_exact(LANES * step))
                {
                    for (dst, px) in dst.chunks_exact_mut(3).zip(src.chunks_exact(step)) {
                        for (c, dst) in dst.iter_mut().enumerate() {
                            *dst = scale_value::<u8, f32, false>(
                                format.to_bgr(px, c),
                                scale[c],
                                Some(shift[c]),
                                0.,
                            );
                        }
                    }
                }
            }
        }

        full
    }
}

/// `dst = src * scale + bias` with one scale for the whole run (NCHW plane).
pub(crate) struct ScalePlane<'a, S, D, const FMA: bool> {
    pub(crate) src: &'a [S],
    pub(crate) dst: &'a mut [D],
    pub(crate) scale: f32,
    pub(crate) bias: Option<f32>,
    pub(crate) upper: f32,
}

impl<S: TensorElement, D: TensorElement, const FMA: bool> LaneKernel
    for ScalePlane<'_, S, D, FMA>
{
    type Output = usize;

    #[inline(always)]
    fn run<const LANES: usize>(self) -> usize {
        let full = self.src.len().min(self.dst.len()) / LANES * LANES;
        for (dst, src) in self.dst[..full]
            .chunks_exact_mut(LANES)
            .zip(self.src[..full].chunks_exact(LANES))
        {
            for (dst, &src) in dst.iter_mut().zip(src.iter()) {
                *dst = scale_value::<S, D, FMA>(src, self.scale, self.bias, self.upper);
            }
        }
        full
    }
}

/// `dst[c] = src[c] * scale[c] + bias[c]` across one NHWC pixel.
pub(crate) struct ScalePixel<'a, S, D, const FMA: bool> {
    pub(crate) src: &'a [S],
    pub(crate) dst: &'a mut [D],
    pub(crate) scale: &'a [f32],
    pub(crate) bias: Option<&'a [f32]>,
    pub(crate) upper: f32,
}

impl<S: TensorElement, D: TensorElement, const FMA: bool> LaneKernel
    for ScalePixel<'_, S, D, FMA>
{
    type Output = usize;

    #[inline(always)]
    fn run<const LANES: usize>(self) -> usize {
        let full = self.scale.len().min(self.src.len()).min(self.dst.len()) / LANES * LANES;
        for (i, (dst, src)) in self.dst[..full]
            .chunks_exact_mut(LANES)
            .zip(self.src[..full].chunks_exact(LANES))
            .enumerate()
        {
            let scale = &self.scale[i * LANES..(i + 1) * LANES];
            match self.bias {
                Some(bias) => {
                    let bias = &bias[i * LANES..(i + 1) * LANES];
                    for (j, (dst, &src)) in dst.iter_mut().zip(src.iter()).enumerate() {
                        *dst = scale_value::<S, D, FMA>(src, scale[j], Some(bias[j]), self.upper);
                    }
                }
                None => {
                    for (j, (dst, &src)) in dst.iter_mut().zip(src.iter()).enumerate() {
                        *dst = scale_value::<S, D, FMA>(src, scale[j], None, self.upper);
                    }
                }
            }
        }
        full
    }
}

/// Three channel NHWC run: the per-channel pattern repeats every three lanes blocks.
pub(crate) struct ScaleNhwc3<'a, S, D, const FMA: bool> {
    pub(crate) src: &'a [S],
    pub(crate) dst: &'a mut [D],
    pub(crate) scale: [f32; 3],
    pub(crate) bias: Option<[f32; 3]>,
    pub(crate) upper: f32,
}

impl<S: TensorElement, D: TensorElement, const FMA: bool> LaneKernel
    for ScaleNhwc3<'_, S, D, FMA>
{
    type Output = usize;

    #[inline(always)]
    fn run<const LANES: usize>(self) -> usize {
        let mut scale = [[0f32; LANES]; 3];
        let mut bias = [[0f32; LANES]; 3];
        for (k, (scale, bias)) in scale.iter_mut().zip(bias.iter_mut()).enumerate() {
            for (i, (scale, bias)) in scale.iter_mut().zip(bias.iter_mut()).enumerate() {
                let c = (k * LANES + i) % 3;
                *scale = self.scale[c];
                *bias = self.bias.map_or(0., |b| b[c]);
            }
        }
        let has_bias = self.bias.is_some();

        let block = LANES * 3;
        let full = self.src.len().min(self.dst.len()) / block * block;
        for (dst, src) in self.dst[..full]
            .chunks_exact_mut(block)
            .zip(self.src[..full].chunks_exact(block))
        {
            for (k, (dst, src)) in dst
                .chunks_exact_mut(LANES)
                .zip(src.chunks_exact(LANES))
                .enumerate()
            {
                for (i, (dst, &src)) in dst.iter_mut().zip(src.iter()).enumerate() {
                    let bias = if has_bias { Some(bias[k][i]) } else { None };
                    *dst = scale_value::<S, D, FMA>(src, scale[k][i], bias, self.upper);
                }
            }
        }
        full
    }
}

/// `dst = exp(src - max)`
pub(crate) struct SoftmaxExpRow<'a> {
    pub(crate) src: &'a [f32],
    pub(crate) dst: &'a mut [f32],
    pub(crate) max: f32,
}

impl LaneKernel for SoftmaxExpRow<'_> {
    type Output = usize;

    #[inline(always)]
    fn run<const LANES: usize>(self) -> usize {
        let full = self.src.len().min(self.dst.len()) / LANES * LANES;
        for (dst, src) in self.dst[..full]
            .chunks_exact_mut(LANES)
            .zip(self.src[..full].chunks_exact(LANES))
        {
            for (dst, &src) in dst.iter_mut().zip(src.iter()) {
                *dst = (src - self.max).exp();
            }
        }
        full
    }
}

/// `dst *= k`
pub(crate) struct MulRow<'a> {
    pub(crate) dst: &'a mut [f32],
    pub(crate) k: f32,
}

impl LaneKernel for MulRow<'_> {
    type Output = usize;

    #[inline(always)]
    fn run<const LANES: usize>(self) -> usize {
        let full = self.dst.len() / LANES * LANES;
        for dst in self.dst[..full].chunks_exact_mut(LANES) {
            for dst in dst.iter_mut() {
                *dst *= self.k;
            }
        }
        full
    }
}

/// `acc = max(acc, src)`
pub(crate) struct MaxRows<'a, T> {
    pub(crate) acc: &'a mut [T],
    pub(crate) src: &'a [T],
}

impl<T: PoolValue> LaneKernel for MaxRows<'_, T> {
    type Output = usize;

    #[inline(always)]
    fn run<const LANES: usize>(self) -> usize {
        let full = self.acc.len().min(self.src.len()) / LANES * LANES;
        for (acc, src) in self.acc[..full]
            .chunks_exact_mut(LANES)
            .zip(self.src[..full].chunks_exact(LANES))
        {
            for (acc, &src) in acc.iter_mut().zip(src.iter()) {
                *acc = acc.pool_max(src);
            }
        }
        full
    }
}

/// `dst = exp(src - max)` with a per-position maximum.
pub(crate) struct ExpSubRows<'a> {
    pub(crate) src: &'a [f32],
    pub(crate) max: &'a [f32],
    pub(crate) dst: &'a mut [f32],
}

impl LaneKernel for ExpSubRows<'_> {
    type Output = usize;

    #[inline(always)]
    fn run<const LANES: usize>(self) -> usize {
        let full = self.src.len().min(self.max.len()).min(self.dst.len()) / LANES * LANES;
        for ((dst, src), max) in self.dst[..full]
            .chunks_exact_mut(LANES)
            .zip(self.src[..full].chunks_exact(LANES))
            .zip(self.max[..full].chunks_exact(LANES))
        {
            for ((dst, &src), &max) in dst.iter_mut().zip(src.iter()).zip(max.iter()) {
                *dst = (src - max).exp();
            }
        }
        full
    }
}

/// `acc += src`
pub(crate) struct AddRows<'a> {
    pub(crate) acc: &'a mut [f32],
    pub(crate) src: &'a [f32],
}

impl LaneKernel for AddRows<'_> {
    type Output = usize;

    #[inline(always)]
    fn run<const LANES: usize>(self) -> usize {
        let full = self.acc.len().min(self.src.len()) / LANES * LANES;
        for (acc, src) in self.acc[..full]
            .chunks_exact_mut(LANES)
            .zip(self.src[..full].chunks_exact(LANES))
        {
            for (acc, &src) in acc.iter_mut().zip(src.iter()) {
                *acc += src;
            }
        }
        full
    }
}

/// `dst /= den`
pub(crate) struct DivRows<'a> {
    pub(crate) dst: &'a mut [f32],
    pub(crate) den: &'a [f32],
}

impl LaneKernel for DivRows<'_> {
    type Output = usize;

    #[inline(always)]
    fn run<const LANES: usize>(self) -> usize {
        let full = self.dst.len().min(self.den.len()) / LANES * LANES;
        for (dst, den) in self.dst[..full]
            .chunks_exact_mut(LANES)
            .zip(self.den[..full].chunks_exact(LANES))
        {
            for (dst, &den) in dst.iter_mut().zip(den.iter()) {
                *dst /= den;
            }
        }
        full
    }
}

/// Horizontal max window over a row already reduced vertically.
///
/// Handles `dst[first..last]`, where every tap `x * STRIDE - pad + k` lies inside `src`.
pub(crate) struct PoolMaxHorizontal<'a, T, const KERNEL: usize, const STRIDE: usize> {
    pub(crate) src: &'a [T],
    pub(crate) dst: &'a mut [T],
    pub(crate) pad: usize,
    pub(crate) first: usize,
    pub(crate) last: usize,
}

impl<T: PoolValue, const KERNEL: usize, const STRIDE: usize> LaneKernel
    for PoolMaxHorizontal<'_, T, KERNEL, STRIDE>
{
    type Output = usize;

    #[inline(always)]
    fn run<const LANES: usize>(self) -> usize {
        let mut x = self.first;
        while x + LANES <= self.last {
            for (i, dst) in self.dst[x..x + LANES].iter_mut().enumerate() {
                let start = (x + i) * STRIDE - self.pad;
                let mut max = T::min_value();
                for &v in self.src[start..start + KERNEL].iter() {
                    max = max.pool_max(v);
                }
                *dst = max;
            }
            x += LANES;
        }
        x - self.first
    }
}

/// `dst[d] = max(src[d * K..(d + 1) * K])`
pub(crate) struct ChannelReduce<'a, T, const K: usize> {
    pub(crate) src: &'a [T],
    pub(crate) dst: &'a mut [T],
}

impl<T: PoolValue, const K: usize> LaneKernel for ChannelReduce<'_, T, K> {
    type Output = usize;

    #[inline(always)]
    fn run<const LANES: usize>(self) -> usize {
        let full = self.dst.len().min(self.src.len() / K) / LANES * LANES;
        for (dst, src) in self.dst[..full]
            .chunks_exact_mut(LANES)
            .zip(self.src[..full * K].chunks_exact(LANES * K))
        {
            for (dst, group) in dst.iter_mut().zip(src.chunks_exact(K)) {
                let mut max = T::min_value();
                for &v in group.iter() {
                    max = max.pool_max(v);
                }
                *dst = max;
            }
        }
        full
    }
}
