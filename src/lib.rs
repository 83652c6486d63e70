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
//! 8-bit YUV <-> BGR(A) image conversion and a small set of neural network inference
//! kernels (pooling, softmax, per-channel scale, quantized scale, tensor conversion).
//!
//! Every operation validates its inputs before touching an output buffer and picks the
//! widest instruction set available at runtime. All instruction sets produce bit-identical
//! results, see [SimdIsa] and [FORCE_SCALAR_ENV].
#![cfg_attr(
    all(feature = "nightly_avx512", any(target_arch = "x86", target_arch = "x86_64")),
    feature(avx512_target_feature)
)]

#[cfg(all(
    any(target_arch = "x86", target_arch = "x86_64"),
    feature = "nightly_avx512"
))]
mod avx512bw;
#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "avx"))]
mod avx2;
mod bgr_to_yuv;
mod dispatch;
mod images;
mod internals;
mod lanes;
#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
mod neon;
mod numerics;
mod packed_yuv;
#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
mod sse;
mod synet_conversion;
mod synet_error;
mod synet_pooling;
mod synet_scale;
mod synet_scale8i;
mod synet_softmax;
mod tensor;
mod yuv_error;
mod yuv_support;
mod yuv_to_bgr;

pub use dispatch::{simd_isa, SimdIsa, FORCE_SCALAR_ENV};

pub use yuv_error::{MismatchedSize, YuvError};
pub use yuv_support::{
    get_forward_transform, get_inverse_transform, get_yuv_range, CbCrForwardTransform,
    CbCrInverseTransform, ToIntegerTransform, YuvBias, YuvChromaRange, YuvChromaSubsampling,
    YuvRange, YuvStandard,
};

pub use images::{
    BufferStoreMut, YuvPackedImage, YuvPlanarImage, YuvPlanarImageMut, YuvPlanarImageWithAlpha,
};

pub use yuv_to_bgr::yuv420_to_bgr;
pub use yuv_to_bgr::yuv420_to_bgra;
pub use yuv_to_bgr::yuv420_to_rgb;
pub use yuv_to_bgr::yuv420_to_rgba;
pub use yuv_to_bgr::yuv422_to_bgr;
pub use yuv_to_bgr::yuv422_to_bgra;
pub use yuv_to_bgr::yuv422_to_rgb;
pub use yuv_to_bgr::yuv422_to_rgba;
pub use yuv_to_bgr::yuv444_to_bgr;
pub use yuv_to_bgr::yuv444_to_bgra;
pub use yuv_to_bgr::yuv444_to_rgb;
pub use yuv_to_bgr::yuv444_to_rgba;

pub use yuv_to_bgr::yuva420_to_bgra;
pub use yuv_to_bgr::yuva420_to_rgba;
pub use yuv_to_bgr::yuva422_to_bgra;
pub use yuv_to_bgr::yuva422_to_rgba;
pub use yuv_to_bgr::yuva444_to_bgra;
pub use yuv_to_bgr::yuva444_to_rgba;

pub use bgr_to_yuv::bgr_to_yuv420;
pub use bgr_to_yuv::bgr_to_yuv422;
pub use bgr_to_yuv::bgr_to_yuv444;
pub use bgr_to_yuv::bgra_to_yuv420;
pub use bgr_to_yuv::bgra_to_yuv422;
pub use bgr_to_yuv::bgra_to_yuv444;
pub use bgr_to_yuv::rgb_to_yuv420;
pub use bgr_to_yuv::rgb_to_yuv422;
pub use bgr_to_yuv::rgb_to_yuv444;
pub use bgr_to_yuv::rgba_to_yuv420;
pub use bgr_to_yuv::rgba_to_yuv422;
pub use bgr_to_yuv::rgba_to_yuv444;

pub use bgr_to_yuv::bgra_to_yuva420;
pub use bgr_to_yuv::bgra_to_yuva422;
pub use bgr_to_yuv::bgra_to_yuva444;

pub use packed_yuv::uyvy422_to_bgr;
pub use packed_yuv::uyvy422_to_bgra;
pub use packed_yuv::uyvy422_to_rgb;
pub use packed_yuv::uyvy422_to_rgba;
pub use packed_yuv::uyvy422_to_yuv420;
pub use packed_yuv::yuyv422_to_bgr;
pub use packed_yuv::yuyv422_to_bgra;
pub use packed_yuv::yuyv422_to_rgb;
pub use packed_yuv::yuyv422_to_rgba;
pub use packed_yuv::yuyv422_to_yuv420;

pub use synet_conversion::{bgr_to_gray, bgra_to_gray, rgb_to_gray, rgba_to_gray};

pub use synet_error::SynetError;
pub use tensor::{
    FmaMode, PixelFormat, QuantizationMode, SynetCompatibility, TensorFormat, TensorType,
};

pub use synet_pooling::{
    pooling_output_size, synet_pooling_average_32f, synet_pooling_max_32f, synet_pooling_max_8u,
    PoolingAxis, PoolingParams,
};
pub use synet_scale::synet_scale_layer_forward;
pub use synet_scale8i::{ChannelStats, Scale8iParams, SynetScale8i};
pub use synet_softmax::synet_softmax_layer_forward;

pub use synet_conversion::{
    synet_convert_32f_to_8u, synet_convert_8u_to_32f, synet_reorder_image, synet_set_input,
};
