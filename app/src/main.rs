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
mod support;

use crate::support::{max_divergence, pack_uyvy, save_packed_image};
use image::{GenericImageView, ImageReader};
use std::time::Instant;
use yuv_synet::{
    rgb_to_yuv420, rgb_to_yuv422, simd_isa, synet_convert_32f_to_8u, synet_pooling_max_32f,
    synet_set_input, synet_softmax_layer_forward, uyvy422_to_rgb, yuv420_to_rgb, PixelFormat,
    PoolingAxis, PoolingParams, SynetCompatibility, TensorFormat, YuvChromaSubsampling,
    YuvPackedImage, YuvPlanarImageMut, YuvStandard,
};

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./assets/bench.jpg".to_string());
    let img = ImageReader::open(&path).unwrap().decode().unwrap();
    let (width, height) = img.dimensions();
    let rgb = img.to_rgb8();
    let src_bytes = rgb.as_raw();
    let rgb_stride = width * 3;

    println!("{path}: {width}x{height}, kernels {:?}", simd_isa());

    let mut rgb_out = vec![0u8; src_bytes.len()];

    for standard in YuvStandard::ALL {
        let mut planar_image =
            YuvPlanarImageMut::<u8>::alloc(width, height, YuvChromaSubsampling::Yuv420);
        let start_time = Instant::now();
        rgb_to_yuv420(&mut planar_image, src_bytes, rgb_stride, standard).unwrap();
        let forward = start_time.elapsed();

        let start_time = Instant::now();
        let fixed = planar_image.to_fixed();
        yuv420_to_rgb(&fixed, &mut rgb_out, rgb_stride, standard).unwrap();
        let inverse = start_time.elapsed();

        println!(
            "{:?}: forward {:?}, inverse {:?}, max divergence {}",
            standard,
            forward,
            inverse,
            max_divergence(src_bytes, &rgb_out)
        );
    }

    image::save_buffer(
        "converted.png",
        &rgb_out,
        width,
        height,
        image::ExtendedColorType::Rgb8,
    )
    .unwrap();

    let mut planar422 = YuvPlanarImageMut::<u8>::alloc(width, height, YuvChromaSubsampling::Yuv422);
    rgb_to_yuv422(&mut planar422, src_bytes, rgb_stride, YuvStandard::Bt709).unwrap();
    let (uyvy, uyvy_stride) = pack_uyvy(&planar422.to_fixed());
    save_packed_image("converted.uyvy", &uyvy).unwrap();

    let start_time = Instant::now();
    let packed = YuvPackedImage {
        yuy: &uyvy,
        yuy_stride: uyvy_stride,
        width,
        height,
    };
    uyvy422_to_rgb(&packed, &mut rgb_out, rgb_stride, YuvStandard::Bt709).unwrap();
    println!(
        "UYVY -> RGB {:?}, max divergence {}",
        start_time.elapsed(),
        max_divergence(src_bytes, &rgb_out)
    );

    // Network front end: normalize, pool 2x2, softmax across channels, quantize.
    let (w, h) = (width as usize, height as usize);
    let mut input = vec![0f32; 3 * w * h];
    let start_time = Instant::now();
    synet_set_input(
        src_bytes,
        w,
        h,
        rgb_stride as usize,
        PixelFormat::Rgb24,
        &[0.; 3],
        &[1.; 3],
        &mut input,
        3,
        TensorFormat::Nchw,
    )
    .unwrap();

    let params = PoolingParams::new_2d(
        3,
        PoolingAxis::new(h, 2, 2, 0, 0),
        PoolingAxis::new(w, 2, 2, 0, 0),
        TensorFormat::Nchw,
    );
    let (ph, pw) = (params.y.dst, params.x.dst);
    let mut pooled = vec![0f32; 3 * ph * pw];
    synet_pooling_max_32f(&input, &params, &mut pooled).unwrap();

    let mut probabilities = vec![0f32; pooled.len()];
    synet_softmax_layer_forward(&pooled, 1, 3, ph * pw, &mut probabilities).unwrap();

    let mut quantized = vec![0u8; probabilities.len()];
    synet_convert_32f_to_8u(
        &probabilities,
        1,
        3,
        ph,
        pw,
        TensorFormat::Nchw,
        &[255.; 3],
        &[0.; 3],
        &mut quantized,
        SynetCompatibility::default(),
    )
    .unwrap();
    println!(
        "Network input {:?}: pooled {}x{}, first quantized {:?}",
        start_time.elapsed(),
        pw,
        ph,
        &quantized[..quantized.len().min(8)]
    );
}
