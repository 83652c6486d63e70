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
#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use yuv_synet::{
    pooling_output_size, synet_pooling_average_32f, synet_pooling_max_32f, synet_pooling_max_8u,
    PoolingAxis, PoolingParams, TensorFormat,
};

#[derive(Arbitrary, Debug)]
struct PoolingInput {
    channels: u8,
    height: u8,
    width: u8,
    kernel: (u8, u8),
    stride: (u8, u8),
    pad: (u8, u8),
    nhwc: bool,
    exclude_pad: bool,
    seed: u8,
}

fuzz_target!(|input: PoolingInput| {
    let channels = input.channels as usize % 32;
    let (height, width) = (input.height as usize % 64, input.width as usize % 64);
    let kernel = (input.kernel.0 as usize % 8, input.kernel.1 as usize % 8);
    let stride = (input.stride.0 as usize % 4, input.stride.1 as usize % 4);
    let pad = (input.pad.0 as usize % 4, input.pad.1 as usize % 4);
    let format = if input.nhwc {
        TensorFormat::Nhwc
    } else {
        TensorFormat::Nchw
    };

    let params = PoolingParams::new_2d(
        channels,
        PoolingAxis::new(height, kernel.0, stride.0, pad.0, pad.0),
        PoolingAxis::new(width, kernel.1, stride.1, pad.1, pad.1),
        format,
    );
    let dst_h = pooling_output_size(height, kernel.0, pad.0, pad.0, stride.0);
    let dst_w = pooling_output_size(width, kernel.1, pad.1, pad.1, stride.1);

    let src: Vec<f32> = (0..channels * height * width)
        .map(|i| ((i * 31 + input.seed as usize) % 97) as f32 - 48.)
        .collect();
    let src8: Vec<u8> = src.iter().map(|&v| (v + 48.) as u8).collect();
    let mut dst = vec![0f32; channels * dst_h * dst_w];
    let mut dst8 = vec![0u8; channels * dst_h * dst_w];

    let max = synet_pooling_max_32f(&src, &params, &mut dst);
    let max8 = synet_pooling_max_8u(&src8, &params, &mut dst8);
    assert_eq!(max.is_ok(), max8.is_ok());
    if max.is_ok() {
        for (&v, &q) in dst.iter().zip(dst8.iter()) {
            assert_eq!((v + 48.) as u8, q);
        }
    }

    if synet_pooling_average_32f(&src, &params, input.exclude_pad, &mut dst).is_ok() {
        assert!(dst.iter().all(|v| v.is_finite() && v.abs() <= 48.01));
    }
});
