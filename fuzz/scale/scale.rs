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
    synet_convert_32f_to_8u, synet_convert_8u_to_32f, synet_scale_layer_forward, ChannelStats,
    FmaMode, QuantizationMode, Scale8iParams, SynetCompatibility, SynetScale8i, TensorFormat,
    TensorType,
};

#[derive(Arbitrary, Debug)]
struct ScaleInput {
    channels: u8,
    height: u8,
    width: u8,
    format: u8,
    fma: bool,
    narrowed: bool,
    values: Vec<i8>,
}

fuzz_target!(|input: ScaleInput| {
    let channels = input.channels as usize % 40;
    let (height, width) = (input.height as usize % 32, input.width as usize % 32);
    let format = TensorFormat::ALL[input.format as usize % TensorFormat::ALL.len()];
    let compatibility = SynetCompatibility::new(
        if input.fma { FmaMode::Use } else { FmaMode::Avoid },
        if input.narrowed {
            QuantizationMode::Narrowed
        } else {
            QuantizationMode::Precise
        },
    );
    let len = format.buffer_len(1, channels, height * width);
    let value = |i: usize| -> f32 {
        input
            .values
            .get(i % input.values.len().max(1))
            .copied()
            .unwrap_or(1) as f32
            / 16.
    };
    let src: Vec<f32> = (0..len).map(value).collect();
    let scale: Vec<f32> = (0..channels).map(|c| value(c + 1)).collect();
    let bias: Vec<f32> = (0..channels).map(|c| value(c + 2)).collect();

    let mut dst = vec![0f32; len];
    let result = synet_scale_layer_forward(
        &src,
        &scale,
        Some(&bias),
        channels,
        height,
        width,
        &mut dst,
        format,
        compatibility,
    );
    assert_eq!(result.is_ok(), channels != 0 && height != 0 && width != 0);

    let plain = matches!(format, TensorFormat::Nchw | TensorFormat::Nhwc);
    let mut quantized = vec![0u8; len];
    let result = synet_convert_32f_to_8u(
        &src,
        1,
        channels,
        height,
        width,
        format,
        &scale,
        &bias,
        &mut quantized,
        compatibility,
    );
    if result.is_ok() {
        let upper = compatibility.quantization.upper_bound();
        assert!(quantized.iter().all(|&q| q <= upper));
        let mut restored = vec![0f32; len];
        synet_convert_8u_to_32f(
            &quantized, 1, channels, height, width, format, &scale, &bias, &mut restored,
        )
        .unwrap();
    }

    let layer = SynetScale8i::new(Scale8iParams {
        batch: 1,
        channels,
        spatial: height * width,
        src_type: TensorType::F32,
        dst_type: TensorType::U8,
        format,
        compatibility,
    });
    assert_eq!(layer.is_ok(), plain && channels != 0 && height * width != 0);
    if let Ok(mut layer) = layer {
        let stats = vec![ChannelStats::new(-8., 8.); channels];
        if layer.set_params(&scale, Some(&bias), &[], &stats).is_ok() {
            let _ = layer.forward_f32_to_u8(&src, &mut quantized);
        }
    }
});
