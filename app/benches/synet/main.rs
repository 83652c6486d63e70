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
use criterion::{criterion_group, criterion_main, Criterion};
use rand::Rng;
use yuv_synet::{
    synet_convert_32f_to_8u, synet_pooling_average_32f, synet_pooling_max_32f,
    synet_pooling_max_8u, synet_reorder_image, synet_scale_layer_forward, synet_set_input,
    synet_softmax_layer_forward, ChannelStats, PixelFormat, PoolingAxis, PoolingParams,
    Scale8iParams, SynetCompatibility, SynetScale8i, TensorFormat, TensorType,
};

const CHANNELS: usize = 64;
const HEIGHT: usize = 56;
const WIDTH: usize = 56;

fn random_f32(len: usize) -> Vec<f32> {
    let mut rng = rand::rng();
    (0..len).map(|_| rng.random_range(-4f32..4f32)).collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let volume = CHANNELS * HEIGHT * WIDTH;
    let src = random_f32(volume);
    let src8: Vec<u8> = src.iter().map(|&v| ((v + 4.) * 31.) as u8).collect();

    for format in [TensorFormat::Nchw, TensorFormat::Nhwc] {
        let params = PoolingParams::new_2d(
            CHANNELS,
            PoolingAxis::new(HEIGHT, 3, 2, 1, 1),
            PoolingAxis::new(WIDTH, 3, 2, 1, 1),
            format,
        );
        let dst_len = CHANNELS * params.y.dst * params.x.dst;

        c.bench_function(&format!("synet max pooling 3x3/2 f32 {format:?}"), |b| {
            let mut dst = vec![0f32; dst_len];
            b.iter(|| {
                synet_pooling_max_32f(&src, &params, &mut dst).unwrap();
            })
        });

        c.bench_function(&format!("synet max pooling 3x3/2 u8 {format:?}"), |b| {
            let mut dst = vec![0u8; dst_len];
            b.iter(|| {
                synet_pooling_max_8u(&src8, &params, &mut dst).unwrap();
            })
        });

        c.bench_function(&format!("synet average pooling 3x3/2 {format:?}"), |b| {
            let mut dst = vec![0f32; dst_len];
            b.iter(|| {
                synet_pooling_average_32f(&src, &params, true, &mut dst).unwrap();
            })
        });

        let scale = random_f32(CHANNELS);
        let bias = random_f32(CHANNELS);
        c.bench_function(&format!("synet scale layer {format:?}"), |b| {
            let mut dst = vec![0f32; volume];
            b.iter(|| {
                synet_scale_layer_forward(
                    &src,
                    &scale,
                    Some(&bias),
                    CHANNELS,
                    HEIGHT,
                    WIDTH,
                    &mut dst,
                    format,
                    SynetCompatibility::default(),
                )
                .unwrap();
            })
        });

        let mut layer = SynetScale8i::new(Scale8iParams {
            batch: 1,
            channels: CHANNELS,
            spatial: HEIGHT * WIDTH,
            src_type: TensorType::F32,
            dst_type: TensorType::U8,
            format,
            compatibility: SynetCompatibility::default(),
        })
        .unwrap();
        let stats = vec![ChannelStats::new(-8., 8.); CHANNELS];
        layer.set_params(&scale, Some(&bias), &[], &stats).unwrap();
        c.bench_function(&format!("synet scale8i f32 -> u8 {format:?}"), |b| {
            let mut dst = vec![0u8; volume];
            b.iter(|| {
                layer.forward_f32_to_u8(&src, &mut dst).unwrap();
            })
        });

        c.bench_function(&format!("synet convert f32 -> u8 {format:?}"), |b| {
            let mut dst = vec![0u8; volume];
            b.iter(|| {
                synet_convert_32f_to_8u(
                    &src,
                    1,
                    CHANNELS,
                    HEIGHT,
                    WIDTH,
                    format,
                    &scale,
                    &bias,
                    &mut dst,
                    SynetCompatibility::default(),
                )
                .unwrap();
            })
        });
    }

    for (count, inner) in [(2usize, 1usize), (3, 1), (1000, 1), (21, HEIGHT * WIDTH)] {
        let outer = volume / (count * inner);
        let len = outer * count * inner;
        c.bench_function(&format!("synet softmax {count}x{inner}"), |b| {
            let mut dst = vec![0f32; len];
            b.iter(|| {
                synet_softmax_layer_forward(&src[..len], outer, count, inner, &mut dst).unwrap();
            })
        });
    }

    let pixels: Vec<u8> = src8.iter().take(HEIGHT * WIDTH * 3).copied().collect();
    c.bench_function("synet set input BGR -> NCHW", |b| {
        let mut dst = vec![0f32; HEIGHT * WIDTH * 3];
        b.iter(|| {
            synet_set_input(
                &pixels,
                WIDTH,
                HEIGHT,
                WIDTH * 3,
                PixelFormat::Bgr24,
                &[-1.; 3],
                &[1.; 3],
                &mut dst,
                3,
                TensorFormat::Nchw,
            )
            .unwrap();
        })
    });

    c.bench_function("synet reorder NCHW -> NCHW16c", |b| {
        let mut dst = vec![0f32; volume];
        b.iter(|| {
            synet_reorder_image(
                1,
                CHANNELS,
                HEIGHT * WIDTH,
                &src,
                TensorFormat::Nchw,
                &mut dst,
                TensorFormat::Nchw16c,
            )
            .unwrap();
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
