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
use image::{GenericImageView, ImageReader};
use yuv_synet::{
    bgr_to_gray, rgb_to_yuv420, rgb_to_yuv422, rgb_to_yuv444, rgba_to_yuv420, uyvy422_to_rgba,
    uyvy422_to_yuv420, yuv420_to_rgb, yuv420_to_rgba, yuv422_to_rgba, yuv444_to_rgba,
    YuvChromaSubsampling, YuvPackedImage, YuvPlanarImageMut, YuvStandard,
};

pub fn criterion_benchmark(c: &mut Criterion) {
    let img = ImageReader::open("../assets/bench.jpg")
        .unwrap()
        .decode()
        .unwrap();
    let dimensions = img.dimensions();
    let components = 3;
    let stride = dimensions.0 as usize * components;
    let rgb_image = img.to_rgb8();
    let src_bytes = rgb_image.as_raw();
    let rgba_image = img.to_rgba8();

    let mut planar_image =
        YuvPlanarImageMut::<u8>::alloc(dimensions.0, dimensions.1, YuvChromaSubsampling::Yuv420);
    let mut planar_image422 =
        YuvPlanarImageMut::<u8>::alloc(dimensions.0, dimensions.1, YuvChromaSubsampling::Yuv422);
    let mut planar_image444 =
        YuvPlanarImageMut::<u8>::alloc(dimensions.0, dimensions.1, YuvChromaSubsampling::Yuv444);

    rgb_to_yuv420(&mut planar_image, src_bytes, stride as u32, YuvStandard::Bt601).unwrap();
    rgb_to_yuv422(&mut planar_image422, src_bytes, stride as u32, YuvStandard::Bt601).unwrap();
    rgb_to_yuv444(&mut planar_image444, src_bytes, stride as u32, YuvStandard::Bt601).unwrap();

    let fixed_planar = planar_image.to_fixed();
    let fixed_planar422 = planar_image422.to_fixed();
    let fixed_planar444 = planar_image444.to_fixed();

    c.bench_function("yuv-synet RGB -> YUV 4:2:0", |b| {
        let mut test_planar = YuvPlanarImageMut::<u8>::alloc(
            dimensions.0,
            dimensions.1,
            YuvChromaSubsampling::Yuv420,
        );
        b.iter(|| {
            rgb_to_yuv420(&mut test_planar, src_bytes, stride as u32, YuvStandard::Bt601)
                .unwrap();
        })
    });

    c.bench_function("yuv-synet RGBA -> YUV 4:2:0", |b| {
        let mut test_planar = YuvPlanarImageMut::<u8>::alloc(
            dimensions.0,
            dimensions.1,
            YuvChromaSubsampling::Yuv420,
        );
        b.iter(|| {
            rgba_to_yuv420(
                &mut test_planar,
                rgba_image.as_raw(),
                dimensions.0 * 4,
                YuvStandard::Bt709,
            )
            .unwrap();
        })
    });

    c.bench_function("yuv-synet RGB -> YUV 4:4:4", |b| {
        let mut test_planar = YuvPlanarImageMut::<u8>::alloc(
            dimensions.0,
            dimensions.1,
            YuvChromaSubsampling::Yuv444,
        );
        b.iter(|| {
            rgb_to_yuv444(&mut test_planar, src_bytes, stride as u32, YuvStandard::Bt601)
                .unwrap();
        })
    });

    c.bench_function("yuv-synet YUV 4:2:0 -> RGB", |b| {
        let mut rgb_bytes = vec![0u8; dimensions.0 as usize * 3 * dimensions.1 as usize];
        b.iter(|| {
            yuv420_to_rgb(
                &fixed_planar,
                &mut rgb_bytes,
                dimensions.0 * 3,
                YuvStandard::Bt601,
            )
            .unwrap();
        })
    });

    c.bench_function("yuv-synet YUV 4:2:0 -> RGBA", |b| {
        let mut rgb_bytes = vec![0u8; dimensions.0 as usize * 4 * dimensions.1 as usize];
        b.iter(|| {
            yuv420_to_rgba(
                &fixed_planar,
                &mut rgb_bytes,
                dimensions.0 * 4,
                YuvStandard::Bt601,
            )
            .unwrap();
        })
    });

    c.bench_function("yuv-synet YUV 4:2:2 -> RGBA", |b| {
        let mut rgb_bytes = vec![0u8; dimensions.0 as usize * 4 * dimensions.1 as usize];
        b.iter(|| {
            yuv422_to_rgba(
                &fixed_planar422,
                &mut rgb_bytes,
                dimensions.0 * 4,
                YuvStandard::Bt601,
            )
            .unwrap();
        })
    });

    c.bench_function("yuv-synet YUV 4:4:4 -> RGBA", |b| {
        let mut rgb_bytes = vec![0u8; dimensions.0 as usize * 4 * dimensions.1 as usize];
        b.iter(|| {
            yuv444_to_rgba(
                &fixed_planar444,
                &mut rgb_bytes,
                dimensions.0 * 4,
                YuvStandard::Bt601,
            )
            .unwrap();
        })
    });

    let uyvy_stride = dimensions.0 as usize * 2;
    let uyvy: Vec<u8> = (0..uyvy_stride * dimensions.1 as usize)
        .map(|i| (i % 251) as u8)
        .collect();
    let packed = YuvPackedImage {
        yuy: &uyvy,
        yuy_stride: uyvy_stride as u32,
        width: dimensions.0,
        height: dimensions.1,
    };

    c.bench_function("yuv-synet UYVY -> RGBA", |b| {
        let mut rgb_bytes = vec![0u8; dimensions.0 as usize * 4 * dimensions.1 as usize];
        b.iter(|| {
            uyvy422_to_rgba(
                &packed,
                &mut rgb_bytes,
                dimensions.0 * 4,
                255,
                YuvStandard::Bt709,
            )
            .unwrap();
        })
    });

    c.bench_function("yuv-synet UYVY -> YUV 4:2:0", |b| {
        let mut test_planar = YuvPlanarImageMut::<u8>::alloc(
            dimensions.0,
            dimensions.1,
            YuvChromaSubsampling::Yuv420,
        );
        b.iter(|| {
            uyvy422_to_yuv420(&packed, &mut test_planar).unwrap();
        })
    });

    c.bench_function("yuv-synet RGB -> Gray", |b| {
        let mut gray = vec![0u8; dimensions.0 as usize * dimensions.1 as usize];
        b.iter(|| {
            bgr_to_gray(
                src_bytes,
                stride as u32,
                dimensions.0,
                dimensions.1,
                &mut gray,
                dimensions.0,
            )
            .unwrap();
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
