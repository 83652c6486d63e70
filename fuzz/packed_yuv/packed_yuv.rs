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

use libfuzzer_sys::fuzz_target;
use yuv_synet::{
    uyvy422_to_bgr, uyvy422_to_rgba, uyvy422_to_yuv420, yuyv422_to_bgra, yuyv422_to_yuv420,
    YuvChromaSubsampling, YuvPackedImage, YuvPlanarImageMut, YuvStandard,
};

fuzz_target!(|data: (u8, u8, u8, u8, u8, u8)| {
    let (width, height) = (data.0 as u32, data.1 as u32);
    let standard = YuvStandard::ALL[data.5 as usize % YuvStandard::ALL.len()];
    let stride = width as usize * 2;
    let yuy: Vec<u8> = (0..stride * height as usize / 4 + 1)
        .flat_map(|_| [data.2, data.3, data.4, data.3])
        .take(stride * height as usize)
        .collect();
    let packed = YuvPackedImage {
        yuy: &yuy,
        yuy_stride: stride as u32,
        width,
        height,
    };
    let valid = width != 0 && height != 0 && width % 2 == 0;

    let mut bgr = vec![0u8; width as usize * height as usize * 3];
    let result = uyvy422_to_bgr(&packed, &mut bgr, width * 3, standard);
    assert_eq!(result.is_ok(), valid);

    let mut rgba = vec![0u8; width as usize * height as usize * 4];
    let result = uyvy422_to_rgba(&packed, &mut rgba, width * 4, data.5, standard);
    assert_eq!(result.is_ok(), valid);
    if valid {
        assert!(rgba.chunks_exact(4).all(|px| px[3] == data.5));
    }

    let result = yuyv422_to_bgra(&packed, &mut rgba, width * 4, 255, standard);
    assert_eq!(result.is_ok(), valid);

    let mut planar_image =
        YuvPlanarImageMut::<u8>::alloc(width, height, YuvChromaSubsampling::Yuv420);
    let valid_420 = valid && height % 2 == 0;
    assert_eq!(
        uyvy422_to_yuv420(&packed, &mut planar_image).is_ok(),
        valid_420
    );
    assert_eq!(
        yuyv422_to_yuv420(&packed, &mut planar_image).is_ok(),
        valid_420
    );
});
