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
    yuv420_to_bgr, yuv420_to_rgba, yuv422_to_bgr, yuv422_to_rgba, yuv444_to_bgr, yuv444_to_rgba,
    yuva420_to_bgra, YuvChromaSubsampling, YuvPlanarImageMut, YuvPlanarImageWithAlpha,
    YuvStandard,
};

fuzz_target!(|data: (u8, u8, u8, u8, u8, u8)| {
    let standard = YuvStandard::ALL[data.5 as usize % YuvStandard::ALL.len()];
    for subsampling in [
        YuvChromaSubsampling::Yuv420,
        YuvChromaSubsampling::Yuv422,
        YuvChromaSubsampling::Yuv444,
    ] {
        fuzz_yuv(data.0, data.1, data.2, data.3, data.4, subsampling, standard);
    }
});

fn is_valid(width: u32, height: u32, subsampling: YuvChromaSubsampling) -> bool {
    let even_width = width % 2 == 0;
    width != 0
        && height != 0
        && match subsampling {
            YuvChromaSubsampling::Yuv420 => even_width && height % 2 == 0,
            YuvChromaSubsampling::Yuv422 => even_width,
            YuvChromaSubsampling::Yuv444 => true,
        }
}

fn fuzz_yuv(
    i_width: u8,
    i_height: u8,
    y_value: u8,
    u_value: u8,
    v_value: u8,
    subsampling: YuvChromaSubsampling,
    standard: YuvStandard,
) {
    let (width, height) = (i_width as u32, i_height as u32);
    let mut planar_image = YuvPlanarImageMut::<u8>::alloc(width, height, subsampling);
    planar_image.y_plane.borrow_mut().fill(y_value);
    planar_image.u_plane.borrow_mut().fill(u_value);
    planar_image.v_plane.borrow_mut().fill(v_value);
    let fixed = planar_image.to_fixed();

    let mut bgr = vec![0u8; width as usize * height as usize * 3];
    let mut rgba = vec![0u8; width as usize * height as usize * 4];

    let (to_bgr, to_rgba) = match subsampling {
        YuvChromaSubsampling::Yuv420 => (
            yuv420_to_bgr(&fixed, &mut bgr, width * 3, standard),
            yuv420_to_rgba(&fixed, &mut rgba, width * 4, standard),
        ),
        YuvChromaSubsampling::Yuv422 => (
            yuv422_to_bgr(&fixed, &mut bgr, width * 3, standard),
            yuv422_to_rgba(&fixed, &mut rgba, width * 4, standard),
        ),
        YuvChromaSubsampling::Yuv444 => (
            yuv444_to_bgr(&fixed, &mut bgr, width * 3, standard),
            yuv444_to_rgba(&fixed, &mut rgba, width * 4, standard),
        ),
    };
    let valid = is_valid(width, height, subsampling);
    assert_eq!(to_bgr.is_ok(), valid);
    assert_eq!(to_rgba.is_ok(), valid);
    if valid {
        // Uniform planes decode to a uniform image.
        assert!(bgr.chunks_exact(3).all(|px| px == &bgr[..3]));
        assert!(rgba.chunks_exact(4).all(|px| px[3] == 255));
    }

    if subsampling == YuvChromaSubsampling::Yuv420 {
        let a_plane = vec![y_value; width as usize * height as usize];
        let with_alpha = YuvPlanarImageWithAlpha {
            y_plane: fixed.y_plane,
            y_stride: fixed.y_stride,
            u_plane: fixed.u_plane,
            u_stride: fixed.u_stride,
            v_plane: fixed.v_plane,
            v_stride: fixed.v_stride,
            a_plane: &a_plane,
            a_stride: width,
            width,
            height,
        };
        let mut bgra = vec![0u8; width as usize * height as usize * 4];
        let result = yuva420_to_bgra(&with_alpha, &mut bgra, width * 4, standard);
        assert_eq!(result.is_ok(), valid);
        if valid {
            assert!(bgra.chunks_exact(4).all(|px| px[3] == y_value));
        }
    }
}
