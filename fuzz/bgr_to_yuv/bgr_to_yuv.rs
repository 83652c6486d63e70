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
    bgr_to_gray, bgr_to_yuv420, bgr_to_yuv422, bgr_to_yuv444, bgra_to_yuva420, rgba_to_yuv420,
    rgba_to_yuv422, rgba_to_yuv444, YuvChromaSubsampling, YuvPlanarImageMut, YuvStandard,
};

fuzz_target!(|data: (u8, u8, u8, u8, u8, u8)| {
    let standard = YuvStandard::ALL[data.5 as usize % YuvStandard::ALL.len()];
    let (width, height) = (data.0 as u32, data.1 as u32);
    let bgr: Vec<u8> = (0..width as usize * height as usize)
        .flat_map(|_| [data.2, data.3, data.4])
        .collect();
    let rgba: Vec<u8> = (0..width as usize * height as usize)
        .flat_map(|_| [data.4, data.3, data.2, data.5])
        .collect();

    for subsampling in [
        YuvChromaSubsampling::Yuv420,
        YuvChromaSubsampling::Yuv422,
        YuvChromaSubsampling::Yuv444,
    ] {
        let mut planar_image = YuvPlanarImageMut::<u8>::alloc(width, height, subsampling);
        let (from_bgr, from_rgba) = match subsampling {
            YuvChromaSubsampling::Yuv420 => (
                bgr_to_yuv420(&mut planar_image, &bgr, width * 3, standard),
                rgba_to_yuv420(&mut planar_image, &rgba, width * 4, standard),
            ),
            YuvChromaSubsampling::Yuv422 => (
                bgr_to_yuv422(&mut planar_image, &bgr, width * 3, standard),
                rgba_to_yuv422(&mut planar_image, &rgba, width * 4, standard),
            ),
            YuvChromaSubsampling::Yuv444 => (
                bgr_to_yuv444(&mut planar_image, &bgr, width * 3, standard),
                rgba_to_yuv444(&mut planar_image, &rgba, width * 4, standard),
            ),
        };
        assert_eq!(from_bgr.is_ok(), from_rgba.is_ok());
        if from_bgr.is_ok() {
            // Same colour through both layouts.
            let y = planar_image.y_plane.borrow();
            assert!(y.iter().all(|&v| v == y[0]));
            let u = planar_image.u_plane.borrow();
            assert!(u.iter().all(|&v| v == u[0]));
        }
    }

    let mut planar_image =
        YuvPlanarImageMut::<u8>::alloc(width, height, YuvChromaSubsampling::Yuv420);
    let mut a_plane = vec![0u8; width as usize * height as usize];
    if bgra_to_yuva420(&mut planar_image, &mut a_plane, width, &rgba, width * 4, standard).is_ok() {
        assert!(a_plane.iter().all(|&a| a == data.5));
    }

    let mut gray = vec![0u8; width as usize * height as usize];
    let result = bgr_to_gray(&bgr, width * 3, width, height, &mut gray, width);
    assert_eq!(result.is_ok(), width != 0 && height != 0);
});
