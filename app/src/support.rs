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
use std::fs::File;
use std::io::Write;
use yuv_synet::YuvPlanarImage;

pub(crate) fn save_packed_image(filename: &str, packed: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(filename)?;
    file.write_all(packed)?;
    Ok(())
}

/// Interleaves a 4:2:2 planar image into UYVY.
pub(crate) fn pack_uyvy(planar: &YuvPlanarImage<u8>) -> (Vec<u8>, u32) {
    let width = planar.width as usize;
    let packed_stride = width.div_ceil(2) * 4;
    let mut packed = vec![0u8; packed_stride * planar.height as usize];
    for (y, dst) in packed.chunks_exact_mut(packed_stride).enumerate() {
        let y_row = &planar.y_plane[y * planar.y_stride as usize..];
        let u_row = &planar.u_plane[y * planar.u_stride as usize..];
        let v_row = &planar.v_plane[y * planar.v_stride as usize..];
        for (x, dst) in dst.chunks_exact_mut(4).enumerate() {
            let y0 = y_row[x * 2];
            let y1 = y_row[(x * 2 + 1).min(width - 1)];
            dst[0] = u_row[x];
            dst[1] = y0;
            dst[2] = v_row[x];
            dst[3] = y1;
        }
    }
    (packed, packed_stride as u32)
}

/// Largest per channel difference between two images.
pub(crate) fn max_divergence(a: &[u8], b: &[u8]) -> u8 {
    a.iter()
        .zip(b.iter())
        .map(|(&a, &b)| a.abs_diff(b))
        .max()
        .unwrap_or(0)
}
