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
use yuv_synet::synet_softmax_layer_forward;

fuzz_target!(|data: (u8, u8, u8, Vec<i16>)| {
    let (outer, count, inner) = (data.0 as usize % 8, data.1 as usize % 64, data.2 as usize % 16);
    let len = outer * count * inner;
    let values = &data.3;
    let src: Vec<f32> = (0..len)
        .map(|i| values.get(i % values.len().max(1)).copied().unwrap_or(0) as f32 / 64.)
        .collect();
    let mut dst = vec![0f32; len];
    let result = synet_softmax_layer_forward(&src, outer, count, inner, &mut dst);
    assert_eq!(result.is_ok(), len != 0);
    if result.is_ok() {
        for o in 0..outer {
            for i in 0..inner {
                let sum: f32 = (0..count).map(|c| dst[(o * count + c) * inner + i]).sum();
                assert!((sum - 1.).abs() < 1e-3, "{sum}");
            }
        }
    }
});
