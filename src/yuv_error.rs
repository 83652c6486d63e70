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
use crate::yuv_support::YuvChromaSubsampling;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct MismatchedSize {
    pub expected: usize,
    pub received: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YuvError {
    DestinationSizeMismatch(MismatchedSize),
    MinimumDestinationSizeMismatch(MismatchedSize),
    PointerOverflow,
    ZeroBaseSize,
    LumaPlaneSizeMismatch(MismatchedSize),
    LumaPlaneMinimumSizeMismatch(MismatchedSize),
    ChromaPlaneSizeMismatch(MismatchedSize),
    ChromaPlaneMinimumSizeMismatch(MismatchedSize),
    AlphaPlaneSizeMismatch(MismatchedSize),
    OddWidth {
        width: u32,
        subsampling: YuvChromaSubsampling,
    },
    InvalidHeight {
        height: u32,
        subsampling: YuvChromaSubsampling,
    },
    ImagesSizesNotMatch,
}

impl Display for YuvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            YuvError::LumaPlaneSizeMismatch(size) => f.write_fmt(format_args!(
                "Luma plane have invalid size, it must be {}, but it was {}",
                size.expected, size.received
            )),
            YuvError::LumaPlaneMinimumSizeMismatch(size) => f.write_fmt(format_args!(
                "Luma plane have invalid size, it must be at least {}, but it was {}",
                size.expected, size.received
            )),
            YuvError::ChromaPlaneSizeMismatch(size) => f.write_fmt(format_args!(
                "Chroma plane have invalid size, it must be {}, but it was {}",
                size.expected, size.received
            )),
            YuvError::ChromaPlaneMinimumSizeMismatch(size) => f.write_fmt(format_args!(
                "Chroma plane have invalid size, it must be at least {}, but it was {}",
                size.expected, size.received
            )),
            YuvError::AlphaPlaneSizeMismatch(size) => f.write_fmt(format_args!(
                "Alpha plane have invalid size, it must be {}, but it was {}",
                size.expected, size.received
            )),
            YuvError::PointerOverflow => f.write_str("Image size overflow pointer capabilities"),
            YuvError::ZeroBaseSize => f.write_str("Zero sized images is not supported"),
            YuvError::DestinationSizeMismatch(size) => f.write_fmt(format_args!(
                "Destination size mismatch: expected={}, received={}",
                size.expected, size.received
            )),
            YuvError::MinimumDestinationSizeMismatch(size) => f.write_fmt(format_args!(
                "Destination must have size at least {} but it is {}",
                size.expected, size.received
            )),
            YuvError::OddWidth { width, subsampling } => f.write_fmt(format_args!(
                "Width must be even for {:?}, but it was {}",
                subsampling, width
            )),
            YuvError::InvalidHeight {
                height,
                subsampling,
            } => f.write_fmt(format_args!(
                "Height must be even and at least 2 for {:?}, but it was {}",
                subsampling, height
            )),
            YuvError::ImagesSizesNotMatch => {
                f.write_str("Source and destination sizes do not match")
            }
        }
    }
}

impl Error for YuvError {}

#[inline]
pub(crate) fn check_overflow_v2(v0: usize, v1: usize) -> Result<(), YuvError> {
    let (_, overflow) = v0.overflowing_mul(v1);
    if overflow {
        return Err(YuvError::PointerOverflow);
    }
    Ok(())
}

#[inline]
pub(crate) fn check_overflow_v3(v0: usize, v1: usize, v2: usize) -> Result<(), YuvError> {
    let (product0, overflow) = v0.overflowing_mul(v1);
    if overflow {
        return Err(YuvError::PointerOverflow);
    }
    let (_, overflow) = product0.overflowing_mul(v2);
    if overflow {
        return Err(YuvError::PointerOverflow);
    }
    Ok(())
}

/// Rejects image shapes that the chroma layout cannot represent.
#[inline]
pub(crate) fn check_subsampling(
    width: u32,
    height: u32,
    subsampling: YuvChromaSubsampling,
) -> Result<(), YuvError> {
    if width == 0 || height == 0 {
        return Err(YuvError::ZeroBaseSize);
    }
    match subsampling {
        YuvChromaSubsampling::Yuv420 => {
            if width & 1 != 0 {
                return Err(YuvError::OddWidth { width, subsampling });
            }
            if height & 1 != 0 || height < 2 {
                return Err(YuvError::InvalidHeight {
                    height,
                    subsampling,
                });
            }
        }
        YuvChromaSubsampling::Yuv422 => {
            if width & 1 != 0 {
                return Err(YuvError::OddWidth { width, subsampling });
            }
        }
        YuvChromaSubsampling::Yuv444 => {}
    }
    Ok(())
}

/// Packed interleaved buffer, `stride` is elements per row.
#[inline]
pub(crate) fn check_rgba_destination<V>(
    arr: &[V],
    rgba_stride: u32,
    width: u32,
    height: u32,
    channels: usize,
) -> Result<(), YuvError> {
    check_overflow_v3(width as usize, height as usize, channels)?;
    check_overflow_v2(rgba_stride as usize, height as usize)?;
    if (rgba_stride as usize) < width as usize * channels {
        return Err(YuvError::MinimumDestinationSizeMismatch(MismatchedSize {
            expected: width as usize * height as usize * channels,
            received: rgba_stride as usize * height as usize,
        }));
    }
    if arr.len() != rgba_stride as usize * height as usize {
        return Err(YuvError::DestinationSizeMismatch(MismatchedSize {
            expected: rgba_stride as usize * height as usize,
            received: arr.len(),
        }));
    }
    Ok(())
}

#[inline]
pub(crate) fn check_y8_channel<V>(
    data: &[V],
    stride: u32,
    width: u32,
    height: u32,
) -> Result<(), YuvError> {
    check_overflow_v2(stride as usize, height as usize)?;
    check_overflow_v2(width as usize, height as usize)?;
    if (stride as usize) < (width as usize) {
        return Err(YuvError::LumaPlaneMinimumSizeMismatch(MismatchedSize {
            expected: width as usize * height as usize,
            received: stride as usize * height as usize,
        }));
    }
    if stride as usize * height as usize != data.len() {
        return Err(YuvError::LumaPlaneSizeMismatch(MismatchedSize {
            expected: stride as usize * height as usize,
            received: data.len(),
        }));
    }
    Ok(())
}

#[inline]
pub(crate) fn check_a8_channel<V>(
    data: &[V],
    stride: u32,
    width: u32,
    height: u32,
) -> Result<(), YuvError> {
    check_overflow_v2(stride as usize, height as usize)?;
    if (stride as usize) < (width as usize) || stride as usize * height as usize != data.len() {
        return Err(YuvError::AlphaPlaneSizeMismatch(MismatchedSize {
            expected: stride.max(width) as usize * height as usize,
            received: data.len(),
        }));
    }
    Ok(())
}

#[inline]
pub(crate) fn check_chroma_channel<V>(
    data: &[V],
    stride: u32,
    image_width: u32,
    image_height: u32,
    sampling: YuvChromaSubsampling,
) -> Result<(), YuvError> {
    let chroma_min_width = sampling.chroma_width(image_width as usize);
    let chroma_height = sampling.chroma_height(image_height as usize);
    check_overflow_v2(stride as usize, chroma_height)?;
    if (stride as usize) < chroma_min_width {
        return Err(YuvError::ChromaPlaneMinimumSizeMismatch(MismatchedSize {
            expected: chroma_min_width * chroma_height,
            received: stride as usize * chroma_height,
        }));
    }
    if stride as usize * chroma_height != data.len() {
        return Err(YuvError::ChromaPlaneSizeMismatch(MismatchedSize {
            expected: stride as usize * chroma_height,
            received: data.len(),
        }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsampling_rejects_odd_shapes() {
        assert_eq!(
            check_subsampling(3, 2, YuvChromaSubsampling::Yuv420),
            Err(YuvError::OddWidth {
                width: 3,
                subsampling: YuvChromaSubsampling::Yuv420
            })
        );
        assert!(matches!(
            check_subsampling(4, 3, YuvChromaSubsampling::Yuv420),
            Err(YuvError::InvalidHeight { .. })
        ));
        assert!(check_subsampling(4, 3, YuvChromaSubsampling::Yuv422).is_ok());
        assert!(matches!(
            check_subsampling(5, 3, YuvChromaSubsampling::Yuv422),
            Err(YuvError::OddWidth { .. })
        ));
        assert!(check_subsampling(5, 3, YuvChromaSubsampling::Yuv444).is_ok());
        assert_eq!(
            check_subsampling(0, 2, YuvChromaSubsampling::Yuv444),
            Err(YuvError::ZeroBaseSize)
        );
    }

    #[test]
    fn destination_must_match_stride_times_height() {
        let buffer = vec![0u8; 12 * 2];
        assert!(check_rgba_destination(&buffer, 12, 4, 2, 3).is_ok());
        assert!(matches!(
            check_rgba_destination(&buffer, 12, 4, 2, 4),
            Err(YuvError::MinimumDestinationSizeMismatch(_))
        ));
        assert!(matches!(
            check_rgba_destination(&buffer, 12, 4, 3, 3),
            Err(YuvError::DestinationSizeMismatch(_))
        ));
    }

    #[test]
    fn chroma_plane_uses_rounded_up_size() {
        let plane = vec![0u8; 3 * 2];
        assert!(check_chroma_channel(&plane, 3, 6, 4, YuvChromaSubsampling::Yuv420).is_ok());
        assert!(matches!(
            check_chroma_channel(&plane, 2, 6, 4, YuvChromaSubsampling::Yuv420),
            Err(YuvError::ChromaPlaneMinimumSizeMismatch(_))
        ));
        assert!(matches!(
            check_chroma_channel(&plane, 3, 6, 6, YuvChromaSubsampling::Yuv420),
            Err(YuvError::ChromaPlaneSizeMismatch(_))
        ));
    }

    #[test]
    fn errors_render_readable_messages() {
        let message = YuvError::OddWidth {
            width: 7,
            subsampling: YuvChromaSubsampling::Yuv422,
        }
        .to_string();
        assert!(message.contains("Yuv422"));
        assert!(message.contains('7'));
    }
}
