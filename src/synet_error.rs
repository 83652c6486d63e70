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
use crate::tensor::TensorFormat;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynetError {
    UnsupportedFormat(TensorFormat),
    UnsupportedPixelFormat,
    UnsupportedChannels(usize),
    ZeroSizedTensor,
    ShapeOverflow,
    ChannelParamMismatch {
        name: &'static str,
        expected: usize,
        received: usize,
    },
    BufferSizeMismatch {
        name: &'static str,
        expected: usize,
        received: usize,
    },
    PoolingShapeMismatch {
        axis: &'static str,
        expected: usize,
        received: usize,
    },
    InvalidPoolingParams(&'static str),
    UnsupportedTensorType,
    MissingStatistics,
}

impl Display for SynetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SynetError::UnsupportedFormat(format) => {
                f.write_fmt(format_args!("Tensor format {:?} is not supported here", format))
            }
            SynetError::UnsupportedPixelFormat => {
                f.write_str("Pixel format is not supported for this operation")
            }
            SynetError::UnsupportedChannels(channels) => f.write_fmt(format_args!(
                "Channels count {} is not supported for this operation",
                channels
            )),
            SynetError::ZeroSizedTensor => f.write_str("Zero sized tensors are not supported"),
            SynetError::ShapeOverflow => f.write_str("Tensor size overflow pointer capabilities"),
            SynetError::ChannelParamMismatch {
                name,
                expected,
                received,
            } => f.write_fmt(format_args!(
                "Parameter `{}` must have {} values, but it has {}",
                name, expected, received
            )),
            SynetError::BufferSizeMismatch {
                name,
                expected,
                received,
            } => f.write_fmt(format_args!(
                "Buffer `{}` must have size {}, but it was {}",
                name, expected, received
            )),
            SynetError::PoolingShapeMismatch {
                axis,
                expected,
                received,
            } => f.write_fmt(format_args!(
                "Pooling output along {} must be {}, but it was {}",
                axis, expected, received
            )),
            SynetError::InvalidPoolingParams(reason) => {
                f.write_fmt(format_args!("Invalid pooling parameters: {}", reason))
            }
            SynetError::UnsupportedTensorType => {
                f.write_str("Tensor type does not match the configured one")
            }
            SynetError::MissingStatistics => {
                f.write_str("Quantized tensors require per channel statistics")
            }
        }
    }
}

impl Error for SynetError {}

#[inline]
pub(crate) fn check_buffer<V>(
    name: &'static str,
    buffer: &[V],
    expected: usize,
) -> Result<(), SynetError> {
    if buffer.len() != expected {
        return Err(SynetError::BufferSizeMismatch {
            name,
            expected,
            received: buffer.len(),
        });
    }
    Ok(())
}

#[inline]
pub(crate) fn check_channel_param<V>(
    name: &'static str,
    param: &[V],
    channels: usize,
) -> Result<(), SynetError> {
    if param.len() != channels {
        return Err(SynetError::ChannelParamMismatch {
            name,
            expected: channels,
            received: param.len(),
        });
    }
    Ok(())
}

/// Element count of a tensor, rejecting empty and overflowing shapes.
#[inline]
pub(crate) fn tensor_volume(dims: &[usize]) -> Result<usize, SynetError> {
    let mut volume = 1usize;
    for &dim in dims {
        if dim == 0 {
            return Err(SynetError::ZeroSizedTensor);
        }
        volume = volume.checked_mul(dim).ok_or(SynetError::ShapeOverflow)?;
    }
    Ok(volume)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_rejects_zero_and_overflow() {
        assert_eq!(tensor_volume(&[2, 3, 4]), Ok(24));
        assert_eq!(tensor_volume(&[2, 0, 4]), Err(SynetError::ZeroSizedTensor));
        assert_eq!(
            tensor_volume(&[usize::MAX, 2]),
            Err(SynetError::ShapeOverflow)
        );
    }

    #[test]
    fn param_checks_report_names() {
        let err = check_channel_param("scale", &[1f32, 2.], 3).unwrap_err();
        assert!(err.to_string().contains("scale"));
        assert!(check_buffer("dst", &[0u8; 6], 6).is_ok());
        assert_eq!(
            check_buffer("dst", &[0u8; 5], 6),
            Err(SynetError::BufferSizeMismatch {
                name: "dst",
                expected: 6,
                received: 5
            })
        );
    }
}
