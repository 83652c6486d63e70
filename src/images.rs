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
use crate::yuv_error::{
    check_a8_channel, check_chroma_channel, check_overflow_v2, check_subsampling,
    check_y8_channel,
};
use crate::yuv_support::YuvChromaSubsampling;
use crate::YuvError;
use std::fmt::Debug;

#[derive(Debug)]
pub enum BufferStoreMut<'a, T: Copy + Debug> {
    Borrowed(&'a mut [T]),
    Owned(Vec<T>),
}

impl<T: Copy + Debug> BufferStoreMut<'_, T> {
    pub fn borrow(&self) -> &[T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }

    pub fn borrow_mut(&mut self) -> &mut [T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }
}

#[derive(Debug, Clone)]
/// Non-mutable representation of planar YUV image
pub struct YuvPlanarImage<'a, T>
where
    T: Copy + Debug,
{
    pub y_plane: &'a [T],
    /// Stride here always means Elements per row.
    pub y_stride: u32,
    pub u_plane: &'a [T],
    /// Stride here always means Elements per row.
    pub u_stride: u32,
    pub v_plane: &'a [T],
    /// Stride here always means Elements per row.
    pub v_stride: u32,
    pub width: u32,
    pub height: u32,
}

impl<T> YuvPlanarImage<'_, T>
where
    T: Copy + Debug,
{
    /// Validates plane sizes and the shape against `subsampling`.
    pub fn check_constraints(&self, subsampling: YuvChromaSubsampling) -> Result<(), YuvError> {
        check_subsampling(self.width, self.height, subsampling)?;
        check_y8_channel(self.y_plane, self.y_stride, self.width, self.height)?;
        check_chroma_channel(
            self.u_plane,
            self.u_stride,
            self.width,
            self.height,
            subsampling,
        )?;
        check_chroma_channel(
            self.v_plane,
            self.v_stride,
            self.width,
            self.height,
            subsampling,
        )?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
/// Planar YUV image with a full resolution alpha plane
pub struct YuvPlanarImageWithAlpha<'a, T>
where
    T: Copy + Debug,
{
    pub y_plane: &'a [T],
    /// Stride here always means Elements per row.
    pub y_stride: u32,
    pub u_plane: &'a [T],
    /// Stride here always means Elements per row.
    pub u_stride: u32,
    pub v_plane: &'a [T],
    /// Stride here always means Elements per row.
    pub v_stride: u32,
    pub a_plane: &'a [T],
    /// Stride here always means Elements per row.
    pub a_stride: u32,
    pub width: u32,
    pub height: u32,
}

impl<'a, T> YuvPlanarImageWithAlpha<'a, T>
where
    T: Copy + Debug,
{
    pub fn check_constraints(&self, subsampling: YuvChromaSubsampling) -> Result<(), YuvError> {
        self.color_planes().check_constraints(subsampling)?;
        check_a8_channel(self.a_plane, self.a_stride, self.width, self.height)?;
        Ok(())
    }

    /// Same image without the alpha plane.
    pub fn color_planes(&self) -> YuvPlanarImage<'a, T> {
        YuvPlanarImage {
            y_plane: self.y_plane,
            y_stride: self.y_stride,
            u_plane: self.u_plane,
            u_stride: self.u_stride,
            v_plane: self.v_plane,
            v_stride: self.v_stride,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug)]
/// Mutable planar YUV image
pub struct YuvPlanarImageMut<'a, T>
where
    T: Copy + Debug,
{
    pub y_plane: BufferStoreMut<'a, T>,
    /// Stride here always means Elements per row.
    pub y_stride: u32,
    pub u_plane: BufferStoreMut<'a, T>,
    /// Stride here always means Elements per row.
    pub u_stride: u32,
    pub v_plane: BufferStoreMut<'a, T>,
    /// Stride here always means Elements per row.
    pub v_stride: u32,
    pub width: u32,
    pub height: u32,
}

impl<T> YuvPlanarImageMut<'_, T>
where
    T: Copy + Debug,
{
    pub fn check_constraints(&self, subsampling: YuvChromaSubsampling) -> Result<(), YuvError> {
        check_subsampling(self.width, self.height, subsampling)?;
        check_y8_channel(
            self.y_plane.borrow(),
            self.y_stride,
            self.width,
            self.height,
        )?;
        check_chroma_channel(
            self.u_plane.borrow(),
            self.u_stride,
            self.width,
            self.height,
            subsampling,
        )?;
        check_chroma_channel(
            self.v_plane.borrow(),
            self.v_stride,
            self.width,
            self.height,
            subsampling,
        )?;
        Ok(())
    }
}

impl<'a, T> YuvPlanarImageMut<'a, T>
where
    T: Default + Clone + Copy + Debug,
{
    /// Allocates mutable target planar image with required chroma subsampling
    pub fn alloc(width: u32, height: u32, subsampling: YuvChromaSubsampling) -> Self {
        let chroma_width = subsampling.chroma_width(width as usize);
        let chroma_height = subsampling.chroma_height(height as usize);
        let y_target = vec![T::default(); width as usize * height as usize];
        let u_target = vec![T::default(); chroma_width * chroma_height];
        let v_target = vec![T::default(); chroma_width * chroma_height];
        Self {
            y_plane: BufferStoreMut::Owned(y_target),
            y_stride: width,
            u_plane: BufferStoreMut::Owned(u_target),
            u_stride: chroma_width as u32,
            v_plane: BufferStoreMut::Owned(v_target),
            v_stride: chroma_width as u32,
            width,
            height,
        }
    }

    pub fn to_fixed(&'a self) -> YuvPlanarImage<'a, T> {
        YuvPlanarImage {
            y_plane: self.y_plane.borrow(),
            y_stride: self.y_stride,
            u_plane: self.u_plane.borrow(),
            u_stride: self.u_stride,
            v_plane: self.v_plane.borrow(),
            v_stride: self.v_stride,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Clone)]
/// Packed 4:2:2 image (UYVY or YUYV), four bytes per two pixels
pub struct YuvPackedImage<'a, T>
where
    T: Copy + Debug,
{
    pub yuy: &'a [T],
    /// Stride here always means Elements per row.
    pub yuy_stride: u32,
    pub width: u32,
    pub height: u32,
}

impl<T> YuvPackedImage<'_, T>
where
    T: Copy + Debug,
{
    pub fn check_constraints(&self) -> Result<(), YuvError> {
        check_subsampling(self.width, self.height, YuvChromaSubsampling::Yuv422)?;
        check_overflow_v2(self.yuy_stride as usize, self.height as usize)?;
        let row_elements = self.width as usize * 2;
        if (self.yuy_stride as usize) < row_elements {
            return Err(YuvError::LumaPlaneMinimumSizeMismatch(
                crate::MismatchedSize {
                    expected: row_elements * self.height as usize,
                    received: self.yuy_stride as usize * self.height as usize,
                },
            ));
        }
        if self.yuy_stride as usize * self.height as usize != self.yuy.len() {
            return Err(YuvError::LumaPlaneSizeMismatch(crate::MismatchedSize {
                expected: self.yuy_stride as usize * self.height as usize,
                received: self.yuy.len(),
            }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_produces_valid_420_image() {
        let image = YuvPlanarImageMut::<u8>::alloc(6, 4, YuvChromaSubsampling::Yuv420);
        assert_eq!(image.u_stride, 3);
        assert_eq!(image.u_plane.borrow().len(), 6);
        assert!(image.check_constraints(YuvChromaSubsampling::Yuv420).is_ok());
        assert!(image
            .to_fixed()
            .check_constraints(YuvChromaSubsampling::Yuv420)
            .is_ok());
    }

    #[test]
    fn odd_width_is_rejected_before_plane_checks() {
        let y = vec![0u8; 5 * 2];
        let uv = vec![0u8; 3];
        let image = YuvPlanarImage {
            y_plane: &y,
            y_stride: 5,
            u_plane: &uv,
            u_stride: 3,
            v_plane: &uv,
            v_stride: 3,
            width: 5,
            height: 2,
        };
        assert!(matches!(
            image.check_constraints(YuvChromaSubsampling::Yuv420),
            Err(YuvError::OddWidth { width: 5, .. })
        ));
    }

    #[test]
    fn packed_image_requires_two_bytes_per_pixel() {
        let data = vec![0u8; 8 * 2];
        let image = YuvPackedImage {
            yuy: &data,
            yuy_stride: 8,
            width: 4,
            height: 2,
        };
        assert!(image.check_constraints().is_ok());
        let narrow = YuvPackedImage {
            yuy: &data,
            yuy_stride: 8,
            width: 6,
            height: 2,
        };
        assert!(narrow.check_constraints().is_err());
    }
}
