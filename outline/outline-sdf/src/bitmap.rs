//! Raster buffers.
//!
//! [`Bitmap`] is a typed, row-major grid of `N`-channel pixels. [`AnyBitmap`]
//! wraps every supported element type and channel count in one tagged enum;
//! typed access goes through [`AnyBitmap::downcast_ref`] and
//! [`AnyBitmap::downcast_mut`], which check the tag and fail instead of
//! reinterpreting memory.

use std::fmt::Debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{SdfError, SdfResult};

/// Element type of a bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ElementType {
    /// 32-bit float channels.
    Float,
    /// 8-bit unsigned channels.
    Byte,
}

/// A type that can be stored in a [`Bitmap`].
pub trait BitmapElement: Copy + Default + PartialEq + Debug + Send + Sync + 'static {
    /// Runtime tag for this element type.
    const ELEMENT_TYPE: ElementType;
}

impl BitmapElement for f32 {
    const ELEMENT_TYPE: ElementType = ElementType::Float;
}

impl BitmapElement for u8 {
    const ELEMENT_TYPE: ElementType = ElementType::Byte;
}

/// A `width × height` grid of pixels with `N` channels each.
///
/// Pixel `(x, y)` is stored at index `y * width + x`. Dimensions are fixed
/// for the lifetime of the bitmap.
///
/// # Example
///
/// ```
/// use outline_sdf::Bitmap;
///
/// let mut bitmap = Bitmap::<f32, 3>::new(4, 2);
/// if let Some(pixel) = bitmap.get_mut(3, 1) {
///     *pixel = [0.25, 0.5, 0.75];
/// }
///
/// assert_eq!(bitmap.get(3, 1), Some(&[0.25, 0.5, 0.75]));
/// assert_eq!(bitmap.get(4, 0), None);
/// assert_eq!(bitmap.as_flat().len(), 4 * 2 * 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))
)]
pub struct Bitmap<T: BitmapElement, const N: usize> {
    width: usize,
    height: usize,
    #[cfg_attr(feature = "serde", serde(with = "serde_pixels"))]
    pixels: Vec<[T; N]>,
}

impl<T: BitmapElement, const N: usize> Bitmap<T, N> {
    /// Create a bitmap filled with the element default (zero).
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![[T::default(); N]; width * height],
        }
    }

    /// Create a bitmap from existing pixels in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::ArgumentOutOfRange`] if `pixels` does not hold
    /// exactly `width * height` entries.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<[T; N]>) -> SdfResult<Self> {
        if pixels.len() != width * height {
            return Err(SdfError::out_of_range(
                "pixels",
                format!("{} pixels for a {width}x{height} bitmap", pixels.len()),
            ));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Channels per pixel.
    #[must_use]
    pub const fn channel_count(&self) -> usize {
        N
    }

    /// Element type tag.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        T::ELEMENT_TYPE
    }

    /// Whether the bitmap has no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Pixel at `(x, y)`, or `None` outside the bitmap.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<&[T; N]> {
        self.index(x, y).map(|i| &self.pixels[i])
    }

    /// Mutable pixel at `(x, y)`, or `None` outside the bitmap.
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut [T; N]> {
        self.index(x, y).map(move |i| &mut self.pixels[i])
    }

    /// Pixel at clamped coordinates. The bitmap must not be empty.
    pub(crate) fn clamped(&self, x: isize, y: isize) -> &[T; N] {
        let cx = x.clamp(0, self.width as isize - 1) as usize;
        let cy = y.clamp(0, self.height as isize - 1) as usize;
        &self.pixels[cy * self.width + cx]
    }

    /// All pixels in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &[[T; N]] {
        &self.pixels
    }

    /// All pixels in row-major order, mutably.
    pub fn pixels_mut(&mut self) -> &mut [[T; N]] {
        &mut self.pixels
    }

    /// Channel values in row-major, channel-interleaved order.
    #[must_use]
    pub fn as_flat(&self) -> &[T] {
        self.pixels.as_flattened()
    }

    /// Channel values in row-major, channel-interleaved order, mutably.
    pub fn as_flat_mut(&mut self) -> &mut [T] {
        self.pixels.as_flattened_mut()
    }

    /// One row of pixels.
    #[must_use]
    pub fn row(&self, y: usize) -> Option<&[[T; N]]> {
        (y < self.height).then(|| &self.pixels[y * self.width..(y + 1) * self.width])
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[[T; N]]> {
        self.pixels.chunks_exact(self.width.max(1))
    }

    /// Iterate over rows, mutably.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [[T; N]]> {
        self.pixels.chunks_exact_mut(self.width.max(1))
    }

    /// Set every pixel to `value`.
    pub fn fill(&mut self, value: [T; N]) {
        self.pixels.fill(value);
    }
}

/// Quantize a normalized value the way an 8-bit image stores it.
#[must_use]
pub fn float_to_byte(value: f32) -> u8 {
    let scaled = 256.0 * value;
    if (0.0..=255.0).contains(&scaled) {
        scaled as u8
    } else if scaled > 0.0 {
        255
    } else {
        0
    }
}

impl<const N: usize> Bitmap<f32, N> {
    /// Convert normalized values to bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Bitmap<u8, N> {
        Bitmap {
            width: self.width,
            height: self.height,
            pixels: self
                .pixels
                .iter()
                .map(|pixel| pixel.map(float_to_byte))
                .collect(),
        }
    }

    /// Round every value through 8-bit storage and back.
    pub fn simulate_8bit(&mut self) {
        for value in self.as_flat_mut() {
            *value = f32::from(float_to_byte(*value)) / 255.0;
        }
    }

    /// Add `shift` to every channel value.
    pub fn shift(&mut self, shift: f32) {
        for value in self.as_flat_mut() {
            *value += shift;
        }
    }

    /// Bilinearly interpolated pixel at `position`, in pixel units with
    /// pixel centers at half-integers. Positions outside the bitmap clamp to
    /// the nearest edge pixel.
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> [f32; N] {
        if self.is_empty() {
            return [0.0; N];
        }
        let px = x - 0.5;
        let py = y - 0.5;
        let l = px.floor();
        let b = py.floor();
        let lr = (px - l) as f32;
        let bt = (py - b) as f32;
        let (l, b) = (l as isize, b as isize);
        let lb = self.clamped(l, b);
        let rb = self.clamped(l + 1, b);
        let lt = self.clamped(l, b + 1);
        let rt = self.clamped(l + 1, b + 1);
        std::array::from_fn(|i| {
            let bottom = lb[i] + (rb[i] - lb[i]) * lr;
            let top = lt[i] + (rt[i] - lt[i]) * lr;
            bottom + (top - bottom) * bt
        })
    }
}

#[cfg(feature = "serde")]
mod serde_pixels {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T: Serialize, S: Serializer, const N: usize>(
        pixels: &[[T; N]],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        pixels.as_flattened().serialize(serializer)
    }

    pub fn deserialize<'de, T, D, const N: usize>(deserializer: D) -> Result<Vec<[T; N]>, D::Error>
    where
        T: Deserialize<'de> + Copy + Default,
        D: Deserializer<'de>,
    {
        let flat = Vec::<T>::deserialize(deserializer)?;
        if N == 0 || flat.len() % N != 0 {
            return Err(serde::de::Error::custom("pixel data is not a whole number of pixels"));
        }
        Ok(flat
            .chunks_exact(N)
            .map(|chunk| std::array::from_fn(|i| chunk[i]))
            .collect())
    }
}

/// A bitmap of any supported element type and channel count.
///
/// # Example
///
/// ```
/// use outline_sdf::{AnyBitmap, Bitmap, SdfError};
///
/// let mut any = AnyBitmap::new_float(8, 8, 3).unwrap();
/// assert_eq!(any.channel_count(), 3);
///
/// // Typed access checks the tag.
/// assert!(any.downcast_mut::<Bitmap<f32, 3>>().is_ok());
/// assert!(matches!(
///     any.downcast_ref::<Bitmap<f32, 1>>(),
///     Err(SdfError::MismatchedChannelCount { expected: 1, actual: 3 })
/// ));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AnyBitmap {
    /// One float channel.
    Float1(Bitmap<f32, 1>),
    /// Two float channels.
    Float2(Bitmap<f32, 2>),
    /// Three float channels.
    Float3(Bitmap<f32, 3>),
    /// Four float channels.
    Float4(Bitmap<f32, 4>),
    /// One byte channel.
    Byte1(Bitmap<u8, 1>),
    /// Two byte channels.
    Byte2(Bitmap<u8, 2>),
    /// Three byte channels.
    Byte3(Bitmap<u8, 3>),
    /// Four byte channels.
    Byte4(Bitmap<u8, 4>),
}

/// Borrowed channel data of an [`AnyBitmap`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PixelData<'a> {
    /// Float channel values.
    Float(&'a [f32]),
    /// Byte channel values.
    Byte(&'a [u8]),
}

/// Run `$body` with `$b` bound to the typed float bitmap inside an
/// [`AnyBitmap`], or return a element-type mismatch for byte bitmaps.
macro_rules! with_float_bitmap {
    ($value:expr, |$b:ident| $body:expr) => {
        match $value {
            $crate::bitmap::AnyBitmap::Float1($b) => Ok($body),
            $crate::bitmap::AnyBitmap::Float2($b) => Ok($body),
            $crate::bitmap::AnyBitmap::Float3($b) => Ok($body),
            $crate::bitmap::AnyBitmap::Float4($b) => Ok($body),
            other => Err($crate::error::SdfError::MismatchedElementType {
                expected: $crate::bitmap::ElementType::Float,
                actual: other.element_type(),
            }),
        }
    };
}

macro_rules! with_any_bitmap {
    ($value:expr, |$b:ident| $body:expr) => {
        match $value {
            AnyBitmap::Float1($b) => $body,
            AnyBitmap::Float2($b) => $body,
            AnyBitmap::Float3($b) => $body,
            AnyBitmap::Float4($b) => $body,
            AnyBitmap::Byte1($b) => $body,
            AnyBitmap::Byte2($b) => $body,
            AnyBitmap::Byte3($b) => $body,
            AnyBitmap::Byte4($b) => $body,
        }
    };
}

impl AnyBitmap {
    /// Create a zeroed float bitmap with `channels` channels.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::ArgumentOutOfRange`] unless `channels` is 1 to 4.
    pub fn new_float(width: usize, height: usize, channels: usize) -> SdfResult<Self> {
        Ok(match channels {
            1 => Self::Float1(Bitmap::new(width, height)),
            2 => Self::Float2(Bitmap::new(width, height)),
            3 => Self::Float3(Bitmap::new(width, height)),
            4 => Self::Float4(Bitmap::new(width, height)),
            _ => {
                return Err(SdfError::out_of_range(
                    "channels",
                    format!("{channels} channels requested, supported are 1 to 4"),
                ));
            }
        })
    }

    /// Create a zeroed byte bitmap with `channels` channels.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::ArgumentOutOfRange`] unless `channels` is 1 to 4.
    pub fn new_byte(width: usize, height: usize, channels: usize) -> SdfResult<Self> {
        Ok(match channels {
            1 => Self::Byte1(Bitmap::new(width, height)),
            2 => Self::Byte2(Bitmap::new(width, height)),
            3 => Self::Byte3(Bitmap::new(width, height)),
            4 => Self::Byte4(Bitmap::new(width, height)),
            _ => {
                return Err(SdfError::out_of_range(
                    "channels",
                    format!("{channels} channels requested, supported are 1 to 4"),
                ));
            }
        })
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> usize {
        with_any_bitmap!(self, |b| b.width())
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> usize {
        with_any_bitmap!(self, |b| b.height())
    }

    /// Channels per pixel.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        with_any_bitmap!(self, |b| b.channel_count())
    }

    /// Element type tag.
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        with_any_bitmap!(self, |b| b.element_type())
    }

    /// Borrow the channel data.
    #[must_use]
    pub fn pixel_data(&self) -> PixelData<'_> {
        match self {
            Self::Float1(b) => PixelData::Float(b.as_flat()),
            Self::Float2(b) => PixelData::Float(b.as_flat()),
            Self::Float3(b) => PixelData::Float(b.as_flat()),
            Self::Float4(b) => PixelData::Float(b.as_flat()),
            Self::Byte1(b) => PixelData::Byte(b.as_flat()),
            Self::Byte2(b) => PixelData::Byte(b.as_flat()),
            Self::Byte3(b) => PixelData::Byte(b.as_flat()),
            Self::Byte4(b) => PixelData::Byte(b.as_flat()),
        }
    }

    /// Float channel data.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::MismatchedElementType`] for byte bitmaps.
    pub fn float_data(&self) -> SdfResult<&[f32]> {
        with_float_bitmap!(self, |b| b.as_flat())
    }

    /// Float channel data, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::MismatchedElementType`] for byte bitmaps.
    pub fn float_data_mut(&mut self) -> SdfResult<&mut [f32]> {
        with_float_bitmap!(self, |b| b.as_flat_mut())
    }

    /// Add `shift` to every value of a float bitmap.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::MismatchedElementType`] for byte bitmaps.
    pub fn shift(&mut self, shift: f32) -> SdfResult<()> {
        with_float_bitmap!(self, |b| b.shift(shift))
    }

    /// Round every value of a float bitmap through 8-bit storage.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::MismatchedElementType`] for byte bitmaps.
    pub fn simulate_8bit(&mut self) -> SdfResult<()> {
        with_float_bitmap!(self, |b| b.simulate_8bit())
    }

    /// Verify the tag before typed access.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::MismatchedElementType`] or
    /// [`SdfError::MismatchedChannelCount`] when the tag differs.
    pub fn check_tag(&self, element_type: ElementType, channels: usize) -> SdfResult<()> {
        if self.element_type() != element_type {
            return Err(SdfError::MismatchedElementType {
                expected: element_type,
                actual: self.element_type(),
            });
        }
        if self.channel_count() != channels {
            return Err(SdfError::channel_mismatch(channels, self.channel_count()));
        }
        Ok(())
    }

    /// Borrow as a typed bitmap after checking the tag.
    ///
    /// # Errors
    ///
    /// Returns a mismatch error if `B` does not match this bitmap's tag.
    pub fn downcast_ref<B: BitmapVariant>(&self) -> SdfResult<&B> {
        self.check_tag(B::ELEMENT_TYPE, B::CHANNELS)?;
        B::from_any(self).ok_or_else(|| SdfError::channel_mismatch(B::CHANNELS, self.channel_count()))
    }

    /// Mutably borrow as a typed bitmap after checking the tag.
    ///
    /// # Errors
    ///
    /// Returns a mismatch error if `B` does not match this bitmap's tag.
    pub fn downcast_mut<B: BitmapVariant>(&mut self) -> SdfResult<&mut B> {
        self.check_tag(B::ELEMENT_TYPE, B::CHANNELS)?;
        let actual = self.channel_count();
        B::from_any_mut(self).ok_or_else(|| SdfError::channel_mismatch(B::CHANNELS, actual))
    }

    /// Quantize a float bitmap into bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::MismatchedElementType`] for byte bitmaps.
    pub fn to_bytes(&self) -> SdfResult<Self> {
        match self {
            Self::Float1(b) => Ok(Self::Byte1(b.to_bytes())),
            Self::Float2(b) => Ok(Self::Byte2(b.to_bytes())),
            Self::Float3(b) => Ok(Self::Byte3(b.to_bytes())),
            Self::Float4(b) => Ok(Self::Byte4(b.to_bytes())),
            other => Err(SdfError::MismatchedElementType {
                expected: ElementType::Float,
                actual: other.element_type(),
            }),
        }
    }
}

/// A concrete bitmap type stored in an [`AnyBitmap`] variant.
pub trait BitmapVariant: Sized {
    /// Element type of the variant.
    const ELEMENT_TYPE: ElementType;
    /// Channel count of the variant.
    const CHANNELS: usize;

    /// Borrow from the enum if the variant matches.
    fn from_any(any: &AnyBitmap) -> Option<&Self>;

    /// Mutably borrow from the enum if the variant matches.
    fn from_any_mut(any: &mut AnyBitmap) -> Option<&mut Self>;

    /// Wrap into the enum.
    fn into_any(self) -> AnyBitmap;
}

macro_rules! bitmap_variant {
    ($variant:ident, $t:ty, $n:literal) => {
        impl BitmapVariant for Bitmap<$t, $n> {
            const ELEMENT_TYPE: ElementType = <$t as BitmapElement>::ELEMENT_TYPE;
            const CHANNELS: usize = $n;

            fn from_any(any: &AnyBitmap) -> Option<&Self> {
                match any {
                    AnyBitmap::$variant(b) => Some(b),
                    _ => None,
                }
            }

            fn from_any_mut(any: &mut AnyBitmap) -> Option<&mut Self> {
                match any {
                    AnyBitmap::$variant(b) => Some(b),
                    _ => None,
                }
            }

            fn into_any(self) -> AnyBitmap {
                AnyBitmap::$variant(self)
            }
        }

        impl From<Bitmap<$t, $n>> for AnyBitmap {
            fn from(bitmap: Bitmap<$t, $n>) -> Self {
                bitmap.into_any()
            }
        }
    };
}

bitmap_variant!(Float1, f32, 1);
bitmap_variant!(Float2, f32, 2);
bitmap_variant!(Float3, f32, 3);
bitmap_variant!(Float4, f32, 4);
bitmap_variant!(Byte1, u8, 1);
bitmap_variant!(Byte2, u8, 2);
bitmap_variant!(Byte3, u8, 3);
bitmap_variant!(Byte4, u8, 4);
