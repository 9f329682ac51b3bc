use core::fmt;

use smart_leds::RGB8;

/// Colour channel of a pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelError {
    /// Channel value outside `0..=255`
    OutOfRange { channel: Channel, value: i64 },
    /// Colour list without exactly three entries
    WrongLength(usize),
    NegativeStart(i64),
}

impl fmt::Display for PixelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelError::OutOfRange { channel, value } => write!(
                f,
                "{} must be between 0 and 255, got {}",
                channel, value
            ),
            PixelError::WrongLength(len) => write!(
                f,
                "RGB list must contain exactly 3 values, got {}",
                len
            ),
            PixelError::NegativeStart(start) => write!(
                f,
                "start index must be non-negative, got {}",
                start
            ),
        }
    }
}

impl std::error::Error for PixelError {}

/// A single RGB pixel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pixel {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Pixel {
    pub const BLACK: Pixel = Pixel::from_rgb(0, 0, 0);

    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Build a pixel from untrusted channel values
    pub fn new(red: i64, green: i64, blue: i64) -> Result<Self, PixelError> {
        Ok(Self {
            red: channel(Channel::Red, red)?,
            green: channel(Channel::Green, green)?,
            blue: channel(Channel::Blue, blue)?,
        })
    }

    /// Build a pixel from an `[r, g, b]` list
    pub fn from_list(values: &[i64]) -> Result<Self, PixelError> {
        match values {
            [red, green, blue] => Self::new(*red, *green, *blue),
            _ => Err(PixelError::WrongLength(values.len())),
        }
    }

    pub const fn to_tuple(self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }
}

fn channel(channel: Channel, value: i64) -> Result<u8, PixelError> {
    u8::try_from(value).map_err(|_| PixelError::OutOfRange { channel, value })
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RGB({}, {}, {})", self.red, self.green, self.blue)
    }
}

impl From<(u8, u8, u8)> for Pixel {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::from_rgb(red, green, blue)
    }
}

impl From<Pixel> for RGB8 {
    fn from(pixel: Pixel) -> Self {
        RGB8 {
            r: pixel.red,
            g: pixel.green,
            b: pixel.blue,
        }
    }
}

impl From<RGB8> for Pixel {
    fn from(color: RGB8) -> Self {
        Self::from_rgb(color.r, color.g, color.b)
    }
}

/// Ordered run of pixels written from `start_index` onwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixelStrip {
    pixels: Vec<Pixel>,
    start_index: usize,
}

impl PixelStrip {
    pub fn new(pixels: Vec<Pixel>, start_index: usize) -> Self {
        Self {
            pixels,
            start_index,
        }
    }

    /// Build a strip from `[r, g, b]` lists. The first invalid entry fails
    /// the whole strip.
    pub fn from_lists<L: AsRef<[i64]>>(lists: &[L], start_index: i64) -> Result<Self, PixelError> {
        let start_index =
            usize::try_from(start_index).map_err(|_| PixelError::NegativeStart(start_index))?;
        let pixels = lists
            .iter()
            .map(|list| Pixel::from_list(list.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(pixels, start_index))
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// One past the last index written by this strip
    pub fn end_index(&self) -> usize {
        self.start_index.saturating_add(self.pixels.len())
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn to_tuples(&self) -> Vec<(u8, u8, u8)> {
        self.pixels.iter().map(|p| p.to_tuple()).collect()
    }
}
