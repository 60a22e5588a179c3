use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};

//===========================================================================//

// The signature that all PNG files start with.
const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G'];

// Lengths of the ICONDIR header and of each ICONDIRENTRY, in bytes.
const ICONDIR_LEN: u32 = 6;
const ICONDIRENTRY_LEN: u32 = 16;

// The ICONDIR type field for icons (cursors would be 2).
const ICON_RESOURCE_TYPE: u16 = 1;

// Every payload is assumed to be an 8-bit RGBA PNG.
const PNG_BITS_PER_PIXEL: u16 = 32;

/// The smallest icon edge length that can be stored, in pixels.
pub const MIN_SIZE: u32 = 1;

/// The largest icon edge length that can be stored, in pixels.
pub const MAX_SIZE: u32 = 256;

//===========================================================================//

/// A square image of a given edge length, already encoded as a PNG.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SizedImage {
    size: u32,
    data: Vec<u8>,
}

impl SizedImage {
    /// Pairs PNG data with the edge length it was rendered at.  Panics if
    /// `size` is not between [`MIN_SIZE`] and [`MAX_SIZE`] inclusive.
    ///
    /// The data is not inspected; it is up to the caller to make sure that it
    /// really is a `size` x `size` PNG.
    pub fn new(size: u32, data: Vec<u8>) -> SizedImage {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            panic!(
                "Invalid icon size (was {}, but must be between {} and {})",
                size, MIN_SIZE, MAX_SIZE
            );
        }
        SizedImage { size, data }
    }

    /// Returns the edge length of the image, in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns the encoded PNG data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

//===========================================================================//

/// A collection of PNG images; the contents of a single ICO file.
#[derive(Clone, Debug, Default)]
pub struct IconDir {
    entries: Vec<IconDirEntry>,
}

impl IconDir {
    /// Creates a new, empty collection of icons.
    pub fn new() -> IconDir {
        IconDir { entries: Vec::new() }
    }

    /// Creates a collection holding the given images, in the order given.
    pub fn from_images<I>(images: I) -> IconDir
    where
        I: IntoIterator<Item = SizedImage>,
    {
        let mut icondir = IconDir::new();
        for image in images {
            icondir.add_image(image);
        }
        icondir
    }

    /// Returns the entries in this collection.
    pub fn entries(&self) -> &[IconDirEntry] {
        &self.entries
    }

    /// Appends an image to the collection.  No sorting or deduplication is
    /// done; entries are written in the order they were added.
    pub fn add_image(&mut self, image: SizedImage) {
        self.entries.push(IconDirEntry::from_image(image));
    }

    /// Computes the `(offset, length)` of each entry's payload within the
    /// encoded file.  Returns an error if there are too many entries, or if
    /// the payloads don't fit in a 32-bit offset.
    pub fn layout(&self) -> io::Result<Vec<(u32, u32)>> {
        if self.entries.len() > (u16::MAX as usize) {
            invalid_input!(
                "Too many entries in IconDir (was {}, but max is {})",
                self.entries.len(),
                u16::MAX
            );
        }
        let mut data_offset =
            ICONDIR_LEN + ICONDIRENTRY_LEN * (self.entries.len() as u32);
        let mut spans = Vec::with_capacity(self.entries.len());
        for (index, entry) in self.entries.iter().enumerate() {
            let data_size = match u32::try_from(entry.data.len()) {
                Ok(data_size) => data_size,
                Err(_) => invalid_input!(
                    "Image data for entry {} is too large ({} bytes)",
                    index,
                    entry.data.len()
                ),
            };
            spans.push((data_offset, data_size));
            data_offset = match data_offset.checked_add(data_size) {
                Some(next_offset) => next_offset,
                None => invalid_input!(
                    "Image data does not fit in an ICO file \
                     (overflowed at entry {})",
                    index
                ),
            };
        }
        Ok(spans)
    }

    /// Returns the total length of the encoded file, in bytes.
    pub fn encoded_len(&self) -> io::Result<usize> {
        let layout = self.layout()?;
        let header_len = (ICONDIR_LEN
            + ICONDIRENTRY_LEN * (self.entries.len() as u32))
            as usize;
        Ok(layout
            .last()
            .map(|&(offset, size)| offset as usize + size as usize)
            .unwrap_or(header_len))
    }

    /// Writes an ICO file to the given writer.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let spans = self.layout()?;
        writer.write_u16::<LittleEndian>(0)?; // reserved
        writer.write_u16::<LittleEndian>(ICON_RESOURCE_TYPE)?;
        writer.write_u16::<LittleEndian>(self.entries.len() as u16)?;
        for (entry, &(data_offset, data_size)) in
            self.entries.iter().zip(spans.iter())
        {
            writer.write_u8(entry.width_byte())?;
            writer.write_u8(entry.height_byte())?;
            writer.write_u8(entry.num_colors)?;
            writer.write_u8(0)?; // reserved
            writer.write_u16::<LittleEndian>(entry.color_planes)?;
            writer.write_u16::<LittleEndian>(entry.bits_per_pixel)?;
            writer.write_u32::<LittleEndian>(data_size)?;
            writer.write_u32::<LittleEndian>(data_offset)?;
        }
        for entry in self.entries.iter() {
            writer.write_all(&entry.data)?;
        }
        Ok(())
    }

    /// Encodes the collection into a new byte buffer.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut output = Vec::with_capacity(self.encoded_len()?);
        self.write(&mut output)?;
        Ok(output)
    }
}

//===========================================================================//

/// One entry in an ICO file; a single PNG-encoded square icon.
#[derive(Clone, Debug)]
pub struct IconDirEntry {
    size: u32,
    num_colors: u8,
    color_planes: u16,
    bits_per_pixel: u16,
    data: Vec<u8>,
}

impl IconDirEntry {
    fn from_image(image: SizedImage) -> IconDirEntry {
        IconDirEntry {
            size: image.size,
            num_colors: 0,
            color_planes: 1,
            bits_per_pixel: PNG_BITS_PER_PIXEL,
            data: image.data,
        }
    }

    /// Returns the edge length of the icon, in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns the value stored in the one-byte width field.  The field can't
    /// hold 256, so that size is stored as zero.
    pub fn width_byte(&self) -> u8 {
        if self.size > 255 {
            0
        } else {
            self.size as u8
        }
    }

    /// Returns the value stored in the one-byte height field.  Icons are
    /// square, so this is always the same as the width byte.
    pub fn height_byte(&self) -> u8 {
        self.width_byte()
    }

    /// Returns the number of color planes recorded for this entry.
    pub fn color_planes(&self) -> u16 {
        self.color_planes
    }

    /// Returns the bits-per-pixel recorded for this entry.
    pub fn bits_per_pixel(&self) -> u16 {
        self.bits_per_pixel
    }

    /// Returns true if the payload starts with the PNG signature.
    pub fn is_png(&self) -> bool {
        self.data.starts_with(PNG_SIGNATURE)
    }

    /// Returns the raw, encoded image data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

//===========================================================================//

/// Packs PNG images into a single ICO file, keeping the given order.
///
/// The payloads are trusted: nothing checks that they are valid PNGs or that
/// their dimensions match the declared sizes.  The only error is a list with
/// more entries than the ICO count field can hold.
pub fn build_ico_from_pngs(images: Vec<SizedImage>) -> io::Result<Vec<u8>> {
    IconDir::from_images(images).to_bytes()
}

//===========================================================================//


//===========================================================================//
