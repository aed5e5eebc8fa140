//! PNG decoding into engine pixel buffers.

use pixnum_engine::{ConversionError, PixelBuffer};
use std::io::{self, Cursor};
use std::path::Path;

use crate::assets::AssetLoader;

/// Decode PNG bytes into a tightly packed RGBA buffer.
///
/// Palette and low bit-depth images are expanded and 16-bit channels are
/// stripped to 8 bits; grayscale and RGB images get an opaque alpha channel.
pub fn decode_png(bytes: &[u8]) -> Result<PixelBuffer, ConversionError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

    let mut reader = decoder
        .read_info()
        .map_err(|e| ConversionError::Decode(e.to_string()))?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut buf)
        .map_err(|e| ConversionError::Decode(e.to_string()))?;
    buf.truncate(frame.buffer_size());

    let rgba: Vec<u8> = match frame.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1], c[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|c| [c[0], c[0], c[0], c[1]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        other => {
            return Err(ConversionError::Decode(format!(
                "unsupported color type after expansion: {other:?}"
            )))
        }
    };

    tracing::trace!(
        width = frame.width,
        height = frame.height,
        color_type = ?frame.color_type,
        "Decoded PNG"
    );

    PixelBuffer::from_rgba(frame.width as usize, frame.height as usize, rgba)
}

/// Read and decode a puzzle image through the asset loader.
pub fn load_puzzle_image(loader: &AssetLoader, path: &Path) -> Result<PixelBuffer, ConversionError> {
    let bytes = loader.read_puzzle(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ConversionError::SourceMissing(path.display().to_string()),
        _ => ConversionError::Decode(e.to_string()),
    })?;
    decode_png(&bytes)
}
