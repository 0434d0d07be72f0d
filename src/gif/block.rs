//! GIF89a block writers.
//!
//! Each function appends one complete structural block to `output`.

use super::DisposalMethod;
use crate::bits::PackedFieldByte;
use crate::color::Rgb;
use crate::compress::LzwOutput;

/// Stream signature and version.
pub const SIGNATURE: &[u8; 6] = b"GIF89a";

/// Introduces any extension block.
pub const EXTENSION_INTRODUCER: u8 = 0x21;

/// Application extension label.
pub const APPLICATION_LABEL: u8 = 0xFF;

/// Graphic control extension label.
pub const GRAPHIC_CONTROL_LABEL: u8 = 0xF9;

/// Starts an image descriptor.
pub const IMAGE_SEPARATOR: u8 = 0x2C;

/// Ends the stream.
pub const TRAILER: u8 = 0x3B;

/// Largest payload a single data sub-block can carry.
pub const MAX_SUB_BLOCK_LEN: usize = 255;

/// Color resolution and table size field value: 2^(7+1) = 256 entries.
pub const TABLE_SIZE_FIELD: u8 = 7;

const NETSCAPE_APP_ID: &[u8; 11] = b"NETSCAPE2.0";

#[inline]
fn write_u16(output: &mut Vec<u8>, value: u16) {
    output.extend_from_slice(&value.to_le_bytes());
}

/// Write the "GIF89a" signature.
pub fn write_header(output: &mut Vec<u8>) {
    output.extend_from_slice(SIGNATURE);
}

/// Write the logical screen descriptor. No global color table is declared.
pub fn write_logical_screen_descriptor(output: &mut Vec<u8>, width: u16, height: u16) {
    write_u16(output, width);
    write_u16(output, height);

    let flags = PackedFieldByte::new()
        .push_flag(false) // global color table
        .push(TABLE_SIZE_FIELD, 3) // color resolution
        .push_flag(false) // sort
        .push(TABLE_SIZE_FIELD, 3); // global color table size
    output.push(flags.value());

    output.push(0); // background color index
    output.push(0); // pixel aspect ratio
}

/// Write the NETSCAPE2.0 looping extension. A `loop_count` of 0 loops forever.
pub fn write_loop_extension(output: &mut Vec<u8>, loop_count: u16) {
    output.push(EXTENSION_INTRODUCER);
    output.push(APPLICATION_LABEL);
    output.push(NETSCAPE_APP_ID.len() as u8);
    output.extend_from_slice(NETSCAPE_APP_ID);
    output.push(0x03); // sub-block size
    output.push(0x01); // loop sub-block id
    write_u16(output, loop_count);
    output.push(0x00); // block terminator
}

/// Write a graphic control extension with the transparent color flag set.
pub fn write_graphic_control_extension(
    output: &mut Vec<u8>,
    disposal: DisposalMethod,
    delay_cs: u16,
    transparent_index: u8,
) {
    output.push(EXTENSION_INTRODUCER);
    output.push(GRAPHIC_CONTROL_LABEL);
    output.push(0x04); // block size

    let flags = PackedFieldByte::new()
        .push(0, 3) // reserved
        .push(disposal as u8, 3)
        .push_flag(false) // user input
        .push_flag(true); // transparent color
    output.push(flags.value());

    write_u16(output, delay_cs);
    output.push(transparent_index);
    output.push(0x00); // block terminator
}

/// Write an image descriptor covering the full canvas with a 256-entry local table.
pub fn write_image_descriptor(output: &mut Vec<u8>, width: u16, height: u16) {
    output.push(IMAGE_SEPARATOR);
    write_u16(output, 0); // left
    write_u16(output, 0); // top
    write_u16(output, width);
    write_u16(output, height);

    let flags = PackedFieldByte::new()
        .push_flag(true) // local color table
        .push_flag(false) // interlace
        .push_flag(false) // sort
        .push(0, 2) // reserved
        .push(TABLE_SIZE_FIELD, 3);
    output.push(flags.value());
}

/// Write a local color table of exactly `entries` colors, zero-filling past `table`.
pub fn write_local_color_table(output: &mut Vec<u8>, table: &[Rgb], entries: usize) {
    assert!(
        table.len() <= entries,
        "color table has {} entries, block holds {}",
        table.len(),
        entries
    );
    output.reserve(entries * 3);
    for color in table {
        output.extend_from_slice(color);
    }
    output.resize(output.len() + (entries - table.len()) * 3, 0);
}

/// Split `data` into length-prefixed sub-blocks and terminate with an empty block.
pub fn write_sub_blocks(output: &mut Vec<u8>, data: &[u8]) {
    output.reserve(data.len() + data.len() / MAX_SUB_BLOCK_LEN + 2);
    for chunk in data.chunks(MAX_SUB_BLOCK_LEN) {
        output.push(chunk.len() as u8);
        output.extend_from_slice(chunk);
    }
    output.push(0x00);
}

/// Write LZW image data: minimum code size, then the sub-blocked stream.
pub fn write_image_data(output: &mut Vec<u8>, lzw: &LzwOutput) {
    output.push(lzw.min_code_size);
    write_sub_blocks(output, &lzw.bytes);
}
