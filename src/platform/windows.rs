use std::fs::Metadata;
use std::os::windows::fs::MetadataExt;

use winapi::um::winnt::FILE_ATTRIBUTE_ARCHIVE;

pub fn needs_archiving(metadata: &Metadata) -> bool {
    archive_bit_set(metadata.file_attributes())
}

fn archive_bit_set(attributes: u32) -> bool {
    attributes & FILE_ATTRIBUTE_ARCHIVE != 0
}
