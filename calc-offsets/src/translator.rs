//! Virtual address to file offset translation
//!
//! Symbol map addresses are relative to the image base, which is the start of
//! the first region the image occupies. A tracer needs the position of the
//! method in the file on disk instead:
//!
//! ```text
//! offset_from_base = exec.start - first.start
//! file_offset      = address - offset_from_base + exec.file_offset
//! ```
//!
//! where `exec` is the first `r-xp` region of the image that contains the
//! address once both are expressed relative to the image base.

use log::debug;

use crate::domain::{MappedRegion, OffsetError, SymbolEntry, SymbolOffset};
use crate::memory_maps::RegionGroup;

/// Translates addresses for one native image
#[derive(Debug, Clone, Copy)]
pub struct OffsetTranslator<'a> {
    image: &'a str,
    regions: &'a [MappedRegion],
}

impl<'a> OffsetTranslator<'a> {
    /// Bind to the regions of `image`
    ///
    /// # Errors
    /// Returns `ImageNotMapped` if the image has no regions in `group`.
    pub fn for_image(group: &'a RegionGroup, image: &'a str) -> Result<Self, OffsetError> {
        let regions = group
            .get(image)
            .filter(|regions| !regions.is_empty())
            .ok_or_else(|| OffsetError::ImageNotMapped {
                image: image.to_string(),
                mapped: group.image_names().into_iter().map(str::to_string).collect(),
            })?;

        let translator = Self { image, regions };
        debug!("Image {image} base: 0x{:x}, {} regions", translator.image_base(), regions.len());
        Ok(translator)
    }

    /// Start of the first region of the image
    #[must_use]
    pub fn image_base(&self) -> u64 {
        self.regions[0].start
    }

    /// First `r-xp` region whose base-relative bounds strictly enclose `address`
    #[must_use]
    pub fn exec_region_for(&self, address: u64) -> Option<&'a MappedRegion> {
        // Regions mapped below the base have negative relative bounds
        let base = i128::from(self.image_base());
        let address = i128::from(address);
        self.regions.iter().find(|region| {
            region.permissions.is_private_code()
                && i128::from(region.start) - base < address
                && i128::from(region.end) - base > address
        })
    }

    /// Translate one symbol to its file offset
    ///
    /// # Errors
    /// Returns `NoExecutableRegion` if no `r-xp` region contains the address.
    pub fn translate(&self, entry: SymbolEntry) -> Result<SymbolOffset, OffsetError> {
        let Some(exec) = self.exec_region_for(entry.address) else {
            return Err(OffsetError::NoExecutableRegion {
                image: self.image.to_string(),
                address: entry.address,
                symbol: entry.name,
            });
        };

        // Modular arithmetic: intermediate values may leave the u64 range
        let offset_from_base = exec.start.wrapping_sub(self.image_base());
        let file_offset = entry.address.wrapping_sub(offset_from_base).wrapping_add(exec.file_offset);

        debug!(
            "0x{:x} {} -> region 0x{:x}-0x{:x}, file offset 0x{file_offset:x}",
            entry.address, entry.name, exec.start, exec.end
        );
        Ok(SymbolOffset { file_offset, symbol: entry.name })
    }

    /// Lazily translate `entries` in order, one result per entry
    pub fn translate_all<I>(
        self,
        entries: I,
    ) -> impl Iterator<Item = Result<SymbolOffset, OffsetError>> + 'a
    where
        I: IntoIterator<Item = SymbolEntry> + 'a,
        I::IntoIter: 'a,
    {
        entries.into_iter().map(move |entry| self.translate(entry))
    }
}
