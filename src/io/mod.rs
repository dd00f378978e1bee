//! Native binary archives for models and attribute managers.
//!
//! Each persistent type implements [`NativeArchive`], which ties it to a file
//! extension and provides reader/writer based encoding through `bincode`.
//! The path based helpers check the extension before touching the file and
//! validate structural invariants after loading.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::data::attribute_manager::AttributeManager;
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshModelError;
use crate::model::{BRep, Section};

/// A type stored in its own native file format.
pub trait NativeArchive: Serialize + DeserializeOwned + DebugInvariants {
    /// File extension, without the leading dot.
    const EXTENSION: &'static str;

    /// Encode `self` into `writer`.
    fn write_to<W: Write>(&self, writer: W) -> Result<(), MeshModelError> {
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    /// Decode a value from `reader` and validate it.
    fn read_from<R: Read>(reader: R) -> Result<Self, MeshModelError> {
        let value: Self = bincode::deserialize_from(reader)?;
        value.validate_invariants()?;
        Ok(value)
    }
}

impl NativeArchive for BRep {
    const EXTENSION: &'static str = "og_brep";
}

impl NativeArchive for Section {
    const EXTENSION: &'static str = "og_sctn";
}

impl NativeArchive for AttributeManager {
    const EXTENSION: &'static str = "og_attr";
}

fn check_extension<T: NativeArchive>(path: &Path) -> Result<(), MeshModelError> {
    let found = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    if found == T::EXTENSION {
        Ok(())
    } else {
        Err(MeshModelError::UnknownExtension {
            expected: T::EXTENSION,
            found: found.to_owned(),
        })
    }
}

/// Write `value` to `path`, whose extension must be `T::EXTENSION`.
pub fn save<T: NativeArchive>(value: &T, path: impl AsRef<Path>) -> Result<(), MeshModelError> {
    let path = path.as_ref();
    check_extension::<T>(path)?;
    let mut writer = BufWriter::new(File::create(path)?);
    value.write_to(&mut writer)?;
    writer.flush()?;
    log::debug!("saved {}", path.display());
    Ok(())
}

/// Read a `T` from `path`, whose extension must be `T::EXTENSION`.
pub fn load<T: NativeArchive>(path: impl AsRef<Path>) -> Result<T, MeshModelError> {
    let path = path.as_ref();
    check_extension::<T>(path)?;
    let value = T::read_from(BufReader::new(File::open(path)?))?;
    log::debug!("loaded {}", path.display());
    Ok(value)
}

pub fn save_brep(brep: &BRep, path: impl AsRef<Path>) -> Result<(), MeshModelError> {
    save(brep, path)
}

pub fn load_brep(path: impl AsRef<Path>) -> Result<BRep, MeshModelError> {
    load(path)
}

pub fn save_section(section: &Section, path: impl AsRef<Path>) -> Result<(), MeshModelError> {
    save(section, path)
}

pub fn load_section(path: impl AsRef<Path>) -> Result<Section, MeshModelError> {
    load(path)
}

pub fn save_attribute_manager(
    manager: &AttributeManager,
    path: impl AsRef<Path>,
) -> Result<(), MeshModelError> {
    save(manager, path)
}

pub fn load_attribute_manager(path: impl AsRef<Path>) -> Result<AttributeManager, MeshModelError> {
    load(path)
}
