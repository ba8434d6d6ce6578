//! On-disk registry archive.
//!
//! Layout: `[magic: 4 bytes][version: u32][crc32: u32][len: u64][payload: len bytes]`,
//! integers little-endian, payload an rkyv-encoded member list.

use crate::error::RegistryError;
use crate::member::Member;
use crate::population::PopulationRegistry;
use crc32fast::Hasher;
use rkyv::ser::{serializers::AllocSerializer, Serializer};
use rkyv::{Archive, Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const MAGIC: &[u8; 4] = b"ISRG";
const VERSION: u32 = 1;
const HEADER_LEN: usize = 4 + 4 + 4 + 8;

#[derive(Archive, Deserialize, Serialize, Debug)]
#[archive(check_bytes)]
struct RegistrySnapshot {
    members: Vec<Member>,
}

pub fn encode(registry: &PopulationRegistry) -> Result<Vec<u8>, RegistryError> {
    let snapshot = RegistrySnapshot {
        members: registry.members().to_vec(),
    };

    let mut serializer = AllocSerializer::<4096>::default();
    serializer
        .serialize_value(&snapshot)
        .map_err(|_| RegistryError::Serialization)?;
    let payload = serializer.into_serializer().into_inner();

    let mut hasher = Hasher::new();
    hasher.update(&payload);
    let crc = hasher.finalize();

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

pub fn decode(bytes: &[u8]) -> Result<PopulationRegistry, RegistryError> {
    if bytes.len() < HEADER_LEN || &bytes[0..4] != MAGIC {
        return Err(RegistryError::BadMagic);
    }

    let version = u32::from_le_bytes(read_array(&bytes[4..8]));
    if version != VERSION {
        return Err(RegistryError::UnsupportedVersion(version));
    }

    let crc = u32::from_le_bytes(read_array(&bytes[8..12]));
    let len = u64::from_le_bytes(read_array(&bytes[12..20]));
    let payload = &bytes[HEADER_LEN..];
    if payload.len() as u64 != len {
        return Err(RegistryError::Truncated {
            expected: len,
            found: payload.len() as u64,
        });
    }

    let mut hasher = Hasher::new();
    hasher.update(payload);
    if hasher.finalize() != crc {
        return Err(RegistryError::CrcMismatch);
    }

    // rkyv validation needs an aligned buffer.
    let mut aligned = rkyv::AlignedVec::with_capacity(payload.len());
    aligned.extend_from_slice(payload);

    let archived = rkyv::check_archived_root::<RegistrySnapshot>(&aligned[..])
        .map_err(|_| RegistryError::CorruptPayload)?;
    let snapshot: RegistrySnapshot = archived
        .deserialize(&mut rkyv::Infallible)
        .map_err(|_| RegistryError::CorruptPayload)?;

    PopulationRegistry::from_members(snapshot.members)
}

fn read_array<const N: usize>(slice: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    out
}

impl PopulationRegistry {
    /// Writes the archive to a temp file then renames it into place.
    pub fn save_archive(&self, path: impl AsRef<Path>) -> Result<(), RegistryError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let bytes = encode(self)?;
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, &bytes)?;
        fs::rename(&tmp_path, path)?;

        debug!("wrote registry archive {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    pub fn load_archive(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let registry = decode(&bytes)?;
        info!(
            "loaded population registry from {} ({} members)",
            path.display(),
            registry.len()
        );
        Ok(registry)
    }
}
