// Flash-Dateisystem für das Storage Log
//
// LittleFS (littlefs2) auf einer festen Partition des SPI-Flash (esp-storage).
// Wird beim ersten Mount formatiert, falls die Partition kein gültiges
// Dateisystem enthält.

use defmt::{info, warn};
use embedded_storage::nor_flash::{NorFlash, ReadNorFlash};
use esp_core::{LogStorage, StorageError};
use esp_storage::FlashStorage;
use littlefs2::consts::{U2, U256};
use littlefs2::driver::Storage;
use littlefs2::fs::{Allocation, Filesystem};
use littlefs2::io::{self, SeekFrom};
use littlefs2::io::prelude::*;
use littlefs2::path::PathBuf;

use crate::config::{FS_BLOCK_SIZE, FS_PARTITION_OFFSET, FS_PARTITION_SIZE};

// ============================================================================
// Block-Device: Partition im SPI-Flash
// ============================================================================

/// Fenster `FS_PARTITION_OFFSET..+FS_PARTITION_SIZE` im Flash
pub struct FlashPartition {
    flash: FlashStorage<'static>,
}

impl FlashPartition {
    pub fn new(flash: FlashStorage<'static>) -> Self {
        Self { flash }
    }

    fn absolute(off: usize) -> u32 {
        FS_PARTITION_OFFSET + off as u32
    }
}

impl Storage for FlashPartition {
    const READ_SIZE: usize = 4;
    const WRITE_SIZE: usize = 4;
    const BLOCK_SIZE: usize = FS_BLOCK_SIZE;
    const BLOCK_COUNT: usize = FS_PARTITION_SIZE as usize / FS_BLOCK_SIZE;
    const BLOCK_CYCLES: isize = 500;

    type CACHE_SIZE = U256;
    type LOOKAHEAD_SIZE = U2;

    fn read(&mut self, off: usize, buf: &mut [u8]) -> io::Result<usize> {
        ReadNorFlash::read(&mut self.flash, Self::absolute(off), buf).map_err(|_| io::Error::IO)?;
        Ok(buf.len())
    }

    fn write(&mut self, off: usize, data: &[u8]) -> io::Result<usize> {
        NorFlash::write(&mut self.flash, Self::absolute(off), data).map_err(|_| io::Error::IO)?;
        Ok(data.len())
    }

    fn erase(&mut self, off: usize, len: usize) -> io::Result<usize> {
        let from = Self::absolute(off);
        NorFlash::erase(&mut self.flash, from, from + len as u32).map_err(|_| io::Error::IO)?;
        Ok(len)
    }
}

// ============================================================================
// LogStorage-Adapter
// ============================================================================

enum FsState {
    Unmounted {
        alloc: &'static mut Allocation<FlashPartition>,
        partition: &'static mut FlashPartition,
    },
    Mounted(Filesystem<'static, FlashPartition>),
    /// Mount/Format fehlgeschlagen, keine weiteren Versuche
    Poisoned,
}

/// Dateisystem-Zugriff für das Storage Log
pub struct FlashFs {
    state: FsState,
}

impl FlashFs {
    pub fn new(
        alloc: &'static mut Allocation<FlashPartition>,
        partition: &'static mut FlashPartition,
    ) -> Self {
        Self {
            state: FsState::Unmounted { alloc, partition },
        }
    }

    fn fs(&self) -> Result<&Filesystem<'static, FlashPartition>, StorageError> {
        match &self.state {
            FsState::Mounted(fs) => Ok(fs),
            _ => Err(StorageError::MountFailed),
        }
    }
}

fn path_buf(path: &str) -> Result<PathBuf, StorageError> {
    PathBuf::try_from(path).map_err(|_| StorageError::Io)
}

fn map_io(error: io::Error) -> StorageError {
    if error == io::Error::NO_SUCH_ENTRY {
        StorageError::NotFound
    } else {
        StorageError::Io
    }
}

impl LogStorage for FlashFs {
    fn mount(&mut self) -> Result<(), StorageError> {
        let state = core::mem::replace(&mut self.state, FsState::Poisoned);
        let (alloc, partition) = match state {
            FsState::Unmounted { alloc, partition } => (alloc, partition),
            FsState::Mounted(fs) => {
                self.state = FsState::Mounted(fs);
                return Ok(());
            }
            FsState::Poisoned => return Err(StorageError::MountFailed),
        };

        if !Filesystem::is_mountable(partition) {
            warn!("FS: no filesystem found, formatting partition");
            if let Err(e) = Filesystem::format(partition) {
                warn!("FS: format failed: {}", e.code());
                return Err(StorageError::MountFailed);
            }
        }

        match Filesystem::mount(alloc, partition) {
            Ok(fs) => {
                info!("FS: mounted ({} blocks)", FlashPartition::BLOCK_COUNT);
                self.state = FsState::Mounted(fs);
                Ok(())
            }
            Err(e) => {
                warn!("FS: mount failed: {}", e.code());
                Err(StorageError::MountFailed)
            }
        }
    }

    fn exists(&mut self, path: &str) -> bool {
        match (self.fs(), path_buf(path)) {
            (Ok(fs), Ok(path)) => fs.exists(&path),
            _ => false,
        }
    }

    fn create(&mut self, path: &str, contents: &[u8]) -> Result<(), StorageError> {
        let path = path_buf(path)?;
        self.fs()?.write(&path, contents).map_err(map_io)
    }

    fn append(&mut self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        let path = path_buf(path)?;
        self.fs()?
            .open_file_with_options_and_then(
                |options| options.write(true).create(true).append(true),
                &path,
                |file| file.write_all(data),
            )
            .map_err(map_io)
    }

    fn read_at(
        &mut self,
        path: &str,
        offset: usize,
        buf: &mut [u8],
    ) -> Result<usize, StorageError> {
        let path = path_buf(path)?;
        self.fs()?
            .open_file_and_then(&path, |file| {
                file.seek(SeekFrom::Start(offset as u32))?;
                file.read(buf)
            })
            .map_err(map_io)
    }

    fn remove(&mut self, path: &str) -> Result<(), StorageError> {
        let path = path_buf(path)?;
        self.fs()?.remove(&path).map_err(map_io)
    }
}
