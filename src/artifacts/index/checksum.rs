use crate::artifacts::index::CHECKSUM_SIZE;
use crate::errors::{KitError, Result};
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::{Read, Write};

/// Reader/writer adapter that hashes every byte passing through it
///
/// Used to produce and verify the trailing SHA-1 of the index file.
#[derive(Debug)]
pub struct Checksum<F> {
    file: F,
    digest: Sha1,
}

impl<F> Checksum<F> {
    pub(crate) fn new(file: F) -> Self {
        Checksum {
            file,
            digest: Sha1::new(),
        }
    }

    pub(crate) fn into_inner(self) -> F {
        self.file
    }
}

impl<F: Read> Checksum<F> {
    pub(crate) fn read(&mut self, size: usize) -> Result<Bytes> {
        let mut buffer = vec![0; size];
        self.file
            .read_exact(&mut buffer)
            .map_err(|_| KitError::CorruptIndex("unexpected end-of-file while reading index".into()))?;

        self.digest.update(&buffer);
        Ok(Bytes::from(buffer))
    }

    pub(crate) fn verify(&mut self) -> Result<()> {
        let mut expected_checksum = [0u8; CHECKSUM_SIZE];
        self.file
            .read_exact(&mut expected_checksum)
            .map_err(|_| KitError::CorruptIndex("missing trailing checksum".into()))?;

        let actual_checksum = self.digest.clone().finalize();

        if expected_checksum != actual_checksum.as_slice() {
            return Err(KitError::CorruptIndex(
                "checksum does not match value stored on disk".into(),
            ));
        }

        Ok(())
    }
}

impl<F: Write> Checksum<F> {
    pub(crate) fn write(&mut self, data: &[u8]) -> Result<()> {
        self.file.write_all(data)?;
        self.digest.update(data);
        Ok(())
    }

    pub(crate) fn write_checksum(&mut self) -> Result<()> {
        let checksum = self.digest.clone().finalize();
        self.file.write_all(checksum.as_slice())?;

        Ok(())
    }
}
