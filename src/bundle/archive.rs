//! Client bundle archive walking
//!
//! The bundle archive is opened with [`ArchiveReader`] and every entry is visited once,
//! in archive order. Entries are dispatched by exact file name through
//! [`BundleEntry::lookup`]; names that are not in the table are skipped. The nested
//! docker bundle is walked by the same routine one level down.
//!
//! Two kinds of failure are kept apart:
//! - an archive that cannot be opened (outer or nested) aborts the whole decode;
//! - an entry that cannot be read or decoded is recorded in a [`DecodeOutcome`] and
//!   the walk continues. The decode fails after the walk if anything was recorded.

use crate::bundle::{ClientBundle, ClientBundleKube, ClientBundleMeta};
use crate::error::{ClientError, DecodeError, EntryFailure, Result};
use crate::logging::Logger;
use std::io::{Cursor, Read};
use zip::ZipArchive;

pub const FILENAME_CA_PEM: &str = "ca.pem";
pub const FILENAME_CERT_PEM: &str = "cert.pem";
pub const FILENAME_PRIVATE_KEY_PEM: &str = "key.pem";
pub const FILENAME_PUBLIC_KEY_PEM: &str = "cert.pub";
pub const FILENAME_KUBECONFIG: &str = "kube.yml";
pub const FILENAME_DOCKER_BUNDLE_ZIP: &str = "ucp-docker-bundle.zip";
pub const FILENAME_DOCKER_BUNDLE_META: &str = "meta.json";

/// Which archive the walk is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveLevel {
    Bundle,
    DockerBundle,
}

/// Archive entries the decoder understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleEntry {
    CaCert,
    Cert,
    PrivateKey,
    PublicKey,
    KubeConfig,
    DockerBundle,
    Meta,
}

impl BundleEntry {
    /// Exact, case sensitive name lookup
    pub fn lookup(level: ArchiveLevel, name: &str) -> Option<Self> {
        match (level, name) {
            (ArchiveLevel::Bundle, FILENAME_CA_PEM) => Some(BundleEntry::CaCert),
            (ArchiveLevel::Bundle, FILENAME_CERT_PEM) => Some(BundleEntry::Cert),
            (ArchiveLevel::Bundle, FILENAME_PRIVATE_KEY_PEM) => Some(BundleEntry::PrivateKey),
            (ArchiveLevel::Bundle, FILENAME_PUBLIC_KEY_PEM) => Some(BundleEntry::PublicKey),
            (ArchiveLevel::Bundle, FILENAME_KUBECONFIG) => Some(BundleEntry::KubeConfig),
            (ArchiveLevel::Bundle, FILENAME_DOCKER_BUNDLE_ZIP) => Some(BundleEntry::DockerBundle),
            (ArchiveLevel::DockerBundle, FILENAME_DOCKER_BUNDLE_META) => Some(BundleEntry::Meta),
            _ => None,
        }
    }
}

/// In-memory zip archive
pub struct ArchiveReader {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl ArchiveReader {
    /// Open `data` as a zip archive.
    ///
    /// `size_hint` is the declared archive size; when it is smaller than the data
    /// only the first `size_hint` bytes are treated as the archive.
    pub fn open(mut data: Vec<u8>, size_hint: Option<u64>, context: &str) -> Result<Self> {
        if let Some(size) = size_hint.and_then(|s| usize::try_from(s).ok()) {
            if size < data.len() {
                data.truncate(size);
            }
        }

        let archive = ZipArchive::new(Cursor::new(data)).map_err(|source| ClientError::Archive {
            context: context.to_string(),
            source,
        })?;

        Ok(Self { archive })
    }

    pub fn comment(&self) -> String {
        String::from_utf8_lossy(self.archive.comment()).into_owned()
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    pub fn name_for_index(&self, index: usize) -> Option<String> {
        self.archive.name_for_index(index).map(str::to_string)
    }

    /// Read one entry fully
    pub fn read_entry(&mut self, index: usize) -> std::result::Result<Vec<u8>, DecodeError> {
        let mut file = self.archive.by_index(index)?;
        let mut data = Vec::with_capacity(usize::try_from(file.size()).unwrap_or_default());
        file.read_to_end(&mut data)?;
        Ok(data)
    }
}

/// Collects per-entry failures while the walk keeps going
#[derive(Debug, Default)]
pub struct DecodeOutcome {
    failures: Vec<EntryFailure>,
}

impl DecodeOutcome {
    /// Keep the value on success, record the failure otherwise
    pub fn capture<T>(&mut self, entry: &str, result: std::result::Result<T, DecodeError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(source) => {
                self.failures.push(EntryFailure {
                    entry: entry.to_string(),
                    source,
                });
                None
            }
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[EntryFailure] {
        &self.failures
    }

    /// `value` if nothing was recorded, the aggregated error otherwise
    pub fn finish<T>(self, value: T) -> Result<T> {
        if self.failures.is_empty() {
            Ok(value)
        } else {
            Err(ClientError::ClientBundleRetrieval {
                failures: self.failures,
            })
        }
    }
}

struct BundleDecoder<'a> {
    bundle: ClientBundle,
    outcome: DecodeOutcome,
    logger: &'a Logger,
}

impl BundleDecoder<'_> {
    /// Visit every entry of `reader`. Returns an error only when decoding must abort.
    fn walk(&mut self, mut reader: ArchiveReader, level: ArchiveLevel) -> Result<()> {
        for index in 0..reader.len() {
            let Some(name) = reader.name_for_index(index) else {
                continue;
            };

            let Some(entry) = BundleEntry::lookup(level, &name) else {
                self.logger.detail(&format!("Ignoring archive entry {}", name));
                continue;
            };

            let Some(data) = self.outcome.capture(&name, reader.read_entry(index)) else {
                self.logger.warning(&format!("Could not read archive entry {}", name));
                continue;
            };

            self.logger.detail(&format!(
                "Decoding {} ({})",
                name,
                self.logger.format_size(data.len() as u64)
            ));
            self.apply(entry, &name, data)?;
        }

        Ok(())
    }

    fn apply(&mut self, entry: BundleEntry, name: &str, data: Vec<u8>) -> Result<()> {
        match entry {
            BundleEntry::CaCert => {
                if let Some(text) = self.outcome.capture(name, pem_text(data)) {
                    self.bundle.ca_cert = text;
                }
            }
            BundleEntry::Cert => {
                if let Some(text) = self.outcome.capture(name, pem_text(data)) {
                    self.bundle.cert = text;
                }
            }
            BundleEntry::PrivateKey => {
                if let Some(text) = self.outcome.capture(name, pem_text(data)) {
                    self.bundle.private_key = text;
                }
            }
            BundleEntry::PublicKey => {
                if let Some(text) = self.outcome.capture(name, pem_text(data)) {
                    self.bundle.public_key = text;
                }
            }
            BundleEntry::KubeConfig => {
                if let Some(kube) = self.outcome.capture(name, ClientBundleKube::from_kube_yml(data)) {
                    self.bundle.kube = Some(kube);
                }
            }
            BundleEntry::DockerBundle => {
                let nested = ArchiveReader::open(data, None, FILENAME_DOCKER_BUNDLE_ZIP)?;
                self.walk(nested, ArchiveLevel::DockerBundle)?;
            }
            BundleEntry::Meta => {
                if let Some(meta) = self.outcome.capture(name, ClientBundleMeta::from_meta_json(&data)) {
                    if !meta.name.is_empty() {
                        self.bundle.id = meta.name.clone();
                    }
                    self.bundle.meta = meta;
                }
            }
        }

        Ok(())
    }
}

fn pem_text(data: Vec<u8>) -> std::result::Result<String, DecodeError> {
    Ok(String::from_utf8(data)?)
}

/// Decode a downloaded client bundle archive.
///
/// Entries missing from the archive leave their fields empty. Entries that are
/// present but unreadable fail the decode with [`ClientError::ClientBundleRetrieval`],
/// listing every failure in archive order.
pub fn decode_client_bundle(data: Vec<u8>, size_hint: Option<u64>, logger: &Logger) -> Result<ClientBundle> {
    let reader = ArchiveReader::open(data, size_hint, "client bundle")?;
    if reader.is_empty() {
        logger.warning("Client bundle archive has no entries");
    } else {
        logger.detail(&format!("Client bundle archive has {} entries", reader.len()));
    }

    let mut decoder = BundleDecoder {
        bundle: ClientBundle {
            id: reader.comment(),
            ..Default::default()
        },
        outcome: DecodeOutcome::default(),
        logger,
    };

    decoder.walk(reader, ArchiveLevel::Bundle)?;

    if !decoder.outcome.is_clean() {
        for failure in decoder.outcome.failures() {
            logger.warning(&format!("Client bundle entry failed: {}", failure));
        }
    }

    decoder.outcome.finish(decoder.bundle)
}
