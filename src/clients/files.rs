//! Structure file downloads from `files.rcsb.org`.

use flate2::read::GzDecoder;
use std::io::Read;

use super::{check_status, join_url, ClientError};
use crate::config::{Config, Endpoints};
use crate::utils::{validate_entry_id, validate_url, HttpClient};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

wire_enum! {
    /// Downloadable file formats.
    pub enum PdbFileType ("file type") {
        /// Legacy PDB format
        Pdb => "pdb",
        /// PDBx/mmCIF
        Cif => "cif",
        /// PDBML
        Xml => "xml",
        /// Structure factors, only deposited for some entries
        StructFact => "structfact",
    }
}

impl PdbFileType {
    /// File name on the download server, without compression suffix
    pub fn file_name(&self, entry_id: &str) -> String {
        match self {
            PdbFileType::StructFact => format!("{}-sf.cif", entry_id),
            other => format!("{}.{}", entry_id, other.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileClient {
    http: HttpClient,
    endpoint: String,
}

impl FileClient {
    pub fn new() -> Self {
        Self {
            http: HttpClient::new(),
            endpoint: Endpoints::default().files,
        }
    }

    pub fn with_endpoint(endpoint: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http: HttpClient::new(),
            endpoint: validate_url(endpoint)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Ok(Self {
            http: HttpClient::from_settings(&config.http)?,
            endpoint: validate_url(&config.endpoints.files)?,
        })
    }

    pub fn with_http(mut self, http: HttpClient) -> Self {
        self.http = http;
        self
    }

    /// Download a structure file as text.
    ///
    /// With `compression` the `.gz` variant is requested and inflated
    /// locally, which is much faster for large mmCIF files.
    pub async fn get_pdb_file(
        &self,
        entry_id: &str,
        filetype: PdbFileType,
        compression: bool,
    ) -> Result<String, ClientError> {
        let entry_id = validate_entry_id(entry_id)?;

        let mut file_name = filetype.file_name(&entry_id);
        if compression {
            file_name.push_str(".gz");
        }
        let url = join_url(&self.endpoint, &file_name);
        tracing::debug!("Downloading {} file for {} from {}", filetype, entry_id, url);

        let response = self
            .http
            .client()
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Network(format!("Failed to download {}: {}", file_name, e)))?;

        let response = check_status(response, "RCSB files").await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(format!("Failed to read {}: {}", file_name, e)))?;

        decode_payload(&bytes)
    }
}

impl Default for FileClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Inflate gzip payloads; pass plain text through.
///
/// The transport may already have removed a gzip content encoding, so the
/// magic bytes decide rather than the requested file name.
fn decode_payload(bytes: &[u8]) -> Result<String, ClientError> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut text = String::new();
        GzDecoder::new(bytes).read_to_string(&mut text)?;
        return Ok(text);
    }

    String::from_utf8(bytes.to_vec())
        .map_err(|e| ClientError::Parse(format!("File is not valid UTF-8: {}", e)))
}
