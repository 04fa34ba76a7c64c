// ABOUTME: Data URI parsing/formatting and PCM to WAV conversion for generated media
// ABOUTME: Images and audio travel through the API as base64 data URIs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Inline media helpers.
//!
//! The AI backend hands back images and speech as base64 blobs with a mime
//! type, and voice clips arrive from clients as `data:<mime>;base64,<data>`
//! strings. [`DataUri`] is the one representation used for both directions.

use std::fmt;
use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hound::{SampleFormat, WavSpec, WavWriter};
use serde::{Deserialize, Serialize};

use crate::constants::audio::{DEFAULT_PCM_SAMPLE_RATE, PCM_BITS_PER_SAMPLE, PCM_CHANNELS};
use crate::errors::{AppError, AppResult, ErrorCode};

/// Base64 payload with its mime type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataUri {
    /// Mime type, possibly with parameters (`audio/L16;codec=pcm;rate=24000`)
    pub mime_type: String,
    /// Base64 (standard alphabet) encoded bytes
    pub data: String,
}

impl DataUri {
    /// Wrap an already base64-encoded payload
    #[must_use]
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Encode raw bytes
    #[must_use]
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(mime_type, BASE64.encode(bytes))
    }

    /// Parse a `data:<mime>;base64,<data>` string
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the string is not a base64 data URI.
    pub fn parse(uri: &str) -> AppResult<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| invalid_uri("missing 'data:' prefix"))?;
        let (header, data) = rest
            .split_once(',')
            .ok_or_else(|| invalid_uri("missing ',' separator"))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| invalid_uri("only base64 data URIs are supported"))?;
        if mime_type.is_empty() {
            return Err(invalid_uri("missing mime type"));
        }
        if data.is_empty() {
            return Err(invalid_uri("empty payload"));
        }
        Ok(Self::new(mime_type, data))
    }

    /// Mime type without parameters, lowercased
    #[must_use]
    pub fn essence(&self) -> String {
        self.mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }

    /// Value of a `key=value` mime parameter
    #[must_use]
    pub fn mime_param(&self, key: &str) -> Option<&str> {
        self.mime_type.split(';').skip(1).find_map(|param| {
            let (name, value) = param.split_once('=')?;
            name.trim().eq_ignore_ascii_case(key).then(|| value.trim())
        })
    }

    /// Decode the payload
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the payload is not valid base64.
    pub fn decode(&self) -> AppResult<Vec<u8>> {
        BASE64
            .decode(self.data.as_bytes())
            .map_err(|e| AppError::new(ErrorCode::InvalidFormat, format!("Invalid base64: {e}")))
    }

    /// Whether the payload is raw linear PCM that needs a container before playback
    #[must_use]
    pub fn is_raw_pcm(&self) -> bool {
        matches!(self.essence().as_str(), "audio/l16" | "audio/pcm")
            || self.mime_param("codec").is_some_and(|c| c.eq_ignore_ascii_case("pcm"))
    }

    /// Convert raw 16-bit PCM speech into a playable WAV data URI
    ///
    /// Payloads that already carry a container are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be decoded or the WAV cannot be written.
    pub fn into_playable_audio(self) -> AppResult<Self> {
        if !self.is_raw_pcm() {
            return Ok(self);
        }
        let sample_rate = self
            .mime_param("rate")
            .and_then(|rate| rate.parse().ok())
            .unwrap_or(DEFAULT_PCM_SAMPLE_RATE);
        let pcm = self.decode()?;
        let wav = pcm_to_wav(&pcm, sample_rate)?;
        Ok(Self::from_bytes("audio/wav", &wav))
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.data)
    }
}

fn invalid_uri(reason: &str) -> AppError {
    AppError::new(
        ErrorCode::InvalidFormat,
        format!("Invalid data URI: {reason}"),
    )
}

/// Wrap little-endian signed 16-bit mono PCM in a WAV container
///
/// # Errors
///
/// Returns an internal error if the WAV writer fails.
pub fn pcm_to_wav(pcm: &[u8], sample_rate: u32) -> AppResult<Vec<u8>> {
    let spec = WavSpec {
        channels: PCM_CHANNELS,
        sample_rate,
        bits_per_sample: PCM_BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(pcm.len() + 44));
    {
        let mut writer = WavWriter::new(&mut cursor, spec).map_err(wav_error)?;
        for sample in pcm.chunks_exact(2) {
            writer
                .write_sample(i16::from_le_bytes([sample[0], sample[1]]))
                .map_err(wav_error)?;
        }
        writer.finalize().map_err(wav_error)?;
    }
    Ok(cursor.into_inner())
}

fn wav_error(error: hound::Error) -> AppError {
    AppError::internal(format!("Failed to encode WAV audio: {error}"))
}
