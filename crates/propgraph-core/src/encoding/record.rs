//! Versioned bincode records for [`Vertex`] and [`Edge`].

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::{Edge, Vertex};

use super::traits::{Decoder, Encoder, FORMAT_VERSION};

fn encode_record<T: Serialize>(record: &T, buf: &mut Vec<u8>) -> Result<(), CoreError> {
    buf.push(FORMAT_VERSION);
    let body = bincode::serde::encode_to_vec(record, bincode::config::standard())
        .map_err(|e| CoreError::Encoding(e.to_string()))?;
    buf.extend_from_slice(&body);
    Ok(())
}

fn decode_record<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CoreError> {
    let Some((&version, body)) = bytes.split_first() else {
        return Err(CoreError::Encoding("unexpected end of input".to_owned()));
    };
    if version != FORMAT_VERSION {
        return Err(CoreError::Encoding(format!(
            "unsupported format version: {version}, expected {FORMAT_VERSION}"
        )));
    }

    let (record, read) = bincode::serde::decode_from_slice(body, bincode::config::standard())
        .map_err(|e| CoreError::Encoding(e.to_string()))?;
    if read != body.len() {
        return Err(CoreError::Encoding(format!(
            "trailing bytes after record: {} of {} consumed",
            read,
            body.len()
        )));
    }
    Ok(record)
}

impl Encoder for Edge {
    fn encode_to(&self, buf: &mut Vec<u8>) -> Result<(), CoreError> {
        encode_record(self, buf)
    }
}

impl Decoder for Edge {
    fn decode(bytes: &[u8]) -> Result<Self, CoreError> {
        decode_record(bytes)
    }
}

impl Encoder for Vertex {
    fn encode_to(&self, buf: &mut Vec<u8>) -> Result<(), CoreError> {
        encode_record(self, buf)
    }
}

impl Decoder for Vertex {
    fn decode(bytes: &[u8]) -> Result<Self, CoreError> {
        decode_record(bytes)
    }
}
