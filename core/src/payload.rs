// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::{Error, Result};
use bytes::Bytes;
use std::fmt::{Debug, Formatter};
use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex};

type SharedReader = Arc<Mutex<Option<Box<dyn Read + Send>>>>;

/// Content metadata carried alongside a payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentMetadata {
    /// Value for `Content-Type`.
    pub content_type: Option<String>,
    /// Value for `Content-Length`.
    pub content_length: Option<u64>,
    /// Raw (not encoded) MD5 digest of the content.
    pub content_md5: Option<Vec<u8>>,
}

#[derive(Clone)]
enum Content {
    Bytes(Bytes),
    Stream(SharedReader),
}

/// Payload is the body of a request or response.
///
/// In-memory payloads are repeatable: every [`Payload::open_stream`] call
/// returns a fresh reader positioned at the start. Reader payloads can be
/// opened exactly once, which makes a request carrying one unsafe to replay.
///
/// Cloning a payload is cheap. Clones of a reader payload share the same
/// underlying reader.
#[derive(Clone)]
pub struct Payload {
    content: Content,
    metadata: ContentMetadata,
}

impl Debug for Payload {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut d = f.debug_struct("Payload");
        match &self.content {
            Content::Bytes(bs) => d.field("bytes", &bs.len()),
            Content::Stream(_) => d.field("stream", &self.is_consumed()),
        };
        d.field("metadata", &self.metadata).finish()
    }
}

impl Payload {
    /// Create a repeatable payload from in-memory bytes.
    pub fn from_bytes(content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            metadata: ContentMetadata {
                content_length: Some(content.len() as u64),
                ..Default::default()
            },
            content: Content::Bytes(content),
        }
    }

    /// Create a one-shot payload from a reader.
    pub fn from_reader(reader: impl Read + Send + 'static) -> Self {
        Self {
            content: Content::Stream(Arc::new(Mutex::new(Some(Box::new(reader))))),
            metadata: ContentMetadata::default(),
        }
    }

    /// Set the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.metadata.content_type = Some(content_type.into());
        self
    }

    /// Set the content length.
    pub fn with_content_length(mut self, len: u64) -> Self {
        self.metadata.content_length = Some(len);
        self
    }

    /// Set the raw MD5 digest of the content.
    pub fn with_content_md5(mut self, md5: impl Into<Vec<u8>>) -> Self {
        self.metadata.content_md5 = Some(md5.into());
        self
    }

    /// Get the content metadata.
    pub fn metadata(&self) -> &ContentMetadata {
        &self.metadata
    }

    /// Returns true if the payload can be read again from the start.
    pub fn is_repeatable(&self) -> bool {
        matches!(self.content, Content::Bytes(_))
    }

    /// Returns the in-memory content, if any.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match &self.content {
            Content::Bytes(bs) => Some(bs),
            Content::Stream(_) => None,
        }
    }

    /// Returns true if a reader payload has already been opened.
    ///
    /// Always false for in-memory payloads.
    pub fn is_consumed(&self) -> bool {
        match &self.content {
            Content::Bytes(_) => false,
            Content::Stream(r) => r.lock().map(|v| v.is_none()).unwrap_or(true),
        }
    }

    /// Open a reader over the content.
    ///
    /// The caller owns the returned reader; dropping it closes the stream.
    pub fn open_stream(&self) -> Result<Box<dyn Read + Send>> {
        match &self.content {
            Content::Bytes(bs) => Ok(Box::new(Cursor::new(bs.clone()))),
            Content::Stream(r) => {
                let mut guard = r
                    .lock()
                    .map_err(|_| Error::unexpected("payload stream lock poisoned"))?;
                guard
                    .take()
                    .ok_or_else(|| Error::unexpected("payload stream has already been consumed"))
            }
        }
    }
}

impl From<&'static str> for Payload {
    fn from(value: &'static str) -> Self {
        Payload::from_bytes(value)
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Payload::from_bytes(value)
    }
}

impl From<Bytes> for Payload {
    fn from(value: Bytes) -> Self {
        Payload::from_bytes(value)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(value: Vec<u8>) -> Self {
        Payload::from_bytes(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(p: &Payload) -> String {
        let mut s = String::new();
        p.open_stream().unwrap().read_to_string(&mut s).unwrap();
        s
    }

    #[test]
    fn test_bytes_payload_is_repeatable() {
        let p = Payload::from_bytes("Action=DescribeRegions").with_content_type("text/plain");
        assert!(p.is_repeatable());
        assert_eq!(p.metadata().content_length, Some(22));
        assert_eq!(read_all(&p), "Action=DescribeRegions");
        assert_eq!(read_all(&p.clone()), "Action=DescribeRegions");
    }

    #[test]
    fn test_reader_payload_opens_once() {
        let p = Payload::from_reader(Cursor::new(b"hello".to_vec()));
        assert!(!p.is_repeatable());
        assert!(!p.is_consumed());
        assert_eq!(read_all(&p), "hello");
        assert!(p.is_consumed());
        assert!(p.open_stream().is_err());
    }
}
