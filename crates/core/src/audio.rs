//! Audio value types
//!
//! Audio is opaque to the core: transcription and synthesis are external
//! collaborators, so the pipeline only needs a byte container on the way
//! in and a reference to generated audio on the way out.

use serde::{Deserialize, Serialize};

/// Raw uploaded audio, as received from the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBlob {
    pub data: Vec<u8>,
}

impl AudioBlob {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }
}

/// Reference to synthesized audio (a relative URL or storage path),
/// produced by the speech-synthesis collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioRef(pub String);

impl AudioRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
