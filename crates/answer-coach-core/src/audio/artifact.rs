/// A finalized recording, ready for submission.
///
/// Produced only by [`CaptureSession::stop`](crate::CaptureSession::stop);
/// one artifact per completed take. The controller layer owns the artifact
/// exclusively until it is submitted or discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioArtifact {
    /// Complete encoded container (WAV), chunks in arrival order.
    pub encoded_bytes: Vec<u8>,
    /// MIME type of `encoded_bytes`.
    pub mime_type: &'static str,
    /// Whole seconds of wall-clock time between start and stop.
    pub duration_seconds: u64,
}

impl AudioArtifact {
    /// Size of the encoded container in bytes.
    pub fn len(&self) -> usize {
        self.encoded_bytes.len()
    }

    /// True when the container holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.encoded_bytes.is_empty()
    }
}
