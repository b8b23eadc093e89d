//! Per-call streaming session
//!
//! One session owns the filter state of one continuous audio stream. Chunks
//! flow µ-law → PCM → filter; raw and filtered PCM are retained until the
//! call ends and are handed back as a [`Recording`].

use crate::codec;
use crate::filters::{Filter, FilterError, FilterState};
use crate::spectrum::{AnalyzerConfig, BandReport, SpectrumAnalyzer, SpectrumError};
use crate::wav;
use std::io;
use std::mem;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Filtering failed: {0}")]
    Filter(#[from] FilterError),

    #[error("Spectrum analysis failed: {0}")]
    Spectrum(#[from] SpectrumError),
}

/// Filter state lifecycle; state is created lazily on the first chunk
#[derive(Debug, Clone, PartialEq)]
enum Lifecycle {
    Uninitialized,
    Active(FilterState),
}

/// Streaming filter session for one call
#[derive(Debug)]
pub struct CallSession {
    id: String,
    filter: Filter,
    sample_rate: u32,
    lifecycle: Lifecycle,

    raw: Vec<i16>,
    filtered: Vec<i16>,

    /// Offset of the most recent chunk in `filtered`
    last_chunk_start: usize,
    chunk_count: usize,
}

impl CallSession {
    /// Create a session around an already designed filter
    ///
    /// # Arguments
    /// * `id` - Identifier used in log output
    /// * `filter` - Filter designed for `sample_rate`
    /// * `sample_rate` - Stream sample rate in Hz
    pub fn new(id: impl Into<String>, filter: Filter, sample_rate: u32) -> Self {
        Self {
            id: id.into(),
            filter,
            sample_rate,
            lifecycle: Lifecycle::Uninitialized,
            raw: Vec::new(),
            filtered: Vec::new(),
            last_chunk_start: 0,
            chunk_count: 0,
        }
    }

    /// Decode a µ-law chunk and filter it
    ///
    /// # Returns
    /// The filtered PCM for this chunk
    pub fn ingest_mulaw(&mut self, bytes: &[u8]) -> Result<&[i16], SessionError> {
        let samples = codec::decode_buffer(bytes);
        self.ingest_pcm(&samples)
    }

    /// Filter a chunk of linear PCM
    ///
    /// # Errors
    /// The carried state does not fit the filter; the session keeps it unchanged
    pub fn ingest_pcm(&mut self, samples: &[i16]) -> Result<&[i16], SessionError> {
        if let Lifecycle::Active(state) = &self.lifecycle {
            self.filter.check_state(state)?;
        }

        let state = match mem::replace(&mut self.lifecycle, Lifecycle::Uninitialized) {
            Lifecycle::Active(state) => state,
            Lifecycle::Uninitialized => {
                info!(session = %self.id, filter = self.filter.kind(), "Filter state initialized");
                self.filter.create_state()
            }
        };

        let (output, state) = self.filter.process(samples, state)?;
        self.lifecycle = Lifecycle::Active(state);

        self.raw.extend_from_slice(samples);
        self.last_chunk_start = self.filtered.len();
        self.filtered.extend(output);
        self.chunk_count += 1;

        debug!(
            session = %self.id,
            chunk = self.chunk_count,
            samples = samples.len(),
            total = self.raw.len(),
            "Processed chunk"
        );

        Ok(&self.filtered[self.last_chunk_start..])
    }

    /// Filtered output of the most recent chunk
    pub fn last_chunk(&self) -> &[i16] {
        &self.filtered[self.last_chunk_start..]
    }

    /// µ-law encoding of the most recent filtered chunk, for onward transmission
    pub fn encode_last_chunk(&self) -> Vec<u8> {
        codec::encode_buffer(self.last_chunk())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    pub fn sample_count(&self) -> usize {
        self.raw.len()
    }

    /// Whether any chunk has been processed yet
    pub fn is_active(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Active(_))
    }

    /// End the call, discarding filter state
    pub fn finish(self) -> Recording {
        info!(
            session = %self.id,
            chunks = self.chunk_count,
            samples = self.raw.len(),
            "Session finished"
        );

        Recording {
            sample_rate: self.sample_rate,
            raw: self.raw,
            filtered: self.filtered,
        }
    }
}

/// Raw and filtered audio of a finished call
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub sample_rate: u32,
    pub raw: Vec<i16>,
    pub filtered: Vec<i16>,
}

impl Recording {
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.raw.len() as f64 / self.sample_rate as f64
    }

    /// Mono WAV of the unfiltered audio
    pub fn raw_wav(&self) -> io::Result<Vec<u8>> {
        wav::encode_wav(&self.raw, self.sample_rate, 1)
    }

    /// Mono WAV of the filtered audio
    pub fn filtered_wav(&self) -> io::Result<Vec<u8>> {
        wav::encode_wav(&self.filtered, self.sample_rate, 1)
    }

    /// Compare raw and filtered power inside and outside `[low_hz, high_hz]`
    pub fn band_report(&self, low_hz: f64, high_hz: f64) -> Result<BandReport, SessionError> {
        let mut analyzer = SpectrumAnalyzer::new(AnalyzerConfig {
            sample_rate: self.sample_rate as f64,
            ..AnalyzerConfig::default()
        })?;

        Ok(analyzer.band_report(&self.raw, &self.filtered, low_hz, high_hz)?)
    }
}
