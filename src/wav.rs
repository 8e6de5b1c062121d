//! Streaming PCM WAVE encoder.
//!
//! The writer reserves the 44-byte RIFF header up front, appends serialized
//! samples as they arrive, and backpatches the header with the final payload
//! size on close. This keeps memory flat no matter how many samples are
//! written, at the cost of requiring a seekable sink.

use std::{
    fs::File,
    io::{self, BufWriter, Seek, SeekFrom, Write},
    path::Path,
};

use thiserror::Error as ThisError;

const HEADER_SIZE: u64 = 44;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("No output file is open")]
    Closed,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Bytes used to encode one sample's amplitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitDepth {
    #[default]
    Bit16,
    Bit24,
}

impl BitDepth {
    pub fn bytes_per_sample(self) -> u16 {
        match self {
            BitDepth::Bit16 => 2,
            BitDepth::Bit24 => 3,
        }
    }

    pub fn bits_per_sample(self) -> u16 {
        self.bytes_per_sample() * 8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channels {
    #[default]
    Mono,
    Stereo,
}

impl Channels {
    pub fn count(self) -> u16 {
        match self {
            Channels::Mono => 1,
            Channels::Stereo => 2,
        }
    }
}

/// Incremental writer for uncompressed PCM WAVE files.
///
/// One writer owns one output file at a time. Dropping an open writer
/// finalizes the file the same way [`WavWriter::close`] does, so the header
/// is patched on every exit path; call `close` explicitly to observe I/O
/// errors from finalization.
pub struct WavWriter {
    sink: Option<BufWriter<File>>,

    bit_depth: BitDepth,
    channels: Channels,
    sample_rate: u32,

    /// Payload bytes written so far. WAVE caps the data chunk at
    /// `u32::MAX`; payloads near 4 GiB are not guarded against.
    data_size: u32,
}

impl WavWriter {
    /// Creates a writer with no open output. Call [`WavWriter::open`] to
    /// bind it to a file.
    pub fn new() -> Self {
        Self {
            sink: None,
            bit_depth: BitDepth::default(),
            channels: Channels::default(),
            sample_rate: 0,
            data_size: 0,
        }
    }

    /// Creates a writer and opens `path` in one step.
    pub fn create(
        path: impl AsRef<Path>,
        bit_depth: BitDepth,
        channels: Channels,
        sample_rate: u32,
    ) -> Result<Self, Error> {
        let mut w = Self::new();
        w.open(path, bit_depth, channels, sample_rate)?;
        Ok(w)
    }

    /// Truncates or creates `path`, reserves the header region, and resets
    /// the payload counter. A still-open previous output is finalized first.
    ///
    /// A `sample_rate` of zero is not rejected but produces a degenerate
    /// header.
    pub fn open(
        &mut self,
        path: impl AsRef<Path>,
        bit_depth: BitDepth,
        channels: Channels,
        sample_rate: u32,
    ) -> Result<(), Error> {
        self.close()?;

        let mut sink = BufWriter::new(File::create(path)?);
        sink.seek(SeekFrom::Start(HEADER_SIZE))?;

        self.sink = Some(sink);
        self.bit_depth = bit_depth;
        self.channels = channels;
        self.sample_rate = sample_rate;
        self.data_size = 0;

        Ok(())
    }

    /// Whether an output file is currently open and writable.
    pub fn is_open(&self) -> bool {
        self.sink.is_some()
    }

    fn put(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let sink = self.sink.as_mut().ok_or(Error::Closed)?;
        sink.write_all(bytes)?;
        self.data_size += bytes.len() as u32;
        Ok(())
    }

    pub fn write_mono_i16(&mut self, sample: i16) -> Result<(), Error> {
        self.put(&sample.to_le_bytes())
    }

    pub fn write_stereo_i16(&mut self, left: i16, right: i16) -> Result<(), Error> {
        self.write_mono_i16(left)?;
        self.write_mono_i16(right)
    }

    /// Writes the low three bytes of `sample`, least-significant first. The
    /// high byte is discarded, not range-checked.
    pub fn write_mono_i24(&mut self, sample: i32) -> Result<(), Error> {
        self.put(&sample.to_le_bytes()[..3])
    }

    pub fn write_stereo_i24(&mut self, left: i32, right: i32) -> Result<(), Error> {
        self.write_mono_i24(left)?;
        self.write_mono_i24(right)
    }

    /// Writes a normalized sample in `[-1.0, 1.0]` at the configured bit
    /// depth. The value is scaled by the maximum positive amplitude (0x7fff
    /// or 0x7fffff) and truncated toward zero, so `-1.0` maps to `-0x7fff`
    /// rather than the full negative range. Out-of-range input is not
    /// clamped.
    pub fn write_mono(&mut self, sample: f64) -> Result<(), Error> {
        match self.bit_depth {
            BitDepth::Bit16 => self.write_mono_i16((sample * 0x7fff as f64) as i16),
            BitDepth::Bit24 => self.write_mono_i24((sample * 0x7fffff as f64) as i32),
        }
    }

    pub fn write_stereo(&mut self, left: f64, right: f64) -> Result<(), Error> {
        self.write_mono(left)?;
        self.write_mono(right)
    }

    /// Backpatches the header with the final payload size and releases the
    /// file. Does nothing on a writer that is not open, so calling it twice
    /// is harmless.
    pub fn close(&mut self) -> Result<(), Error> {
        let Some(mut sink) = self.sink.take() else {
            return Ok(());
        };

        let block_align = self.channels.count() * self.bit_depth.bytes_per_sample();
        let byte_rate = self.sample_rate * block_align as u32;

        sink.seek(SeekFrom::Start(0))?;

        // ---------- RIFF descriptor ----------
        sink.write_all(b"RIFF")?;
        sink.write_all(&(36 + self.data_size).to_le_bytes())?;
        sink.write_all(b"WAVE")?;

        // ---------- fmt chunk ----------
        sink.write_all(b"fmt ")?;
        sink.write_all(&16u32.to_le_bytes())?;

        // format = pcm
        sink.write_all(&1u16.to_le_bytes())?;
        sink.write_all(&self.channels.count().to_le_bytes())?;

        sink.write_all(&self.sample_rate.to_le_bytes())?;
        sink.write_all(&byte_rate.to_le_bytes())?;
        sink.write_all(&block_align.to_le_bytes())?;
        sink.write_all(&self.bit_depth.bits_per_sample().to_le_bytes())?;

        // ---------- data chunk ----------
        sink.write_all(b"data")?;
        sink.write_all(&self.data_size.to_le_bytes())?;

        sink.flush()?;

        Ok(())
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Changing the bit depth after samples have been written leaves the
    /// backpatched header inconsistent with the earlier payload. The writer
    /// does not guard against this.
    pub fn set_bit_depth(&mut self, bit_depth: BitDepth) {
        self.bit_depth = bit_depth;
    }

    /// Same mid-stream hazard as [`WavWriter::set_bit_depth`].
    pub fn set_channels(&mut self, channels: Channels) {
        self.channels = channels;
    }

    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
    }
}

impl Default for WavWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WavWriter {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
