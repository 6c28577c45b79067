//! Binary and text encodings for the [`Step`] wire format (`spec.md` §6).
//!
//! Two encodings are contractual:
//!
//! - **Binary**: a self-describing container with the schema embedded in
//!   the header and block compression, built on [`apache_avro`]'s Object
//!   Container File format. Each [`Step`] is carried as an envelope record
//!   whose `payload_json` field holds the step's canonical JSON -- this
//!   keeps the full `Step`/`Event`/`ObjCreate` enum nesting on the
//!   well-trodden `serde_json` path while still giving every frame a real
//!   embedded-schema, block-compressed binary container, exactly the
//!   contract `spec.md` describes.
//! - **Text**: newline-delimited JSON, one [`Step`] per line.
//!
//! [`encode_step`]/[`decode_step`] produce and consume a standalone
//! container per call (its own header, schema, and single block) -- this is
//! the framing `photon-bot` uses for each request/response on a bot's wire.
//! [`StepWriter`]/[`StepReader`] share one container across many steps, for
//! callers (e.g. a future log writer) that want one block per step inside a
//! single file.

use std::io::Read;

use apache_avro::{Codec, Reader, Schema, Writer};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SchemaError;
use crate::event::Step;

/// Avro schema for the envelope record. `clock` is duplicated from the
/// payload so that a reader can filter/seek without decoding the JSON body,
/// mirroring the way the source's binary container keeps a record's schema
/// self-describing without requiring full deserialization of every value.
const ENVELOPE_SCHEMA: &str = r#"
{
  "type": "record",
  "name": "StepEnvelope",
  "namespace": "photonai",
  "fields": [
    { "name": "clock", "type": "long" },
    { "name": "payload_json", "type": "string" }
  ]
}
"#;

#[derive(Debug, Serialize, Deserialize)]
struct StepEnvelope {
    clock: i64,
    payload_json: String,
}

fn envelope_schema() -> Result<Schema, SchemaError> {
    Ok(Schema::parse_str(ENVELOPE_SCHEMA)?)
}

fn to_envelope(step: &Step) -> Result<StepEnvelope, SchemaError> {
    Ok(StepEnvelope {
        clock: step.clock as i64,
        payload_json: serde_json::to_string(step)?,
    })
}

fn from_envelope(envelope: StepEnvelope) -> Result<Step, SchemaError> {
    Ok(serde_json::from_str(&envelope.payload_json)?)
}

/// Encode one [`Step`] as a standalone, self-describing Avro container
/// (header + schema + one deflate-compressed block).
pub fn encode_step(step: &Step) -> Result<Vec<u8>, SchemaError> {
    let schema = envelope_schema()?;
    let mut writer = Writer::with_codec(&schema, Vec::new(), Codec::Deflate);
    writer.append_ser(to_envelope(step)?)?;
    Ok(writer.into_inner()?)
}

/// Decode one [`Step`] previously produced by [`encode_step`].
pub fn decode_step(bytes: &[u8]) -> Result<Step, SchemaError> {
    let reader = Reader::new(bytes)?;
    for value in reader {
        let envelope: StepEnvelope = apache_avro::from_value(&value?)?;
        return from_envelope(envelope);
    }
    warn!("rejected: Avro container held no records");
    Err(SchemaError::UnrecognizedVariant(
        "Avro container held no records".to_owned(),
    ))
}

/// Encode a [`Step`] as one newline-delimited JSON line (no trailing `\n`).
pub fn to_json_line(step: &Step) -> Result<String, SchemaError> {
    Ok(serde_json::to_string(step)?)
}

/// Decode a single JSON-lines record back into a [`Step`].
pub fn from_json_line(line: &str) -> Result<Step, SchemaError> {
    Ok(serde_json::from_str(line)?)
}

/// Appends many [`Step`]s to one shared, block-compressed Avro container.
///
/// Unlike [`encode_step`], the schema header is written once; every
/// [`append`](Self::append) call writes a fresh block. Intended for a log
/// writer that wants one file holding an entire game's stream.
pub struct StepWriter<W: std::io::Write> {
    writer: Writer<'static, W>,
}

impl<W: std::io::Write> StepWriter<W> {
    pub fn new(sink: W) -> Result<Self, SchemaError> {
        let schema = envelope_schema()?;
        // `Writer` borrows the schema; leak a 'static copy so the writer can
        // outlive this constructor without forcing callers to thread a
        // schema lifetime through their own types.
        let schema: &'static Schema = Box::leak(Box::new(schema));
        Ok(Self {
            writer: Writer::with_codec(schema, sink, Codec::Deflate),
        })
    }

    /// Append one step as a new block, flushing immediately so a partial
    /// game remains readable if the process later dies mid-write.
    pub fn append(&mut self, step: &Step) -> Result<(), SchemaError> {
        self.writer.append_ser(to_envelope(step)?)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Consume the writer, returning the underlying sink.
    pub fn into_inner(self) -> Result<W, SchemaError> {
        Ok(self.writer.into_inner()?)
    }
}

/// Iterates the [`Step`]s written by a [`StepWriter`] (or any Avro container
/// built from [`ENVELOPE_SCHEMA`]) in order.
pub struct StepReader<R: Read> {
    inner: Reader<'static, R>,
}

impl<R: Read> StepReader<R> {
    pub fn new(source: R) -> Result<Self, SchemaError> {
        Ok(Self {
            inner: Reader::new(source)?,
        })
    }
}

impl<R: Read> Iterator for StepReader<R> {
    type Item = Result<Step, SchemaError>;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.inner.next()?;
        Some((|| {
            let value = value?;
            let envelope: StepEnvelope = apache_avro::from_value(&value)?;
            from_envelope(envelope)
        })())
    }
}

// ---------------------------------------------------------------------------
// Bot wire protocol framing
// ---------------------------------------------------------------------------

/// Avro schema for a framed `Request`/`ControllerState` payload. Unlike
/// [`StepEnvelope`] this carries no duplicated filter field -- a bot's wire
/// has no equivalent use for seeking by clock without decoding the body.
const FRAME_SCHEMA: &str = r#"
{
  "type": "record",
  "name": "Frame",
  "namespace": "photonai",
  "fields": [
    { "name": "payload_json", "type": "string" }
  ]
}
"#;

#[derive(Debug, Serialize, Deserialize)]
struct Frame {
    payload_json: String,
}

fn frame_schema() -> Result<Schema, SchemaError> {
    Ok(Schema::parse_str(FRAME_SCHEMA)?)
}

fn encode_frame(payload_json: String) -> Result<Vec<u8>, SchemaError> {
    let schema = frame_schema()?;
    let mut writer = Writer::with_codec(&schema, Vec::new(), Codec::Deflate);
    writer.append_ser(Frame { payload_json })?;
    Ok(writer.into_inner()?)
}

fn decode_frame(bytes: &[u8]) -> Result<String, SchemaError> {
    let reader = Reader::new(bytes)?;
    for value in reader {
        let frame: Frame = apache_avro::from_value(&value?)?;
        return Ok(frame.payload_json);
    }
    warn!("rejected: Avro container held no records");
    Err(SchemaError::UnrecognizedVariant(
        "Avro container held no records".to_owned(),
    ))
}

/// Encode one [`Request`] frame, per `spec.md` §6: "framing is the same
/// self-describing binary container used for the log."
pub fn encode_request(request: &crate::event::Request) -> Result<Vec<u8>, SchemaError> {
    encode_frame(serde_json::to_string(request)?)
}

pub fn decode_request(bytes: &[u8]) -> Result<crate::event::Request, SchemaError> {
    Ok(serde_json::from_str(&decode_frame(bytes)?)?)
}

/// Encode a bot's response: `Some(ControllerState)`, or `None` for the
/// "hello, no ship yet" reply permitted only when `Request::ship_id` is
/// `None` (`spec.md` §4.6).
pub fn encode_control(control: &Option<crate::event::ControllerState>) -> Result<Vec<u8>, SchemaError> {
    encode_frame(serde_json::to_string(control)?)
}

pub fn decode_control(bytes: &[u8]) -> Result<Option<crate::event::ControllerState>, SchemaError> {
    Ok(serde_json::from_str(&decode_frame(bytes)?)?)
}
