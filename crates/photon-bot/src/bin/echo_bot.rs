//! A minimal fixture bot used only by `tests/subprocess_echo.rs`.
//!
//! Speaks the exact framing `SubprocessBot` expects on the other end of the
//! pipe (4-byte big-endian length prefix + the shared Avro frame container)
//! and answers every live-ship request with the neutral control triple, and
//! every "hello" request (`ship_id: None`) with `null`, matching `spec.md`
//! §4.6's contract precisely. Never writes anything but response frames to
//! stdout; this file is the reference for "a bot's stdout is solely the
//! response channel."

use std::io::{Read, Write};

use photon_schema::codec::{decode_request, encode_control};
use photon_schema::ControllerState;

fn read_frame(reader: &mut impl Read) -> std::io::Result<Vec<u8>> {
    let mut len_bytes = [0u8; 4];
    reader.read_exact(&mut len_bytes)?;
    let len = u32::from_be_bytes(len_bytes) as usize;
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

fn write_frame(writer: &mut impl Write, bytes: &[u8]) -> std::io::Result<()> {
    let len = u32::try_from(bytes.len()).unwrap_or(u32::MAX);
    writer.write_all(&len.to_be_bytes())?;
    writer.write_all(bytes)?;
    writer.flush()
}

fn main() {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut reader = stdin.lock();
    let mut writer = stdout.lock();

    loop {
        let frame = match read_frame(&mut reader) {
            Ok(frame) => frame,
            Err(_) => break, // engine closed its end; exit cleanly.
        };
        let request = decode_request(&frame).expect("engine sent a malformed request frame");
        let response = if request.ship_id.is_some() {
            Some(ControllerState {
                fire: false,
                rotate: 0.0,
                thrust: 0.0,
            })
        } else {
            None
        };
        let encoded = encode_control(&response).expect("failed to encode response frame");
        write_frame(&mut writer, &encoded).expect("failed to write response frame");
    }
}
