//! Length-prefixed JSON framing between a command producer and the host.

use crate::command::Command;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{self, Read, Write};
use std::sync::mpsc::Receiver;

pub const HOST_TO_PRODUCER_CAP: usize = 65_536;
pub const PRODUCER_TO_HOST_CAP: usize = 1_048_576;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum HostEnvelope {
    Ready {
        sid: String,
        capabilities: Value,
    },
    Stack {
        sid: String,
        #[serde(default)]
        batch: Option<u64>,
        entries: Vec<String>,
    },
    Launch {
        sid: String,
        target: String,
        params: Value,
        #[serde(default)]
        options: Option<Value>,
    },
    Exit {
        sid: String,
    },
    Error {
        sid: String,
        #[serde(default)]
        batch: Option<u64>,
        code: String,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ProducerEnvelope {
    Commands {
        sid: String,
        batch: u64,
        commands: Vec<Command>,
    },
    Sync {
        sid: String,
    },
    Detach {
        sid: String,
    },
    Attach {
        sid: String,
    },
}

impl ProducerEnvelope {
    pub fn sid(&self) -> &str {
        match self {
            ProducerEnvelope::Commands { sid, .. }
            | ProducerEnvelope::Sync { sid }
            | ProducerEnvelope::Detach { sid }
            | ProducerEnvelope::Attach { sid } => sid,
        }
    }
}

pub fn ready_envelope(sid: String) -> HostEnvelope {
    HostEnvelope::Ready {
        sid,
        capabilities: serde_json::json!({
            "commands": ["forward", "back", "replace", "back_to"],
            "transport": "stdio-packet-4"
        }),
    }
}

pub fn error_envelope(
    sid: String,
    batch: Option<u64>,
    code: impl Into<String>,
    message: impl Into<String>,
) -> HostEnvelope {
    HostEnvelope::Error {
        sid,
        batch,
        code: code.into(),
        message: message.into(),
    }
}

pub fn writer_loop(rx: Receiver<HostEnvelope>, mut writer: impl Write) -> io::Result<()> {
    for envelope in rx {
        let payload = encode_host_envelope(&envelope)?;
        write_frame(&mut writer, &payload, HOST_TO_PRODUCER_CAP)?;
        writer.flush()?;
    }

    Ok(())
}

/// Decode frames until EOF at a frame boundary. A malformed frame ends the
/// loop with an `InvalidData` error.
pub fn reader_loop<F>(mut reader: impl Read, mut on_envelope: F) -> io::Result<()>
where
    F: FnMut(ProducerEnvelope),
{
    loop {
        match read_frame(&mut reader, PRODUCER_TO_HOST_CAP) {
            Ok(payload) => {
                let envelope = decode_producer_envelope(&payload)?;
                on_envelope(envelope);
            }
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
            Err(err) => return Err(err),
        }
    }
}

pub fn encode_host_envelope(envelope: &HostEnvelope) -> io::Result<Vec<u8>> {
    serde_json::to_vec(envelope).map_err(json_error)
}

pub fn decode_producer_envelope(payload: &[u8]) -> io::Result<ProducerEnvelope> {
    serde_json::from_slice(payload).map_err(json_error)
}

/// Read one length-prefixed frame, rejecting payloads above `max_payload`.
pub fn read_frame(reader: &mut impl Read, max_payload: usize) -> io::Result<Vec<u8>> {
    let mut header = [0_u8; 4];
    reader.read_exact(&mut header)?;

    let len = u32::from_be_bytes(header) as usize;
    check_frame_len(len, max_payload)?;

    let mut payload = vec![0_u8; len];
    reader.read_exact(&mut payload)?;
    Ok(payload)
}

pub fn write_frame(writer: &mut impl Write, payload: &[u8], max_payload: usize) -> io::Result<()> {
    check_frame_len(payload.len(), max_payload)?;
    let header = u32::try_from(payload.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "payload exceeds u32"))?
        .to_be_bytes();

    writer.write_all(&header)?;
    writer.write_all(payload)
}

fn check_frame_len(len: usize, max_payload: usize) -> io::Result<()> {
    if len > max_payload {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame of {len} bytes exceeds cap of {max_payload}"),
        ));
    }
    Ok(())
}

fn json_error(err: serde_json::Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::Screen;
    use std::io::Cursor;
    use std::sync::mpsc;

    fn framed(payloads: &[&[u8]]) -> Vec<u8> {
        let mut out = Vec::new();
        for payload in payloads {
            write_frame(&mut out, payload, PRODUCER_TO_HOST_CAP).expect("frame write");
        }
        out
    }

    #[test]
    fn frame_length_is_big_endian() {
        let mut out = Vec::new();
        write_frame(&mut out, b"abc", HOST_TO_PRODUCER_CAP).expect("frame write");
        assert_eq!(&out[0..4], &[0, 0, 0, 3]);
        assert_eq!(&out[4..], b"abc");
    }

    #[test]
    fn frame_cut_mid_payload_is_eof() {
        let mut data = framed(&[br#"{"t":"detach","sid":"S1"}"#]);
        data.truncate(data.len() - 3);

        let err = read_frame(&mut Cursor::new(data), PRODUCER_TO_HOST_CAP)
            .expect_err("payload is short");
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn writer_refuses_payload_above_cap() {
        let mut out = Vec::new();
        let err = write_frame(&mut out, &[b'x'; 9], 8).expect_err("payload over cap");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(out.is_empty());
    }

    #[test]
    fn oversized_frame_is_rejected() {
        let len = (PRODUCER_TO_HOST_CAP as u32) + 1;
        let mut cursor = Cursor::new(len.to_be_bytes().to_vec());
        let err = read_frame(&mut cursor, PRODUCER_TO_HOST_CAP).expect_err("expected too large");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn reader_loop_delivers_envelopes_until_eof() {
        let data = framed(&[
            br#"{"t":"commands","sid":"S1","batch":1,"commands":[{"t":"forward","screen":{"key":"a","destination":{"kind":"view","name":"a"}}},{"t":"back"}]}"#,
            br#"{"t":"detach","sid":"S1"}"#,
        ]);

        let mut seen = Vec::new();
        reader_loop(Cursor::new(data), |envelope| seen.push(envelope)).expect("clean eof");

        assert_eq!(
            seen,
            vec![
                ProducerEnvelope::Commands {
                    sid: "S1".to_string(),
                    batch: 1,
                    commands: vec![Command::forward(Screen::view("a", "a")), Command::Back],
                },
                ProducerEnvelope::Detach {
                    sid: "S1".to_string()
                },
            ]
        );
        assert_eq!(seen[1].sid(), "S1");
    }

    #[test]
    fn reader_loop_stops_on_malformed_envelope() {
        let data = framed(&[br#"{"t":"teleport","sid":"S1"}"#]);
        let err = reader_loop(Cursor::new(data), |_| {}).expect_err("unknown tag");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn writer_loop_frames_each_envelope() {
        let (tx, rx) = mpsc::channel();
        tx.send(ready_envelope("S1".to_string())).expect("queue ready");
        tx.send(HostEnvelope::Stack {
            sid: "S1".to_string(),
            batch: Some(4),
            entries: vec!["a".to_string(), "b".to_string()],
        })
        .expect("queue stack");
        drop(tx);

        let mut out = Vec::new();
        writer_loop(rx, &mut out).expect("writer drains");

        let mut cursor = Cursor::new(out);
        let ready: Value =
            serde_json::from_slice(&read_frame(&mut cursor, HOST_TO_PRODUCER_CAP).expect("ready"))
                .expect("ready json");
        assert_eq!(ready["t"], "ready");
        assert_eq!(ready["capabilities"]["transport"], "stdio-packet-4");

        let stack: Value =
            serde_json::from_slice(&read_frame(&mut cursor, HOST_TO_PRODUCER_CAP).expect("stack"))
                .expect("stack json");
        assert_eq!(stack["t"], "stack");
        assert_eq!(stack["batch"], 4);
        assert_eq!(stack["entries"][1], "b");
    }

    #[test]
    fn encodes_error_envelope() {
        let encoded = encode_host_envelope(&error_envelope(
            "S1".to_string(),
            Some(7),
            "batch_failed",
            "command #0 failed",
        ))
        .expect("encode error");

        let value: Value = serde_json::from_slice(&encoded).expect("parse encoded json");
        assert_eq!(value["t"], "error");
        assert_eq!(value["batch"], 7);
        assert_eq!(value["code"], "batch_failed");
    }
}
