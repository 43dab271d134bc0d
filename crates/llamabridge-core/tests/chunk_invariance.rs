//! The reframer must produce the same frames however the byte stream is cut.

use llamabridge_core::{StreamEvent, StreamReframer};

fn record(content: &str, done: bool) -> String {
    let mut value = serde_json::json!({
        "model": "llama3",
        "created_at": "2024-05-01T12:00:00.123456Z",
        "message": {"role": "assistant", "content": content},
        "done": done,
    });
    if done {
        value["done_reason"] = serde_json::json!("stop");
        value["prompt_eval_count"] = serde_json::json!(12);
        value["eval_count"] = serde_json::json!(4);
    }
    format!("{value}\n")
}

/// A realistic stream with multi-byte characters and a malformed line.
fn backend_stream() -> Vec<u8> {
    let mut out = String::new();
    out.push_str(&record("Grüße", false));
    out.push_str(&record(" – ", false));
    out.push_str("{\"model\": \"llama3\", \"trunc\n");
    out.push_str(&record("日本語 🦀", false));
    out.push('\n');
    out.push_str(&record("", true));
    out.into_bytes()
}

fn run(chunks: &[&[u8]]) -> Vec<String> {
    let mut reframer = StreamReframer::new("chatcmpl-fixed", "llama3");
    let mut events = Vec::new();
    for chunk in chunks {
        events.extend(reframer.push(chunk));
    }
    events.extend(reframer.finish());
    events
        .iter()
        .map(|e| String::from_utf8(e.to_sse().unwrap().to_vec()).unwrap())
        .collect()
}

#[test]
fn test_every_two_way_split_matches_single_chunk() {
    let bytes = backend_stream();
    let expected = run(&[&bytes]);
    assert_eq!(expected.len(), 5);

    for split in 0..=bytes.len() {
        let (head, tail) = bytes.split_at(split);
        assert_eq!(run(&[head, tail]), expected, "split at byte {split}");
    }
}

#[test]
fn test_byte_at_a_time_matches_single_chunk() {
    let bytes = backend_stream();
    let expected = run(&[&bytes]);
    let singles: Vec<&[u8]> = bytes.chunks(1).collect();
    assert_eq!(run(&singles), expected);
}

#[test]
fn test_fixed_size_chunkings_match_single_chunk() {
    let bytes = backend_stream();
    let expected = run(&[&bytes]);
    for size in [2, 3, 7, 16, 61, 256] {
        let chunks: Vec<&[u8]> = bytes.chunks(size).collect();
        assert_eq!(run(&chunks), expected, "chunk size {size}");
    }
}

#[test]
fn test_exactly_one_sentinel_and_it_is_last() {
    let bytes = backend_stream();
    let mut reframer = StreamReframer::new("chatcmpl-fixed", "llama3");
    let mut events = Vec::new();
    for chunk in bytes.chunks(5) {
        events.extend(reframer.push(chunk));
    }
    events.extend(reframer.finish());

    let sentinels = events.iter().filter(|e| **e == StreamEvent::Done).count();
    assert_eq!(sentinels, 1);
    assert_eq!(events.last(), Some(&StreamEvent::Done));
}

#[test]
fn test_frames_reuse_one_id_and_role_once() {
    let bytes = backend_stream();
    let frames = run(&[&bytes]);
    let json: Vec<serde_json::Value> = frames[..frames.len() - 1]
        .iter()
        .map(|f| serde_json::from_str(f.trim_start_matches("data: ").trim_end()).unwrap())
        .collect();

    assert!(json.iter().all(|f| f["id"] == "chatcmpl-fixed"));
    assert_eq!(json[0]["choices"][0]["delta"]["role"], "assistant");
    assert!(
        json[1..]
            .iter()
            .all(|f| f["choices"][0]["delta"].get("role").is_none())
    );
    assert_eq!(json[1]["choices"][0]["delta"]["content"], " – ");
    assert_eq!(json[2]["choices"][0]["delta"]["content"], "日本語 🦀");
    assert_eq!(json[3]["choices"][0]["finish_reason"], "stop");
    assert_eq!(
        frames.last().map(String::as_str),
        Some("data: [DONE]\n\n")
    );
}
