use super::*;
use crate::{Query, Request, Response};

#[test]
fn encode_returns_json_without_length_prefix() {
    let response = Response::Ok;
    let encoded = encode(&response).expect("encode failed");

    // encode() returns raw JSON, no length prefix
    let json_str = std::str::from_utf8(&encoded).expect("should be valid UTF-8");
    assert!(json_str.starts_with('{'), "should be JSON object: {}", json_str);
}

#[tokio::test]
async fn read_write_message_roundtrip() {
    let original = b"hello world";

    let mut buffer = Vec::new();
    write_message(&mut buffer, original).await.expect("write failed");

    // write_message adds 4-byte length prefix
    assert_eq!(buffer.len(), 4 + original.len());

    let mut cursor = std::io::Cursor::new(buffer);
    let read_back = read_message(&mut cursor).await.expect("read failed");

    assert_eq!(read_back, original);
}

#[tokio::test]
async fn write_message_adds_length_prefix() {
    let data = b"test data";

    let mut buffer = Vec::new();
    write_message(&mut buffer, data).await.expect("write failed");

    // First 4 bytes are the length prefix
    let len = u32::from_be_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]) as usize;

    // Length should match the data size
    assert_eq!(len, data.len());
    assert_eq!(&buffer[4..], data);
}

#[tokio::test]
async fn request_response_roundtrip_over_a_duplex_pair() {
    let (mut client, mut server) = tokio::io::duplex(4096);

    let request = Request::Query { query: Query::Status };
    write_request(&mut client, &request).await.expect("write_request failed");
    let read_back = read_request(&mut server).await.expect("read_request failed");
    assert_eq!(read_back, request);

    let response = Response::Status { uptime_secs: 42, node_id: "node-a".to_string(), cluster: "default".to_string() };
    write_response(&mut server, &response).await.expect("write_response failed");
    let read_back = read_response(&mut client).await.expect("read_response failed");
    assert_eq!(read_back, response);
}
