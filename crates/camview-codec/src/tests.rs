use std::io::Cursor;

use image::{ImageOutputFormat, Rgba, RgbaImage};
use rand::Rng;
use tokio::io::AsyncWriteExt;

use crate::{
    decode_response, encode_request, encode_response, read_request, skip_response,
    DecodedResponse, PayloadPolicy, ProtocolError, ResponseError, ServerCommand, HEADER_LEN,
};

fn test_image() -> RgbaImage {
    RgbaImage::from_fn(8, 6, |x, y| Rgba([x as u8 * 30, y as u8 * 40, 200, 255]))
}

fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(image.clone())
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .unwrap();
    bytes
}

fn expect_protocol_error(result: Result<DecodedResponse, ResponseError>) -> ProtocolError {
    match result {
        Err(ResponseError::Protocol(error)) => error,
        other => panic!("Expected a protocol error, got {:?}", other),
    }
}

#[test]
fn request_token_is_the_bare_command() {
    assert_eq!(encode_request(), b"getNewFrame");
    assert_eq!(encode_request().len(), 11);
}

#[test]
fn response_header_is_left_aligned_and_padded() {
    let response = encode_response(b"abc");
    assert_eq!(&response[..HEADER_LEN], b"4               ");
    assert_eq!(&response[HEADER_LEN..], b"YWJj");
}

#[tokio::test]
async fn decodes_a_frame_across_partial_reads() {
    let image = test_image();
    let response = encode_response(&png_bytes(&image));

    // A tiny duplex buffer forces the payload to arrive in many short reads.
    let (mut server, mut client) = tokio::io::duplex(7);
    let writer = tokio::spawn(async move {
        server.write_all(&response).await.unwrap();
    });

    let decoded = decode_response(&mut client, PayloadPolicy::Strict)
        .await
        .unwrap();
    writer.await.unwrap();

    match decoded {
        DecodedResponse::Frame { frame, .. } => {
            assert_eq!(frame.width(), image.width());
            assert_eq!(frame.height(), image.height());
            assert_eq!(frame.pixels(), image.as_raw().as_slice());
        }
        other => panic!("Unexpected response {:?}", other),
    }
}

#[tokio::test]
async fn decodes_right_aligned_header_with_twenty_byte_payload() {
    // 2x2 binary PGM, 15 bytes, i.e. exactly 20 base64 characters.
    let mut pgm = b"P5 2 2 255\n".to_vec();
    pgm.extend_from_slice(&[0, 64, 128, 255]);
    let payload = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &pgm);
    assert_eq!(payload.len(), 20);

    let mut stream = b"              20".to_vec();
    stream.extend_from_slice(payload.as_bytes());
    let mut reader = stream.as_slice();

    match decode_response(&mut reader, PayloadPolicy::Strict).await.unwrap() {
        DecodedResponse::Frame {
            frame,
            payload_size,
        } => {
            assert_eq!(payload_size, 20);
            assert_eq!((frame.width(), frame.height()), (2, 2));
            assert!(!frame.pixels().is_empty());
        }
        other => panic!("Unexpected response {:?}", other),
    }
    assert!(reader.is_empty());
}

#[tokio::test]
async fn non_numeric_header_consumes_exactly_the_header() {
    let mut reader: &[u8] = b"abcdefghijklmnopNEXT";

    let error = expect_protocol_error(decode_response(&mut reader, PayloadPolicy::Strict).await);

    assert!(matches!(error, ProtocolError::MalformedLength { .. }));
    assert_eq!(reader, b"NEXT");
}

#[tokio::test]
async fn negative_header_is_malformed() {
    let mut reader: &[u8] = b"-20             AAAA";

    let error = expect_protocol_error(decode_response(&mut reader, PayloadPolicy::Strict).await);

    assert!(matches!(error, ProtocolError::MalformedLength { .. }));
    assert_eq!(reader, b"AAAA");
}

#[tokio::test]
async fn oversized_header_is_malformed() {
    let mut reader: &[u8] = b"9999999999999999";

    let error = expect_protocol_error(decode_response(&mut reader, PayloadPolicy::Strict).await);

    assert!(matches!(error, ProtocolError::MalformedLength { .. }));
}

#[tokio::test]
async fn random_letter_headers_are_malformed() {
    let mut rng = rand::thread_rng();

    for _ in 0..32 {
        let header: Vec<u8> = (0..HEADER_LEN).map(|_| rng.gen_range(b'a'..=b'z')).collect();
        let mut reader = header.as_slice();

        let error =
            expect_protocol_error(decode_response(&mut reader, PayloadPolicy::Strict).await);

        assert!(matches!(error, ProtocolError::MalformedLength { .. }));
        assert!(reader.is_empty());
    }
}

#[tokio::test]
async fn truncated_payload_fails_under_strict_policy() {
    let mut stream = b"40              ".to_vec();
    stream.extend_from_slice(&[b'A'; 30]);
    let mut reader = stream.as_slice();

    let error = expect_protocol_error(decode_response(&mut reader, PayloadPolicy::Strict).await);

    match error {
        ProtocolError::TruncatedPayload { expected, received } => {
            assert_eq!(expected, 40);
            assert_eq!(received, 30);
        }
        other => panic!("Unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn truncated_payload_is_reported_short_under_lenient_policy() {
    let mut stream = b"40              ".to_vec();
    stream.extend_from_slice(&[b'A'; 30]);
    let mut reader = stream.as_slice();

    match decode_response(&mut reader, PayloadPolicy::Lenient).await.unwrap() {
        DecodedResponse::ShortPayload { expected, received } => {
            assert_eq!(expected, 40);
            assert_eq!(received, 30);
        }
        other => panic!("Unexpected response {:?}", other),
    }
}

#[tokio::test]
async fn invalid_base64_is_a_bad_encoding() {
    let mut reader: &[u8] = b"8               !!!!!!!!";

    let error = expect_protocol_error(decode_response(&mut reader, PayloadPolicy::Strict).await);

    assert!(matches!(error, ProtocolError::BadEncoding(_)));
}

#[tokio::test]
async fn valid_base64_of_garbage_is_a_bad_image() {
    let response = encode_response(b"definitely not an image");
    let mut reader = &response[..];

    let error = expect_protocol_error(decode_response(&mut reader, PayloadPolicy::Strict).await);

    assert!(matches!(error, ProtocolError::BadImage(_)));
}

#[tokio::test]
async fn stream_ending_inside_the_header_is_a_connection_error() {
    let mut reader: &[u8] = b"12  ";

    let result = decode_response(&mut reader, PayloadPolicy::Strict).await;

    assert!(matches!(result, Err(ResponseError::Io(_))));
}

#[tokio::test]
async fn skipped_response_leaves_the_stream_at_the_next_one() {
    let image = test_image();
    let mut stream = encode_response(b"stale bytes").to_vec();
    stream.extend_from_slice(&encode_response(&png_bytes(&image)));
    let mut reader = stream.as_slice();

    assert_eq!(skip_response(&mut reader).await.unwrap(), 16);

    match decode_response(&mut reader, PayloadPolicy::Strict).await.unwrap() {
        DecodedResponse::Frame { frame, .. } => assert_eq!(frame.width(), image.width()),
        other => panic!("Unexpected response {:?}", other),
    }
    assert!(reader.is_empty());
}

#[tokio::test]
async fn skipping_a_truncated_response_fails() {
    let mut reader: &[u8] = b"40              AAAA";

    match skip_response(&mut reader).await {
        Err(ResponseError::Protocol(ProtocolError::TruncatedPayload { expected, received })) => {
            assert_eq!((expected, received), (40, 4));
        }
        other => panic!("Unexpected result {:?}", other),
    }
}

#[tokio::test]
async fn server_commands_are_classified() {
    let mut reader: &[u8] = b"getNewFramecloseDriverhello world";

    assert_eq!(
        read_request(&mut reader).await.unwrap(),
        Some(ServerCommand::GetNewFrame)
    );
    assert_eq!(
        read_request(&mut reader).await.unwrap(),
        Some(ServerCommand::CloseDriver)
    );
    assert_eq!(
        read_request(&mut reader).await.unwrap(),
        Some(ServerCommand::Unknown(b"hello world".to_vec()))
    );
    assert_eq!(read_request(&mut reader).await.unwrap(), None);
}
