use herald::config::ServerIdent;
use herald::http::render::Renderer;
use herald::http::response::Response;
use herald::http::writer::ResponseWriter;
use tokio::io::AsyncReadExt;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[tokio::test]
async fn test_writes_full_buffer() {
    init_tracing();

    let (mut client, mut server) = tokio::io::duplex(64 * 1024);
    let renderer = Renderer::new(ServerIdent::load());
    let response = Response::ok("Hello from herald\n");
    let bytes = renderer.render(&response).unwrap();

    let mut writer = ResponseWriter::new(bytes.clone());
    writer.write_to_stream(&mut server).await.unwrap();
    drop(server);

    let mut received = Vec::new();
    client.read_to_end(&mut received).await.unwrap();
    assert_eq!(received, bytes);
}

#[tokio::test]
async fn test_closed_stream_is_an_error() {
    init_tracing();

    let (client, mut server) = tokio::io::duplex(16);
    drop(client);

    let mut writer = ResponseWriter::new(bytes::Bytes::from_static(b"HTTP/1.1 200 OK\r\n\r\n"));
    let result = writer.write_to_stream(&mut server).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_partial_writes_resume() {
    init_tracing();

    // A tiny duplex buffer forces the writer through several partial writes.
    let (mut client, mut server) = tokio::io::duplex(8);
    let payload = bytes::Bytes::from(vec![0xabu8; 4096]);

    let mut writer = ResponseWriter::new(payload.clone());
    let write = tokio::spawn(async move {
        writer.write_to_stream(&mut server).await.unwrap();
    });

    let mut received = Vec::new();
    client.read_to_end(&mut received).await.unwrap();
    write.await.unwrap();
    assert_eq!(received, payload);
}
